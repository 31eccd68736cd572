/* Copyright 2025 Ubique Innovation AG

Licensed to the Apache Software Foundation (ASF) under one
or more contributor license agreements.  See the NOTICE file
distributed with this work for additional information
regarding copyright ownership.  The ASF licenses this file
to you under the Apache License, Version 2.0 (the
"License"); you may not use this file except in compliance
with the License.  You may obtain a copy of the License at

  http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing,
software distributed under the License is distributed on an
"AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
KIND, either express or implied.  See the License for the
specific language governing permissions and limitations
under the License.
 */

use std::{path::PathBuf, process::ExitCode};

use aaguid_icons::{
    manifest::Manifest, report, Pipeline, Profile, Registry, RunReport, DEFAULT_SOURCE_URL,
    ICON_SIZE,
};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Extracts the embedded icons of the passkey authenticator registry.
#[derive(Parser, Debug)]
#[command(name = "aaguid-icons", version)]
struct Args {
    /// Read the registry from a local JSON file instead of fetching it.
    /// Takes precedence over `--url`
    #[arg(long, env = "AAGUID_ICONS_INPUT")]
    input: Option<PathBuf>,

    #[arg(long, env = "AAGUID_ICONS_URL", default_value = DEFAULT_SOURCE_URL)]
    url: String,

    #[arg(long, default_value = "authenticators")]
    out_dir: PathBuf,

    /// Edge length of the square output icons, in pixels
    #[arg(long, default_value_t = ICON_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    #[arg(long, value_enum, default_value_t = ProfileArg::Upstream)]
    profile: ProfileArg,

    /// Also add the "unknown authenticator" entry to a local registry
    #[arg(long)]
    fallback: bool,

    /// Write an id -> {name, icon files} JSON index
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    /// Standard base64, `<id>-<mode>.png`, normalized icons
    Upstream,
    /// URL-safe base64, `<id>_<mode>.<format>`, icons written as-is
    Legacy,
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Upstream => Profile::Upstream,
            ProfileArg::Legacy => Profile::Legacy,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load(args: &Args) -> Result<Registry> {
    match &args.input {
        Some(path) => {
            let mut registry = Registry::from_path(path)?;
            if args.fallback {
                registry.insert_fallback();
            }
            Ok(registry)
        }
        None => {
            let mut registry = Registry::fetch(&args.url)?;
            registry.insert_fallback();
            Ok(registry)
        }
    }
}

/// `0` only when every embedded icon was written.
fn exit_status(run: &RunReport) -> u8 {
    if run.is_success() {
        0
    } else {
        1
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing();

    let registry = load(&args)?;
    let pipeline = Pipeline::new(&args.out_dir, args.size, args.profile.into())?;

    let run = pipeline.run(&registry);
    info!(
        "Wrote {} icons to {}",
        run.written.len(),
        pipeline.out_dir().display()
    );

    print!("{}", report::render(&registry, &run));

    if let Some(path) = &args.manifest {
        Manifest::from_run(&registry, &run).write(path)?;
        info!("Wrote manifest {}", path.display());
    }

    Ok(ExitCode::from(exit_status(&run)))
}

#[cfg(test)]
mod test {
    use super::*;
    use aaguid_icons::{pipeline::Failure, test::png_data_uri, IconError, Mode};
    use clap::CommandFactory;

    #[test]
    fn verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["aaguid-icons"]).unwrap();
        assert_eq!(args.url, DEFAULT_SOURCE_URL);
        assert_eq!(args.size, 64);
        assert_eq!(Profile::from(args.profile), Profile::Upstream);
        assert!(args.input.is_none());
    }

    #[test]
    fn input_takes_precedence_over_url() {
        let args = Args::try_parse_from([
            "aaguid-icons",
            "--input",
            "authenticators.json",
            "--url",
            "https://example.org/aaguids.json",
        ])
        .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("authenticators.json")));
    }

    #[test]
    fn exit_status_follows_failures() {
        let mut run = RunReport::default();
        assert_eq!(exit_status(&run), 0);

        run.failed.push(Failure {
            id: "0a5b1c2d-0000-4000-8000-000000000003".to_string(),
            mode: Mode::Dark,
            error: IconError::Render("empty pixmap".to_string()),
        });
        assert_eq!(exit_status(&run), 1);
    }

    #[test]
    fn one_broken_icon_fails_the_run() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("authenticators.json");
        std::fs::write(
            &input,
            format!(
                r#"{{
                    "broken": {{ "name": "Broken", "icon_dark": "data:image/png;base64,bm90IGFuIGltYWdl" }},
                    "good": {{ "name": "Good", "icon_dark": "{}" }}
                }}"#,
                png_data_uri(8, 8)
            ),
        )?;
        let out_dir = dir.path().join("out");
        let args = Args::try_parse_from([
            "aaguid-icons".to_string(),
            "--input".to_string(),
            input.display().to_string(),
            "--out-dir".to_string(),
            out_dir.display().to_string(),
        ])?;

        let registry = load(&args)?;
        let run = Pipeline::new(&args.out_dir, args.size, args.profile.into())?.run(&registry);

        assert_eq!(exit_status(&run), 1);
        assert_eq!(run.failed_ids().collect::<Vec<_>>(), ["broken"]);
        assert!(out_dir.join("good-dark.png").exists());

        Ok(())
    }

    #[test]
    fn rejects_zero_size() {
        assert!(Args::try_parse_from(["aaguid-icons", "--size", "0"]).is_err());
    }
}
