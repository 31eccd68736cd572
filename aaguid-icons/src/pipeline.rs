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

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, trace, warn};

use crate::{
    common::{IconError, Mode, Profile},
    convert::{self, Converter, Scale},
    data_uri,
    decode::{self, DecodedIcon},
    metadata::Registry,
};

/// An icon file written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: String,
    pub mode: Mode,
    pub file: String,
}

#[derive(Debug)]
pub struct Failure {
    pub id: String,
    pub mode: Mode,
    pub error: IconError,
}

/// Everything accumulated over one batch run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub format_counts: BTreeMap<String, usize>,
    pub upscaled: usize,
    pub downscaled: usize,
    pub written: Vec<Artifact>,
    pub failed: Vec<Failure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|f| f.id.as_str())
    }

    pub fn written_file(&self, id: &str, mode: Mode) -> Option<&str> {
        self.written
            .iter()
            .find(|a| a.id == id && a.mode == mode)
            .map(|a| a.file.as_str())
    }
}

pub struct Pipeline {
    out_dir: PathBuf,
    profile: Profile,
    converter: Converter,
}

impl Pipeline {
    /// Creates the output directory if it does not exist yet.
    pub fn new<P: Into<PathBuf>>(out_dir: P, size: u32, profile: Profile) -> Result<Self> {
        let out_dir = out_dir.into();
        anyhow::ensure!(size > 0, "Icon size must be at least one pixel");
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
        Ok(Self {
            out_dir,
            profile,
            converter: Converter::new(size),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn run(&self, registry: &Registry) -> RunReport {
        let mut report = RunReport::default();

        for (id, authenticator) in registry.iter() {
            for mode in Mode::ALL {
                let Some(uri) = authenticator.icon(mode).and_then(data_uri::parse) else {
                    trace!("No embedded {mode} icon for {id}");
                    continue;
                };
                *report
                    .format_counts
                    .entry(uri.format.to_string())
                    .or_default() += 1;

                let icon = match decode::decode_uri(&uri, self.profile.alphabet()) {
                    Ok(icon) => icon,
                    Err(error) => {
                        warn!("Failed to decode {id} ({mode}): {error}");
                        report.failed.push(Failure {
                            id: id.to_owned(),
                            mode,
                            error,
                        });
                        continue;
                    }
                };

                let written = self
                    .profile
                    .file_name(id, mode, &icon.format)
                    .and_then(|file| {
                        let path = self.out_dir.join(&file);
                        let scale = self.write(&icon, &path)?;
                        info!("Saved {}", path.display());
                        Ok((file, scale))
                    });
                match written {
                    Ok((file, scale)) => {
                        match scale {
                            Some(Scale::Upscaled) => report.upscaled += 1,
                            Some(Scale::Downscaled) => report.downscaled += 1,
                            Some(Scale::Vector) | None => {}
                        }
                        report.written.push(Artifact {
                            id: id.to_owned(),
                            mode,
                            file,
                        });
                    }
                    Err(error) => {
                        warn!("Failed to write {id} ({mode}): {error}");
                        report.failed.push(Failure {
                            id: id.to_owned(),
                            mode,
                            error,
                        });
                    }
                }
            }
        }

        report
    }

    fn write(&self, icon: &DecodedIcon, path: &Path) -> Result<Option<Scale>, IconError> {
        if self.profile.normalizes() {
            self.converter.normalize(icon, path).map(Some)
        } else {
            convert::extract(icon, path).map(|_| None)
        }
    }
}
