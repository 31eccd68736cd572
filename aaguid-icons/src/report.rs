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

use std::fmt::Write;

use crate::{metadata::Registry, pipeline::RunReport};

/// Renders the end-of-run summary printed by the command line tool.
pub fn render(registry: &Registry, report: &RunReport) -> String {
    let mut out = String::new();

    // `fmt::Write` for `String` never fails
    let _ = writeln!(out, "----------- List of authenticators ---------------");
    for (id, authenticator) in registry.iter() {
        let _ = writeln!(out, "  \"{id}\": \"{}\",", authenticator.name);
    }

    let _ = writeln!(out, "--------------- Stats --------------");
    for (format, count) in &report.format_counts {
        let _ = writeln!(out, "{format}: {count}");
    }
    let _ = writeln!(out, "Upscaled: {}", report.upscaled);
    let _ = writeln!(out, "Downscaled: {}", report.downscaled);

    if !report.is_success() {
        let _ = writeln!(out, "---------- Failed ----------");
        for failure in &report.failed {
            let _ = writeln!(
                out,
                "{} ({}): {} failed: {}",
                failure.id,
                failure.mode,
                failure.error.stage(),
                failure.error
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{IconError, Mode},
        metadata::Authenticator,
        pipeline::Failure,
    };

    fn registry() -> Registry {
        Registry::from_iter([
            ("b".to_string(), Authenticator::new("Beta")),
            ("a".to_string(), Authenticator::new("Alpha")),
        ])
    }

    #[test]
    fn lists_sorted_and_counts() {
        let mut report = RunReport::default();
        report.format_counts.insert("svg".to_string(), 3);
        report.format_counts.insert("png".to_string(), 1);
        report.upscaled = 1;

        let out = render(&registry(), &report);
        assert_eq!(
            out,
            r#"----------- List of authenticators ---------------
  "a": "Alpha",
  "b": "Beta",
--------------- Stats --------------
png: 1
svg: 3
Upscaled: 1
Downscaled: 0
"#
        );
    }

    #[test]
    fn lists_failures() {
        let mut report = RunReport::default();
        report.failed.push(Failure {
            id: "b".to_string(),
            mode: Mode::Dark,
            error: IconError::Render("boom".to_string()),
        });

        let out = render(&registry(), &report);
        assert!(out.ends_with(
            "---------- Failed ----------\nb (dark): convert failed: could not render svg: boom\n"
        ));
    }
}
