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

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{common::Mode, metadata::Registry, pipeline::RunReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_dark: Option<String>,
}

/// Maps each authenticator to its name and the icon files written for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, ManifestEntry>);

impl Manifest {
    pub fn from_run(registry: &Registry, report: &RunReport) -> Self {
        Self(
            registry
                .iter()
                .map(|(id, authenticator)| {
                    let file = |mode| report.written_file(id, mode).map(str::to_owned);
                    let entry = ManifestEntry {
                        name: authenticator.name.clone(),
                        icon_light: file(Mode::Light),
                        icon_dark: file(Mode::Dark),
                    };
                    (id.to_owned(), entry)
                })
                .collect(),
        )
    }

    pub fn get(&self, id: &str) -> Option<&ManifestEntry> {
        self.0.get(id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write manifest {}", path.display()))
    }
}
