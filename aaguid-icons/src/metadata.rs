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
use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::Mode;

pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/passkeydeveloper/passkey-authenticator-aaguids/main/combined_aaguid.json";

/// Reserved identifier used for authenticators missing from the registry.
pub const UNKNOWN_AAGUID: &str = "00000000-0000-0000-0000-000000000000";
pub const UNKNOWN_NAME: &str = "Unknown authenticator";

const UNKNOWN_ICON_LIGHT: &[u8] = include_bytes!("../assets/unknown-light.svg");
const UNKNOWN_ICON_DARK: &[u8] = include_bytes!("../assets/unknown-dark.svg");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticator {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_light: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_dark: Option<String>,
}

impl Authenticator {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            icon_light: None,
            icon_dark: None,
        }
    }

    pub fn with_icon<S: Into<String>>(mut self, mode: Mode, icon: S) -> Self {
        match mode {
            Mode::Light => self.icon_light = Some(icon.into()),
            Mode::Dark => self.icon_dark = Some(icon.into()),
        }
        self
    }

    /// The icon for `mode`, if it is an embedded data-URI.
    pub fn icon(&self, mode: Mode) -> Option<&str> {
        let icon = match mode {
            Mode::Light => self.icon_light.as_deref(),
            Mode::Dark => self.icon_dark.as_deref(),
        }?;
        icon.starts_with("data:").then_some(icon)
    }
}

/// Authenticators keyed by AAGUID, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry(BTreeMap<String, Authenticator>);

impl Registry {
    pub fn from_str<S: AsRef<str>>(json: S) -> Result<Self> {
        serde_json::from_str(json.as_ref()).context("Failed to parse authenticator registry")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let registry = Self::from_str(json).with_context(|| format!("in {}", path.display()))?;
        info!("Loaded {} authenticators from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn fetch(url: &str) -> Result<Self> {
        let registry: Self = reqwest::blocking::get(url)
            .and_then(|res| res.error_for_status())
            .with_context(|| format!("Failed to fetch {url}"))?
            .json()
            .with_context(|| format!("Failed to parse authenticator registry from {url}"))?;
        info!("Fetched {} authenticators from {url}", registry.len());
        Ok(registry)
    }

    /// Inserts (or overwrites) the entry for [`UNKNOWN_AAGUID`].
    pub fn insert_fallback(&mut self) {
        let fallback = Authenticator::new(UNKNOWN_NAME)
            .with_icon(Mode::Dark, svg_data_uri(UNKNOWN_ICON_DARK))
            .with_icon(Mode::Light, svg_data_uri(UNKNOWN_ICON_LIGHT));
        self.insert(UNKNOWN_AAGUID, fallback);
    }

    pub fn insert<S: Into<String>>(&mut self, id: S, authenticator: Authenticator) {
        self.0.insert(id.into(), authenticator);
    }

    pub fn get(&self, id: &str) -> Option<&Authenticator> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Authenticator)> {
        self.0.iter().map(|(id, a)| (id.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Authenticator)> for Registry {
    fn from_iter<T: IntoIterator<Item = (String, Authenticator)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn svg_data_uri(svg: &[u8]) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64_STANDARD.encode(svg))
}
