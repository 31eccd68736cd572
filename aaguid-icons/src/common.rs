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
    fmt::Display,
    path::{Component, Path},
};

use resvg::usvg;
use thiserror::Error;

/// Default edge length of a normalized icon, in pixels.
pub const ICON_SIZE: u32 = 64;

/// Display theme an icon is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Light, Mode::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }

    /// Name of the registry field holding the icon for this mode.
    pub fn field(&self) -> &'static str {
        match self {
            Mode::Light => "icon_light",
            Mode::Dark => "icon_dark",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format tag taken from the media subtype of a data-URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconFormat {
    Svg,
    Raster(String),
}

impl IconFormat {
    /// `svg+xml` -> `svg`, `PNG` -> `png`.
    pub fn from_subtype(subtype: &str) -> Self {
        let tag = subtype
            .split('+')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match tag.as_str() {
            "svg" => IconFormat::Svg,
            _ => IconFormat::Raster(tag),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IconFormat::Svg => "svg",
            IconFormat::Raster(tag) => tag,
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, IconFormat::Svg)
    }
}

impl Display for IconFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    Standard,
    UrlSafe,
}

/// How icons are decoded, named and written.
///
/// `Upstream` is the canonical behaviour used for the combined registry feed:
/// standard base64, `<id>-<mode>.png`, every icon normalized to a square PNG.
/// `Legacy` reproduces the older local icon dump: URL-safe base64,
/// `<id>_<mode>.<format>`, decoded bytes written unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Upstream,
    Legacy,
}

impl Profile {
    pub fn alphabet(&self) -> Alphabet {
        match self {
            Profile::Upstream => Alphabet::Standard,
            Profile::Legacy => Alphabet::UrlSafe,
        }
    }

    pub fn separator(&self) -> char {
        match self {
            Profile::Upstream => '-',
            Profile::Legacy => '_',
        }
    }

    pub fn normalizes(&self) -> bool {
        matches!(self, Profile::Upstream)
    }

    /// Output file name for an icon. Fails when the identifier would not
    /// yield a single plain file name, e.g. `../x` or `a/b`.
    pub fn file_name(
        &self,
        id: &str,
        mode: Mode,
        format: &IconFormat,
    ) -> Result<String, IconError> {
        let ext = match (self, format.as_str()) {
            (Profile::Upstream, _) => "png",
            (Profile::Legacy, "") => "bin",
            (Profile::Legacy, tag) => tag,
        };
        let name = format!("{id}{}{mode}.{ext}", self.separator());

        let mut components = Path::new(&name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(name),
            _ => Err(IconError::InvalidId(id.to_owned())),
        }
    }
}

/// Failure of a single (identifier, mode) item. Never fatal for the batch.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("invalid svg: {0}")]
    Svg(#[from] usvg::Error),
    #[error("could not render svg: {0}")]
    Render(String),
    #[error("invalid raster image: {0}")]
    Raster(#[from] image::ImageError),
    #[error("could not write icon: {0}")]
    Io(#[from] std::io::Error),
    #[error("identifier {0:?} is not usable as a file name")]
    InvalidId(String),
}

impl IconError {
    pub fn stage(&self) -> &'static str {
        match self {
            IconError::Decode(_) => "decode",
            IconError::InvalidId(_) => "name",
            _ => "convert",
        }
    }
}
