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

use std::{fs, io::Cursor, path::Path, sync::Arc};

use image::{imageops, imageops::FilterType, DynamicImage, ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::common::{IconError, ICON_SIZE};
use crate::decode::DecodedIcon;

/// How a source icon related to the target size before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Vector,
    Upscaled,
    Downscaled,
}

/// Turns decoded icons into square images of a fixed size.
pub struct Converter {
    size: u32,
    svg_options: usvg::Options<'static>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ICON_SIZE)
    }
}

impl Converter {
    pub fn new(size: u32) -> Self {
        let mut svg_options = usvg::Options::default();
        // Some vendor logos are plain <text> elements.
        Arc::make_mut(&mut svg_options.fontdb).load_system_fonts();
        Self { size, svg_options }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Writes `icon` to `path` as a `size`x`size` image.
    ///
    /// The image is encoded in memory first, so nothing is written when
    /// decoding or encoding fails.
    pub fn normalize(&self, icon: &DecodedIcon, path: &Path) -> Result<Scale, IconError> {
        let (bytes, scale) = if icon.format.is_vector() {
            (self.rasterize_svg(&icon.bytes)?, Scale::Vector)
        } else {
            let (image, scale) = self.pad_raster(&icon.bytes)?;
            (encode(&image, path)?, scale)
        };
        fs::write(path, bytes)?;
        Ok(scale)
    }

    /// Renders an svg document into a PNG, fitted and centered.
    pub fn rasterize_svg(&self, data: &[u8]) -> Result<Vec<u8>, IconError> {
        let tree = usvg::Tree::from_data(data, &self.svg_options)?;

        let target = self.size as f32;
        let (w, h) = (tree.size().width(), tree.size().height());
        let scale = (target / w).min(target / h);
        let transform = tiny_skia::Transform::from_row(
            scale,
            0.0,
            0.0,
            scale,
            (target - w * scale) / 2.0,
            (target - h * scale) / 2.0,
        );

        let mut pixmap = tiny_skia::Pixmap::new(self.size, self.size).ok_or_else(|| {
            IconError::Render(format!(
                "failed to allocate {}x{} pixmap",
                self.size, self.size
            ))
        })?;
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|err| IconError::Render(err.to_string()))
    }

    /// Letterboxes a raster image onto a transparent square canvas.
    pub fn pad_raster(&self, data: &[u8]) -> Result<(RgbaImage, Scale), IconError> {
        let source = image::load_from_memory(data)?;
        let scale = if source.width().min(source.height()) < self.size {
            Scale::Upscaled
        } else {
            Scale::Downscaled
        };

        let fitted = DynamicImage::ImageRgba8(source.to_rgba8())
            .resize(self.size, self.size, FilterType::Lanczos3)
            .to_rgba8();

        let mut canvas = RgbaImage::new(self.size, self.size);
        let x = (self.size - fitted.width().min(self.size)) / 2;
        let y = (self.size - fitted.height().min(self.size)) / 2;
        imageops::replace(&mut canvas, &fitted, x as i64, y as i64);

        Ok((canvas, scale))
    }
}

/// Writes the decoded bytes unchanged.
pub fn extract(icon: &DecodedIcon, path: &Path) -> Result<(), IconError> {
    fs::write(path, &icon.bytes)?;
    Ok(())
}

fn encode(image: &RgbaImage, path: &Path) -> Result<Vec<u8>, IconError> {
    let format = ImageFormat::from_path(path)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}
