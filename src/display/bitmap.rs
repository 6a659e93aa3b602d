/*
 *  display/bitmap.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Splash logo: BMP file to 1-bit image
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::{BinaryColor, Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::image::ImageRaw;
use thiserror::Error;
use tinybmp::Bmp;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a usable BMP: {0}")]
    Decode(String),
}

/// Packed 1-bit image, rows MSB first and padded to whole bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl MonoImage {
    pub fn blank(width: u32, height: u32) -> Self {
        let stride = width.div_ceil(8) as usize;
        Self { width, height, data: vec![0; stride * height as usize] }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn size(&self) -> (u32, u32) { (self.width, self.height) }

    fn stride(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y as usize * self.stride() + x as usize / 8;
        let mask = 0x80 >> (x % 8);
        if on {
            self.data[i] |= mask;
        } else {
            self.data[i] &= !mask;
        }
    }

    pub fn is_on(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[y as usize * self.stride() + x as usize / 8] & (0x80 >> (x % 8)) != 0
    }

    /// Borrow as an embedded-graphics image source
    pub fn as_raw(&self) -> ImageRaw<'_, BinaryColor> {
        ImageRaw::new(&self.data, self.width)
    }

    /// Decode BMP bytes; a pixel is lit when any colour channel is non-zero
    pub fn from_bmp_bytes(bytes: &[u8]) -> Result<Self, BitmapError> {
        let bmp = Bmp::<Rgb888>::from_slice(bytes)
            .map_err(|e| BitmapError::Decode(format!("{:?}", e)))?;
        let size = bmp.bounding_box().size;

        let mut image = Self::blank(size.width, size.height);
        for Pixel(p, color) in bmp.pixels() {
            if p.x < 0 || p.y < 0 {
                continue;
            }
            let lit = color.r() != 0 || color.g() != 0 || color.b() != 0;
            image.set(p.x as u32, p.y as u32, lit);
        }
        Ok(image)
    }
}

/// Read and decode the splash logo
pub fn load_logo(path: &Path) -> Result<MonoImage, BitmapError> {
    let bytes = std::fs::read(path).map_err(|source| BitmapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MonoImage::from_bmp_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2, 24bpp, bottom-up: top row white/black, bottom row black/red
    fn tiny_bmp() -> Vec<u8> {
        let pixel_rows: [[u8; 8]; 2] = [
            // bottom row first
            [0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0, 0],
            [0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0, 0],
        ];
        let data_len = 16u32;
        let offset = 14u32 + 40;

        let mut bmp = Vec::new();
        bmp.extend_from_slice(b"BM");
        bmp.extend_from_slice(&(offset + data_len).to_le_bytes());
        bmp.extend_from_slice(&[0; 4]);
        bmp.extend_from_slice(&offset.to_le_bytes());

        bmp.extend_from_slice(&40u32.to_le_bytes());
        bmp.extend_from_slice(&2i32.to_le_bytes());
        bmp.extend_from_slice(&2i32.to_le_bytes());
        bmp.extend_from_slice(&1u16.to_le_bytes());
        bmp.extend_from_slice(&24u16.to_le_bytes());
        bmp.extend_from_slice(&0u32.to_le_bytes());
        bmp.extend_from_slice(&data_len.to_le_bytes());
        bmp.extend_from_slice(&2835i32.to_le_bytes());
        bmp.extend_from_slice(&2835i32.to_le_bytes());
        bmp.extend_from_slice(&0u32.to_le_bytes());
        bmp.extend_from_slice(&0u32.to_le_bytes());

        for row in pixel_rows {
            bmp.extend_from_slice(&row);
        }
        bmp
    }

    #[test]
    fn test_decode_any_channel_lights_pixel() {
        let image = MonoImage::from_bmp_bytes(&tiny_bmp()).unwrap();
        assert_eq!(image.size(), (2, 2));
        assert!(image.is_on(0, 0));
        assert!(!image.is_on(1, 0));
        assert!(!image.is_on(0, 1));
        assert!(image.is_on(1, 1));
        assert_eq!(image.data, vec![0x80, 0x40]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = MonoImage::from_bmp_bytes(b"not a bitmap").unwrap_err();
        assert!(matches!(err, BitmapError::Decode(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_logo(Path::new("/nonexistent/stratux-logo.bmp")).unwrap_err();
        assert!(matches!(err, BitmapError::Io { .. }));
    }

    #[test]
    fn test_set_ignores_out_of_range() {
        let mut image = MonoImage::blank(10, 2);
        image.set(10, 0, true);
        image.set(0, 2, true);
        assert_eq!(image, MonoImage::blank(10, 2));
        image.set(9, 1, true);
        assert!(image.is_on(9, 1));
    }
}
