/*
 *  display/framebuffer.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Monochrome frame buffer and the packed wire format shared with drivers
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

use embedded_graphics::pixelcolor::BinaryColor;
use crate::display::error::DisplayError;
use crate::display::traits::DisplayCapabilities;
use crate::vframebuf::VarFrameBuf;

/// Size in bytes of a packed frame
pub fn packed_len(width: u32, height: u32) -> usize {
    (width as usize * height as usize).div_ceil(8)
}

/// Unpack a packed frame (8 pixels per byte, LSB first) into `fb`
pub fn unpack_into(buffer: &[u8], fb: &mut VarFrameBuf<BinaryColor>) -> Result<(), DisplayError> {
    let expected = packed_len(fb.width() as u32, fb.height() as u32);
    if buffer.len() != expected {
        return Err(DisplayError::BufferSizeMismatch { expected, actual: buffer.len() });
    }

    for (i, pixel) in fb.as_mut_slice().iter_mut().enumerate() {
        *pixel = if buffer[i / 8] & (1 << (i % 8)) != 0 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        };
    }
    Ok(())
}

/// Frame buffer the sink draws each frame into before it goes to the driver
pub struct FrameBuffer {
    fb: VarFrameBuf<BinaryColor>,
}

impl FrameBuffer {
    /// Create a new framebuffer based on display capabilities
    pub fn new(capabilities: &DisplayCapabilities) -> Self {
        FrameBuffer {
            fb: VarFrameBuf::new(capabilities.width, capabilities.height, BinaryColor::Off),
        }
    }

    /// Get dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.fb.width() as u32, self.fb.height() as u32)
    }

    pub fn clear(&mut self) {
        self.fb.clear_color(BinaryColor::Off);
    }

    /// Draw target for embedded-graphics
    pub fn target_mut(&mut self) -> &mut VarFrameBuf<BinaryColor> {
        &mut self.fb
    }

    pub fn target(&self) -> &VarFrameBuf<BinaryColor> {
        &self.fb
    }

    /// Convert framebuffer to packed byte array for write_buffer()
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let pixels = self.fb.as_slice();
        let mut bytes = vec![0u8; pixels.len().div_ceil(8)];

        for (i, &pixel) in pixels.iter().enumerate() {
            if pixel.is_on() {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }

        bytes
    }
}
