/*
 *  display/traits.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Core trait definitions for display driver abstraction
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

use crate::display::error::{DisplayError, RenderSubmissionError};
use crate::display::layout::DrawPrimitive;

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Controller name, for logging
    pub name: &'static str,

    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Whether the display supports hardware rotation
    pub supports_rotation: bool,

    /// Whether the display supports brightness control
    pub supports_brightness: bool,

    /// Whether the display supports inversion
    pub supports_invert: bool,
}

/// Minimal hardware abstraction for a monochrome panel
///
/// Drivers receive whole frames as packed bytes: row-major, 8 pixels per
/// byte, least significant bit first (see `FrameBuffer::to_packed_bytes`).
pub trait DisplayDriver: Send {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Initialize the display hardware
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Set display brightness (0-255)
    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError>;

    /// Blank the panel
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Stage a packed frame in the driver's buffer
    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError>;

    /// Push the staged frame to the hardware
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Set display inversion (if supported)
    fn set_invert(&mut self, _inverted: bool) -> Result<(), DisplayError> {
        Err(DisplayError::UnsupportedOperation)
    }

    /// Set display rotation (if supported)
    ///
    /// Rotation angle should be 0, 90, 180, or 270 degrees.
    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if !self.capabilities().supports_rotation {
            return Err(DisplayError::UnsupportedOperation);
        }
        Err(DisplayError::InvalidRotation(degrees))
    }
}

/// Consumer of drawing primitives, the only output of the display cycle.
pub trait DisplaySink {
    /// Logical canvas size, (width, height)
    fn canvas_size(&self) -> (u32, u32);

    /// Apply a whole frame. Either every primitive reaches the panel or none does.
    fn submit(&mut self, frame: &[DrawPrimitive]) -> Result<(), RenderSubmissionError>;

    /// Blank the panel
    fn clear(&mut self) -> Result<(), DisplayError>;
}
