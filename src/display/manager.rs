/*
 *  display/manager.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Display manager - turns a frame of draw primitives into pixels and
 *  hands them to the panel driver
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

use std::time::Instant;

use embedded_graphics::image::Image;
use embedded_graphics::mono_font::{ascii, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use log::{debug, info};

use crate::config::FontChoice;
use crate::display::{
    BoxedDriver,
    DisplayCapabilities,
    DisplayError,
    DisplaySink,
    DrawPrimitive,
    FrameBuffer,
};

/// Map the configured font name to an embedded-graphics font
pub fn mono_font(choice: FontChoice) -> &'static MonoFont<'static> {
    match choice {
        FontChoice::Font5x8 => &ascii::FONT_5X8,
        FontChoice::Font6x10 => &ascii::FONT_6X10,
        FontChoice::Font6x12 => &ascii::FONT_6X12,
        FontChoice::Font6x13 => &ascii::FONT_6X13,
    }
}

/// Concrete display sink
///
/// Owns the panel driver and a framebuffer the size of the panel. Every
/// `submit` starts from a blank buffer, draws the whole frame, then packs
/// it and pushes it to the driver in one transfer, so the panel never shows
/// half a frame.
pub struct DisplayManager {
    /// Display driver (trait object)
    driver: BoxedDriver,

    /// Framebuffer for rendering
    framebuffer: FrameBuffer,

    /// Display capabilities
    capabilities: DisplayCapabilities,

    text_style: MonoTextStyle<'static, BinaryColor>,
    bar_style: PrimitiveStyle<BinaryColor>,

    frames: u64,
}

impl DisplayManager {
    pub fn new(driver: BoxedDriver, font: FontChoice) -> Self {
        let capabilities = driver.capabilities().clone();
        let framebuffer = FrameBuffer::new(&capabilities);

        info!(
            "Display: {} {}x{}, font {:?}",
            capabilities.name, capabilities.width, capabilities.height, font
        );

        let bar_style = PrimitiveStyleBuilder::new()
            .stroke_color(BinaryColor::On)
            .stroke_width(1)
            .fill_color(BinaryColor::On)
            .build();

        Self {
            driver,
            framebuffer,
            capabilities,
            text_style: MonoTextStyle::new(mono_font(font), BinaryColor::On),
            bar_style,
            frames: 0,
        }
    }

    /// Get display capabilities
    pub fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    /// Frames pushed to the panel so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn draw(&mut self, primitive: &DrawPrimitive) -> Result<(), DisplayError> {
        let fb = self.framebuffer.target_mut();
        match primitive {
            DrawPrimitive::Text { x, y, text } => {
                Text::with_baseline(text, Point::new(*x, *y), self.text_style, Baseline::Top)
                    .draw(fb)
                    .map_err(|_| DisplayError::DrawingError(format!("Failed to draw text {:?}", text)))?;
            }
            DrawPrimitive::FilledRect { x0, y0, x1, y1 } => {
                Rectangle::with_corners(Point::new(*x0, *y0), Point::new(*x1, *y1))
                    .into_styled(self.bar_style)
                    .draw(fb)
                    .map_err(|_| DisplayError::DrawingError("Failed to draw bar".to_string()))?;
            }
            DrawPrimitive::Image { x, y, image } => {
                let raw = image.as_raw();
                Image::new(&raw, Point::new(*x, *y))
                    .draw(fb)
                    .map_err(|_| DisplayError::DrawingError("Failed to draw image".to_string()))?;
            }
        }
        Ok(())
    }
}

impl DisplaySink for DisplayManager {
    fn canvas_size(&self) -> (u32, u32) {
        self.framebuffer.dimensions()
    }

    fn submit(&mut self, frame: &[DrawPrimitive]) -> Result<(), DisplayError> {
        let frame_start = Instant::now();

        self.framebuffer.clear();
        for primitive in frame {
            self.draw(primitive)?;
        }
        let render_time = frame_start.elapsed();

        let transfer_start = Instant::now();
        let buffer_data = self.framebuffer.to_packed_bytes();
        self.driver.write_buffer(&buffer_data)?;
        self.driver.flush()?;
        self.frames += 1;

        debug!(
            "Frame {}: {} primitives, render {}us, transfer {}us",
            self.frames,
            frame.len(),
            render_time.as_micros(),
            transfer_start.elapsed().as_micros()
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.framebuffer.clear();
        self.driver.clear()
    }
}
