/*
 *  display/mod.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Display subsystem - layout, drawing and panel drivers
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;
pub mod factory;

// Display drivers (conditionally compiled based on features)
pub mod drivers;

// Fixed status page layout
pub mod layout;

// Splash logo
pub mod bitmap;

// Display manager
pub mod manager;

// Display mode controller
pub mod mode_controller;

// Re-exports for convenience
pub use traits::{DisplayDriver, DisplaySink, DisplayCapabilities};
pub use error::{DisplayError, DisplayFactoryError, RenderSubmissionError};
pub use framebuffer::FrameBuffer;
pub use factory::{DisplayDriverFactory, BoxedDriver};
pub use layout::{DisplayGeometry, DrawPrimitive};
pub use bitmap::MonoImage;
pub use manager::DisplayManager;
pub use mode_controller::CycleState;

/// Display mode enum - controls what the bottom row shows
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DisplayMode {
    System, // CPU temperature and tower count
    Gps,    // satellites and fix quality
}

#[cfg(feature = "driver-ssd1306")]
pub use drivers::ssd1306::Ssd1306Driver;

#[cfg(feature = "driver-sh1106")]
pub use drivers::sh1106::Sh1106Driver;
