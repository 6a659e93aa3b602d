/*
 *  display/drivers/ssd1306.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  SSD1306 OLED display driver implementation
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

use linux_embedded_hal::I2cdev;
use ssd1306::{
    mode::BufferedGraphicsMode,
    prelude::*,
    size::{DisplaySize128x64, DisplaySize128x32},
    I2CDisplayInterface,
    Ssd1306,
};

use embedded_graphics::prelude::*;
use embedded_graphics::pixelcolor::BinaryColor;

use crate::config::DisplayConfig as PanelConfig;
use crate::display::error::DisplayError;
use crate::display::framebuffer::unpack_into;
use crate::display::traits::{DisplayDriver, DisplayCapabilities};
use crate::vframebuf::VarFrameBuf;

use log::info;

/// SSD1306 display driver wrapper
pub struct Ssd1306Driver {
    /// The underlying ssd1306 driver
    display: Ssd1306Variants,

    /// Frame staged by write_buffer
    framebuffer: VarFrameBuf<BinaryColor>,

    /// Display capabilities
    capabilities: DisplayCapabilities,
}

/// Enum to handle different SSD1306 display sizes
enum Ssd1306Variants {
    Size128x64(Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>),
    Size128x32(Ssd1306<I2CInterface<I2cdev>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>),
}

/// Run the same body against whichever panel size is attached
macro_rules! with_display {
    ($variants:expr, $display:ident => $body:expr) => {
        match $variants {
            Ssd1306Variants::Size128x64($display) => $body,
            Ssd1306Variants::Size128x32($display) => $body,
        }
    };
}

fn brightness_level(value: u8) -> Brightness {
    match value {
        0..=63 => Brightness::DIMMEST,
        64..=127 => Brightness::DIM,
        128..=191 => Brightness::NORMAL,
        _ => Brightness::BRIGHTEST,
    }
}

/// Landscape orientations only; the canvas is sized once from the panel
fn panel_rotation(degrees: u16) -> Result<DisplayRotation, DisplayError> {
    match degrees {
        0 => Ok(DisplayRotation::Rotate0),
        180 => Ok(DisplayRotation::Rotate180),
        90 | 270 => Err(DisplayError::UnsupportedOperation),
        _ => Err(DisplayError::InvalidRotation(degrees)),
    }
}

impl Ssd1306Driver {
    /// Open the I2C bus and bring up an SSD1306 panel
    ///
    /// Brightness, inversion and rotation from `config` are applied once the
    /// controller is initialised.
    pub fn new_i2c(config: &PanelConfig) -> Result<Self, DisplayError> {
        let bus = config.i2c.bus.as_str();
        let address = config.i2c.address;
        info!("Initializing SSD1306 on {} at address 0x{:02X}", bus, address);

        // Open I2C device
        let i2c = I2cdev::new(bus)
            .map_err(|e| DisplayError::I2cError(format!("Failed to open {}: {}", bus, e)))?;

        // Determine display size from config or default to 128x64
        let width = config.width.unwrap_or(128);
        let height = config.height.unwrap_or(64);

        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = match (width, height) {
            (128, 64) => Ssd1306Variants::Size128x64(
                Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                    .into_buffered_graphics_mode(),
            ),
            (128, 32) => Ssd1306Variants::Size128x32(
                Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
                    .into_buffered_graphics_mode(),
            ),
            _ => {
                return Err(DisplayError::InvalidConfiguration(
                    format!("Unsupported SSD1306 size: {}x{}", width, height)
                ));
            }
        };

        let capabilities = DisplayCapabilities {
            name: "SSD1306",
            width,
            height,
            supports_rotation: true,
            supports_brightness: true,
            supports_invert: true,
        };

        let mut driver = Self {
            display,
            framebuffer: VarFrameBuf::new(width, height, BinaryColor::Off),
            capabilities,
        };
        driver.init()?;

        // Apply configuration options
        if let Some(brightness) = config.brightness {
            driver.set_brightness(brightness)?;
        }

        if let Some(invert) = config.invert {
            driver.set_invert(invert)?;
        }

        if let Some(rotation) = config.rotate_deg {
            driver.set_rotation(rotation)?;
        }

        info!("SSD1306 initialized successfully ({}x{})", width, height);

        Ok(driver)
    }
}

impl DisplayDriver for Ssd1306Driver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        with_display!(&mut self.display, display => {
            display.init()
                .map_err(|e| DisplayError::InitializationFailed(format!("SSD1306 init failed: {:?}", e)))
        })
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        let brightness = brightness_level(value);
        with_display!(&mut self.display, display => {
            display.set_brightness(brightness)
                .map_err(|e| DisplayError::Other(format!("Set brightness failed: {:?}", e)))
        })
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let lit = self.framebuffer.pixels().filter(|Pixel(_, color)| color.is_on());
        with_display!(&mut self.display, display => {
            display.clear_buffer();
            display.draw_iter(lit)?;
            display.flush()?;
            Ok(())
        })
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.framebuffer.clear_color(BinaryColor::Off);
        self.flush()
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        unpack_into(buffer, &mut self.framebuffer)
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        with_display!(&mut self.display, display => {
            display.set_invert(inverted)
                .map_err(|e| DisplayError::Other(format!("Set invert failed: {:?}", e)))
        })
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        let rotation = panel_rotation(degrees)?;
        with_display!(&mut self.display, display => {
            display.set_rotation(rotation)
                .map_err(|e| DisplayError::Other(format!("Set rotation failed: {:?}", e)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_rotation_is_landscape_only() {
        assert!(matches!(panel_rotation(0), Ok(DisplayRotation::Rotate0)));
        assert!(matches!(panel_rotation(180), Ok(DisplayRotation::Rotate180)));
        assert!(matches!(panel_rotation(90), Err(DisplayError::UnsupportedOperation)));
        assert!(matches!(panel_rotation(270), Err(DisplayError::UnsupportedOperation)));
        assert!(matches!(panel_rotation(45), Err(DisplayError::InvalidRotation(45))));
    }

    #[test]
    fn test_missing_bus_is_i2c_error() {
        let config = PanelConfig {
            i2c: crate::config::I2cConfig {
                bus: "/dev/i2c-does-not-exist".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(Ssd1306Driver::new_i2c(&config), Err(DisplayError::I2cError(_))));
    }
}
