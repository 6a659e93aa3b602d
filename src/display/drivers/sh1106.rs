/*
 *  display/drivers/sh1106.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  SH1106 OLED display driver, raw command stream over embedded-hal I2C
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

use embedded_hal::i2c::I2c;
use embedded_graphics::pixelcolor::BinaryColor;
use linux_embedded_hal::I2cdev;

use crate::config::DisplayConfig;
use crate::display::error::DisplayError;
use crate::display::framebuffer::unpack_into;
use crate::display::traits::{DisplayDriver, DisplayCapabilities};
use crate::vframebuf::VarFrameBuf;

use log::info;

const WIDTH: u32 = 128;
const HEIGHT: u32 = 64;
const PAGES: u32 = HEIGHT / 8;

/// Controller RAM is 132 columns wide, the glass shows the middle 128
const COLUMN_OFFSET: u8 = 2;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

const DISPLAY_OFF: u8 = 0xAE;
const DISPLAY_ON: u8 = 0xAF;
const SET_CONTRAST: u8 = 0x81;
const NORMAL_DISPLAY: u8 = 0xA6;
const INVERT_DISPLAY: u8 = 0xA7;
const SEGMENT_REMAP_NORMAL: u8 = 0xA0;
const SEGMENT_REMAP_FLIPPED: u8 = 0xA1;
const COM_SCAN_INC: u8 = 0xC0;
const COM_SCAN_DEC: u8 = 0xC8;
const PAGE_ADDRESS: u8 = 0xB0;

const INIT_SEQUENCE: &[u8] = &[
    DISPLAY_OFF,
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 1/64
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0xAD, 0x8B, // charge pump on
    SEGMENT_REMAP_FLIPPED,
    COM_SCAN_DEC,
    0xDA, 0x12, // COM pins
    SET_CONTRAST, 0x80,
    0xD9, 0x22, // precharge
    0xDB, 0x35, // VCOMH
    0xA4,       // resume from RAM
    NORMAL_DISPLAY,
    DISPLAY_ON,
];

/// Column-major page bytes for one 8-row page; bit n is row page*8+n
fn page_bytes(fb: &VarFrameBuf<BinaryColor>, page: u32, out: &mut [u8]) {
    for (x, byte) in out.iter_mut().enumerate() {
        let mut value = 0u8;
        for bit in 0..8 {
            if fb.get(x as u32, page * 8 + bit) == Some(BinaryColor::On) {
                value |= 1 << bit;
            }
        }
        *byte = value;
    }
}

/// SH1106 display driver
pub struct Sh1106Driver {
    i2c: I2cdev,
    address: u8,

    /// Frame staged by write_buffer
    framebuffer: VarFrameBuf<BinaryColor>,

    /// Display capabilities
    capabilities: DisplayCapabilities,
}

impl Sh1106Driver {
    /// Open the I2C bus and bring up an SH1106 panel (128x64 only)
    pub fn new_i2c(config: &DisplayConfig) -> Result<Self, DisplayError> {
        let bus = config.i2c.bus.as_str();
        let address = config.i2c.address;
        info!("Initializing SH1106 on {} at address 0x{:02X}", bus, address);

        let width = config.width.unwrap_or(WIDTH);
        let height = config.height.unwrap_or(HEIGHT);
        if (width, height) != (WIDTH, HEIGHT) {
            return Err(DisplayError::InvalidConfiguration(
                format!("Unsupported SH1106 size: {}x{}", width, height)
            ));
        }

        let i2c = I2cdev::new(bus)
            .map_err(|e| DisplayError::I2cError(format!("Failed to open {}: {}", bus, e)))?;

        let mut driver = Self {
            i2c,
            address,
            framebuffer: VarFrameBuf::new(WIDTH, HEIGHT, BinaryColor::Off),
            capabilities: DisplayCapabilities {
                name: "SH1106",
                width: WIDTH,
                height: HEIGHT,
                supports_rotation: true,
                supports_brightness: true,
                supports_invert: true,
            },
        };
        driver.init()?;

        if let Some(brightness) = config.brightness {
            driver.set_brightness(brightness)?;
        }

        if let Some(invert) = config.invert {
            driver.set_invert(invert)?;
        }

        if let Some(rotation) = config.rotate_deg {
            driver.set_rotation(rotation)?;
        }

        info!("SH1106 initialized successfully ({}x{})", WIDTH, HEIGHT);
        Ok(driver)
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let mut packet = Vec::with_capacity(bytes.len() + 1);
        packet.push(CONTROL_COMMAND);
        packet.extend_from_slice(bytes);
        I2c::write(&mut self.i2c, self.address, &packet)?;
        Ok(())
    }
}

impl DisplayDriver for Sh1106Driver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.command(INIT_SEQUENCE)
            .map_err(|e| DisplayError::InitializationFailed(format!("SH1106 init failed: {}", e)))
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.command(&[SET_CONTRAST, value])
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut packet = [0u8; WIDTH as usize + 1];
        packet[0] = CONTROL_DATA;

        for page in 0..PAGES {
            self.command(&[
                PAGE_ADDRESS | page as u8,
                COLUMN_OFFSET & 0x0F,
                0x10 | (COLUMN_OFFSET >> 4),
            ])?;
            page_bytes(&self.framebuffer, page, &mut packet[1..]);
            I2c::write(&mut self.i2c, self.address, &packet)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.framebuffer.clear_color(BinaryColor::Off);
        self.flush()
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        unpack_into(buffer, &mut self.framebuffer)
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.command(&[if inverted { INVERT_DISPLAY } else { NORMAL_DISPLAY }])
    }

    /// Only 0 and 180 are possible in hardware; the panel is not square
    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        match degrees {
            0 => self.command(&[SEGMENT_REMAP_FLIPPED, COM_SCAN_DEC]),
            180 => self.command(&[SEGMENT_REMAP_NORMAL, COM_SCAN_INC]),
            90 | 270 => Err(DisplayError::UnsupportedOperation),
            _ => Err(DisplayError::InvalidRotation(degrees)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_page_bytes_are_column_major() {
        let mut fb = VarFrameBuf::new(WIDTH, HEIGHT, BinaryColor::Off);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut fb).unwrap();
        Pixel(Point::new(0, 7), BinaryColor::On).draw(&mut fb).unwrap();
        Pixel(Point::new(5, 10), BinaryColor::On).draw(&mut fb).unwrap();

        let mut page0 = [0u8; WIDTH as usize];
        page_bytes(&fb, 0, &mut page0);
        assert_eq!(page0[0], 0b1000_0001);
        assert_eq!(page0[5], 0);

        let mut page1 = [0u8; WIDTH as usize];
        page_bytes(&fb, 1, &mut page1);
        assert_eq!(page1[5], 0b0000_0100);
        assert_eq!(page1.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn test_init_sequence_ends_with_display_on() {
        assert_eq!(INIT_SEQUENCE.first(), Some(&DISPLAY_OFF));
        assert_eq!(INIT_SEQUENCE.last(), Some(&DISPLAY_ON));
    }
}
