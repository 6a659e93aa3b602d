/*
 *  display/drivers/mock.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Mock display driver for testing without hardware
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
use crate::display::framebuffer::unpack_into;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};
use crate::vframebuf::VarFrameBuf;

use std::sync::{Arc, Mutex};

/// Mock display driver for testing
///
/// Frames staged by `write_buffer` only reach the simulated panel on
/// `flush`. Clones share the panel and counters, so a test can keep a
/// handle while the display manager owns the boxed driver.
#[derive(Debug, Clone)]
pub struct MockDriver {
    /// Frame staged by write_buffer
    staged: VarFrameBuf<BinaryColor>,

    /// Display capabilities
    capabilities: DisplayCapabilities,

    /// Shared state for testing
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug)]
pub struct MockDriverState {
    /// What the panel currently shows
    pub panel: VarFrameBuf<BinaryColor>,

    /// Number of times init() was called
    pub init_count: usize,

    /// Number of times flush() succeeded
    pub flush_count: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Last brightness value set
    pub last_brightness: Option<u8>,

    /// Last rotation set
    pub last_rotation: Option<u16>,

    /// Last invert state set
    pub last_invert: Option<bool>,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    /// Total bytes written via write_buffer
    pub bytes_written: usize,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
    pub simulate_init_failure: bool,
}

impl MockDriver {
    /// Create a mock driver with specific dimensions
    pub fn new(width: u32, height: u32) -> Self {
        let capabilities = DisplayCapabilities {
            name: "mock",
            width,
            height,
            supports_rotation: true,
            supports_brightness: true,
            supports_invert: true,
        };

        let state = MockDriverState {
            panel: VarFrameBuf::new(width, height, BinaryColor::Off),
            init_count: 0,
            flush_count: 0,
            clear_count: 0,
            last_brightness: None,
            last_rotation: None,
            last_invert: None,
            is_initialized: false,
            bytes_written: 0,
            simulate_flush_failure: false,
            simulate_init_failure: false,
        };

        Self {
            staged: VarFrameBuf::new(width, height, BinaryColor::Off),
            capabilities,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    /// Whether the panel pixel at (x, y) is lit
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        self.state.lock().unwrap().panel.get(x, y) == Some(BinaryColor::On)
    }

    /// Count number of lit panel pixels
    pub fn lit_pixels(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .panel
            .as_slice()
            .iter()
            .filter(|&&p| p == BinaryColor::On)
            .count()
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();

        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.state.lock().unwrap().last_brightness = Some(value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();

        if state.simulate_flush_failure {
            return Err(DisplayError::I2cError("Simulated flush failure".to_string()));
        }

        state.panel = self.staged.clone();
        state.flush_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.state.lock().unwrap().clear_count += 1;
        self.staged.clear_color(BinaryColor::Off);
        self.flush()
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        unpack_into(buffer, &mut self.staged)?;
        self.state.lock().unwrap().bytes_written += buffer.len();
        Ok(())
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.state.lock().unwrap().last_invert = Some(inverted);
        Ok(())
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if !matches!(degrees, 0 | 90 | 180 | 270) {
            return Err(DisplayError::InvalidRotation(degrees));
        }
        self.state.lock().unwrap().last_rotation = Some(degrees);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new(128, 64);
        assert_eq!(driver.dimensions(), (128, 64));
        assert_eq!(driver.lit_pixels(), 0);
    }

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new(128, 64);

        let state = driver.state();
        assert_eq!(state.lock().unwrap().init_count, 0);
        assert!(!state.lock().unwrap().is_initialized);

        driver.init().unwrap();

        assert_eq!(state.lock().unwrap().init_count, 1);
        assert!(state.lock().unwrap().is_initialized);
    }

    #[test]
    fn test_write_is_invisible_until_flush() {
        let mut driver = MockDriver::new(16, 8);
        let mut frame = vec![0u8; 16];
        frame[0] = 0b0000_0001;

        driver.write_buffer(&frame).unwrap();
        assert!(!driver.pixel(0, 0));

        driver.flush().unwrap();
        assert!(driver.pixel(0, 0));
        assert_eq!(driver.lit_pixels(), 1);
        assert_eq!(driver.state().lock().unwrap().bytes_written, 16);
    }

    #[test]
    fn test_write_rejects_wrong_size() {
        let mut driver = MockDriver::new(128, 64);
        let result = driver.write_buffer(&[0u8; 10]);
        assert!(matches!(result, Err(DisplayError::BufferSizeMismatch { expected: 1024, actual: 10 })));
    }

    #[test]
    fn test_failed_flush_leaves_panel_untouched() {
        let mut driver = MockDriver::new(16, 8);
        driver.state().lock().unwrap().simulate_flush_failure = true;

        driver.write_buffer(&[0xFF; 16]).unwrap();
        assert!(driver.flush().is_err());
        assert_eq!(driver.lit_pixels(), 0);
    }

    #[test]
    fn test_mock_driver_clear() {
        let mut driver = MockDriver::new(16, 8);
        driver.write_buffer(&[0xFF; 16]).unwrap();
        driver.flush().unwrap();
        assert_eq!(driver.lit_pixels(), 128);

        driver.clear().unwrap();

        assert_eq!(driver.lit_pixels(), 0);
        assert_eq!(driver.state().lock().unwrap().clear_count, 1);
    }

    #[test]
    fn test_mock_driver_options() {
        let mut driver = MockDriver::new(128, 64);

        driver.set_brightness(200).unwrap();
        driver.set_invert(true).unwrap();
        driver.set_rotation(180).unwrap();
        assert!(driver.set_rotation(45).is_err());

        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.last_brightness, Some(200));
        assert_eq!(state.last_invert, Some(true));
        assert_eq!(state.last_rotation, Some(180));
    }
}
