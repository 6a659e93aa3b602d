/*
 *  display/factory.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Display driver factory - picks and opens the configured panel
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

use crate::config::{DisplayConfig, DriverKind};
use crate::display::error::DisplayFactoryError;
use crate::display::traits::DisplayDriver;
use log::info;

#[cfg(feature = "driver-ssd1306")]
use crate::display::drivers::ssd1306::Ssd1306Driver;

#[cfg(feature = "driver-sh1106")]
use crate::display::drivers::sh1106::Sh1106Driver;

/// Type alias for boxed display driver trait objects
pub type BoxedDriver = Box<dyn DisplayDriver>;

/// Factory for creating display drivers from configuration
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// Create a display driver from configuration
    ///
    /// Opens the I2C bus, initialises the controller and applies the panel
    /// options. A driver kind that was compiled out of this build is a
    /// configuration error, not a panic.
    pub fn create_from_config(
        config: &DisplayConfig
    ) -> Result<BoxedDriver, DisplayFactoryError> {
        Self::validate_config(config)?;
        info!("Creating {:?} driver on {}", config.driver, config.i2c.bus);

        match config.driver {
            #[cfg(feature = "driver-ssd1306")]
            DriverKind::Ssd1306 => Ok(Box::new(Ssd1306Driver::new_i2c(config)?)),

            #[cfg(not(feature = "driver-ssd1306"))]
            DriverKind::Ssd1306 => Err(DisplayFactoryError::DriverDisabled("driver-ssd1306")),

            #[cfg(feature = "driver-sh1106")]
            DriverKind::Sh1106 => Ok(Box::new(Sh1106Driver::new_i2c(config)?)),

            #[cfg(not(feature = "driver-sh1106"))]
            DriverKind::Sh1106 => Err(DisplayFactoryError::DriverDisabled("driver-sh1106")),
        }
    }

    /// Validate a configuration without creating a driver
    ///
    /// This is useful for checking configuration at startup before attempting
    /// to initialize hardware.
    pub fn validate_config(config: &DisplayConfig) -> Result<(), DisplayFactoryError> {
        if config.i2c.bus.trim().is_empty() {
            return Err(DisplayFactoryError::ConfigError("I2C bus path is empty".to_string()));
        }

        if let Some(rotation) = config.rotate_deg {
            if !matches!(rotation, 0 | 90 | 180 | 270) {
                return Err(DisplayFactoryError::ConfigError(
                    format!("Invalid rotation angle: {} (must be 0, 90, 180, or 270)", rotation)
                ));
            }
            // the canvas is sized once from the landscape panel
            if matches!(rotation, 90 | 270) {
                return Err(DisplayFactoryError::ConfigError(
                    format!("{:?} cannot rotate by {} degrees", config.driver, rotation)
                ));
            }
        }

        let size = (config.width.unwrap_or(128), config.height.unwrap_or(64));
        let supported = match config.driver {
            DriverKind::Ssd1306 => matches!(size, (128, 64) | (128, 32)),
            DriverKind::Sh1106 => size == (128, 64),
        };
        if !supported {
            return Err(DisplayFactoryError::ConfigError(
                format!("{:?} does not support a {}x{} panel", config.driver, size.0, size.1)
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(DisplayDriverFactory::validate_config(&DisplayConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_config_empty_bus() {
        let mut config = DisplayConfig::default();
        config.i2c.bus = " ".to_string();

        assert!(DisplayDriverFactory::validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_rotation() {
        let config = DisplayConfig {
            rotate_deg: Some(45), // Invalid!
            ..Default::default()
        };

        assert!(DisplayDriverFactory::validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_quarter_turns() {
        for driver in [DriverKind::Ssd1306, DriverKind::Sh1106] {
            for rotate_deg in [90, 270] {
                let config = DisplayConfig {
                    driver,
                    rotate_deg: Some(rotate_deg),
                    ..Default::default()
                };
                assert!(matches!(
                    DisplayDriverFactory::validate_config(&config),
                    Err(DisplayFactoryError::ConfigError(_))
                ));
            }
        }

        let flipped = DisplayConfig {
            rotate_deg: Some(180),
            ..Default::default()
        };
        assert!(DisplayDriverFactory::validate_config(&flipped).is_ok());
    }

    #[test]
    fn test_validate_config_panel_sizes() {
        let short = DisplayConfig {
            height: Some(32),
            ..Default::default()
        };
        assert!(DisplayDriverFactory::validate_config(&short).is_ok());

        let sh1106_short = DisplayConfig {
            driver: DriverKind::Sh1106,
            height: Some(32),
            ..Default::default()
        };
        assert!(matches!(
            DisplayDriverFactory::validate_config(&sh1106_short),
            Err(DisplayFactoryError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_bus_fails_at_open() {
        let mut config = DisplayConfig::default();
        config.i2c.bus = "/dev/i2c-does-not-exist".to_string();

        assert!(DisplayDriverFactory::create_from_config(&config).is_err());
    }
}
