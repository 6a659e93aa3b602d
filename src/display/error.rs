/*
 *  display/error.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Why a frame or a panel refused to cooperate
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

use std::error::Error;
use std::fmt;

/// Everything that can go wrong between a laid-out frame and the glass.
///
/// A failed [`DisplaySink::submit`](crate::display::DisplaySink::submit)
/// drops the whole frame; the cycle logs it and carries on with the next poll.
#[derive(Debug)]
pub enum DisplayError {
    /// Controller rejected its init sequence
    InitializationFailed(String),
    /// Bus could not be opened, or a transfer failed
    I2cError(String),
    /// Panel options this driver cannot honour
    InvalidConfiguration(String),
    /// Feature the controller lacks, e.g. a quarter-turn rotation
    UnsupportedOperation,
    InvalidRotation(u16),
    /// Packed frame does not match the panel
    BufferSizeMismatch { expected: usize, actual: usize },
    /// A primitive could not be drawn into the framebuffer
    DrawingError(String),
    /// Raised by the ssd1306 crate's interface layer
    InterfaceError(display_interface::DisplayError),
    Other(String),
}

/// What the sink reports when a frame does not make it to the panel
pub type RenderSubmissionError = DisplayError;

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) => write!(f, "panel init: {}", msg),
            DisplayError::I2cError(msg) => write!(f, "i2c: {}", msg),
            DisplayError::InvalidConfiguration(msg) => write!(f, "panel config: {}", msg),
            DisplayError::UnsupportedOperation => write!(f, "not supported by this panel"),
            DisplayError::InvalidRotation(degrees) =>
                write!(f, "rotation {} is not one of 0, 90, 180, 270", degrees),
            DisplayError::BufferSizeMismatch { expected, actual } =>
                write!(f, "frame is {} bytes, panel wants {}", actual, expected),
            DisplayError::DrawingError(msg) => write!(f, "draw: {}", msg),
            DisplayError::InterfaceError(err) => write!(f, "display interface: {:?}", err),
            DisplayError::Other(msg) => f.write_str(msg),
        }
    }
}

// display_interface::DisplayError is not a std error, so there is no source to expose
impl Error for DisplayError {}

impl From<display_interface::DisplayError> for DisplayError {
    fn from(err: display_interface::DisplayError) -> Self {
        DisplayError::InterfaceError(err)
    }
}

impl From<linux_embedded_hal::I2CError> for DisplayError {
    fn from(err: linux_embedded_hal::I2CError) -> Self {
        DisplayError::I2cError(format!("{:?}", err))
    }
}

/// Reasons no driver came out of the factory
#[derive(Debug)]
pub enum DisplayFactoryError {
    /// Driver kind compiled out; carries the cargo feature to enable
    DriverDisabled(&'static str),
    DriverInitFailed(DisplayError),
    ConfigError(String),
}

impl fmt::Display for DisplayFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFactoryError::DriverDisabled(feature) =>
                write!(f, "driver not built in, rebuild with --features {}", feature),
            DisplayFactoryError::DriverInitFailed(err) => write!(f, "driver bring-up failed: {}", err),
            DisplayFactoryError::ConfigError(msg) => write!(f, "display config: {}", msg),
        }
    }
}

impl Error for DisplayFactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayFactoryError::DriverInitFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DisplayError> for DisplayFactoryError {
    fn from(err: DisplayError) -> Self {
        DisplayFactoryError::DriverInitFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_names_both_sizes() {
        let err = DisplayError::BufferSizeMismatch { expected: 1024, actual: 512 };
        assert_eq!(err.to_string(), "frame is 512 bytes, panel wants 1024");
    }

    #[test]
    fn test_bring_up_failure_keeps_its_cause() {
        let err = DisplayFactoryError::from(DisplayError::I2cError("no ack".to_string()));
        assert_eq!(err.to_string(), "driver bring-up failed: i2c: no ack");
        assert_eq!(err.source().map(|e| e.to_string()), Some("i2c: no ack".to_string()));
        assert!(DisplayFactoryError::DriverDisabled("driver-sh1106").source().is_none());
    }
}
