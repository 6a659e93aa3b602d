/*
 *  display/mode_controller.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Display mode controller - alternates the bottom row between system
 *  health and GPS details on a fixed tick count
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

use super::DisplayMode;

/// Ticks in one full primary + secondary cycle
pub const CYCLE_LENGTH: u8 = 10;

/// Ticks spent in the primary mode before switching
pub const MODE_SPAN: u8 = 5;

/// Tick counter driving the bottom row mode
///
/// The counter is always in 1..=CYCLE_LENGTH. It only moves when a frame
/// was built from fresh data, so a dead status feed freezes the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleState {
    counter: u8,
}

impl Default for CycleState {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleState {
    pub fn new() -> Self {
        Self { counter: 1 }
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Mode for the current tick
    pub fn mode(&self) -> DisplayMode {
        if self.counter <= MODE_SPAN {
            DisplayMode::System
        } else {
            DisplayMode::Gps
        }
    }

    /// Step to the next tick, wrapping after CYCLE_LENGTH
    pub fn advance(&mut self) -> DisplayMode {
        self.counter = self.counter % CYCLE_LENGTH + 1;
        self.mode()
    }
}
