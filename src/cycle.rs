/*
 *  cycle.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Display cycle - splash once, then poll, lay out and draw forever
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

use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::LayoutConfig;
use crate::display::layout::{self, DisplayGeometry, DrawPrimitive};
use crate::display::{CycleState, DisplayMode, DisplaySink, MonoImage};
use crate::status::StatusSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Splash,
    Running,
}

/// What one pass of the loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was drawn in this mode
    Rendered(DisplayMode),
    /// No snapshot this time, nothing drawn
    Skipped,
    /// Snapshot was good but the panel refused the frame
    RenderFailed(DisplayMode),
}

struct Splash {
    image: MonoImage,
    hold: Duration,
}

/// The status loop. Owns the data source, the sink and the mode counter.
pub struct DisplayCycle<S: StatusSource, D: DisplaySink> {
    source: S,
    sink: D,
    geometry: DisplayGeometry,
    state: CycleState,
    phase: CyclePhase,
    period: Duration,
    splash: Option<Splash>,
    consecutive_failures: u32,
}

impl<S: StatusSource, D: DisplaySink> DisplayCycle<S, D> {
    pub fn new(source: S, sink: D, layout: &LayoutConfig, period: Duration) -> Self {
        let (width, height) = sink.canvas_size();
        let geometry = DisplayGeometry::new(width, height, layout);
        debug!("Bar length {} px on a {}x{} canvas", geometry.bar_length, width, height);

        Self {
            source,
            sink,
            geometry,
            state: CycleState::new(),
            phase: CyclePhase::Splash,
            period,
            splash: None,
            consecutive_failures: 0,
        }
    }

    /// Show `image` centred for `hold` before the first poll
    pub fn with_splash(mut self, image: MonoImage, hold: Duration) -> Self {
        self.splash = Some(Splash { image, hold });
        self
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Draw the logo and hold it, then move to Running whatever happened
    pub async fn show_splash(&mut self) {
        if let Some(splash) = self.splash.take() {
            let (x, y) = layout::splash_offset(self.sink.canvas_size(), splash.image.size());
            let frame = [DrawPrimitive::Image { x, y, image: splash.image }];

            match self.sink.submit(&frame) {
                Ok(()) => tokio::time::sleep(splash.hold).await,
                Err(e) => warn!("Splash not shown: {}", e),
            }
        }
        self.phase = CyclePhase::Running;
    }

    /// One poll: fetch, lay out, submit, step the counter.
    ///
    /// An acquisition failure leaves the counter alone. A failed submit still
    /// steps it since the snapshot was good.
    pub async fn tick(&mut self) -> TickOutcome {
        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!("Status unavailable ({} in a row): {}", self.consecutive_failures, e);
                return TickOutcome::Skipped;
            }
        };

        if self.consecutive_failures > 0 {
            info!("Status feed back after {} skipped polls", self.consecutive_failures);
            self.consecutive_failures = 0;
        }

        let mode = self.state.mode();
        let frame = layout::render(&snapshot, mode, &self.geometry);
        let outcome = match self.sink.submit(&frame) {
            Ok(()) => TickOutcome::Rendered(mode),
            Err(e) => {
                error!("Failed to render {:?} frame: {}", mode, e);
                TickOutcome::RenderFailed(mode)
            }
        };

        self.state.advance();
        outcome
    }

    /// Splash if still pending, then sleep and tick until the task is dropped
    pub async fn run(&mut self) {
        if self.phase == CyclePhase::Splash {
            self.show_splash().await;
        }

        info!("Polling status every {:?}", self.period);
        loop {
            tokio::time::sleep(self.period).await;
            self.tick().await;
        }
    }

    /// Blank the panel on the way out
    pub fn shutdown(&mut self) {
        if let Err(e) = self.sink.clear() {
            warn!("Failed to clear display on shutdown: {}", e);
        }
    }
}
