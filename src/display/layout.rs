/*
 *  display/layout.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Fixed row layout: two message-rate bars and a rotating status line
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

use log::warn;

use crate::config::LayoutConfig;
use crate::display::bitmap::MonoImage;
use crate::display::DisplayMode;
use crate::status::StatusSnapshot;

pub const UAT_HEADING: &str = "UAT";
pub const ES_HEADING: &str = "1090ES";

/// One drawing instruction, in canvas pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    /// Text with its top-left corner at (x, y)
    Text { x: i32, y: i32, text: String },

    /// Outlined and filled rectangle, both corners inclusive
    FilledRect { x0: i32, y0: i32, x1: i32, y1: i32 },

    /// 1-bit image with its top-left corner at (x, y)
    Image { x: i32, y: i32, image: MonoImage },
}

impl DrawPrimitive {
    pub fn text(x: u32, y: u32, text: impl Into<String>) -> Self {
        DrawPrimitive::Text { x: x as i32, y: y as i32, text: text.into() }
    }
}

/// Canvas geometry, computed once from the panel size
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayGeometry {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub text_margin: u32,
    pub bar_width: u32,
    pub rows: [u32; 5],
    pub uat_indent: u32,
    pub es_indent: u32,
    /// Longest bar in pixels
    pub bar_length: u32,
}

impl DisplayGeometry {
    pub fn new(width: u32, height: u32, layout: &LayoutConfig) -> Self {
        let inset = layout.padding.saturating_add(layout.text_margin);
        let bar_length = width.saturating_sub(inset.saturating_mul(2));
        if bar_length == 0 {
            warn!(
                "Canvas width {} leaves no room for bars (padding {}, text margin {})",
                width, layout.padding, layout.text_margin
            );
        }

        Self {
            width,
            height,
            padding: layout.padding,
            text_margin: layout.text_margin,
            bar_width: layout.bar_width,
            rows: layout.rows,
            uat_indent: layout.uat_indent,
            es_indent: layout.es_indent,
            bar_length,
        }
    }

    /// Left edge of every bar
    pub fn bar_x(&self) -> u32 {
        self.padding.saturating_add(self.text_margin)
    }

    /// Where the max label goes, just right of a full bar
    pub fn max_label_x(&self) -> u32 {
        self.bar_x()
            .saturating_add(self.padding)
            .saturating_add(self.bar_length)
    }
}

/// Filled pixels for one channel bar.
///
/// The ratio is floored before it is scaled, so anything short of `max`
/// draws an empty bar and anything at or above it draws a full one.
pub fn bar_value(last_minute: u64, max: u64, bar_length: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let ratio = last_minute / max;
    let scaled = (bar_length as u64).saturating_mul(ratio);
    scaled.min(bar_length as u64) as u32
}

/// Bottom row text for the given mode
pub fn status_line(snapshot: &StatusSnapshot, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::System => format!(
            "CPU: {:.1}C, Towers: {}",
            snapshot.cpu_temperature, snapshot.tower_count
        ),
        DisplayMode::Gps => {
            let mut line = format!(
                "GPS Sat: {}/{}/{}",
                snapshot.gps_satellites_locked,
                snapshot.gps_satellites_seen,
                snapshot.gps_satellites_tracked
            );
            if snapshot.has_waas() {
                line.push_str(" (WAAS)");
            }
            line
        }
    }
}

fn channel_bar(
    geometry: &DisplayGeometry,
    row: u32,
    last_minute: u64,
    max: u64,
    frame: &mut Vec<DrawPrimitive>,
) {
    let x0 = geometry.bar_x();
    let fill = bar_value(last_minute, max, geometry.bar_length);

    frame.push(DrawPrimitive::FilledRect {
        x0: x0 as i32,
        y0: row as i32,
        x1: x0.saturating_add(fill) as i32,
        y1: row.saturating_add(geometry.bar_width) as i32,
    });
    frame.push(DrawPrimitive::text(geometry.padding, row, last_minute.to_string()));
    frame.push(DrawPrimitive::text(geometry.max_label_x(), row, max.to_string()));
}

/// Build the frame for one snapshot
pub fn render(snapshot: &StatusSnapshot, mode: DisplayMode, geometry: &DisplayGeometry) -> Vec<DrawPrimitive> {
    let rows = &geometry.rows;
    let mut frame = Vec::with_capacity(9);

    frame.push(DrawPrimitive::text(geometry.uat_indent, rows[0], UAT_HEADING));
    channel_bar(
        geometry,
        rows[1],
        snapshot.uat_messages_last_minute,
        snapshot.uat_messages_max,
        &mut frame,
    );

    frame.push(DrawPrimitive::text(geometry.es_indent, rows[2], ES_HEADING));
    channel_bar(
        geometry,
        rows[3],
        snapshot.es_messages_last_minute,
        snapshot.es_messages_max,
        &mut frame,
    );

    frame.push(DrawPrimitive::text(geometry.padding, rows[4], status_line(snapshot, mode)));
    frame
}

/// Top-left corner that centres an image, flush to the origin when it does not fit
pub fn splash_offset(canvas: (u32, u32), image: (u32, u32)) -> (i32, i32) {
    let centre = |outer: u32, inner: u32| (outer.saturating_sub(inner) / 2) as i32;
    (centre(canvas.0, image.0), centre(canvas.1, image.1))
}
