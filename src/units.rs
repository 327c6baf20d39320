// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use svgshape_types::{Color, Length, LengthUnit as Unit};

use crate::tree::Diagnostics;

/// An axis used to resolve percent lengths.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Axis {
    X,
    Y,
    /// Used by radii and stroke properties.
    Diagonal,
}

/// A rectangle percent lengths are resolved against.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Viewport {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Diagonal => 0.0,
        }
    }

    pub fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Diagonal => {
                let len = self.width.powi(2) + self.height.powi(2);
                (len / 2.0).sqrt()
            }
        }
    }
}

/// Converts element lengths into user units.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Resolver {
    pub dpi: f64,
    pub viewport: Viewport,
    pub font_size: f64,
}

impl Resolver {
    /// Converts a coordinate. Percents are offset by the viewport origin.
    pub fn coordinate(&self, length: Length, axis: Axis) -> f64 {
        let vp = &self.viewport;
        convert_length(length, vp.origin(axis), vp.length(axis), self.dpi, self.font_size)
    }

    /// Converts a size, like `width` or `r`.
    pub fn size(&self, length: Length, axis: Axis) -> f64 {
        convert_length(length, 0.0, self.viewport.length(axis), self.dpi, self.font_size)
    }
}

/// Converts a length into pixels.
///
/// `origin` and `len` are used only by percent values.
pub(crate) fn convert_length(length: Length, origin: f64, len: f64, dpi: f64, font_size: f64) -> f64 {
    let n = length.number;
    match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * font_size,
        Unit::Ex => n * font_size / 2.0,
        Unit::In => n * dpi,
        Unit::Cm => n * dpi / 2.54,
        Unit::Mm => n * dpi / 25.4,
        Unit::Pt => n * dpi / 72.0,
        Unit::Pc => n * dpi / 6.0,
        Unit::Percent => origin + len * n / 100.0,
    }
}

/// Converts a `font-size` value relative to the parent one.
pub(crate) fn convert_font_size(value: &str, parent: f64, dpi: f64, diag: &mut Diagnostics) -> f64 {
    match Length::from_str(value) {
        Ok(length) => match length.unit {
            // Percent, em and ex are relative to the parent font size.
            Unit::Percent => length.number * parent * 0.01,
            _ => convert_length(length, 0.0, 0.0, dpi, parent),
        },
        Err(_) => convert_named_font_size(value.trim(), parent, diag),
    }
}

fn convert_named_font_size(name: &str, parent_font_size: f64, diag: &mut Diagnostics) -> f64 {
    let factor = match name {
        "xx-small" => -3,
        "x-small" => -2,
        "small" => -1,
        "medium" => 0,
        "large" => 1,
        "x-large" => 2,
        "xx-large" => 3,
        "smaller" => -1,
        "larger" => 1,
        _ => {
            log::warn!("Invalid 'font-size' value: '{}'.", name);
            diag.invalid_numbers += 1;
            0
        }
    };

    // 'On a computer screen a scaling factor of 1.2 is suggested between adjacent indexes.'
    parent_font_size * 1.2f64.powi(factor)
}

/// Parses a number, falling back to zero.
pub(crate) fn parse_number_lossy(value: &str, diag: &mut Diagnostics) -> f64 {
    match svgshape_types::Number::from_str(value) {
        Ok(n) => n.0,
        Err(e) => {
            log::warn!("Failed to parse a number from '{}' cause {}.", value, e);
            diag.invalid_numbers += 1;
            lossy_number_prefix(value)
        }
    }
}

// A number followed by garbage keeps the number, a missing number is zero.
fn lossy_number_prefix(value: &str) -> f64 {
    let mut s = svgshape_types::Stream::from(value);
    s.parse_number().unwrap_or(0.0)
}

/// Parses a length, falling back to a zero length.
pub(crate) fn parse_length_lossy(value: &str, diag: &mut Diagnostics) -> Length {
    match Length::from_str(value) {
        Ok(length) => length,
        Err(e) => {
            log::warn!("Failed to parse a length from '{}' cause {}.", value, e);
            diag.invalid_numbers += 1;
            let mut s = svgshape_types::Stream::from(value);
            s.parse_length().unwrap_or_default()
        }
    }
}

/// Parses a color.
///
/// A malformed `rgb()` falls back to gray, anything else to black.
pub(crate) fn parse_color_lossy(value: &str, diag: &mut Diagnostics) -> Color {
    match Color::from_str(value) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Failed to parse a color from '{}' cause {}.", value, e);
            diag.invalid_colors += 1;
            fallback_color(value)
        }
    }
}

pub(crate) fn fallback_color(value: &str) -> Color {
    let value = value.trim_start();
    let is_rgb = value
        .get(..4)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("rgb("));
    if is_rgb {
        Color::gray()
    } else {
        Color::black()
    }
}

/// Parses a number or a percent and clamps it to the 0..1 range.
pub(crate) fn parse_opacity(value: &str, diag: &mut Diagnostics) -> f64 {
    let length = parse_length_lossy(value, diag);
    let n = match length.unit {
        Unit::Percent => length.number / 100.0,
        _ => length.number,
    };

    n.max(0.0).min(1.0)
}
