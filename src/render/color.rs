//! Sequential colour scales for value-encoded cells and surfaces.
//!
//! Each scale is a list of evenly spaced anchors; colours in between are
//! linear blends of the two nearest anchors.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScale {
    /// Yellow → orange → red.
    YlOrRd,
    /// White → dark blue.
    Blues,
    /// Purple → teal → yellow.
    Viridis,
}

const YL_OR_RD: [(u8, u8, u8); 9] = [
    (0xff, 0xff, 0xcc),
    (0xff, 0xed, 0xa0),
    (0xfe, 0xd9, 0x76),
    (0xfe, 0xb2, 0x4c),
    (0xfd, 0x8d, 0x3c),
    (0xfc, 0x4e, 0x2a),
    (0xe3, 0x1a, 0x1c),
    (0xbd, 0x00, 0x26),
    (0x80, 0x00, 0x26),
];

const BLUES: [(u8, u8, u8); 9] = [
    (0xf7, 0xfb, 0xff),
    (0xde, 0xeb, 0xf7),
    (0xc6, 0xdb, 0xef),
    (0x9e, 0xca, 0xe1),
    (0x6b, 0xae, 0xd6),
    (0x42, 0x92, 0xc6),
    (0x21, 0x71, 0xb5),
    (0x08, 0x51, 0x9c),
    (0x08, 0x30, 0x6b),
];

const VIRIDIS: [(u8, u8, u8); 10] = [
    (0x44, 0x01, 0x54),
    (0x48, 0x28, 0x78),
    (0x3e, 0x49, 0x89),
    (0x31, 0x68, 0x8e),
    (0x26, 0x82, 0x8e),
    (0x1f, 0x9e, 0x89),
    (0x35, 0xb7, 0x79),
    (0x6e, 0xce, 0x58),
    (0xb5, 0xde, 0x2b),
    (0xfd, 0xe7, 0x25),
];

impl ColorScale {
    fn anchors(self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorScale::YlOrRd => &YL_OR_RD,
            ColorScale::Blues => &BLUES,
            ColorScale::Viridis => &VIRIDIS,
        }
    }

    /// Colour at `t` in [0, 1]; out-of-range input is clamped.
    pub fn at(self, t: f64) -> RGBColor {
        let anchors = self.anchors();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (anchors.len() - 1) as f64;
        let lo = (pos.floor() as usize).min(anchors.len() - 2);
        let s = pos - lo as f64;
        let (a, b) = (anchors[lo], anchors[lo + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * s).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }

    /// Colour for `value` inside `[lo, hi]`. A flat range maps to the middle.
    pub fn map(self, value: f64, lo: f64, hi: f64) -> RGBColor {
        let span = hi - lo;
        let t = if span.abs() < 1e-12 {
            0.5
        } else {
            (value - lo) / span
        };
        self.at(t)
    }
}

/// Relative luminance in [0, 1], used to pick a readable annotation colour.
pub fn luminance(color: &RGBColor) -> f64 {
    let RGBColor(r, g, b) = *color;
    (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) / 255.0
}
