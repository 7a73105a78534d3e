//! Colours, palette and axis helpers shared by both panels.

use plotters::prelude::*;

/// Nord-flavoured series palette, cycled by index.
pub const PALETTE: [RGBColor; 5] = [
    RGBColor(0x4C, 0x56, 0x6A), // #4C566A
    RGBColor(0x5E, 0x81, 0xAC), // #5E81AC
    RGBColor(0x88, 0xC0, 0xD0), // #88C0D0
    RGBColor(0x8F, 0xBC, 0xBB), // #8FBCBB
    RGBColor(0x81, 0xA1, 0xC1), // #81A1C1
];

pub const FIGURE_BG: RGBColor = RGBColor(0xEC, 0xEF, 0xF4); // #ECEFF4
pub const PANEL_BG: RGBColor = RGBColor(0xE5, 0xE9, 0xF0); // #E5E9F0
pub const GRID: RGBColor = RGBColor(0xD8, 0xDE, 0xE9); // #D8DEE9
pub const TITLE_TEXT: RGBColor = RGBColor(0x2E, 0x34, 0x40); // #2E3440
pub const AXIS_TEXT: RGBColor = RGBColor(0x4C, 0x56, 0x6A); // #4C566A

/// Palette colour for a position; wraps around.
#[inline]
pub fn palette_color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Pad a value range by `frac` of its span on both sides.
/// A degenerate (single-value) range is widened to ±0.5.
pub fn padded_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    (min - span * frac, max + span * frac)
}

/// Year axis bounds; a single year is widened by one on each side.
pub fn year_range(min_year: i32, max_year: i32) -> (f64, f64) {
    if min_year == max_year {
        ((min_year - 1) as f64, (max_year + 1) as f64)
    } else {
        (min_year as f64, max_year as f64)
    }
}
