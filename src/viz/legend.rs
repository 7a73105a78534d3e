//! Legend column drawn to the right of the trend panel.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width};
use super::util::AXIS_TEXT;

/// Pixel geometry of the legend; shared by the width estimate and the drawing.
#[derive(Debug, Clone, Copy)]
pub struct LegendMetrics {
    pub font_px: u32,
    pub sample_w: i32,
    pub gap: i32,
    pub pad: i32,
    pub stroke: u32,
}

impl LegendMetrics {
    pub fn for_font(font_px: u32) -> Self {
        let f = font_px as i32;
        Self {
            font_px,
            sample_w: f * 2,
            gap: (f / 2).max(4),
            pad: f,
            stroke: (font_px / 6).max(2),
        }
    }

    /// Width needed to show every label untruncated.
    pub fn preferred_width_px(&self, labels: &[String]) -> i32 {
        let text_w = labels
            .iter()
            .map(|l| estimate_text_width_px(l, self.font_px) as i32)
            .max()
            .unwrap_or(0);
        self.pad * 2 + self.sample_w + self.gap + text_w
    }
}

/// Draw one row per item: a short line sample in the series colour, then the label.
/// `top_px` aligns the first row with the top of the plotting area.
pub fn draw_legend_column<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBColor)],
    metrics: LegendMetrics,
    top_px: i32,
) -> Result<()> {
    let (w_u32, _) = area.dim_in_pixel();
    let w = w_u32 as i32;
    let line_h = metrics.font_px as i32 * 3 / 2;
    let text_x = metrics.pad + metrics.sample_w + metrics.gap;
    let max_text_w = (w - text_x - metrics.pad).max(8) as u32;

    let label_style = FontDesc::new(FontFamily::SansSerif, metrics.font_px as f64, FontStyle::Normal)
        .color(&AXIS_TEXT)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (i, (label, color)) in items.iter().enumerate() {
        let y = top_px + line_h / 2 + i as i32 * line_h;
        area.draw(&PathElement::new(
            vec![(metrics.pad, y), (metrics.pad + metrics.sample_w, y)],
            color.stroke_width(metrics.stroke),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let text = truncate_to_width(label, metrics.font_px, max_text_w);
        area.draw(&Text::new(text, (text_x, y), label_style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}
