//! Report Renderer: compose the two-panel fertility dashboard as an in-memory PNG.
//!
//! - Panel A: one trend line per requested country, coloured by its position in
//!   the request so colours stay put when a country has no data
//! - Panel B: horizontal bars for the latest year, ascending, each annotated
//!   with its value to two decimals
//! - Shared title band on top, source footer at the bottom
//!
//! Rendering is skipped entirely (no font lookup, no canvas) when there is no table.

pub mod fonts;
pub mod legend;
pub mod plan;
pub mod text;
pub mod util;

pub use plan::{Ranking, RankedBar, TrendSeries, format_rate, latest_ranking, trend_series};

use crate::config::DashboardConfig;
use crate::table::WideTable;
use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackend;
use std::io::Cursor;
use std::path::Path;

use legend::{LegendMetrics, draw_legend_column};
use text::estimate_text_width_px;
use util::{
    AXIS_TEXT, FIGURE_BG, GRID, PANEL_BG, TITLE_TEXT, padded_range, palette_color, year_range,
};

const Y_AXIS_DESC: &str = "Fertility Rate (births per woman)";

/// Canvas size and fixed texts of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub footer: String,
    /// Shown in the Panel A title, e.g. `1960-2022`.
    pub period: String,
}

impl From<&DashboardConfig> for ReportOptions {
    fn from(cfg: &DashboardConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
            title: cfg.title.clone(),
            footer: cfg.footer.clone(),
            period: cfg.date.label(),
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

impl ReportOptions {
    /// Font sizes scale with canvas height; the base values suit a 750 px tall canvas.
    fn px(&self, base: f64) -> f64 {
        (base * self.height as f64 / 750.0).max(6.0)
    }
}

/// PNG bytes of a finished dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    png: Vec<u8>,
}

impl RenderedReport {
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }

    pub fn len(&self) -> usize {
        self.png.len()
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.png).with_context(|| format!("write {}", path.display()))
    }
}

/// Render the dashboard.
///
/// Returns `Ok(None)` ("no report") when `table` is absent or has no rows.
/// Countries in `countries` without a column are skipped with a warning.
pub fn render_dashboard(
    countries: &[String],
    table: Option<&WideTable>,
    opts: &ReportOptions,
) -> Result<Option<RenderedReport>> {
    let Some(table) = table.filter(|t| !t.is_empty()) else {
        warn!("No data available. Please check your internet connection and try again.");
        return Ok(None);
    };
    if opts.width == 0 || opts.height == 0 {
        return Err(anyhow!("invalid canvas size {}x{}", opts.width, opts.height));
    }

    let trends = trend_series(countries, table);
    let ranking = latest_ranking(table);

    fonts::ensure_registered()?;

    let (w, h) = (opts.width, opts.height);
    let mut rgb = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (w, h)).into_drawing_area();
        draw_dashboard(&root, opts, table, &trends, ranking.as_ref())?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }

    let png = encode_png(rgb, w, h)?;
    info!("Rendered dashboard ({} bytes)", png.len());
    Ok(Some(RenderedReport { png }))
}

fn encode_png(rgb: Vec<u8>, w: u32, h: u32) -> Result<Vec<u8>> {
    let img = image::RgbImage::from_raw(w, h, rgb)
        .ok_or_else(|| anyhow!("pixel buffer does not match {w}x{h}"))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out.into_inner())
}

fn font(size: f64, style: FontStyle, color: &RGBColor) -> TextStyle<'static> {
    FontDesc::new(FontFamily::SansSerif, size, style).color(color)
}

fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    opts: &ReportOptions,
    table: &WideTable,
    trends: &[TrendSeries],
    ranking: Option<&Ranking>,
) -> Result<()> {
    root.fill(&FIGURE_BG).map_err(|e| anyhow!("{:?}", e))?;

    let (w, h) = root.dim_in_pixel();
    let title_h = (h as f64 * 0.10).round() as u32;
    let footer_h = (h as f64 * 0.05).round() as u32;
    let side = (w as f64 * 0.03).round() as u32;

    let (header, rest) = root.split_vertically(title_h);
    let (body, footer) = rest.split_vertically(h.saturating_sub(title_h + footer_h));

    header
        .draw(&Text::new(
            opts.title.as_str(),
            (w as i32 / 2, title_h as i32 / 2),
            font(opts.px(24.0), FontStyle::Bold, &TITLE_TEXT)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

    footer
        .draw(&Text::new(
            opts.footer.as_str(),
            (side as i32, footer_h as i32 / 2),
            font(opts.px(10.0), FontStyle::Normal, &AXIS_TEXT)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

    let body = body.margin(0, 0, side, side);
    let (bw, _) = body.dim_in_pixel();
    let (left, right) = body.split_horizontally((bw as f64 * 0.55).round() as u32);

    draw_trend_panel(&left, opts, table, trends)?;
    draw_ranking_panel(&right, opts, ranking)?;
    Ok(())
}

fn draw_trend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    opts: &ReportOptions,
    table: &WideTable,
    trends: &[TrendSeries],
) -> Result<()> {
    let legend_items: Vec<(String, RGBColor)> = trends
        .iter()
        .map(|s| (s.country.clone(), palette_color(s.color_index)))
        .collect();
    let labels: Vec<String> = legend_items.iter().map(|(l, _)| l.clone()).collect();

    let metrics = LegendMetrics::for_font(opts.px(12.0).round() as u32);
    let (aw, _) = area.dim_in_pixel();
    let legend_w = metrics
        .preferred_width_px(&labels)
        .clamp(0, (aw as f64 * 0.25) as i32) as u32;
    let (plot_area, legend_area) = area.split_horizontally(aw.saturating_sub(legend_w));

    let min_year = table.years().min().unwrap_or_default();
    let max_year = table.latest_year().unwrap_or_default();
    let (x0, x1) = year_range(min_year, max_year);
    let (lo, hi) = table.value_range().unwrap_or((0.0, 1.0));
    let (y0, y1) = padded_range(lo, hi, 0.05);

    let margin = opts.px(12.0) as u32;
    let caption_px = opts.px(16.0);
    let mut chart = ChartBuilder::on(&plot_area)
        .margin(margin)
        .caption(
            format!("Fertility Rate Trends ({})", opts.period),
            font(caption_px, FontStyle::Bold, &TITLE_TEXT),
        )
        .x_label_area_size(opts.px(44.0) as u32)
        .y_label_area_size(opts.px(56.0) as u32)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .plotting_area()
        .fill(&PANEL_BG)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| format!("{:.0}", x);
    let y_label_fmt = |y: &f64| format!("{:.1}", y);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(Y_AXIS_DESC)
        .x_labels(10)
        .y_labels(8)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .bold_line_style(GRID.stroke_width(1))
        .light_line_style(TRANSPARENT)
        .axis_style(AXIS_TEXT.stroke_width(1))
        .label_style(font(opts.px(10.0), FontStyle::Normal, &AXIS_TEXT))
        .axis_desc_style(font(opts.px(12.0), FontStyle::Normal, &AXIS_TEXT))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let stroke = (opts.px(2.5).round() as u32).max(1);
    for series in trends {
        let color = palette_color(series.color_index);
        for seg in &series.segments {
            if seg.len() == 1 {
                chart
                    .draw_series(
                        seg.iter()
                            .map(|p| Circle::new(*p, stroke as i32 + 1, color.filled())),
                    )
                    .map_err(|e| anyhow!("{:?}", e))?;
            } else {
                chart
                    .draw_series(LineSeries::new(seg.iter().copied(), color.stroke_width(stroke)))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }

    // First legend row lines up with the top of the plotting area.
    let legend_top = margin as i32 + caption_px.round() as i32 + margin as i32;
    draw_legend_column(&legend_area, &legend_items, metrics, legend_top)
}

fn draw_ranking_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    opts: &ReportOptions,
    ranking: Option<&Ranking>,
) -> Result<()> {
    let caption_px = opts.px(16.0);
    let caption = match ranking {
        Some(r) => format!("Fertility Rates ({})", r.year),
        None => "Fertility Rates".to_string(),
    };
    let bars: &[RankedBar] = ranking.map(|r| r.bars.as_slice()).unwrap_or(&[]);
    if bars.is_empty() {
        warn!("No latest-year values to rank");
        area.draw(&Text::new(
            format!("{caption}: no data"),
            (0, caption_px as i32),
            font(caption_px, FontStyle::Bold, &TITLE_TEXT),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        return Ok(());
    }

    let n = bars.len() as i32;
    let names: Vec<String> = bars.iter().map(|b| b.country.clone()).collect();
    let tick_px = opts.px(10.0);
    let name_w = names
        .iter()
        .map(|s| estimate_text_width_px(s, tick_px.round() as u32))
        .max()
        .unwrap_or(0)
        + tick_px as u32;
    let max_rate = bars.iter().map(|b| b.rate).fold(0.0f64, f64::max);
    // Headroom on the right for the value labels.
    let x_max = if max_rate > 0.0 { max_rate * 1.18 } else { 1.0 };
    let x_min = bars.iter().map(|b| b.rate).fold(0.0f64, f64::min);

    let mut chart = ChartBuilder::on(area)
        .margin(opts.px(12.0) as u32)
        .caption(caption, font(caption_px, FontStyle::Bold, &TITLE_TEXT))
        .x_label_area_size(opts.px(44.0) as u32)
        .y_label_area_size(name_w)
        .build_cartesian_2d(x_min..x_max, (0..n).into_segmented())
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .plotting_area()
        .fill(&PANEL_BG)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| format!("{:.1}", x);
    let y_label_fmt = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            names.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(Y_AXIS_DESC)
        .x_labels(8)
        .y_labels(n as usize + 1)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .bold_line_style(GRID.stroke_width(1))
        .light_line_style(TRANSPARENT)
        .axis_style(AXIS_TEXT.stroke_width(1))
        .label_style(font(tick_px, FontStyle::Normal, &AXIS_TEXT))
        .axis_desc_style(font(opts.px(12.0), FontStyle::Normal, &AXIS_TEXT))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let bar_margin = (opts.px(8.0) as u32).max(1);
    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let i = i as i32;
            let mut rect = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (bar.rate, SegmentValue::Exact(i + 1)),
                ],
                palette_color(i as usize).filled(),
            );
            rect.set_margin(bar_margin, bar_margin, 0, 0);
            rect
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    let value_style = font(tick_px, FontStyle::Normal, &TITLE_TEXT)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let offset = (tick_px / 2.0).round() as i32;
    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            EmptyElement::at((bar.rate, SegmentValue::CenterOf(i as i32)))
                + Text::new(bar.label.clone(), (offset, 0), value_style.clone())
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_is_no_report() {
        let out = render_dashboard(&["Norway".into()], None, &ReportOptions::default()).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn options_follow_config() {
        let opts = ReportOptions::default();
        assert_eq!((opts.width, opts.height), (2400, 1500));
        assert_eq!(opts.period, "1960-2022");
        assert!((opts.px(12.0) - 24.0).abs() < 1e-9);
    }
}
