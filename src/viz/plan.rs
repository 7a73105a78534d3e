//! What to draw, separated from how: series, colours and bar order are decided
//! here from the table alone, so they can be checked without a canvas.

use crate::table::WideTable;
use log::warn;

/// One country's trend line in Panel A.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub country: String,
    /// Position of the country in the requested list; picks the palette colour.
    pub color_index: usize,
    /// Contiguous runs of non-null points, ascending by year.
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// One bar of the latest-year ranking in Panel B.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBar {
    pub country: String,
    pub rate: f64,
    /// End-of-bar annotation.
    pub label: String,
}

/// Panel B content. `bars` is sorted ascending by rate; `bars[0]` sits at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub year: i32,
    pub bars: Vec<RankedBar>,
}

pub fn format_rate(v: f64) -> String {
    format!("{v:.2}")
}

/// Split a column into drawable runs; a null cell ends the current run.
pub fn line_segments(points: &[(i32, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut out: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut cur: Vec<(f64, f64)> = Vec::new();
    for (year, value) in points {
        match value {
            Some(v) => cur.push((*year as f64, *v)),
            None if !cur.is_empty() => out.push(std::mem::take(&mut cur)),
            None => {}
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// Trend lines for every requested country that has a column, in request order.
///
/// Colours follow the position in `countries`, not the table's column order,
/// so a missing country never shifts the colours of the others.
pub fn trend_series(countries: &[String], table: &WideTable) -> Vec<TrendSeries> {
    countries
        .iter()
        .enumerate()
        .filter_map(|(idx, country)| match table.column(country) {
            Some(points) => Some(TrendSeries {
                country: country.clone(),
                color_index: idx,
                segments: line_segments(&points),
            }),
            None => {
                warn!("No data available for {country}");
                None
            }
        })
        .collect()
}

/// Latest-year ranking over all table columns.
///
/// Null rates in that row are dropped with a warning. `None` only for an empty table.
pub fn latest_ranking(table: &WideTable) -> Option<Ranking> {
    let year = table.latest_year()?;
    let mut bars: Vec<RankedBar> = table
        .melt_row(year)?
        .into_iter()
        .filter_map(|(country, rate)| match rate {
            Some(rate) => Some(RankedBar {
                label: format_rate(rate),
                country,
                rate,
            }),
            None => {
                warn!("No {year} value for {country}; left out of the ranking");
                None
            }
        })
        .collect();
    bars.sort_by(|a, b| a.rate.total_cmp(&b.rate));
    Some(Ranking { year, bars })
}
