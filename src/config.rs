//! Fixed run parameters.
//!
//! The binary always runs with [`DashboardConfig::default`]; tests build their
//! own values (for instance to point `base_url` at a local fixture server).

use crate::models::DateSpec;
use std::path::PathBuf;
use std::time::Duration;

pub const WORLD_BANK_BASE_URL: &str = "https://api.worldbank.org/v2";
/// Fertility rate, total (births per woman).
pub const FERTILITY_INDICATOR: &str = "SP.DYN.TFRT.IN";
pub const NORDIC_COUNTRIES: [&str; 5] = ["Norway", "Sweden", "Denmark", "Finland", "Iceland"];
pub const OUTPUT_FILE: &str = "nordic_fertility_dashboard.png";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Human-readable names, resolved to provider codes before fetching.
    pub countries: Vec<String>,
    pub indicator: String,
    pub date: DateSpec,
    /// Applied to every HTTP request.
    pub timeout: Duration,
    pub base_url: String,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub footer: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            countries: NORDIC_COUNTRIES.iter().map(|s| s.to_string()).collect(),
            indicator: FERTILITY_INDICATOR.into(),
            date: DateSpec::Range {
                start: 1960,
                end: 2022,
            },
            timeout: Duration::from_secs(30),
            base_url: WORLD_BANK_BASE_URL.into(),
            output: PathBuf::from(OUTPUT_FILE),
            // 16 x 10 in at 150 DPI
            width: 2400,
            height: 1500,
            title: "Nordic Countries Fertility Rate Analysis".into(),
            footer: "Data source: World Bank".into(),
        }
    }
}
