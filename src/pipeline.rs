//! One-shot driver: names → codes → table → image → file.

use crate::api::Client;
use crate::config::DashboardConfig;
use crate::viz::{self, ReportOptions};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

/// How a run ended. Both variants are normal terminations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The dashboard was written to this path.
    Written(PathBuf),
    /// Not a single observation was fetched; nothing was written.
    NoData,
}

/// Run the whole pipeline once.
///
/// Request failures degrade inside the stages; only setup, rendering and file
/// IO errors are returned as `Err`.
pub fn run(cfg: &DashboardConfig) -> Result<Outcome> {
    let client = Client::new(cfg.base_url.as_str(), cfg.timeout).context("build http client")?;

    info!("Fetching country codes...");
    let codes = client.country_codes(&cfg.countries);

    info!("Fetching data from World Bank...");
    let table = client.fetch_series(&codes, &cfg.indicator, cfg.date);

    let report = viz::render_dashboard(&cfg.countries, table.as_ref(), &ReportOptions::from(cfg))?;
    match report {
        Some(report) => {
            report.write_to_file(&cfg.output)?;
            info!("Dashboard saved as '{}'", cfg.output.display());
            Ok(Outcome::Written(cfg.output.clone()))
        }
        None => {
            warn!("Failed to create dashboard due to data retrieval issues.");
            Ok(Outcome::NoData)
        }
    }
}
