//! fertility_dashboard
//!
//! Fetches fertility-rate series for a set of countries from the World Bank
//! Indicators API, pivots them into a year × country table and renders a
//! two-panel PNG dashboard (trend lines plus a latest-year ranking).
//!
//! ### Stages
//! - Code Resolver: [`Client::country_codes`]
//! - Series Fetcher: [`Client::fetch_series`] → [`WideTable`]
//! - Report Renderer: [`viz::render_dashboard`] → [`viz::RenderedReport`]
//!
//! ### Example
//! ```no_run
//! use fertility_dashboard::{DashboardConfig, Outcome, run};
//!
//! match run(&DashboardConfig::default())? {
//!     Outcome::Written(path) => println!("wrote {}", path.display()),
//!     Outcome::NoData => eprintln!("no data"),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod table;
pub mod viz;

pub use api::Client;
pub use config::DashboardConfig;
pub use error::ApiError;
pub use models::{DateSpec, Observation};
pub use pipeline::{Outcome, run};
pub use table::WideTable;
