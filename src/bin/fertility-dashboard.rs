use anyhow::Result;
use clap::Parser;
use fertility_dashboard::{DashboardConfig, run};
use log::{LevelFilter, debug};

/// Renders the Nordic fertility-rate dashboard to `nordic_fertility_dashboard.png`.
///
/// Countries, indicator, year range and chart layout are fixed. `RUST_LOG`
/// overrides the verbosity flags.
#[derive(Parser, Debug)]
#[command(name = "fertility-dashboard", version, about)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.level())
        .format_target(false)
        .parse_default_env()
        .init();

    let outcome = run(&DashboardConfig::default())?;
    debug!("finished: {outcome:?}");
    Ok(())
}
