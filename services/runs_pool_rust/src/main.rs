//! Runs Pool Rust Service
//!
//! Daily batch job for the run-bucket pool.
//!
//! This service:
//! - Fetches yesterday's scoreboard (or reads a local feed file)
//! - Loads the pool sheet CSV
//! - Marks each team's run bucket and detects completed pools
//! - Prints the completed and still-open pools as text or JSON

use anyhow::Result;
use dotenv::dotenv;
use log::{error, info, warn};
use runs_pool_rust::config::Config;
use runs_pool_rust::pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    info!("Starting Runs Pool job...");

    let config = Config::from_env()?;
    info!(
        "Config: feed={:?}, pool_csv={}, matcher={}",
        config.feed,
        config.pool_csv_path.display(),
        config.match_strategy.as_str()
    );

    let report = match pipeline::run(&config).await {
        Ok(report) => report,
        Err(e) => {
            error!("Run aborted: {:#}", e);
            warn!("{}", pipeline::abort_hint(&e));
            return Err(e);
        }
    };

    println!("{}", pipeline::render(&report, config.output_format)?);

    if report.has_completions() {
        info!(
            "Done: {} completed, {} open",
            report.completed.len(),
            report.open.len()
        );
    } else {
        info!("Done: no pool completed, {} open", report.open.len());
    }
    Ok(())
}
