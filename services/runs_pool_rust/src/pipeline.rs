//! One batch run: ingest feed → ingest pool sheet → reconcile → report.
//!
//! Any ingestion failure aborts the run before reconciliation starts.

use crate::config::{Config, FeedSource, OutputFormat};
use anyhow::{Context, Result};
use log::info;
use runs_pool_core::clients::ScoreboardClient;
use runs_pool_core::feed::parse_feed_json;
use runs_pool_core::pool_table::load_pool_file;
use runs_pool_core::{PoolError, PoolReport, Reconciler, TeamOutcome};
use std::fs;

/// Load the day's outcomes from the configured source.
pub async fn load_outcomes(config: &Config) -> Result<Vec<TeamOutcome>> {
    match &config.feed {
        FeedSource::File(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read feed file {}", path.display()))?;
            let outcomes = parse_feed_json(&raw)
                .with_context(|| format!("Invalid scoreboard feed in {}", path.display()))?;
            info!("Loaded {} outcomes from {}", outcomes.len(), path.display());
            Ok(outcomes)
        }
        FeedSource::Remote { base_url, date } => {
            let client = ScoreboardClient::with_config(base_url, config.http_timeout);
            let url = client.scoreboard_url(*date);
            client
                .get_outcomes(*date)
                .await
                .with_context(|| format!("Failed to load scoreboard from {}", url))
        }
    }
}

/// Run the whole job and return the report.
pub async fn run(config: &Config) -> Result<PoolReport> {
    let outcomes = load_outcomes(config).await?;

    let mut table = load_pool_file(&config.pool_csv_path).with_context(|| {
        format!(
            "Failed to load pool sheet {}",
            config.pool_csv_path.display()
        )
    })?;
    info!(
        "Loaded {} pools ({} already complete) from {}",
        table.len(),
        table.completed_count(),
        config.pool_csv_path.display()
    );

    let reconciler = Reconciler::with_strategy(config.match_strategy);
    let outcome = reconciler.reconcile(&mut table, &outcomes);

    Ok(PoolReport::from_outcome(&outcome))
}

/// Follow-up hint for an aborted run. Errors caused by the sheet or feed
/// content need a manual fix; anything else may pass on a rerun.
pub fn abort_hint(err: &anyhow::Error) -> &'static str {
    let data_error = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<PoolError>())
        .any(PoolError::is_data_error);

    if data_error {
        "fix the pool sheet or check for a scoreboard format change, rerunning will not help"
    } else {
        "input could not be read, rerun once it is reachable"
    }
}

/// Render a report in the configured output format.
pub fn render(report: &PoolReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
    }
}
