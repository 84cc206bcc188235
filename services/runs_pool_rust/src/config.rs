//! Configuration constants and environment loading for the runs pool job
//!
//! This module manages all runtime configuration:
//! - Scoreboard source (remote base URL, date, or a local feed file)
//! - Pool sheet location
//! - Team matching strategy
//! - Output format

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use runs_pool_core::clients::scoreboard::{yesterday, DEFAULT_SCOREBOARD_BASE_URL, DEFAULT_TIMEOUT_SECS};
use runs_pool_core::matching::MatchStrategy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default location of the pool sheet export
pub const DEFAULT_POOL_CSV_PATH: &str = "runs_pool_master/Sheet1-Table 1.csv";

/// Format of `SCOREBOARD_DATE`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Where the day's games come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote { base_url: String, date: NaiveDate },
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedSource,
    pub pool_csv_path: PathBuf,
    pub match_strategy: MatchStrategy,
    pub output_format: OutputFormat,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unset or empty values fall
    /// back to defaults; values that are set but invalid are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let feed = match get("FEED_PATH") {
            Some(path) => FeedSource::File(PathBuf::from(path)),
            None => {
                let date = match get("SCOREBOARD_DATE") {
                    Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                        .with_context(|| format!("SCOREBOARD_DATE must be YYYY-MM-DD, got {:?}", raw))?,
                    None => yesterday(),
                };
                FeedSource::Remote {
                    base_url: get("SCOREBOARD_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_SCOREBOARD_BASE_URL.to_string()),
                    date,
                }
            }
        };

        let pool_csv_path = PathBuf::from(
            get("POOL_CSV_PATH").unwrap_or_else(|| DEFAULT_POOL_CSV_PATH.to_string()),
        );

        let match_strategy = match get("MATCH_STRATEGY") {
            Some(raw) => raw.parse::<MatchStrategy>().map_err(|e| anyhow!(e))?,
            None => MatchStrategy::default(),
        };

        let output_format = match get("OUTPUT_FORMAT") {
            Some(raw) => raw.parse::<OutputFormat>().map_err(|e| anyhow!(e))?,
            None => OutputFormat::default(),
        };

        let http_timeout = Duration::from_secs(match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}", raw)
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        });

        Ok(Self {
            feed,
            pool_csv_path,
            match_strategy,
            output_format,
            http_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.pool_csv_path, PathBuf::from(DEFAULT_POOL_CSV_PATH));
        assert_eq!(cfg.match_strategy, MatchStrategy::Substring);
        assert_eq!(cfg.output_format, OutputFormat::Text);
        assert_eq!(cfg.http_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        match cfg.feed {
            FeedSource::Remote { base_url, date } => {
                assert_eq!(base_url, DEFAULT_SCOREBOARD_BASE_URL);
                assert_eq!(date, yesterday());
            }
            other => panic!("expected remote feed, got {:?}", other),
        }
    }

    #[test]
    fn test_feed_path_overrides_remote() {
        let cfg = config(&[("FEED_PATH", "feed.json"), ("SCOREBOARD_DATE", "bad")]).unwrap();
        assert_eq!(cfg.feed, FeedSource::File(PathBuf::from("feed.json")));
    }

    #[test]
    fn test_explicit_date_and_options() {
        let cfg = config(&[
            ("SCOREBOARD_DATE", "2018-06-05"),
            ("SCOREBOARD_BASE_URL", "http://localhost:9000"),
            ("MATCH_STRATEGY", "exact"),
            ("OUTPUT_FORMAT", "JSON"),
            ("HTTP_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        assert_eq!(
            cfg.feed,
            FeedSource::Remote {
                base_url: "http://localhost:9000".to_string(),
                date: NaiveDate::from_ymd_opt(2018, 6, 5).unwrap(),
            }
        );
        assert_eq!(cfg.match_strategy, MatchStrategy::Exact);
        assert_eq!(cfg.output_format, OutputFormat::Json);
        assert_eq!(cfg.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config(&[("SCOREBOARD_DATE", "06/05/2018")]).is_err());
        assert!(config(&[("MATCH_STRATEGY", "fuzzy")]).is_err());
        assert!(config(&[("OUTPUT_FORMAT", "xml")]).is_err());
        assert!(config(&[("HTTP_TIMEOUT_SECS", "-5")]).is_err());

        let err = config(&[("HTTP_TIMEOUT_SECS", "ten")]).unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let cfg = config(&[("POOL_CSV_PATH", ""), ("MATCH_STRATEGY", " ")]).unwrap();
        assert_eq!(cfg.pool_csv_path, PathBuf::from(DEFAULT_POOL_CSV_PATH));
        assert_eq!(cfg.match_strategy, MatchStrategy::Substring);
    }
}
