use crate::error::{PoolError, Result};
use crate::feed::{parse_outcomes, ScoreboardDocument};
use crate::models::TeamOutcome;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use log::{debug, info};
use reqwest::Client;
use std::time::Duration;

/// Root of the MLB gameday scoreboard tree.
pub const DEFAULT_SCOREBOARD_BASE_URL: &str = "https://gd2.mlb.com/components/game/mlb";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ScoreboardClient {
    client: Client,
    base_url: String,
}

impl ScoreboardClient {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_SCOREBOARD_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_config(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scoreboard document URL for a given day.
    pub fn scoreboard_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/year_{}/month_{:02}/day_{:02}/master_scoreboard.json",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
        )
    }

    /// Fetch the raw scoreboard document for a day. One attempt, no retries.
    pub async fn fetch_document(&self, date: NaiveDate) -> Result<ScoreboardDocument> {
        let url = self.scoreboard_url(date);
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PoolError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await?;
        let doc: ScoreboardDocument = serde_json::from_str(&body)?;
        info!(
            "Fetched scoreboard for {} ({} games)",
            date,
            doc.data.games.game.len()
        );
        Ok(doc)
    }

    /// Fetch a day's scoreboard and turn it into team outcomes.
    pub async fn get_outcomes(&self, date: NaiveDate) -> Result<Vec<TeamOutcome>> {
        let doc = self.fetch_document(date).await?;
        parse_outcomes(&doc)
    }
}

impl Default for ScoreboardClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The day before today (UTC): the most recent complete slate of games.
pub fn yesterday() -> NaiveDate {
    (Utc::now() - ChronoDuration::days(1)).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoreboard_url_pads_month_and_day() {
        let client = ScoreboardClient::new();
        let date = NaiveDate::from_ymd_opt(2018, 6, 5).unwrap();
        assert_eq!(
            client.scoreboard_url(date),
            "https://gd2.mlb.com/components/game/mlb/year_2018/month_06/day_05/master_scoreboard.json"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ScoreboardClient::with_config("http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_yesterday_is_before_today() {
        assert!(yesterday() < Utc::now().date_naive());
    }

    #[tokio::test]
    #[ignore] // Requires network
    async fn test_fetch_scoreboard() {
        let client = ScoreboardClient::new();
        let date = NaiveDate::from_ymd_opt(2018, 6, 5).unwrap();
        match client.get_outcomes(date).await {
            Ok(outcomes) => {
                println!("Fetched {} outcomes", outcomes.len());
                assert_eq!(outcomes.len() % 2, 0);
            }
            Err(e) => println!("Warning: could not fetch scoreboard: {}", e),
        }
    }
}
