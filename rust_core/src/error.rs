//! Error taxonomy for a reconciliation run.
//!
//! Every variant is fatal for the run: there is no partial-success mode.
//! Outcomes that match no pool and outcomes for already-complete pools are
//! not errors and never show up here (see `reconcile::ReconcileOutcome`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    /// A numeric or timestamp field in a game record could not be parsed.
    #[error("Feed parse error in game {game}: field `{field}` has invalid value {value:?}")]
    FeedParse {
        game: usize,
        field: String,
        value: String,
    },

    /// A pool sheet row did not have the expected number of columns.
    #[error("Malformed pool row {row}: expected {expected} columns, found {columns}")]
    MalformedRow {
        row: usize,
        columns: usize,
        expected: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scoreboard request to {url} returned status {status}")]
    HttpStatus { status: u16, url: String },
}

impl PoolError {
    pub fn feed_parse(game: usize, field: &str, value: &str) -> Self {
        PoolError::FeedParse {
            game,
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// True for errors caused by the content of the ingested data rather than
    /// by transport. These need a manual fix to the sheet or point at an
    /// upstream feed-format change.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            PoolError::FeedParse { .. } | PoolError::MalformedRow { .. } | PoolError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PoolError>;
