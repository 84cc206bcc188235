//! Runs Pool Core - scoreboard ingestion and run-bucket pool reconciliation.
//!
//! This module provides:
//! - Scoreboard feed parsing into per-team game outcomes
//! - Pool sheet loading (CSV rows to team pools)
//! - Pluggable team name matching
//! - Reconciliation of outcomes against pools, with completion tracking
//! - Completion reporting
//! - Scoreboard HTTP client

pub mod error;
pub mod models;

pub mod feed;
pub mod matching;
pub mod pool_table;
pub mod reconcile;
pub mod report;

// Service modules
pub mod clients;

pub use error::{PoolError, Result};
pub use models::*;
pub use pool_table::PoolTable;
pub use reconcile::{reconcile, ReconcileOutcome, Reconciler};
pub use report::PoolReport;
