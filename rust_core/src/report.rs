//! Completion reporting.
//!
//! Projects a `ReconcileOutcome` into plain records. Where the report ends up
//! (stdout, a file, a notification) is the caller's business.

use crate::models::{bucket_label, Player, BUCKET_COUNT};
use crate::reconcile::ReconcileOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedPoolReport {
    pub team_name: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub games_played: u32,
    pub player: Option<Player>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenPoolReport {
    pub team_name: String,
    pub marked_buckets: usize,
    pub missing_buckets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub completed: Vec<CompletedPoolReport>,
    pub open: Vec<OpenPoolReport>,
    pub already_complete: usize,
    pub unmatched: usize,
}

impl PoolReport {
    pub fn from_outcome(outcome: &ReconcileOutcome) -> Self {
        let completed = outcome
            .completed
            .iter()
            .map(|update| CompletedPoolReport {
                team_name: update.pool.team_name.clone(),
                completed_at: update.pool.completed_at,
                games_played: update.pool.games_played,
                player: update.pool.player.clone(),
            })
            .collect();

        let open = outcome
            .updated
            .iter()
            .map(|update| OpenPoolReport {
                team_name: update.pool.team_name.clone(),
                marked_buckets: update.pool.buckets().marked_count(),
                missing_buckets: update
                    .pool
                    .buckets()
                    .missing()
                    .into_iter()
                    .map(bucket_label)
                    .collect(),
            })
            .collect();

        Self {
            completed,
            open,
            already_complete: outcome.already_complete.len(),
            unmatched: outcome.unmatched.len(),
        }
    }

    pub fn has_completions(&self) -> bool {
        !self.completed.is_empty()
    }
}

impl fmt::Display for PoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Completed pools: {}", self.completed.len())?;
        for c in &self.completed {
            write!(f, "  {}", c.team_name)?;
            if let Some(at) = c.completed_at {
                write!(f, " on {}", at.format("%Y-%m-%d %H:%M"))?;
            }
            write!(f, " after {} games", c.games_played)?;
            if let Some(player) = &c.player {
                write!(
                    f,
                    " - {}{}",
                    player.name,
                    if player.has_paid { "" } else { " (unpaid)" }
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Open pools: {}", self.open.len())?;
        for o in &self.open {
            writeln!(
                f,
                "  {} {}/{} (missing: {})",
                o.team_name,
                o.marked_buckets,
                BUCKET_COUNT,
                o.missing_buckets.join(", ")
            )?;
        }

        write!(
            f,
            "Already complete: {}, unmatched outcomes: {}",
            self.already_complete, self.unmatched
        )
    }
}
