//! Applying game outcomes to the pool table.
//!
//! Each outcome is matched to at most one pool. A matched pool that is
//! already complete is left alone; otherwise the outcome's run bucket is
//! marked and completion is re-derived from the buckets. The first outcome
//! that completes a pool stamps its completion time and games played.

use crate::matching::{MatchStrategy, SubstringMatcher, TeamMatcher};
use crate::models::{bucket_label, TeamOutcome, TeamPool};
use crate::pool_table::PoolTable;
use log::{debug, info};
use serde::Serialize;

/// A pool touched by one outcome, captured right after the touch.
#[derive(Debug, Clone, Serialize)]
pub struct PoolUpdate {
    pub pool: TeamPool,
    /// Team name as it appeared in the feed.
    pub outcome_team: String,
    pub bucket: usize,
    /// False when the bucket was already marked before this outcome.
    pub newly_marked: bool,
}

/// What happened to a single outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// No pool in the sheet for this team.
    Unmatched,
    /// The pool was complete before this outcome; nothing changed.
    AlreadyComplete { index: usize },
    /// This outcome filled the last bucket.
    Completed { index: usize, bucket: usize },
    /// Bucket marked (or already marked), pool still open.
    Updated { index: usize, bucket: usize, newly_marked: bool },
}

/// Result of a full reconciliation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileOutcome {
    /// Pools completed during this pass.
    pub completed: Vec<PoolUpdate>,
    /// Pools touched during this pass that are still open.
    pub updated: Vec<PoolUpdate>,
    /// Pools that were already complete when an outcome for them arrived.
    pub already_complete: Vec<TeamPool>,
    /// Outcomes with no pool in the sheet.
    pub unmatched: Vec<TeamOutcome>,
}

impl ReconcileOutcome {
    pub fn touched(&self) -> usize {
        self.completed.len() + self.updated.len() + self.already_complete.len()
    }
}

pub struct Reconciler {
    matcher: Box<dyn TeamMatcher>,
}

impl Reconciler {
    pub fn new(matcher: Box<dyn TeamMatcher>) -> Self {
        Self { matcher }
    }

    pub fn with_strategy(strategy: MatchStrategy) -> Self {
        Self::new(strategy.matcher())
    }

    pub fn matcher_name(&self) -> &str {
        self.matcher.matcher_name()
    }

    /// Apply one outcome to the table.
    pub fn apply(&self, table: &mut PoolTable, outcome: &TeamOutcome) -> Applied {
        let Some(found) = table.find_match(&*self.matcher, &outcome.team_name) else {
            debug!(
                "No pool for {} {} ({})",
                outcome.city,
                outcome.team_name,
                outcome.side.as_str()
            );
            return Applied::Unmatched;
        };

        let Some(pool) = table.get_index_mut(found.index) else {
            return Applied::Unmatched;
        };

        if pool.is_completed() {
            debug!("Pool '{}' already complete, skipping {}", pool.team_name, outcome.team_name);
            return Applied::AlreadyComplete { index: found.index };
        }

        let bucket = outcome.bucket();
        let newly_marked = pool.mark_bucket(bucket);

        if pool.is_completed() {
            pool.stamp_completion(outcome.game_time, outcome.games_played());
            info!(
                "Pool '{}' completed with {} runs ({}) after {} games",
                pool.team_name,
                outcome.runs,
                bucket_label(bucket),
                outcome.games_played()
            );
            Applied::Completed { index: found.index, bucket }
        } else {
            debug!(
                "Pool '{}' bucket {} {} ({} missing)",
                pool.team_name,
                bucket_label(bucket),
                if newly_marked { "marked" } else { "already marked" },
                pool.buckets().missing().len()
            );
            Applied::Updated { index: found.index, bucket, newly_marked }
        }
    }

    /// Apply every outcome in order and collect what happened.
    pub fn reconcile(&self, table: &mut PoolTable, outcomes: &[TeamOutcome]) -> ReconcileOutcome {
        let mut result = ReconcileOutcome::default();

        for outcome in outcomes {
            match self.apply(table, outcome) {
                Applied::Unmatched => result.unmatched.push(outcome.clone()),
                Applied::AlreadyComplete { index } => {
                    if let Some(pool) = table.get_index(index) {
                        result.already_complete.push(pool.clone());
                    }
                }
                Applied::Completed { index, bucket } => {
                    if let Some(pool) = table.get_index(index) {
                        result.completed.push(PoolUpdate {
                            pool: pool.clone(),
                            outcome_team: outcome.team_name.clone(),
                            bucket,
                            newly_marked: true,
                        });
                    }
                }
                Applied::Updated { index, bucket, newly_marked } => {
                    if let Some(pool) = table.get_index(index) {
                        result.updated.push(PoolUpdate {
                            pool: pool.clone(),
                            outcome_team: outcome.team_name.clone(),
                            bucket,
                            newly_marked,
                        });
                    }
                }
            }
        }

        info!(
            "Reconciled {} outcomes with {}: {} pools touched ({} completed, {} updated, {} already complete), {} unmatched",
            outcomes.len(),
            self.matcher_name(),
            result.touched(),
            result.completed.len(),
            result.updated.len(),
            result.already_complete.len(),
            result.unmatched.len()
        );

        result
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Box::new(SubstringMatcher))
    }
}

/// Reconcile with the default substring matcher.
pub fn reconcile(table: &mut PoolTable, outcomes: &[TeamOutcome]) -> ReconcileOutcome {
    Reconciler::default().reconcile(table, outcomes)
}
