// Shared models for the runs pool
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of run buckets in a pool: 0 through 12 runs plus one ">12" bucket.
pub const BUCKET_COUNT: usize = 14;

/// Index of the catch-all bucket for games with more than 12 runs.
pub const OVERFLOW_BUCKET: usize = BUCKET_COUNT - 1;

// ============================================================================
// Game Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSide {
    Home,
    Away,
}

impl GameSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameSide::Home => "home",
            GameSide::Away => "away",
        }
    }
}

/// One team's half of a single game's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamOutcome {
    pub city: String,
    pub team_name: String,
    pub side: GameSide,
    pub wins: u32,
    pub losses: u32,
    pub runs: u32,
    pub game_time: DateTime<Utc>,
}

impl TeamOutcome {
    /// Bucket this outcome fills. Anything above 12 runs lands in the ">12" bucket.
    pub fn bucket(&self) -> usize {
        bucket_for_runs(self.runs)
    }

    /// Wins plus losses, saturating at `u32::MAX` for nonsense feed values.
    pub fn games_played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }
}

pub fn bucket_for_runs(runs: u32) -> usize {
    (runs as usize).min(OVERFLOW_BUCKET)
}

// ============================================================================
// Run Buckets
// ============================================================================

/// Dense set of the 14 run buckets. Marks are monotonic: there is no way to
/// clear a bucket once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunBuckets([bool; BUCKET_COUNT]);

impl RunBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a bucket. Returns true if the bucket was previously empty.
    /// Indices past the overflow bucket are clamped onto it.
    pub fn mark(&mut self, bucket: usize) -> bool {
        let idx = bucket.min(OVERFLOW_BUCKET);
        let newly = !self.0[idx];
        self.0[idx] = true;
        newly
    }

    pub fn is_marked(&self, bucket: usize) -> bool {
        self.0.get(bucket).copied().unwrap_or(false)
    }

    pub fn marked_count(&self) -> usize {
        self.0.iter().filter(|m| **m).count()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|m| *m)
    }

    /// Bucket indices not yet marked, ascending.
    pub fn missing(&self) -> Vec<usize> {
        (0..BUCKET_COUNT).filter(|i| !self.0[*i]).collect()
    }
}

/// Display label for a bucket index ("0".."12", ">12").
pub fn bucket_label(bucket: usize) -> String {
    if bucket >= OVERFLOW_BUCKET {
        ">12".to_string()
    } else {
        bucket.to_string()
    }
}

// ============================================================================
// Pools
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub has_paid: bool,
}

/// A team's row in the pool sheet plus whatever the current run has applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPool {
    pub team_name: String,
    buckets: RunBuckets,
    /// Completion marker as written in the sheet. Never consulted for decisions.
    pub sheet_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub games_played: u32,
    pub player: Option<Player>,
}

impl TeamPool {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            buckets: RunBuckets::new(),
            sheet_completed: false,
            completed_at: None,
            games_played: 0,
            player: None,
        }
    }

    pub fn with_buckets(mut self, buckets: RunBuckets) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.player = Some(player);
        self
    }

    pub fn buckets(&self) -> &RunBuckets {
        &self.buckets
    }

    /// Completion is derived from the buckets every time it is asked for.
    pub fn is_completed(&self) -> bool {
        self.buckets.is_full()
    }

    pub fn mark_bucket(&mut self, bucket: usize) -> bool {
        self.buckets.mark(bucket)
    }

    /// Record when and after how many games the pool was completed.
    /// Only the first stamp sticks.
    pub fn stamp_completion(&mut self, at: DateTime<Utc>, games_played: u32) {
        if self.completed_at.is_none() {
            self.completed_at = Some(at);
            self.games_played = games_played;
        }
    }
}

impl fmt::Display for TeamPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{} buckets)",
            self.team_name,
            self.buckets.marked_count(),
            BUCKET_COUNT
        )
    }
}
