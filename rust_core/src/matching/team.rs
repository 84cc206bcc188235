//! Team name matchers
//!
//! The scoreboard and the pool sheet do not always agree on team names
//! ("Sox" in the sheet, "Red Sox" in the feed), so the default matcher
//! accepts a pool key contained in the feed's team name. That is ambiguous
//! when one key is contained in several names, e.g. "Sox" matches both
//! "Red Sox" and "White Sox". Matching is case-sensitive.

use super::{MatchConfidence, TeamMatcher};

/// Exact when equal, partial when the pool key appears inside the team name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl TeamMatcher for SubstringMatcher {
    fn match_team(&self, pool_key: &str, team_name: &str) -> MatchConfidence {
        // An empty key is contained in every name.
        if pool_key.is_empty() {
            return MatchConfidence::None;
        }
        if pool_key == team_name {
            MatchConfidence::Exact
        } else if team_name.contains(pool_key) {
            MatchConfidence::Partial
        } else {
            MatchConfidence::None
        }
    }

    fn matcher_name(&self) -> &str {
        "SubstringMatcher"
    }
}

/// Only identical names match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl TeamMatcher for ExactMatcher {
    fn match_team(&self, pool_key: &str, team_name: &str) -> MatchConfidence {
        if !pool_key.is_empty() && pool_key == team_name {
            MatchConfidence::Exact
        } else {
            MatchConfidence::None
        }
    }

    fn matcher_name(&self) -> &str {
        "ExactMatcher"
    }
}
