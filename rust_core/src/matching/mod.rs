//! Team Matching Abstractions
//!
//! Defines the TeamMatcher trait that decides whether a pool sheet key
//! refers to the team named in a game outcome. The reconciler only ever asks
//! the pool table for a match, so a stricter matcher can be swapped in
//! without touching its control flow.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Concrete matcher implementations
pub mod team;

pub use team::{ExactMatcher, SubstringMatcher};

/// Match confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchConfidence {
    None = 0,
    Partial = 1, // Pool key found inside the outcome's team name
    Exact = 2,   // Pool key equals the outcome's team name
}

impl MatchConfidence {
    pub fn is_match(&self) -> bool {
        *self > MatchConfidence::None
    }
}

/// Pool-key to team-name matcher
pub trait TeamMatcher: Send + Sync {
    /// Compare a pool sheet key against the team name from an outcome.
    fn match_team(&self, pool_key: &str, team_name: &str) -> MatchConfidence;

    /// Matcher name for logging and debugging
    fn matcher_name(&self) -> &str;
}

/// Named matching strategies, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    #[default]
    Substring,
    Exact,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Substring => "substring",
            MatchStrategy::Exact => "exact",
        }
    }

    pub fn matcher(&self) -> Box<dyn TeamMatcher> {
        match self {
            MatchStrategy::Substring => Box::new(SubstringMatcher),
            MatchStrategy::Exact => Box::new(ExactMatcher),
        }
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" | "partial" => Ok(MatchStrategy::Substring),
            "exact" => Ok(MatchStrategy::Exact),
            other => Err(format!("Unknown match strategy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(MatchConfidence::Exact > MatchConfidence::Partial);
        assert!(MatchConfidence::Partial > MatchConfidence::None);
        assert!(!MatchConfidence::None.is_match());
        assert!(MatchConfidence::Partial.is_match());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("substring".parse::<MatchStrategy>(), Ok(MatchStrategy::Substring));
        assert_eq!("EXACT".parse::<MatchStrategy>(), Ok(MatchStrategy::Exact));
        assert!("fuzzy".parse::<MatchStrategy>().is_err());
    }

    #[test]
    fn test_strategy_builds_matcher() {
        assert_eq!(MatchStrategy::Substring.matcher().matcher_name(), "SubstringMatcher");
        assert_eq!(MatchStrategy::Exact.matcher().matcher_name(), "ExactMatcher");
        assert_eq!(MatchStrategy::default(), MatchStrategy::Substring);
    }
}
