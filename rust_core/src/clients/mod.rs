pub mod scoreboard;

// Re-export commonly used types
pub use scoreboard::{yesterday, ScoreboardClient, DEFAULT_SCOREBOARD_BASE_URL};
