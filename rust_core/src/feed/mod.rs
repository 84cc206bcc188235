//! Scoreboard feed parsing.
//!
//! The feed is the MLB "master scoreboard" document. Every leaf is a string,
//! including wins, losses and runs, so numeric fields are parsed here and a
//! single bad value fails the whole feed.

use crate::error::{PoolError, Result};
use crate::models::{GameSide, TeamOutcome};
use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

/// `time_date` layout: "2024/06/01 7:05". The hour is on a 12-hour clock
/// without a meridiem and may be a single digit.
pub const TIME_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoreboardDocument {
    pub data: ScoreboardData,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoreboardData {
    #[serde(default)]
    pub games: GameList,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GameList {
    /// The feed collapses a one-game day into a bare object instead of an array.
    #[serde(default, deserialize_with = "one_or_many")]
    pub game: Vec<GameRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GameRecord {
    pub home_team_city: String,
    pub home_team_name: String,
    pub home_win: String,
    pub home_loss: String,
    pub away_team_city: String,
    pub away_team_name: String,
    pub away_win: String,
    pub away_loss: String,
    pub linescore: Linescore,
    pub time_date: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Linescore {
    pub r: RunLine,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RunLine {
    pub home: String,
    pub away: String,
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<GameRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<GameRecord>),
        One(Box<GameRecord>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(games) => games,
        OneOrMany::One(game) => vec![*game],
    })
}

impl GameRecord {
    /// Both halves of this game, home first. The shared timestamp is parsed once.
    pub fn outcomes(&self, game: usize) -> Result<[TeamOutcome; 2]> {
        let game_time = parse_time_date(game, &self.time_date)?;
        Ok([
            self.side_outcome(game, GameSide::Home, game_time)?,
            self.side_outcome(game, GameSide::Away, game_time)?,
        ])
    }

    fn side_outcome(
        &self,
        game: usize,
        side: GameSide,
        game_time: DateTime<Utc>,
    ) -> Result<TeamOutcome> {
        let (city, team_name, wins, losses, runs) = match side {
            GameSide::Home => (
                &self.home_team_city,
                &self.home_team_name,
                ("home_win", &self.home_win),
                ("home_loss", &self.home_loss),
                ("linescore.r.home", &self.linescore.r.home),
            ),
            GameSide::Away => (
                &self.away_team_city,
                &self.away_team_name,
                ("away_win", &self.away_win),
                ("away_loss", &self.away_loss),
                ("linescore.r.away", &self.linescore.r.away),
            ),
        };

        Ok(TeamOutcome {
            city: city.clone(),
            team_name: team_name.clone(),
            side,
            wins: parse_count(game, wins.0, wins.1)?,
            losses: parse_count(game, losses.0, losses.1)?,
            runs: parse_count(game, runs.0, runs.1)?,
            game_time,
        })
    }
}

/// Parse a non-negative integer stored as text.
fn parse_count(game: usize, field: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| PoolError::feed_parse(game, field, raw))
}

/// Parse the feed's `time_date` value. The feed carries no zone, so the time
/// is taken as UTC.
pub fn parse_time_date(game: usize, raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), TIME_DATE_FORMAT)
        .map_err(|_| PoolError::feed_parse(game, "time_date", raw))?;

    // 12-hour clock: 13..=23 never appears in a well-formed feed.
    if naive.hour() > 12 {
        return Err(PoolError::feed_parse(game, "time_date", raw));
    }

    Ok(Utc.from_utc_datetime(&naive))
}

/// Turn every game in the document into its two team outcomes, in game
/// order with home before away. Any malformed field aborts the whole feed.
pub fn parse_outcomes(doc: &ScoreboardDocument) -> Result<Vec<TeamOutcome>> {
    let games = &doc.data.games.game;
    let mut outcomes = Vec::with_capacity(games.len() * 2);

    for (idx, game) in games.iter().enumerate() {
        let [home, away] = game.outcomes(idx)?;
        debug!(
            "Game {}: {} {} - {} {} ({})",
            idx, home.team_name, home.runs, away.team_name, away.runs, home.game_time
        );
        outcomes.push(home);
        outcomes.push(away);
    }

    Ok(outcomes)
}

/// Deserialize a raw feed body and extract its outcomes.
pub fn parse_feed_json(raw: &str) -> Result<Vec<TeamOutcome>> {
    let doc: ScoreboardDocument = serde_json::from_str(raw)?;
    parse_outcomes(&doc)
}
