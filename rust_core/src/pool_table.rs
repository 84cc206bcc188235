//! Pool sheet loading.
//!
//! Sheet layout (one row per team, first row is a header):
//! - col 0: player name (optional)
//! - col 1: paid marker, non-empty means paid
//! - col 2: team name
//! - cols 3..=16: run buckets 0..=12 and ">12", non-empty means already hit
//! - col 17: completion marker kept by hand in the sheet
//!
//! Pools keep sheet order so that "first match" during reconciliation is
//! deterministic. Duplicate team names are a known limitation: the later row
//! replaces the earlier one (in the earlier row's position).

use crate::error::{PoolError, Result};
use crate::matching::{MatchConfidence, TeamMatcher};
use crate::models::{Player, RunBuckets, TeamPool, BUCKET_COUNT};
use csv::ReaderBuilder;
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Exact number of columns every sheet row must have.
pub const POOL_COLUMNS: usize = 18;

const PLAYER_COL: usize = 0;
const PAID_COL: usize = 1;
const TEAM_COL: usize = 2;
const FIRST_BUCKET_COL: usize = 3;
const COMPLETED_COL: usize = FIRST_BUCKET_COL + BUCKET_COUNT;

/// A pool selected for an outcome, and how confidently it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolMatch {
    pub index: usize,
    pub confidence: MatchConfidence,
}

/// Team pools keyed by team name, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct PoolTable {
    pools: Vec<TeamPool>,
    /// team name -> position in `pools`
    index: HashMap<String, usize>,
}

impl PoolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pool. A pool with the same team name is replaced in place.
    pub fn insert(&mut self, pool: TeamPool) {
        match self.index.get(&pool.team_name) {
            Some(&pos) => {
                warn!(
                    "Duplicate pool row for '{}', later row replaces earlier one",
                    pool.team_name
                );
                self.pools[pos] = pool;
            }
            None => {
                self.index.insert(pool.team_name.clone(), self.pools.len());
                self.pools.push(pool);
            }
        }
    }

    pub fn get(&self, team_name: &str) -> Option<&TeamPool> {
        self.index.get(team_name).map(|&pos| &self.pools[pos])
    }

    pub fn get_index(&self, index: usize) -> Option<&TeamPool> {
        self.pools.get(index)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut TeamPool> {
        self.pools.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamPool> {
        self.pools.iter()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.pools.iter().filter(|p| p.is_completed()).count()
    }

    /// Pick the pool for an outcome's team name: the highest confidence wins,
    /// and among equally confident pools the first in sheet order wins.
    pub fn find_match(&self, matcher: &dyn TeamMatcher, team_name: &str) -> Option<PoolMatch> {
        let mut best: Option<PoolMatch> = None;

        for (index, pool) in self.pools.iter().enumerate() {
            let confidence = matcher.match_team(&pool.team_name, team_name);
            if !confidence.is_match() {
                continue;
            }
            if best.map_or(true, |b| confidence > b.confidence) {
                best = Some(PoolMatch { index, confidence });
                if confidence == MatchConfidence::Exact {
                    break;
                }
            }
        }

        best
    }
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|c| c.as_str()).unwrap_or("")
}

/// Marker cells count as set when they hold anything at all, whitespace included.
fn is_marked(row: &[String], col: usize) -> bool {
    !cell(row, col).is_empty()
}

/// Build one pool from a validated row.
fn pool_from_row(row: &[String]) -> TeamPool {
    let mut buckets = RunBuckets::new();
    for bucket in 0..BUCKET_COUNT {
        if is_marked(row, FIRST_BUCKET_COL + bucket) {
            buckets.mark(bucket);
        }
    }

    let mut pool = TeamPool::new(cell(row, TEAM_COL).trim()).with_buckets(buckets);
    pool.sheet_completed = is_marked(row, COMPLETED_COL);

    if is_marked(row, PLAYER_COL) {
        pool = pool.with_player(Player {
            name: cell(row, PLAYER_COL).trim().to_string(),
            has_paid: is_marked(row, PAID_COL),
        });
    }

    if pool.sheet_completed != pool.is_completed() {
        warn!(
            "Sheet completion marker for '{}' disagrees with its buckets ({} of {} marked)",
            pool.team_name,
            pool.buckets().marked_count(),
            BUCKET_COUNT
        );
    }

    pool
}

/// Build the pool table from ingested rows. Row 0 is the header.
///
/// Every row is checked before any pool is built, so a bad row anywhere in
/// the sheet fails the load without a partially built table.
pub fn load_pool_table(rows: &[Vec<String>]) -> Result<PoolTable> {
    for (row_idx, row) in rows.iter().enumerate().skip(1) {
        if row.len() != POOL_COLUMNS {
            return Err(PoolError::MalformedRow {
                row: row_idx,
                columns: row.len(),
                expected: POOL_COLUMNS,
            });
        }
    }

    let mut table = PoolTable::new();
    for row in rows.iter().skip(1) {
        let pool = pool_from_row(row);
        debug!("Loaded pool {}", pool);
        table.insert(pool);
    }

    Ok(table)
}

/// Read raw CSV rows. Rows of any width are accepted here so the column
/// check in `load_pool_table` can report them.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(rows)
}

/// Parse a pool sheet from CSV.
pub fn read_pool_csv<R: Read>(reader: R) -> Result<PoolTable> {
    let rows = read_csv_rows(reader)?;
    load_pool_table(&rows)
}

/// Load a pool sheet from a CSV file on disk.
pub fn load_pool_file(path: impl AsRef<Path>) -> Result<PoolTable> {
    let file = std::fs::File::open(path)?;
    read_pool_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{ExactMatcher, SubstringMatcher};

    fn header() -> Vec<String> {
        let mut row = vec!["Player".to_string(), "Paid".to_string(), "Team".to_string()];
        row.extend((0..13).map(|i| i.to_string()));
        row.push(">12".to_string());
        row.push("Done".to_string());
        row
    }

    fn row(player: &str, paid: &str, team: &str, marked: &[usize]) -> Vec<String> {
        let mut row = vec![player.to_string(), paid.to_string(), team.to_string()];
        for bucket in 0..BUCKET_COUNT {
            row.push(if marked.contains(&bucket) { "x" } else { "" }.to_string());
        }
        row.push(String::new());
        row
    }

    #[test]
    fn test_header_skipped_and_buckets_loaded() {
        let rows = vec![header(), row("", "", "Red Sox", &[0, 2, 13])];
        let table = load_pool_table(&rows).unwrap();

        assert_eq!(table.len(), 1);
        let pool = table.get("Red Sox").unwrap();
        assert!(pool.buckets().is_marked(0));
        assert!(!pool.buckets().is_marked(1));
        assert!(pool.buckets().is_marked(2));
        assert!(pool.buckets().is_marked(13));
        assert_eq!(pool.buckets().marked_count(), 3);
        assert!(pool.player.is_none());
    }

    #[test]
    fn test_player_attached_only_when_named() {
        let rows = vec![
            header(),
            row("Alex", "y", "Red Sox", &[]),
            row("Sam", "", "Cubs", &[]),
            row("", "y", "Mets", &[]),
        ];
        let table = load_pool_table(&rows).unwrap();

        let alex = table.get("Red Sox").unwrap().player.clone().unwrap();
        assert_eq!(alex.name, "Alex");
        assert!(alex.has_paid);
        let sam = table.get("Cubs").unwrap().player.clone().unwrap();
        assert!(!sam.has_paid);
        assert!(table.get("Mets").unwrap().player.is_none());
    }

    #[test]
    fn test_short_row_is_fatal() {
        let mut short = row("", "", "Cubs", &[]);
        short.pop();
        let rows = vec![header(), row("", "", "Red Sox", &[]), short];
        match load_pool_table(&rows) {
            Err(PoolError::MalformedRow { row, columns, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(columns, 17);
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_long_row_is_fatal() {
        let mut long = row("", "", "Cubs", &[]);
        long.push("extra".to_string());
        let rows = vec![header(), long];
        assert!(matches!(
            load_pool_table(&rows),
            Err(PoolError::MalformedRow { row: 1, columns: 19, .. })
        ));
    }

    #[test]
    fn test_header_width_not_checked() {
        let rows = vec![vec!["Team".to_string()], row("", "", "Cubs", &[])];
        assert_eq!(load_pool_table(&rows).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_team_last_row_wins() {
        let rows = vec![
            header(),
            row("Alex", "", "Red Sox", &[1]),
            row("", "", "Cubs", &[]),
            row("Sam", "", "Red Sox", &[5]),
        ];
        let table = load_pool_table(&rows).unwrap();

        assert_eq!(table.len(), 2);
        let pool = table.get("Red Sox").unwrap();
        assert_eq!(pool.player.as_ref().unwrap().name, "Sam");
        assert!(pool.buckets().is_marked(5));
        assert!(!pool.buckets().is_marked(1));
        assert_eq!(table.get_index(0).unwrap().team_name, "Red Sox");
    }

    #[test]
    fn test_whitespace_marker_cells_count_as_marked() {
        let mut spaced = row(" Alex ", " ", " Red Sox ", &[]);
        spaced[FIRST_BUCKET_COL + 4] = " ".to_string();
        let rows = vec![header(), spaced];
        let table = load_pool_table(&rows).unwrap();

        let pool = table.get("Red Sox").unwrap();
        assert!(pool.buckets().is_marked(4));
        assert_eq!(pool.buckets().marked_count(), 1);
        let player = pool.player.as_ref().unwrap();
        assert_eq!(player.name, "Alex");
        assert!(player.has_paid);
    }

    #[test]
    fn test_sheet_completion_marker_is_only_a_hint() {
        let mut claimed = row("", "", "Cubs", &[0, 1]);
        claimed[COMPLETED_COL] = "yes".to_string();
        let rows = vec![header(), claimed];
        let table = load_pool_table(&rows).unwrap();

        let pool = table.get("Cubs").unwrap();
        assert!(pool.sheet_completed);
        assert!(!pool.is_completed());
    }

    #[test]
    fn test_read_pool_csv_reports_bad_width() {
        let csv = "Player,Paid,Team,0,1,2,3,4,5,6,7,8,9,10,11,12,>12,Done\n\
                   Alex,y,Red Sox,x,,,,,,,,,,,,,,\n\
                   ,,Cubs,x\n";
        match read_pool_csv(csv.as_bytes()) {
            Err(PoolError::MalformedRow { row, columns, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(columns, 4);
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_pool_csv() {
        let csv = "Player,Paid,Team,0,1,2,3,4,5,6,7,8,9,10,11,12,>12,Done\n\
                   Alex,y,Red Sox,x,,,,,,,,,,,,,x,\n\
                   ,,White Sox,,x,,,,,,,,,,,,,\n";
        let table = read_pool_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let red = table.get("Red Sox").unwrap();
        assert!(red.buckets().is_marked(0));
        assert!(red.buckets().is_marked(13));
        assert_eq!(red.player.as_ref().unwrap().name, "Alex");
        assert!(table.get("White Sox").unwrap().buckets().is_marked(1));
    }

    #[test]
    fn test_find_match_first_in_sheet_order() {
        let rows = vec![header(), row("", "", "Sox", &[]), row("", "", "Red", &[])];
        let table = load_pool_table(&rows).unwrap();

        let m = table.find_match(&SubstringMatcher, "Red Sox").unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.confidence, MatchConfidence::Partial);
    }

    #[test]
    fn test_find_match_prefers_exact_key() {
        let rows = vec![header(), row("", "", "Sox", &[]), row("", "", "Red Sox", &[])];
        let table = load_pool_table(&rows).unwrap();

        let m = table.find_match(&SubstringMatcher, "Red Sox").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.confidence, MatchConfidence::Exact);
    }

    #[test]
    fn test_find_match_exact_matcher() {
        let rows = vec![header(), row("", "", "Sox", &[])];
        let table = load_pool_table(&rows).unwrap();

        assert!(table.find_match(&ExactMatcher, "Red Sox").is_none());
        assert!(table.find_match(&ExactMatcher, "Sox").is_some());
    }
}
