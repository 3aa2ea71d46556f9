//! Durable store for lifetime bounty earnings.
//!
//! Totals are monotonically non-decreasing per player; a credit also
//! refreshes the stored display name. The loader resolves columns by
//! header name, so files written with reordered columns still load.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

use vendetta_types::{LeaderboardEntry, PlayerId};

use crate::csv;
use crate::error::StoreError;

/// Header row for the leaderboard file.
const HEADER: &str = "player_id,name,total_claimed";

/// In-memory leaderboard with its backing file.
#[derive(Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
    entries: BTreeMap<PlayerId, LeaderboardEntry>,
}

impl LeaderboardStore {
    /// Open the store at `path`, loading whatever rows can be read.
    pub fn open(path: PathBuf) -> Self {
        let mut store = Self {
            path,
            entries: BTreeMap::new(),
        };
        store.reload();
        store
    }

    /// Re-read the backing file, replacing all in-memory rows.
    pub fn reload(&mut self) {
        self.entries = match csv::read_file(&self.path) {
            Ok(Some(text)) => parse_leaderboard(&text),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "failed to read leaderboard, starting empty");
                BTreeMap::new()
            }
        };
    }

    /// Add a claimed amount to a player's lifetime total.
    ///
    /// A non-positive amount is a no-op. Creates a zero-based entry for
    /// unknown players and refreshes the stored display name either
    /// way. Returns `true` when the total changed.
    pub fn credit(&mut self, player: PlayerId, name: &str, amount: i64) -> bool {
        if amount <= 0 {
            return false;
        }
        let entry = self.entries.entry(player).or_insert(LeaderboardEntry {
            player_id: player,
            name: name.to_owned(),
            total_claimed: 0,
        });
        entry.total_claimed = entry.total_claimed.saturating_add(amount);
        entry.name = name.to_owned();
        true
    }

    /// Lifetime total for a player, zero when unknown.
    pub fn total_for(&self, player: PlayerId) -> i64 {
        self.entries.get(&player).map_or(0, |e| e.total_claimed)
    }

    /// Top `n` entries sorted by total descending (stable ties).
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| b.total_claimed.cmp(&a.total_claimed));
        entries.truncate(n);
        entries
    }

    /// Number of players on the leaderboard.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the leaderboard is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the backing file, sorted by total descending.
    pub fn save(&self) -> Result<(), StoreError> {
        let rows: Vec<String> = self
            .top(usize::MAX)
            .iter()
            .map(|e| {
                format!(
                    "{},{},{}",
                    e.player_id,
                    csv::escape(&e.name),
                    e.total_claimed
                )
            })
            .collect();
        csv::write_rows(&self.path, HEADER, &rows)
    }
}

/// Parse the leaderboard body, resolving columns by header name.
fn parse_leaderboard(text: &str) -> BTreeMap<PlayerId, LeaderboardEntry> {
    let records = csv::parse_records(text);
    let mut rows = records.into_iter();

    let Some(header) = rows.next() else {
        return BTreeMap::new();
    };
    let column = |name: &str| header.iter().position(|h| h == name);
    let (Some(id_idx), Some(name_idx), Some(total_idx)) =
        (column("player_id"), column("name"), column("total_claimed"))
    else {
        warn!("leaderboard header is missing expected columns, starting empty");
        return BTreeMap::new();
    };

    let mut entries = BTreeMap::new();
    for record in rows {
        let parsed = (|| {
            let player_id: u64 = record.get(id_idx)?.parse().ok()?;
            let name = record.get(name_idx)?.clone();
            let total_claimed: i64 = record.get(total_idx)?.parse().ok()?;
            Some(LeaderboardEntry {
                player_id: PlayerId(player_id),
                name,
                total_claimed,
            })
        })();
        let Some(entry) = parsed else {
            warn!("skipping unparseable leaderboard row");
            continue;
        };
        entries.insert(entry.player_id, entry);
    }
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn open_empty() -> (tempfile::TempDir, LeaderboardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::open(dir.path().join("leaderboard.csv"));
        (dir, store)
    }

    #[test]
    fn credit_accumulates_and_refreshes_name() {
        let (_dir, mut store) = open_empty();
        assert!(store.credit(PlayerId(1), "Carol", 500));
        assert!(store.credit(PlayerId(1), "Carol_Renamed", 250));

        assert_eq!(store.total_for(PlayerId(1)), 750);
        assert_eq!(store.top(1)[0].name, "Carol_Renamed");
    }

    #[test]
    fn non_positive_credit_is_a_no_op() {
        let (_dir, mut store) = open_empty();
        assert!(!store.credit(PlayerId(1), "Carol", 0));
        assert!(!store.credit(PlayerId(1), "Carol", -50));
        assert!(store.is_empty());
    }

    #[test]
    fn totals_never_decrease() {
        let (_dir, mut store) = open_empty();
        let mut last = 0;
        for amount in [100, 0, 35, -10, 1] {
            store.credit(PlayerId(1), "Carol", amount);
            let total = store.total_for(PlayerId(1));
            assert!(total >= last);
            last = total;
        }
        assert_eq!(last, 136);
    }

    #[test]
    fn top_sorts_descending_and_truncates() {
        let (_dir, mut store) = open_empty();
        store.credit(PlayerId(1), "Low", 100);
        store.credit(PlayerId(2), "High", 900);
        store.credit(PlayerId(3), "Mid", 400);

        let top = store.top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "High");
        assert_eq!(top[1].name, "Mid");
    }

    #[test]
    fn save_then_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        let mut store = LeaderboardStore::open(path.clone());
        store.credit(PlayerId(1), "Na,me \"odd\"", 500);
        store.save().unwrap();

        let reloaded = LeaderboardStore::open(path);
        assert_eq!(reloaded.total_for(PlayerId(1)), 500);
        assert_eq!(reloaded.top(1)[0].name, "Na,me \"odd\"");
    }

    #[test]
    fn reordered_columns_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(&path, "total_claimed,player_id,name\n750,9,Carol\n").unwrap();

        let store = LeaderboardStore::open(path);
        assert_eq!(store.total_for(PlayerId(9)), 750);
    }

    #[test]
    fn unknown_header_clears_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();

        let store = LeaderboardStore::open(path);
        assert!(store.is_empty());
    }
}
