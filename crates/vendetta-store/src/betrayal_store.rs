//! Durable store for the clan-betrayal cooldown cache.
//!
//! The cache is a symmetric, time-expiring relation between two players
//! ("recently shared a clan"). It is held as a double-indexed adjacency
//! map so a lookup from either side is O(1). The backing file stores
//! each symmetric pair once, canonically ordered smaller-id-first;
//! loading re-expands both directions.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::warn;

use vendetta_types::PlayerId;

use crate::csv;
use crate::error::StoreError;

/// Header row for the betrayal-cache file.
const HEADER: &str = "player_a,player_b,expires_unix";

/// In-memory betrayal adjacency with its backing file.
#[derive(Debug)]
pub struct BetrayalStore {
    path: PathBuf,
    edges: BTreeMap<PlayerId, BTreeMap<PlayerId, i64>>,
}

impl BetrayalStore {
    /// Open the store at `path`, dropping edges already expired at
    /// `now_unix`.
    pub fn open(path: PathBuf, now_unix: i64) -> Self {
        let mut store = Self {
            path,
            edges: BTreeMap::new(),
        };
        store.reload(now_unix);
        store
    }

    /// Re-read the backing file, replacing all in-memory edges.
    pub fn reload(&mut self, now_unix: i64) {
        self.edges.clear();
        let text = match csv::read_file(&self.path) {
            Ok(Some(text)) => text,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "failed to read betrayal cache, starting empty");
                return;
            }
        };

        let records = csv::parse_records(&text);
        for record in records.into_iter().skip(1) {
            let parsed = parse_row(&record);
            let Some((a, b, expires_unix)) = parsed else {
                warn!("skipping unparseable betrayal row");
                continue;
            };
            if expires_unix > now_unix {
                self.insert_pair(a, b, expires_unix);
            }
        }
    }

    /// Insert the symmetric edge between two players, replacing any
    /// existing expiry. A self-edge is ignored.
    pub fn insert_pair(&mut self, a: PlayerId, b: PlayerId, expires_unix: i64) {
        if a == b {
            return;
        }
        self.edges.entry(a).or_default().insert(b, expires_unix);
        self.edges.entry(b).or_default().insert(a, expires_unix);
    }

    /// Whether a live edge exists from one player to another.
    pub fn is_live(&self, from: PlayerId, to: PlayerId, now_unix: i64) -> bool {
        self.edges
            .get(&from)
            .and_then(|peers| peers.get(&to))
            .is_some_and(|expires| now_unix < *expires)
    }

    /// Remove all expired edges and empty adjacency rows.
    ///
    /// Returns `true` when anything was removed, so the caller can
    /// persist only on change.
    pub fn prune_expired(&mut self, now_unix: i64) -> bool {
        let mut changed = false;
        for peers in self.edges.values_mut() {
            let before = peers.len();
            peers.retain(|_, expires| now_unix < *expires);
            if peers.len() != before {
                changed = true;
            }
        }
        let before = self.edges.len();
        self.edges.retain(|_, peers| !peers.is_empty());
        if self.edges.len() != before {
            changed = true;
        }
        changed
    }

    /// Whether the cache holds no edges at all.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Rewrite the backing file, one canonical row per symmetric pair.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut seen: BTreeSet<(PlayerId, PlayerId)> = BTreeSet::new();
        let mut rows: Vec<String> = Vec::new();
        for (&a, peers) in &self.edges {
            for (&b, &expires) in peers {
                let pair = if a < b { (a, b) } else { (b, a) };
                if seen.insert(pair) {
                    rows.push(format!("{},{},{expires}", pair.0, pair.1));
                }
            }
        }
        csv::write_rows(&self.path, HEADER, &rows)
    }
}

/// Parse one betrayal record into `(a, b, expires_unix)`.
fn parse_row(record: &[String]) -> Option<(PlayerId, PlayerId, i64)> {
    if record.len() != 3 {
        return None;
    }
    let a: u64 = record.first()?.parse().ok()?;
    let b: u64 = record.get(1)?.parse().ok()?;
    let expires_unix: i64 = record.get(2)?.parse().ok()?;
    Some((PlayerId(a), PlayerId(b), expires_unix))
}
