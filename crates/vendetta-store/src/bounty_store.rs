//! Durable store for player-placed bounties, keyed by target.
//!
//! At most one live bounty exists per target; the economy engine is the
//! sole mutator. The store is rebuilt from `active_bounties.csv` at
//! startup and rewritten after every mutating operation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

use vendetta_types::{Bounty, PlayerId};

use crate::csv;
use crate::error::StoreError;

/// Header row for the bounty file. The trailing `kills_while_bountied`
/// column was added after the first release; loaders tolerate files
/// written without it.
const HEADER: &str = "target_id,target_name,placer_id,placer_name,amount,item_name,kills_while_bountied";

/// Name of the column that may be missing from older files.
const KILLS_COLUMN: &str = "kills_while_bountied";

/// In-memory map of active bounties with its backing file.
#[derive(Debug)]
pub struct BountyStore {
    path: PathBuf,
    bounties: BTreeMap<PlayerId, Bounty>,
}

impl BountyStore {
    /// Open the store at `path`, loading whatever rows can be read.
    ///
    /// A missing file yields an empty store; an unreadable file clears
    /// the store to empty (logged, not fatal); unparseable rows are
    /// skipped individually.
    pub fn open(path: PathBuf) -> Self {
        let mut store = Self {
            path,
            bounties: BTreeMap::new(),
        };
        store.reload();
        store
    }

    /// Re-read the backing file, replacing all in-memory rows.
    pub fn reload(&mut self) {
        self.bounties = match csv::read_file(&self.path) {
            Ok(Some(text)) => parse_bounties(&text),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "failed to read bounty store, starting empty");
                BTreeMap::new()
            }
        };
    }

    /// Look up the bounty on a target, if any.
    pub fn get(&self, target: PlayerId) -> Option<&Bounty> {
        self.bounties.get(&target)
    }

    /// Mutable access to the bounty on a target (self-claim progress).
    pub fn get_mut(&mut self, target: PlayerId) -> Option<&mut Bounty> {
        self.bounties.get_mut(&target)
    }

    /// Whether a live bounty exists on the target.
    pub fn contains(&self, target: PlayerId) -> bool {
        self.bounties.contains_key(&target)
    }

    /// Insert (or replace) the bounty on its target.
    pub fn insert(&mut self, bounty: Bounty) {
        self.bounties.insert(bounty.target_id, bounty);
    }

    /// Remove and return the bounty on a target.
    pub fn remove(&mut self, target: PlayerId) -> Option<Bounty> {
        self.bounties.remove(&target)
    }

    /// Number of active bounties.
    pub fn len(&self) -> usize {
        self.bounties.len()
    }

    /// Whether no bounties are active.
    pub fn is_empty(&self) -> bool {
        self.bounties.is_empty()
    }

    /// Iterate over all active bounties.
    pub fn values(&self) -> impl Iterator<Item = &Bounty> {
        self.bounties.values()
    }

    /// Rewrite the backing file from the in-memory rows.
    pub fn save(&self) -> Result<(), StoreError> {
        let rows: Vec<String> = self
            .bounties
            .values()
            .map(|b| {
                format!(
                    "{},{},{},{},{},{},{}",
                    b.target_id,
                    csv::escape(&b.target_name),
                    b.placer_id,
                    csv::escape(&b.placer_name),
                    b.amount,
                    csv::escape(&b.item_name),
                    b.kills_while_bountied
                )
            })
            .collect();
        csv::write_rows(&self.path, HEADER, &rows)
    }
}

/// Parse the bounty file body, skipping rows that do not parse.
fn parse_bounties(text: &str) -> BTreeMap<PlayerId, Bounty> {
    let records = csv::parse_records(text);
    let mut rows = records.into_iter();

    let Some(header) = rows.next() else {
        return BTreeMap::new();
    };
    let has_kills_column = header.iter().any(|h| h.contains(KILLS_COLUMN));
    let required_fields = if has_kills_column { 7 } else { 6 };

    let mut bounties = BTreeMap::new();
    for record in rows {
        if record.len() < required_fields {
            warn!(fields = record.len(), "skipping short bounty row");
            continue;
        }
        let Some(bounty) = parse_row(&record, has_kills_column) else {
            warn!("skipping unparseable bounty row");
            continue;
        };
        bounties.insert(bounty.target_id, bounty);
    }
    bounties
}

/// Parse one bounty record. Returns `None` when a numeric field fails.
fn parse_row(record: &[String], has_kills_column: bool) -> Option<Bounty> {
    let target_id: u64 = record.first()?.parse().ok()?;
    let target_name = record.get(1)?.clone();
    let placer_id: u64 = record.get(2)?.parse().ok()?;
    let placer_name = record.get(3)?.clone();
    let amount: i64 = record.get(4)?.parse().ok()?;
    let item_name = record.get(5)?.clone();
    // Older files predate self-claim progress; default it to zero.
    let kills_while_bountied: u32 = if has_kills_column {
        record.get(6).and_then(|f| f.parse().ok()).unwrap_or(0)
    } else {
        0
    };

    let mut bounty = Bounty::new(
        PlayerId(target_id),
        target_name,
        PlayerId(placer_id),
        placer_name,
        amount,
        item_name,
    );
    bounty.kills_while_bountied = kills_while_bountied;
    Some(bounty)
}
