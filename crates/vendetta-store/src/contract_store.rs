//! Durable store for active assassin contracts, keyed by holder.
//!
//! Contracts already expired at load time are dropped silently, so a
//! long server downtime never produces a burst of failure
//! notifications on startup.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

use vendetta_types::{AssassinContract, PlayerId};

use crate::csv;
use crate::error::StoreError;

/// Header row for the contract file.
const HEADER: &str = "player_id,player_name,kills_required,kills_achieved,end_time_unix,reward";

/// In-memory map of active contracts with its backing file.
#[derive(Debug)]
pub struct ContractStore {
    path: PathBuf,
    contracts: BTreeMap<PlayerId, AssassinContract>,
}

impl ContractStore {
    /// Open the store at `path`, dropping rows already expired at
    /// `now_unix`. Failure semantics match the other stores: missing
    /// file is empty, unreadable file clears to empty, bad rows skip.
    pub fn open(path: PathBuf, now_unix: i64) -> Self {
        let mut store = Self {
            path,
            contracts: BTreeMap::new(),
        };
        store.reload(now_unix);
        store
    }

    /// Re-read the backing file, replacing all in-memory rows.
    pub fn reload(&mut self, now_unix: i64) {
        self.contracts = match csv::read_file(&self.path) {
            Ok(Some(text)) => parse_contracts(&text, now_unix),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "failed to read contract store, starting empty");
                BTreeMap::new()
            }
        };
    }

    /// Look up the active contract held by a player, if any.
    pub fn get(&self, player: PlayerId) -> Option<&AssassinContract> {
        self.contracts.get(&player)
    }

    /// Mutable access to a player's contract (kill progress).
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut AssassinContract> {
        self.contracts.get_mut(&player)
    }

    /// Whether the player currently holds a contract.
    pub fn contains(&self, player: PlayerId) -> bool {
        self.contracts.contains_key(&player)
    }

    /// Insert (or replace) a player's contract.
    pub fn insert(&mut self, contract: AssassinContract) {
        self.contracts.insert(contract.player_id, contract);
    }

    /// Remove and return a player's contract.
    pub fn remove(&mut self, player: PlayerId) -> Option<AssassinContract> {
        self.contracts.remove(&player)
    }

    /// Number of active contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether no contracts are active.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Holders of contracts expired at the given instant.
    pub fn expired_holders(&self, now_unix: i64) -> Vec<PlayerId> {
        self.contracts
            .values()
            .filter(|c| c.is_expired(now_unix))
            .map(|c| c.player_id)
            .collect()
    }

    /// Rewrite the backing file from the in-memory rows.
    pub fn save(&self) -> Result<(), StoreError> {
        let rows: Vec<String> = self
            .contracts
            .values()
            .map(|c| {
                format!(
                    "{},{},{},{},{},{}",
                    c.player_id,
                    csv::escape(&c.player_name),
                    c.kills_required,
                    c.kills_achieved,
                    c.end_time_unix,
                    c.reward
                )
            })
            .collect();
        csv::write_rows(&self.path, HEADER, &rows)
    }
}

/// Parse the contract file body, skipping bad rows and expired rows.
fn parse_contracts(text: &str, now_unix: i64) -> BTreeMap<PlayerId, AssassinContract> {
    let records = csv::parse_records(text);
    let mut rows = records.into_iter();

    if rows.next().is_none() {
        return BTreeMap::new();
    }

    let mut contracts = BTreeMap::new();
    for record in rows {
        let Some(contract) = parse_row(&record) else {
            warn!("skipping unparseable contract row");
            continue;
        };
        if contract.is_expired(now_unix) {
            continue;
        }
        contracts.insert(contract.player_id, contract);
    }
    contracts
}

/// Parse one contract record. Returns `None` when a field fails.
fn parse_row(record: &[String]) -> Option<AssassinContract> {
    if record.len() != 6 {
        return None;
    }
    let player_id: u64 = record.first()?.parse().ok()?;
    let player_name = record.get(1)?.clone();
    let kills_required: u32 = record.get(2)?.parse().ok()?;
    let kills_achieved: u32 = record.get(3)?.parse().ok()?;
    let end_time_unix: i64 = record.get(4)?.parse().ok()?;
    let reward: i64 = record.get(5)?.parse().ok()?;

    let mut contract = AssassinContract::new(
        PlayerId(player_id),
        player_name,
        kills_required,
        end_time_unix,
        reward,
    );
    contract.kills_achieved = kills_achieved;
    Some(contract)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_contract(player: u64, end_time: i64) -> AssassinContract {
        AssassinContract::new(PlayerId(player), "Hunter".to_owned(), 5, end_time, 2_500)
    }

    #[test]
    fn save_then_reload_reproduces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active_contracts.csv");

        let mut store = ContractStore::open(path.clone(), 100);
        let mut contract = sample_contract(1, 5_000);
        contract.kills_achieved = 2;
        store.insert(contract.clone());
        store.save().unwrap();

        let reloaded = ContractStore::open(path, 100);
        assert_eq!(reloaded.get(PlayerId(1)), Some(&contract));
    }

    #[test]
    fn expired_rows_are_dropped_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active_contracts.csv");

        let mut store = ContractStore::open(path.clone(), 100);
        store.insert(sample_contract(1, 500));
        store.insert(sample_contract(2, 5_000));
        store.save().unwrap();

        // Time has moved past the first contract's deadline.
        let reloaded = ContractStore::open(path, 1_000);
        assert!(!reloaded.contains(PlayerId(1)));
        assert!(reloaded.contains(PlayerId(2)));
    }

    #[test]
    fn expired_holders_lists_only_past_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ContractStore::open(dir.path().join("c.csv"), 0);
        store.insert(sample_contract(1, 100));
        store.insert(sample_contract(2, 200));

        assert_eq!(store.expired_holders(50), Vec::<PlayerId>::new());
        assert_eq!(store.expired_holders(150), vec![PlayerId(1)]);
        assert_eq!(store.expired_holders(250), vec![PlayerId(1), PlayerId(2)]);
    }

    #[test]
    fn wrong_field_count_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active_contracts.csv");
        std::fs::write(
            &path,
            format!("{HEADER}\n1,Hunter,5,0,9000\n2,Hunter,5,0,9000,2500\n"),
        )
        .unwrap();

        let store = ContractStore::open(path, 100);
        assert_eq!(store.len(), 1);
        assert!(store.contains(PlayerId(2)));
    }
}
