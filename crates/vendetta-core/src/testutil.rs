//! In-memory host fake and engine fixtures shared by the unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use vendetta_types::{GrantOutcome, ItemGuid, PlayerId, PlayerProfile};

use crate::config::VendettaConfig;
use crate::engine::{EconomyEngine, KillEvent};
use crate::host::{ItemBank, MarkerBoard, Messenger, PlayerDirectory};
use crate::time::ManualTime;

/// Unix timestamp the manual clock starts at in every test.
pub(crate) const TEST_EPOCH: i64 = 1_000_000;

/// A scriptable in-memory host: a player roster, payment-item balances,
/// and logs of every notification, broadcast, and marker change.
#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    players: Vec<PlayerProfile>,
    balances: BTreeMap<PlayerId, i64>,
    pub(crate) notices: Vec<(PlayerId, String)>,
    pub(crate) broadcasts: Vec<String>,
    pub(crate) markers: BTreeSet<PlayerId>,
    pub(crate) fail_debit: bool,
    pub(crate) fail_grant: bool,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add an online, non-admin player holding `balance` payment items.
    pub(crate) fn add_player(&mut self, id: u64, name: &str, balance: i64) {
        self.players.push(PlayerProfile {
            id: PlayerId(id),
            name: name.to_owned(),
            is_admin: false,
            is_online: true,
        });
        self.balances.insert(PlayerId(id), balance);
    }

    /// Add an online administrator.
    pub(crate) fn add_admin(&mut self, id: u64, name: &str) {
        self.players.push(PlayerProfile {
            id: PlayerId(id),
            name: name.to_owned(),
            is_admin: true,
            is_online: true,
        });
        self.balances.insert(PlayerId(id), 0);
    }

    /// Add an offline player.
    pub(crate) fn add_offline(&mut self, id: u64, name: &str) {
        self.players.push(PlayerProfile {
            id: PlayerId(id),
            name: name.to_owned(),
            is_admin: false,
            is_online: false,
        });
        self.balances.insert(PlayerId(id), 0);
    }

    /// Current payment-item balance of a player.
    pub(crate) fn balance(&self, player: PlayerId) -> i64 {
        self.balances.get(&player).copied().unwrap_or(0)
    }

    /// All notifications sent to one player, in order.
    pub(crate) fn notices_for(&self, player: PlayerId) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(id, _)| *id == player)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl PlayerDirectory for FakeHost {
    fn resolve_player(&self, name: &str) -> Option<PlayerProfile> {
        self.players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn online_players(&self) -> Vec<PlayerProfile> {
        self.players.iter().filter(|p| p.is_online).cloned().collect()
    }
}

impl ItemBank for FakeHost {
    fn player_has_item(&self, player: PlayerId, _item: ItemGuid, amount: i64) -> bool {
        self.balance(player) >= amount
    }

    fn debit_item(&mut self, player: PlayerId, _item: ItemGuid, amount: i64) -> bool {
        if self.fail_debit {
            return false;
        }
        let balance = self.balances.entry(player).or_insert(0);
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }

    fn grant_item(&mut self, player: PlayerId, _item: ItemGuid, amount: i64) -> GrantOutcome {
        if self.fail_grant {
            return GrantOutcome::Failed;
        }
        *self.balances.entry(player).or_insert(0) += amount;
        GrantOutcome::AddedToInventory
    }
}

impl Messenger for FakeHost {
    fn notify(&mut self, player: PlayerId, message: &str) {
        self.notices.push((player, message.to_owned()));
    }

    fn broadcast(&mut self, message: &str) {
        self.broadcasts.push(message.to_owned());
    }
}

impl MarkerBoard for FakeHost {
    fn set_map_marker(&mut self, player: PlayerId) {
        self.markers.insert(player);
    }

    fn clear_map_marker(&mut self, player: PlayerId) {
        self.markers.remove(&player);
    }
}

/// Build an engine on a fresh temp data dir with a manual clock.
///
/// The temp dir handle must be kept alive for the engine's lifetime.
pub(crate) fn test_engine(
    config: VendettaConfig,
) -> (tempfile::TempDir, Arc<ManualTime>, EconomyEngine) {
    let dir = tempfile::tempdir().unwrap();
    let time = Arc::new(ManualTime::new(TEST_EPOCH));
    let engine = EconomyEngine::new(config, &dir.path().join("data"), time.clone()).unwrap();
    (dir, time, engine)
}

/// Shorthand for building a [`KillEvent`].
pub(crate) fn kill_event(
    victim: PlayerId,
    victim_name: &str,
    killer: PlayerId,
    killer_name: &str,
) -> KillEvent {
    KillEvent {
        victim_id: victim,
        victim_name: victim_name.to_owned(),
        killer_id: killer,
        killer_name: killer_name.to_owned(),
    }
}
