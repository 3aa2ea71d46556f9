//! A scripted in-memory host for standalone engine runs.
//!
//! The real deployment embeds the engine in a game server; this host
//! stands in for it with a fixed roster of players whose chat goes to
//! the log. It exists so the binary can exercise the full flow
//! (placement, kills, timers, persistence) without a server attached.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use vendetta_core::{ItemBank, MarkerBoard, Messenger, PlayerDirectory};
use vendetta_types::{GrantOutcome, ItemGuid, PlayerId, PlayerProfile};

/// In-memory host with a fixed roster and logged chat.
#[derive(Debug, Default)]
pub struct DemoHost {
    players: Vec<PlayerProfile>,
    balances: BTreeMap<PlayerId, i64>,
    markers: BTreeSet<PlayerId>,
}

impl DemoHost {
    /// Build the demo roster: three online players with deep pockets.
    pub fn new() -> Self {
        let mut host = Self::default();
        for (id, name) in [(101, "Aurelia"), (102, "Brakus"), (103, "Casimir")] {
            host.players.push(PlayerProfile {
                id: PlayerId(id),
                name: name.to_owned(),
                is_admin: false,
                is_online: true,
            });
            host.balances.insert(PlayerId(id), 5_000);
        }
        host
    }

    /// Current payment-item balance of a player.
    pub fn balance(&self, player: PlayerId) -> i64 {
        self.balances.get(&player).copied().unwrap_or(0)
    }

    /// Display name for a player id, for log lines.
    fn name_of(&self, player: PlayerId) -> &str {
        self.players
            .iter()
            .find(|p| p.id == player)
            .map_or("?", |p| p.name.as_str())
    }
}

impl PlayerDirectory for DemoHost {
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

impl ItemBank for DemoHost {
    fn player_has_item(&self, player: PlayerId, _item: ItemGuid, amount: i64) -> bool {
        self.balance(player) >= amount
    }

    fn debit_item(&mut self, player: PlayerId, _item: ItemGuid, amount: i64) -> bool {
        let balance = self.balances.entry(player).or_insert(0);
        if *balance < amount {
            return false;
        }
        *balance = balance.saturating_sub(amount);
        true
    }

    fn grant_item(&mut self, player: PlayerId, _item: ItemGuid, amount: i64) -> GrantOutcome {
        let balance = self.balances.entry(player).or_insert(0);
        *balance = balance.saturating_add(amount);
        GrantOutcome::AddedToInventory
    }
}

impl Messenger for DemoHost {
    fn notify(&mut self, player: PlayerId, message: &str) {
        info!(to = self.name_of(player), message, "chat");
    }

    fn broadcast(&mut self, message: &str) {
        info!(message, "broadcast");
    }
}

impl MarkerBoard for DemoHost {
    fn set_map_marker(&mut self, player: PlayerId) {
        self.markers.insert(player);
        info!(player = self.name_of(player), "map marker set");
    }

    fn clear_map_marker(&mut self, player: PlayerId) {
        self.markers.remove(&player);
        info!(player = self.name_of(player), "map marker cleared");
    }
}
