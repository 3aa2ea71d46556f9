//! End-to-end scenarios against the public engine API.
//!
//! A scripted in-memory host stands in for the game server; a manual
//! clock drives every temporal rule. These tests mirror the situations
//! the system is specified around: the Alice/Bob/Carol bounty flow,
//! betrayal windows, contract lifecycles, and durability across an
//! engine restart.
#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use vendetta_core::{
    BountyOutcome, EconomyEngine, ItemBank, KillEvent, ManualTime, MarkerBoard, Messenger,
    PlayerDirectory, SelfClaimOutcome, VendettaConfig,
};
use vendetta_types::{GrantOutcome, ItemGuid, PlayerId, PlayerProfile};

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);
const CAROL: PlayerId = PlayerId(3);

/// Minimal in-memory host for driving the engine from the outside.
#[derive(Debug, Default)]
struct ScriptedHost {
    players: Vec<PlayerProfile>,
    balances: BTreeMap<PlayerId, i64>,
    notices: Vec<(PlayerId, String)>,
    markers: BTreeSet<PlayerId>,
}

impl ScriptedHost {
    fn with_players(specs: &[(u64, &str, i64)]) -> Self {
        let mut host = Self::default();
        for &(id, name, balance) in specs {
            host.players.push(PlayerProfile {
                id: PlayerId(id),
                name: name.to_owned(),
                is_admin: false,
                is_online: true,
            });
            host.balances.insert(PlayerId(id), balance);
        }
        host
    }

    fn balance(&self, player: PlayerId) -> i64 {
        self.balances.get(&player).copied().unwrap_or(0)
    }
}

impl PlayerDirectory for ScriptedHost {
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

impl ItemBank for ScriptedHost {
    fn player_has_item(&self, player: PlayerId, _item: ItemGuid, amount: i64) -> bool {
        self.balance(player) >= amount
    }

    fn debit_item(&mut self, player: PlayerId, _item: ItemGuid, amount: i64) -> bool {
        let balance = self.balances.entry(player).or_insert(0);
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }

    fn grant_item(&mut self, player: PlayerId, _item: ItemGuid, amount: i64) -> GrantOutcome {
        *self.balances.entry(player).or_insert(0) += amount;
        GrantOutcome::AddedToInventory
    }
}

impl Messenger for ScriptedHost {
    fn notify(&mut self, player: PlayerId, message: &str) {
        self.notices.push((player, message.to_owned()));
    }

    fn broadcast(&mut self, _message: &str) {}
}

impl MarkerBoard for ScriptedHost {
    fn set_map_marker(&mut self, player: PlayerId) {
        self.markers.insert(player);
    }

    fn clear_map_marker(&mut self, player: PlayerId) {
        self.markers.remove(&player);
    }
}

fn kill(victim: PlayerId, victim_name: &str, killer: PlayerId, killer_name: &str) -> KillEvent {
    KillEvent {
        victim_id: victim,
        victim_name: victim_name.to_owned(),
        killer_id: killer,
        killer_name: killer_name.to_owned(),
    }
}

fn standard_host() -> ScriptedHost {
    ScriptedHost::with_players(&[(1, "Alice", 10_000), (2, "Bob", 10_000), (3, "Carol", 10_000)])
}

#[test]
fn alice_bounties_bob_and_carol_collects() {
    let dir = tempfile::tempdir().unwrap();
    let time = Arc::new(ManualTime::new(1_000_000));
    let mut engine =
        EconomyEngine::new(VendettaConfig::default(), dir.path(), time).unwrap();
    let mut host = standard_host();

    // Alice places 500 on Bob.
    let bounty = engine
        .place_bounty(&mut host, ALICE, "Alice", "Bob", 500)
        .unwrap();
    assert_eq!(bounty.target_id, BOB);
    assert_eq!(bounty.placer_id, ALICE);
    assert_eq!(host.balance(ALICE), 9_500);
    assert!(host.markers.contains(&BOB));

    // Carol kills Bob.
    let report = engine.handle_kill(&mut host, &kill(BOB, "Bob", CAROL, "Carol"));
    assert_eq!(report.bounty, Some(BountyOutcome::ClaimedByKiller { amount: 500 }));
    assert_eq!(host.balance(CAROL), 10_500);
    assert!(!host.markers.contains(&BOB));
    assert!(engine.bounty_on(BOB).is_none());

    let top = engine.top_leaderboard(10);
    assert_eq!(top.len(), 1);
    assert_eq!(top.first().unwrap().player_id, CAROL);
    assert_eq!(top.first().unwrap().total_claimed, 500);
}

#[test]
fn betrayal_window_blocks_then_expires() {
    let dir = tempfile::tempdir().unwrap();
    let time = Arc::new(ManualTime::new(1_000_000));
    let mut engine =
        EconomyEngine::new(VendettaConfig::default(), dir.path(), time.clone()).unwrap();
    let mut host = standard_host();

    engine
        .place_bounty(&mut host, ALICE, "Alice", "Bob", 500)
        .unwrap();
    engine.record_clan_leave(CAROL, &[BOB]);

    // Inside the window: the kill resolves nothing.
    let report = engine.handle_kill(&mut host, &kill(BOB, "Bob", CAROL, "Carol"));
    assert!(report.betrayal);
    assert!(report.bounty.is_none());
    assert!(engine.bounty_on(BOB).is_some());

    // Past the window: an otherwise-identical kill resolves normally.
    time.advance(14_401);
    let report = engine.handle_kill(&mut host, &kill(BOB, "Bob", CAROL, "Carol"));
    assert!(!report.betrayal);
    assert_eq!(report.bounty, Some(BountyOutcome::ClaimedByKiller { amount: 500 }));
}

#[test]
fn self_claim_pays_the_bountied_player() {
    let dir = tempfile::tempdir().unwrap();
    let time = Arc::new(ManualTime::new(1_000_000));
    let mut config = VendettaConfig::default();
    config.claiming.kills_for_self_claim = 2;
    let mut engine = EconomyEngine::new(config, dir.path(), time).unwrap();
    let mut host = standard_host();

    engine
        .place_bounty(&mut host, ALICE, "Alice", "Bob", 800)
        .unwrap();

    let report = engine.handle_kill(&mut host, &kill(CAROL, "Carol", BOB, "Bob"));
    assert_eq!(
        report.self_claim,
        Some(SelfClaimOutcome::Progress { kills_remaining: 1 })
    );

    let report = engine.handle_kill(&mut host, &kill(ALICE, "Alice", BOB, "Bob"));
    assert_eq!(report.self_claim, Some(SelfClaimOutcome::Claimed { amount: 800 }));
    // 10_000 starting balance plus the 800 bounty.
    assert_eq!(host.balance(BOB), 10_800);
    assert!(engine.bounty_on(BOB).is_none());
}

#[test]
fn state_survives_an_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let time = Arc::new(ManualTime::new(1_000_000));
    let mut host = standard_host();

    {
        let mut engine =
            EconomyEngine::new(VendettaConfig::default(), dir.path(), time.clone()).unwrap();
        engine
            .place_bounty(&mut host, ALICE, "Alice", "Bob", 750)
            .unwrap();
        engine.record_clan_leave(CAROL, &[BOB]);
        engine.shutdown(&mut host);
    }

    let mut engine =
        EconomyEngine::new(VendettaConfig::default(), dir.path(), time).unwrap();
    let bounty = engine.bounty_on(BOB).cloned().unwrap();
    assert_eq!(bounty.amount, 750);
    assert_eq!(bounty.placer_name, "Alice");

    // The betrayal edge survived too: Carol still cannot claim.
    let report = engine.handle_kill(&mut host, &kill(BOB, "Bob", CAROL, "Carol"));
    assert!(report.betrayal);
    assert!(engine.bounty_on(BOB).is_some());
}

#[test]
fn leaderboard_accumulates_across_claims() {
    let dir = tempfile::tempdir().unwrap();
    let time = Arc::new(ManualTime::new(1_000_000));
    let mut engine =
        EconomyEngine::new(VendettaConfig::default(), dir.path(), time).unwrap();
    let mut host = standard_host();

    engine
        .place_bounty(&mut host, ALICE, "Alice", "Bob", 500)
        .unwrap();
    engine.handle_kill(&mut host, &kill(BOB, "Bob", CAROL, "Carol"));

    engine
        .place_bounty(&mut host, ALICE, "Alice", "Bob", 600)
        .unwrap();
    engine.handle_kill(&mut host, &kill(BOB, "Bob", CAROL, "Carol"));

    let status = engine.self_bounty_status(CAROL);
    assert_eq!(status.total_claimed, 1_100);
    assert!(status.bounty.is_none());
}

#[test]
fn kill_with_no_bounty_or_contract_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let time = Arc::new(ManualTime::new(1_000_000));
    let mut engine =
        EconomyEngine::new(VendettaConfig::default(), dir.path(), time).unwrap();
    let mut host = standard_host();

    let report = engine.handle_kill(&mut host, &kill(BOB, "Bob", CAROL, "Carol"));
    assert_eq!(report, Default::default());
    assert_eq!(host.balance(CAROL), 10_000);
    assert!(host.notices.is_empty());
}
