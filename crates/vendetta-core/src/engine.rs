//! The economy engine: the single mutator of all bounty state.
//!
//! The engine owns the four stores (bounties, contracts, betrayal
//! cache, leaderboard) and the clock scheduler. Every mutation happens
//! from the host-tick execution context: either directly inside an
//! exposed operation (`place_bounty`, `handle_kill`, ...) or inside
//! [`EconomyEngine::pump`], which drains the scheduler queue and runs
//! the timer-driven work (contract offers, expiry sweeps, cache
//! cleanup) on the calling thread.
//!
//! Persistence is write-through and best-effort: each mutating
//! operation rewrites the affected store files, and a failed write is
//! logged while the in-memory state stays authoritative.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use vendetta_store::{BetrayalStore, BountyStore, ContractStore, LeaderboardStore};
use vendetta_types::{
    AssassinContract, Bounty, ItemGuid, LeaderboardEntry, PlayerId,
};

use crate::config::VendettaConfig;
use crate::error::EngineError;
use crate::host::Host;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::time::TimeSource;

/// Fixed period of the expired-contract sweep.
const CONTRACT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Fixed period of the betrayal-cache cleanup.
const BETRAYAL_CLEANUP_INTERVAL: Duration = Duration::from_secs(3_600);

/// Store file names inside the data directory.
const BOUNTIES_FILE: &str = "active_bounties.csv";
const CONTRACTS_FILE: &str = "active_contracts.csv";
const BETRAYAL_FILE: &str = "betrayal_cache.csv";
const LEADERBOARD_FILE: &str = "leaderboard.csv";

/// Commands enqueued by background timers and executed on the drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineTask {
    /// One attempt of the contract offer cycle (self-rescheduling).
    OfferContract,
    /// Remove contracts whose deadline has passed.
    SweepExpiredContracts,
    /// Prune expired betrayal edges.
    CleanupBetrayalCache,
}

/// A PvP kill reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillEvent {
    /// The player who died.
    pub victim_id: PlayerId,
    /// Display name of the victim.
    pub victim_name: String,
    /// The player who scored the kill.
    pub killer_id: PlayerId,
    /// Display name of the killer.
    pub killer_name: String,
}

/// What a bounty on the victim resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BountyOutcome {
    /// A third party collected the bounty.
    ClaimedByKiller {
        /// Amount paid to the killer.
        amount: i64,
    },
    /// The placer killed their own target and reclaimed the escrow.
    ReclaimedByPlacer {
        /// Amount refunded to the placer.
        amount: i64,
    },
    /// The placer killed their own target; the escrow is forfeit.
    VoidedPlacerKill,
}

/// Progress of the killer's own bounty (self-claim via kills).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfClaimOutcome {
    /// The counter advanced but the threshold is not reached yet.
    Progress {
        /// Kills still needed to self-claim.
        kills_remaining: u32,
    },
    /// The threshold was reached; the bounty paid out to its target.
    Claimed {
        /// Amount paid to the bountied player.
        amount: i64,
    },
}

/// What happened to the killer's assassin contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractOutcome {
    /// The kill counted but the contract is not complete yet.
    Progress {
        /// Kills still needed.
        kills_remaining: u32,
    },
    /// The contract completed and the reward was paid.
    Completed {
        /// Reward amount paid.
        reward: i64,
    },
    /// The contract had already expired; the kill did not count.
    VoidedExpired,
    /// A clan-betrayal kill; progress unchanged, contract still open.
    BetrayalIgnored,
}

/// Summary of a single kill event's processing, for callers and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillReport {
    /// The kill was between recent clanmates.
    pub betrayal: bool,
    /// Resolution of the bounty on the victim, if one existed.
    pub bounty: Option<BountyOutcome>,
    /// Progress of the killer's own bounty, if one existed.
    pub self_claim: Option<SelfClaimOutcome>,
    /// What happened to the killer's contract, if one existed.
    pub contract: Option<ContractOutcome>,
    /// The victim held a contract and it was voided by their death.
    pub victim_contract_voided: bool,
}

/// A player's own bounty situation, for the status surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfBountyStatus {
    /// Lifetime claimed total from the leaderboard.
    pub total_claimed: i64,
    /// The bounty on the player, if any.
    pub bounty: Option<Bounty>,
    /// Kills left to self-claim, when a bounty exists and self-claim
    /// is enabled.
    pub kills_remaining: Option<u32>,
}

/// A player's contract situation, for the status surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractStatus {
    /// The active contract.
    pub contract: AssassinContract,
    /// Seconds until the deadline (zero when already past).
    pub seconds_remaining: i64,
}

/// The economy engine. See the module docs for the concurrency model.
#[derive(Debug)]
pub struct EconomyEngine {
    pub(crate) config: VendettaConfig,
    pub(crate) time: Arc<dyn TimeSource>,
    pub(crate) scheduler: Scheduler<EngineTask>,
    pub(crate) offer_timer: Option<TimerHandle>,
    pub(crate) bounties: BountyStore,
    pub(crate) contracts: ContractStore,
    pub(crate) betrayals: BetrayalStore,
    pub(crate) leaderboard: LeaderboardStore,
}

impl EconomyEngine {
    /// Build the engine: load all stores from `data_dir` and start the
    /// background timers (offer cycle plus the two fixed sweeps).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DataDir`] when the data directory cannot
    /// be created, or [`EngineError::Scheduler`] when the timer runtime
    /// fails to start. Store load problems are not errors: per the
    /// durability contract they degrade to empty stores.
    pub fn new(
        config: VendettaConfig,
        data_dir: &Path,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self, EngineError> {
        std::fs::create_dir_all(data_dir).map_err(|source| EngineError::DataDir {
            path: data_dir.to_path_buf(),
            source,
        })?;

        let now = time.now_unix();
        let bounties = BountyStore::open(data_dir.join(BOUNTIES_FILE));
        let contracts = ContractStore::open(data_dir.join(CONTRACTS_FILE), now);
        let betrayals = BetrayalStore::open(data_dir.join(BETRAYAL_FILE), now);
        let leaderboard = LeaderboardStore::open(data_dir.join(LEADERBOARD_FILE));

        let mut scheduler = Scheduler::new()?;
        scheduler.run_every(
            EngineTask::SweepExpiredContracts,
            CONTRACT_SWEEP_INTERVAL,
            CONTRACT_SWEEP_INTERVAL,
        )?;
        scheduler.run_every(
            EngineTask::CleanupBetrayalCache,
            BETRAYAL_CLEANUP_INTERVAL,
            BETRAYAL_CLEANUP_INTERVAL,
        )?;

        let mut engine = Self {
            config,
            time,
            scheduler,
            offer_timer: None,
            bounties,
            contracts,
            betrayals,
            leaderboard,
        };
        engine.schedule_next_offer();

        info!(
            bounties = engine.bounties.len(),
            contracts = engine.contracts.len(),
            leaderboard = engine.leaderboard.len(),
            "economy engine initialized"
        );
        Ok(engine)
    }

    /// Drain the scheduler queue and run every pending timer command.
    ///
    /// Called exactly once per host tick. A failing command is logged
    /// and never blocks the commands behind it.
    pub fn pump(&mut self, host: &mut dyn Host) {
        for task in self.scheduler.drain_ready() {
            if let Err(e) = self.run_task(task, host) {
                error!(?task, error = %e, "scheduled task failed");
            }
        }
    }

    /// Execute one drained timer command.
    fn run_task(&mut self, task: EngineTask, host: &mut dyn Host) -> Result<(), EngineError> {
        match task {
            EngineTask::OfferContract => self.run_offer_cycle(host),
            EngineTask::SweepExpiredContracts => self.sweep_expired_contracts(host),
            EngineTask::CleanupBetrayalCache => self.cleanup_betrayal_cache(),
        }
        Ok(())
    }

    /// Process a PvP kill reported by the host.
    ///
    /// Substeps run in a fixed order against the pre-event state:
    /// (1) clan-betrayal check, (2) victim's-bounty resolution,
    /// (3) killer's self-bounty progress, (4) killer's contract
    /// progress, (5) victim's contract voiding. Each affected store is
    /// saved at most once, at the end.
    pub fn handle_kill(&mut self, host: &mut dyn Host, event: &KillEvent) -> KillReport {
        let mut report = KillReport::default();
        let mut bounties_changed = false;
        let mut leaderboard_changed = false;
        let mut contracts_changed = false;

        let betrayal = self.is_betrayal(event.killer_id, event.victim_id);
        report.betrayal = betrayal;

        if betrayal && self.bounties.contains(event.victim_id) {
            host.notify(
                event.killer_id,
                "You can't backstab your friend this early!",
            );
        }

        if !betrayal {
            if let Some(outcome) =
                self.resolve_bounty_on_victim(host, event, &mut leaderboard_changed)
            {
                report.bounty = Some(outcome);
                bounties_changed = true;
            }
        }

        if event.victim_id != event.killer_id {
            if let Some(outcome) = self.advance_self_bounty(
                host,
                event,
                &mut leaderboard_changed,
            ) {
                report.self_claim = Some(outcome);
                bounties_changed = true;
            }
        }

        if let Some(outcome) = self.advance_killer_contract(
            host,
            event,
            betrayal,
            &mut leaderboard_changed,
            &mut contracts_changed,
        ) {
            report.contract = Some(outcome);
        }

        if self.void_victim_contract(host, event) {
            report.victim_contract_voided = true;
            contracts_changed = true;
        }

        if bounties_changed {
            self.save_bounties();
        }
        if leaderboard_changed {
            self.save_leaderboard();
        }
        if contracts_changed {
            self.save_contracts();
        }
        report
    }

    // -----------------------------------------------------------------
    // Status and query surface
    // -----------------------------------------------------------------

    /// Active bounties, richest first.
    pub fn list_bounties(&self) -> Vec<Bounty> {
        let mut bounties: Vec<Bounty> = self.bounties.values().cloned().collect();
        bounties.sort_by(|a, b| b.amount.cmp(&a.amount));
        bounties
    }

    /// The bounty on a player, if any.
    pub fn bounty_on(&self, player: PlayerId) -> Option<&Bounty> {
        self.bounties.get(player)
    }

    /// The contract held by a player, if any.
    pub fn contract_for(&self, player: PlayerId) -> Option<&AssassinContract> {
        self.contracts.get(player)
    }

    /// A player's own bounty situation: lifetime total, the bounty on
    /// them (if any), and self-claim progress.
    pub fn self_bounty_status(&self, player: PlayerId) -> SelfBountyStatus {
        let bounty = self.bounties.get(player).cloned();
        let kills_remaining = bounty.as_ref().and_then(|b| {
            self.config.claiming.enable_self_claim.then(|| {
                self.config
                    .claiming
                    .kills_for_self_claim
                    .saturating_sub(b.kills_while_bountied)
            })
        });
        SelfBountyStatus {
            total_claimed: self.leaderboard.total_for(player),
            bounty,
            kills_remaining,
        }
    }

    /// A player's contract situation, if they hold one.
    pub fn contract_status(&self, player: PlayerId) -> Option<ContractStatus> {
        let contract = self.contracts.get(player)?.clone();
        let seconds_remaining = contract
            .end_time_unix
            .saturating_sub(self.time.now_unix())
            .max(0);
        Some(ContractStatus {
            contract,
            seconds_remaining,
        })
    }

    /// Top `n` leaderboard entries, sorted by lifetime total.
    pub fn top_leaderboard(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.leaderboard.top(n)
    }

    /// The currently effective configuration.
    pub const fn config(&self) -> &VendettaConfig {
        &self.config
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Manual recovery path: swap in a freshly loaded configuration,
    /// re-read every store from disk, and restart the offer cycle.
    pub fn reload(&mut self, config: VendettaConfig) {
        self.config = config;
        let now = self.time.now_unix();
        self.bounties.reload();
        self.contracts.reload(now);
        self.betrayals.reload(now);
        self.leaderboard.reload();

        if let Some(timer) = self.offer_timer.take() {
            timer.cancel();
        }
        self.schedule_next_offer();
        info!(
            bounties = self.bounties.len(),
            contracts = self.contracts.len(),
            "engine reloaded from disk"
        );
    }

    /// Re-establish map markers for online bountied targets.
    ///
    /// Called by the host after startup or reload, once it is ready to
    /// render markers.
    pub fn restore_map_markers(&self, host: &mut dyn Host) {
        if !self.config.map_icons.enabled {
            return;
        }
        for bounty in self.bounties.values() {
            if let Some(profile) = host.resolve_player(&bounty.target_name) {
                if profile.is_online {
                    host.set_map_marker(profile.id);
                }
            }
        }
    }

    /// Remove the map marker from every bountied player.
    pub fn clear_map_icons(&self, host: &mut dyn Host) {
        for bounty in self.bounties.values() {
            host.clear_map_marker(bounty.target_id);
        }
    }

    /// Shut the engine down: cancel all timers, drain what already
    /// fired, flush every store, and take down map markers.
    ///
    /// Timer disposal guarantees nothing new is enqueued afterwards,
    /// but the queue may still hold fired commands; the final pump
    /// executes them before the explicit saves.
    pub fn shutdown(&mut self, host: &mut dyn Host) {
        self.scheduler.dispose_all();
        self.offer_timer = None;
        self.pump(host);

        self.save_bounties();
        self.save_contracts();
        self.save_betrayals();
        self.save_leaderboard();

        if self.config.general.enabled && self.config.map_icons.enabled {
            self.clear_map_icons(host);
        }
        info!("economy engine shut down");
    }

    // -----------------------------------------------------------------
    // Persistence (best-effort: log and carry on)
    // -----------------------------------------------------------------

    pub(crate) fn save_bounties(&self) {
        if let Err(e) = self.bounties.save() {
            warn!(error = %e, "failed to save bounty store");
        }
    }

    pub(crate) fn save_contracts(&self) {
        if let Err(e) = self.contracts.save() {
            warn!(error = %e, "failed to save contract store");
        }
    }

    pub(crate) fn save_betrayals(&self) {
        if let Err(e) = self.betrayals.save() {
            warn!(error = %e, "failed to save betrayal cache");
        }
    }

    pub(crate) fn save_leaderboard(&self) {
        if let Err(e) = self.leaderboard.save() {
            warn!(error = %e, "failed to save leaderboard");
        }
    }

    /// The configured payment item.
    pub(crate) const fn payment_item(&self) -> ItemGuid {
        ItemGuid(self.config.payment.item_guid)
    }
}
