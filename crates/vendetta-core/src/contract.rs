//! Assassin contract rules: the offer cycle, expiry, and progress.
//!
//! The offer cycle is deliberately a self-rescheduling one-shot rather
//! than a periodic timer: after every attempt the next delay is redrawn
//! uniformly from the configured window, giving a bounded-uniform
//! arrival process with memory only of the last attempt. The expiry
//! sweep is an ordinary fixed-period timer.

use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use vendetta_types::AssassinContract;

use crate::engine::{ContractOutcome, EconomyEngine, EngineTask, KillEvent};
use crate::host::Host;

impl EconomyEngine {
    /// Draw the next offer delay and arm the one-shot timer.
    ///
    /// An invalid window (non-positive bound, or min above max) stops
    /// the cycle entirely; `reload` restarts it with fresh settings.
    pub(crate) fn schedule_next_offer(&mut self) {
        if !self.config.contracts.enabled {
            return;
        }
        let min = self.config.contracts.offer_min_interval_secs;
        let max = self.config.contracts.offer_max_interval_secs;
        if min <= 0 || max <= 0 || min > max {
            warn!(min, max, "invalid offer interval window, offer cycle stopped");
            return;
        }

        let delay_secs = rand::rng().random_range(min..=max);
        let delay = Duration::from_secs(u64::try_from(delay_secs).unwrap_or(0));

        if let Some(timer) = self.offer_timer.take() {
            timer.cancel();
        }
        let handle = self.scheduler.run_once_after(EngineTask::OfferContract, delay);
        self.offer_timer = Some(handle);
    }

    /// One firing of the offer cycle: attempt an offer, then re-arm.
    pub(crate) fn run_offer_cycle(&mut self, host: &mut dyn Host) {
        if self.config.general.enabled && self.config.contracts.enabled {
            self.try_offer_contract(host);
        }
        if self.config.general.enabled && self.config.contracts.enabled {
            self.schedule_next_offer();
        }
    }

    /// Attempt to offer a contract to one eligible online player.
    ///
    /// Skips silently when the cap is reached or nobody is eligible.
    /// Eligible means: online, not an admin, not already holding a
    /// contract, and not currently the target of a player bounty.
    pub(crate) fn try_offer_contract(&mut self, host: &mut dyn Host) -> Option<AssassinContract> {
        if !self.config.contracts.enabled {
            return None;
        }
        let cap = self.config.contracts.max_active;
        if cap > 0 && self.contracts.len() >= cap {
            return None;
        }

        let candidates: Vec<_> = host
            .online_players()
            .into_iter()
            .filter(|p| {
                p.is_online
                    && !p.is_admin
                    && !self.contracts.contains(p.id)
                    && !self.bounties.contains(p.id)
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let mut rng = rand::rng();
        let target = candidates.get(rng.random_range(0..candidates.len()))?;

        let min_kills = self.config.contracts.min_kills;
        let max_kills = self.config.contracts.max_kills;
        let kills_required = if min_kills >= max_kills {
            min_kills
        } else {
            rng.random_range(min_kills..=max_kills)
        };

        let min_reward = self.config.contracts.min_reward;
        let max_reward = self.config.contracts.max_reward;
        let reward = if min_reward >= max_reward {
            min_reward
        } else {
            rng.random_range(min_reward..=max_reward)
        };

        if reward <= 0 || kills_required == 0 {
            return None;
        }

        let time_limit = self.config.contracts.time_limit_secs;
        let end_time_unix = self.time.now_unix().saturating_add(time_limit);
        let contract = AssassinContract::new(
            target.id,
            target.name.clone(),
            kills_required,
            end_time_unix,
            reward,
        );

        self.contracts.insert(contract.clone());
        self.save_contracts();

        let minutes = time_limit.div_euclid(60);
        let seconds = time_limit.rem_euclid(60);
        host.notify(
            target.id,
            "You have received a contract from the association!",
        );
        host.notify(
            target.id,
            &format!("Eliminate {kills_required} players within {minutes}m {seconds}s."),
        );
        host.notify(
            target.id,
            &format!(
                "Reward for success: {reward} {}. Failure means no reward.",
                self.config.payment.item_name
            ),
        );
        info!(player = %target.id, kills_required, reward, "assassin contract offered");
        Some(contract)
    }

    /// Remove every contract whose deadline has passed, notifying the
    /// holders. Persists only when something was removed.
    pub(crate) fn sweep_expired_contracts(&mut self, host: &mut dyn Host) {
        if self.contracts.is_empty()
            || !self.config.general.enabled
            || !self.config.contracts.enabled
        {
            return;
        }

        let now = self.time.now_unix();
        let expired = self.contracts.expired_holders(now);
        if expired.is_empty() {
            return;
        }

        for player in expired {
            if self.contracts.remove(player).is_some() {
                host.notify(
                    player,
                    "Time's up! Your contract has expired. You have failed the association's requests.",
                );
                info!(%player, "assassin contract expired");
            }
        }
        self.save_contracts();
    }

    /// Advance (or void) the killer's contract for this kill.
    ///
    /// `contracts_changed` is set only when store state actually
    /// changed; a betrayal-ignored kill leaves the contract untouched.
    pub(crate) fn advance_killer_contract(
        &mut self,
        host: &mut dyn Host,
        event: &KillEvent,
        betrayal: bool,
        leaderboard_changed: &mut bool,
        contracts_changed: &mut bool,
    ) -> Option<ContractOutcome> {
        let now = self.time.now_unix();
        let contract = self.contracts.get(event.killer_id)?;

        if contract.is_expired(now) {
            host.notify(
                event.killer_id,
                "Too slow! Your contract had already expired. This kill does not count.",
            );
            self.contracts.remove(event.killer_id);
            *contracts_changed = true;
            return Some(ContractOutcome::VoidedExpired);
        }

        if betrayal && self.config.betrayal.enabled {
            host.notify(
                event.killer_id,
                "This kill on a former clanmate does not count towards your contract.",
            );
            return Some(ContractOutcome::BetrayalIgnored);
        }

        let contract = self.contracts.get_mut(event.killer_id)?;
        contract.kills_achieved = contract.kills_achieved.saturating_add(1);
        let snapshot = contract.clone();
        *contracts_changed = true;

        if snapshot.kills_achieved >= snapshot.kills_required {
            host.notify(
                event.killer_id,
                &format!(
                    "Contract complete! You have eliminated {} targets.",
                    snapshot.kills_required
                ),
            );
            host.notify(
                event.killer_id,
                &format!(
                    "Reward: {} {} has been paid.",
                    snapshot.reward, self.config.payment.item_name
                ),
            );
            let granted = host.grant_item(event.killer_id, self.payment_item(), snapshot.reward);
            if !granted.is_delivered() {
                warn!(player = %event.killer_id, reward = snapshot.reward, "contract payout failed");
            }
            if self
                .leaderboard
                .credit(event.killer_id, &event.killer_name, snapshot.reward)
            {
                *leaderboard_changed = true;
            }
            self.contracts.remove(event.killer_id);
            info!(player = %event.killer_id, reward = snapshot.reward, "assassin contract completed");
            return Some(ContractOutcome::Completed {
                reward: snapshot.reward,
            });
        }

        let kills_remaining = snapshot.kills_remaining();
        host.notify(
            event.killer_id,
            &format!(
                "Contract progress: {}/{} targets eliminated. {kills_remaining} more to go.",
                snapshot.kills_achieved, snapshot.kills_required
            ),
        );
        Some(ContractOutcome::Progress { kills_remaining })
    }

    /// Void the victim's contract: the holder was eliminated.
    pub(crate) fn void_victim_contract(&mut self, host: &mut dyn Host, event: &KillEvent) -> bool {
        if self.contracts.remove(event.victim_id).is_none() {
            return false;
        }
        host.notify(
            event.victim_id,
            "You were eliminated. Your contract has been voided. You have failed the association's requests.",
        );
        info!(player = %event.victim_id, "assassin contract voided by death");
        true
    }
}
