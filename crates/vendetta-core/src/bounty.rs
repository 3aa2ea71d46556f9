//! Bounty placement and resolution rules.
//!
//! A bounty moves through a small state machine: placed (escrow taken),
//! optionally accumulating the target's own kills, then resolved by
//! exactly one of: a third-party claim, a placer kill (void or
//! reclaim), or a self-claim. Clan-betrayal kills short-circuit
//! resolution entirely and are handled before this module runs.

use tracing::{info, warn};

use vendetta_types::{Bounty, PlayerId};

use crate::engine::{BountyOutcome, EconomyEngine, KillEvent, SelfClaimOutcome};
use crate::error::PlaceBountyError;
use crate::host::Host;

impl EconomyEngine {
    /// Place a bounty of `amount` on the player named `target_name`.
    ///
    /// Validation happens in a fixed order and leaves no state behind;
    /// the escrow debit is the last step before the row is committed,
    /// so a failed debit never produces a half-placed bounty.
    pub fn place_bounty(
        &mut self,
        host: &mut dyn Host,
        placer_id: PlayerId,
        placer_name: &str,
        target_name: &str,
        amount: i64,
    ) -> Result<Bounty, PlaceBountyError> {
        if !self.config.general.enabled {
            return Err(PlaceBountyError::Disabled);
        }
        if amount < self.config.payment.minimum_bounty {
            return Err(PlaceBountyError::BelowMinimum {
                minimum: self.config.payment.minimum_bounty,
            });
        }
        if amount <= 0 {
            return Err(PlaceBountyError::InvalidAmount { amount });
        }

        let target = host
            .resolve_player(target_name)
            .filter(|p| p.is_online)
            .ok_or_else(|| PlaceBountyError::TargetNotFound {
                name: target_name.to_owned(),
            })?;

        if target.id == placer_id {
            return Err(PlaceBountyError::SelfTarget);
        }
        if self.bounties.contains(target.id) {
            return Err(PlaceBountyError::AlreadyBountied {
                target: target.name,
            });
        }

        let item = self.payment_item();
        let item_name = self.config.payment.item_name.clone();
        if !host.player_has_item(placer_id, item, amount) {
            return Err(PlaceBountyError::InsufficientFunds {
                required: amount,
                item: item_name,
            });
        }
        if !host.debit_item(placer_id, item, amount) {
            return Err(PlaceBountyError::PaymentTransferFailed);
        }

        let bounty = Bounty::new(
            target.id,
            target.name.clone(),
            placer_id,
            placer_name.to_owned(),
            amount,
            item_name.clone(),
        );
        self.bounties.insert(bounty.clone());
        self.save_bounties();

        if self.config.map_icons.enabled {
            host.set_map_marker(target.id);
        }

        host.notify(
            placer_id,
            &format!(
                "Bounty of {amount} {item_name} successfully placed on {}.",
                target.name
            ),
        );
        host.broadcast(&format!(
            "{placer_name} has placed a bounty on {} for {amount} {item_name}!",
            target.name
        ));
        info!(target = %target.id, placer = %placer_id, amount, "bounty placed");
        Ok(bounty)
    }

    /// Resolve the bounty on the kill's victim, if one exists.
    ///
    /// Returns the outcome and removes the row; the caller persists.
    pub(crate) fn resolve_bounty_on_victim(
        &mut self,
        host: &mut dyn Host,
        event: &KillEvent,
        leaderboard_changed: &mut bool,
    ) -> Option<BountyOutcome> {
        let bounty = self.bounties.get(event.victim_id)?.clone();

        let outcome = if event.killer_id == bounty.placer_id {
            self.resolve_placer_kill(host, event, &bounty, leaderboard_changed)
        } else {
            self.resolve_third_party_claim(host, event, &bounty, leaderboard_changed)
        };

        self.bounties.remove(event.victim_id);
        if self.config.map_icons.enabled {
            host.clear_map_marker(event.victim_id);
        }
        Some(outcome)
    }

    /// The placer killed their own target: void or reclaim per config.
    fn resolve_placer_kill(
        &mut self,
        host: &mut dyn Host,
        event: &KillEvent,
        bounty: &Bounty,
        leaderboard_changed: &mut bool,
    ) -> BountyOutcome {
        if self.config.claiming.forbid_placer_reclaim {
            host.notify(
                event.killer_id,
                &format!(
                    "You killed {}, your bounty target. No payment will be given.",
                    event.victim_name
                ),
            );
            host.broadcast(&format!(
                "{} neutralized their own bounty on {}. They shall not get paid.",
                event.killer_name, event.victim_name
            ));
            info!(placer = %event.killer_id, target = %event.victim_id, "bounty voided by placer kill");
            return BountyOutcome::VoidedPlacerKill;
        }

        host.notify(
            event.killer_id,
            &format!(
                "You killed {}, your bounty target. Bounty cleared, payment reclaimed.",
                event.victim_name
            ),
        );
        host.broadcast(&format!(
            "{} cleared their own bounty on {} and reclaimed the payment!",
            event.killer_name, event.victim_name
        ));
        let granted = host.grant_item(event.killer_id, self.payment_item(), bounty.amount);
        if !granted.is_delivered() {
            warn!(player = %event.killer_id, amount = bounty.amount, "escrow refund failed");
        }
        if self.config.leaderboard.placer_reclaim_adds_to_score
            && self
                .leaderboard
                .credit(event.killer_id, &event.killer_name, bounty.amount)
        {
            *leaderboard_changed = true;
        }
        BountyOutcome::ReclaimedByPlacer {
            amount: bounty.amount,
        }
    }

    /// A third party collected the bounty: pay and always credit the
    /// leaderboard.
    fn resolve_third_party_claim(
        &mut self,
        host: &mut dyn Host,
        event: &KillEvent,
        bounty: &Bounty,
        leaderboard_changed: &mut bool,
    ) -> BountyOutcome {
        let granted = host.grant_item(event.killer_id, self.payment_item(), bounty.amount);
        if !granted.is_delivered() {
            warn!(player = %event.killer_id, amount = bounty.amount, "bounty payout failed");
        }
        host.notify(
            event.killer_id,
            &format!(
                "You collected the {} {} bounty on {}!",
                bounty.amount, bounty.item_name, event.victim_name
            ),
        );
        host.broadcast(&format!(
            "{} collected the bounty on {} for {} {}!",
            event.killer_name, event.victim_name, bounty.amount, bounty.item_name
        ));
        if self
            .leaderboard
            .credit(event.killer_id, &event.killer_name, bounty.amount)
        {
            *leaderboard_changed = true;
        }
        info!(killer = %event.killer_id, target = %event.victim_id, amount = bounty.amount, "bounty claimed");
        BountyOutcome::ClaimedByKiller {
            amount: bounty.amount,
        }
    }

    /// Advance the killer's own bounty (self-claim via kills), if they
    /// have one and the feature is enabled.
    pub(crate) fn advance_self_bounty(
        &mut self,
        host: &mut dyn Host,
        event: &KillEvent,
        leaderboard_changed: &mut bool,
    ) -> Option<SelfClaimOutcome> {
        if !self.config.claiming.enable_self_claim {
            return None;
        }
        let threshold = self.config.claiming.kills_for_self_claim;

        let bounty = self.bounties.get_mut(event.killer_id)?;
        bounty.kills_while_bountied = bounty.kills_while_bountied.saturating_add(1);
        let snapshot = bounty.clone();

        if snapshot.kills_while_bountied >= threshold {
            return Some(self.process_self_claim(host, event, &snapshot, leaderboard_changed));
        }

        let kills_remaining = threshold.saturating_sub(snapshot.kills_while_bountied);
        host.notify(
            event.killer_id,
            &format!(
                "You have an active bounty on you. Get {kills_remaining} kill(s) to claim it!"
            ),
        );
        Some(SelfClaimOutcome::Progress { kills_remaining })
    }

    /// Pay the self-claimed bounty to its own target and remove it.
    fn process_self_claim(
        &mut self,
        host: &mut dyn Host,
        event: &KillEvent,
        bounty: &Bounty,
        leaderboard_changed: &mut bool,
    ) -> SelfClaimOutcome {
        let threshold = self.config.claiming.kills_for_self_claim;
        host.broadcast(&format!(
            "{} achieved {threshold} kills and has claimed their own bounty of {} {}!",
            event.killer_name, bounty.amount, bounty.item_name
        ));

        let granted = host.grant_item(event.killer_id, self.payment_item(), bounty.amount);
        if !granted.is_delivered() {
            warn!(player = %event.killer_id, amount = bounty.amount, "self-claim payout failed");
        }
        if self.config.leaderboard.self_claim_adds_to_score
            && self
                .leaderboard
                .credit(event.killer_id, &event.killer_name, bounty.amount)
        {
            *leaderboard_changed = true;
        }

        self.bounties.remove(event.killer_id);
        if self.config.map_icons.enabled {
            host.clear_map_marker(event.killer_id);
        }
        info!(player = %event.killer_id, amount = bounty.amount, "bounty self-claimed");
        SelfClaimOutcome::Claimed {
            amount: bounty.amount,
        }
    }
}
