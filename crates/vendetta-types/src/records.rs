//! Core entity records for the Vendetta bounty engine.
//!
//! Covers the player-placed [`Bounty`], the system-issued
//! [`AssassinContract`], the [`LeaderboardEntry`], and the
//! [`PlayerProfile`] handed over by the host's player directory.
//!
//! All records are plain data: the transition rules that create, mutate,
//! and destroy them live in the economy engine, which is their sole
//! mutator.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

// ---------------------------------------------------------------------------
// Bounty
// ---------------------------------------------------------------------------

/// A player-funded reward for killing a specific target player.
///
/// Invariants (enforced by the engine, not this struct):
/// - at most one live bounty per `target_id`;
/// - `placer_id != target_id`;
/// - `amount > 0` (the escrowed payment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    /// The player the bounty is on.
    pub target_id: PlayerId,
    /// Display name of the target at placement time.
    pub target_name: String,
    /// The player who placed (and funded) the bounty.
    pub placer_id: PlayerId,
    /// Display name of the placer at placement time.
    pub placer_name: String,
    /// Escrowed payment, in units of the configured payment item.
    pub amount: i64,
    /// Display name of the payment item the escrow was taken in.
    pub item_name: String,
    /// Kills the target has scored while bountied (self-claim progress).
    pub kills_while_bountied: u32,
}

impl Bounty {
    /// Create a fresh bounty with zero self-claim progress.
    pub const fn new(
        target_id: PlayerId,
        target_name: String,
        placer_id: PlayerId,
        placer_name: String,
        amount: i64,
        item_name: String,
    ) -> Self {
        Self {
            target_id,
            target_name,
            placer_id,
            placer_name,
            amount,
            item_name,
            kills_while_bountied: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Assassin contract
// ---------------------------------------------------------------------------

/// A system-issued objective: eliminate N players within a time limit.
///
/// At most one live contract exists per `player_id`. The contract is
/// destroyed on completion, expiry, or the holder's own death.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssassinContract {
    /// The player holding the contract.
    pub player_id: PlayerId,
    /// Display name of the holder at offer time.
    pub player_name: String,
    /// Kills required to complete the contract.
    pub kills_required: u32,
    /// Qualifying kills scored so far.
    pub kills_achieved: u32,
    /// Unix timestamp (seconds) after which the contract is expired.
    pub end_time_unix: i64,
    /// Reward paid on completion, in units of the configured payment item.
    pub reward: i64,
}

impl AssassinContract {
    /// Create a fresh contract with zero progress.
    pub const fn new(
        player_id: PlayerId,
        player_name: String,
        kills_required: u32,
        end_time_unix: i64,
        reward: i64,
    ) -> Self {
        Self {
            player_id,
            player_name,
            kills_required,
            kills_achieved: 0,
            end_time_unix,
            reward,
        }
    }

    /// Whether the contract has expired at the given wall-clock instant.
    pub const fn is_expired(&self, now_unix: i64) -> bool {
        now_unix >= self.end_time_unix
    }

    /// Kills still needed to complete the contract.
    pub const fn kills_remaining(&self) -> u32 {
        self.kills_required.saturating_sub(self.kills_achieved)
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// Lifetime bounty earnings of one player.
///
/// `total_claimed` only ever increases; the display name is refreshed to
/// the latest known name on every credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// The player the total belongs to.
    pub player_id: PlayerId,
    /// Latest known display name.
    pub name: String,
    /// Cumulative claimed amount across bounties and contracts.
    pub total_claimed: i64,
}

// ---------------------------------------------------------------------------
// Player profile
// ---------------------------------------------------------------------------

/// A player record as reported by the host's player directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Platform id of the player.
    pub id: PlayerId,
    /// Current display name.
    pub name: String,
    /// Whether the player is a server administrator.
    pub is_admin: bool,
    /// Whether the player currently has a live session.
    pub is_online: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fresh_bounty_has_no_self_claim_progress() {
        let bounty = Bounty::new(
            PlayerId(1),
            "Bob".to_owned(),
            PlayerId(2),
            "Alice".to_owned(),
            500,
            "Greater Stygian Shard".to_owned(),
        );
        assert_eq!(bounty.kills_while_bountied, 0);
        assert_eq!(bounty.amount, 500);
    }

    #[test]
    fn contract_expiry_is_inclusive_of_the_end_instant() {
        let contract = AssassinContract::new(PlayerId(1), "Bob".to_owned(), 3, 1_000, 2_000);
        assert!(!contract.is_expired(999));
        assert!(contract.is_expired(1_000));
        assert!(contract.is_expired(1_001));
    }

    #[test]
    fn kills_remaining_never_underflows() {
        let mut contract = AssassinContract::new(PlayerId(1), "Bob".to_owned(), 3, 1_000, 2_000);
        contract.kills_achieved = 5;
        assert_eq!(contract.kills_remaining(), 0);
    }
}
