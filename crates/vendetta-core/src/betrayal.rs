//! Clan-betrayal cooldown rules.
//!
//! Leaving (or being removed from) a clan covers the leaver and every
//! former clanmate against each other for a configured window: kills
//! between them resolve no bounty and advance no contract. The cache
//! itself lives in the store crate; this module applies the config
//! gates and wall-clock.

use tracing::info;

use vendetta_types::PlayerId;

use crate::engine::EconomyEngine;

impl EconomyEngine {
    /// Record a clan leave: cover the leaver against every former
    /// clanmate (and vice versa) until the cooldown elapses.
    ///
    /// No-op when the feature is disabled or the cooldown is
    /// non-positive.
    pub fn record_clan_leave(&mut self, leaver: PlayerId, former_mates: &[PlayerId]) {
        if !self.config.betrayal.enabled || self.config.betrayal.cooldown_secs <= 0 {
            return;
        }
        let expires_unix = self
            .time
            .now_unix()
            .saturating_add(self.config.betrayal.cooldown_secs);

        for &mate in former_mates {
            if mate == leaver {
                continue;
            }
            self.betrayals.insert_pair(leaver, mate, expires_unix);
        }
        self.save_betrayals();
        info!(%leaver, mates = former_mates.len(), "clan leave recorded");
    }

    /// Whether a kill between these two players is a clan betrayal.
    pub(crate) fn is_betrayal(&self, killer: PlayerId, victim: PlayerId) -> bool {
        self.config.betrayal.enabled
            && self.betrayals.is_live(killer, victim, self.time.now_unix())
    }

    /// Prune expired betrayal edges; persists only when something
    /// changed.
    pub(crate) fn cleanup_betrayal_cache(&mut self) {
        if self.betrayals.is_empty() {
            return;
        }
        if self.betrayals.prune_expired(self.time.now_unix()) {
            self.save_betrayals();
        }
    }
}
