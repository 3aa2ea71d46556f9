//! Enumeration types shared across the Vendetta workspace.

use serde::{Deserialize, Serialize};

/// Outcome of granting items to a player via the host inventory.
///
/// The host may not be able to place everything in the inventory; the
/// engine treats every variant except [`GrantOutcome::Failed`] as a
/// successful payout (the items exist in the world either way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantOutcome {
    /// Everything fit into the player's inventory.
    AddedToInventory,
    /// Part of the grant fit; the remainder was dropped at the player.
    PartiallyAddedAndDropped,
    /// Nothing fit; the full grant was dropped at the player.
    DroppedOnGround,
    /// The host could not deliver the items at all.
    Failed,
}

impl GrantOutcome {
    /// Whether the items were delivered to the world in some form.
    pub const fn is_delivered(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failed_counts_as_undelivered() {
        assert!(GrantOutcome::AddedToInventory.is_delivered());
        assert!(GrantOutcome::PartiallyAddedAndDropped.is_delivered());
        assert!(GrantOutcome::DroppedOnGround.is_delivered());
        assert!(!GrantOutcome::Failed.is_delivered());
    }
}
