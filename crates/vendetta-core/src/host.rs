//! Collaborator traits implemented by the embedding game host.
//!
//! The engine never talks to the game server directly; everything it
//! needs from the outside world goes through these narrow interfaces,
//! passed as `&mut dyn Host` into each operation. Tests substitute an
//! in-memory fake; the production host adapts its entity and chat
//! systems behind the same seams.

use vendetta_types::{GrantOutcome, ItemGuid, PlayerId, PlayerProfile};

/// Player lookup by name and enumeration of live sessions.
pub trait PlayerDirectory {
    /// Resolve a display name to a player.
    ///
    /// Matching is exact but case-insensitive. Implementations should
    /// return offline players too (with `is_online = false`); callers
    /// decide whether a live session is required.
    fn resolve_player(&self, name: &str) -> Option<PlayerProfile>;

    /// All players with a live session right now.
    fn online_players(&self) -> Vec<PlayerProfile>;
}

/// Access to player inventories for escrow and payouts.
pub trait ItemBank {
    /// Whether the player holds at least `amount` of `item`.
    fn player_has_item(&self, player: PlayerId, item: ItemGuid, amount: i64) -> bool;

    /// Remove `amount` of `item` from the player. Returns `false` when
    /// the debit could not be performed (nothing is taken partially).
    fn debit_item(&mut self, player: PlayerId, item: ItemGuid, amount: i64) -> bool;

    /// Give `amount` of `item` to the player, dropping what does not
    /// fit in the inventory.
    fn grant_item(&mut self, player: PlayerId, item: ItemGuid, amount: i64) -> GrantOutcome;
}

/// Delivery of chat/system messages.
pub trait Messenger {
    /// Send a message to one player.
    fn notify(&mut self, player: PlayerId, message: &str);

    /// Send a message to everyone on the server.
    fn broadcast(&mut self, message: &str);
}

/// Map markers shown on bountied players.
pub trait MarkerBoard {
    /// Show the bounty marker on a player.
    fn set_map_marker(&mut self, player: PlayerId);

    /// Remove the bounty marker from a player.
    fn clear_map_marker(&mut self, player: PlayerId);
}

/// The full host surface the engine operates against.
///
/// Blanket-implemented for anything providing the four collaborator
/// traits, so a host type only implements the narrow pieces.
pub trait Host: PlayerDirectory + ItemBank + Messenger + MarkerBoard {}

impl<T: PlayerDirectory + ItemBank + Messenger + MarkerBoard> Host for T {}
