//! Type-safe identifier wrappers around host platform integers.
//!
//! The game host identifies players by a 64-bit platform account id and
//! items by a signed 32-bit prefab identifier. Both are wrapped in
//! newtypes so the compiler rejects accidental mixing -- a bounty keyed
//! by an item id is a type error, not a runtime surprise.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player, as assigned by the host platform.
///
/// The engine never generates these; they arrive from the host via the
/// player directory and kill-event entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Return the inner platform id.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<PlayerId> for u64 {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Host prefab identifier for an item kind (e.g. the bounty payment item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemGuid(pub i32);

impl ItemGuid {
    /// Return the inner prefab id.
    pub const fn into_inner(self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for ItemGuid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ItemGuid {
    fn from(id: i32) -> Self {
        Self(id)
    }
}
