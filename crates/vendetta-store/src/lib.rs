//! Durable CSV-backed stores for the Vendetta bounty engine.
//!
//! Four independent stores persist the engine's process-lifetime state:
//! active bounties, active assassin contracts, the clan-betrayal
//! cooldown cache, and the lifetime-earnings leaderboard. Each store
//! owns its file path and in-memory map, is rebuilt from disk at
//! startup or reload, and rewrites its whole file after every mutating
//! operation (write-through).
//!
//! Durability is best-effort by design: load problems degrade to an
//! empty store or a skipped row (logged, never fatal), and callers are
//! expected to log-and-swallow save errors because the in-memory state
//! remains authoritative.
//!
//! # Modules
//!
//! - [`csv`] -- the shared delimited-text codec (RFC 4180-style quoting)
//! - [`bounty_store`] -- active bounties keyed by target
//! - [`contract_store`] -- active assassin contracts keyed by holder
//! - [`betrayal_store`] -- symmetric clan-betrayal cooldown edges
//! - [`leaderboard_store`] -- lifetime claimed totals

pub mod betrayal_store;
pub mod bounty_store;
pub mod contract_store;
pub mod csv;
pub mod error;
pub mod leaderboard_store;

// Re-export primary types at crate root.
pub use betrayal_store::BetrayalStore;
pub use bounty_store::BountyStore;
pub use contract_store::ContractStore;
pub use error::StoreError;
pub use leaderboard_store::LeaderboardStore;
