//! Clock scheduler, configuration, and economy engine for Vendetta.
//!
//! This crate is the heart of the bounty system. The
//! [`EconomyEngine`] owns all mutable state (bounty, contract,
//! betrayal, and leaderboard stores) and is only ever driven from the
//! host's per-tick update: exposed operations run inline, and
//! timer-driven work crosses over via the [`Scheduler`]'s command
//! queue, drained once per tick by [`EconomyEngine::pump`].
//!
//! # Modules
//!
//! - [`config`] -- typed YAML configuration with shipped defaults
//! - [`time`] -- wall-clock abstraction (`TimeSource`)
//! - [`scheduler`] -- background timers bridged onto the host tick
//! - [`host`] -- collaborator traits implemented by the game host
//! - [`engine`] -- the economy engine and its kill pipeline
//! - [`error`] -- engine and placement error types
//!
//! The bounty, contract, and betrayal rules live in private modules as
//! `impl` blocks on [`EconomyEngine`].

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod scheduler;
pub mod time;

mod betrayal;
mod bounty;
mod contract;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export primary types at crate root.
pub use config::{ConfigError, VendettaConfig};
pub use engine::{
    BountyOutcome, ContractOutcome, ContractStatus, EconomyEngine, EngineTask, KillEvent,
    KillReport, SelfBountyStatus, SelfClaimOutcome,
};
pub use error::{EngineError, PlaceBountyError};
pub use host::{Host, ItemBank, MarkerBoard, Messenger, PlayerDirectory};
pub use scheduler::{Scheduler, SchedulerError, TimerHandle};
pub use time::{ManualTime, SystemTimeSource, TimeSource};
