//! Error types for the economy engine.

use std::path::PathBuf;

use crate::scheduler::SchedulerError;

/// Errors that can occur while operating the economy engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The clock scheduler failed.
    #[error("scheduler error: {source}")]
    Scheduler {
        /// The underlying scheduler error.
        #[from]
        source: SchedulerError,
    },

    /// The data directory could not be created.
    #[error("failed to create data directory {path}: {source}")]
    DataDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Why a bounty placement was rejected.
///
/// Validation failures leave no state behind; [`PaymentTransferFailed`]
/// is raised before any store mutation, so a failed escrow debit never
/// leaks a half-placed bounty.
///
/// [`PaymentTransferFailed`]: PlaceBountyError::PaymentTransferFailed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceBountyError {
    /// The bounty system is disabled by configuration.
    #[error("the bounty system is currently disabled")]
    Disabled,

    /// The amount is below the configured placement floor.
    #[error("bounty amount must be at least {minimum}")]
    BelowMinimum {
        /// The configured minimum amount.
        minimum: i64,
    },

    /// The amount is zero or negative.
    #[error("bounty amount must be positive, got {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: i64,
    },

    /// No online player matches the target name.
    #[error("player '{name}' not found or not online")]
    TargetNotFound {
        /// The name that failed to resolve.
        name: String,
    },

    /// The placer tried to put a bounty on themself.
    #[error("you cannot place a bounty on yourself")]
    SelfTarget,

    /// The target already has a live bounty.
    #[error("{target} already has an active bounty")]
    AlreadyBountied {
        /// Resolved display name of the target.
        target: String,
    },

    /// The placer does not hold enough of the payment item.
    #[error("not enough {item}: {required} required")]
    InsufficientFunds {
        /// The amount that would be escrowed.
        required: i64,
        /// Display name of the payment item.
        item: String,
    },

    /// The host failed to take the escrow from the placer.
    #[error("failed to take the bounty payment")]
    PaymentTransferFailed,
}
