//! Wall-clock abstraction for the economy engine.
//!
//! Every temporal rule in the engine (contract expiry, betrayal
//! cooldowns, offer deadlines) compares against unix seconds obtained
//! through a [`TimeSource`], never against an ambient clock. This keeps
//! the rules pure and lets tests drive time by hand.

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current wall-clock time in unix seconds.
pub trait TimeSource: Send + Sync + core::fmt::Debug {
    /// The current unix timestamp, in whole seconds.
    fn now_unix(&self) -> i64;
}

/// The real wall clock, backed by [`chrono::Utc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A hand-driven clock for tests and deterministic runs.
///
/// Time only moves when [`ManualTime::advance`] or [`ManualTime::set`]
/// is called.
#[derive(Debug, Default)]
pub struct ManualTime {
    now: AtomicI64,
}

impl ManualTime {
    /// Create a manual clock starting at the given unix timestamp.
    pub fn new(start_unix: i64) -> Self {
        Self {
            now: AtomicI64::new(start_unix),
        }
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Set the clock to an absolute unix timestamp.
    pub fn set(&self, now_unix: i64) {
        self.now.store(now_unix, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
