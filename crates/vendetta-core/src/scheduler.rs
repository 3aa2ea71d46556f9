//! The clock scheduler: background timers bridged onto the host tick.
//!
//! Background timers fire at arbitrary real-world times, but all shared
//! state must be mutated from the host's per-tick update. The scheduler
//! is the bridge: timer tasks never touch state, they only push typed
//! commands onto a thread-safe multi-producer/single-consumer queue.
//! The host tick drains that queue exactly once per tick via
//! [`Scheduler::drain_ready`] and executes the commands on its own
//! thread, so the rest of the engine is written as if single-threaded
//! and no store needs a lock.
//!
//! Two timer shapes exist and are deliberately not collapsed:
//! [`Scheduler::run_once_after`] for self-rescheduling one-shots with a
//! variable next delay (the contract offer cycle), and
//! [`Scheduler::run_every`] for fixed-period sweeps. A periodic timer
//! never suppresses a firing: if the previous command has not been
//! drained yet, the queue simply grows.

use std::sync::mpsc;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Errors that can occur when operating the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The timer runtime could not be built.
    #[error("failed to build timer runtime: {source}")]
    Runtime {
        /// The underlying I/O error from the runtime builder.
        source: std::io::Error,
    },

    /// A periodic timer was requested with a zero interval.
    #[error("periodic timer interval must be greater than zero")]
    InvalidInterval,
}

/// Handle to a live timer, used to cancel it before it fires again.
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    /// Cancel the timer. A one-shot that already fired is unaffected.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the underlying timer task has finished or been aborted.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Owner of all background timers and the command queue they feed.
///
/// `C` is the command type drained on the host tick; it must be `Send`
/// because it crosses from timer threads to the drain thread.
#[derive(Debug)]
pub struct Scheduler<C> {
    runtime: tokio::runtime::Runtime,
    sender: mpsc::Sender<C>,
    receiver: mpsc::Receiver<C>,
    timers: Vec<AbortHandle>,
}

impl<C: Send + 'static> Scheduler<C> {
    /// Build a scheduler with its own single-worker timer runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Runtime`] if the runtime cannot start.
    pub fn new() -> Result<Self, SchedulerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("vendetta-timer")
            .enable_time()
            .build()
            .map_err(|source| SchedulerError::Runtime { source })?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            runtime,
            sender,
            receiver,
            timers: Vec::new(),
        })
    }

    /// Enqueue `command` once, `delay` after now.
    ///
    /// The timer is self-cancelling: after firing, its task ends and
    /// the handle reports finished.
    pub fn run_once_after(&mut self, command: C, delay: Duration) -> TimerHandle {
        let sender = self.sender.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // A send error means the scheduler is shutting down.
            let _ = sender.send(command);
        });
        self.track(handle.abort_handle())
    }

    /// Enqueue a clone of `command` every `interval`, starting
    /// `initial_delay` after now.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidInterval`] when `interval` is
    /// zero.
    pub fn run_every(
        &mut self,
        command: C,
        interval: Duration,
        initial_delay: Duration,
    ) -> Result<TimerHandle, SchedulerError>
    where
        C: Clone,
    {
        if interval.is_zero() {
            return Err(SchedulerError::InvalidInterval);
        }
        let sender = self.sender.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(initial_delay).await;
            let mut ticker = tokio::time::interval(interval);
            loop {
                // The first tick completes immediately, i.e. at
                // initial_delay; subsequent ticks every interval.
                ticker.tick().await;
                if sender.send(command.clone()).is_err() {
                    break;
                }
            }
        });
        Ok(self.track(handle.abort_handle()))
    }

    /// Register a timer for bulk disposal, pruning finished ones.
    fn track(&mut self, abort: AbortHandle) -> TimerHandle {
        self.timers.retain(|t| !t.is_finished());
        self.timers.push(abort.clone());
        TimerHandle { abort }
    }
}

impl<C> Scheduler<C> {
    /// Pop every command currently queued, in FIFO order.
    ///
    /// Called exactly once per host tick. Commands enqueued while the
    /// drain is in progress are picked up by the next tick.
    pub fn drain_ready(&mut self) -> Vec<C> {
        self.receiver.try_iter().collect()
    }

    /// Cancel every live timer.
    ///
    /// Guarantees no further command is enqueued after this returns,
    /// but the queue may still hold commands that fired earlier; the
    /// shutdown path drains once more after disposal.
    pub fn dispose_all(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
    }
}

impl<C> Drop for Scheduler<C> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Generous real-time margin for timer assertions.
    fn settle(ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }

    #[test]
    fn one_shot_fires_once_and_only_once() {
        let mut scheduler: Scheduler<u32> = Scheduler::new().unwrap();
        scheduler.run_once_after(7, Duration::from_millis(10));

        settle(150);
        assert_eq!(scheduler.drain_ready(), vec![7]);

        settle(100);
        assert!(scheduler.drain_ready().is_empty());
    }

    #[test]
    fn drain_preserves_fifo_order() {
        let mut scheduler: Scheduler<u32> = Scheduler::new().unwrap();
        scheduler.run_once_after(1, Duration::from_millis(10));
        scheduler.run_once_after(2, Duration::from_millis(60));

        settle(250);
        assert_eq!(scheduler.drain_ready(), vec![1, 2]);
    }

    #[test]
    fn periodic_timer_keeps_firing_without_suppression() {
        let mut scheduler: Scheduler<u32> = Scheduler::new().unwrap();
        scheduler
            .run_every(9, Duration::from_millis(25), Duration::ZERO)
            .unwrap();

        // Never drained in between: the queue must simply grow.
        settle(300);
        let drained = scheduler.drain_ready();
        assert!(drained.len() >= 3, "expected >= 3 firings, got {}", drained.len());
        assert!(drained.iter().all(|c| *c == 9));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut scheduler: Scheduler<u32> = Scheduler::new().unwrap();
        let result = scheduler.run_every(1, Duration::ZERO, Duration::ZERO);
        assert!(matches!(result, Err(SchedulerError::InvalidInterval)));
    }

    #[test]
    fn cancelled_one_shot_never_fires() {
        let mut scheduler: Scheduler<u32> = Scheduler::new().unwrap();
        let timer = scheduler.run_once_after(5, Duration::from_millis(80));
        timer.cancel();

        settle(250);
        assert!(scheduler.drain_ready().is_empty());
    }

    #[test]
    fn dispose_all_stops_every_timer() {
        let mut scheduler: Scheduler<u32> = Scheduler::new().unwrap();
        scheduler
            .run_every(1, Duration::from_millis(20), Duration::ZERO)
            .unwrap();
        scheduler.run_once_after(2, Duration::from_millis(40));

        settle(100);
        scheduler.dispose_all();
        scheduler.drain_ready();

        settle(150);
        assert!(scheduler.drain_ready().is_empty());
    }

    #[test]
    fn fired_one_shot_reports_finished() {
        let mut scheduler: Scheduler<u32> = Scheduler::new().unwrap();
        let timer = scheduler.run_once_after(1, Duration::from_millis(10));

        settle(200);
        assert!(timer.is_finished());
        assert_eq!(scheduler.drain_ready(), vec![1]);
    }
}
