//! Poll scheduler — the recurring refresh trigger.
//!
//! DESIGN
//! ======
//! A background task ticks at a fixed interval and offers each tick through
//! a bounded channel. Ticks are dropped, never backlogged: a full channel
//! (driver busy) or a missed timer slot simply skips that round, so a slow
//! backend never accumulates queued refreshes. The task is an exclusively
//! owned resource: `start` is a no-op while running, `stop` is idempotent,
//! and dropping the scheduler stops it on every teardown path.
//!
//! Whether a delivered tick actually refreshes is the driver's call: it
//! consults the auto-refresh toggle and the session's loading flags.

#[cfg(test)]
#[path = "poll_test.rs"]
mod poll_test;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::trace;

/// Marker delivered on each poll round.
#[derive(Debug, Clone, Copy)]
pub struct PollTick;

/// Owns the recurring timer task for one feed view.
#[derive(Debug)]
pub struct PollScheduler {
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl PollScheduler {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval, handle: None }
    }

    /// Spawn the timer task, delivering ticks into `tx`. No-op if already
    /// running.
    pub fn start(&mut self, tx: mpsc::Sender<PollTick>) {
        if self.handle.is_some() {
            return;
        }
        let period = self.interval;
        self.handle = Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match tx.try_send(PollTick) {
                    Ok(()) => {}
                    // Driver still busy with the previous round: skip.
                    Err(TrySendError::Full(_)) => trace!("poll tick dropped while busy"),
                    // Receiver gone: the view tore down without stop().
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        }));
    }

    /// Abort the timer task. Idempotent; safe to call when never started.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
