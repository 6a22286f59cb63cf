//! Cancellable periodic clock driving the Boxfall round countdown.
//!
//! One [`Clock`] exists per room. It starts idle and is armed by the
//! coordinator when the first player joins; while idle, [`Clock::tick`]
//! pends forever so the clock can sit in a `tokio::select!` loop without
//! a guard:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         _ = clock.tick() => { /* advance the countdown */ }
//!     }
//! }
//! ```
//!
//! The clock is strictly interval-driven: if the host stalls past a
//! deadline there is no catch-up burst of ticks, the next tick is simply
//! rescheduled one full period out ([`MissedTickBehavior::Delay`]).

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

/// A periodic ticker that can be started, stopped, and restarted.
///
/// Not a shared resource — the owning coordinator holds it exclusively
/// and is the only consumer of its ticks.
pub struct Clock {
    interval: Option<Interval>,
    period: Duration,
    ticks: u64,
}

impl Clock {
    /// Creates an idle clock. [`Clock::tick`] pends until [`Clock::start`].
    pub fn idle(period: Duration) -> Self {
        Self {
            interval: None,
            period,
            ticks: 0,
        }
    }

    /// Arms the clock. The first tick fires one full period from now —
    /// never immediately. Restarting a running clock resets its cadence
    /// and tick count.
    pub fn start(&mut self) {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        self.ticks = 0;
        debug!(period_ms = self.period.as_millis() as u64, "clock started");
    }

    /// Disarms the clock, releasing the timer. Idempotent.
    pub fn stop(&mut self) {
        if self.interval.take().is_some() {
            debug!(ticks = self.ticks, "clock stopped");
        }
    }

    /// Whether the clock is currently armed.
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Ticks delivered since the clock was last started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The configured tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Waits for the next tick and returns its number (starting at 1).
    ///
    /// While the clock is idle this future never resolves, which is the
    /// behavior a `select!` loop wants: the other branches keep running.
    pub async fn tick(&mut self) -> u64 {
        match &mut self.interval {
            Some(interval) => {
                interval.tick().await;
                self.ticks += 1;
                trace!(tick = self.ticks, "clock tick");
                self.ticks
            }
            None => {
                // This future never completes — select! handles other branches.
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
