//! Debounce Gate
//!
//! Collapses a burst of upload notifications into a single rebuild request.
//!
//! ```text
//!   Idle  --arrival-->  Armed   (start quiet period D)
//!   Armed --arrival-->  Armed   (restart D from zero)
//!   Armed --D elapsed-> Idle    (set rebuild_ready)
//!   Armed --cap hit---> Idle    (set rebuild_ready, only with `max_delay`)
//!   any   --shutdown--> exit
//! ```
//!
//! The quiet-period wait is a `select!` over the timer, a fresh arrival and the
//! shutdown token, so both of the latter cut it short immediately.
//!
//! Without `max_delay` a steady trickle of uploads spaced closer than D keeps
//! the gate armed indefinitely. With it, a burst fires at most `max_delay`
//! after its first arrival even if uploads are still coming in.

use super::context::Coordinator;
use super::types::GateState;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::time::Instant;

pub struct DebounceGate {
    coordinator: Arc<Coordinator>,
    state: GateState,
    burst_started: Option<Instant>,
}

impl DebounceGate {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self {
            coordinator,
            state: GateState::Idle,
            burst_started: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Debounce gate started");

        while !self.coordinator.shutdown.is_cancelled() {
            self.state = match self.state {
                GateState::Idle => self.wait_for_burst().await,
                GateState::Armed => self.time_quiet_period().await,
            };
        }

        tracing::info!("Debounce gate stopped");
    }

    /// Idle: block until the first arrival of a burst.
    async fn wait_for_burst(&mut self) -> GateState {
        let c = &self.coordinator;

        tokio::select! {
            biased;
            _ = c.shutdown.cancelled() => GateState::Idle,
            _ = c.arrival.wait() => {
                c.arrival.clear();
                self.burst_started = Some(Instant::now());
                tracing::debug!(quiet_period = ?c.settings.quiet_period, "Gate armed");
                GateState::Armed
            }
        }
    }

    /// Armed: one countdown of the quiet period, shortened to the burst's
    /// deadline when `max_delay` is set and that deadline comes first.
    ///
    /// Returns `Armed` when the countdown was interrupted by an arrival, so the
    /// caller starts a fresh one.
    async fn time_quiet_period(&mut self) -> GateState {
        let c = self.coordinator.clone();
        let (deadline, capped) = self.countdown_deadline();

        tokio::select! {
            biased;
            _ = c.shutdown.cancelled() => GateState::Armed,
            _ = c.arrival.wait() => {
                c.arrival.clear();
                tracing::trace!("Arrival during quiet period, timer restarted");
                GateState::Armed
            }
            _ = tokio::time::sleep_until(deadline) => {
                // An arrival that landed together with the timer re-arms instead of firing.
                if !capped && c.arrival.take() {
                    tracing::trace!("Arrival raced timer expiry, timer restarted");
                    return GateState::Armed;
                }

                self.burst_started = None;
                c.rebuild_ready.set();
                c.stats.rebuilds_fired.fetch_add(1, Ordering::Relaxed);
                if capped {
                    tracing::info!(queued = c.queue.len(), "Burst reached max delay, requesting rebuild");
                } else {
                    tracing::info!(queued = c.queue.len(), "Quiet period elapsed, requesting rebuild");
                }
                GateState::Idle
            }
        }
    }

    /// When the current countdown ends, and whether that is the burst cap.
    fn countdown_deadline(&self) -> (Instant, bool) {
        let settings = &self.coordinator.settings;
        let quiet_end = Instant::now() + settings.quiet_period;

        match (settings.max_delay, self.burst_started) {
            (Some(max_delay), Some(started)) if started + max_delay <= quiet_end => {
                (started + max_delay, true)
            }
            _ => (quiet_end, false),
        }
    }
}
