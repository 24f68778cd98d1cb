//! Scheduled refresh coordinator
//!
//! The DrawCoordinator is responsible for:
//! - Running one pipeline cycle immediately, then once per update interval
//! - Publishing each successful record to the shared state
//! - Flagging the data unavailable when a cycle fails
//! - Emitting events for monitoring/logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Timer     │─── tick ───┐
//! └─────────────┘            │
//!                            ▼
//!                   ┌─────────────────┐
//!                   │ DrawCoordinator │
//!                   └─────────────────┘
//!                            │
//!         ┌──────────────────┼──────────────────┐
//!         │                  │                  │
//!         ▼                  ▼                  ▼
//! ┌─────────────┐    ┌──────────────┐    ┌─────────────┐
//! │  Pipeline   │    │ SharedState  │    │   Events    │
//! │ (refresh)   │    │ (publish)    │    │  (notify)   │
//! └─────────────┘    └──────────────┘    └─────────────┘
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Tick
//! 2. `Pipeline::refresh()`
//! 3. On success, replace the published record
//! 4. On failure, keep the previous record and mark it unavailable
//! 5. Emit event
//!
//! Cycles run inline in the loop, so a new one never starts while the
//! previous one is outstanding.

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error, info, warn};

use crate::config::LotoConfig;
use crate::draw::DrawResult;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::state::{SharedState, Snapshot};

/// Events emitted by the DrawCoordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// Coordinator started
    Started {
        interval_secs: u64,
    },

    /// Cycle started
    CycleStarted {
        cycle: u64,
    },

    /// A record was published
    Published {
        cycle: u64,
        summary: String,
        fallback: bool,
    },

    /// Cycle failed; the previous record is kept
    CycleFailed {
        cycle: u64,
        error: String,
    },

    /// Coordinator stopped
    Stopped {
        reason: String,
    },
}

/// Timer-driven owner of the published draw
///
/// ## Lifecycle
///
/// 1. Create with [`DrawCoordinator::new()`]
/// 2. Start with [`DrawCoordinator::run()`]
/// 3. Runs until a shutdown signal is received
/// 4. Drop to discard the published state
pub struct DrawCoordinator {
    pipeline: Pipeline,
    state: SharedState,
    interval: std::time::Duration,
    event_tx: mpsc::Sender<CoordinatorEvent>,
}

impl DrawCoordinator {
    /// Create a new coordinator
    ///
    /// # Returns
    ///
    /// A tuple of (coordinator, event_receiver)
    pub fn new(
        pipeline: Pipeline,
        config: &LotoConfig,
    ) -> Result<(Self, mpsc::Receiver<CoordinatorEvent>)> {
        config.validate()?;
        Ok(Self::with_interval(
            pipeline,
            config.update_interval(),
            config.event_channel_capacity,
            config.source_label.as_str(),
        ))
    }

    /// Create a coordinator with an explicit interval, skipping config validation
    ///
    /// Used by tests that need sub-second intervals.
    pub fn with_interval(
        pipeline: Pipeline,
        interval: std::time::Duration,
        event_channel_capacity: usize,
        source: &str,
    ) -> (Self, mpsc::Receiver<CoordinatorEvent>) {
        let (tx, rx) = mpsc::channel(event_channel_capacity.max(1));
        let coordinator = Self {
            pipeline,
            state: SharedState::new(source),
            // tokio intervals panic on a zero period
            interval: interval.max(std::time::Duration::from_millis(1)),
            event_tx: tx,
        };
        (coordinator, rx)
    }

    /// Handle to the published state
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Stream of snapshots, starting with the current one
    pub fn subscribe(&self) -> WatchStream<Snapshot> {
        self.state.subscribe()
    }

    /// Run the coordinator until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the coordinator until `shutdown_rx` fires
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.emit_event(CoordinatorEvent::Started {
            interval_secs: self.interval.as_secs(),
        });
        info!(
            "Refreshing {} every {:?}",
            self.pipeline.endpoint(),
            self.interval
        );

        // First tick fires immediately
        let mut ticker = tokio::time::interval_at(Instant::now(), self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;

        let reason = if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cycle += 1;
                        self.run_cycle(cycle).await;
                    }

                    _ = &mut rx => {
                        break "Shutdown signal";
                    }
                }
            }
        } else {
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cycle += 1;
                        self.run_cycle(cycle).await;
                    }

                    _ = tokio::signal::ctrl_c() => {
                        break "Shutdown signal";
                    }
                }
            }
        };

        info!("{} received, coordinator stopped after {} cycle(s)", reason, cycle);
        self.emit_event(CoordinatorEvent::Stopped {
            reason: reason.to_string(),
        });
        Ok(())
    }

    /// Run one cycle outside the timer
    ///
    /// Publishes or flags failure exactly like a scheduled cycle and also
    /// returns the pipeline outcome. Events report it as cycle 0.
    pub async fn refresh_now(&self) -> Result<DrawResult> {
        self.emit_event(CoordinatorEvent::CycleStarted { cycle: 0 });
        let result = self.pipeline.refresh().await;
        self.apply(0, &result);
        result
    }

    async fn run_cycle(&self, cycle: u64) {
        debug!("Starting cycle {}", cycle);
        self.emit_event(CoordinatorEvent::CycleStarted { cycle });
        let result = self.pipeline.refresh().await;
        self.apply(cycle, &result);
    }

    fn apply(&self, cycle: u64, result: &Result<DrawResult>) {
        match result {
            Ok(draw) => {
                if draw.is_fallback() {
                    warn!("Cycle {} published the fallback record", cycle);
                }
                self.state.publish(draw.clone());
                self.emit_event(CoordinatorEvent::Published {
                    cycle,
                    summary: draw.summary().to_string(),
                    fallback: draw.is_fallback(),
                });
            }
            Err(e) => {
                error!("Cycle {} failed: {}", cycle, e);
                self.state.mark_failed(e.to_string());
                self.emit_event(CoordinatorEvent::CycleFailed {
                    cycle,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Emit a coordinator event, dropping it if the channel is full
    fn emit_event(&self, event: CoordinatorEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full or closed, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_compare_by_value() {
        let event = CoordinatorEvent::Published {
            cycle: 1,
            summary: "1 - 2 - 3 - 4 - 5 * 6".to_string(),
            fallback: false,
        };
        assert_eq!(event.clone(), event);
    }
}
