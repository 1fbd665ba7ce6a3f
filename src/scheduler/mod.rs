//! Check scheduling and change detection
//!
//! # Overview
//!
//! [`Monitor`] owns the only mutable state in the service: the last
//! successful [`Snapshot`] and the "check in progress" flag. Periodic
//! triggers call [`Monitor::run_check`]; operator commands call
//! [`Monitor::manual_status`], which never touches that state.
//!
//! ```text
//!            ┌──────── trigger fires while Checking: dropped ───────┐
//!            ▼                                                      │
//!   ┌──────────────┐  run_check()   ┌──────────────┐                │
//!   │     Idle     │ ─────────────▶ │   Checking   │ ───────────────┘
//!   └──────────────┘                └──────┬───────┘
//!            ▲      guard dropped          │ fetch (+1 retry), diff,
//!            └─────────────────────────────┘ notify, store snapshot
//! ```
//!
//! Notifications are edge-triggered: only an unavailable → available
//! transition between two consecutive successful checks produces a
//! message. The first successful check just records a baseline.
//!
//! # Modules
//!
//! - [`trigger`] - Interval-driven triggers with graceful shutdown

pub mod trigger;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::crawler::{fetch_with_retry, SnapshotSource};
use crate::error::TicketwatchErrorTrait;
use crate::models::{EventKey, Snapshot};
use crate::notifications::{DeliveryResult, Notifier};
use crate::utils::retry::RetryConfig;

pub use trigger::PeriodicTrigger;

/// Process-lifetime state of the change detector
#[derive(Debug, Default)]
pub struct RunState {
    /// Last successfully fetched snapshot, `None` until the first check succeeds
    pub previous: Option<Snapshot>,
    /// Set while a check cycle is running
    pub checking: bool,
}

/// Result of one [`Monitor::run_check`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was in progress; nothing was fetched
    Skipped,
    /// First successful check, stored without notifying
    Baseline,
    /// Compared against the previous snapshot
    Checked {
        /// Events that went on sale in this cycle
        went_on_sale: Vec<EventKey>,
    },
    /// Fetch failed after its retry; an error message was sent
    Failed,
}

/// Clears the checking flag when dropped, whatever way the cycle ends
struct CheckingGuard<'a> {
    state: &'a Mutex<RunState>,
}

impl Drop for CheckingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .checking = false;
    }
}

/// Drives check cycles and on-demand status requests
pub struct Monitor {
    source: Arc<dyn SnapshotSource>,
    notifier: Notifier,
    retry: RetryConfig,
    state: Mutex<RunState>,
}

impl Monitor {
    pub fn new(source: Arc<dyn SnapshotSource>, notifier: Notifier, retry: RetryConfig) -> Self {
        Self {
            source,
            notifier,
            retry,
            state: Mutex::new(RunState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter `Checking`, or `None` if a cycle is already running
    fn try_begin(&self) -> Option<CheckingGuard<'_>> {
        let mut state = self.lock_state();
        if state.checking {
            return None;
        }
        state.checking = true;
        Some(CheckingGuard { state: &self.state })
    }

    /// Last stored snapshot
    pub fn previous_snapshot(&self) -> Option<Snapshot> {
        self.lock_state().previous.clone()
    }

    /// Whether a check cycle is currently running
    pub fn is_checking(&self) -> bool {
        self.lock_state().checking
    }

    /// Run one check cycle
    ///
    /// Never returns an error: failures are reported to the operator and
    /// the previous snapshot is left untouched.
    pub async fn run_check(&self) -> CycleOutcome {
        let Some(_guard) = self.try_begin() else {
            tracing::info!("Check already in progress, dropping trigger");
            return CycleOutcome::Skipped;
        };

        match fetch_with_retry(self.source.as_ref(), &self.retry).await {
            Ok(snapshot) => self.apply_snapshot(snapshot).await,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    category = %e.category(),
                    recoverable = e.is_recoverable(),
                    "Ticket check failed"
                );
                if let Err(delivery) = self.notifier.check_error(&e).await {
                    tracing::warn!(
                        error = %delivery,
                        recoverable = delivery.is_recoverable(),
                        "Failed to deliver error notification"
                    );
                }
                CycleOutcome::Failed
            }
        }
    }

    /// Diff `snapshot` against the stored one, notify, then store it
    async fn apply_snapshot(&self, snapshot: Snapshot) -> CycleOutcome {
        let previous = self.lock_state().previous.clone();

        let outcome = match previous {
            None => {
                tracing::info!(
                    aktobe = snapshot.aktobe.is_available,
                    real_madrid = snapshot.real_madrid.is_available,
                    "Recorded baseline snapshot"
                );
                CycleOutcome::Baseline
            }
            Some(previous) => {
                let went_on_sale = snapshot.newly_available(&previous);

                for &key in &went_on_sale {
                    tracing::info!(entity = %key, link = %snapshot.get(key).link, "Tickets went on sale");
                    if let Err(e) = self.notifier.status_change(key, snapshot.get(key)).await {
                        tracing::warn!(entity = %key, error = %e, "Failed to deliver status change");
                    }
                }

                if went_on_sale.is_empty() {
                    tracing::debug!("No availability changes");
                }

                CycleOutcome::Checked { went_on_sale }
            }
        };

        self.lock_state().previous = Some(snapshot);
        outcome
    }

    /// Fetch fresh data and send it to the operator
    ///
    /// Bypasses the checking guard and leaves the stored snapshot alone, so
    /// it can never swallow a transition the next check would report.
    pub async fn manual_status(&self) -> DeliveryResult<()> {
        match fetch_with_retry(self.source.as_ref(), &self.retry).await {
            Ok(snapshot) => {
                self.notifier
                    .manual_status(&snapshot, self.source.source_url())
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, category = %e.category(), "Manual status fetch failed");
                self.notifier.manual_status_failed(&e.to_string()).await
            }
        }
    }

    /// Send the operational heartbeat
    pub async fn heartbeat(&self) {
        match self.notifier.heartbeat().await {
            Ok(()) => tracing::debug!("Heartbeat sent"),
            Err(e) => tracing::warn!(error = %e, "Failed to deliver heartbeat"),
        }
    }
}
