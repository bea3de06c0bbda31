//! The supervisor: decide once, then hand the task to exactly one of the
//! launcher or the monitor loop.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use portward_core::Endpoint;
use portward_probe::Prober;

use crate::decision::{Decision, decide};
use crate::error::SupervisorError;
use crate::launcher::Launcher;
use crate::monitor::monitor;
use crate::state::SupervisionState;

/// Supervises a single endpoint for the lifetime of the task.
pub struct Supervisor<P, L> {
    endpoint: Endpoint,
    prober: P,
    launcher: L,
    monitor_interval: Duration,
    state_tx: watch::Sender<SupervisionState>,
}

impl<P: Prober, L: Launcher> Supervisor<P, L> {
    pub fn new(endpoint: Endpoint, prober: P, launcher: L, monitor_interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(SupervisionState::Init);
        Self {
            endpoint,
            prober,
            launcher,
            monitor_interval,
            state_tx,
        }
    }

    /// Current state.
    pub fn state(&self) -> SupervisionState {
        *self.state_tx.borrow()
    }

    /// Read-only view of state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SupervisionState> {
        self.state_tx.subscribe()
    }

    /// Run until the supervised service is lost.
    ///
    /// Never returns successfully. The returned error is the reason the task
    /// must fail; the state has moved to `Conflict` or `Failed` by then.
    pub async fn run(self) -> SupervisorError {
        let endpoint = &self.endpoint;
        info!(%endpoint, "supervisor starting");

        let err = match decide(&self.prober, endpoint).await {
            Decision::Start => {
                self.enter(SupervisionState::Starting);
                self.launcher.launch(endpoint).await
            }
            Decision::Adopt => {
                self.enter(SupervisionState::Monitoring);
                info!(%endpoint, interval = ?self.monitor_interval, "adopted running instance");
                monitor(&self.prober, endpoint, self.monitor_interval).await
            }
            Decision::Conflict(observed) => {
                self.enter(SupervisionState::Conflict);
                SupervisorError::ForeignConflict {
                    endpoint: endpoint.clone(),
                    observed,
                }
            }
        };

        if !self.state().is_terminal() {
            self.enter(SupervisionState::Failed);
        }
        error!(%endpoint, kind = err.kind(), error = %err, "supervision ended");
        err
    }

    fn enter(&self, next: SupervisionState) {
        let prev = self.state();
        debug_assert!(prev.can_transition_to(next), "illegal transition {prev} -> {next}");
        info!(endpoint = %self.endpoint, from = %prev, to = %next, "supervision state changed");
        self.state_tx.send_replace(next);
    }
}
