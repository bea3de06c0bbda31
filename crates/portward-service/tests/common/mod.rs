//! Helpers shared by the service integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use portward_core::Endpoint;
use portward_service::{RunFuture, RunInfo, RunReport, RunSource, ServiceState};
use portward_supervisor::{LaunchFuture, Launcher, SupervisorError};

/// Always returns the same report.
pub struct FixedRuns(pub RunReport);

impl RunSource for FixedRuns {
    fn latest_run(&self) -> RunFuture<'_> {
        let report = self.0.clone();
        Box::pin(async move { report })
    }
}

pub fn succeeded_run() -> RunReport {
    RunReport {
        succeeded: true,
        info: RunInfo {
            state: "success".into(),
            run_id: "manual__2024-01-01".into(),
            logical_date: "2024-01-01T00:00:00Z".into(),
            start_date: "2024-01-01T00:00:01Z".into(),
            end_date: "2024-01-01T00:05:00Z".into(),
            note: String::new(),
        },
    }
}

pub fn service_state(report: RunReport) -> ServiceState {
    ServiceState::new(FixedRuns(report))
}

/// A launcher that must never run; counts attempts and returns at once.
#[derive(Default)]
pub struct CountingLauncher {
    pub calls: Arc<AtomicUsize>,
}

impl Launcher for CountingLauncher {
    fn launch<'a>(&'a self, endpoint: &'a Endpoint) -> LaunchFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let addr = endpoint.to_string();
        Box::pin(async move { SupervisorError::ListenerExited { addr } })
    }
}

/// Reserve an ephemeral port on loopback and release it.
pub async fn free_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
