//! Scripted probes and launchers for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use portward_core::Endpoint;
use portward_probe::{HealthProbe, PortProbe, ProbeFuture, Prober};

use crate::error::SupervisorError;
use crate::launcher::{LaunchFuture, Launcher};

/// Returns a fixed port result and replays health results in order.
/// Once the script runs out every health probe is `Unreachable`.
pub struct ScriptedProber {
    port: PortProbe,
    health: Mutex<VecDeque<HealthProbe>>,
    pub port_calls: Arc<AtomicUsize>,
    pub health_calls: Arc<AtomicUsize>,
}

impl ScriptedProber {
    pub fn new(port: PortProbe, health: impl IntoIterator<Item = HealthProbe>) -> Self {
        Self {
            port,
            health: Mutex::new(health.into_iter().collect()),
            port_calls: Arc::new(AtomicUsize::new(0)),
            health_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Prober for ScriptedProber {
    fn probe_port<'a>(&'a self, _endpoint: &'a Endpoint) -> ProbeFuture<'a, PortProbe> {
        self.port_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.port.clone();
        Box::pin(async move { result })
    }

    fn probe_health<'a>(&'a self, _endpoint: &'a Endpoint) -> ProbeFuture<'a, HealthProbe> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .health
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| HealthProbe::Unreachable("script exhausted".into()));
        Box::pin(async move { next })
    }
}

type Outcome = Box<dyn Fn() -> SupervisorError + Send + Sync>;

/// Counts invocations and resolves immediately with the given error.
pub struct FakeLauncher {
    outcome: Outcome,
    pub calls: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn returning(outcome: impl Fn() -> SupervisorError + Send + Sync + 'static) -> Self {
        Self {
            outcome: Box::new(outcome),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Launcher for FakeLauncher {
    fn launch<'a>(&'a self, _endpoint: &'a Endpoint) -> LaunchFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = (self.outcome)();
        Box::pin(async move { result })
    }
}
