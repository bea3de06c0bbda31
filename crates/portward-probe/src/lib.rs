//! portward-probe — the two observations the supervisor decides from.
//!
//! ```text
//! Prober (trait, injected for testability)
//!   └── NetProber
//!       ├── probe_port()   → PortProbe   { Open | Closed | Error }
//!       └── probe_health() → HealthProbe { Healthy | Unhealthy | Unreachable }
//! ```
//!
//! Both probes are bounded by a hard timeout and never retry. A timeout is
//! folded into the result (`PortProbe::Error`, `HealthProbe::Unreachable`)
//! rather than surfaced as an error, so callers always get a verdict.

pub mod health;
pub mod port;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use portward_core::{Endpoint, ProbeConfig};

pub use health::{HEALTH_PATH, HealthProbe, MAX_BODY, probe_health};
pub use port::{PortProbe, probe_port};

/// Boxed future returned by [`Prober`] methods.
pub type ProbeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of port and health observations — injected for testability.
pub trait Prober: Send + Sync {
    /// Is anything accepting TCP connections on the endpoint?
    fn probe_port<'a>(&'a self, endpoint: &'a Endpoint) -> ProbeFuture<'a, PortProbe>;

    /// Does the endpoint satisfy the `GET /health` → `200 ok` contract?
    fn probe_health<'a>(&'a self, endpoint: &'a Endpoint) -> ProbeFuture<'a, HealthProbe>;
}

/// Probes real sockets with fixed timeouts.
#[derive(Debug, Clone, Copy)]
pub struct NetProber {
    port_timeout: Duration,
    health_timeout: Duration,
}

impl NetProber {
    pub fn new(port_timeout: Duration, health_timeout: Duration) -> Self {
        Self {
            port_timeout,
            health_timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.port_timeout(), config.health_timeout())
    }
}

impl Default for NetProber {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(2))
    }
}

impl Prober for NetProber {
    fn probe_port<'a>(&'a self, endpoint: &'a Endpoint) -> ProbeFuture<'a, PortProbe> {
        Box::pin(probe_port(endpoint, self.port_timeout))
    }

    fn probe_health<'a>(&'a self, endpoint: &'a Endpoint) -> ProbeFuture<'a, HealthProbe> {
        Box::pin(probe_health(endpoint, self.health_timeout))
    }
}
