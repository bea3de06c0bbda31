//! Start / adopt / conflict decision.

use tracing::{info, warn};

use portward_core::Endpoint;
use portward_probe::{HealthProbe, PortProbe, Prober};

/// What to do with the endpoint, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The port is free: launch the service.
    Start,
    /// A healthy instance already holds the port: watch it, bind nothing.
    Adopt,
    /// Something else holds the port. Carries what the health probe saw.
    Conflict(HealthProbe),
}

/// Probe the endpoint and decide.
///
/// A port probe error counts as free. An open port must pass the health
/// contract to be adopted; `Unhealthy` and `Unreachable` are both conflicts.
pub async fn decide<P: Prober + ?Sized>(prober: &P, endpoint: &Endpoint) -> Decision {
    match prober.probe_port(endpoint).await {
        PortProbe::Closed => {
            info!(%endpoint, "port is free");
            Decision::Start
        }
        PortProbe::Error(reason) => {
            warn!(%endpoint, %reason, "port probe inconclusive, treating port as free");
            Decision::Start
        }
        PortProbe::Open => {
            info!(%endpoint, "port is occupied, checking whether it is ours");
            match prober.probe_health(endpoint).await {
                HealthProbe::Healthy => {
                    info!(%endpoint, "existing instance is healthy");
                    Decision::Adopt
                }
                observed => {
                    warn!(%endpoint, %observed, "port occupant failed the health contract");
                    Decision::Conflict(observed)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing::ScriptedProber;

    fn endpoint() -> Endpoint {
        Endpoint::new("localhost", 5555)
    }

    #[tokio::test]
    async fn closed_port_starts_without_health_probe() {
        let prober = ScriptedProber::new(PortProbe::Closed, [HealthProbe::Healthy]);
        assert_eq!(decide(&prober, &endpoint()).await, Decision::Start);
        assert_eq!(prober.port_calls.load(Ordering::SeqCst), 1);
        assert_eq!(prober.health_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn port_error_starts() {
        let prober = ScriptedProber::new(PortProbe::Error("network unreachable".into()), []);
        assert_eq!(decide(&prober, &endpoint()).await, Decision::Start);
    }

    #[tokio::test]
    async fn open_and_healthy_adopts() {
        let prober = ScriptedProber::new(PortProbe::Open, [HealthProbe::Healthy]);
        assert_eq!(decide(&prober, &endpoint()).await, Decision::Adopt);
        assert_eq!(prober.health_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_and_unhealthy_conflicts() {
        let observed = HealthProbe::Unhealthy {
            status: 200,
            body: "ok ".into(),
        };
        let prober = ScriptedProber::new(PortProbe::Open, [observed.clone()]);
        assert_eq!(decide(&prober, &endpoint()).await, Decision::Conflict(observed));
    }

    #[tokio::test]
    async fn open_and_unreachable_conflicts() {
        let observed = HealthProbe::Unreachable("timed out after 2s".into());
        let prober = ScriptedProber::new(PortProbe::Open, [observed.clone()]);
        assert_eq!(decide(&prober, &endpoint()).await, Decision::Conflict(observed));
    }
}
