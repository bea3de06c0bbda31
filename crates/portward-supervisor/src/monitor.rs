//! Liveness loop for an adopted instance.

use std::time::Duration;

use tracing::{debug, error};

use portward_core::Endpoint;
use portward_probe::{HealthProbe, Prober};

use crate::error::SupervisorError;

/// Sleep `interval` and probe health, until the first non-healthy probe.
///
/// There is no retry or grace period. The first miss ends the loop and is
/// returned as [`SupervisorError::LivenessLost`].
pub async fn monitor<P: Prober + ?Sized>(
    prober: &P,
    endpoint: &Endpoint,
    interval: Duration,
) -> SupervisorError {
    let mut healthy_cycles: u64 = 0;

    loop {
        tokio::time::sleep(interval).await;

        match prober.probe_health(endpoint).await {
            HealthProbe::Healthy => {
                healthy_cycles += 1;
                debug!(%endpoint, healthy_cycles, "adopted instance still healthy");
            }
            observed => {
                error!(%endpoint, %observed, healthy_cycles, "adopted instance stopped responding");
                return SupervisorError::LivenessLost {
                    endpoint: endpoint.clone(),
                    observed,
                    healthy_cycles,
                };
            }
        }
    }
}
