//! Fatal supervisor outcomes.
//!
//! Each variant needs a different remediation, so the messages are written
//! for the operator reading the failed task's log.

use thiserror::Error;

use portward_core::Endpoint;
use portward_probe::HealthProbe;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(
        "port conflict: {endpoint} is occupied by another process (health probe: {observed}). \
         Identify it with `lsof -i :{port}` and stop it with `kill <PID>`",
        port = .endpoint.port
    )]
    ForeignConflict {
        endpoint: Endpoint,
        observed: HealthProbe,
    },

    #[error("bind failed: could not bind {addr} ({reason}); the port was taken after it probed free")]
    BindRace { addr: String, reason: String },

    #[error("listener failed on {addr}: {reason}")]
    ListenerFailed { addr: String, reason: String },

    #[error("listener exited: the service on {addr} stopped serving without being asked to")]
    ListenerExited { addr: String },

    #[error(
        "liveness lost: the adopted service on {endpoint} stopped responding \
         after {healthy_cycles} healthy checks (health probe: {observed})"
    )]
    LivenessLost {
        endpoint: Endpoint,
        observed: HealthProbe,
        healthy_cycles: u64,
    },
}

impl SupervisorError {
    /// Short, stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SupervisorError::ForeignConflict { .. } => "foreign_conflict",
            SupervisorError::BindRace { .. } => "bind_race",
            SupervisorError::ListenerFailed { .. } => "listener_failed",
            SupervisorError::ListenerExited { .. } => "listener_exited",
            SupervisorError::LivenessLost { .. } => "liveness_lost",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_port_and_remediation() {
        let err = SupervisorError::ForeignConflict {
            endpoint: Endpoint::new("localhost", 5555),
            observed: HealthProbe::Unhealthy {
                status: 404,
                body: "nope".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("localhost:5555"), "{msg}");
        assert!(msg.contains("lsof -i :5555"), "{msg}");
        assert!(msg.contains("kill <PID>"), "{msg}");
        assert_eq!(err.kind(), "foreign_conflict");
    }

    #[test]
    fn messages_distinguish_kinds() {
        let endpoint = Endpoint::new("localhost", 5555);
        let errors = [
            SupervisorError::ForeignConflict {
                endpoint: endpoint.clone(),
                observed: HealthProbe::Unreachable("timed out".into()),
            },
            SupervisorError::BindRace {
                addr: "0.0.0.0:5555".into(),
                reason: "address in use".into(),
            },
            SupervisorError::ListenerFailed {
                addr: "0.0.0.0:5555".into(),
                reason: "accept failed".into(),
            },
            SupervisorError::ListenerExited {
                addr: "0.0.0.0:5555".into(),
            },
            SupervisorError::LivenessLost {
                endpoint,
                observed: HealthProbe::Unreachable("refused".into()),
                healthy_cycles: 3,
            },
        ];

        let prefixes: Vec<String> = errors
            .iter()
            .map(|e| e.to_string().split(':').next().unwrap_or_default().to_string())
            .collect();
        for (i, a) in prefixes.iter().enumerate() {
            for b in &prefixes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
