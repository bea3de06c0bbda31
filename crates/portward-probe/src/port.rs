//! TCP port occupancy probe.

use std::fmt;
use std::io::ErrorKind;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use portward_core::Endpoint;

/// Result of a single port probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortProbe {
    /// A connection was accepted, so something is listening.
    Open,
    /// The connection was refused. The port is free to bind.
    Closed,
    /// The probe could not tell (timeout, unreachable host, resolution
    /// failure). Callers treat this as `Closed`.
    Error(String),
}

impl fmt::Display for PortProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortProbe::Open => write!(f, "open"),
            PortProbe::Closed => write!(f, "closed"),
            PortProbe::Error(reason) => write!(f, "error ({reason})"),
        }
    }
}

/// Attempt a TCP connect to `endpoint`, bounded by `timeout`.
///
/// The connection is dropped as soon as it is established.
pub async fn probe_port(endpoint: &Endpoint, timeout: Duration) -> PortProbe {
    let authority = endpoint.authority();

    match tokio::time::timeout(timeout, TcpStream::connect(&authority)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            debug!(%endpoint, "port probe: open");
            PortProbe::Open
        }
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
            debug!(%endpoint, "port probe: refused");
            PortProbe::Closed
        }
        Ok(Err(e)) => {
            debug!(%endpoint, error = %e, "port probe failed");
            PortProbe::Error(e.to_string())
        }
        Err(_) => {
            debug!(%endpoint, ?timeout, "port probe timed out");
            PortProbe::Error(format!("connect timed out after {timeout:?}"))
        }
    }
}
