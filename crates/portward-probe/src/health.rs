//! Application-level health probe.
//!
//! The contract is strict: `GET /health` must answer status `200` with a
//! body of exactly `ok`. No trimming, no case folding. A response that
//! arrives but misses the contract is `Unhealthy`; anything that prevents
//! a response from arriving is `Unreachable`.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper_util::rt::TokioIo;
use tracing::debug;

use portward_core::Endpoint;

/// Fixed path of the health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Exact body a healthy instance must return.
const HEALTHY_BODY: &[u8] = b"ok";

/// Longest body excerpt kept in an `Unhealthy` result.
const BODY_EXCERPT: usize = 200;

/// Largest body read from the occupant. Anything bigger is not `ok`.
pub const MAX_BODY: usize = 64 * 1024;

/// Result of a single health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthProbe {
    /// Status 200 and body exactly `ok`.
    Healthy,
    /// A response arrived but did not meet the contract.
    Unhealthy { status: u16, body: String },
    /// No response could be obtained (connect, handshake, request or
    /// timeout failure).
    Unreachable(String),
}

impl fmt::Display for HealthProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthProbe::Healthy => write!(f, "healthy"),
            HealthProbe::Unhealthy { status, body } => {
                write!(f, "unhealthy (status {status}, body {body:?})")
            }
            HealthProbe::Unreachable(reason) => write!(f, "unreachable ({reason})"),
        }
    }
}

/// Classify a received response against the health contract.
pub fn classify(status: StatusCode, body: &[u8]) -> HealthProbe {
    if status == StatusCode::OK && body == HEALTHY_BODY {
        return HealthProbe::Healthy;
    }
    let mut excerpt = String::from_utf8_lossy(body).into_owned();
    if excerpt.len() > BODY_EXCERPT {
        let mut cut = BODY_EXCERPT;
        while !excerpt.is_char_boundary(cut) {
            cut -= 1;
        }
        excerpt.truncate(cut);
    }
    HealthProbe::Unhealthy {
        status: status.as_u16(),
        body: excerpt,
    }
}

/// Perform `GET http://{endpoint}/health`, bounded by `timeout`.
///
/// The timeout covers connect, request and body read together.
pub async fn probe_health(endpoint: &Endpoint, timeout: Duration) -> HealthProbe {
    let uri = endpoint.url(HEALTH_PATH);

    let result = tokio::time::timeout(timeout, async {
        let stream = match tokio::net::TcpStream::connect(endpoint.authority()).await {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, %uri, "health probe connection failed");
                return HealthProbe::Unreachable(format!("connect failed: {e}"));
            }
        };

        let io = TokioIo::new(stream);
        let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
            Ok(pair) => pair,
            Err(e) => {
                debug!(error = %e, %uri, "health probe handshake failed");
                return HealthProbe::Unreachable(format!("handshake failed: {e}"));
            }
        };

        // Drive the connection in the background; it ends when `sender` drops.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = match http::Request::builder()
            .method("GET")
            .uri(HEALTH_PATH)
            .header("host", endpoint.authority())
            .header("user-agent", "portward-probe/0.1")
            .body(Empty::<Bytes>::new())
        {
            Ok(req) => req,
            Err(e) => return HealthProbe::Unreachable(format!("invalid request: {e}")),
        };

        let resp = match sender.send_request(req).await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(error = %e, %uri, "health probe request failed");
                return HealthProbe::Unreachable(format!("request failed: {e}"));
            }
        };

        let status = resp.status();
        match Limited::new(resp.into_body(), MAX_BODY).collect().await {
            Ok(collected) => classify(status, &collected.to_bytes()),
            Err(e) if e.is::<LengthLimitError>() => {
                debug!(%uri, %status, "health probe body over limit");
                HealthProbe::Unhealthy {
                    status: status.as_u16(),
                    body: format!("<body larger than {MAX_BODY} bytes>"),
                }
            }
            Err(e) => {
                debug!(error = %e, %uri, "health probe body read failed");
                HealthProbe::Unreachable(format!("body read failed: {e}"))
            }
        }
    })
    .await;

    match result {
        Ok(probe) => {
            debug!(%uri, result = %probe, "health probe finished");
            probe
        }
        Err(_) => {
            debug!(%uri, "health probe timed out");
            HealthProbe::Unreachable(format!("timed out after {timeout:?}"))
        }
    }
}
