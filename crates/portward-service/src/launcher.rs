//! Binds and serves the router when the supervisor decides to start.

use std::io::ErrorKind;

use tokio::net::TcpListener;
use tracing::{info, warn};

use portward_core::Endpoint;
use portward_supervisor::{LaunchFuture, Launcher, SupervisorError};

use crate::{ServiceState, build_router};

/// Owns the service listener for as long as the launch future runs.
pub struct ServeLauncher {
    bind_host: String,
    state: ServiceState,
}

impl ServeLauncher {
    /// `bind_host` is the interface to listen on; the port comes from the
    /// supervised endpoint.
    pub fn new(bind_host: impl Into<String>, state: ServiceState) -> Self {
        Self {
            bind_host: bind_host.into(),
            state,
        }
    }
}

impl Launcher for ServeLauncher {
    fn launch<'a>(&'a self, endpoint: &'a Endpoint) -> LaunchFuture<'a> {
        Box::pin(async move {
            let requested = format!("{}:{}", self.bind_host, endpoint.port);

            let listener = match TcpListener::bind(&requested).await {
                Ok(listener) => listener,
                // Only a taken port is a race; anything else is a bad address.
                Err(e) if e.kind() == ErrorKind::AddrInUse => {
                    return SupervisorError::BindRace {
                        addr: requested,
                        reason: e.to_string(),
                    };
                }
                Err(e) => {
                    return SupervisorError::ListenerFailed {
                        addr: requested,
                        reason: format!("could not bind: {e}"),
                    };
                }
            };

            let addr = listener
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or(requested);
            info!(%addr, "service listening");

            match axum::serve(listener, build_router(self.state.clone())).await {
                Ok(()) => {
                    warn!(%addr, "service listener returned");
                    SupervisorError::ListenerExited { addr }
                }
                Err(e) => SupervisorError::ListenerFailed {
                    addr,
                    reason: e.to_string(),
                },
            }
        })
    }
}
