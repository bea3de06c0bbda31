//! portward-service — the HTTP service portward keeps alive.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/health` | Liveness contract: `200`, body `ok` |
//! | GET | `/` | Redirect to `/success` or `/failure` by latest run state |
//! | GET | `/success` | Rendered report of the latest run |
//! | GET | `/failure` | Rendered report of the latest run |
//!
//! Run information comes from a [`RunSource`]; [`AirflowRuns`] reads it
//! from the orchestrator's REST API. [`ServeLauncher`] binds the router
//! when the supervisor decides to start the service.

pub mod handlers;
pub mod launcher;
pub mod runs;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

pub use launcher::ServeLauncher;
pub use runs::{AirflowRuns, RunFuture, RunInfo, RunReport, RunSource};

/// Shared state for route handlers.
#[derive(Clone)]
pub struct ServiceState {
    pub runs: Arc<dyn RunSource>,
}

impl ServiceState {
    pub fn new(runs: impl RunSource + 'static) -> Self {
        Self {
            runs: Arc::new(runs),
        }
    }
}

/// Build the service router.
pub fn build_router(state: ServiceState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index))
        .route("/success", get(handlers::success))
        .route("/failure", get(handlers::failure))
        .with_state(state)
}
