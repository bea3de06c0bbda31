//! Route handlers.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, Redirect};

use crate::ServiceState;
use crate::runs::RunInfo;

fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(
        tmpl.render()
            .unwrap_or_else(|e| format!("<pre>Template error: {e}</pre>")),
    )
}

#[derive(Template)]
#[template(path = "success.html")]
struct SuccessTemplate {
    info: RunInfo,
}

#[derive(Template)]
#[template(path = "failure.html")]
struct FailureTemplate {
    info: RunInfo,
}

/// GET /health
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// GET /
pub async fn index(State(state): State<ServiceState>) -> Redirect {
    let report = state.runs.latest_run().await;
    if report.succeeded {
        Redirect::to("/success")
    } else {
        Redirect::to("/failure")
    }
}

/// GET /success
pub async fn success(State(state): State<ServiceState>) -> Html<String> {
    let report = state.runs.latest_run().await;
    render(SuccessTemplate { info: report.info })
}

/// GET /failure
pub async fn failure(State(state): State<ServiceState>) -> Html<String> {
    let report = state.runs.latest_run().await;
    render(FailureTemplate { info: report.info })
}
