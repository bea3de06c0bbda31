//! Latest-run lookup against the orchestrator's REST API.
//!
//! Failures never propagate to the pages: every outcome becomes a
//! [`RunReport`] whose `note` explains what went wrong.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION};
use http::{Request, StatusCode};
use http_body_util::{BodyExt, Empty, Limited};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use tracing::{debug, warn};

use portward_core::OrchestratorConfig;

/// Default timeout for a single API call.
const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest API response read. A one-run listing is far smaller.
const MAX_RESPONSE: usize = 1024 * 1024;

/// Longest error-body excerpt kept in a note.
const SNIPPET_CHARS: usize = 200;

/// Fields shown on the report pages. Missing values render as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunInfo {
    pub state: String,
    pub run_id: String,
    pub logical_date: String,
    pub start_date: String,
    pub end_date: String,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// The latest run finished in state `success`.
    pub succeeded: bool,
    pub info: RunInfo,
}

impl RunReport {
    fn failed(note: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            info: RunInfo {
                note: note.into(),
                ..RunInfo::default()
            },
        }
    }
}

/// Boxed future returned by [`RunSource::latest_run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = RunReport> + Send + 'a>>;

/// Where run reports come from — injected for testability.
pub trait RunSource: Send + Sync {
    fn latest_run(&self) -> RunFuture<'_>;
}

#[derive(Debug, Deserialize)]
struct DagRunList {
    #[serde(default)]
    dag_runs: Vec<DagRun>,
}

#[derive(Debug, Deserialize)]
struct DagRun {
    state: Option<String>,
    dag_run_id: Option<String>,
    logical_date: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Turn an API response into a report.
pub fn interpret(status: StatusCode, body: &[u8]) -> RunReport {
    if status != StatusCode::OK {
        let snippet: String = String::from_utf8_lossy(body)
            .chars()
            .take(SNIPPET_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        return RunReport::failed(format!("API status {}: {snippet}", status.as_u16()));
    }

    let list: DagRunList = match serde_json::from_slice(body) {
        Ok(list) => list,
        Err(e) => return RunReport::failed(format!("Invalid API response: {e}")),
    };

    let Some(run) = list.dag_runs.into_iter().next() else {
        return RunReport::failed("No DagRuns found yet.");
    };

    let state = run.state.unwrap_or_default();
    RunReport {
        succeeded: state == "success",
        info: RunInfo {
            state,
            run_id: run.dag_run_id.unwrap_or_default(),
            logical_date: run.logical_date.unwrap_or_default(),
            start_date: run.start_date.unwrap_or_default(),
            end_date: run.end_date.unwrap_or_default(),
            note: String::new(),
        },
    }
}

/// Reads the latest DAG run with HTTP Basic auth.
pub struct AirflowRuns {
    client: Client<HttpConnector, Empty<Bytes>>,
    url: String,
    authorization: String,
    timeout: Duration,
}

impl AirflowRuns {
    pub fn new(config: &OrchestratorConfig) -> Self {
        let url = format!(
            "{}/api/v2/dags/{}/dagRuns?order_by=-logical_date&limit=1",
            config.base_url.trim_end_matches('/'),
            config.target_dag_id
        );
        let credentials = STANDARD.encode(format!("{}:{}", config.username, config.password));
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            url,
            authorization: format!("Basic {credentials}"),
            timeout: API_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<(StatusCode, Bytes), String> {
        let req = Request::get(self.url.as_str())
            .header(AUTHORIZATION, self.authorization.as_str())
            .header(ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| e.to_string())?;

        let resp = self.client.request(req).await.map_err(|e| e.to_string())?;
        let status = resp.status();
        let body = Limited::new(resp.into_body(), MAX_RESPONSE)
            .collect()
            .await
            .map_err(|e| e.to_string())?
            .to_bytes();
        Ok((status, body))
    }
}

impl RunSource for AirflowRuns {
    fn latest_run(&self) -> RunFuture<'_> {
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.fetch()).await {
                Ok(Ok((status, body))) => {
                    debug!(url = %self.url, %status, "orchestrator API answered");
                    interpret(status, &body)
                }
                Ok(Err(e)) => {
                    warn!(url = %self.url, error = %e, "orchestrator API call failed");
                    RunReport::failed(format!("Exception calling Airflow API: {e}"))
                }
                Err(_) => {
                    warn!(url = %self.url, "orchestrator API call timed out");
                    RunReport::failed(format!(
                        "Exception calling Airflow API: timed out after {:?}",
                        self.timeout
                    ))
                }
            }
        })
    }
}
