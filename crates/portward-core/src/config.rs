//! Supervisor configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Everything is read once at startup; nothing here
//! is consulted again after the endpoint is resolved.
//!
//! ```toml
//! [service]
//! host = "localhost"
//! port = 5555
//!
//! [probe]
//! port_timeout = "1s"
//! health_timeout = "2s"
//! monitor_interval = "30s"
//!
//! [orchestrator]
//! base_url = "http://localhost:8080"
//! target_dag_id = "Airflow_Lab2"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Endpoint;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub service: ServiceConfig,
    pub probe: ProbeConfig,
    pub orchestrator: OrchestratorConfig,
}

/// Where the supervised service lives and where the launcher binds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Host the probes connect to.
    pub host: String,
    pub port: u16,
    /// Interface the launcher binds when it has to start the service.
    pub bind_host: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5555,
            bind_host: "0.0.0.0".to_string(),
        }
    }
}

/// Probe timeouts and the monitor interval, as duration strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub port_timeout: String,
    pub health_timeout: String,
    pub monitor_interval: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            port_timeout: "1s".to_string(),
            health_timeout: "2s".to_string(),
            monitor_interval: "30s".to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn port_timeout(&self) -> Duration {
        parse_duration(&self.port_timeout).unwrap_or(Duration::from_secs(1))
    }

    pub fn health_timeout(&self) -> Duration {
        parse_duration(&self.health_timeout).unwrap_or(Duration::from_secs(2))
    }

    pub fn monitor_interval(&self) -> Duration {
        parse_duration(&self.monitor_interval).unwrap_or(Duration::from_secs(30))
    }
}

/// Orchestrator REST API used by the service's status pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub target_dag_id: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            username: "airflow".to_string(),
            password: "airflow".to_string(),
            target_dag_id: "Airflow_Lab2".to_string(),
        }
    }
}

impl SupervisorConfig {
    /// Parse a TOML config file. Missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: SupervisorConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, optionally overlaid with a file, then with the process
    /// environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from an environment-style lookup.
    ///
    /// Recognised keys: `SERVICE_HOST`, `SERVICE_PORT`, `SERVICE_BIND_HOST`,
    /// `PORT_PROBE_TIMEOUT`, `HEALTH_PROBE_TIMEOUT`, `MONITOR_INTERVAL`,
    /// `AIRFLOW_WEBSERVER`, `AIRFLOW_USERNAME`, `AIRFLOW_PASSWORD`,
    /// `TARGET_DAG_ID`. The credential keys fall back to the
    /// `_AIRFLOW_WWW_USER_*` variables used by the stock Airflow compose file.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k));

        if let Some(host) = lookup("SERVICE_HOST") {
            self.service.host = host;
        }
        if let Some(raw) = lookup("SERVICE_PORT") {
            self.service.port = raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("SERVICE_PORT", &raw, e.to_string()))?;
        }
        if let Some(bind) = lookup("SERVICE_BIND_HOST") {
            self.service.bind_host = bind;
        }
        if let Some(v) = lookup("PORT_PROBE_TIMEOUT") {
            self.probe.port_timeout = v;
        }
        if let Some(v) = lookup("HEALTH_PROBE_TIMEOUT") {
            self.probe.health_timeout = v;
        }
        if let Some(v) = lookup("MONITOR_INTERVAL") {
            self.probe.monitor_interval = v;
        }
        if let Some(url) = lookup("AIRFLOW_WEBSERVER") {
            self.orchestrator.base_url = url;
        }
        if let Some(user) = first(&["AIRFLOW_USERNAME", "_AIRFLOW_WWW_USER_USERNAME"]) {
            self.orchestrator.username = user;
        }
        if let Some(pass) = first(&["AIRFLOW_PASSWORD", "_AIRFLOW_WWW_USER_PASSWORD"]) {
            self.orchestrator.password = pass;
        }
        if let Some(dag) = lookup("TARGET_DAG_ID") {
            self.orchestrator.target_dag_id = dag;
        }

        self.validate()?;
        debug!(endpoint = %self.endpoint(), "configuration resolved");
        Ok(())
    }

    /// Reject values that would otherwise silently fall back to defaults.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.service.host.trim().is_empty() {
            return Err(ConfigError::invalid("service.host", &self.service.host, "empty host"));
        }
        if self.service.bind_host.trim().is_empty() {
            return Err(ConfigError::invalid(
                "service.bind_host",
                &self.service.bind_host,
                "empty bind host",
            ));
        }
        if self.service.port == 0 {
            return Err(ConfigError::invalid("service.port", "0", "port must be non-zero"));
        }
        for (key, value) in [
            ("probe.port_timeout", &self.probe.port_timeout),
            ("probe.health_timeout", &self.probe.health_timeout),
            ("probe.monitor_interval", &self.probe.monitor_interval),
        ] {
            match parse_duration(value) {
                Some(d) if !d.is_zero() => {}
                Some(_) => return Err(ConfigError::invalid(key, value, "duration must be non-zero")),
                None => return Err(ConfigError::invalid(key, value, "expected e.g. 500ms, 5s, 2m")),
            }
        }
        Ok(())
    }

    /// The endpoint under supervision.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.service.host.clone(), self.service.port)
    }
}

/// Parse a duration string like "5s", "500ms", "1m". A bare number is seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
