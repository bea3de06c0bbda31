//! portward-core — shared types for the portward supervisor.
//!
//! Holds the supervised [`Endpoint`] and the [`SupervisorConfig`] that is
//! resolved once at process start (defaults, then an optional TOML file,
//! then environment variables).

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    OrchestratorConfig, ProbeConfig, ServiceConfig, SupervisorConfig, parse_duration,
};
pub use error::{ConfigError, ConfigResult};
pub use types::Endpoint;
