//! portward-supervisor — keep exactly one instance of a service on its port.
//!
//! ```text
//! Supervisor::run()
//!   ├── decide()           probe_port → (probe_health) → Start | Adopt | Conflict
//!   ├── Start    → Launcher::launch()   binds and serves; returning is fatal
//!   ├── Adopt    → monitor()            sleep, probe_health, repeat until miss
//!   └── Conflict → ForeignConflict      fatal, with remediation hint
//! ```
//!
//! The decision is taken once. Afterwards exactly one of the launcher or
//! the monitor loop owns the task, so a port that is being monitored is
//! never bound a second time. Every exit path is a [`SupervisorError`];
//! retry policy belongs to whatever scheduled the task.

pub mod decision;
pub mod error;
pub mod launcher;
pub mod monitor;
pub mod state;
pub mod supervisor;

#[cfg(test)]
mod testing;

pub use decision::{Decision, decide};
pub use error::SupervisorError;
pub use launcher::{LaunchFuture, Launcher};
pub use monitor::monitor;
pub use state::SupervisionState;
pub use supervisor::Supervisor;
