//! Service launcher seam.

use std::future::Future;
use std::pin::Pin;

use portward_core::Endpoint;

use crate::error::SupervisorError;

/// Boxed future returned by [`Launcher::launch`].
pub type LaunchFuture<'a> = Pin<Box<dyn Future<Output = SupervisorError> + Send + 'a>>;

/// Binds and runs the supervised service — injected for testability.
///
/// Implementations own the listener for as long as the future runs. The
/// future only resolves once the service is gone, with the reason:
/// [`SupervisorError::BindRace`] when the port was taken,
/// [`SupervisorError::ListenerFailed`] for any other bind or serve error,
/// and [`SupervisorError::ListenerExited`] when the listener returned on
/// its own. Each carries the address that was actually bound.
pub trait Launcher: Send + Sync {
    fn launch<'a>(&'a self, endpoint: &'a Endpoint) -> LaunchFuture<'a>;
}
