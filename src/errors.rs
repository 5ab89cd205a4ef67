//! Error types for component wiring.

use thiserror::Error;

/// A required dependency was absent at build time.
///
/// Raised once during construction, never on a request path. Returned
/// rather than panicking so the caller decides whether startup aborts.
#[derive(Error, Debug)]
pub enum WiringError {
    #[error("missing person store")]
    MissingStore,

    #[error("missing person service")]
    MissingService,
}
