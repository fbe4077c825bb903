//! Harness error types

use thiserror::Error;

/// Errors raised by the registry and the scheduler.
///
/// Everything here is scoped to a single workload except `DuplicateName`,
/// which is a startup error.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A workload with the same name is already registered
    #[error("workload `{name}` is already registered")]
    DuplicateName {
        /// The conflicting name
        name: String,
    },

    /// The workload's `setup()` returned an error or panicked
    #[error("setup of workload `{workload}` failed: {message}")]
    SetupFailed {
        /// Workload name
        workload: String,
        /// Error or panic message
        message: String,
    },
}
