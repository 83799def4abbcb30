// Error types for the term probe
//
// This module defines error types for subject lookup and probe operations,
// providing structured error handling with stable numeric codes so that CLI
// consumers can tell failures apart without parsing messages.

mod locator;
mod probe;

pub use locator::{log_locator_error, LocatorError, LocatorErrorCodes};
pub use probe::{log_probe_error, ProbeError, ProbeErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent handling across the
/// library and the `term-probe` binary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
