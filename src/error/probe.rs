// Probe error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Probe error code constants
///
/// Error code range: 4001-4004
pub struct ProbeErrorCodes {}

impl ProbeErrorCodes {
    /// Probe plan violates an invariant
    pub const PLAN_INVALID: i32 = 4001;

    /// Subject refused a write
    pub const VALUE_REJECTED: i32 = 4002;

    /// Generic export projection did not yield a mapping
    pub const PROJECTION_FAILED: i32 = 4003;

    /// Structured-data attribute could not be coerced to a mapping
    pub const READ_COERCION: i32 = 4004;
}

/// Log a probe error with structured context
pub fn log_probe_error(err: &ProbeError, context: &str) {
    error!(
        "Probe error in {}: code={}, component=ProbeEngine, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors observed while probing a subject.
///
/// Apart from `PlanInvalid`, none of these abort a run: the engine records
/// them as anomalies in the report.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// Probe plan is inconsistent
    PlanInvalid { reason: String },

    /// A write was refused by the subject
    ValueRejected { name: String, reason: String },

    /// Generic projection did not produce a key-value structure
    ProjectionFailed { reason: String },

    /// Attribute value is not coercible to a mapping
    ReadCoercion { name: String, found: String },
}

impl ErrorCode for ProbeError {
    fn code(&self) -> i32 {
        match self {
            ProbeError::PlanInvalid { .. } => ProbeErrorCodes::PLAN_INVALID,
            ProbeError::ValueRejected { .. } => ProbeErrorCodes::VALUE_REJECTED,
            ProbeError::ProjectionFailed { .. } => ProbeErrorCodes::PROJECTION_FAILED,
            ProbeError::ReadCoercion { .. } => ProbeErrorCodes::READ_COERCION,
        }
    }

    fn message(&self) -> String {
        match self {
            ProbeError::PlanInvalid { reason } => format!("Invalid probe plan: {}", reason),
            ProbeError::ValueRejected { name, reason } => {
                format!("Write to '{}' rejected: {}", name, reason)
            }
            ProbeError::ProjectionFailed { reason } => {
                format!("Generic projection failed: {}", reason)
            }
            ProbeError::ReadCoercion { name, found } => {
                format!("Cannot read '{}' as a mapping (found {})", name, found)
            }
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProbeError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ProbeError {}

/// Convert serde_json failures raised while projecting a subject
impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::ProjectionFailed {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_error_codes() {
        let cases = [
            (
                ProbeError::PlanInvalid {
                    reason: "empty".into(),
                },
                4001,
            ),
            (
                ProbeError::ValueRejected {
                    name: "count".into(),
                    reason: "expected integer".into(),
                },
                4002,
            ),
            (
                ProbeError::ProjectionFailed {
                    reason: "not a map".into(),
                },
                4003,
            ),
            (
                ProbeError::ReadCoercion {
                    name: "data".into(),
                    found: "string".into(),
                },
                4004,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code, "unexpected code for {err:?}");
        }
    }

    #[test]
    fn test_read_coercion_message() {
        let err = ProbeError::ReadCoercion {
            name: "data".into(),
            found: "null".into(),
        };
        assert_eq!(err.message(), "Cannot read 'data' as a mapping (found null)");
    }
}
