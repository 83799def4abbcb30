// Locator error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Locator error code constants
///
/// Error code range: 3001-3004
pub struct LocatorErrorCodes {}

impl LocatorErrorCodes {
    /// Catalog file could not be read
    pub const CATALOG_UNREADABLE: i32 = 3001;

    /// Catalog contents failed to parse or validate
    pub const CATALOG_INVALID: i32 = 3002;

    /// Taxonomy query matched no terms
    pub const NO_TERMS: i32 = 3003;

    /// Single-record fetch found nothing
    pub const TERM_NOT_FOUND: i32 = 3004;
}

/// Log a locator error with structured context
///
/// Locator failures never reach the probe engine; they are normalized into
/// the absent sentinel, so this log line is the only trace they leave.
pub fn log_locator_error(err: &LocatorError, context: &str) {
    error!(
        "Locator error in {}: code={}, component=TermLocator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while resolving the subject to probe.
#[derive(Debug, Clone, PartialEq)]
pub enum LocatorError {
    /// Catalog file could not be read from disk
    CatalogUnreadable { path: String, reason: String },

    /// Catalog JSON was malformed or violated an invariant
    CatalogInvalid { reason: String },

    /// No terms matched the query
    NoTerms { taxonomy: String },

    /// A term id did not resolve within the taxonomy
    TermNotFound { term_id: u64, taxonomy: String },
}

impl ErrorCode for LocatorError {
    fn code(&self) -> i32 {
        match self {
            LocatorError::CatalogUnreadable { .. } => LocatorErrorCodes::CATALOG_UNREADABLE,
            LocatorError::CatalogInvalid { .. } => LocatorErrorCodes::CATALOG_INVALID,
            LocatorError::NoTerms { .. } => LocatorErrorCodes::NO_TERMS,
            LocatorError::TermNotFound { .. } => LocatorErrorCodes::TERM_NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            LocatorError::CatalogUnreadable { path, reason } => {
                format!("Failed to read term catalog {}: {}", path, reason)
            }
            LocatorError::CatalogInvalid { reason } => {
                format!("Invalid term catalog: {}", reason)
            }
            LocatorError::NoTerms { taxonomy } => {
                format!("No terms found in taxonomy '{}'", taxonomy)
            }
            LocatorError::TermNotFound { term_id, taxonomy } => {
                format!("Term {} not found in taxonomy '{}'", term_id, taxonomy)
            }
        }
    }
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LocatorError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for LocatorError {}
