//! Subject lookup.
//!
//! Resolution errors never reach the probe engine: a locator either hands over
//! a subject or an explicit absent marker carrying the reason for display.

pub mod catalog;

pub use catalog::{TermCatalog, TermQuery, DEFAULT_CATALOG_PATH};

use crate::error::{log_locator_error, ErrorCode, LocatorError};
use crate::subject::{Subject, Term};

/// Outcome of a lookup.
#[derive(Debug)]
pub enum Located<S> {
    Found(S),
    Absent { reason: String },
}

impl<S> Located<S> {
    /// Normalize a fallible lookup, logging the failure.
    pub fn from_result(result: Result<S, LocatorError>, context: &str) -> Self {
        match result {
            Ok(subject) => Located::Found(subject),
            Err(err) => {
                log_locator_error(&err, context);
                Located::Absent {
                    reason: err.message(),
                }
            }
        }
    }

    /// The subject as the engine expects it: a borrow or the absent sentinel.
    pub fn subject_mut(&mut self) -> Option<&mut S> {
        match self {
            Located::Found(subject) => Some(subject),
            Located::Absent { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Located::Found(_))
    }
}

/// Resolves the single subject a probe run targets.
pub trait SubjectLocator {
    type Subject: Subject;

    fn locate(&self) -> Located<Self::Subject>;
}

/// Picks a term from a catalog.
///
/// Without an explicit id the first term of the taxonomy is queried and then
/// re-fetched by id, so the probe sees a fresh single-record instance.
pub struct TermLocator<'a> {
    catalog: &'a TermCatalog,
    taxonomy: String,
    term_id: Option<u64>,
}

impl<'a> TermLocator<'a> {
    pub fn new(catalog: &'a TermCatalog, taxonomy: impl Into<String>) -> Self {
        Self {
            catalog,
            taxonomy: taxonomy.into(),
            term_id: None,
        }
    }

    pub fn with_term_id(mut self, term_id: Option<u64>) -> Self {
        self.term_id = term_id;
        self
    }

    fn resolve(&self) -> Result<Term, LocatorError> {
        let term_id = match self.term_id {
            Some(id) => id,
            None => {
                let terms = self.catalog.get_terms(&TermQuery::first_in(&self.taxonomy))?;
                let first = terms.first().ok_or_else(|| LocatorError::NoTerms {
                    taxonomy: self.taxonomy.clone(),
                })?;
                log::info!(
                    "[Locator] Sample term {} ({}) in '{}'",
                    first.term_id,
                    first.name,
                    self.taxonomy
                );
                first.term_id
            }
        };
        self.catalog.get_term(term_id, &self.taxonomy)
    }
}

impl SubjectLocator for TermLocator<'_> {
    type Subject = Term;

    fn locate(&self) -> Located<Term> {
        Located::from_result(self.resolve(), "TermLocator::locate")
    }
}
