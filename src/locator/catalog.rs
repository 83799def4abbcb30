//! Term catalog backing the default locator.
//!
//! The catalog plays the role of the host's term store: a versioned JSON list
//! of term records that can be queried per taxonomy or fetched by id.

use crate::error::LocatorError;
use crate::subject::{Term, TermRecord};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default catalog path bundled with the crate sources.
pub const DEFAULT_CATALOG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/terms.json");

static EMBEDDED: Lazy<Result<TermCatalog, LocatorError>> =
    Lazy::new(|| TermCatalog::from_json(include_str!("../../fixtures/terms.json")));

/// Selection criteria for a multi-term query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQuery {
    pub taxonomy: String,
    /// Maximum number of terms returned; 0 means unbounded.
    pub number: usize,
    /// Skip terms with no attached objects.
    pub hide_empty: bool,
}

impl TermQuery {
    /// The single-term query used to pick a sample subject.
    pub fn first_in(taxonomy: impl Into<String>) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            number: 1,
            hide_empty: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermCatalog {
    pub version: u32,
    pub terms: Vec<TermRecord>,
}

impl TermCatalog {
    /// Load catalog from disk when available, falling back to the embedded copy.
    pub fn load_from_default() -> Result<Self, LocatorError> {
        match std::fs::read_to_string(DEFAULT_CATALOG_PATH) {
            Ok(contents) => Self::from_json(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => (*EMBEDDED).clone(),
            Err(err) => Err(LocatorError::CatalogUnreadable {
                path: DEFAULT_CATALOG_PATH.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    /// Load a catalog from an explicit path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LocatorError> {
        let contents = std::fs::read_to_string(&path).map_err(|err| {
            LocatorError::CatalogUnreadable {
                path: path.as_ref().display().to_string(),
                reason: err.to_string(),
            }
        })?;
        log::debug!("[Catalog] Read {:?}", path.as_ref());
        Self::from_json(&contents)
    }

    /// Parse catalog contents from JSON and validate invariants.
    pub fn from_json(data: &str) -> Result<Self, LocatorError> {
        let catalog: TermCatalog =
            serde_json::from_str(data).map_err(|err| LocatorError::CatalogInvalid {
                reason: format!("failed to parse term catalog JSON: {err}"),
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), LocatorError> {
        if self.version == 0 {
            return Err(invalid("catalog version must be > 0"));
        }
        let mut seen = HashSet::new();
        for record in &self.terms {
            if !seen.insert(record.term_id) {
                return Err(invalid(format!(
                    "duplicate term id detected: {}",
                    record.term_id
                )));
            }
            if record.taxonomy.trim().is_empty() {
                return Err(invalid(format!(
                    "term {} has an empty taxonomy",
                    record.term_id
                )));
            }
        }
        Ok(())
    }

    /// Terms matching `query`, in catalog order.
    pub fn get_terms(&self, query: &TermQuery) -> Result<Vec<Term>, LocatorError> {
        let limit = if query.number == 0 {
            usize::MAX
        } else {
            query.number
        };
        let terms: Vec<Term> = self
            .terms
            .iter()
            .filter(|r| r.taxonomy == query.taxonomy)
            .filter(|r| !query.hide_empty || r.count > 0)
            .take(limit)
            .cloned()
            .map(Term::from)
            .collect();
        if terms.is_empty() {
            return Err(LocatorError::NoTerms {
                taxonomy: query.taxonomy.clone(),
            });
        }
        Ok(terms)
    }

    /// Fresh single-record fetch of one term.
    pub fn get_term(&self, term_id: u64, taxonomy: &str) -> Result<Term, LocatorError> {
        self.terms
            .iter()
            .find(|r| r.term_id == term_id && r.taxonomy == taxonomy)
            .cloned()
            .map(Term::from)
            .ok_or_else(|| LocatorError::TermNotFound {
                term_id,
                taxonomy: taxonomy.to_string(),
            })
    }
}

fn invalid(reason: impl Into<String>) -> LocatorError {
    LocatorError::CatalogInvalid {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TermCatalog {
        TermCatalog::from_json(include_str!("../../fixtures/terms.json")).unwrap()
    }

    #[test]
    fn embedded_catalog_parses() {
        let catalog = catalog();
        assert_eq!(catalog.version, 1);
        assert!(catalog.terms.iter().any(|t| t.taxonomy == "category"));
        assert_eq!(TermCatalog::load_from_default().unwrap(), catalog);
    }

    #[test]
    fn query_respects_limit_and_hide_empty() {
        let catalog = catalog();
        let first = catalog.get_terms(&TermQuery::first_in("category")).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "Uncategorized");

        let query = TermQuery {
            taxonomy: "category".into(),
            number: 0,
            hide_empty: true,
        };
        let non_empty = catalog.get_terms(&query).unwrap();
        assert!(non_empty.iter().all(|t| t.count > 0));
    }

    #[test]
    fn empty_taxonomy_is_an_error() {
        let err = catalog()
            .get_terms(&TermQuery::first_in("product_cat"))
            .unwrap_err();
        assert!(matches!(err, LocatorError::NoTerms { .. }));
    }

    #[test]
    fn get_term_checks_taxonomy() {
        let catalog = catalog();
        assert!(catalog.get_term(7, "post_tag").is_ok());
        assert!(matches!(
            catalog.get_term(7, "category"),
            Err(LocatorError::TermNotFound { term_id: 7, .. })
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"{"version": 1, "terms": [
            {"term_id": 1, "name": "a", "slug": "a", "term_taxonomy_id": 1, "taxonomy": "category"},
            {"term_id": 1, "name": "b", "slug": "b", "term_taxonomy_id": 2, "taxonomy": "category"}
        ]}"#;
        let err = TermCatalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate term id"));
    }

    #[test]
    fn zero_version_rejected() {
        let err = TermCatalog::from_json(r#"{"version": 0, "terms": []}"#).unwrap_err();
        assert!(matches!(err, LocatorError::CatalogInvalid { .. }));
    }
}
