//! Export projection comparison.
//!
//! Names are compared as unordered sets but every list keeps the order its
//! projection yielded.

use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ExportDiff {
    pub native_names: Vec<String>,
    pub generic_names: Vec<String>,
    pub unique_to_native: Vec<String>,
    pub unique_to_generic: Vec<String>,
    pub additional_native: Vec<String>,
    pub additional_generic: Vec<String>,
}

impl ExportDiff {
    pub fn compare(native: &[String], generic: &[String], base_schema: &[String]) -> Self {
        Self {
            native_names: native.to_vec(),
            generic_names: generic.to_vec(),
            unique_to_native: difference(native, generic),
            unique_to_generic: difference(generic, native),
            additional_native: additional_properties(native, base_schema),
            additional_generic: additional_properties(generic, base_schema),
        }
    }

    /// Both projections expose the same set of names.
    pub fn is_identical(&self) -> bool {
        self.unique_to_native.is_empty() && self.unique_to_generic.is_empty()
    }

    /// Names unique to either side, native side first.
    pub fn symmetric_difference(&self) -> Vec<String> {
        self.unique_to_native
            .iter()
            .chain(self.unique_to_generic.iter())
            .cloned()
            .collect()
    }
}

/// Names of `left` absent from `right`, in `left` order.
pub fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    left.iter()
        .filter(|name| !right.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Names outside the declared schema, in projection order.
pub fn additional_properties(names: &[String], base_schema: &[String]) -> Vec<String> {
    difference(names, base_schema)
}
