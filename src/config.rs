//! Probe plan configuration
//!
//! The probe set, mutation plan and base schema are loaded from JSON so a
//! different subject type can be probed without recompiling. Every field
//! falls back to the curated defaults used for taxonomy terms.

use crate::error::ProbeError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

/// A single dynamic attribute assignment applied during the write phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedWrite {
    pub name: String,
    pub value: Value,
}

impl PlannedWrite {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Complete probe plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbePlan {
    /// Names checked by every presence scan, in report order
    #[serde(default = "default_probe_names")]
    pub probe_names: Vec<String>,
    /// Attribute holding the structured data read in the read phase
    #[serde(default = "default_structured_name")]
    pub structured_name: String,
    /// Assignments applied in the write phase
    #[serde(default = "default_writes")]
    pub writes: Vec<PlannedWrite>,
    /// Names removed in the removal phase
    #[serde(default = "default_removals")]
    pub removals: Vec<String>,
    /// Name removed last that is never written
    #[serde(default = "default_never_set")]
    pub never_set: String,
    /// Names native to the subject's declared type
    #[serde(default = "default_base_schema")]
    pub base_schema: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

fn default_probe_names() -> Vec<String> {
    names(&["data", "link", "unknown", "custom_prop1", "custom_prop2"])
}

fn default_structured_name() -> String {
    "data".to_string()
}

fn default_writes() -> Vec<PlannedWrite> {
    vec![
        PlannedWrite::new("unknown", json!("unknown dynamic property")),
        PlannedWrite::new("link", json!("https://example.com/")),
        PlannedWrite::new("array_prop", json!({ "key": "value" })),
        PlannedWrite::new("number_prop", json!(12345)),
    ]
}

fn default_removals() -> Vec<String> {
    names(&["link", "array_prop", "number_prop"])
}

fn default_never_set() -> String {
    "non_existent_prop".to_string()
}

fn default_base_schema() -> Vec<String> {
    names(&[
        "term_id",
        "name",
        "slug",
        "term_group",
        "term_taxonomy_id",
        "taxonomy",
        "description",
        "parent",
        "count",
        "filter",
    ])
}

impl Default for ProbePlan {
    fn default() -> Self {
        Self {
            probe_names: default_probe_names(),
            structured_name: default_structured_name(),
            writes: default_writes(),
            removals: default_removals(),
            never_set: default_never_set(),
            base_schema: default_base_schema(),
        }
    }
}

impl ProbePlan {
    /// Parse a plan from JSON and validate it
    pub fn from_json(data: &str) -> Result<Self, ProbeError> {
        let plan: ProbePlan = serde_json::from_str(data).map_err(|err| ProbeError::PlanInvalid {
            reason: format!("failed to parse plan JSON: {err}"),
        })?;
        plan.validate()?;
        Ok(plan)
    }

    /// Check plan invariants
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.probe_names.is_empty() {
            return Err(invalid("probe_names must not be empty"));
        }
        if self.structured_name.trim().is_empty() {
            return Err(invalid("structured_name must not be empty"));
        }
        if self.never_set.trim().is_empty() {
            return Err(invalid("never_set must not be empty"));
        }
        ensure_unique("probe_names", self.probe_names.iter())?;
        ensure_unique("writes", self.writes.iter().map(|w| &w.name))?;
        ensure_unique("removals", self.removals.iter())?;
        if self.written(&self.never_set) {
            return Err(invalid(format!(
                "never_set name '{}' is also written",
                self.never_set
            )));
        }
        if self.removals.contains(&self.never_set) {
            return Err(invalid(format!(
                "never_set name '{}' is also listed in removals",
                self.never_set
            )));
        }
        Ok(())
    }

    /// Whether the write phase assigns `name`
    pub fn written(&self, name: &str) -> bool {
        self.writes.iter().any(|w| w.name == name)
    }
}

fn invalid(reason: impl Into<String>) -> ProbeError {
    ProbeError::PlanInvalid {
        reason: reason.into(),
    }
}

fn ensure_unique<'a>(
    field: &str,
    items: impl Iterator<Item = &'a String>,
) -> Result<(), ProbeError> {
    let mut seen = HashSet::new();
    for name in items {
        if !seen.insert(name.as_str()) {
            return Err(invalid(format!("duplicate name '{}' in {}", name, field)));
        }
    }
    Ok(())
}
