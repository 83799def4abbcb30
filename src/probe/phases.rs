//! Probe phases and their structured results.
//!
//! Each phase is a free function over a subject so it can be asserted on in
//! isolation; the engine only sequences them.

use super::diff::ExportDiff;
use crate::config::PlannedWrite;
use crate::error::{log_probe_error, ErrorCode, ProbeError};
use crate::subject::{project_generic, value_kind, Subject};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanStage {
    Baseline,
    AfterWrite,
    AfterRemoval,
}

impl ScanStage {
    pub fn describe(&self) -> &'static str {
        match self {
            ScanStage::Baseline => "before any modifications",
            ScanStage::AfterWrite => "after setting dynamic properties",
            ScanStage::AfterRemoval => "after unsetting dynamic properties",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PresenceCheck {
    pub name: String,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PresenceScan {
    pub stage: ScanStage,
    pub checks: Vec<PresenceCheck>,
}

impl PresenceScan {
    /// Presence recorded for `name`, if it was scanned.
    pub fn present(&self, name: &str) -> Option<bool> {
        self.checks
            .iter()
            .find(|check| check.name == name)
            .map(|check| check.present)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StructuredRead {
    Mapping {
        name: String,
        entries: Map<String, Value>,
    },
    Anomaly {
        name: String,
        code: i32,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WriteRecord {
    pub name: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemovalStatus {
    /// Present before removal, absent after.
    Unset,
    /// Absent both before and after removal.
    NeverExisted,
    /// Still present after removal.
    StillSet,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RemovalCheck {
    pub name: String,
    /// The plan's deliberately unwritten name.
    pub never_set: bool,
    pub status: RemovalStatus,
}

impl RemovalCheck {
    pub fn is_anomaly(&self) -> bool {
        self.status == RemovalStatus::StillSet
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportPhase {
    Compared {
        subject_dump: Map<String, Value>,
        diff: ExportDiff,
    },
    Unavailable {
        native_names: Vec<String>,
        code: i32,
        message: String,
    },
}

/// Structured result of a full probe run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProbeOutcome {
    pub subject_type: String,
    pub subject_label: String,
    pub baseline: PresenceScan,
    pub read: StructuredRead,
    pub writes: Vec<WriteRecord>,
    pub after_write: PresenceScan,
    pub removals: Vec<RemovalCheck>,
    pub after_removal: PresenceScan,
    pub export: ExportPhase,
}

impl ProbeOutcome {
    /// Count of recorded anomalies across all phases.
    ///
    /// Divergent exports are a comparison result, not an anomaly; see
    /// [`ProbeOutcome::exports_diverge`]. An unavailable comparison counts.
    pub fn anomaly_count(&self) -> usize {
        let read = usize::from(matches!(self.read, StructuredRead::Anomaly { .. }));
        let writes = self.writes.iter().filter(|w| w.rejected.is_some()).count();
        let removals = self.removals.iter().filter(|r| r.is_anomaly()).count();
        let export = usize::from(matches!(self.export, ExportPhase::Unavailable { .. }));
        read + writes + removals + export
    }

    /// True when both projections were taken and their names differ.
    pub fn exports_diverge(&self) -> bool {
        match &self.export {
            ExportPhase::Compared { diff, .. } => !diff.is_identical(),
            ExportPhase::Unavailable { .. } => false,
        }
    }
}

pub fn scan_presence<S: Subject + ?Sized>(
    subject: &S,
    names: &[String],
    stage: ScanStage,
) -> PresenceScan {
    let checks = names
        .iter()
        .map(|name| PresenceCheck {
            name: name.clone(),
            present: subject.isset(name),
        })
        .collect();
    PresenceScan { stage, checks }
}

pub fn read_structured<S: Subject + ?Sized>(subject: &S, name: &str) -> StructuredRead {
    match coerce_to_mapping(name, subject.get(name)) {
        Ok(entries) => StructuredRead::Mapping {
            name: name.to_string(),
            entries,
        },
        Err(err) => {
            log_probe_error(&err, "read_structured");
            StructuredRead::Anomaly {
                name: name.to_string(),
                code: err.code(),
                message: err.message(),
            }
        }
    }
}

/// Coerce an attribute value into a key-value mapping.
///
/// Objects pass through and sequences become index-keyed mappings. Missing,
/// null and scalar values cannot be coerced.
pub fn coerce_to_mapping(name: &str, value: Option<Value>) -> Result<Map<String, Value>, ProbeError> {
    match value {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect()),
        Some(other) => Err(ProbeError::ReadCoercion {
            name: name.to_string(),
            found: value_kind(&other).to_string(),
        }),
        None => Err(ProbeError::ReadCoercion {
            name: name.to_string(),
            found: "nothing".to_string(),
        }),
    }
}

pub fn apply_writes<S: Subject + ?Sized>(subject: &mut S, writes: &[PlannedWrite]) -> Vec<WriteRecord> {
    writes
        .iter()
        .map(|write| {
            let rejected = subject
                .set(&write.name, write.value.clone())
                .err()
                .map(|err| err.message());
            WriteRecord {
                name: write.name.clone(),
                value: write.value.clone(),
                rejected,
            }
        })
        .collect()
}

pub fn remove_attributes<S: Subject + ?Sized>(
    subject: &mut S,
    removals: &[String],
    never_set: &str,
) -> Vec<RemovalCheck> {
    let targets = removals
        .iter()
        .map(|name| (name.as_str(), false))
        .chain(std::iter::once((never_set, true)));

    targets
        .map(|(name, is_never_set)| {
            let was_present = subject.isset(name);
            subject.unset(name);
            let status = match (was_present, subject.isset(name)) {
                (_, true) => RemovalStatus::StillSet,
                (true, false) => RemovalStatus::Unset,
                (false, false) => RemovalStatus::NeverExisted,
            };
            RemovalCheck {
                name: name.to_string(),
                never_set: is_never_set,
                status,
            }
        })
        .collect()
}

pub fn compare_exports<S: Subject + ?Sized>(subject: &S, base_schema: &[String]) -> ExportPhase {
    let native_names: Vec<String> = subject.to_array().keys().cloned().collect();
    match project_generic(subject) {
        Ok(subject_dump) => {
            let generic_names: Vec<String> = subject_dump.keys().cloned().collect();
            let diff = ExportDiff::compare(&native_names, &generic_names, base_schema);
            ExportPhase::Compared { subject_dump, diff }
        }
        Err(err) => {
            log_probe_error(&err, "compare_exports");
            ExportPhase::Unavailable {
                native_names,
                code: err.code(),
                message: err.message(),
            }
        }
    }
}
