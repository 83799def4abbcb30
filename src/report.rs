//! Text report rendering.
//!
//! Turns a [`ProbeOutcome`] into the human-readable, line-oriented report.
//! Every per-attribute line uses the same success/failure glyphs.

use crate::probe::{
    ExportPhase, PresenceScan, ProbeOutcome, RemovalCheck, RemovalStatus, StructuredRead,
    WriteRecord,
};
use serde::Serialize;
use std::fmt;

pub const SUCCESS: &str = "✅";
pub const FAILURE: &str = "❌";
const SEPARATOR: &str = "----------------------------------------";

/// Finished probe report. Lines are appended while rendering and frozen once
/// the report is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// The one-line report for a run without a subject.
    pub fn absent() -> Self {
        let mut report = Report::default();
        report.push(format!(
            "{FAILURE} Error: No valid subject found for testing. Please ensure the locator resolved an object."
        ));
        report
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the first line equal to `line`.
    pub fn position(&self, line: &str) -> Option<usize> {
        self.lines.iter().position(|l| l == line)
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.push("");
    }

    fn heading(&mut self, title: impl Into<String>) {
        self.blank();
        self.push(title);
        self.push(SEPARATOR);
    }

    /// Append a multi-line block, one report line per text line.
    fn block(&mut self, prefix: &str, text: &str) {
        let mut lines = text.lines();
        if let Some(first) = lines.next() {
            self.push(format!("{prefix}{first}"));
        }
        for line in lines {
            self.push(line);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub fn render(outcome: &ProbeOutcome) -> Report {
    let ty = outcome.subject_type.as_str();
    let mut report = Report::default();

    report.push(format!("Testing {ty} object for {}", outcome.subject_label));
    report.push(SEPARATOR);

    render_scan(&mut report, ty, &outcome.baseline);
    render_read(&mut report, ty, &outcome.read);
    render_writes(&mut report, ty, &outcome.writes);
    render_scan(&mut report, ty, &outcome.after_write);
    render_removals(&mut report, ty, &outcome.removals);
    render_scan(&mut report, ty, &outcome.after_removal);
    render_export(&mut report, ty, &outcome.export);

    report
}

fn render_scan(report: &mut Report, ty: &str, scan: &PresenceScan) {
    report.heading(format!("Testing isset() - {}:", scan.stage.describe()));
    for check in &scan.checks {
        let verdict = if check.present { "True" } else { "False" };
        report.push(format!("\t{ty}::${}: {verdict}", check.name));
    }
}

fn render_read(report: &mut Report, ty: &str, read: &StructuredRead) {
    report.blank();
    match read {
        StructuredRead::Mapping { name, entries } => {
            report.push(format!(
                "Testing get: Successfully accessed '{name}' property as a mapping."
            ));
            report.block(&format!("{ty} {name}: "), &pretty(entries));
        }
        StructuredRead::Anomaly { name, message, .. } => {
            report.push(format!(
                "{FAILURE} Testing get: Failed to access '{name}' property as a mapping: {message}"
            ));
        }
    }
}

fn render_writes(report: &mut Report, ty: &str, writes: &[WriteRecord]) {
    report.heading("Testing setting dynamic properties:");
    for write in writes {
        let value = write.value.to_string();
        match &write.rejected {
            None => report.push(format!("\tSet {ty}::${} = {value}", write.name)),
            Some(reason) => report.push(format!(
                "\t{FAILURE} Set {ty}::${} = {value}: {reason}",
                write.name
            )),
        }
    }
}

fn render_removals(report: &mut Report, ty: &str, removals: &[RemovalCheck]) {
    report.heading("Testing unsetting dynamic properties:");
    for check in removals {
        let note = if check.never_set { " (never set)" } else { "" };
        let verdict = match check.status {
            RemovalStatus::StillSet => format!("{FAILURE} Failed (still set)"),
            RemovalStatus::NeverExisted if check.never_set => {
                format!("{SUCCESS} Success (never existed)")
            }
            RemovalStatus::NeverExisted => format!("{SUCCESS} Success (was not set)"),
            RemovalStatus::Unset => format!("{SUCCESS} Success (unset)"),
        };
        report.push(format!("\tUnset {ty}::${}{note}: {verdict}", check.name));
    }
}

fn render_export(report: &mut Report, ty: &str, export: &ExportPhase) {
    let native = format!("{ty}::to_array()");
    let generic = "generic projection";
    report.blank();
    match export {
        ExportPhase::Unavailable {
            native_names,
            message,
            ..
        } => {
            report.push(format!("Via {native} props: {}", native_names.join(", ")));
            report.heading(format!("Comparing results between {native} and {generic}:"));
            report.push(format!("{FAILURE} Comparison unavailable: {message}"));
        }
        ExportPhase::Compared { subject_dump, diff } => {
            report.block(&format!("{ty}: "), &pretty(subject_dump));
            report.push(format!("Via {native} props: {}", diff.native_names.join(", ")));
            report.push(format!("Via {generic} props: {}", diff.generic_names.join(", ")));
            report.heading(format!("Comparing results between {native} and {generic}:"));

            if diff.is_identical() {
                report.push(format!("{SUCCESS} Results are identical."));
                report.push(format!(
                    "Additional properties: {}",
                    diff.additional_native.join(", ")
                ));
                return;
            }

            report.push(format!("{FAILURE} Results differ."));
            if !diff.unique_to_native.is_empty() {
                report.blank();
                report.push(format!("Properties unique to {native}:"));
                for name in &diff.unique_to_native {
                    report.push(format!("\t- {name}"));
                }
            }
            if !diff.unique_to_generic.is_empty() {
                report.blank();
                report.push(format!("Properties unique to {generic}:"));
                for name in &diff.unique_to_generic {
                    report.push(format!("\t- {name}"));
                }
            }
            report.push(format!(
                "Additional properties via {native}: {}",
                diff.additional_native.join(", ")
            ));
            report.push(format!(
                "Additional properties via {generic}: {}",
                diff.additional_generic.join(", ")
            ));
        }
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("<unprintable: {err}>"))
}
