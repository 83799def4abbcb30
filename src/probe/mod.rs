//! Probe engine.
//!
//! Drives the fixed protocol against one subject:
//!
//! 1. presence scan (baseline)
//! 2. structured read
//! 3. writes
//! 4. presence rescan over the same probe names
//! 5. removals, followed by a third presence scan
//! 6. export projection diff
//!
//! The rescan in step 4 deliberately covers only the probe names. Written
//! names outside that set (`array_prop`, `number_prop` in the default plan)
//! are never reverified.

pub mod diff;
pub mod phases;

pub use diff::ExportDiff;
pub use phases::{
    ExportPhase, PresenceCheck, PresenceScan, ProbeOutcome, RemovalCheck, RemovalStatus,
    ScanStage, StructuredRead, WriteRecord,
};

use crate::config::ProbePlan;
use crate::report::{self, Report};
use crate::subject::Subject;

pub struct ProbeEngine<'a, S: Subject + ?Sized> {
    subject: Option<&'a mut S>,
    plan: ProbePlan,
}

impl<'a, S: Subject + ?Sized> ProbeEngine<'a, S> {
    /// Engine with the default plan. `None` is the absent-subject sentinel.
    pub fn new(subject: Option<&'a mut S>) -> Self {
        Self::with_plan(subject, ProbePlan::default())
    }

    pub fn with_plan(subject: Option<&'a mut S>, plan: ProbePlan) -> Self {
        Self { subject, plan }
    }

    /// Run every phase and return structured results, or `None` when there is
    /// no subject. The subject is mutated in place and not restored.
    pub fn probe(&mut self) -> Option<ProbeOutcome> {
        let plan = &self.plan;
        let subject = self.subject.as_deref_mut()?;
        let label = subject.label();
        let _span = tracing::info_span!("probe", subject = %label).entered();

        let baseline = phases::scan_presence(subject, &plan.probe_names, ScanStage::Baseline);
        let read = phases::read_structured(subject, &plan.structured_name);
        let writes = phases::apply_writes(subject, &plan.writes);
        tracing::debug!(count = writes.len(), "applied writes");
        let after_write = phases::scan_presence(subject, &plan.probe_names, ScanStage::AfterWrite);
        let removals = phases::remove_attributes(subject, &plan.removals, &plan.never_set);
        let after_removal =
            phases::scan_presence(subject, &plan.probe_names, ScanStage::AfterRemoval);
        let export = phases::compare_exports(subject, &plan.base_schema);

        let outcome = ProbeOutcome {
            subject_type: subject.type_name().to_string(),
            subject_label: label,
            baseline,
            read,
            writes,
            after_write,
            removals,
            after_removal,
            export,
        };
        tracing::info!(
            anomalies = outcome.anomaly_count(),
            exports_diverge = outcome.exports_diverge(),
            "probe finished"
        );
        Some(outcome)
    }

    /// Run the probe and render the text report.
    pub fn run(&mut self) -> Report {
        match self.probe() {
            Some(outcome) => report::render(&outcome),
            None => {
                tracing::warn!("no subject to probe");
                Report::absent()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{DynamicProperties, Term, TermRecord};

    fn term() -> Term {
        Term::from(TermRecord::sample())
    }

    #[test]
    fn absent_subject_yields_single_line() {
        let mut engine: ProbeEngine<'_, Term> = ProbeEngine::new(None);
        assert!(engine.probe().is_none());
        let report = engine.run();
        assert_eq!(report.len(), 1);
        assert!(report.lines()[0].starts_with("❌ Error"));
    }

    #[test]
    fn written_probe_names_become_present() {
        let mut t = term();
        let outcome = ProbeEngine::new(Some(&mut t)).probe().unwrap();
        let plan = ProbePlan::default();
        for name in &plan.probe_names {
            let before = outcome.baseline.present(name).unwrap();
            let after = outcome.after_write.present(name).unwrap();
            assert!(!before, "{name} present before writes");
            assert_eq!(after, plan.written(name), "{name} after writes");
        }
    }

    #[test]
    fn rescan_covers_probe_names_only() {
        let mut t = term();
        let outcome = ProbeEngine::new(Some(&mut t)).probe().unwrap();
        assert_eq!(outcome.after_write.present("unknown"), Some(true));
        assert_eq!(outcome.after_write.present("link"), Some(true));
        assert_eq!(outcome.after_write.present("array_prop"), None);
        assert_eq!(outcome.after_write.present("number_prop"), None);
    }

    #[test]
    fn removals_succeed_and_unknown_survives() {
        let mut t = term();
        let outcome = ProbeEngine::new(Some(&mut t)).probe().unwrap();
        let statuses: Vec<(&str, RemovalStatus)> = outcome
            .removals
            .iter()
            .map(|r| (r.name.as_str(), r.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("link", RemovalStatus::Unset),
                ("array_prop", RemovalStatus::Unset),
                ("number_prop", RemovalStatus::Unset),
                ("non_existent_prop", RemovalStatus::NeverExisted),
            ]
        );
        assert_eq!(outcome.after_removal.present("unknown"), Some(true));
        assert_eq!(outcome.after_removal.present("link"), Some(false));
        assert!(t.isset("unknown"));
    }

    #[test]
    fn export_of_term_is_identical_with_one_additional_property() {
        let mut t = term();
        let outcome = ProbeEngine::new(Some(&mut t)).probe().unwrap();
        match &outcome.export {
            ExportPhase::Compared { diff, .. } => {
                assert!(diff.is_identical());
                assert_eq!(diff.additional_native, vec!["unknown"]);
            }
            other => panic!("unexpected export phase {other:?}"),
        }
        assert_eq!(outcome.anomaly_count(), 0);
    }

    #[test]
    fn second_run_sees_surviving_write_in_baseline() {
        let mut t = term();
        ProbeEngine::new(Some(&mut t)).run();
        let outcome = ProbeEngine::new(Some(&mut t)).probe().unwrap();
        assert_eq!(outcome.baseline.present("unknown"), Some(true));
        assert_eq!(outcome.baseline.present("link"), Some(false));
    }
}
