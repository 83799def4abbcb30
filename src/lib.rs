// Term Probe - dynamic attribute diagnostics
// Probes presence, read, write and removal of dynamic attributes on a single
// subject and compares its two export projections.

// Module declarations
pub mod config;
pub mod error;
pub mod locator;
pub mod probe;
pub mod report;
pub mod subject;

// Re-exports for convenience
pub use config::{PlannedWrite, ProbePlan};
pub use locator::{Located, SubjectLocator, TermCatalog, TermLocator};
pub use probe::{ProbeEngine, ProbeOutcome};
pub use report::Report;
pub use subject::{DynamicProperties, Subject, Term};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// Honors `RUST_LOG` and defaults to `default_level` when it is unset or
/// invalid. Logs never go to stdout, which carries the report. Calling this
/// more than once is harmless.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
