use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use term_probe::locator::TermQuery;
use term_probe::report::{FAILURE, SUCCESS};
use term_probe::{
    Located, ProbeEngine, ProbeOutcome, ProbePlan, SubjectLocator, Term, TermCatalog, TermLocator,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    term_probe::init_logging(if cli.verbose { "debug" } else { "warn" });
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("term-probe error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "term-probe",
    version,
    about = "Dynamic attribute probe for a single taxonomy term"
)]
struct Cli {
    /// Enable debug logging on stderr (overridden by RUST_LOG).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<()> {
        match self.command {
            Command::Run(args) => run_command(args),
            Command::List(args) => list_command(args),
            Command::Plan => plan_command(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Locate a term and run the full probe against it.
    Run(RunArgs),
    /// List catalog terms of a taxonomy.
    List(ListArgs),
    /// Print the default probe plan as JSON.
    Plan,
}

#[derive(Args, Debug, Clone)]
struct CatalogArgs {
    /// Term catalog JSON (defaults to the bundled fixtures/terms.json).
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Taxonomy to pick the subject from.
    #[arg(long, default_value = "category")]
    taxonomy: String,
}

impl CatalogArgs {
    fn load(&self) -> Result<TermCatalog, term_probe::error::LocatorError> {
        match &self.catalog {
            Some(path) => TermCatalog::load_from_path(path),
            None => TermCatalog::load_from_default(),
        }
    }
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// Probe this term id instead of the first term of the taxonomy.
    #[arg(long)]
    term_id: Option<u64>,
    /// Probe plan JSON overriding the default probe set and mutation plan.
    #[arg(long)]
    plan: Option<PathBuf>,
    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ListArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    absent_reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<ProbeOutcome>,
}

fn run_command(args: RunArgs) -> Result<()> {
    let plan = match &args.plan {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading probe plan {}", path.display()))?;
            ProbePlan::from_json(&raw).context("parsing probe plan")?
        }
        None => ProbePlan::default(),
    };

    let mut located = match args.catalog.load() {
        Ok(catalog) => TermLocator::new(&catalog, args.catalog.taxonomy.as_str())
            .with_term_id(args.term_id)
            .locate(),
        Err(err) => Located::from_result(Err(err), "term-probe run"),
    };

    let rendered = match args.format {
        ReportFormat::Text => render_text(&mut located, &args.catalog.taxonomy, plan),
        ReportFormat::Json => render_json(&mut located, plan)?,
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).context("creating report output directory")?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render_text(located: &mut Located<Term>, taxonomy: &str, plan: ProbePlan) -> String {
    let mut out = String::new();
    match located {
        Located::Found(term) => {
            out.push_str(&format!(
                "{SUCCESS} Fetched {} Name: {}\n",
                title_case(taxonomy),
                term.name
            ));
        }
        Located::Absent { .. } => {
            out.push_str(&format!(
                "{FAILURE} Error: No terms found or an error occurred while fetching terms.\n"
            ));
        }
    }
    let report = ProbeEngine::with_plan(located.subject_mut(), plan).run();
    out.push_str(&report.to_string());
    out
}

fn render_json(located: &mut Located<Term>, plan: ProbePlan) -> Result<String> {
    let absent_reason = match located {
        Located::Absent { reason } => Some(reason.clone()),
        Located::Found(_) => None,
    };
    let outcome = ProbeEngine::with_plan(located.subject_mut(), plan).probe();
    let payload = JsonReport {
        ok: outcome.is_some(),
        absent_reason: absent_reason.as_deref(),
        outcome,
    };
    let mut json = serde_json::to_string_pretty(&payload).context("serializing probe outcome")?;
    json.push('\n');
    Ok(json)
}

fn list_command(args: ListArgs) -> Result<()> {
    let catalog = args.catalog.load().context("loading term catalog")?;
    let query = TermQuery {
        taxonomy: args.catalog.taxonomy.clone(),
        number: 0,
        hide_empty: false,
    };
    let terms = catalog.get_terms(&query).context("querying terms")?;
    for term in terms {
        println!("{}\t{}\t{}\t{}", term.term_id, term.slug, term.count, term.name);
    }
    Ok(())
}

fn plan_command() -> Result<()> {
    let json =
        serde_json::to_string_pretty(&ProbePlan::default()).context("serializing default plan")?;
    println!("{json}");
    Ok(())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
