use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use descriptors::{DescriptorProvider, DescriptorTable, MergedProvider};
use pipeline::{PipelineConfig, PipelineMode};
use sources::read_candidate_list;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use triage::{TriageOrchestrator, TriageReport};

mod report;

/// How long to wait at exit for provider calls abandoned after a timeout.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

/// Compound triage - multi-stage descriptor filtering for drug discovery
#[derive(Parser)]
#[command(name = "compound-triage")]
#[command(about = "Filter candidate structures through descriptor admissibility stages", long_about = None)]
struct Cli {
    /// Stage configuration (JSON). Defaults to rule of five + advanced ADMET stages
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run candidates through the configured stages
    Filter {
        /// File with one structure (e.g. SMILES) per line
        #[arg(long)]
        candidates: PathBuf,

        /// Descriptor table(s); the first decides which structures parse,
        /// later ones add descriptors (e.g. ADMET predictions)
        #[arg(short, long = "descriptors", required = true)]
        descriptors: Vec<PathBuf>,

        /// Only run these stages (repeatable)
        #[arg(long = "stage")]
        stages: Vec<String>,

        /// Only pass candidates to a stage if they passed all earlier ones
        #[arg(long)]
        funnel: bool,

        /// Evaluate candidates in parallel
        #[arg(long)]
        parallel: bool,

        /// Also list rejected candidates and the rules they broke
        #[arg(long)]
        show_rejected: bool,

        /// Print the full audit as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Per-structure descriptor lookup timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List configured stages and their rules
    Stages,

    /// Check a stage configuration file (--config) without running anything
    Validate,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let result = runtime.block_on(run(cli));
    // Timed-out lookups can still be running on the blocking pool; don't wait on them
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Filter {
            candidates,
            descriptors,
            stages,
            funnel,
            parallel,
            show_rejected,
            json,
            timeout_ms,
        } => {
            let mut config = config.select(&stages)?;
            if funnel {
                config.mode = PipelineMode::Funnel;
            }
            config.parallel |= parallel;

            let report = handle_filter(
                config,
                &candidates,
                &descriptors,
                timeout_ms.map(Duration::from_millis),
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report.audit)?);
            } else {
                print_report(&report, show_rejected);
            }
        }
        Commands::Stages => handle_stages(&config)?,
        Commands::Validate => {
            validation_target(cli.config.as_deref())?;
            handle_validate(&config)?
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load stage configuration {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Handle the 'filter' command
async fn handle_filter(
    config: PipelineConfig,
    candidates: &Path,
    tables: &[PathBuf],
    timeout: Option<Duration>,
) -> Result<TriageReport> {
    // Configuration problems surface before any descriptor work
    let pipeline = config.build_pipeline().context("Invalid stage configuration")?;

    let ids = read_candidate_list(candidates)?;
    let provider = build_provider(tables)?;
    info!(
        "Triaging {} candidates against {} stage(s) using {}",
        ids.len(),
        pipeline.stage_names().len(),
        provider.name()
    );

    let mut orchestrator = TriageOrchestrator::new(provider, Arc::new(pipeline));
    if let Some(timeout) = timeout {
        orchestrator = orchestrator.with_provider_timeout(timeout);
    }
    orchestrator.triage(ids).await
}

/// First table is the primary provider, the rest are merged in.
fn build_provider(tables: &[PathBuf]) -> Result<Arc<dyn DescriptorProvider>> {
    let mut loaded = DescriptorTable::load_many(tables)
        .context("Failed to load descriptor tables")?
        .into_iter();
    let primary = loaded.next().context("At least one descriptor table is required")?;

    let secondary: Vec<DescriptorTable> = loaded.collect();
    if secondary.is_empty() {
        let provider: Arc<dyn DescriptorProvider> = Arc::new(primary);
        return Ok(provider);
    }
    let merged = secondary
        .into_iter()
        .fold(MergedProvider::new(Arc::new(primary)), |merged, table| {
            merged.with_secondary(Arc::new(table))
        });
    let provider: Arc<dyn DescriptorProvider> = Arc::new(merged);
    Ok(provider)
}

/// Handle the 'stages' command
fn handle_stages(config: &PipelineConfig) -> Result<()> {
    println!(
        "{} ({:?} mode)",
        "Configured stages:".bold().blue(),
        config.mode
    );
    for stage in &config.stages {
        println!("{} {}", "•".green(), stage.name.bold());
        if stage.rules.is_empty() {
            println!("    (no rules, every parsed candidate passes)");
        }
        for rule in &stage.rules {
            println!(
                "    {} {} {}",
                descriptors::names::label(&rule.descriptor),
                rule.comparator,
                rule.threshold
            );
        }
    }
    Ok(())
}

/// `validate` checks a file; there is nothing to check without one.
fn validation_target(path: Option<&Path>) -> Result<&Path> {
    path.context("validate needs a stage configuration: --config <json>")
}

/// Handle the 'validate' command
fn handle_validate(config: &PipelineConfig) -> Result<()> {
    let pipeline = config.build_pipeline().context("Invalid stage configuration")?;
    println!(
        "{} {} stages valid: {}",
        "✓".green(),
        pipeline.stage_names().len(),
        pipeline.stage_names().join(", ")
    );
    Ok(())
}

/// Print one table per stage, then the unparsed structures
fn print_report(report: &TriageReport, show_rejected: bool) {
    for stage in &report.audit.stages {
        println!("{}", report::stage_summary(stage).bold().blue());

        let passed = report::render_records(stage.passed(), false);
        if passed.is_empty() {
            println!("(no compounds passed)");
        } else {
            print!("{passed}");
        }

        if show_rejected {
            let rejected = report::render_records(stage.rejected(), true);
            if !rejected.is_empty() {
                println!("{}", "Rejected:".yellow());
                print!("{rejected}");
            }
        }
        println!();
    }

    if !report.unparsed().is_empty() {
        println!(
            "{} {} structure(s) could not be parsed: {}",
            "!".yellow(),
            report.unparsed().len(),
            report.unparsed().join(", ")
        );
    }
    println!(
        "Examined {} candidates in {:.2?}",
        report.audit.examined, report.elapsed
    );
}
