//! OTI Indexer main entry point
//!
//! This is the command-line interface for indexing every phylesystem study in
//! an OTI instance.

use anyhow::Context;
use clap::{CommandFactory, Parser, ValueEnum};
use oti_indexer::config::{
    load_config_with_hash, validate, Config, RequestFormat, SourceConfig, DEFAULT_API_URL,
};
use oti_indexer::indexer::Coordinator;
use oti_indexer::output::{print_summary, write_failed_ids};
use oti_indexer::{ConfigError, IndexerError, RunSummary, StudyFilter, StudyId};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for a run that completed with at least one failed study
const EXIT_STUDIES_FAILED: u8 = 1;

/// Exit code for invalid configuration or a failed study discovery
const EXIT_FATAL: u8 = 2;

/// Index every study from a phylesystem source into OTI
///
/// Studies are listed once, then submitted one at a time to the indexing
/// service. Failed studies are reported at the end and do not stop the run.
#[derive(Parser, Debug)]
#[command(name = "oti-indexer")]
#[command(version)]
#[command(about = "Index phylesystem studies into OTI", long_about = None)]
struct Cli {
    /// Base URL of the OTI service (e.g. http://localhost:7474/db/data/)
    #[arg(value_name = "OTI_URL")]
    oti_url: Option<String>,

    /// Base URL of the phylesystem API [default: http://localhost/api/]
    #[arg(value_name = "API_URL")]
    api_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where the study list comes from
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Repository contents API base (repository source)
    #[arg(long, value_name = "URL")]
    contents_url: Option<String>,

    /// Raw document base (repository source)
    #[arg(long, value_name = "URL")]
    raw_url: Option<String>,

    /// Indexing endpoint path below OTI_URL
    #[arg(long, value_name = "PATH")]
    index_path: Option<String>,

    /// Send {"urls": [...]} bodies for the older bulk endpoint
    #[arg(long)]
    batch_format: bool,

    /// Number of indexing requests in flight at once
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Only index this study (repeatable)
    #[arg(long = "only", value_name = "ID")]
    only: Vec<String>,

    /// Only index the studies listed in this file, one per line
    #[arg(long, value_name = "FILE")]
    ids_file: Option<PathBuf>,

    /// Write the ids of failed studies to this file
    #[arg(long, value_name = "FILE")]
    failures_out: Option<PathBuf>,

    /// List the studies and document URLs without submitting anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// Content API `study_list` endpoint
    LocalApi,
    /// Repository contents listing of the `study` directory
    Repository,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("oti_indexer=info,warn"),
            1 => EnvFilter::new("oti_indexer=debug,info"),
            2 => EnvFilter::new("oti_indexer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_cli(&mut config, &cli)?;
    validate(&config)?;

    let filter = build_filter(&cli)?;
    let coordinator = match Coordinator::from_config(&config, filter) {
        Ok(coordinator) => coordinator,
        Err(e) if is_usage_error(&e) => {
            print_usage();
            return Ok(exit_code(&Err(e)));
        }
        Err(e) => return Err(e.into()),
    };

    if cli.dry_run {
        let plan = coordinator.plan().await?;
        println!("=== Dry Run: {} studies ===\n", plan.len());
        for (study_id, url) in &plan {
            match url {
                Ok(url) => println!("  {}  {}", study_id, url),
                Err(e) => println!("  {}  (will fail: {})", study_id, e),
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let result = coordinator.run().await;
    match &result {
        Ok(summary) => {
            print_summary(summary);
            if let Some(path) = &cli.failures_out {
                write_failed_ids(summary, path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(
                    "Wrote {} failed study ids to {}",
                    summary.failed(),
                    path.display()
                );
            }
        }
        Err(e) => tracing::error!("{}", e),
    }

    Ok(exit_code(&result))
}

/// True for errors that mean "nothing to do yet" rather than a failed run
fn is_usage_error(error: &IndexerError) -> bool {
    matches!(error, IndexerError::Config(ConfigError::MissingIndexerUrl))
}

/// Maps the outcome of a run to the process exit code
///
/// | Outcome | Code |
/// |---------|------|
/// | every study indexed | 0 |
/// | no indexing service URL (usage printed) | 0 |
/// | at least one study failed | 1 |
/// | configuration or discovery error | 2 |
fn exit_code(result: &Result<RunSummary, IndexerError>) -> ExitCode {
    match result {
        Ok(summary) if summary.has_failures() => ExitCode::from(EXIT_STUDIES_FAILED),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if is_usage_error(e) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(EXIT_FATAL),
    }
}

fn print_usage() {
    let mut command = Cli::command();
    // Nothing useful to do if stdout is gone
    let _ = command.print_help();
    println!();
}

/// Overrides file configuration with command-line values
fn apply_cli(config: &mut Config, cli: &Cli) -> Result<(), ConfigError> {
    if let Some(url) = &cli.oti_url {
        config.indexer.url = Some(url.clone());
    }
    if let Some(path) = &cli.index_path {
        config.indexer.index_path = path.clone();
    }
    if cli.batch_format {
        config.indexer.request_format = RequestFormat::Batch;
    }
    if let Some(max) = cli.max_concurrent {
        config.indexer.max_concurrent_submissions = max;
    }
    if let Some(timeout) = cli.timeout {
        config.indexer.timeout_secs = timeout;
    }

    let kind = cli.source.unwrap_or(match config.source {
        SourceConfig::LocalApi { .. } => SourceKind::LocalApi,
        SourceConfig::Repository { .. } => SourceKind::Repository,
    });

    config.source = match (kind, &config.source) {
        (SourceKind::LocalApi, current) => {
            if cli.contents_url.is_some() || cli.raw_url.is_some() {
                return Err(ConfigError::Validation(
                    "--contents-url and --raw-url need --source repository".to_string(),
                ));
            }
            let api_url = match (&cli.api_url, current) {
                (Some(url), _) => url.clone(),
                (None, SourceConfig::LocalApi { api_url }) => api_url.clone(),
                (None, SourceConfig::Repository { .. }) => DEFAULT_API_URL.to_string(),
            };
            SourceConfig::LocalApi { api_url }
        }
        (SourceKind::Repository, current) => {
            if cli.api_url.is_some() {
                return Err(ConfigError::Validation(
                    "API_URL is only used with --source local-api".to_string(),
                ));
            }
            let (file_contents, file_raw) = match current {
                SourceConfig::Repository {
                    contents_url,
                    raw_url,
                } => (Some(contents_url.clone()), Some(raw_url.clone())),
                SourceConfig::LocalApi { .. } => (None, None),
            };
            match (cli.contents_url.clone().or(file_contents), cli.raw_url.clone().or(file_raw)) {
                (Some(contents_url), Some(raw_url)) => SourceConfig::Repository {
                    contents_url,
                    raw_url,
                },
                _ => {
                    return Err(ConfigError::Validation(
                        "the repository source needs both --contents-url and --raw-url"
                            .to_string(),
                    ))
                }
            }
        }
    };

    Ok(())
}

fn build_filter(cli: &Cli) -> anyhow::Result<Option<StudyFilter>> {
    let mut filter = match &cli.ids_file {
        Some(path) => StudyFilter::from_file(path)
            .with_context(|| format!("failed to read study ids from {}", path.display()))?,
        None => StudyFilter::default(),
    };
    filter.extend(cli.only.iter().map(|id| StudyId::from(id.as_str())));

    if filter.is_empty() && cli.ids_file.is_none() {
        Ok(None)
    } else {
        Ok(Some(filter))
    }
}
