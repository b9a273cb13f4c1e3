//! idkcheck — validate an Information Dense Keywords dictionary.
//!
//! `idkcheck [ROOT]` checks the index and every dictionary entry below ROOT
//! and exits non-zero when any error is found.

use anyhow::{Context, Result};
use clap::Parser;
use idkcheck::config::Config;
use idkcheck::model::Report;
use idkcheck::render;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "IDKCHECK_LOG";

static INIT: Once = Once::new();

#[derive(Parser)]
#[command(
    name = "idkcheck",
    version,
    about = "Validate the schema, links and command chaining of a keywords dictionary"
)]
struct Cli {
    /// Corpus root containing the index document and the dictionary
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to idkcheck.toml in the root, if present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format: text (default), json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Vocabulary matcher: substring, exact, edit-distance.
    /// Overrides the config file.
    #[arg(short = 'm', long)]
    matcher: Option<String>,

    /// Treat warnings as errors for the exit status
    #[arg(long)]
    deny_warnings: bool,

    /// Log progress to stderr (same as IDKCHECK_LOG=idkcheck=debug)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(&cli.root, cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(matcher) = &cli.matcher {
        config.matcher = matcher.clone();
    }

    // Reject a bad format before doing any work.
    let renderer = render::create_renderer(&cli.format)?;

    let report = idkcheck::validate_dir(&cli.root, &config)
        .with_context(|| format!("validation of {} aborted", cli.root.display()))?;

    print!("{}", renderer.render(&report)?);
    Ok(exit_code(&report, cli.deny_warnings))
}

/// Logs go to stderr so the report on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = if verbose {
            EnvFilter::new("idkcheck=debug")
        } else {
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("idkcheck=warn"))
        };

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}

fn exit_code(report: &Report, deny_warnings: bool) -> ExitCode {
    if failed(report, deny_warnings) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn failed(report: &Report, deny_warnings: bool) -> bool {
    !report.passed() || (deny_warnings && report.warning_count() > 0)
}
