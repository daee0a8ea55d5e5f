//! Header stub generator CLI
//!
//! Walks a source tree and creates a one-line source file for every header
//! that does not have one yet.

mod config;
mod error;
mod generator;
mod reporter;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::StubConfig;
use reporter::{JsonReporter, OutputFormat, ReportSink, TextReporter};

#[derive(Debug, Parser)]
#[command(name = "stubgen")]
#[command(version = "0.1.0")]
#[command(about = "Create stub source files for headers that have none")]
struct Cli {
    /// Root directory to scan for headers
    #[arg(default_value = config::DEFAULT_ROOT)]
    root: PathBuf,

    /// Header file extension [default: h]
    #[arg(long = "header-ext")]
    header_ext: Option<String>,

    /// Extension of generated source files [default: cpp]
    #[arg(long = "source-ext")]
    source_ext: Option<String>,

    /// Directive template written into each stub; `{header}` is replaced by the header's file name
    #[arg(long)]
    directive: Option<String>,

    /// TOML file with default settings (command-line flags take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Report missing stubs without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Continue past write failures and report them at the end
    #[arg(long)]
    keep_going: bool,

    /// Honour .gitignore/.ignore files and skip hidden entries
    #[arg(long)]
    respect_ignore: bool,

    /// Glob pattern (relative to the root) to skip; may be repeated
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Merge the config file (if any) with command-line overrides
    fn resolve_config(&self) -> Result<StubConfig> {
        let mut config = match &self.config {
            Some(path) => StubConfig::load(path)?,
            None => StubConfig::default(),
        };

        if let Some(ext) = &self.header_ext {
            config.header_extension = ext.clone();
        }
        if let Some(ext) = &self.source_ext {
            config.source_extension = ext.clone();
        }
        if let Some(directive) = &self.directive {
            config.directive = directive.clone();
        }
        config.respect_ignore |= self.respect_ignore;
        config.exclude.extend(self.exclude.iter().cloned());
        config.dry_run = self.dry_run;
        config.keep_going = self.keep_going;

        Ok(config.validate()?)
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn init_logging(default_level: &str) {
    // Stdout carries the report, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let config = cli.resolve_config().context("invalid configuration")?;
    debug!(?config, "resolved configuration");
    info!(
        root = %cli.root.display(),
        header = %config.header_extension,
        source = %config.source_extension,
        "scanning for headers"
    );

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn ReportSink> = match cli.format {
        OutputFormat::Text => Box::new(TextReporter::new(stdout)),
        OutputFormat::Json => Box::new(JsonReporter::new(stdout, cli.root.clone())),
    };

    let summary = generator::generate(&cli.root, config, sink.as_mut())
        .with_context(|| format!("stub generation failed in {}", cli.root.display()))?;

    info!(
        headers = summary.headers(),
        created = summary.created,
        existing = summary.existing,
        missing = summary.missing,
        "done"
    );

    Ok(())
}
