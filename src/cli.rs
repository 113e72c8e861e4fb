//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{load_config, OutputFormat, ScannerConfig};
use crate::error::{Result, ScanError};
use crate::report::{render, ScanReport};
use crate::scanner::Scanner;

/// Detect MCP server repositories and list the tools, prompts, and resources
/// they declare.
#[derive(Debug, Parser)]
#[command(name = "mcpscan", version, about)]
pub struct Cli {
    /// Repository root to scan.
    pub path: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// YAML config file (defaults to the per-user config, if any).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extract files one at a time instead of in parallel.
    #[arg(long)]
    pub sequential: bool,

    /// Worker threads for parallel extraction.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Follow symbolic links while walking the repository.
    #[arg(long)]
    pub follow_links: bool,

    /// Directory name to skip (repeatable).
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dirs: Vec<String>,

    /// Skip source files larger than this many bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Print scan statistics to stderr.
    #[arg(long)]
    pub stats: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Debug-level logging (ignored when RUST_LOG is set).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command-line flags over a loaded config.
    pub fn apply(&self, config: &mut ScannerConfig) {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.sequential {
            config.extraction.parallel = false;
        }
        if self.threads.is_some() {
            config.extraction.threads = self.threads;
        }
        if self.follow_links {
            config.walk.follow_links = true;
        }
        for dir in &self.skip_dirs {
            if !config.walk.is_skipped_dir(dir) {
                config.walk.skip_dirs.push(dir.clone());
            }
        }
        if self.max_file_bytes.is_some() {
            config.walk.max_file_bytes = self.max_file_bytes;
        }
    }
}

/// Run a scan as described by `cli` and return the rendered report.
pub fn run(cli: &Cli) -> Result<String> {
    if !cli.path.is_dir() {
        return Err(ScanError::Other("Repo path does not exist".into()));
    }

    let mut config = load_config(cli.config.as_deref())?;
    cli.apply(&mut config);
    let format = config.output.format;

    let scanner = Scanner::new(config)?;
    let outcome = scanner.scan_detailed(&cli.path);
    if cli.stats {
        eprintln!("{}", serde_json::to_string_pretty(&outcome.stats.to_json())?);
    }

    let styled = format == OutputFormat::Text && !cli.no_color && console::colors_enabled();
    tracing::debug!(%format, styled, "rendering report");
    render(&ScanReport::from_result(&outcome.result), format, styled)
}
