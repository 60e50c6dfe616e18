//! locale-patch command line
//!
//! `apply` runs a whole patch set, `set` upserts one file, `plan` shows what
//! `apply` would touch.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{self, Manifest};
use crate::errors::{merge_exit_code, PatchError};
use crate::merge::{
    BatchPolicy, EntryReport, EntryStatus, LocaleMerger, MergeOptions, MergeReport,
    DEFAULT_INDENT, DEFAULT_KEY,
};
use crate::observability::telemetry::init_tracing;
use crate::output::{self, OutputFormat};

#[derive(Parser)]
#[command(name = "locale-patch")]
#[command(about = "Upsert a namespaced block into JSON locale files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Manifest file (TOML) listing the locale files and their values
    #[arg(short = 'm', long, value_name = "FILE", global = true)]
    manifest: Option<String>,

    /// Working directory
    #[arg(short = 'C', long, value_name = "DIR", global = true)]
    workdir: Option<String>,

    /// Quiet mode (only failures are printed)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode (info-level logs on stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Output format for machine consumption
    #[arg(long, value_enum, default_value = "text", global = true)]
    output_format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the manifest (or the built-in affiliate set) to every locale file
    #[command(alias = "a")]
    Apply(ApplyArgs),

    /// Upsert a single key into one locale file
    Set(SetArgs),

    /// List the files a run would touch without writing anything
    #[command(alias = "p")]
    Plan(PlanArgs),
}

#[derive(Args, Default)]
struct ApplyArgs {
    /// Override the top-level key
    #[arg(short, long)]
    key: Option<String>,

    /// Directory that relative entry paths resolve against
    #[arg(short = 'd', long, value_name = "DIR")]
    locales_dir: Option<PathBuf>,

    /// Keep processing after a failure and report all errors at the end
    #[arg(long)]
    keep_going: bool,

    /// Parse and render every file but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Copy each file to <file>.bak before replacing it
    #[arg(long)]
    backup: bool,
}

#[derive(Args)]
struct SetArgs {
    /// Locale file to update
    file: PathBuf,

    /// Value as inline JSON
    #[arg(long, conflicts_with = "value_file", required_unless_present = "value_file")]
    value: Option<String>,

    /// Read the value from a JSON file
    #[arg(long, value_name = "FILE")]
    value_file: Option<PathBuf>,

    /// Top-level key to set
    #[arg(short, long, default_value = DEFAULT_KEY)]
    key: String,

    /// Indentation width in spaces
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// Render but do not write
    #[arg(long)]
    dry_run: bool,

    /// Copy the file to <file>.bak before replacing it
    #[arg(long)]
    backup: bool,
}

#[derive(Args, Default)]
struct PlanArgs {
    /// Override the top-level key
    #[arg(short, long)]
    key: Option<String>,

    /// Directory that relative entry paths resolve against
    #[arg(short = 'd', long, value_name = "DIR")]
    locales_dir: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Apply --no-color early to disable all color output
    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    // Change to working directory FIRST (before resolving relative paths)
    if let Some(ref workdir) = cli.workdir {
        std::env::set_current_dir(workdir)
            .map_err(|e| anyhow::anyhow!("Cannot enter directory '{}': {}", workdir, e))?;
        debug!(workdir = %workdir, "Changed working directory");
    }

    output::init(cli.quiet, cli.output_format);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Apply(ApplyArgs::default()));

    match command {
        Commands::Apply(args) => {
            let mut manifest = load_manifest(cli.manifest.as_deref(), args.key, args.locales_dir)?;
            if args.keep_going {
                manifest.policy = BatchPolicy::KeepGoing;
            }
            if args.backup {
                manifest.backup = true;
            }

            let set = manifest.resolve()?;
            debug!(source = %manifest.source, entries = set.len(), "Patch set resolved");

            let merger = LocaleMerger::new(manifest.merge_options(args.dry_run));
            let report = merger.merge_all_with(&set, output::print_entry);
            output::print_report(&report);
            into_result(report)
        }

        Commands::Set(args) => {
            let value = match (&args.value, &args.value_file) {
                (Some(inline), _) => serde_json::from_str(inline)
                    .map_err(|e| PatchError::Config(format!("--value is not valid JSON: {}", e)))?,
                (None, Some(file)) => config::load_value_file(file)?,
                (None, None) => {
                    return Err(PatchError::Config("--value or --value-file is required".into()).into())
                }
            };

            if args.indent > config::MAX_INDENT {
                return Err(PatchError::Config(format!(
                    "indent {} is larger than {}",
                    args.indent,
                    config::MAX_INDENT
                ))
                .into());
            }

            let merger = LocaleMerger::new(MergeOptions {
                indent: args.indent,
                dry_run: args.dry_run,
                backup: args.backup,
                ..MergeOptions::default()
            });
            let status = match merger.merge_one(&args.file, &args.key, value) {
                Ok(outcome) => EntryStatus::Done(outcome),
                Err(e) => EntryStatus::Failed(e),
            };
            let entry = EntryReport {
                path: args.file,
                status,
            };
            output::print_entry(&entry);

            let report = MergeReport {
                key: args.key,
                dry_run: args.dry_run,
                entries: vec![entry],
            };
            if output::is_json() {
                output::print_report(&report);
            }
            into_result(report)
        }

        Commands::Plan(args) => {
            let manifest = load_manifest(cli.manifest.as_deref(), args.key, args.locales_dir)?;
            let set = manifest.resolve()?;
            output::print_plan(&set, &manifest.source.to_string());
            Ok(())
        }
    }
}

fn load_manifest(
    path: Option<&str>,
    key: Option<String>,
    locales_dir: Option<PathBuf>,
) -> Result<Manifest> {
    let mut manifest = Manifest::load(path).context("Failed to load manifest")?;
    // CLI flags override manifest and environment
    if let Some(key) = key {
        manifest.key = key;
    }
    if locales_dir.is_some() {
        manifest.locales_dir = locales_dir;
    }
    Ok(manifest)
}

/// Turn a finished report into the process result.
fn into_result(report: MergeReport) -> Result<()> {
    let total = report.entries.len();
    let failed = report.failed();
    if failed == 0 {
        return Ok(());
    }
    let exit_code = report.failures().next().map(merge_exit_code).unwrap_or(1);
    Err(PatchError::Batch {
        failed,
        total,
        exit_code,
    }
    .into())
}
