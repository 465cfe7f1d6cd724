use crate::types::OutputFormat;
use clap::{Args, Parser};

/// Catalog location and session selection, shared by both binaries.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Root directory of raw sessions (overrides config and
    /// NWBPACK_SOURCE_DIR)
    #[arg(long, value_name = "PATH")]
    pub source_dir: Option<String>,

    /// Root directory of packaged NWB files (overrides config and
    /// NWBPACK_OUTPUT_DIR)
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<String>,

    /// Config file path (default: NWBPACK_CONFIG or the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Animal (or animals, comma-separated) to process
    #[arg(short = 'A', long)]
    pub animal: Option<String>,

    /// Earliest session date to process, in the YYMMDD format
    #[arg(short = 'E', long, value_name = "YYMMDD")]
    pub from_date: Option<String>,

    /// Latest session date to process, in the YYMMDD format
    #[arg(short = 'L', long, value_name = "YYMMDD")]
    pub to_date: Option<String>,

    /// Session type(s), comma-separated: task, resting-state (rest),
    /// sensory-stim (ss)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub session_type: Option<String>,

    #[arg(long, default_value = "plain")]
    pub format: OutputFormat,
}

/// Reconcile raw sessions against packaged NWB files and package whatever
/// is missing or stale.
#[derive(Parser, Debug)]
#[command(name = "package-nwb")]
#[command(about = "Batch-packages experiment sessions into NWB files", long_about = None)]
#[command(version)]
pub struct PackageArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Number of sessions packaged in parallel
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Compute and print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore and overwrite existing up-to-date output files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Suppress per-session progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// List sessions whose NWB file is missing, stale, partial, or orphaned,
/// without writing anything.
#[derive(Parser, Debug)]
#[command(name = "find-missing-nwb")]
#[command(about = "Lists sessions that still need packaging", long_about = None)]
#[command(version)]
pub struct FindMissingArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}
