//! Command-line interface definitions for Source Curator.
//!
//! This module defines the subcommands and their options using the `clap`
//! crate. Scoring weights and filter thresholds are fixed; the flags only
//! choose files, output size and probe behavior.

use clap::{Args, Parser, Subcommand};
use source_curator::config::{
    EXISTING_PATH, FILTER_BACKUP_PATH, FilterConfig, IntegrateConfig, MAX_SOURCES,
    PROBE_CONCURRENCY, REMOVED_PATH, TARGET_DOMAINS,
};
use std::path::PathBuf;

/// Command-line arguments for the Source Curator application.
///
/// # Examples
///
/// ```sh
/// # Drop disallowed sources from sources/legado/full.json in place
/// source_curator filter
///
/// # Merge the harvested set into the existing one
/// source_curator integrate --max 1200 --domains 800
///
/// # Same, probing every endpoint first
/// source_curator integrate -v
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove disallowed and unusable sources, writing a removal audit log
    Filter(FilterArgs),
    /// Merge existing and harvested sources into a scored, deduplicated set
    Integrate(IntegrateArgs),
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Base directory that relative paths resolve against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Collection to filter
    #[arg(short, long, default_value = EXISTING_PATH)]
    pub input: PathBuf,

    /// Where to write the filtered collection (defaults to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy of the input taken before filtering
    #[arg(long, default_value = FILTER_BACKUP_PATH)]
    pub backup: PathBuf,

    /// Removal audit log
    #[arg(long, default_value = REMOVED_PATH)]
    pub removed: PathBuf,
}

#[derive(Args, Debug)]
pub struct IntegrateArgs {
    /// Base directory holding sources/legado/
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Probe every selected endpoint and drop the ones that do not answer
    #[arg(short, long)]
    pub validate: bool,

    /// Maximum number of sources to write
    #[arg(short, long, default_value_t = MAX_SOURCES)]
    pub max: usize,

    /// Number of distinct domains to take before a second source per domain
    #[arg(short, long, default_value_t = TARGET_DOMAINS)]
    pub domains: usize,

    /// Probe requests in flight at once
    #[arg(long, default_value_t = PROBE_CONCURRENCY)]
    pub concurrency: usize,
}

impl From<FilterArgs> for FilterConfig {
    fn from(args: FilterArgs) -> Self {
        FilterConfig {
            root: args.root,
            input: args.input,
            output: args.output,
            backup: args.backup,
            removed: args.removed,
        }
    }
}

impl From<IntegrateArgs> for IntegrateConfig {
    fn from(args: IntegrateArgs) -> Self {
        IntegrateConfig {
            root: args.root,
            validate: args.validate,
            max_sources: args.max,
            target_domains: args.domains,
            concurrency: args.concurrency,
        }
    }
}
