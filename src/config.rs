//! Fixed thresholds and per-run settings for the two jobs.
//!
//! Scoring weights and filter thresholds are constants. Only output sizing,
//! probe width and file locations can be changed from the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default cap on the number of records written by `integrate`.
pub const MAX_SOURCES: usize = 1500;
/// Default number of distinct domains taken in the first allocation round.
pub const TARGET_DOMAINS: usize = 1000;
/// Harvested records slower than this are dropped by the strict filter.
pub const MAX_RESPOND_TIME_MS: f64 = 10_000.0;
/// Records scoring below this (without bonus) are dropped.
pub const MIN_SCORE: u32 = 25;
/// Trust bonus for records already present in the existing collection.
pub const EXISTING_BONUS: u32 = 5;

/// Default number of probe requests in flight.
pub const PROBE_CONCURRENCY: usize = 30;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const PROBE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36";
/// Log probe progress every this many completed requests.
pub const PROBE_PROGRESS_EVERY: usize = 100;

pub const EXISTING_PATH: &str = "sources/legado/full.json";
pub const HARVESTED_PATH: &str = "sources/legado/yiove_new.json";
pub const INTEGRATE_BACKUP_PATH: &str = "sources/legado/full.backup.json";
pub const FILTER_BACKUP_PATH: &str = "sources/legado/full_before_adult_clean.json";
pub const REMOVED_PATH: &str = "sources/legado/removed_adult_sources.json";

/// Settings for one `integrate` run.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrateConfig {
    pub root: PathBuf,
    pub validate: bool,
    pub max_sources: usize,
    pub target_domains: usize,
    pub concurrency: usize,
}

impl Default for IntegrateConfig {
    fn default() -> Self {
        IntegrateConfig {
            root: PathBuf::from("."),
            validate: false,
            max_sources: MAX_SOURCES,
            target_domains: TARGET_DOMAINS,
            concurrency: PROBE_CONCURRENCY,
        }
    }
}

impl IntegrateConfig {
    pub fn existing_path(&self) -> PathBuf {
        self.root.join(EXISTING_PATH)
    }

    pub fn harvested_path(&self) -> PathBuf {
        self.root.join(HARVESTED_PATH)
    }

    /// The merged result replaces the existing collection.
    pub fn output_path(&self) -> PathBuf {
        self.existing_path()
    }

    pub fn backup_path(&self) -> PathBuf {
        self.root.join(INTEGRATE_BACKUP_PATH)
    }
}

/// Settings for one `filter` run. Relative paths resolve against `root`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub root: PathBuf,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub backup: PathBuf,
    pub removed: PathBuf,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            root: PathBuf::from("."),
            input: PathBuf::from(EXISTING_PATH),
            output: None,
            backup: PathBuf::from(FILTER_BACKUP_PATH),
            removed: PathBuf::from(REMOVED_PATH),
        }
    }
}

impl FilterConfig {
    pub fn input_path(&self) -> PathBuf {
        self.resolve(&self.input)
    }

    /// Defaults to overwriting the input.
    pub fn output_path(&self) -> PathBuf {
        self.resolve(self.output.as_deref().unwrap_or(&self.input))
    }

    pub fn backup_path(&self) -> PathBuf {
        self.resolve(&self.backup)
    }

    pub fn removed_path(&self) -> PathBuf {
        self.resolve(&self.removed)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        // Path::join keeps absolute paths as-is
        self.root.join(path)
    }
}
