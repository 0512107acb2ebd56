//! Integrator job: merge an existing trusted collection with a harvested one.
//!
//! # Pipeline
//!
//! 1. **Filter**: strict for harvested records (respond time ceiling applies),
//!    lenient for existing ones (ceiling waived)
//! 2. **Clean**: strip decorative symbols from names and groups
//! 3. **Score**: existing records get the trust bonus, harvested ones do not
//! 4. **Select**: URL dedupe and domain-diverse selection over existing ++ harvested
//! 5. **Probe** (optional): drop records whose endpoint does not answer
//! 6. **Rank**: stable sort by descending score and truncate
//! 7. **Write**: back up the previous output, then overwrite it

use crate::config::{EXISTING_BONUS, IntegrateConfig, PROBE_TIMEOUT};
use crate::dedupe::select_diverse;
use crate::error::Result;
use crate::models::{BookSource, Scored};
use crate::probe::{HeadCheck, LivenessCheck, filter_live};
use crate::scoring::{FilterMode, passes_filter, quality_score};
use crate::storage::{backup_file, load_sources, save_json};
use crate::utils::{clean_source, now_millis};
use itertools::Itertools;
use std::time::Instant;
use tracing::{info, instrument};

/// Output counts per score band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreDistribution {
    /// 50 and above
    pub top: usize,
    /// 40-49
    pub high: usize,
    /// 30-39
    pub mid: usize,
    /// 25-29
    pub low: usize,
}

impl ScoreDistribution {
    pub fn from_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        let mut dist = ScoreDistribution::default();
        for score in scores {
            match score {
                50.. => dist.top += 1,
                40..=49 => dist.high += 1,
                30..=39 => dist.mid += 1,
                25..=29 => dist.low += 1,
                _ => {}
            }
        }
        dist
    }
}

/// Counts reported after an integrate run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub existing_total: usize,
    pub existing_kept: usize,
    pub harvested_total: usize,
    pub harvested_kept: usize,
    pub selected: usize,
    pub live: Option<usize>,
    pub written: usize,
    pub distribution: ScoreDistribution,
}

/// Filter, clean and score one input collection.
pub fn prepare(sources: Vec<BookSource>, mode: FilterMode, bonus: u32, now_ms: i64) -> Vec<Scored> {
    sources
        .into_iter()
        .filter(|s| passes_filter(s, mode, now_ms))
        .map(clean_source)
        .map(|s| {
            let score = quality_score(&s, bonus, now_ms);
            Scored::new(s, score)
        })
        .collect()
}

/// Stable sort by descending score, then keep the first `max_sources`.
pub fn rank(mut sources: Vec<Scored>, max_sources: usize) -> Vec<Scored> {
    sources.sort_by(|a, b| b.score.cmp(&a.score));
    sources.truncate(max_sources);
    sources
}

/// Run the integrate job, building an HTTP probe only when validation is on.
pub async fn run(config: &IntegrateConfig) -> Result<MergeReport> {
    if config.validate {
        let checker = HeadCheck::new(PROBE_TIMEOUT)?;
        run_with(config, Some(&checker)).await
    } else {
        run_with::<HeadCheck>(config, None).await
    }
}

/// Run the integrate job with an explicit liveness check.
///
/// # Arguments
///
/// * `config` - Paths and limits for the run
/// * `checker` - Liveness check to apply after selection, or `None` to skip probing
///
/// # Returns
///
/// A [`MergeReport`] with per-stage counts and the output score distribution.
///
/// # Errors
///
/// Fails before any write when either input is missing or malformed; fails on
/// backup or output write errors.
#[instrument(level = "info", skip_all, fields(root = %config.root.display()))]
pub async fn run_with<C: LivenessCheck>(
    config: &IntegrateConfig,
    checker: Option<&C>,
) -> Result<MergeReport> {
    let t0 = Instant::now();
    let now_ms = now_millis();

    let existing = load_sources(&config.existing_path()).await?;
    let harvested = load_sources(&config.harvested_path()).await?;
    let mut report = MergeReport {
        existing_total: existing.len(),
        harvested_total: harvested.len(),
        ..MergeReport::default()
    };

    let harvested = prepare(harvested, FilterMode::Strict, 0, now_ms);
    info!(kept = harvested.len(), total = report.harvested_total, "Filtered harvested sources");
    let existing = prepare(existing, FilterMode::Lenient, EXISTING_BONUS, now_ms);
    info!(kept = existing.len(), total = report.existing_total, "Filtered existing sources");
    report.existing_kept = existing.len();
    report.harvested_kept = harvested.len();

    let merged: Vec<Scored> = existing.into_iter().chain(harvested).collect();
    info!(count = merged.len(), "Merged before dedupe");

    let mut selected = select_diverse(merged, config.target_domains, config.max_sources);
    report.selected = selected.len();

    if let Some(checker) = checker {
        selected = filter_live(selected, checker, config.concurrency).await;
        report.live = Some(selected.len());
    }

    let final_sources = rank(selected, config.max_sources);
    report.written = final_sources.len();
    report.distribution = ScoreDistribution::from_scores(final_sources.iter().map(|s| s.score));
    info!(
        max = config.max_sources,
        count = report.written,
        top_scores = %final_sources.iter().take(5).map(|s| s.score).join(","),
        "Ranked sources"
    );

    let output = config.output_path();
    if backup_file(&output, &config.backup_path()).await? {
        info!(backup = %config.backup_path().display(), "Previous output backed up");
    }
    let records: Vec<&BookSource> = final_sources.iter().map(|s| &s.source).collect();
    save_json(&output, &records).await?;

    info!(
        existing = report.existing_total,
        existing_kept = report.existing_kept,
        harvested = report.harvested_total,
        harvested_kept = report.harvested_kept,
        deduped = report.selected,
        live = ?report.live,
        written = report.written,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Integrate complete"
    );
    let dist = report.distribution;
    info!(
        "Score distribution: 50+: {}, 40-49: {}, 30-39: {}, 25-29: {}",
        dist.top, dist.high, dist.mid, dist.low
    );

    Ok(report)
}
