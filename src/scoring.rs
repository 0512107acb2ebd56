//! Quality scoring and structural eligibility for book sources.
//!
//! The score is a pure function of the record, the current time and a trust
//! bonus supplied by the caller. Point budget without bonus:
//!
//! | factor | points |
//! |--------|--------|
//! | enabled / explore enabled | 5 + 2 |
//! | respond time | 0-15 |
//! | rule completeness | 0-20 |
//! | recency of last update | 0-10 |
//! | manual weight | 0-5 |
//!
//! for a maximum of 60.

use crate::config::{MAX_RESPOND_TIME_MS, MIN_SCORE};
use crate::models::{BookSource, RemovalReason};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Compute the quality score of `source` as of `now_ms` (epoch milliseconds).
///
/// # Arguments
///
/// * `source` - The record to score
/// * `bonus` - Extra points added on top (the trust bonus for existing records)
/// * `now_ms` - Reference time for the recency component
///
/// # Returns
///
/// The sum of the component points plus `bonus`; never negative.
pub fn quality_score(source: &BookSource, bonus: u32, now_ms: i64) -> u32 {
    bonus
        + status_points(source)
        + respond_time_points(source.respond_time_ms())
        + rule_points(source)
        + recency_points(source.last_update_time_ms(), now_ms)
        + weight_points(source.weight())
}

fn status_points(source: &BookSource) -> u32 {
    let mut points = 0;
    if source.is_enabled() {
        points += 5;
    }
    if source.is_explore_enabled() {
        points += 2;
    }
    points
}

fn respond_time_points(respond_time_ms: f64) -> u32 {
    if respond_time_ms < 1000.0 {
        15
    } else if respond_time_ms < 3000.0 {
        12
    } else if respond_time_ms < 5000.0 {
        8
    } else if respond_time_ms < 10_000.0 {
        4
    } else {
        0
    }
}

fn rule_points(source: &BookSource) -> u32 {
    [
        (source.has_search_url(), 4),
        (source.has_search_rule(), 4),
        (source.has_toc_rule(), 4),
        (source.has_content_rule(), 6),
        (source.has_explore_url(), 2),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, points)| points)
    .sum()
}

fn recency_points(last_update_ms: f64, now_ms: i64) -> u32 {
    if last_update_ms == 0.0 {
        return 0;
    }
    // clock skew can put the update in the future
    let days = ((now_ms as f64 - last_update_ms) / MS_PER_DAY).max(0.0);
    if days < 30.0 {
        10
    } else if days < 90.0 {
        7
    } else if days < 180.0 {
        4
    } else if days < 365.0 {
        2
    } else {
        0
    }
}

fn weight_points(weight: f64) -> u32 {
    (weight / 100.0).floor().clamp(0.0, 5.0) as u32
}

/// How strictly [`passes_filter`] treats respond time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Harvested input: slow records are dropped.
    Strict,
    /// Previously vetted input: the respond time ceiling is waived.
    Lenient,
}

/// Reason a record can never be used, independent of scoring.
pub fn ineligibility(source: &BookSource) -> Option<RemovalReason> {
    if !source.is_supported_type() {
        Some(RemovalReason::UnsupportedType)
    } else if !source.has_search_url() || !source.has_content_rule() {
        Some(RemovalReason::MissingRules)
    } else {
        None
    }
}

/// Structural and minimum-quality filter applied before merging.
pub fn passes_filter(source: &BookSource, mode: FilterMode, now_ms: i64) -> bool {
    if ineligibility(source).is_some() {
        return false;
    }
    if mode == FilterMode::Strict && source.respond_time_ms() > MAX_RESPOND_TIME_MS {
        return false;
    }
    quality_score(source, 0, now_ms) >= MIN_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const NOW: i64 = 1_760_000_000_000;
    const DAY: i64 = 86_400_000;

    fn source(value: Value) -> BookSource {
        BookSource::from_value(value).unwrap()
    }

    fn complete(respond_time: i64) -> BookSource {
        source(json!({
            "bookSourceName": "完整书源",
            "bookSourceUrl": "https://full.example.com",
            "enabled": true,
            "enabledExplore": true,
            "respondTime": respond_time,
            "searchUrl": "/search?q={{key}}",
            "ruleSearch": {"bookList": "$.list"},
            "ruleToc": {"chapterList": "$.chapters"},
            "ruleContent": {"content": "$.text"},
            "exploreUrl": "/explore",
            "lastUpdateTime": NOW,
            "weight": 500,
        }))
    }

    #[test]
    fn test_maximum_score_is_sixty() {
        assert_eq!(quality_score(&complete(500), 0, NOW), 60);
        assert_eq!(quality_score(&complete(500), 5, NOW), 65);
    }

    #[test]
    fn test_empty_record_gets_enabled_points_only() {
        assert_eq!(quality_score(&source(json!({})), 0, NOW), 5);
    }

    #[test]
    fn test_respond_time_bands() {
        assert_eq!(respond_time_points(999.0), 15);
        assert_eq!(respond_time_points(1000.0), 12);
        assert_eq!(respond_time_points(2999.0), 12);
        assert_eq!(respond_time_points(4999.0), 8);
        assert_eq!(respond_time_points(9999.0), 4);
        assert_eq!(respond_time_points(10_000.0), 0);
        assert_eq!(respond_time_points(99_999.0), 0);
    }

    #[test]
    fn test_score_monotonic_in_respond_time() {
        let times = [0, 500, 1000, 2500, 3000, 4000, 5000, 9000, 10_000, 50_000];
        for pair in times.windows(2) {
            let faster = quality_score(&complete(pair[0]), 0, NOW);
            let slower = quality_score(&complete(pair[1]), 0, NOW);
            assert!(faster >= slower, "{} ms scored below {} ms", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_recency_bands() {
        assert_eq!(recency_points(0.0, NOW), 0);
        assert_eq!(recency_points((NOW - 29 * DAY) as f64, NOW), 10);
        assert_eq!(recency_points((NOW - 30 * DAY) as f64, NOW), 7);
        assert_eq!(recency_points((NOW - 100 * DAY) as f64, NOW), 4);
        assert_eq!(recency_points((NOW - 200 * DAY) as f64, NOW), 2);
        assert_eq!(recency_points((NOW - 400 * DAY) as f64, NOW), 0);
    }

    #[test]
    fn test_future_update_counts_as_fresh() {
        assert_eq!(recency_points((NOW + 10 * DAY) as f64, NOW), 10);
    }

    #[test]
    fn test_weight_points() {
        assert_eq!(weight_points(0.0), 0);
        assert_eq!(weight_points(99.0), 0);
        assert_eq!(weight_points(250.0), 2);
        assert_eq!(weight_points(10_000.0), 5);
        assert_eq!(weight_points(-300.0), 0);
    }

    #[test]
    fn test_type_one_is_excluded() {
        let mut map = complete(500).as_map().clone();
        map.insert("bookSourceType".into(), json!(1));
        let s = BookSource::from_map(map);
        assert_eq!(ineligibility(&s), Some(RemovalReason::UnsupportedType));
        assert!(!passes_filter(&s, FilterMode::Lenient, NOW));
    }

    #[test]
    fn test_missing_content_rule_is_excluded() {
        let mut map = complete(500).as_map().clone();
        map.remove("ruleContent");
        let s = BookSource::from_map(map.clone());
        assert_eq!(ineligibility(&s), Some(RemovalReason::MissingRules));
        assert!(!passes_filter(&s, FilterMode::Lenient, NOW));

        map.insert("contentRule".into(), json!({"content": "$.text"}));
        let aliased = BookSource::from_map(map);
        assert_eq!(ineligibility(&aliased), None);
        assert!(passes_filter(&aliased, FilterMode::Lenient, NOW));
    }

    #[test]
    fn test_strict_mode_enforces_respond_time_ceiling() {
        let slow = complete(12_000);
        assert!(!passes_filter(&slow, FilterMode::Strict, NOW));
        assert!(passes_filter(&slow, FilterMode::Lenient, NOW));
        // the ceiling itself is allowed
        assert!(passes_filter(&complete(10_000), FilterMode::Strict, NOW));
    }

    #[test]
    fn test_minimum_score() {
        // 5 + 4 + 6 = 15, below the minimum
        let bare = source(json!({
            "searchUrl": "/s",
            "ruleContent": {"content": "$.text"},
        }));
        assert_eq!(quality_score(&bare, 0, NOW), 15);
        assert!(!passes_filter(&bare, FilterMode::Lenient, NOW));
    }
}
