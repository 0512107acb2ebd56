//! Content filter job.
//!
//! Removes records whose display name violates the content policy, plus
//! records that can never be used (unsupported type, no search entry point or
//! no content rule). The original file is backed up before the filtered
//! collection is written, and every removal is recorded in an audit file with
//! the record's name, URL and a fixed reason string.

use crate::config::FilterConfig;
use crate::error::Result;
use crate::models::{BookSource, RemovalReason, RemovedSource};
use crate::policy::ContentPolicy;
use crate::scoring::ineligibility;
use crate::storage::{backup_file, load_sources, save_json};
use crate::utils::truncate_for_log;
use tracing::{info, instrument};

/// Records split into those that stay and the audit entries for those that go.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub kept: Vec<BookSource>,
    pub removed: Vec<RemovedSource>,
}

/// Counts reported after a filter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    pub original: usize,
    pub kept: usize,
    pub removed: usize,
}

/// Why `source` must be removed, if at all. The content policy is checked
/// before structural eligibility.
pub fn removal_reason(source: &BookSource, policy: &ContentPolicy) -> Option<RemovalReason> {
    if policy.is_disallowed(source.name()) {
        Some(RemovalReason::AdultContent)
    } else {
        ineligibility(source)
    }
}

/// Partition a collection, preserving the input order of kept records.
pub fn partition(sources: Vec<BookSource>, policy: &ContentPolicy) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for source in sources {
        match removal_reason(&source, policy) {
            Some(reason) => outcome.removed.push(RemovedSource::new(&source, reason)),
            None => outcome.kept.push(source),
        }
    }
    outcome
}

/// Run the filter job end to end.
///
/// Nothing is written when the input is missing or unparseable.
#[instrument(level = "info", skip_all, fields(input = %config.input_path().display()))]
pub async fn run(config: &FilterConfig) -> Result<FilterReport> {
    let input = config.input_path();
    let sources = load_sources(&input).await?;
    let original = sources.len();

    backup_file(&input, &config.backup_path()).await?;

    let FilterOutcome { kept, removed } = partition(sources, &ContentPolicy::default());
    save_json(&config.output_path(), &kept).await?;

    for (i, entry) in removed.iter().enumerate() {
        info!(
            "{:2}. {} - {} ({})",
            i + 1,
            entry.name,
            truncate_for_log(&entry.url, 120),
            entry.reason.as_str()
        );
    }
    save_json(&config.removed_path(), &removed).await?;

    let report = FilterReport {
        original,
        kept: kept.len(),
        removed: removed.len(),
    };
    info!(
        original = report.original,
        kept = report.kept,
        removed = report.removed,
        audit = %config.removed_path().display(),
        "Filter complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurateError;
    use crate::utils::now_millis;
    use serde_json::{Value, json};
    use std::path::PathBuf;

    fn valid(name: &str, url: &str) -> Value {
        json!({
            "bookSourceName": name,
            "bookSourceUrl": url,
            "bookSourceType": 0,
            "enabled": true,
            "enabledExplore": true,
            "respondTime": 500,
            "searchUrl": "/search?key={{key}}",
            "ruleSearch": {"bookList": "$.list"},
            "ruleToc": {"chapterList": "$.chapters"},
            "ruleContent": {"content": "$.text"},
            "exploreUrl": "/explore",
            "lastUpdateTime": now_millis(),
            "weight": 300,
        })
    }

    fn source(value: Value) -> BookSource {
        BookSource::from_value(value).unwrap()
    }

    #[test]
    fn test_removal_reasons() {
        let policy = ContentPolicy::default();
        assert_eq!(removal_reason(&source(valid("笔趣阁", "https://a.com")), &policy), None);
        assert_eq!(
            removal_reason(&source(valid("成人书库", "https://b.com")), &policy),
            Some(RemovalReason::AdultContent)
        );

        let mut unsupported = valid("漫画站", "https://c.com");
        unsupported["bookSourceType"] = json!(2);
        assert_eq!(
            removal_reason(&source(unsupported), &policy),
            Some(RemovalReason::UnsupportedType)
        );

        let mut no_search = valid("书库", "https://d.com");
        no_search["searchUrl"] = json!("");
        assert_eq!(
            removal_reason(&source(no_search), &policy),
            Some(RemovalReason::MissingRules)
        );
    }

    #[test]
    fn test_policy_reason_wins_over_structure() {
        let mut both = valid("色文小站", "https://e.com");
        both["bookSourceType"] = json!(1);
        assert_eq!(
            removal_reason(&source(both), &ContentPolicy::default()),
            Some(RemovalReason::AdultContent)
        );
    }

    #[test]
    fn test_partition_keeps_order() {
        let sources = vec![
            source(valid("甲", "https://1.com")),
            source(valid("淫书", "https://2.com")),
            source(valid("乙", "https://3.com")),
        ];
        let outcome = partition(sources, &ContentPolicy::default());
        let names: Vec<_> = outcome.kept.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["甲", "乙"]);
        assert_eq!(outcome.removed.len(), 1);
    }

    fn config_in(root: &std::path::Path) -> FilterConfig {
        FilterConfig {
            root: root.to_path_buf(),
            ..FilterConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let input = config.input_path();
        std::fs::create_dir_all(input.parent().unwrap()).unwrap();

        let mut comic = valid("动漫之家", "https://comic.example.com");
        comic["bookSourceType"] = json!(1);
        let collection = json!([
            comic,
            valid("PO18文学", "https://po.example.com"),
            valid("起点中文网", "https://qd.example.com"),
        ]);
        let original_text = serde_json::to_string_pretty(&collection).unwrap();
        std::fs::write(&input, &original_text).unwrap();

        let report = run(&config).await.unwrap();
        assert_eq!(
            report,
            FilterReport {
                original: 3,
                kept: 1,
                removed: 2
            }
        );

        let output: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(config.output_path()).unwrap()).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0]["bookSourceName"], "起点中文网");

        let audit: Vec<RemovedSource> =
            serde_json::from_str(&std::fs::read_to_string(config.removed_path()).unwrap()).unwrap();
        assert_eq!(
            audit,
            vec![
                RemovedSource {
                    name: "动漫之家".to_string(),
                    url: "https://comic.example.com".to_string(),
                    reason: RemovalReason::UnsupportedType,
                },
                RemovedSource {
                    name: "PO18文学".to_string(),
                    url: "https://po.example.com".to_string(),
                    reason: RemovalReason::AdultContent,
                },
            ]
        );

        assert_eq!(
            std::fs::read_to_string(config.backup_path()).unwrap(),
            original_text
        );
    }

    #[tokio::test]
    async fn test_run_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, CurateError::MissingInput(_)));
        assert!(!config.backup_path().exists());
        assert!(!config.removed_path().exists());
    }

    #[tokio::test]
    async fn test_run_separate_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = FilterConfig {
            root: dir.path().to_path_buf(),
            input: PathBuf::from("in.json"),
            output: Some(PathBuf::from("out/clean.json")),
            backup: PathBuf::from("in.bak.json"),
            removed: PathBuf::from("removed.json"),
        };
        let original = serde_json::to_string(&json!([valid("书海", "https://sh.com")])).unwrap();
        std::fs::write(config.input_path(), &original).unwrap();

        run(&config).await.unwrap();
        assert_eq!(std::fs::read_to_string(config.input_path()).unwrap(), original);
        assert!(dir.path().join("out/clean.json").exists());
        assert_eq!(std::fs::read_to_string(config.removed_path()).unwrap(), "[]");
    }
}
