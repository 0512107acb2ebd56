//! Utility functions for text cleaning, logging and file system preparation.
//!
//! This module provides helper functions used throughout the application:
//! - Stripping emoji and decorative symbol runs from display labels
//! - String truncation for log output
//! - The current time in epoch milliseconds for recency scoring
//! - Parent directory creation before writing output files

use crate::error::{CurateError, Result};
use crate::models::BookSource;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Emoji, dingbats, misc technical symbols, variation selectors and ZWJ.
static DECORATION_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "[",
        "\u{1F300}-\u{1F9FF}",
        "\u{2600}-\u{27BF}",
        "\u{1FA00}-\u{1FAFF}",
        "\u{2300}-\u{23FF}",
        "\u{2B50}-\u{2B55}",
        "\u{FE00}-\u{FE0F}",
        "\u{200D}",
        "]+",
    ))
    .expect("decoration pattern is valid")
});

/// Remove decorative symbol runs and surrounding whitespace from a label.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_decorations("📚 笔趣阁 ✨"), "笔趣阁");
/// ```
pub fn strip_decorations(text: &str) -> String {
    DECORATION_RUN.replace_all(text, "").trim().to_string()
}

/// Clean the display name and group label of a record.
///
/// Fields that are missing or not strings are left alone.
pub fn clean_source(mut source: BookSource) -> BookSource {
    let name = strip_decorations(source.name());
    source.set_name(name);
    if let Some(group) = source.group().map(strip_decorations) {
        source.set_group(group);
    }
    source
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped characters appended. Counting characters rather than bytes keeps
/// the cut on a UTF-8 boundary for CJK names.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}…(+{} chars)", head, total - max)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Make sure the directory that will hold `path` exists.
///
/// # Errors
///
/// Returns [`CurateError::Io`] if the directory cannot be created.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CurateError::io(parent, e))?;
            debug!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_decorations() {
        assert_eq!(strip_decorations("📚 笔趣阁 ✨"), "笔趣阁");
        assert_eq!(strip_decorations("⭐️精品⭐️小说"), "精品小说");
        assert_eq!(strip_decorations("👨‍👩‍👧书屋"), "书屋");
        assert_eq!(strip_decorations("plain"), "plain");
    }

    #[test]
    fn test_clean_source_touches_only_labels() {
        let source = BookSource::from_value(json!({
            "bookSourceName": "🔥 起点 ",
            "bookSourceGroup": "☀️ 精选",
            "bookSourceUrl": "https://qd.example.com/🔥",
        }))
        .unwrap();
        let cleaned = clean_source(source);
        assert_eq!(cleaned.name(), "起点");
        assert_eq!(cleaned.group(), Some("精选"));
        assert_eq!(cleaned.url(), "https://qd.example.com/🔥");
    }

    #[test]
    fn test_clean_source_without_labels() {
        let source = BookSource::from_value(json!({"bookSourceUrl": "https://a.com"})).unwrap();
        let cleaned = clean_source(source.clone());
        assert_eq!(cleaned, source);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "书".repeat(20);
        let result = truncate_for_log(&s, 5);
        assert!(result.starts_with(&"书".repeat(5)));
        assert!(result.ends_with("…(+15 chars)"));
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c.json");
        ensure_parent_dir(&target).await.unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }
}
