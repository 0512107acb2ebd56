//! Data models for book source records and the bookkeeping that travels with them.
//!
//! A [`BookSource`] is kept as the raw JSON object it was read from so that
//! every field the curator does not interpret is written back untouched. The
//! fields that drive filtering and scoring are read through accessors, one per
//! logical field; the accessors are the only place that knows about the
//! legacy/compat alias names.
//!
//! Absent or mistyped fields fall back to defaults rather than failing the
//! record, so one malformed entry never aborts a batch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Respond time assumed when a record carries none.
pub const UNKNOWN_RESPOND_TIME_MS: f64 = 99_999.0;

const NAME: &str = "bookSourceName";
const GROUP: &str = "bookSourceGroup";
const URL: &str = "bookSourceUrl";
const TYPE: &str = "bookSourceType";
const ENABLED: &str = "enabled";
const EXPLORE_ENABLED: [&str; 2] = ["enabledExplore", "exploreEnabled"];
const RESPOND_TIME: &str = "respondTime";
const LAST_UPDATE_TIME: &str = "lastUpdateTime";
const WEIGHT: &str = "weight";
const SEARCH_URL: &str = "searchUrl";
const SEARCH_RULE: [&str; 2] = ["ruleSearch", "searchRule"];
const TOC_RULE: [&str; 2] = ["ruleToc", "tocRule"];
const CONTENT_RULE: [&str; 2] = ["ruleContent", "contentRule"];
const EXPLORE_URL: &str = "exploreUrl";

/// One content-source descriptor as found in a Legado source collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BookSource(Map<String, Value>);

impl BookSource {
    pub fn from_map(map: Map<String, Value>) -> Self {
        BookSource(map)
    }

    /// Build a record from a JSON value, returning `None` for non-objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(BookSource::from_map(map)),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Display name, empty when missing.
    pub fn name(&self) -> &str {
        self.str_field(NAME).unwrap_or_default()
    }

    pub fn group(&self) -> Option<&str> {
        self.str_field(GROUP)
    }

    /// Endpoint URL, empty when missing. Used both as identity and probe target.
    pub fn url(&self) -> &str {
        self.str_field(URL).unwrap_or_default()
    }

    /// Only type 0 is a supported kind. A missing type counts as 0; anything
    /// that is not a number equal to zero is unsupported.
    pub fn is_supported_type(&self) -> bool {
        match self.0.get(TYPE) {
            None => true,
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(_) => false,
        }
    }

    /// Defaults to `true` when the flag is absent.
    pub fn is_enabled(&self) -> bool {
        self.0.get(ENABLED).is_none_or(is_truthy)
    }

    pub fn is_explore_enabled(&self) -> bool {
        self.any_present(&EXPLORE_ENABLED)
    }

    /// Last observed latency in milliseconds.
    pub fn respond_time_ms(&self) -> f64 {
        self.number_field(RESPOND_TIME)
            .unwrap_or(UNKNOWN_RESPOND_TIME_MS)
    }

    /// Epoch milliseconds of the last update, `0` when unknown.
    pub fn last_update_time_ms(&self) -> f64 {
        self.number_field(LAST_UPDATE_TIME).unwrap_or(0.0)
    }

    pub fn weight(&self) -> f64 {
        self.number_field(WEIGHT).unwrap_or(0.0)
    }

    pub fn has_search_url(&self) -> bool {
        self.any_present(&[SEARCH_URL])
    }

    pub fn has_search_rule(&self) -> bool {
        self.any_present(&SEARCH_RULE)
    }

    pub fn has_toc_rule(&self) -> bool {
        self.any_present(&TOC_RULE)
    }

    pub fn has_content_rule(&self) -> bool {
        self.any_present(&CONTENT_RULE)
    }

    pub fn has_explore_url(&self) -> bool {
        self.any_present(&[EXPLORE_URL])
    }

    /// Replace the display name if the record has a string one.
    pub fn set_name(&mut self, name: String) {
        self.replace_str(NAME, name);
    }

    /// Replace the group label if the record has a string one.
    pub fn set_group(&mut self, group: String) {
        self.replace_str(GROUP, group);
    }

    fn replace_str(&mut self, key: &str, value: String) {
        if let Some(Value::String(slot)) = self.0.get_mut(key) {
            *slot = value;
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn number_field(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    fn any_present(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.0.get(*k).is_some_and(is_truthy))
    }
}

/// JSON truthiness: `null`, `false`, zero and empty containers are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// A record paired with the score computed for it during this run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub source: BookSource,
    pub score: u32,
}

impl Scored {
    pub fn new(source: BookSource, score: u32) -> Self {
        Scored { source, score }
    }
}

/// Why the filter job dropped a record. Serialized as a fixed reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RemovalReason {
    #[serde(rename = "含有18禁内容")]
    AdultContent,
    #[serde(rename = "不支持的书源类型")]
    UnsupportedType,
    #[serde(rename = "缺少搜索或正文规则")]
    MissingRules,
}

impl RemovalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalReason::AdultContent => "含有18禁内容",
            RemovalReason::UnsupportedType => "不支持的书源类型",
            RemovalReason::MissingRules => "缺少搜索或正文规则",
        }
    }
}

/// One line of the removal audit log.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RemovedSource {
    pub name: String,
    pub url: String,
    pub reason: RemovalReason,
}

impl RemovedSource {
    pub fn new(source: &BookSource, reason: RemovalReason) -> Self {
        RemovedSource {
            name: source.name().to_string(),
            url: source.url().to_string(),
            reason,
        }
    }
}
