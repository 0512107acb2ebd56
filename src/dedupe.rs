//! URL normalization and domain-diverse deduplication.
//!
//! Selection runs in three steps over records that already carry a score:
//!
//! 1. **URL identity**: records whose normalized URLs are equal are the same
//!    source; the highest score wins and ties keep the first seen.
//! 2. **Breadth**: domains are ranked by their best record and the best record
//!    of each domain is taken until the target domain count is reached.
//! 3. **Depth**: the second-best record of every domain that has one competes
//!    on score for whatever capacity is left.
//!
//! All sorts are stable, so equal scores keep input order. The returned order
//! is breadth picks followed by depth picks; callers sort by score afterwards.

use crate::models::Scored;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use url::Url;

static TRAILING_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\S*$").expect("fragment pattern is valid"));

/// Canonical dedup key for a source URL.
///
/// Drops a trailing `#...` fragment and trailing slashes, and upgrades an
/// `http://` scheme to `https://`. Normalizing twice gives the same result.
pub fn normalize_url(url: &str) -> String {
    let without_fragment = TRAILING_FRAGMENT.replace(url, "");
    let trimmed = without_fragment.trim_end_matches('/');
    match trimmed.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") => {
            format!("https://{}", &trimmed[7..])
        }
        _ => trimmed.to_string(),
    }
}

/// Network authority (`host[:port]`) of a raw URL.
///
/// The host is in its parsed form: lowercased, punycode for IDN hosts, no
/// userinfo, and no port when it is the scheme default.
///
/// Falls back to the URL itself when it cannot be parsed or has no host, so the
/// record still lands in a group of its own.
pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed.host_str().map(|host| match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            })
        })
        .unwrap_or_else(|| url.to_string())
}

/// Keep the best-scoring record per normalized URL. Records without a URL are
/// dropped. Output follows the first appearance of each URL.
pub fn dedupe_by_url(sources: Vec<Scored>) -> Vec<Scored> {
    let mut kept: Vec<Scored> = Vec::new();
    let mut slot_of: HashMap<String, usize> = HashMap::new();

    for item in sources {
        let key = normalize_url(item.source.url());
        if key.is_empty() {
            continue;
        }
        match slot_of.get(&key) {
            Some(&slot) => {
                if item.score > kept[slot].score {
                    kept[slot] = item;
                }
            }
            None => {
                slot_of.insert(key, kept.len());
                kept.push(item);
            }
        }
    }
    kept
}

#[derive(Debug)]
struct DomainGroup {
    domain: String,
    /// Sorted by descending score, never empty.
    members: Vec<Scored>,
}

impl DomainGroup {
    fn top_score(&self) -> u32 {
        self.members.first().map_or(0, |m| m.score)
    }
}

/// Group by domain in first-seen order with members sorted best first.
fn group_by_domain(sources: Vec<Scored>) -> Vec<DomainGroup> {
    let mut groups: Vec<DomainGroup> = Vec::new();
    let mut slot_of: HashMap<String, usize> = HashMap::new();

    for item in sources {
        let domain = domain_of(item.source.url());
        match slot_of.get(&domain) {
            Some(&slot) => groups[slot].members.push(item),
            None => {
                slot_of.insert(domain.clone(), groups.len());
                groups.push(DomainGroup {
                    domain,
                    members: vec![item],
                });
            }
        }
    }

    for group in &mut groups {
        group.members.sort_by(|a, b| b.score.cmp(&a.score));
    }
    groups
}

/// Deduplicate and pick a bounded, domain-diverse subset.
///
/// At most `target_domains` records come from the breadth round; the depth
/// round only fills up to `max_sources` in total.
///
/// # Arguments
///
/// * `sources` - Scored records in tie-break order
/// * `target_domains` - Number of domains that contribute their best record
/// * `max_sources` - Capacity the second-best records may fill up to
///
/// # Returns
///
/// Breadth picks in domain rank order, followed by the depth picks in
/// descending score order. Equal scores keep their input order.
#[instrument(level = "info", skip(sources), fields(input = sources.len()))]
pub fn select_diverse(sources: Vec<Scored>, target_domains: usize, max_sources: usize) -> Vec<Scored> {
    let unique = dedupe_by_url(sources);
    info!(count = unique.len(), "After URL dedupe");

    let mut groups = group_by_domain(unique);
    groups.sort_by(|a, b| b.top_score().cmp(&a.top_score()));

    let mut selected = Vec::new();
    let mut runners_up = Vec::new();
    for (rank, group) in groups.into_iter().enumerate() {
        debug!(rank, domain = %group.domain, size = group.members.len(), "Ranked domain");
        let mut members = group.members.into_iter();
        let best = members.next();
        if rank < target_domains {
            selected.extend(best);
        }
        runners_up.extend(members.next());
    }
    let domains_used = selected.len();
    info!(count = selected.len(), domains = domains_used, "Round 1 (one per domain)");

    let remaining = max_sources.saturating_sub(selected.len());
    if remaining > 0 {
        runners_up.sort_by(|a, b| b.score.cmp(&a.score));
        selected.extend(runners_up.into_iter().take(remaining));
    }
    info!(count = selected.len(), domains = domains_used, "Round 2 (second per domain)");

    selected
}
