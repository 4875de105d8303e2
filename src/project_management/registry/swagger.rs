use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::shared::error::BimaError;

/// Query parameter carrying the cache-busting timestamp.
pub const CACHE_BUSTER: &str = "v";

/// One document listed in `swaggers/modules.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwaggerEntry {
    pub name: String,
    pub url: String,
}

impl SwaggerEntry {
    pub fn new(name: &str, document: &str, stamp: i64) -> Self {
        Self {
            name: name.to_string(),
            url: with_cache_buster(document, stamp),
        }
    }

    pub fn cache_buster(&self) -> Option<i64> {
        cache_buster(&self.url)
    }
}

pub fn parse_manifest(content: &str) -> Result<Vec<SwaggerEntry>, BimaError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(content)
        .map_err(|e| BimaError::Validation(format!("Invalid swagger manifest: {}", e)))
}

pub fn render_manifest(entries: &[SwaggerEntry]) -> Result<String, BimaError> {
    serde_json::to_string(entries)
        .map_err(|e| BimaError::Validation(format!("Invalid swagger manifest: {}", e)))
}

fn split_url(raw: &str) -> (&str, &str, Option<&str>) {
    let (rest, fragment) = match raw.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (raw, None),
    };
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    (path, query, fragment)
}

/// Current `v` value of a document URL, if any.
pub fn cache_buster(raw: &str) -> Option<i64> {
    let (_, query, _) = split_url(raw);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == CACHE_BUSTER)
        .and_then(|(_, value)| value.parse().ok())
}

/// Set the `v` query parameter of `raw` to `stamp`. The rest of the query
/// is kept and re-encoded with keys in sorted order.
pub fn with_cache_buster(raw: &str, stamp: i64) -> String {
    let (path, query, fragment) = split_url(raw);

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .filter(|(key, _)| key != CACHE_BUSTER)
        .collect();
    pairs.push((CACHE_BUSTER.to_string(), stamp.to_string()));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .finish();

    match fragment {
        Some(fragment) => format!("{}?{}#{}", path, query, fragment),
        None => format!("{}?{}", path, query),
    }
}

/// A timestamp strictly newer than every cache buster in `entries` and no
/// older than `now`.
pub fn next_stamp(entries: &[SwaggerEntry], now: i64) -> i64 {
    entries
        .iter()
        .filter_map(SwaggerEntry::cache_buster)
        .map(|v| v.saturating_add(1))
        .fold(now, i64::max)
}

/// Drop the entry named `name` and re-stamp every remaining entry.
pub fn remove_and_bust(entries: Vec<SwaggerEntry>, name: &str, now: i64) -> Vec<SwaggerEntry> {
    let stamp = next_stamp(&entries, now);
    entries
        .into_iter()
        .filter(|entry| entry.name != name)
        .map(|entry| SwaggerEntry {
            url: with_cache_buster(&entry.url, stamp),
            name: entry.name,
        })
        .collect()
}
