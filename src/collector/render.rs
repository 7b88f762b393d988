//! Exposition-format rendering.
//!
//! Turns one endpoint's queue status document into `name{labels} value`
//! lines for a pull-based scraper. Keys and urls are inserted as-is; the
//! fetcher and url loading already guarantee their shape.

use serde_json::Value;

use super::fetcher::QueueStats;

/// Prefix applied to every exported metric name.
pub const METRIC_PREFIX: &str = "gradle_ingest_queue_";

/// Render one endpoint's queue stats as exposition lines.
///
/// One line per key, in document order:
/// `gradle_ingest_queue_<key>{url="<url>"} <value>`. An empty document
/// renders to an empty string.
pub fn render_queue_stats(stats: &QueueStats, url: &str) -> String {
    let mut out = String::new();
    for (key, value) in stats {
        out.push_str(&format!(
            "{METRIC_PREFIX}{key}{{url=\"{url}\"}} {}\n",
            format_value(value)
        ));
    }
    out
}

/// Numbers keep their decoded text; strings are emitted bare; anything else
/// falls back to its JSON text.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
