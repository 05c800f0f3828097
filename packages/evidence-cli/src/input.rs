//! Loading RawItems from exported post files.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use claim_evidence::RawItem;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One row of a posts file, before validation.
///
/// Numbers and timestamps arrive as text in whatever shape the exporter
/// produced, so they are parsed leniently here rather than by serde.
#[derive(Debug, Deserialize)]
struct PostRow {
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "selftext")]
    body: Option<String>,
    #[serde(default, alias = "score", deserialize_with = "lenient_text")]
    source_score: Option<String>,
    #[serde(default, alias = "num_comments", deserialize_with = "lenient_text")]
    comment_count: Option<String>,
    #[serde(default, alias = "created_utc", deserialize_with = "lenient_text")]
    created_at: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

/// Accept strings, numbers, or null for a text-valued column.
fn lenient_text<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Loose>::deserialize(d)?.map(|v| match v {
        Loose::Text(s) => s,
        Loose::Number(n) => n.to_string(),
    }))
}

impl PostRow {
    fn into_item(self, fallback_id: usize) -> RawItem {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("row-{}", fallback_id));
        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH);

        RawItem::new(
            id,
            self.title.unwrap_or_default(),
            self.body.unwrap_or_default(),
            created_at,
        )
        .with_score(parse_count(self.source_score.as_deref()))
        .with_comments(parse_count(self.comment_count.as_deref()))
        .with_author(self.author.unwrap_or_default())
    }
}

/// Non-negative count from text such as `12`, `12.0`, or `-3` (clamped to 0).
fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n as u64)
        .unwrap_or(0)
}

/// Parse the timestamp shapes post exporters produce.
///
/// RFC 3339, naive ISO 8601 (taken as UTC), RFC 2822 (RSS `published`),
/// and Unix epoch seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
}

/// Load items from a `.csv`, `.jsonl`, or `.json` (array) file.
pub fn load_items(path: &Path) -> Result<Vec<RawItem>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => read_csv(path)?,
        "jsonl" => read_jsonl(path)?,
        "json" => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<Vec<PostRow>>(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        other => bail!(
            "Unsupported input format '{}' (expected csv, jsonl or json)",
            other
        ),
    };

    let items: Vec<RawItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.into_item(i))
        .collect();

    debug!(path = %path.display(), items = items.len(), "loaded items");
    Ok(items)
}

fn read_csv(path: &Path) -> Result<Vec<PostRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, row) in reader.deserialize::<PostRow>().enumerate() {
        match row {
            Ok(row) => rows.push(row),
            Err(e) => warn!(
                path = %path.display(),
                line = line + 2,
                error = %e,
                "skipping malformed row"
            ),
        }
    }
    Ok(rows)
}

fn read_jsonl(path: &Path) -> Result<Vec<PostRow>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, text) in contents.lines().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PostRow>(text) {
            Ok(row) => rows.push(row),
            Err(e) => warn!(
                path = %path.display(),
                line = line + 1,
                error = %e,
                "skipping malformed line"
            ),
        }
    }
    Ok(rows)
}

/// Latest `posts_*.csv` / `posts_*.jsonl` in `{data_dir}/raw` or `data_dir`.
///
/// Exporters stamp the collection date into the file name, so the greatest
/// file name is the latest export regardless of modification times.
pub fn find_latest_posts_file(data_dir: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();

    for dir in [data_dir.join("raw"), data_dir.to_path_buf()] {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };

        let posts = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_posts_file(path));
        candidates.extend(posts);
    }

    let latest = candidates
        .into_iter()
        .max_by(|a, b| a.file_name().cmp(&b.file_name()));

    match latest {
        Some(path) => Ok(path),
        None => bail!(
            "No posts_*.csv or posts_*.jsonl files in {} (pass --input)",
            data_dir.display()
        ),
    }
}

fn is_posts_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    name.starts_with("posts_") && (name.ends_with(".csv") || name.ends_with(".jsonl"))
}
