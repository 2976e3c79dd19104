//! Merit list export as fixed-width text or JSON.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use entrance_core::ranking::RankingEntry;

use crate::clip;

/// Output format for the rankings export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingsFormat {
    Text,
    Json,
}

impl RankingsFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RankingsFormat::Text => "txt",
            RankingsFormat::Json => "json",
        }
    }
}

fn status(entry: &RankingEntry, pass_threshold: f64) -> &'static str {
    if entry.passed(pass_threshold) {
        "PASSED"
    } else {
        "FAILED"
    }
}

/// Fixed-width text rendering of the merit list.
pub fn generate_rankings_text(
    entries: &[RankingEntry],
    pass_threshold: f64,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    out.push_str("STUDENT RANKINGS\n");
    out.push_str(&format!(
        "Generated on: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "{:<6} {:<8} {:<30} {:<8} {:<10} {:<15}\n",
        "Rank", "ID", "Name", "Score", "Status", "Registered"
    ));
    out.push_str(&"-".repeat(82));
    out.push('\n');
    for e in entries {
        out.push_str(&format!(
            "{:<6} {:<8} {:<30} {:<8.2} {:<10} {:<15}\n",
            e.rank,
            e.id,
            clip(&e.name, 30),
            e.mark,
            status(e, pass_threshold),
            e.registered_at.with_timezone(&Local).format("%Y-%m-%d")
        ));
    }
    if entries.is_empty() {
        out.push_str("No students have taken the exam.\n");
    }
    out
}

#[derive(Serialize)]
struct RankingsDocument<'a> {
    generated_at: DateTime<Local>,
    pass_threshold: f64,
    count: usize,
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    entry: &'a RankingEntry,
    passed: bool,
}

/// JSON rendering of the merit list.
pub fn generate_rankings_json(
    entries: &[RankingEntry],
    pass_threshold: f64,
    generated_at: DateTime<Local>,
) -> serde_json::Value {
    let doc = RankingsDocument {
        generated_at,
        pass_threshold,
        count: entries.len(),
        entries: entries
            .iter()
            .map(|entry| JsonEntry {
                entry,
                passed: entry.passed(pass_threshold),
            })
            .collect(),
    };
    // Plain structs of numbers and strings always serialize.
    serde_json::to_value(doc).unwrap_or(serde_json::Value::Null)
}

/// Write the merit list to `path` in the given format.
pub fn write_rankings_report(
    entries: &[RankingEntry],
    pass_threshold: f64,
    format: RankingsFormat,
    path: &Path,
) -> Result<()> {
    let now = Local::now();
    let content = match format {
        RankingsFormat::Text => generate_rankings_text(entries, pass_threshold, now),
        RankingsFormat::Json => {
            serde_json::to_string_pretty(&generate_rankings_json(entries, pass_threshold, now))?
        }
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {} ranking entries to {}", entries.len(), path.display());
    Ok(())
}
