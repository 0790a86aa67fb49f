//! CSV audit trail for batch deduplication runs.
//!
//! Every run appends one `summary` row plus one row per removed name,
//! skipped record and merge decision, all tagged with the same run id.
//! Catalog entries that could not be decoded at all are logged as `skipped`
//! rows too, keyed by their position in the catalog file.

use crate::batch::DedupOutcome;
use crate::catalog::SkippedEntry;
use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::Path;
use uuid::Uuid;

/// A row in the audit CSV
#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct AuditRow {
    pub run_id: String,
    pub recorded_at: String,
    pub kind: String,
    pub value: String,
}

fn rows_for(
    outcome: &DedupOutcome,
    undecoded: &[SkippedEntry],
    run_id: Uuid,
    at: DateTime<Utc>,
) -> Vec<AuditRow> {
    let run_id = run_id.to_string();
    let recorded_at = at.to_rfc3339();
    let row = |kind: &str, value: String| AuditRow {
        run_id: run_id.clone(),
        recorded_at: recorded_at.clone(),
        kind: kind.to_string(),
        value,
    };

    let mut rows = vec![row(
        "summary",
        format!(
            "original={} unique={}",
            outcome.original_count, outcome.unique_count
        ),
    )];
    rows.extend(outcome.removed_names.iter().map(|n| row("removed", n.clone())));
    rows.extend(outcome.skipped_ids.iter().map(|id| row("skipped", id.clone())));
    rows.extend(undecoded.iter().map(|e| {
        let value = match &e.name {
            Some(name) => format!("entry {} ({}): {}", e.position, name, e.reason),
            None => format!("entry {}: {}", e.position, e.reason),
        };
        row("skipped", value)
    }));
    rows.extend(outcome.merges.iter().map(|m| {
        row(
            "merged",
            format!("{} -> {} ({:?})", m.dropped_id, m.kept_id, m.rule),
        )
    }));
    rows
}

/// Append the outcome of one dedup run to the audit CSV
///
/// `undecoded` are the catalog entries the loader had to skip. Creates the
/// file with headers if needed, holds an exclusive lock while writing and
/// syncs before returning. Returns the run id.
pub fn append_audit(
    path: &Path,
    outcome: &DedupOutcome,
    undecoded: &[SkippedEntry],
) -> Result<Uuid> {
    let run_id = Uuid::new_v4();
    let rows = rows_for(outcome, undecoded, run_id, Utc::now());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    // Only a fresh file gets headers
    let needs_headers = file.metadata()?.len() == 0;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(&file);

    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    drop(writer);

    file.sync_all()?;
    file.unlock()?;

    tracing::info!("Appended {} audit rows for run {} to {:?}", rows.len(), run_id, path);
    Ok(run_id)
}
