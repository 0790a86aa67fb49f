//! Catalog snapshots and the file-backed storage adapter.
//!
//! The dedup core only ever reads an immutable, ordered snapshot. Catalog
//! files are either a JSON array of records or JSON Lines (one record per
//! line). Entries are decoded one at a time so a single corrupt entry is
//! logged and skipped instead of failing the whole load.

use crate::{Error, ExerciseRecord, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// An entry that could not be decoded into an [`ExerciseRecord`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedEntry {
    /// 1-based line (JSON Lines) or array position (JSON array)
    pub position: usize,
    /// The entry's `name` field, when the entry is at least a JSON object
    pub name: Option<String>,
    pub reason: String,
}

impl SkippedEntry {
    fn new(position: usize, raw: Option<&serde_json::Value>, reason: String) -> Self {
        let name = raw
            .and_then(|v| v.get("name"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        Self {
            position,
            name,
            reason,
        }
    }
}

/// Immutable, ordered view of the catalog
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    pub records: Vec<ExerciseRecord>,
    pub skipped: Vec<SkippedEntry>,
}

impl CatalogSnapshot {
    pub fn from_records(records: Vec<ExerciseRecord>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&ExerciseRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Anything that can hand over a catalog snapshot
pub trait CatalogSource {
    fn load(&self) -> Result<CatalogSnapshot>;
}

/// Catalog held in memory (tests, seed data, callers with their own store)
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    records: Vec<ExerciseRecord>,
}

impl InMemoryCatalog {
    pub fn new(records: Vec<ExerciseRecord>) -> Self {
        Self { records }
    }
}

impl CatalogSource for InMemoryCatalog {
    fn load(&self) -> Result<CatalogSnapshot> {
        Ok(CatalogSnapshot::from_records(self.records.clone()))
    }
}

/// Catalog stored as a JSON array or JSON Lines file
#[derive(Clone, Debug)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalogFile {
    fn load(&self) -> Result<CatalogSnapshot> {
        if !self.path.exists() {
            tracing::debug!("No catalog file at {:?}, returning empty snapshot", self.path);
            return Ok(CatalogSnapshot::default());
        }

        // write_catalog replaces the file by rename, so this sees either the
        // old or the new contents
        let contents = std::fs::read_to_string(&self.path)?;

        let snapshot = parse_catalog(&contents)?;
        tracing::info!(
            "Loaded {} catalog records from {:?} ({} skipped)",
            snapshot.records.len(),
            self.path,
            snapshot.skipped.len()
        );
        Ok(snapshot)
    }
}

/// Decode catalog text, skipping entries that fail to decode
pub fn parse_catalog(contents: &str) -> Result<CatalogSnapshot> {
    let mut snapshot = CatalogSnapshot::default();

    if contents.trim_start().starts_with('[') {
        let entries: Vec<serde_json::Value> = serde_json::from_str(contents)
            .map_err(|e| Error::Catalog(format!("catalog array is not valid JSON: {}", e)))?;

        for (idx, entry) in entries.into_iter().enumerate() {
            match ExerciseRecord::deserialize(&entry) {
                Ok(record) => snapshot.records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping catalog entry {}: {}", idx + 1, e);
                    snapshot
                        .skipped
                        .push(SkippedEntry::new(idx + 1, Some(&entry), e.to_string()));
                }
            }
        }
        return Ok(snapshot);
    }

    for (line_num, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ExerciseRecord>(line) {
            Ok(record) => snapshot.records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse catalog record at line {}: {}", line_num + 1, e);
                let raw = serde_json::from_str::<serde_json::Value>(line).ok();
                snapshot
                    .skipped
                    .push(SkippedEntry::new(line_num + 1, raw.as_ref(), e.to_string()));
            }
        }
    }

    Ok(snapshot)
}

/// Atomically replace a catalog file with `records` as a pretty JSON array
///
/// Writes to a temp file in the same directory, syncs it, then renames it
/// over the target. Readers never see a partially written catalog.
pub fn write_catalog(path: &Path, records: &[ExerciseRecord]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {} catalog records to {:?}", records.len(), path);
    Ok(())
}

/// Check a catalog for structural problems the dedup core tolerates but
/// callers should hear about
///
/// Returns a list of problems, or empty Vec if valid.
pub fn validate_catalog(records: &[ExerciseRecord]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (idx, record) in records.iter().enumerate() {
        if record.id.trim().is_empty() {
            errors.push(format!("Record at position {} has empty ID", idx + 1));
        } else if !seen.insert(record.id.as_str()) {
            errors.push(format!("Duplicate record ID '{}'", record.id));
        }

        if record.name.trim().is_empty() {
            errors.push(format!("Record '{}' has empty name", record.id));
        }
    }

    errors
}
