//! Catalog-wide batch deduplication.
//!
//! A coarser matcher than the pairwise scorer: two names are the
//! same exercise when their normalized forms are equal, when one contains the
//! other, or when both mention a spelling from the same synonym group. The
//! catalog is folded in order into groups, each represented by one winner.
//!
//! Each record is compared against the winners accepted so far. Folding
//! repeats over the winners until a pass merges nothing, so the output is a
//! fixpoint and re-running on it removes nothing further.

use crate::config::BatchConfig;
use crate::normalize::normalize_name;
use crate::ExerciseRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Substring / synonym name matcher used for bulk cleanup
#[derive(Clone, Debug)]
pub struct NameMatcher {
    /// Lowercased variants, one Vec per synonym group
    groups: Vec<Vec<String>>,
}

impl NameMatcher {
    pub fn new(synonyms: &BTreeMap<String, Vec<String>>) -> Self {
        let groups = synonyms
            .values()
            .map(|variants| {
                variants
                    .iter()
                    .map(|v| v.trim().to_lowercase())
                    .filter(|v| !v.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|variants| !variants.is_empty())
            .collect();
        Self { groups }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(&config.synonyms)
    }

    /// Indices of the synonym groups whose spellings appear in `name`
    fn synonym_groups(&self, name: &str) -> HashSet<usize> {
        let lowered = name.to_lowercase();
        let normalized = normalize_name(name);
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, variants)| {
                variants
                    .iter()
                    .any(|v| lowered.contains(v.as_str()) || normalized.contains(v.as_str()))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Batch-mode notion of "same exercise". Blank names never match.
    pub fn are_names_similar(&self, a: &str, b: &str) -> bool {
        let norm_a = normalize_name(a);
        let norm_b = normalize_name(b);
        if norm_a.is_empty() || norm_b.is_empty() {
            return false;
        }

        if norm_a == norm_b || norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
            return true;
        }

        let groups_a = self.synonym_groups(a);
        if groups_a.is_empty() {
            return false;
        }
        !groups_a.is_disjoint(&self.synonym_groups(b))
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}

// ============================================================================
// Winner Selection
// ============================================================================

/// Which side of a conflict survives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Existing,
    Candidate,
}

/// The rule that settled a conflict
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// Provenance ranks differ
    Provenance,
    /// One record has strictly more instruction steps
    Instructions,
    /// Nothing distinguishes them; first seen stays
    FirstSeen,
}

/// Decide which of two near-duplicate records to keep
///
/// 1. Higher provenance rank (generated content) wins.
/// 2. Otherwise the record with strictly more instructions wins.
/// 3. Otherwise the existing (earlier) record stays.
pub fn select_better_exercise(
    existing: &ExerciseRecord,
    candidate: &ExerciseRecord,
) -> (Selection, SelectionRule) {
    let existing_rank = existing.provenance.preference_rank();
    let candidate_rank = candidate.provenance.preference_rank();

    if existing_rank != candidate_rank {
        let keep = if candidate_rank > existing_rank {
            Selection::Candidate
        } else {
            Selection::Existing
        };
        return (keep, SelectionRule::Provenance);
    }

    if candidate.instructions.len() > existing.instructions.len() {
        return (Selection::Candidate, SelectionRule::Instructions);
    }

    (Selection::Existing, SelectionRule::FirstSeen)
}

// ============================================================================
// Deduplication
// ============================================================================

/// One collapse decision, for the storage layer and the audit trail
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeDecision {
    pub kept_id: String,
    pub kept_name: String,
    pub dropped_id: String,
    pub dropped_name: String,
    pub rule: SelectionRule,
}

/// Result of a batch deduplication run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupOutcome {
    pub unique: Vec<ExerciseRecord>,
    pub original_count: usize,
    pub unique_count: usize,
    /// Input names that no longer appear among the surviving names
    pub removed_names: Vec<String>,
    /// Records skipped as malformed (blank names)
    #[serde(default)]
    pub skipped_ids: Vec<String>,
    #[serde(default)]
    pub merges: Vec<MergeDecision>,
}

/// One ordered fold over `records`
///
/// A record only ever meets the current winners; names a winner has already
/// replaced take no further part.
fn fold_pass<'a>(
    records: &[&'a ExerciseRecord],
    matcher: &NameMatcher,
    merges: &mut Vec<MergeDecision>,
) -> Vec<&'a ExerciseRecord> {
    let mut winners: Vec<&'a ExerciseRecord> = Vec::new();

    for &record in records {
        let hit = winners
            .iter_mut()
            .find(|winner| matcher.are_names_similar(&winner.name, &record.name));

        match hit {
            Some(slot) => {
                let current: &'a ExerciseRecord = *slot;
                let (keep, rule) = select_better_exercise(current, record);
                let (kept, dropped) = match keep {
                    Selection::Existing => (current, record),
                    Selection::Candidate => (record, current),
                };
                tracing::debug!(
                    "Merged '{}' ({}) into '{}' ({}) by {:?}",
                    dropped.name,
                    dropped.id,
                    kept.name,
                    kept.id,
                    rule
                );
                merges.push(MergeDecision {
                    kept_id: kept.id.clone(),
                    kept_name: kept.name.clone(),
                    dropped_id: dropped.id.clone(),
                    dropped_name: dropped.name.clone(),
                    rule,
                });
                *slot = kept;
            }
            None => winners.push(record),
        }
    }

    winners
}

/// Collapse a catalog snapshot to one winner per duplicate group
///
/// Winners keep first-seen order; a winner's payload may be replaced by a
/// later record that beats it. Blank-named records are skipped and reported
/// rather than aborting the run.
pub fn deduplicate_catalog(records: &[ExerciseRecord], matcher: &NameMatcher) -> DedupOutcome {
    let mut skipped_ids = Vec::new();
    let mut current: Vec<&ExerciseRecord> = Vec::with_capacity(records.len());
    for record in records {
        if normalize_name(&record.name).is_empty() {
            tracing::warn!(
                "Skipping catalog record '{}' with blank name during deduplication",
                record.id
            );
            skipped_ids.push(record.id.clone());
        } else {
            current.push(record);
        }
    }

    let mut merges = Vec::new();
    let mut pass = 0;
    loop {
        pass += 1;
        let before = current.len();
        current = fold_pass(&current, matcher, &mut merges);
        tracing::debug!("Dedup pass {}: {} -> {} records", pass, before, current.len());
        if current.len() == before {
            break;
        }
    }

    let unique: Vec<ExerciseRecord> = current.into_iter().cloned().collect();

    let surviving: HashSet<&str> = unique.iter().map(|r| r.name.as_str()).collect();
    let mut seen = HashSet::new();
    let removed_names: Vec<String> = records
        .iter()
        .map(|r| r.name.as_str())
        .filter(|name| !surviving.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect();

    tracing::info!(
        "Deduplicated catalog: {} -> {} records ({} names removed, {} skipped)",
        records.len(),
        unique.len(),
        removed_names.len(),
        skipped_ids.len()
    );

    DedupOutcome {
        original_count: records.len(),
        unique_count: unique.len(),
        unique,
        removed_names,
        skipped_ids,
        merges,
    }
}
