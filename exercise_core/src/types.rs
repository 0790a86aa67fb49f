//! Core domain types for the exercise catalog.
//!
//! This module defines the fundamental types shared by the scorer and the
//! batch deduplicator:
//! - Exercise records and their tags
//! - Provenance and its keep-preference
//! - Duplicate queries and match results

use serde::{Deserialize, Serialize};

// ============================================================================
// Exercise Tags
// ============================================================================

/// Enumerated muscle tag
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Lats,
    Traps,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Obliques,
    LowerBack,
    Glutes,
    Quadriceps,
    Hamstrings,
    Adductors,
    Abductors,
    Calves,
    HipFlexors,
    FullBody,
    Cardio,
}

impl MuscleGroup {
    /// Parse a user-facing tag such as "chest" or "lower-back"
    pub fn parse(tag: &str) -> Option<Self> {
        let key = tag.trim().to_lowercase().replace(['-', ' '], "_");
        serde_json::from_value(serde_json::Value::String(key)).ok()
    }
}

/// Exercise difficulty
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Where a catalog record came from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Shipped with the application
    #[default]
    Seed,
    /// Entered by a user
    UserSubmitted,
    /// Produced by the content-generation service
    Generated,
}

impl Provenance {
    /// Keep-preference rank used when two records collapse into one.
    ///
    /// Higher wins. Seed and user-submitted records rank equally.
    pub fn preference_rank(self) -> u8 {
        match self {
            Provenance::Generated => 1,
            Provenance::Seed | Provenance::UserSubmitted => 0,
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// One catalog entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroup>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl ExerciseRecord {
    /// Create a bare record with only an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            muscle_groups: Vec::new(),
            equipment: Vec::new(),
            difficulty: None,
            instructions: Vec::new(),
            provenance: Provenance::default(),
        }
    }
}

// ============================================================================
// Duplicate Search Types
// ============================================================================

/// Candidate exercise being checked against the catalog
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DuplicateQuery {
    pub name: String,
    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroup>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

impl DuplicateQuery {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl From<&ExerciseRecord> for DuplicateQuery {
    fn from(record: &ExerciseRecord) -> Self {
        Self {
            name: record.name.clone(),
            muscle_groups: record.muscle_groups.clone(),
            equipment: record.equipment.clone(),
        }
    }
}

/// A scored comparison between the candidate and one catalog record.
///
/// Computed per query and never persisted.
#[derive(Clone, Debug)]
pub struct DuplicateMatch<'a> {
    pub candidate: &'a DuplicateQuery,
    pub existing: &'a ExerciseRecord,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// API-facing view of one match
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub muscle_groups: Vec<MuscleGroup>,
    pub equipment: Vec<String>,
    pub difficulty: Option<Difficulty>,
}

impl From<&DuplicateMatch<'_>> for MatchSummary {
    fn from(m: &DuplicateMatch<'_>) -> Self {
        Self {
            id: m.existing.id.clone(),
            name: m.existing.name.clone(),
            score: round3(m.score),
            reasons: m.reasons.clone(),
            muscle_groups: m.existing.muscle_groups.clone(),
            equipment: m.existing.equipment.clone(),
            difficulty: m.existing.difficulty,
        }
    }
}

/// Result of `check_duplicates`
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub matches: Vec<MatchSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_ids: Vec<String>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
