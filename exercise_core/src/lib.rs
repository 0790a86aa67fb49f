#![forbid(unsafe_code)]

//! Exercise catalog duplicate detection and deduplication.
//!
//! This crate provides:
//! - Domain types (exercise records, provenance, duplicate matches)
//! - Name normalization
//! - Pairwise similarity scoring and insert-time duplicate search
//! - Catalog-wide batch deduplication
//! - Catalog file adapters, seed data and the dedup audit log

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod similarity;
pub mod search;
pub mod batch;
pub mod judge;
pub mod catalog;
pub mod seed;
pub mod audit;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use normalize::{normalize_name, tokenize, Normalizer};
pub use similarity::{edit_ratio, jaccard, levenshtein, ScoredPair, SimilarityScorer};
pub use search::{check_duplicates, find_potential_duplicates};
pub use batch::{deduplicate_catalog, select_better_exercise, DedupOutcome, NameMatcher};
pub use judge::DuplicateJudge;
pub use catalog::{
    validate_catalog, write_catalog, CatalogSnapshot, CatalogSource, JsonCatalogFile, SkippedEntry,
};
pub use seed::get_seed_catalog;
pub use audit::append_audit;
