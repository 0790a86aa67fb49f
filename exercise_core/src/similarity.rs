//! Pairwise duplicate scoring.
//!
//! The composite score is a plain sum of independent signals:
//! exact normalized name, token Jaccard, edit-distance ratio, muscle-group
//! overlap and equipment overlap. Each signal that clears its threshold adds
//! its weighted value and one human-readable reason.

use crate::config::ScoringConfig;
use crate::normalize::{name_key, normalize_name, Normalizer};
use crate::{DuplicateQuery, ExerciseRecord};
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// Reason recorded when normalized names are identical
pub const EXACT_MATCH_REASON: &str = "exact normalized name match";

/// Score and explanation for one candidate/record pair
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoredPair {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// `|a ∩ b| / |a ∪ b|`, or 0 when both sets are empty
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Classical Levenshtein distance over chars (unit insert/delete/substitute)
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Full DP table; names are short so the quadratic footprint is fine
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        table[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + substitution);
        }
    }

    table[a.len()][b.len()]
}

/// `1 - distance / max(len)`, or 0 when both strings are empty
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Fraction of the candidate's tags that the existing record shares
fn overlap_fraction<T: Eq + Hash>(candidate: &HashSet<T>, existing: &HashSet<T>) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    candidate.intersection(existing).count() as f64 / candidate.len() as f64
}

/// Spacing and plural variants of one name ("push ups" / "pushup") share a key
fn same_name_key(a: &str, b: &str) -> bool {
    let key = name_key(a);
    !key.is_empty() && key == name_key(b)
}

fn equipment_set(tags: &[String]) -> HashSet<String> {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Weighted multi-signal scorer
#[derive(Clone, Debug)]
pub struct SimilarityScorer {
    config: ScoringConfig,
    normalizer: Normalizer,
}

impl SimilarityScorer {
    pub fn new(config: ScoringConfig, normalizer: Normalizer) -> Self {
        Self { config, normalizer }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Composite score between a candidate and one catalog record
    pub fn score(&self, candidate: &DuplicateQuery, existing: &ExerciseRecord) -> ScoredPair {
        let cfg = &self.config;
        let mut score = 0.0;
        let mut reasons = Vec::new();

        let name_a = normalize_name(&candidate.name);
        let name_b = normalize_name(&existing.name);

        if name_a == name_b || same_name_key(&name_a, &name_b) {
            score += cfg.exact_weight;
            reasons.push(EXACT_MATCH_REASON.to_string());
        }

        let tokens_a = self.normalizer.tokenize_normalized(&name_a);
        let tokens_b = self.normalizer.tokenize_normalized(&name_b);
        let jac = jaccard(&tokens_a, &tokens_b);
        if jac >= cfg.jaccard_threshold {
            let contribution = jac * cfg.jaccard_weight;
            score += contribution;
            reasons.push(format!("token jaccard {:.2} (+{:.3})", jac, contribution));
        }

        let ratio = edit_ratio(&name_a, &name_b);
        if ratio >= cfg.edit_ratio_threshold {
            let contribution = ratio * cfg.edit_ratio_weight;
            score += contribution;
            reasons.push(format!("edit distance ratio {:.2} (+{:.3})", ratio, contribution));
        }

        if !candidate.muscle_groups.is_empty() {
            let wanted: HashSet<_> = candidate.muscle_groups.iter().copied().collect();
            let present: HashSet<_> = existing.muscle_groups.iter().copied().collect();
            let overlap = overlap_fraction(&wanted, &present);
            if overlap > 0.0 {
                let contribution = overlap * cfg.muscle_weight;
                score += contribution;
                reasons.push(format!(
                    "muscle group overlap {:.2} (+{:.3})",
                    overlap, contribution
                ));
            }
        }

        if !candidate.equipment.is_empty() {
            let wanted = equipment_set(&candidate.equipment);
            let present = equipment_set(&existing.equipment);
            let overlap = overlap_fraction(&wanted, &present);
            if overlap > 0.0 {
                let contribution = overlap * cfg.equipment_weight;
                score += contribution;
                reasons.push(format!("equipment overlap {:.2} (+{:.3})", overlap, contribution));
            }
        }

        ScoredPair { score, reasons }
    }

    /// True when the composite score reaches the search threshold
    pub fn is_match(&self, pair: &ScoredPair) -> bool {
        pair.score >= self.config.match_threshold
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), Normalizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MuscleGroup;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn record(name: &str) -> ExerciseRecord {
        ExerciseRecord::new(normalize_name(name).replace(' ', "_"), name)
    }

    #[test]
    fn test_jaccard_identity_and_empty() {
        let a = set(&["bench", "press"]);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard::<String>(&BTreeSet::new(), &BTreeSet::new()), 0.0);
        assert_eq!(jaccard(&a, &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_jaccard_partial() {
        let a = set(&["incline", "bench", "press"]);
        let b = set(&["bench", "press"]);
        assert!((jaccard(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("squat", "squat"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("pushup", "pushups"), 1);
    }

    #[test]
    fn test_levenshtein_symmetric() {
        let pairs = [
            ("kitten", "sitting"),
            ("push up", "pull up"),
            ("deadlift", "romanian deadlift"),
            ("", "plank"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
        }
    }

    #[test]
    fn test_edit_ratio_bounds() {
        assert_eq!(edit_ratio("", ""), 0.0);
        assert_eq!(edit_ratio("plank", "plank"), 1.0);
        assert_eq!(edit_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_exact_match_contributes_base_weight() {
        let scorer = SimilarityScorer::default();
        let pair = scorer.score(&DuplicateQuery::named("PUSH-UP"), &record("Push-up"));
        assert_eq!(pair.reasons[0], EXACT_MATCH_REASON);
        assert!(pair.score >= 1.0);
        // exact + jaccard(1.0) + edit ratio(1.0)
        assert!((pair.score - (1.0 + 0.6 + 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_push_ups_vs_push_up_scores_above_one() {
        let scorer = SimilarityScorer::default();
        let pair = scorer.score(&DuplicateQuery::named("Push Ups"), &record("Push-up"));
        assert!(pair.reasons.iter().any(|r| r == EXACT_MATCH_REASON));
        assert!(pair.score >= 1.0, "score {} reasons {:?}", pair.score, pair.reasons);
        assert!(scorer.is_match(&pair));
    }

    #[test]
    fn test_different_exercises_do_not_share_name_key() {
        let scorer = SimilarityScorer::default();
        let pair = scorer.score(&DuplicateQuery::named("Pull-up"), &record("Push-up"));
        assert!(!pair.reasons.iter().any(|r| r == EXACT_MATCH_REASON));
    }

    #[test]
    fn test_stopwords_give_bench_press_variants_full_token_overlap() {
        let scorer = SimilarityScorer::default();
        let pair = scorer.score(
            &DuplicateQuery::named("Bench Press"),
            &record("Barbell Bench Press"),
        );
        assert_eq!(pair.reasons, vec!["token jaccard 1.00 (+0.600)".to_string()]);
        assert!((pair.score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_unrelated_names_score_zero() {
        let scorer = SimilarityScorer::default();
        let pair = scorer.score(&DuplicateQuery::named("Deadlift"), &record("Bicep Curl"));
        assert_eq!(pair.score, 0.0);
        assert!(pair.reasons.is_empty());
    }

    #[test]
    fn test_muscle_overlap_uses_candidate_denominator() {
        let scorer = SimilarityScorer::default();
        let query = DuplicateQuery {
            name: "Zzz".into(),
            muscle_groups: vec![MuscleGroup::Chest, MuscleGroup::Triceps],
            equipment: vec![],
        };
        let mut existing = record("Dips");
        existing.muscle_groups = vec![MuscleGroup::Triceps, MuscleGroup::Shoulders, MuscleGroup::Chest];
        let pair = scorer.score(&query, &existing);
        assert!((pair.score - 0.25).abs() < 1e-12);

        existing.muscle_groups = vec![MuscleGroup::Triceps];
        let pair = scorer.score(&query, &existing);
        assert!((pair.score - 0.125).abs() < 1e-12);
        assert_eq!(pair.reasons, vec!["muscle group overlap 0.50 (+0.125)".to_string()]);
    }

    #[test]
    fn test_equipment_overlap_is_case_insensitive() {
        let scorer = SimilarityScorer::default();
        let query = DuplicateQuery {
            name: "Zzz".into(),
            muscle_groups: vec![],
            equipment: vec!["Kettlebell".into()],
        };
        let mut existing = record("Swing");
        existing.equipment = vec![" kettlebell ".into()];
        let pair = scorer.score(&query, &existing);
        assert!((pair.score - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_empty_candidate_tags_are_ignored() {
        let scorer = SimilarityScorer::default();
        let mut existing = record("Row");
        existing.muscle_groups = vec![MuscleGroup::Back];
        existing.equipment = vec!["cable".into()];
        let pair = scorer.score(&DuplicateQuery::named("Zzz"), &existing);
        assert_eq!(pair.score, 0.0);
    }

    #[test]
    fn test_blank_candidate_never_matches_named_record() {
        let scorer = SimilarityScorer::default();
        let pair = scorer.score(&DuplicateQuery::named("   "), &record("Plank"));
        assert_eq!(pair.score, 0.0);
    }

    #[test]
    fn test_overridden_weights_are_used() {
        let config = ScoringConfig {
            exact_weight: 2.0,
            ..ScoringConfig::default()
        };
        let scorer = SimilarityScorer::new(config, Normalizer::default());
        let pair = scorer.score(&DuplicateQuery::named("Plank"), &record("plank"));
        assert!((pair.score - 3.0).abs() < 1e-12);
    }
}
