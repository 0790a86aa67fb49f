//! Insert-time duplicate search.
//!
//! Scores a candidate against every record of a catalog snapshot and keeps
//! the strongest hits. Nothing is indexed or cached between calls, so each
//! query is a linear scan of the snapshot it is handed.

use crate::config::Config;
use crate::normalize::{normalize_name, Normalizer};
use crate::similarity::SimilarityScorer;
use crate::{
    DuplicateMatch, DuplicateQuery, DuplicateReport, ExerciseRecord, MatchSummary, MuscleGroup,
};

/// Ranked, thresholded duplicates of `candidate` within `catalog`
///
/// - keeps matches scoring at least `match_threshold`
/// - sorts descending by score; ties keep catalog order
/// - truncates to `max_results`
///
/// Records whose name normalizes to nothing are skipped.
pub fn find_potential_duplicates<'a>(
    candidate: &'a DuplicateQuery,
    catalog: &'a [ExerciseRecord],
    scorer: &SimilarityScorer,
) -> Vec<DuplicateMatch<'a>> {
    scan(candidate, catalog, scorer).0
}

/// Scan that also reports the ids of records it had to skip
fn scan<'a>(
    candidate: &'a DuplicateQuery,
    catalog: &'a [ExerciseRecord],
    scorer: &SimilarityScorer,
) -> (Vec<DuplicateMatch<'a>>, Vec<String>) {
    let mut matches = Vec::new();
    let mut skipped = Vec::new();

    for existing in catalog {
        if normalize_name(&existing.name).is_empty() {
            tracing::warn!(
                "Skipping catalog record '{}' with blank name during duplicate search",
                existing.id
            );
            skipped.push(existing.id.clone());
            continue;
        }

        let pair = scorer.score(candidate, existing);
        if scorer.is_match(&pair) {
            matches.push(DuplicateMatch {
                candidate,
                existing,
                score: pair.score,
                reasons: pair.reasons,
            });
        }
    }

    // sort_by is stable, so equal scores keep catalog order
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(scorer.config().max_results);

    tracing::debug!(
        "Duplicate search for '{}' over {} records: {} matches",
        candidate.name,
        catalog.len(),
        matches.len()
    );

    (matches, skipped)
}

/// API-facing duplicate check
///
/// Builds the candidate from loose parts, runs the search with the
/// configured scorer and returns display-ready summaries with scores rounded
/// to three decimals.
pub fn check_duplicates(
    name: &str,
    muscle_groups: &[MuscleGroup],
    equipment: &[String],
    catalog: &[ExerciseRecord],
    config: &Config,
) -> DuplicateReport {
    let scorer = SimilarityScorer::new(
        config.scoring.clone(),
        Normalizer::from_config(&config.normalizer),
    );
    let candidate = DuplicateQuery {
        name: name.to_string(),
        muscle_groups: muscle_groups.to_vec(),
        equipment: equipment.to_vec(),
    };

    let (matches, skipped_ids) = scan(&candidate, catalog, &scorer);

    if !matches.is_empty() {
        tracing::info!(
            "'{}' resembles {} catalog record(s), best '{}' at {:.3}",
            name,
            matches.len(),
            matches[0].existing.name,
            matches[0].score
        );
    }

    DuplicateReport {
        matches: matches.iter().map(MatchSummary::from).collect(),
        skipped_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::similarity::EXACT_MATCH_REASON;
    use crate::Difficulty;

    fn record(id: &str, name: &str) -> ExerciseRecord {
        ExerciseRecord::new(id, name)
    }

    #[test]
    fn test_finds_exact_and_stopword_variants() {
        let mut bench = record("bench", "Barbell Bench Press");
        bench.muscle_groups = vec![MuscleGroup::Chest, MuscleGroup::Triceps];
        let catalog = vec![
            record("pushup", "Push-up"),
            bench,
            record("curl", "Bicep Curl"),
        ];
        let scorer = SimilarityScorer::default();

        let query = DuplicateQuery::named("Push Ups");
        let matches = find_potential_duplicates(&query, &catalog, &scorer);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].existing.id, "pushup");
        assert!(matches[0].score >= 1.0);
        assert!(matches[0].reasons.iter().any(|r| r == EXACT_MATCH_REASON));

        // Token Jaccard alone contributes 0.6; shared muscles lift it past the threshold
        let query = DuplicateQuery::named("Bench Press");
        assert!(find_potential_duplicates(&query, &catalog, &scorer).is_empty());

        let query = DuplicateQuery {
            name: "Bench Press".into(),
            muscle_groups: vec![MuscleGroup::Chest],
            equipment: vec![],
        };
        let matches = find_potential_duplicates(&query, &catalog, &scorer);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].existing.id, "bench");
        assert!((matches[0].score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_results_are_sorted_and_thresholded() {
        let catalog = vec![
            record("a", "Incline Bench Press"),
            record("b", "Bench Press"),
            record("c", "Bench Pres"),
            record("d", "Leg Curl"),
        ];
        let scorer = SimilarityScorer::default();
        let query = DuplicateQuery::named("Bench Press");
        let matches = find_potential_duplicates(&query, &catalog, &scorer);

        assert!(!matches.is_empty());
        assert_eq!(matches[0].existing.id, "b");
        for window in matches.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        for m in &matches {
            assert!(m.score >= 0.65);
            assert_ne!(m.existing.id, "d");
        }
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog: Vec<_> = (0..5)
            .map(|i| record(&format!("plank_{}", i), "Plank"))
            .collect();
        let scorer = SimilarityScorer::default();
        let query = DuplicateQuery::named("plank");
        let matches = find_potential_duplicates(&query, &catalog, &scorer);

        let ids: Vec<_> = matches.iter().map(|m| m.existing.id.as_str()).collect();
        assert_eq!(ids, vec!["plank_0", "plank_1", "plank_2", "plank_3", "plank_4"]);
    }

    #[test]
    fn test_never_more_than_max_results() {
        let catalog: Vec<_> = (0..25)
            .map(|i| record(&format!("squat_{}", i), "Squat"))
            .collect();
        let scorer = SimilarityScorer::default();
        let query = DuplicateQuery::named("Squat");
        assert_eq!(find_potential_duplicates(&query, &catalog, &scorer).len(), 10);

        let small = SimilarityScorer::new(
            ScoringConfig {
                max_results: 3,
                ..ScoringConfig::default()
            },
            Normalizer::default(),
        );
        assert_eq!(find_potential_duplicates(&query, &catalog, &small).len(), 3);
    }

    #[test]
    fn test_empty_catalog() {
        let scorer = SimilarityScorer::default();
        let query = DuplicateQuery::named("Plank");
        assert!(find_potential_duplicates(&query, &[], &scorer).is_empty());
    }

    #[test]
    fn test_blank_record_is_skipped_not_fatal() {
        let catalog = vec![record("broken", "  "), record("plank", "Plank")];
        let report = check_duplicates("Plank", &[], &[], &catalog, &Config::default());
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].id, "plank");
        assert_eq!(report.skipped_ids, vec!["broken".to_string()]);
    }

    #[test]
    fn test_blank_candidate_has_no_matches() {
        let catalog = vec![record("plank", "Plank"), record("broken", "")];
        let report = check_duplicates(" ", &[MuscleGroup::Core], &[], &catalog, &Config::default());
        assert!(report.matches.is_empty());
    }

    #[test]
    fn test_check_duplicates_reports_display_fields() {
        let mut existing = record("goblet", "Goblet Squat");
        existing.muscle_groups = vec![MuscleGroup::Quadriceps, MuscleGroup::Glutes];
        existing.equipment = vec!["kettlebell".into()];
        existing.difficulty = Some(Difficulty::Beginner);

        let report = check_duplicates(
            "Goblet Squats",
            &[MuscleGroup::Quadriceps],
            &["Kettlebell".to_string()],
            &[existing],
            &Config::default(),
        );

        assert_eq!(report.matches.len(), 1);
        let m = &report.matches[0];
        assert_eq!(m.id, "goblet");
        assert_eq!(m.difficulty, Some(Difficulty::Beginner));
        assert_eq!(m.equipment, vec!["kettlebell".to_string()]);
        assert_eq!(m.reasons.len(), 4, "{:?}", m.reasons);
        // Rounded to three decimals
        assert_eq!((m.score * 1000.0).round() / 1000.0, m.score);
    }

    #[test]
    fn test_search_is_safe_across_threads() {
        let catalog: Vec<_> = vec![record("pushup", "Push-up"), record("row", "Bent Over Row")];
        let scorer = SimilarityScorer::default();

        std::thread::scope(|s| {
            let handles: Vec<_> = ["Push Up", "Pushups", "Bent-Over Row"]
                .into_iter()
                .map(|name| {
                    let catalog = &catalog;
                    let scorer = &scorer;
                    s.spawn(move || {
                        let query = DuplicateQuery::named(name);
                        find_potential_duplicates(&query, catalog, scorer).len()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 1);
            }
        });
    }
}
