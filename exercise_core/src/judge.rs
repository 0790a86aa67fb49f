//! Shared "is this probably the same exercise" capability.
//!
//! The pairwise scorer and the batch name matcher answer this question in
//! different ways and do not always agree; both stay available behind one
//! trait so callers can pick a strategy or compare them.

use crate::batch::NameMatcher;
use crate::similarity::SimilarityScorer;
use crate::{DuplicateQuery, ExerciseRecord};

pub trait DuplicateJudge {
    /// Short strategy name for logs and reports
    fn name(&self) -> &'static str;

    fn is_probably_same(&self, a: &ExerciseRecord, b: &ExerciseRecord) -> bool;
}

impl DuplicateJudge for SimilarityScorer {
    fn name(&self) -> &'static str {
        "scorer"
    }

    /// `a` plays the candidate, so its muscle groups and equipment count
    fn is_probably_same(&self, a: &ExerciseRecord, b: &ExerciseRecord) -> bool {
        let pair = self.score(&DuplicateQuery::from(a), b);
        self.is_match(&pair)
    }
}

impl DuplicateJudge for NameMatcher {
    fn name(&self) -> &'static str {
        "name_matcher"
    }

    fn is_probably_same(&self, a: &ExerciseRecord, b: &ExerciseRecord) -> bool {
        self.are_names_similar(&a.name, &b.name)
    }
}
