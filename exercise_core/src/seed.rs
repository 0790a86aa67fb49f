//! Built-in seed exercises.
//!
//! This is the catalog the application ships with, used by the CLI when no
//! catalog file exists yet.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached seed catalog - built once and reused across all operations
static SEED_CATALOG: Lazy<Vec<ExerciseRecord>> = Lazy::new(build_seed_catalog);

/// Get a reference to the cached seed catalog
pub fn get_seed_catalog() -> &'static [ExerciseRecord] {
    &SEED_CATALOG
}

fn seed(
    id: &str,
    name: &str,
    muscle_groups: &[MuscleGroup],
    equipment: &[&str],
    difficulty: Difficulty,
    instructions: &[&str],
) -> ExerciseRecord {
    ExerciseRecord {
        id: id.into(),
        name: name.into(),
        muscle_groups: muscle_groups.to_vec(),
        equipment: equipment.iter().map(|e| e.to_string()).collect(),
        difficulty: Some(difficulty),
        instructions: instructions.iter().map(|s| s.to_string()).collect(),
        provenance: Provenance::Seed,
    }
}

/// Builds the seed catalog
///
/// **Note**: prefer `get_seed_catalog()`, which returns a cached reference.
pub fn build_seed_catalog() -> Vec<ExerciseRecord> {
    use Difficulty::*;
    use MuscleGroup::*;

    vec![
        seed(
            "seed_pushup",
            "Push-up",
            &[Chest, Triceps, Shoulders],
            &[],
            Beginner,
            &[
                "Start in a high plank with hands under shoulders",
                "Lower your chest to just above the floor",
                "Press back up to full lockout",
            ],
        ),
        seed(
            "seed_pullup",
            "Pull-up",
            &[Lats, Back, Biceps],
            &["pull-up bar"],
            Intermediate,
            &[
                "Hang from the bar with an overhand grip",
                "Pull until your chin clears the bar",
                "Lower under control",
            ],
        ),
        seed(
            "seed_bench_press",
            "Barbell Bench Press",
            &[Chest, Triceps, Shoulders],
            &["barbell", "bench"],
            Intermediate,
            &[
                "Lie on the bench with eyes under the bar",
                "Lower the bar to mid chest",
                "Press to lockout",
            ],
        ),
        seed(
            "seed_back_squat",
            "Back Squat",
            &[Quadriceps, Glutes, Hamstrings],
            &["barbell", "squat rack"],
            Intermediate,
            &[
                "Set the bar across your upper back",
                "Sit down and back until thighs are parallel",
                "Drive up through the whole foot",
            ],
        ),
        seed(
            "seed_deadlift",
            "Deadlift",
            &[Hamstrings, Glutes, LowerBack],
            &["barbell"],
            Advanced,
            &[
                "Stand with mid foot under the bar",
                "Hinge and grip the bar just outside the knees",
                "Stand up by driving the floor away",
            ],
        ),
        seed(
            "seed_walking_lunge",
            "Walking Lunge",
            &[Quadriceps, Glutes],
            &[],
            Beginner,
            &[
                "Step forward and lower the back knee toward the floor",
                "Drive through the front heel into the next step",
            ],
        ),
        seed(
            "seed_plank",
            "Plank",
            &[Core],
            &[],
            Beginner,
            &["Hold a straight line from head to heels on forearms and toes"],
        ),
        seed(
            "seed_situp",
            "Sit-up",
            &[Core, HipFlexors],
            &[],
            Beginner,
            &["Lie with knees bent", "Curl up until your chest meets your thighs"],
        ),
        seed(
            "seed_overhead_press",
            "Overhead Press",
            &[Shoulders, Triceps],
            &["barbell"],
            Intermediate,
            &["Press the bar from the front rack to overhead lockout"],
        ),
        seed(
            "seed_kb_swing",
            "Kettlebell Swing",
            &[Glutes, Hamstrings, Cardio],
            &["kettlebell"],
            Beginner,
            &[
                "Hike the bell back between your legs",
                "Snap the hips to float it to chest height",
            ],
        ),
        seed(
            "seed_burpee",
            "Burpee",
            &[FullBody, Cardio],
            &[],
            Intermediate,
            &[
                "Drop to the floor",
                "Return to a squat position",
                "Jump with hands overhead",
            ],
        ),
        seed(
            "seed_bicep_curl",
            "Dumbbell Bicep Curl",
            &[Biceps, Forearms],
            &["dumbbell"],
            Beginner,
            &["Curl the dumbbells without swinging the torso"],
        ),
    ]
}
