//! Configuration file support for exdedup.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/exdedup/config.toml`.
//! Every section is optional; missing keys fall back to the tuned defaults,
//! which reproduce the historical catalog behaviour exactly.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Weights and thresholds for the pairwise duplicate score.
///
/// The defaults are empirically tuned and have no derivation beyond
/// matching existing catalog behaviour.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default = "default_exact_weight")]
    pub exact_weight: f64,

    #[serde(default = "default_jaccard_weight")]
    pub jaccard_weight: f64,

    #[serde(default = "default_edit_ratio_weight")]
    pub edit_ratio_weight: f64,

    #[serde(default = "default_muscle_weight")]
    pub muscle_weight: f64,

    #[serde(default = "default_equipment_weight")]
    pub equipment_weight: f64,

    /// Minimum token Jaccard before the signal contributes
    #[serde(default = "default_jaccard_threshold")]
    pub jaccard_threshold: f64,

    /// Minimum edit-distance ratio before the signal contributes
    #[serde(default = "default_edit_ratio_threshold")]
    pub edit_ratio_threshold: f64,

    /// Minimum composite score for a search hit
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exact_weight: default_exact_weight(),
            jaccard_weight: default_jaccard_weight(),
            edit_ratio_weight: default_edit_ratio_weight(),
            muscle_weight: default_muscle_weight(),
            equipment_weight: default_equipment_weight(),
            jaccard_threshold: default_jaccard_threshold(),
            edit_ratio_threshold: default_edit_ratio_threshold(),
            match_threshold: default_match_threshold(),
            max_results: default_max_results(),
        }
    }
}

/// Name normalizer configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NormalizerConfig {
    /// Tokens dropped before token-set comparison
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stopwords: default_stopwords(),
        }
    }
}

/// Batch deduplicator configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Canonical group name -> spellings treated as the same exercise
    #[serde(default = "default_synonyms")]
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            synonyms: default_synonyms(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("exdedup")
}

fn default_exact_weight() -> f64 {
    1.0
}

fn default_jaccard_weight() -> f64 {
    0.6
}

fn default_edit_ratio_weight() -> f64 {
    0.4
}

fn default_muscle_weight() -> f64 {
    0.25
}

fn default_equipment_weight() -> f64 {
    0.15
}

fn default_jaccard_threshold() -> f64 {
    0.6
}

fn default_edit_ratio_threshold() -> f64 {
    0.7
}

fn default_match_threshold() -> f64 {
    0.65
}

fn default_max_results() -> usize {
    10
}

fn default_stopwords() -> Vec<String> {
    [
        "barbell",
        "dumbbell",
        "with",
        "and",
        "the",
        "machine",
        "cable",
        "bodyweight",
        "on",
        "off",
        "standing",
        "seated",
        "one",
        "two",
        "arm",
        "leg",
        "holding",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_synonyms() -> BTreeMap<String, Vec<String>> {
    let groups: [(&str, &[&str]); 7] = [
        ("pushup", &["pushup", "push up", "push-up"]),
        ("pullup", &["pullup", "pull up", "pull-up"]),
        ("situp", &["situp", "sit up", "sit-up"]),
        ("chinup", &["chinup", "chin up", "chin-up"]),
        ("squat", &["squat", "squats"]),
        ("lunge", &["lunge", "lunges"]),
        ("plank", &["plank", "planks"]),
    ];

    groups
        .iter()
        .map(|(canonical, variants)| {
            (
                canonical.to_string(),
                variants.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("exdedup").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Validate tunables for values that would make scoring meaningless
    ///
    /// Returns a list of problems, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let s = &self.scoring;

        let weights = [
            ("exact_weight", s.exact_weight),
            ("jaccard_weight", s.jaccard_weight),
            ("edit_ratio_weight", s.edit_ratio_weight),
            ("muscle_weight", s.muscle_weight),
            ("equipment_weight", s.equipment_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("scoring.{} must be a non-negative number, got {}", name, value));
            }
        }

        let thresholds = [
            ("jaccard_threshold", s.jaccard_threshold),
            ("edit_ratio_threshold", s.edit_ratio_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("scoring.{} must be within [0, 1], got {}", name, value));
            }
        }

        if !s.match_threshold.is_finite() || s.match_threshold < 0.0 {
            errors.push(format!(
                "scoring.match_threshold must be non-negative, got {}",
                s.match_threshold
            ));
        }

        if s.max_results == 0 {
            errors.push("scoring.max_results must be at least 1".to_string());
        }

        for (canonical, variants) in &self.batch.synonyms {
            if variants.iter().all(|v| v.trim().is_empty()) {
                errors.push(format!("batch.synonyms group '{}' has no variants", canonical));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scoring.exact_weight, 1.0);
        assert_eq!(config.scoring.jaccard_weight, 0.6);
        assert_eq!(config.scoring.edit_ratio_weight, 0.4);
        assert_eq!(config.scoring.muscle_weight, 0.25);
        assert_eq!(config.scoring.equipment_weight, 0.15);
        assert_eq!(config.scoring.jaccard_threshold, 0.6);
        assert_eq!(config.scoring.edit_ratio_threshold, 0.7);
        assert_eq!(config.scoring.match_threshold, 0.65);
        assert_eq!(config.scoring.max_results, 10);
        assert_eq!(config.normalizer.stopwords.len(), 17);
        assert_eq!(config.batch.synonyms.len(), 7);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.scoring, parsed.scoring);
        assert_eq!(config.batch.synonyms, parsed.batch.synonyms);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[scoring]
match_threshold = 0.8
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scoring.match_threshold, 0.8);
        assert_eq!(config.scoring.jaccard_weight, 0.6); // default
        assert_eq!(config.normalizer.stopwords.len(), 17); // default
    }

    #[test]
    fn test_custom_synonyms_replace_defaults() {
        let toml_str = r#"
[batch.synonyms]
deadlift = ["deadlift", "dead lift"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.batch.synonyms.len(), 1);
        assert!(config.batch.synonyms.contains_key("deadlift"));
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut config = Config::default();
        config.scoring.muscle_weight = -0.1;
        config.scoring.edit_ratio_threshold = 1.5;
        config.scoring.max_results = 0;
        config
            .batch
            .synonyms
            .insert("empty".into(), vec!["  ".into()]);

        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{:?}", errors);
    }

    #[test]
    fn test_save_and_load_from() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.scoring.max_results = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scoring.max_results, 3);
    }
}
