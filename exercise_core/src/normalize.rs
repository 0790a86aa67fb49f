//! Exercise name canonicalization.
//!
//! Both duplicate strategies compare names only after they pass through
//! here, so "Push-Up", "push up " and "PUSH UP" all meet as "push up".

use crate::config::NormalizerConfig;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

static DEFAULT_NORMALIZER: Lazy<Normalizer> =
    Lazy::new(|| Normalizer::from_config(&NormalizerConfig::default()));

/// Lowercase, drop everything except `[a-z0-9]` and whitespace, collapse
/// whitespace runs to one space, and trim.
///
/// Idempotent: `normalize_name(&normalize_name(x)) == normalize_name(x)`.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !result.is_empty() {
                result.push(' ');
            }
            pending_space = false;
            result.push(c);
        }
    }

    result
}

/// Equality key for an already-normalized name: spaces removed and one
/// trailing plural "s" dropped, so "push ups", "push up" and "pushup" agree.
pub fn name_key(normalized: &str) -> String {
    let mut key: String = normalized.chars().filter(|c| !c.is_whitespace()).collect();
    if key.len() > 3 && key.ends_with('s') && !key.ends_with("ss") {
        key.pop();
    }
    key
}

/// Tokenize with the default stopword list
pub fn tokenize(name: &str) -> BTreeSet<String> {
    DEFAULT_NORMALIZER.tokenize(name)
}

/// Name normalizer carrying an injected stopword set
#[derive(Clone, Debug)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Normalizer {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Stopwords are matched against normalized tokens, so store them that way
        let stopwords = stopwords
            .into_iter()
            .map(|s| normalize_name(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { stopwords }
    }

    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::new(&config.stopwords)
    }

    /// Shared instance built from the default stopword list
    pub fn default_ref() -> &'static Normalizer {
        &DEFAULT_NORMALIZER
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Normalized, whitespace-split token set with stopwords removed
    pub fn tokenize(&self, name: &str) -> BTreeSet<String> {
        self.tokenize_normalized(&normalize_name(name))
    }

    /// Same as [`Normalizer::tokenize`] for input that is already normalized
    pub fn tokenize_normalized(&self, normalized: &str) -> BTreeSet<String> {
        normalized
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        DEFAULT_NORMALIZER.clone()
    }
}
