//! Tunable knobs for the scorer and selector.

use serde::{Deserialize, Serialize};

/// Maximum |duration difference| in seconds for an exact match
pub const EXACT_DURATION_TOLERANCE_SECS: f64 = 5.0;

/// Duration difference at which the fuzzy duration score reaches zero
pub const DURATION_WINDOW_SECS: f64 = 30.0;

/// Weight of title similarity in the combined score
pub const TITLE_WEIGHT: f64 = 0.7;

/// Weight of duration proximity in the combined score
pub const DURATION_WEIGHT: f64 = 0.3;

/// A fuzzy match must score strictly above this
pub const FUZZY_THRESHOLD: f64 = 0.65;

/// What to return when neither the exact test nor the fuzzy threshold picks a winner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Report no match
    #[default]
    NoMatch,
    /// Return the first search result anyway
    FirstCandidate,
}

/// Parameters for a single matching decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    pub exact_duration_tolerance: f64,
    pub duration_window: f64,
    pub title_weight: f64,
    pub duration_weight: f64,
    pub fuzzy_threshold: f64,
    pub fallback: FallbackPolicy,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            exact_duration_tolerance: EXACT_DURATION_TOLERANCE_SECS,
            duration_window: DURATION_WINDOW_SECS,
            title_weight: TITLE_WEIGHT,
            duration_weight: DURATION_WEIGHT,
            fuzzy_threshold: FUZZY_THRESHOLD,
            fallback: FallbackPolicy::NoMatch,
        }
    }
}

impl MatchPolicy {
    pub fn with_fallback(self, fallback: FallbackPolicy) -> Self {
        Self { fallback, ..self }
    }
}

impl From<&crate::config::MatchingConfig> for MatchPolicy {
    fn from(config: &crate::config::MatchingConfig) -> Self {
        Self {
            exact_duration_tolerance: config.exact_duration_tolerance_secs,
            duration_window: config.duration_window_secs,
            title_weight: config.title_weight,
            duration_weight: config.duration_weight,
            fuzzy_threshold: config.fuzzy_threshold,
            fallback: config.fallback,
        }
    }
}
