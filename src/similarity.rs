//! Token-overlap similarity for quiz answers.

use serde::{Deserialize, Serialize};

/// Rough similarity between two strings, in `[0, 1]`.
///
/// Both strings are tokenized on whitespace. A token of `a` counts as a match
/// when it contains, or is contained in, any token of `b`. The score is the
/// match count over the larger token count. Case normalization is the
/// caller's job. This is a heuristic, not a metric — it is not symmetric when
/// token multiplicities differ.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_tokens: Vec<&str> = a.split_whitespace().collect();
    let b_tokens: Vec<&str> = b.split_whitespace().collect();
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0.0;
    }

    let matches = a_tokens
        .iter()
        .filter(|tok| {
            b_tokens
                .iter()
                .any(|other| other.contains(**tok) || tok.contains(*other))
        })
        .count();

    matches as f64 / a_tokens.len().max(b_tokens.len()) as f64
}

/// Three-tier classification of a similarity score, used to color the answer
/// pane in quiz mode. Not a pass/fail gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerTier {
    /// Close match.
    Good,
    /// Partial match.
    Partial,
    /// Poor match.
    Poor,
}

impl AnswerTier {
    /// Classify a similarity score.
    pub fn classify(score: f64) -> Self {
        if score >= 0.7 {
            Self::Good
        } else if score >= 0.4 {
            Self::Partial
        } else {
            Self::Poor
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Good => "Good match",
            Self::Partial => "Partial match",
            Self::Poor => "Poor match",
        }
    }
}
