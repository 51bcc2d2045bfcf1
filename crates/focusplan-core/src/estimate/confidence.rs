//! Confidence policy: when to ask, and how to label.

use serde::{Deserialize, Serialize};

/// Estimates below this confidence warrant a clarifying question.
pub const QUESTION_THRESHOLD: f64 = 0.5;

/// Display label for a confidence score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBadge {
    High,
    Medium,
    Low,
}

pub fn requires_question(confidence: f64) -> bool {
    confidence < QUESTION_THRESHOLD
}

pub fn confidence_badge(confidence: f64) -> ConfidenceBadge {
    if confidence >= 0.8 {
        ConfidenceBadge::High
    } else if confidence >= 0.5 {
        ConfidenceBadge::Medium
    } else {
        ConfidenceBadge::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_threshold_is_exclusive() {
        assert!(requires_question(0.49));
        assert!(!requires_question(0.5));
        assert!(!requires_question(1.0));
    }

    #[test]
    fn badge_boundaries() {
        assert_eq!(confidence_badge(1.0), ConfidenceBadge::High);
        assert_eq!(confidence_badge(0.8), ConfidenceBadge::High);
        assert_eq!(confidence_badge(0.79), ConfidenceBadge::Medium);
        assert_eq!(confidence_badge(0.5), ConfidenceBadge::Medium);
        assert_eq!(confidence_badge(0.49), ConfidenceBadge::Low);
        assert_eq!(confidence_badge(0.0), ConfidenceBadge::Low);
    }
}
