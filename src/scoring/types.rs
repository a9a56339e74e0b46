use std::fmt;

use serde::{Deserialize, Serialize};

/// A multiple-choice question submitted for scoring.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoringRequest {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub subject: String,
    pub topic: String,
    pub difficulty: String,
}

impl ScoringRequest {
    /// Text of the option marked correct, if the index is in range.
    pub fn correct_answer(&self) -> Option<&str> {
        self.options
            .get(self.correct_answer_index)
            .map(String::as_str)
    }

    /// Check the preconditions a caller must enforce before scoring.
    /// Returns every violation at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.options.len() < 2 {
            errors.push(format!(
                "options: at least 2 options required, got {}",
                self.options.len()
            ));
        }

        if self.correct_answer_index >= self.options.len() {
            errors.push(format!(
                "correct_answer_index: {} is out of range for {} options",
                self.correct_answer_index,
                self.options.len()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Coarse bucketing of the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub mathematical_correctness: f64,
    pub conceptual_soundness: f64,
    pub option_plausibility: f64,
    pub difficulty_appropriateness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedContribution {
    pub mathematics: f64,
    pub conceptual: f64,
    pub options: f64,
    pub difficulty: f64,
}

impl WeightedContribution {
    pub fn total(&self) -> f64 {
        self.mathematics + self.conceptual + self.options + self.difficulty
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedFeedback {
    pub component_scores: ComponentScores,
    pub weighted_contribution: WeightedContribution,
}

/// Result of scoring one question. All scores are rounded to 3 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResponse {
    pub accuracy_score: f64,
    pub confidence_level: ConfidenceLevel,
    pub validation_passed: Vec<String>,
    pub validation_failed: Vec<String>,
    pub mathematical_correctness: f64,
    pub conceptual_soundness: f64,
    pub option_plausibility: f64,
    pub difficulty_appropriateness: f64,
    pub detailed_feedback: DetailedFeedback,
}
