use tracing::{debug, debug_span, warn};

use super::conceptual::evaluate_conceptual;
use super::config::{ConfidenceThresholds, ScoringConfig};
use super::criterion::{Criterion, CriterionResult};
use super::difficulty::evaluate_difficulty;
use super::mathematical::evaluate_mathematical;
use super::options::evaluate_options;
use super::types::{
    ComponentScores, ConfidenceLevel, DetailedFeedback, ScoringRequest, ScoringResponse,
    WeightedContribution,
};
use crate::math;

/// Unrounded per-criterion results for one request, in criterion order.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub mathematical: CriterionResult,
    pub conceptual: CriterionResult,
    pub options: CriterionResult,
    pub difficulty: CriterionResult,
}

impl Evaluation {
    pub fn get(&self, criterion: Criterion) -> &CriterionResult {
        match criterion {
            Criterion::Mathematical => &self.mathematical,
            Criterion::Conceptual => &self.conceptual,
            Criterion::Options => &self.options,
            Criterion::Difficulty => &self.difficulty,
        }
    }
}

/// Scores questions against one immutable configuration.
///
/// Holds no mutable state, so a single scorer can be shared across
/// threads and tasks.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Run the four criteria. A math fault degrades that criterion to the
    /// configured fault score; the others are always evaluated.
    pub fn evaluate(&self, request: &ScoringRequest) -> Evaluation {
        let config = &self.config;
        let extraction = math::extract(&request.question_text);
        debug!(
            equations = extraction.equations.len(),
            integrals = extraction.integrals.len(),
            derivatives = extraction.derivatives.len(),
            "extracted mathematical expressions"
        );

        let mathematical = match evaluate_mathematical(request, &extraction, config) {
            Ok(result) => result,
            Err(fault) => {
                warn!(%fault, "mathematical correctness degraded");
                CriterionResult::degraded(
                    config.fault_score,
                    format!("Mathematical validation error: {fault}"),
                )
            }
        };

        Evaluation {
            mathematical,
            conceptual: evaluate_conceptual(&request.question_text, &request.subject, config),
            options: evaluate_options(request, config),
            difficulty: evaluate_difficulty(
                &request.question_text,
                &request.difficulty,
                extraction.expression_count(),
                config,
            ),
        }
    }

    /// Score one question. Never fails; malformed content only lowers scores.
    pub fn score(&self, request: &ScoringRequest) -> ScoringResponse {
        let span = debug_span!(
            "score",
            subject = %request.subject,
            topic = %request.topic,
            difficulty = %request.difficulty
        );
        let _guard = span.enter();

        let evaluation = self.evaluate(request);
        let weights = &self.config.weights;

        let contribution = WeightedContribution {
            mathematics: evaluation.mathematical.score * weights.mathematical,
            conceptual: evaluation.conceptual.score * weights.conceptual,
            options: evaluation.options.score * weights.options,
            difficulty: evaluation.difficulty.score * weights.difficulty,
        };
        let accuracy = contribution.total().clamp(0.0, 1.0);
        let confidence = confidence_for(accuracy, &self.config.confidence);
        debug!(accuracy, %confidence, "question scored");

        let mut validation_passed = Vec::new();
        let mut validation_failed = Vec::new();
        for criterion in Criterion::ALL {
            let result = evaluation.get(criterion);
            validation_passed.extend(result.passed.iter().cloned());
            validation_failed.extend(result.failed.iter().cloned());
        }

        let components = ComponentScores {
            mathematical_correctness: round3(evaluation.mathematical.score),
            conceptual_soundness: round3(evaluation.conceptual.score),
            option_plausibility: round3(evaluation.options.score),
            difficulty_appropriateness: round3(evaluation.difficulty.score),
        };

        ScoringResponse {
            accuracy_score: round3(accuracy),
            confidence_level: confidence,
            validation_passed,
            validation_failed,
            mathematical_correctness: components.mathematical_correctness,
            conceptual_soundness: components.conceptual_soundness,
            option_plausibility: components.option_plausibility,
            difficulty_appropriateness: components.difficulty_appropriateness,
            detailed_feedback: DetailedFeedback {
                component_scores: components,
                weighted_contribution: WeightedContribution {
                    mathematics: round3(contribution.mathematics),
                    conceptual: round3(contribution.conceptual),
                    options: round3(contribution.options),
                    difficulty: round3(contribution.difficulty),
                },
            },
        }
    }
}

/// Score one question with the built-in configuration.
pub fn score(
    question_text: &str,
    options: &[&str],
    correct_answer_index: usize,
    subject: &str,
    topic: &str,
    difficulty: &str,
) -> ScoringResponse {
    let request = ScoringRequest {
        question_text: question_text.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer_index,
        subject: subject.to_string(),
        topic: topic.to_string(),
        difficulty: difficulty.to_string(),
    };
    Scorer::default().score(&request)
}

/// Tier an unrounded accuracy score.
pub fn confidence_for(accuracy: f64, thresholds: &ConfidenceThresholds) -> ConfidenceLevel {
    if accuracy >= thresholds.high {
        ConfidenceLevel::High
    } else if accuracy >= thresholds.medium {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
