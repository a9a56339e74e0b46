use std::collections::HashSet;

use tracing::debug;

use super::config::ScoringConfig;
use super::criterion::CriterionResult;
use super::types::ScoringRequest;

/// Cap on the length-variance penalty.
const MAX_LENGTH_PENALTY: f64 = 0.5;

/// Option uniqueness, length consistency and correct-answer plausibility.
pub fn evaluate_options(request: &ScoringRequest, config: &ScoringConfig) -> CriterionResult {
    let options = &request.options;
    let mut result = CriterionResult::start();

    let uniqueness = uniqueness_score(options);
    result.apply(uniqueness);
    result.check(uniqueness == 1.0, "Option uniqueness", "Duplicate options found");

    let length = length_consistency(options, config.length_variance_scale);
    result.apply(length);
    result.check(
        length >= 0.9,
        "Option length consistency",
        "Inconsistent option lengths",
    );

    let plausibility = answer_plausibility(request.correct_answer(), options);
    result.apply(plausibility);
    result.check(
        plausibility >= 0.8,
        "Correct answer plausibility",
        "Correct answer seems implausible",
    );

    debug!(uniqueness, length, plausibility, score = result.score, "option plausibility scored");
    result
}

/// Distinct options over total options; 0.0 with no options.
pub fn uniqueness_score(options: &[String]) -> f64 {
    if options.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&str> = options.iter().map(String::as_str).collect();
    distinct.len() as f64 / options.len() as f64
}

/// `1 - min(variance / scale, 0.5)` over trimmed option lengths.
pub fn length_consistency(options: &[String], scale: f64) -> f64 {
    if options.is_empty() {
        return 1.0;
    }
    let lengths: Vec<f64> = options
        .iter()
        .map(|option| option.trim().chars().count() as f64)
        .collect();
    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<f64>() / n;
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
    1.0 - (variance / scale).min(MAX_LENGTH_PENALTY)
}

/// 0.1 for a blank or missing correct option, 0.9 when every option is
/// distinct, otherwise 0.7.
pub fn answer_plausibility(correct: Option<&str>, options: &[String]) -> f64 {
    match correct {
        Some(answer) if !answer.trim().is_empty() => {
            if uniqueness_score(options) == 1.0 {
                0.9
            } else {
                0.7
            }
        }
        _ => 0.1,
    }
}
