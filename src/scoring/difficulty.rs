use tracing::{debug, warn};

use super::config::ScoringConfig;
use super::criterion::CriterionResult;
use super::range::RangeOp;

const IN_RANGE_SCORE: f64 = 0.9;
const OUT_OF_RANGE_SCORE: f64 = 0.5;

/// Heuristic question complexity in [0, 1].
///
/// Sums three capped parts: word count (up to 0.3 at 30+ words), number of
/// mathematical expressions (up to 0.4 at 2+), and technical terms present
/// (up to 0.3 at 1+ with the default divisor of 3).
pub fn complexity(text: &str, expression_count: usize, technical_terms: &[String]) -> f64 {
    let words = text.split_whitespace().count() as f64;
    let lower = text.to_lowercase();
    let terms = technical_terms
        .iter()
        .filter(|term| lower.contains(&term.to_lowercase()))
        .count() as f64;

    let total = (words / 100.0).min(0.3)
        + (expression_count as f64 / 5.0).min(0.4)
        + (terms / 3.0).min(0.3);
    total.min(1.0)
}

/// Expected complexity range for a difficulty label. Unknown labels, and
/// ranges that fail to parse, accept everything.
pub fn expected_range(difficulty: &str, config: &ScoringConfig) -> RangeOp {
    let Some(range) = config.difficulty_ranges.get(difficulty) else {
        return RangeOp::FULL;
    };
    match RangeOp::parse(range) {
        Ok(op) => op,
        Err(e) => {
            warn!(difficulty, range = %range, error = %e, "unparseable difficulty range");
            RangeOp::FULL
        }
    }
}

pub fn evaluate_difficulty(
    text: &str,
    difficulty: &str,
    expression_count: usize,
    config: &ScoringConfig,
) -> CriterionResult {
    let complexity = complexity(text, expression_count, &config.technical_terms);
    let range = expected_range(difficulty, config);
    debug!(complexity, difficulty, ?range, "difficulty complexity estimated");

    if range.matches(complexity) {
        let mut result = CriterionResult::fixed(IN_RANGE_SCORE);
        result.pass("Difficulty level appropriate");
        result
    } else {
        CriterionResult::degraded(
            OUT_OF_RANGE_SCORE,
            format!("Question complexity ({complexity:.2}) doesn't match {difficulty} level"),
        )
    }
}
