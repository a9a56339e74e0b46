use thiserror::Error;
use tracing::debug;

use super::config::ScoringConfig;
use super::criterion::CriterionResult;
use super::types::ScoringRequest;
use crate::math::{self, Extraction, Verification};

/// Internal fault while scoring mathematical correctness. The aggregator
/// replaces the criterion with a fixed degraded score when one occurs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathFault {
    #[error("correct answer index {index} is outside the {options} options")]
    MissingCorrectOption { index: usize, options: usize },
    #[error("score became non-finite after {stage}")]
    NonFiniteScore { stage: &'static str },
}

/// Score equation satisfaction, expression validity and solution
/// verification as one conjunctive criterion.
pub fn evaluate_mathematical(
    request: &ScoringRequest,
    extraction: &Extraction,
    config: &ScoringConfig,
) -> Result<CriterionResult, MathFault> {
    let answer = request
        .correct_answer()
        .ok_or(MathFault::MissingCorrectOption {
            index: request.correct_answer_index,
            options: request.options.len(),
        })?;

    let subject = request.subject.as_str();
    let text = request.question_text.as_str();
    let has_equations = !extraction.equations.is_empty();
    let mut result = CriterionResult::start();

    let verification = math::verify(
        &extraction.equations,
        answer,
        &config.solve_variable,
        config.equation_tolerance,
    );
    if let Verification::Indeterminate { reason } = &verification {
        debug!(%reason, "equation verification indeterminate");
    }
    let satisfaction = verification.ratio(config.indeterminate_score);

    if has_equations {
        result.apply(satisfaction);
        result.check(
            satisfaction >= 0.8,
            "Equation parsing and solving",
            "Equation validation",
        );
    } else if contains(&config.equation_subjects, subject)
        && config.imperative_verbs.iter().any(|verb| text.contains(verb.as_str()))
    {
        result.fail("Mathematical question lacks equations");
        result.apply(config.missing_equation_penalty);
    }
    ensure_finite(&result, "equation check")?;

    let validity = math::validity_ratio(extraction.expressions());
    result.apply(validity);
    result.check(
        validity >= 0.8,
        "Mathematical expression validity",
        "Invalid mathematical expressions",
    );
    ensure_finite(&result, "expression validity")?;

    if has_equations && contains(&config.verification_subjects, subject) {
        result.apply(satisfaction);
        result.check(
            satisfaction >= 0.9,
            "Solution verification",
            "Solution doesn't satisfy equations",
        );
        ensure_finite(&result, "solution verification")?;
    }

    debug!(
        equations = extraction.equations.len(),
        satisfaction,
        validity,
        score = result.score,
        "mathematical correctness scored"
    );
    Ok(result)
}

fn contains(items: &[String], value: &str) -> bool {
    items.iter().any(|item| item == value)
}

fn ensure_finite(result: &CriterionResult, stage: &'static str) -> Result<(), MathFault> {
    if result.score.is_finite() {
        Ok(())
    } else {
        Err(MathFault::NonFiniteScore { stage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::extract;

    fn request(text: &str, options: &[&str], correct: usize, subject: &str) -> ScoringRequest {
        ScoringRequest {
            question_text: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_index: correct,
            subject: subject.to_string(),
            topic: "Algebra".to_string(),
            difficulty: "Easy".to_string(),
        }
    }

    fn evaluate(
        req: &ScoringRequest,
        config: &ScoringConfig,
    ) -> Result<CriterionResult, MathFault> {
        evaluate_mathematical(req, &extract(&req.question_text), config)
    }

    #[test]
    fn test_verified_linear_equation() {
        let req = request("Solve for x: 2x + 5 = 13", &["4", "5", "6", "7"], 0, "Mathematics");
        let result = evaluate(&req, &ScoringConfig::default()).unwrap();
        assert_eq!(result.score, 1.0);
        assert_eq!(
            result.passed,
            vec![
                "Equation parsing and solving",
                "Mathematical expression validity",
                "Solution verification"
            ]
        );
        assert!(result.failed.is_empty());
    }

    #[test]
    fn test_signed_and_decimal_equations_verified() {
        let cases = [
            ("Solve for x: -2x + 1 = 7", "-3"),
            ("Solve for x: −x = 3", "-3"),
            ("Solve for x: 0.5x = 2", "4"),
        ];
        for (text, answer) in cases {
            let req = request(text, &[answer, "1"], 0, "Mathematics");
            let result = evaluate(&req, &ScoringConfig::default()).unwrap();
            assert_eq!(result.score, 1.0, "{text}");
            assert!(result.failed.is_empty(), "{text}: {:?}", result.failed);
        }
    }

    #[test]
    fn test_wrong_answer_fails_both_checks() {
        let req = request("Solve for x: 2x + 5 = 13", &["4", "5", "6", "7"], 1, "Mathematics");
        let result = evaluate(&req, &ScoringConfig::default()).unwrap();
        assert_eq!(result.score, 0.0);
        assert!(result.failed.contains(&"Equation validation".to_string()));
        assert!(result.failed.contains(&"Solution doesn't satisfy equations".to_string()));
    }

    #[test]
    fn test_indeterminate_answer_applied_twice() {
        let req = request("Solve for x: 2x + 5 = 13", &["four", "five"], 0, "Mathematics");
        let result = evaluate(&req, &ScoringConfig::default()).unwrap();
        // 0.5 for the equation check, 1.0 validity, 0.5 again for verification
        assert!((result.score - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_verification_only_for_configured_subjects() {
        let req = request("Solve for x: 2x + 5 = 13", &["four", "five"], 0, "Chemistry");
        let result = evaluate(&req, &ScoringConfig::default()).unwrap();
        assert!((result.score - 0.5).abs() < 1e-12);
        assert!(!result.passed.iter().any(|l| l == "Solution verification"));
        assert!(!result.failed.iter().any(|l| l == "Solution doesn't satisfy equations"));
    }

    #[test]
    fn test_missing_equation_penalty() {
        let req = request("Please solve the puzzle about apples", &["1", "2"], 0, "Mathematics");
        let result = evaluate(&req, &ScoringConfig::default()).unwrap();
        assert!((result.score - 0.6).abs() < 1e-12);
        assert_eq!(result.failed, vec!["Mathematical question lacks equations"]);
        assert_eq!(result.passed, vec!["Mathematical expression validity"]);
    }

    #[test]
    fn test_penalty_applied_before_validity() {
        // No equation, one invalid integral: 0.6 penalty, then validity 0.0
        let req = request("Calculate ∫ sin x dx please", &["1", "2"], 0, "Mathematics");
        let mut config = ScoringConfig::default();
        config.imperative_verbs = vec!["Calculate".to_string()];
        let result = evaluate(&req, &config).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.failed,
            vec!["Mathematical question lacks equations", "Invalid mathematical expressions"]
        );
    }

    #[test]
    fn test_imperative_match_is_case_sensitive() {
        let req = request(
            "Find the derivative of x² with respect to x",
            &["2x", "x"],
            0,
            "Mathematics",
        );
        let result = evaluate(&req, &ScoringConfig::default()).unwrap();
        assert_eq!(result.score, 1.0);
        assert!(result.failed.is_empty());
    }

    #[test]
    fn test_no_penalty_outside_equation_subjects() {
        let req = request("Find the force and solve it", &["1", "2"], 0, "Physics");
        let result = evaluate(&req, &ScoringConfig::default()).unwrap();
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_missing_correct_option_is_a_fault() {
        let req = request("Solve for x: 2x + 5 = 13", &["4", "5"], 7, "Mathematics");
        let fault = evaluate(&req, &ScoringConfig::default()).unwrap_err();
        assert_eq!(fault, MathFault::MissingCorrectOption { index: 7, options: 2 });
        assert!(fault.to_string().contains("index 7"));
    }

    #[test]
    fn test_non_finite_config_is_a_fault() {
        let req = request("Solve for x: 2x + 5 = 13", &["four", "five"], 0, "Mathematics");
        let mut config = ScoringConfig::default();
        config.indeterminate_score = f64::NAN;
        let fault = evaluate(&req, &config).unwrap_err();
        assert_eq!(fault, MathFault::NonFiniteScore { stage: "equation check" });
    }
}
