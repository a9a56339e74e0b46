use thiserror::Error;

use super::expr::{self, EvalError, ExprError};

/// Outcome of substituting the claimed answer into extracted equations.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    /// Nothing to verify.
    NoEquations,
    /// Every equation could be evaluated; `satisfied` of `total` held.
    Checked { satisfied: usize, total: usize },
    /// The answer or an equation could not be parsed or evaluated.
    Indeterminate { reason: String },
}

impl Verification {
    /// Satisfaction ratio. Indeterminate outcomes map to `indeterminate_score`,
    /// which signals "could not verify" rather than "partly wrong".
    pub fn ratio(&self, indeterminate_score: f64) -> f64 {
        match self {
            Verification::NoEquations => 1.0,
            Verification::Checked { total: 0, .. } => 1.0,
            Verification::Checked { satisfied, total } => *satisfied as f64 / *total as f64,
            Verification::Indeterminate { .. } => indeterminate_score,
        }
    }
}

#[derive(Debug, Error)]
enum VerifyError {
    #[error("answer '{answer}' does not parse: {source}")]
    AnswerParse { answer: String, source: ExprError },
    #[error("answer '{answer}' is not numeric: {source}")]
    AnswerValue { answer: String, source: EvalError },
    #[error("equation '{equation}' does not parse: {source}")]
    EquationParse { equation: String, source: ExprError },
    #[error("equation '{equation}' cannot be evaluated: {source}")]
    EquationValue { equation: String, source: EvalError },
}

/// Substitute `answer` for `variable` in every equation and count the ones
/// whose sides agree within `tolerance`. Relations other than `=` count
/// toward the total but are never satisfied.
pub fn verify(
    equations: &[String],
    answer: &str,
    variable: &str,
    tolerance: f64,
) -> Verification {
    if equations.is_empty() {
        return Verification::NoEquations;
    }
    match check_all(equations, answer, variable, tolerance) {
        Ok(satisfied) => Verification::Checked {
            satisfied,
            total: equations.len(),
        },
        Err(e) => Verification::Indeterminate {
            reason: e.to_string(),
        },
    }
}

fn check_all(
    equations: &[String],
    answer: &str,
    variable: &str,
    tolerance: f64,
) -> Result<usize, VerifyError> {
    let answer = answer.trim();
    let value = expr::parse(answer)
        .map_err(|source| VerifyError::AnswerParse {
            answer: answer.to_string(),
            source,
        })?
        .eval_constant()
        .map_err(|source| VerifyError::AnswerValue {
            answer: answer.to_string(),
            source,
        })?;

    let mut satisfied = 0;
    for equation in equations {
        let Some((lhs, rhs)) = equation.split_once('=') else {
            continue;
        };
        let side = |text: &str| -> Result<f64, VerifyError> {
            expr::parse(text.trim())
                .map_err(|source| VerifyError::EquationParse {
                    equation: equation.clone(),
                    source,
                })?
                .eval_at(variable, value)
                .map_err(|source| VerifyError::EquationValue {
                    equation: equation.clone(),
                    source,
                })
        };
        let (l, r) = (side(lhs)?, side(rhs)?);
        if (l - r).abs() < tolerance {
            satisfied += 1;
        }
    }
    Ok(satisfied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eqs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_answer_satisfies_equation() {
        let result = verify(&eqs(&["2x + 5 = 13"]), "4", "x", 1e-10);
        assert_eq!(result, Verification::Checked { satisfied: 1, total: 1 });
        assert_eq!(result.ratio(0.5), 1.0);
    }

    #[test]
    fn test_wrong_answer() {
        let result = verify(&eqs(&["2x + 5 = 13"]), "5", "x", 1e-10);
        assert_eq!(result, Verification::Checked { satisfied: 0, total: 1 });
        assert_eq!(result.ratio(0.5), 0.0);
    }

    #[test]
    fn test_answer_may_be_an_expression() {
        let result = verify(&eqs(&["x² = 16"]), "2*2", "x", 1e-10);
        assert_eq!(result.ratio(0.5), 1.0);
    }

    #[test]
    fn test_non_equality_relations_never_satisfied() {
        let result = verify(&eqs(&["x = 4", "x > 2"]), "4", "x", 1e-10);
        assert_eq!(result, Verification::Checked { satisfied: 1, total: 2 });
        assert_eq!(result.ratio(0.5), 0.5);
    }

    #[test]
    fn test_non_numeric_answer_is_indeterminate() {
        let result = verify(&eqs(&["2x + 5 = 13"]), "2x", "x", 1e-10);
        assert!(matches!(result, Verification::Indeterminate { .. }));
        assert_eq!(result.ratio(0.5), 0.5);

        let result = verify(&eqs(&["2x + 5 = 13"]), "four", "x", 1e-10);
        assert!(matches!(result, Verification::Indeterminate { .. }));
    }

    #[test]
    fn test_unparseable_equation_is_indeterminate() {
        let result = verify(&eqs(&["x = 3x + 1, what is y"]), "2", "x", 1e-10);
        match result {
            Verification::Indeterminate { reason } => assert!(reason.contains("does not parse")),
            other => panic!("expected indeterminate, got {:?}", other),
        }
    }

    #[test]
    fn test_other_free_variable_is_indeterminate() {
        let result = verify(&eqs(&["x + y = 3"]), "1", "x", 1e-10);
        assert!(matches!(result, Verification::Indeterminate { .. }));
    }

    #[test]
    fn test_custom_variable() {
        let result = verify(&eqs(&["3t = 12"]), "4", "t", 1e-10);
        assert_eq!(result.ratio(0.5), 1.0);
    }

    #[test]
    fn test_no_equations() {
        assert_eq!(verify(&[], "anything", "x", 1e-10), Verification::NoEquations);
        assert_eq!(Verification::NoEquations.ratio(0.5), 1.0);
    }
}
