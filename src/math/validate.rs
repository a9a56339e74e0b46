use super::expr;

/// Whether an extracted expression parses as symbolic math.
///
/// Equations are split on the first `=` and both sides must parse. Anything
/// else must parse whole, optionally as a single `<`/`>` comparison.
pub fn is_valid_expression(expression: &str) -> bool {
    match expression.split_once('=') {
        Some((lhs, rhs)) => expr::parse(lhs.trim()).is_ok() && expr::parse(rhs.trim()).is_ok(),
        None => expr::check_statement(expression.trim()).is_ok(),
    }
}

/// Fraction of expressions that are valid; 1.0 when there are none.
pub fn validity_ratio<'a>(expressions: impl IntoIterator<Item = &'a str>) -> f64 {
    let (valid, total) = expressions
        .into_iter()
        .fold((0usize, 0usize), |(valid, total), e| {
            (valid + usize::from(is_valid_expression(e)), total + 1)
        });
    if total == 0 {
        1.0
    } else {
        valid as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_equation() {
        assert!(is_valid_expression("2x + 5 = 13"));
        assert!(is_valid_expression("y = x²"));
    }

    #[test]
    fn test_invalid_equation_side() {
        assert!(!is_valid_expression("y = 3x + 1, what is y when x = 2"));
        assert!(!is_valid_expression("x = "));
    }

    #[test]
    fn test_non_equations() {
        assert!(is_valid_expression("dy/dx"));
        assert!(is_valid_expression("y > 2x"));
        assert!(!is_valid_expression("∫ x² dx"));
        assert!(!is_valid_expression("x ≠ 5"));
    }

    #[test]
    fn test_validity_ratio() {
        assert_eq!(validity_ratio(Vec::<&str>::new()), 1.0);
        assert_eq!(validity_ratio(["x = 1", "∫ x dx"]), 0.5);
        assert_eq!(validity_ratio(["x = 1", "dy/dx"]), 1.0);
    }
}
