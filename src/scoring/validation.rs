use super::config::ScoringConfig;
use super::range::RangeOp;
use crate::math::expr::is_reserved;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Weights
    let weights = [
        ("mathematical", config.weights.mathematical),
        ("conceptual", config.weights.conceptual),
        ("options", config.weights.options),
        ("difficulty", config.weights.difficulty),
    ];
    for (name, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            errors.push(format!("scoring.weights.{}: must be non-negative, got {}", name, weight));
        }
    }
    let sum = config.weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!("scoring.weights: must sum to 1.0, got {}", sum));
    }

    // Confidence thresholds
    let confidence = &config.confidence;
    for (name, value) in [("high", confidence.high), ("medium", confidence.medium)] {
        if !in_unit_interval(value) {
            errors.push(format!(
                "scoring.confidence.{}: must be within [0, 1], got {}",
                name, value
            ));
        }
    }
    if confidence.medium > confidence.high {
        errors.push(format!(
            "scoring.confidence: medium ({}) must not exceed high ({})",
            confidence.medium, confidence.high
        ));
    }

    // Difficulty ranges
    for (label, range) in &config.difficulty_ranges {
        match RangeOp::parse(range) {
            Ok(op) => {
                if op.bounds().iter().any(|b| !in_unit_interval(*b)) {
                    errors.push(format!(
                        "scoring.difficulty_ranges.{}: '{}' must lie within [0, 1]",
                        label, range
                    ));
                }
            }
            Err(e) => errors.push(format!(
                "scoring.difficulty_ranges.{}: invalid '{}' - {}",
                label, range, e
            )),
        }
    }

    // Vocabularies
    for (subject, keywords) in &config.subject_keywords {
        check_terms(&format!("scoring.subject_keywords.{}", subject), keywords, &mut errors);
    }
    check_terms("scoring.technical_terms", &config.technical_terms, &mut errors);
    check_terms("scoring.imperative_verbs", &config.imperative_verbs, &mut errors);
    for (i, [a, b]) in config.contradiction_pairs.iter().enumerate() {
        if a.trim().is_empty() || b.trim().is_empty() {
            errors.push(format!("scoring.contradiction_pairs[{}]: terms must not be blank", i));
        } else if a.eq_ignore_ascii_case(b) {
            errors.push(format!(
                "scoring.contradiction_pairs[{}]: '{}' is paired with itself",
                i, a
            ));
        }
    }

    // Solve variable
    if !is_identifier(&config.solve_variable) {
        errors.push(format!(
            "scoring.solve_variable: '{}' is not a variable name",
            config.solve_variable
        ));
    } else if is_reserved(&config.solve_variable) {
        errors.push(format!(
            "scoring.solve_variable: '{}' is a reserved constant or function",
            config.solve_variable
        ));
    }

    // Tunables
    for (name, value) in [
        ("equation_tolerance", config.equation_tolerance),
        ("length_variance_scale", config.length_variance_scale),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("scoring.{}: must be positive, got {}", name, value));
        }
    }
    for (name, value) in [
        ("indeterminate_score", config.indeterminate_score),
        ("missing_equation_penalty", config.missing_equation_penalty),
        ("fault_score", config.fault_score),
    ] {
        if !in_unit_interval(value) {
            errors.push(format!("scoring.{}: must be within [0, 1], got {}", name, value));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn in_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn check_terms(path: &str, terms: &[String], errors: &mut Vec<String>) {
    if terms.is_empty() {
        errors.push(format!("{}: must not be empty", path));
    }
    for (i, term) in terms.iter().enumerate() {
        if term.trim().is_empty() {
            errors.push(format!("{}[{}]: must not be blank", path, i));
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_for(config: &ScoringConfig) -> Vec<String> {
        validate_scoring(config).unwrap_err()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = ScoringConfig::default();
        config.weights.options = 0.3;
        let errors = errors_for(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("scoring.weights: must sum to 1.0"));
    }

    #[test]
    fn test_negative_weight() {
        let mut config = ScoringConfig::default();
        config.weights.mathematical = 0.6;
        config.weights.difficulty = -0.1;
        let errors = errors_for(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.weights.difficulty"));
    }

    #[test]
    fn test_thresholds() {
        let mut config = ScoringConfig::default();
        config.confidence.medium = 0.9;
        let errors = errors_for(&config);
        assert!(errors[0].contains("must not exceed high"));

        config.confidence.high = 1.5;
        let errors = errors_for(&config);
        assert!(errors[0].contains("scoring.confidence.high"));
    }

    #[test]
    fn test_invalid_difficulty_range() {
        let mut config = ScoringConfig::default();
        config.difficulty_ranges.insert("Easy".to_string(), "trivial".to_string());
        config.difficulty_ranges.insert("Hard".to_string(), "0.6-1.5".to_string());
        let errors = errors_for(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("scoring.difficulty_ranges.Easy: invalid 'trivial'"));
        assert!(errors[1].contains("must lie within [0, 1]"));
    }

    #[test]
    fn test_negative_range_bound() {
        let mut config = ScoringConfig::default();
        config.difficulty_ranges.insert("Easy".to_string(), "<=-0.2".to_string());
        let errors = errors_for(&config);
        assert!(errors[0].contains("scoring.difficulty_ranges.Easy"));
    }

    #[test]
    fn test_vocabularies() {
        let mut config = ScoringConfig::default();
        config.technical_terms.clear();
        config.imperative_verbs.push("  ".to_string());
        config
            .subject_keywords
            .insert("Biology".to_string(), Vec::new());
        config
            .contradiction_pairs
            .push(["rise".to_string(), "Rise".to_string()]);
        let errors = errors_for(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e == "scoring.subject_keywords.Biology: must not be empty"));
        assert!(errors.iter().any(|e| e == "scoring.technical_terms: must not be empty"));
        assert!(errors.iter().any(|e| e == "scoring.imperative_verbs[3]: must not be blank"));
        assert!(errors.iter().any(|e| e.contains("paired with itself")));
    }

    #[test]
    fn test_solve_variable() {
        let mut config = ScoringConfig::default();
        config.solve_variable = "t".to_string();
        assert!(validate_scoring(&config).is_ok());

        for bad in ["", "2x", "x y"] {
            config.solve_variable = bad.to_string();
            assert!(errors_for(&config)[0].contains("is not a variable name"), "{bad}");
        }

        config.solve_variable = "pi".to_string();
        assert!(errors_for(&config)[0].contains("reserved"));
    }

    #[test]
    fn test_tunables() {
        let mut config = ScoringConfig::default();
        config.equation_tolerance = 0.0;
        config.length_variance_scale = -1.0;
        config.indeterminate_score = 1.5;
        config.fault_score = f64::NAN;
        let errors = errors_for(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("equation_tolerance"));
        assert!(errors[3].contains("fault_score"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::default();
        config.weights.conceptual = 2.0;
        config.solve_variable = "1".to_string();
        config.fault_score = 2.0;
        let errors = errors_for(&config);
        assert_eq!(errors.len(), 3);
    }
}
