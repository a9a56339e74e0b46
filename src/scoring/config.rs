use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Holds the weight table and every vocabulary the heuristics consult, so
/// alternate keyword sets can be tested without touching the scorers. All
/// fields have defaults; a partial file overrides only what it names.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     mathematical: 0.5
///     conceptual: 0.3
///     options: 0.1
///     difficulty: 0.1
///   technical_terms: [integral, derivative, matrix, vector, probability, limit]
///   difficulty_ranges:
///     Easy: "<=0.4"
///     Hard: ">=0.6"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight of each criterion in the final score; must sum to 1.0
    pub weights: CriterionWeights,

    /// Score thresholds for the high and medium confidence tiers
    pub confidence: ConfidenceThresholds,

    /// Relevance keywords per subject, matched case-insensitively
    pub subject_keywords: BTreeMap<String, Vec<String>>,

    /// Term pairs whose co-occurrence suggests a contradiction
    pub contradiction_pairs: Vec<[String; 2]>,

    /// Jargon counted toward the complexity estimate
    pub technical_terms: Vec<String>,

    /// Verbs that mark a question as expecting an equation
    pub imperative_verbs: Vec<String>,

    /// Subjects penalised when they ask to solve but carry no equation
    pub equation_subjects: Vec<String>,

    /// Subjects whose equations get the explicit solution check
    pub verification_subjects: Vec<String>,

    /// Free variable the correct answer is substituted for
    pub solve_variable: String,

    /// Expected complexity range per difficulty label (see `RangeOp`)
    pub difficulty_ranges: BTreeMap<String, String>,

    /// Maximum |lhs - rhs| for an equation to count as satisfied
    pub equation_tolerance: f64,

    /// Divisor applied to option-length variance before capping the penalty
    pub length_variance_scale: f64,

    /// Verification ratio used when the answer cannot be substituted
    pub indeterminate_score: f64,

    /// Multiplier for questions that ask to solve without any equation
    pub missing_equation_penalty: f64,

    /// Mathematical correctness score after an internal fault
    pub fault_score: f64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let subject_keywords = BTreeMap::from([
            (
                "Mathematics".to_string(),
                strings(&["calculate", "solve", "find", "equation", "integral", "derivative"]),
            ),
            (
                "Physics".to_string(),
                strings(&["force", "energy", "velocity", "acceleration", "field", "wave"]),
            ),
            (
                "Chemistry".to_string(),
                strings(&["reaction", "compound", "element", "bond", "mole", "solution"]),
            ),
        ]);

        let difficulty_ranges = BTreeMap::from([
            ("Easy".to_string(), "0.0-0.4".to_string()),
            ("Medium".to_string(), "0.3-0.7".to_string()),
            ("Hard".to_string(), "0.6-1.0".to_string()),
        ]);

        Self {
            weights: CriterionWeights::default(),
            confidence: ConfidenceThresholds::default(),
            subject_keywords,
            contradiction_pairs: vec![
                ["maximum".to_string(), "minimum".to_string()],
                ["increasing".to_string(), "decreasing".to_string()],
                ["positive".to_string(), "negative".to_string()],
            ],
            technical_terms: strings(&[
                "integral",
                "derivative",
                "matrix",
                "vector",
                "probability",
            ]),
            imperative_verbs: strings(&["solve", "find", "calculate"]),
            equation_subjects: strings(&["Mathematics"]),
            verification_subjects: strings(&["Mathematics", "Physics"]),
            solve_variable: "x".to_string(),
            difficulty_ranges,
            equation_tolerance: 1e-10,
            length_variance_scale: 100.0,
            indeterminate_score: 0.5,
            missing_equation_penalty: 0.6,
            fault_score: 0.3,
        }
    }
}

/// Criterion weights.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CriterionWeights {
    pub mathematical: f64,
    pub conceptual: f64,
    pub options: f64,
    pub difficulty: f64,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            mathematical: 0.4,
            conceptual: 0.3,
            options: 0.2,
            difficulty: 0.1,
        }
    }
}

impl CriterionWeights {
    pub fn sum(&self) -> f64 {
        self.mathematical + self.conceptual + self.options + self.difficulty
    }
}

/// Confidence tier thresholds; scores at or above `high` are "high", at or
/// above `medium` are "medium", anything else "low".
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.85,
            medium: 0.70,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.weights.mathematical, 0.4);
        assert_eq!(config.weights.difficulty, 0.1);
        assert!((config.weights.sum() - 1.0).abs() < 1e-12);
        assert_eq!(config.confidence.high, 0.85);
        assert_eq!(config.subject_keywords.len(), 3);
        assert_eq!(config.contradiction_pairs.len(), 3);
        assert_eq!(config.solve_variable, "x");
        assert_eq!(config.difficulty_ranges.get("Medium"), Some(&"0.3-0.7".to_string()));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
weights:
  mathematical: 0.5
  options: 0.1
technical_terms: [integral, limit]
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.weights.mathematical, 0.5);
        assert_eq!(config.weights.options, 0.1);
        // Unnamed weights keep their defaults
        assert_eq!(config.weights.conceptual, 0.3);
        assert_eq!(config.technical_terms, vec!["integral", "limit"]);
        assert_eq!(config.imperative_verbs, vec!["solve", "find", "calculate"]);
    }

    #[test]
    fn test_contradiction_pairs_parse() {
        let yaml = r#"
contradiction_pairs:
  - [always, never]
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.contradiction_pairs,
            vec![["always".to_string(), "never".to_string()]]
        );
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str("base_score: 100");
        assert!(result.is_err());
    }
}
