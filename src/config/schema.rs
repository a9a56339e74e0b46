use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Scoring configuration, or the built-in defaults when the file has none.
    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.scoring.is_none());
        assert_eq!(config.scoring(), ScoringConfig::default());
    }

    #[test]
    fn test_scoring_section_parse() {
        let yaml = r#"
scoring:
  weights:
    mathematical: 0.5
    conceptual: 0.2
  solve_variable: t
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let scoring = config.scoring();
        assert_eq!(scoring.weights.mathematical, 0.5);
        assert_eq!(scoring.weights.conceptual, 0.2);
        assert_eq!(scoring.solve_variable, "t");
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []");
        assert!(result.is_err());
    }
}
