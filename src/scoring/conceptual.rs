use std::collections::BTreeMap;

use tracing::debug;

use super::config::ScoringConfig;
use super::criterion::CriterionResult;

/// Relevance assumed for subjects with no keyword table.
const UNKNOWN_SUBJECT_RELEVANCE: f64 = 0.7;
/// Keyword hits needed for full relevance.
const FULL_RELEVANCE_MATCHES: f64 = 3.0;
const CONTRADICTION_SCORE: f64 = 0.3;
const CONSISTENT_SCORE: f64 = 0.9;

/// Clarity, subject relevance and logical consistency, multiplied together.
pub fn evaluate_conceptual(text: &str, subject: &str, config: &ScoringConfig) -> CriterionResult {
    let mut result = CriterionResult::start();

    let clarity = clarity_score(text);
    result.apply(clarity);
    result.check(clarity >= 0.8, "Question clarity", "Unclear question phrasing");

    let relevance = subject_relevance(text, subject, &config.subject_keywords);
    result.apply(relevance);
    result.check(
        relevance >= 0.9,
        "Subject relevance",
        "Question doesn't match subject/topic",
    );

    let consistency = logical_consistency(text, &config.contradiction_pairs);
    result.apply(consistency);
    result.check(
        consistency >= 0.9,
        "Logical consistency",
        "Logical inconsistencies detected",
    );

    debug!(clarity, relevance, consistency, score = result.score, "conceptual soundness scored");
    result
}

/// Sentence-length clarity with a penalty for non-interrogative phrasing.
///
/// Texts under 10 words (or with no sentence) start at 0.5; otherwise the
/// average words per `.`-separated sentence maps to 0.6 / 0.8 / 0.9. Either
/// way the result is multiplied by 0.8 when the text does not end with `?`.
pub fn clarity_score(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    let sentences = text.split('.').filter(|s| !s.trim().is_empty()).count();

    let base = if words < 10 || sentences == 0 {
        0.5
    } else {
        let avg_sentence_len = words as f64 / sentences as f64;
        if avg_sentence_len > 25.0 {
            0.6
        } else if avg_sentence_len > 15.0 {
            0.8
        } else {
            0.9
        }
    };

    if text.trim().ends_with('?') {
        base
    } else {
        base * 0.8
    }
}

/// Fraction of subject keywords present (capped at three hits).
pub fn subject_relevance(
    text: &str,
    subject: &str,
    keywords: &BTreeMap<String, Vec<String>>,
) -> f64 {
    let Some(keywords) = keywords.get(subject).filter(|k| !k.is_empty()) else {
        return UNKNOWN_SUBJECT_RELEVANCE;
    };
    let lower = text.to_lowercase();
    let matches = keywords
        .iter()
        .filter(|keyword| lower.contains(&keyword.to_lowercase()))
        .count();
    (matches as f64 / FULL_RELEVANCE_MATCHES).min(1.0)
}

/// Low score when both terms of any contradiction pair appear.
pub fn logical_consistency(text: &str, pairs: &[[String; 2]]) -> f64 {
    let lower = text.to_lowercase();
    let contradicted = pairs.iter().any(|[a, b]| {
        lower.contains(&a.to_lowercase()) && lower.contains(&b.to_lowercase())
    });
    if contradicted {
        CONTRADICTION_SCORE
    } else {
        CONSISTENT_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_non_question_gets_both_penalties() {
        assert!((clarity_score("Solve for x: 2x + 5 = 13") - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_short_question() {
        assert_eq!(clarity_score("What is 2 + 2?"), 0.5);
    }

    #[test]
    fn test_clear_question() {
        let text =
            "A ball is thrown upward with speed ten metres per second. How high does it rise?";
        assert_eq!(clarity_score(text), 0.9);
    }

    #[test]
    fn test_long_sentences() {
        let long = format!("{}?", vec!["word"; 30].join(" "));
        assert_eq!(clarity_score(&long), 0.6);
        let medium = format!("{}?", vec!["word"; 20].join(" "));
        assert_eq!(clarity_score(&medium), 0.8);
    }

    #[test]
    fn test_no_sentences() {
        let dots = ". . . . . . . . . . .";
        assert!((clarity_score(dots) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_subject_relevance() {
        let config = ScoringConfig::default();
        let keywords = &config.subject_keywords;
        assert_eq!(
            subject_relevance("Solve the equation and find x", "Mathematics", keywords),
            1.0
        );
        assert!((subject_relevance("Find x", "Mathematics", keywords) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(subject_relevance("FORCE ENERGY WAVE", "Physics", keywords), 1.0);
        assert_eq!(subject_relevance("anything", "History", keywords), 0.7);
        assert_eq!(subject_relevance("nothing relevant", "Chemistry", keywords), 0.0);
    }

    #[test]
    fn test_subject_lookup_is_exact() {
        let config = ScoringConfig::default();
        assert_eq!(subject_relevance("solve", "mathematics", &config.subject_keywords), 0.7);
    }

    #[test]
    fn test_logical_consistency() {
        let pairs = ScoringConfig::default().contradiction_pairs;
        assert_eq!(logical_consistency("Find the maximum value", &pairs), 0.9);
        assert_eq!(logical_consistency("Find the Maximum and MINIMUM", &pairs), 0.3);
        assert_eq!(logical_consistency("positive or negative roots", &pairs), 0.3);
    }

    #[test]
    fn test_alternate_vocabulary() {
        let pairs = vec![["always".to_string(), "never".to_string()]];
        assert_eq!(logical_consistency("It always and never holds", &pairs), 0.3);
        assert_eq!(logical_consistency("maximum minimum", &pairs), 0.9);
    }

    #[test]
    fn test_evaluate_conceptual_labels() {
        let config = ScoringConfig::default();
        let result = evaluate_conceptual("Solve for x: 2x + 5 = 13", "Mathematics", &config);
        // clarity 0.4, relevance 1/3, consistency 0.9
        assert!((result.score - 0.4 * (1.0 / 3.0) * 0.9).abs() < 1e-12);
        assert_eq!(result.passed, vec!["Logical consistency"]);
        assert_eq!(
            result.failed,
            vec!["Unclear question phrasing", "Question doesn't match subject/topic"]
        );
    }
}
