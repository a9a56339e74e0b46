use crate::scoring::ScoringRequest;

fn request(
    question_text: &str,
    options: &[&str],
    correct_answer_index: usize,
    subject: &str,
    topic: &str,
    difficulty: &str,
) -> ScoringRequest {
    ScoringRequest {
        question_text: question_text.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer_index,
        subject: subject.to_string(),
        topic: topic.to_string(),
        difficulty: difficulty.to_string(),
    }
}

/// Built-in questions for smoke-testing a configuration.
pub fn sample_requests() -> Vec<ScoringRequest> {
    vec![
        request(
            "Solve for x: 2x + 5 = 13",
            &["4", "5", "6", "7"],
            0,
            "Mathematics",
            "Algebra",
            "Easy",
        ),
        request(
            "Find the derivative of x² with respect to x",
            &["2x", "x", "2", "x²"],
            0,
            "Mathematics",
            "Calculus",
            "Easy",
        ),
        request(
            "A spring stretches x cm under a load, where 4x = 12. \
             What is the extension of the spring in cm?",
            &["3", "4", "8", "48"],
            0,
            "Physics",
            "Mechanics",
            "Medium",
        ),
        request(
            "In a combustion reaction, which element from the air bonds with the \
             compound being burned?",
            &["Oxygen", "Nitrogen", "Argon", "Helium"],
            0,
            "Chemistry",
            "Reactions",
            "Easy",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Scorer;

    #[test]
    fn test_samples_satisfy_preconditions() {
        for request in sample_requests() {
            assert!(request.validate().is_ok(), "{}", request.question_text);
        }
    }

    #[test]
    fn test_samples_score_within_bounds() {
        let scorer = Scorer::default();
        for request in sample_requests() {
            let response = scorer.score(&request);
            assert!((0.0..=1.0).contains(&response.accuracy_score));
        }
    }

    #[test]
    fn test_linear_and_derivative_sample_scores() {
        let scorer = Scorer::default();
        let samples = sample_requests();
        assert_eq!(scorer.score(&samples[0]).accuracy_score, 0.706);
        assert_eq!(scorer.score(&samples[1]).accuracy_score, 0.702);
    }
}
