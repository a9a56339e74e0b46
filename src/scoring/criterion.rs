use std::fmt;

use serde::{Deserialize, Serialize};

/// The four independently scored dimensions, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Mathematical,
    Conceptual,
    Options,
    Difficulty,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Mathematical,
        Criterion::Conceptual,
        Criterion::Options,
        Criterion::Difficulty,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Mathematical => "Mathematical correctness",
            Criterion::Conceptual => "Conceptual soundness",
            Criterion::Options => "Option plausibility",
            Criterion::Difficulty => "Difficulty appropriateness",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Score of one criterion plus the names of the checks that passed and failed.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionResult {
    pub score: f64,
    pub passed: Vec<String>,
    pub failed: Vec<String>,
}

impl CriterionResult {
    /// Start of a conjunctive evaluation: full score, no checks yet.
    pub fn start() -> Self {
        Self {
            score: 1.0,
            passed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Fixed score with no checks run.
    pub fn fixed(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            passed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Replacement result for a criterion whose evaluation faulted.
    pub fn degraded(score: f64, label: impl Into<String>) -> Self {
        let mut result = Self::fixed(score);
        result.fail(label);
        result
    }

    /// Multiply a stage factor into the score, clamping to [0, 1].
    pub fn apply(&mut self, factor: f64) {
        self.score = (self.score * factor).clamp(0.0, 1.0);
    }

    pub fn pass(&mut self, label: impl Into<String>) {
        self.passed.push(label.into());
    }

    pub fn fail(&mut self, label: impl Into<String>) {
        self.failed.push(label.into());
    }

    /// Record a labelled check outcome.
    pub fn check(&mut self, ok: bool, pass_label: &str, fail_label: impl Into<String>) {
        if ok {
            self.pass(pass_label);
        } else {
            self.fail(fail_label);
        }
    }
}
