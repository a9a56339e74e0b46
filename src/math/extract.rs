use std::sync::LazyLock;

use regex::Regex;

use super::expr;

// A `.` belongs to the math only when a digit follows it; otherwise it ends
// the sentence.
static RELATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<lhs>(?:[\p{L}0-9(+\-−]|\.[0-9])",
        r"(?:[\p{L}0-9_+\-*/\^()¹²³⁰⁴-⁹⁻×÷·− \t]|\.[0-9])*?)",
        r"[ \t]*(?P<op>[=≠≈<>≤≥])[ \t]*",
        r"(?P<rhs>(?:[^?.]|\.[0-9])+)",
    ))
    .expect("relation pattern is valid")
});

static INTEGRAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"∫[^?]+d[a-zA-Z]").expect("integral pattern is valid"));

static DERIVATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"d[a-zA-Z]/d[a-zA-Z]").expect("derivative pattern is valid"));

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("word pattern is valid"));

/// Mathematical notation found in a question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub equations: Vec<String>,
    pub integrals: Vec<String>,
    pub derivatives: Vec<String>,
}

impl Extraction {
    /// Equations, then integrals, then derivatives.
    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        self.equations
            .iter()
            .chain(&self.integrals)
            .chain(&self.derivatives)
            .map(String::as_str)
    }

    pub fn expression_count(&self) -> usize {
        self.equations.len() + self.integrals.len() + self.derivatives.len()
    }
}

/// Scan question text for equations, integrals and derivatives.
pub fn extract(text: &str) -> Extraction {
    Extraction {
        equations: extract_equations(text),
        integrals: INTEGRAL
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
        derivatives: DERIVATIVE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
    }
}

/// Relations of the form `<lhs> <op> <rhs>` where the right-hand side runs to
/// the next `.` or `?`. Prose leading into the left-hand side is dropped and
/// a left-hand side without any letter is not treated as an equation.
pub fn extract_equations(text: &str) -> Vec<String> {
    RELATION
        .captures_iter(text)
        .filter_map(|caps| {
            let lhs = math_tail(caps.name("lhs")?.as_str());
            if !lhs.chars().any(char::is_alphabetic) {
                return None;
            }
            let op = caps.name("op")?.as_str();
            let rhs = caps.name("rhs")?.as_str().trim();
            Some(format!("{} {} {}", lhs, op, rhs).trim_end().to_string())
        })
        .collect()
}

/// Trailing run of words that are not plain prose ("If y" -> "y").
fn math_tail(lhs: &str) -> &str {
    let mut start = None;
    let words: Vec<_> = WORD.find_iter(lhs).collect();
    for word in words.into_iter().rev() {
        if is_prose_word(word.as_str()) {
            break;
        }
        start = Some(word.start());
    }
    start.map_or("", |s| lhs[s..].trim_end())
}

fn is_prose_word(word: &str) -> bool {
    word.chars().count() >= 2 && word.chars().all(char::is_alphabetic) && !expr::is_reserved(word)
}
