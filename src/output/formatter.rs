use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::batch::BatchReport;
use crate::scoring::{ConfidenceLevel, Criterion, ScoringRequest, ScoringResponse};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report or table
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// Tab-separated values for scripting
    Tsv,
}

/// A question with its scoring result, for display
pub struct ScoredQuestion<'a> {
    pub request: &'a ScoringRequest,
    pub response: &'a ScoringResponse,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with three decimals ("0.706")
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

fn format_confidence(level: ConfidenceLevel, use_colors: bool) -> String {
    if !use_colors {
        return level.to_string();
    }
    match level {
        ConfidenceLevel::High => level.green().to_string(),
        ConfidenceLevel::Medium => level.yellow().to_string(),
        ConfidenceLevel::Low => level.red().to_string(),
    }
}

/// Serialize any result as pretty JSON
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result as JSON")
}

/// Format a single scored question as a multi-line report
pub fn format_report(scored: &ScoredQuestion, use_colors: bool) -> String {
    let request = scored.request;
    let response = scored.response;
    let components = &response.detailed_feedback.component_scores;
    let weighted = &response.detailed_feedback.weighted_contribution;

    let mut lines = Vec::new();
    if use_colors {
        lines.push(request.question_text.bold().to_string());
    } else {
        lines.push(request.question_text.clone());
    }
    lines.push(format!(
        "  {} / {} / {}",
        request.subject, request.topic, request.difficulty
    ));
    lines.push(format!(
        "  Accuracy: {} ({})",
        format_score(response.accuracy_score),
        format_confidence(response.confidence_level, use_colors)
    ));
    lines.push(String::new());

    let rows = [
        (Criterion::Mathematical, components.mathematical_correctness, weighted.mathematics),
        (Criterion::Conceptual, components.conceptual_soundness, weighted.conceptual),
        (Criterion::Options, components.option_plausibility, weighted.options),
        (Criterion::Difficulty, components.difficulty_appropriateness, weighted.difficulty),
    ];
    for (criterion, score, contribution) in rows {
        lines.push(format!(
            "  {:<28}{}  (+{})",
            criterion.label(),
            format_score(score),
            format_score(contribution)
        ));
    }

    if !response.validation_passed.is_empty() {
        lines.push(String::new());
        lines.push("  Passed:".to_string());
        for label in &response.validation_passed {
            if use_colors {
                lines.push(format!("    {} {}", "✓".green(), label));
            } else {
                lines.push(format!("    ✓ {}", label));
            }
        }
    }
    if !response.validation_failed.is_empty() {
        lines.push(String::new());
        lines.push("  Failed:".to_string());
        for label in &response.validation_failed {
            if use_colors {
                lines.push(format!("    {} {}", "✗".red(), label));
            } else {
                lines.push(format!("    ✗ {}", label));
            }
        }
    }

    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format scored questions as a table: Index, Score, Confidence, Question
/// Index column: 3 chars (fits "99."), right-aligned
/// Confidence column is left-aligned, 6 chars wide (fits "medium")
pub fn format_scored_table(questions: &[ScoredQuestion], use_colors: bool) -> String {
    if questions.is_empty() {
        return "No questions to score.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 5;
    let confidence_width = 6;
    let separator = "  ";
    let fixed_width = index_width + 1 + score_width + separator.len() * 2 + confidence_width;

    questions
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(scored.response.accuracy_score);
            let level = scored.response.confidence_level;
            let confidence_pad = " ".repeat(confidence_width - level.as_str().len());

            // One line per question; newlines in the text would break the table
            let text = scored.request.question_text.replace('\n', " ");
            let question = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(&text, width - fixed_width)
                }
                Some(_) => truncate_text(&text, 20),
                None => text,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    format_confidence(level, true),
                    confidence_pad,
                    separator,
                    question
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str, score_str, separator, level, confidence_pad, separator, question
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format scored questions as tab-separated values for scripting
/// Columns: score, confidence, passed count, failed count, question (no headers, no colors)
pub fn format_tsv(questions: &[ScoredQuestion]) -> String {
    questions
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                format_score(scored.response.accuracy_score),
                scored.response.confidence_level,
                scored.response.validation_passed.len(),
                scored.response.validation_failed.len(),
                scored.request.question_text.replace(['\t', '\n'], " ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary of a batch run
pub fn format_batch_summary(report: &BatchReport, use_colors: bool) -> String {
    let counts = &report.confidence_counts;
    let mean = format_score(report.mean_accuracy);
    let mean = if use_colors { mean.bold().to_string() } else { mean };
    format!(
        "{} questions, mean accuracy {} (high {}, medium {}, low {})",
        report.total, mean, counts.high, counts.medium, counts.low
    )
}
