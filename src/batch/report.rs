use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scoring::{ConfidenceLevel, ScoringRequest, ScoringResponse};

/// One scored request, keyed by its position in the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub index: usize,
    pub request: ScoringRequest,
    pub response: ScoringResponse,
}

/// A request that failed its preconditions and was not scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRequest {
    pub index: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ConfidenceCounts {
    fn record(&mut self, level: ConfidenceLevel) {
        match level {
            ConfidenceLevel::High => self.high += 1,
            ConfidenceLevel::Medium => self.medium += 1,
            ConfidenceLevel::Low => self.low += 1,
        }
    }
}

/// Summary of a batch run, written as JSON with `--output`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub mean_accuracy: f64,
    pub confidence_counts: ConfidenceCounts,
    pub results: Vec<BatchEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedRequest>,
}

impl BatchReport {
    pub fn new(results: Vec<BatchEntry>, rejected: Vec<RejectedRequest>) -> Self {
        let mut confidence_counts = ConfidenceCounts::default();
        for entry in &results {
            confidence_counts.record(entry.response.confidence_level);
        }
        let total = results.len();
        let mean_accuracy = if total == 0 {
            0.0
        } else {
            let sum: f64 = results.iter().map(|e| e.response.accuracy_score).sum();
            (sum / total as f64 * 1000.0).round() / 1000.0
        };

        Self {
            generated_at: Utc::now(),
            total,
            mean_accuracy,
            confidence_counts,
            results,
            rejected,
        }
    }
}

/// Save a batch report as JSON atomically
///
/// Uses atomic-write-file so a reader never sees a half-written report.
pub fn save_report(path: &Path, report: &BatchReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize batch report")?;

    file.commit().context("Failed to save batch report")?;

    Ok(())
}
