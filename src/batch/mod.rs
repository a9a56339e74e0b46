mod report;

pub use report::{save_report, BatchEntry, BatchReport, ConfidenceCounts, RejectedRequest};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::scoring::{Scorer, ScoringRequest};

/// Split requests into those that may be scored and those that violate
/// preconditions, keeping each request's input position.
pub fn partition_requests(
    requests: Vec<ScoringRequest>,
) -> (Vec<(usize, ScoringRequest)>, Vec<RejectedRequest>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    for (index, request) in requests.into_iter().enumerate() {
        match request.validate() {
            Ok(()) => valid.push((index, request)),
            Err(errors) => rejected.push(RejectedRequest { index, errors }),
        }
    }
    (valid, rejected)
}

/// Score every request on the blocking pool, concurrently.
/// Results come back in input order.
pub async fn score_all(
    scorer: Arc<Scorer>,
    requests: Vec<(usize, ScoringRequest)>,
) -> Result<Vec<BatchEntry>> {
    debug!(count = requests.len(), "scoring batch");

    let tasks = requests.into_iter().map(|(index, request)| {
        let scorer = Arc::clone(&scorer);
        tokio::task::spawn_blocking(move || {
            let response = scorer.score(&request);
            BatchEntry {
                index,
                request,
                response,
            }
        })
    });

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.context("Scoring task failed"))
        .collect()
}
