// Batch moderation of a JSONL file.
//
// Each input line is a ModerationRequest (`{"text": ..., "complaint_id": ...}`).
// Requests are moderated with bounded concurrency and results are written as
// JSONL in input order. Lines that don't parse are reported and skipped; they
// never stop the batch.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::moderation::{ModerationRequest, ModerationResult, Moderator};

/// Counts reported after a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub flagged: usize,
    pub skipped: usize,
}

/// Parse JSONL requests, keeping line numbers for error messages.
/// Blank lines are ignored.
pub fn parse_requests(input: &str) -> (Vec<ModerationRequest>, Vec<(usize, String)>) {
    let mut requests = Vec::new();
    let mut errors = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ModerationRequest>(line) {
            Ok(request) => requests.push(request),
            Err(e) => errors.push((idx + 1, e.to_string())),
        }
    }

    (requests, errors)
}

/// Moderate every request with at most `concurrency` in flight, preserving
/// input order in the output.
pub async fn moderate_all(
    moderator: &Moderator,
    requests: &[ModerationRequest],
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Vec<ModerationResult> {
    stream::iter(requests)
        .map(|request| async move {
            let result = moderator.moderate(request).await;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            result
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Moderate a JSONL file and write JSONL results to `output` (or stdout).
pub async fn run(
    moderator: &Moderator,
    input: &Path,
    output: Option<&Path>,
    concurrency: usize,
) -> Result<BatchSummary> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let (requests, errors) = parse_requests(&raw);
    for (line, error) in &errors {
        warn!(line, %error, "Skipping unparseable request");
    }

    info!(requests = requests.len(), concurrency, "Starting batch moderation");

    let pb = ProgressBar::new(requests.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let results = moderate_all(moderator, &requests, concurrency, Some(&pb)).await;
    pb.finish_and_clear();

    let mut lines = String::new();
    for result in &results {
        lines.push_str(&serde_json::to_string(result)?);
        lines.push('\n');
    }

    match output {
        Some(path) => std::fs::write(path, lines)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(lines.as_bytes())
            .context("Failed to write results to stdout")?,
    }

    Ok(BatchSummary {
        processed: results.len(),
        flagged: results.iter().filter(|r| r.has_abuse).count(),
        skipped: errors.len(),
    })
}
