// Toxicity scorer trait — the swap-ready abstraction.
//
// Implementations are free to fail; the fail-open conversion happens once,
// in `score_fail_open`, which is the only way the moderation pipeline talks
// to a scorer.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::output::truncate_chars;
use crate::signal::{bounded, Degraded};

/// The result of scoring a single piece of text for toxicity.
#[derive(Debug, Clone, PartialEq)]
pub struct ToxicityResult {
    /// Overall toxicity score from 0.0 (benign) to 1.0 (very toxic)
    pub toxicity: f64,
    /// Model label that produced the score (e.g. "insult"), if the provider reports one
    pub label: Option<String>,
}

/// Trait for scoring text toxicity. Implementations must be async because
/// most providers require HTTP API calls.
#[async_trait]
pub trait ToxicityScorer: Send + Sync {
    /// Short backend name used in logs and `bleep status`.
    fn name(&self) -> &'static str;

    /// Score a single text for toxicity.
    async fn score_text(&self, text: &str) -> Result<ToxicityResult>;
}

/// What the pipeline gets back from a toxicity scorer.
#[derive(Debug, Clone, PartialEq)]
pub enum ToxicitySignal {
    Scored(ToxicityResult),
    /// The scorer contributed nothing; treated as a score of 0.0.
    Neutral(Degraded),
}

impl ToxicitySignal {
    /// The toxicity value the policy branch should use.
    pub fn score(&self) -> f64 {
        match self {
            ToxicitySignal::Scored(result) => result.toxicity,
            ToxicitySignal::Neutral(_) => 0.0,
        }
    }
}

/// Score `text` without ever failing.
///
/// A missing scorer, an error, or a timeout all produce `Neutral`. Scores
/// outside [0, 1] are clamped, and NaN is treated as 0.0.
pub async fn score_fail_open(
    scorer: Option<&dyn ToxicityScorer>,
    text: &str,
    timeout: Duration,
) -> ToxicitySignal {
    let Some(scorer) = scorer else {
        return ToxicitySignal::Neutral(Degraded::Unconfigured);
    };

    match bounded(timeout, scorer.score_text(text)).await {
        Ok(mut result) => {
            result.toxicity = if result.toxicity.is_nan() {
                0.0
            } else {
                result.toxicity.clamp(0.0, 1.0)
            };
            debug!(
                scorer = scorer.name(),
                toxicity = result.toxicity,
                label = ?result.label,
                text_preview = %truncate_chars(text, 50),
                "Scored text"
            );
            ToxicitySignal::Scored(result)
        }
        Err(reason) => {
            warn!(scorer = scorer.name(), %reason, "Toxicity scorer degraded, using neutral score");
            ToxicitySignal::Neutral(reason)
        }
    }
}
