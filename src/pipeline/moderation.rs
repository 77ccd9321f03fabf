// Moderation pipeline: detect -> locate -> normalize -> mask -> rate.
//
// For every request both detectors are asked concurrently. The toxicity score
// then decides how phrase hits are used:
//
//   toxicity <  threshold  phrase spans as-is (LLM catches Hindi/Odia abuse
//                          the toxicity model scores low)
//   toxicity >= threshold  phrase spans with confidence back-filled, or, if
//                          the LLM found nothing, one span over the whole text
//
// The fallback span means a clearly toxic complaint is never passed through
// unmasked just because phrase extraction failed.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};

use crate::phrases::traits::{extract_fail_open, PhraseExtractor};
use crate::severity::{aggregate, Severity};
use crate::spans::locate::locate;
use crate::spans::merge::normalize;
use crate::spans::render::render;
use crate::spans::{char_len, FlaggedSpan, DEFAULT_MASK};
use crate::text::preprocess;
use crate::toxicity::traits::{score_fail_open, ToxicityScorer};

/// Default toxicity score at or above which a text counts as toxic.
pub const DEFAULT_THRESHOLD: f64 = 0.55;

/// Default per-detector timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Knobs for the decision step, injected rather than hardcoded so tests can
/// run with other thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModerationPolicy {
    pub toxicity_threshold: f64,
    pub detector_timeout: Duration,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            toxicity_threshold: DEFAULT_THRESHOLD,
            detector_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Incoming moderation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub text: String,
    #[serde(default)]
    pub complaint_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ModerationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            complaint_id: None,
            user_id: None,
        }
    }
}

/// Outcome of moderating one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    /// True if at least one span survived normalization
    pub has_abuse: bool,
    /// Exactly what was submitted
    pub original_text: String,
    /// Text with every flagged span replaced by its mask token
    pub clean_text: String,
    pub severity: Severity,
    /// Canonical spans: sorted, non-overlapping, non-touching
    pub flagged_spans: Vec<FlaggedSpan>,
}

/// Runs the moderation pipeline. Holds no per-request state, so one instance
/// is shared by every handler and worker.
///
/// A detector set to `None` is treated as permanently degraded; with both
/// absent every text comes back clean.
pub struct Moderator {
    scorer: Option<Arc<dyn ToxicityScorer>>,
    extractor: Option<Arc<dyn PhraseExtractor>>,
    policy: ModerationPolicy,
}

impl Moderator {
    pub fn new(
        scorer: Option<Arc<dyn ToxicityScorer>>,
        extractor: Option<Arc<dyn PhraseExtractor>>,
        policy: ModerationPolicy,
    ) -> Self {
        Self {
            scorer,
            extractor,
            policy,
        }
    }

    pub fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    /// Moderate one request. Never fails: detector problems degrade to
    /// "nothing detected" for that detector.
    pub async fn moderate(&self, request: &ModerationRequest) -> ModerationResult {
        let span = info_span!(
            "moderate",
            complaint_id = request.complaint_id.as_deref().unwrap_or("-"),
            user_id = request.user_id.as_deref().unwrap_or("-"),
        );
        self.run(&request.text).instrument(span).await
    }

    async fn run(&self, text: &str) -> ModerationResult {
        let normalized = preprocess(text);
        let candidates = self.detect(normalized).await;

        let flagged_spans = normalize(&candidates, char_len(text));
        let clean_text = render(text, &flagged_spans).into_owned();
        let severity = aggregate(&flagged_spans);

        info!(
            candidates = candidates.len(),
            flagged = flagged_spans.len(),
            %severity,
            "Moderation complete"
        );

        ModerationResult {
            has_abuse: !flagged_spans.is_empty(),
            original_text: text.to_string(),
            clean_text,
            severity,
            flagged_spans,
        }
    }

    /// Ask both detectors and apply the toxicity policy. Returns raw
    /// (unnormalized) candidate spans.
    async fn detect(&self, text: &str) -> Vec<FlaggedSpan> {
        let timeout = self.policy.detector_timeout;
        let (toxicity, phrases) = tokio::join!(
            score_fail_open(self.scorer.as_deref(), text, timeout),
            extract_fail_open(self.extractor.as_deref(), text, timeout),
        );

        let raw = locate(text, phrases.phrases());
        apply_toxicity_policy(text, toxicity.score(), raw, self.policy.toxicity_threshold)
    }
}

/// The decision step, separated out so it can be tested without detectors.
pub fn apply_toxicity_policy(
    text: &str,
    toxicity: f64,
    spans: Vec<FlaggedSpan>,
    threshold: f64,
) -> Vec<FlaggedSpan> {
    if toxicity < threshold {
        return spans;
    }

    if !spans.is_empty() {
        return spans
            .iter()
            .map(|span| span.with_default_confidence(toxicity))
            .collect();
    }

    vec![FlaggedSpan {
        start: 0,
        end: char_len(text) as i64,
        original: text.to_string(),
        masked: Some(DEFAULT_MASK.to_string()),
        lang: None,
        category: Some("toxic".to_string()),
        severity: Some("medium".to_string()),
        confidence: Some(toxicity),
    }]
}
