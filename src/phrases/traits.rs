// Phrase extractor trait and its fail-open boundary.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::PhraseHit;
use crate::signal::{bounded, Degraded};

/// Trait for listing abusive phrases in a text.
#[async_trait]
pub trait PhraseExtractor: Send + Sync {
    /// Short backend name used in logs and `bleep status`.
    fn name(&self) -> &'static str;

    async fn extract(&self, text: &str) -> Result<Vec<PhraseHit>>;
}

/// What the pipeline gets back from a phrase extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum PhraseSignal {
    /// The extractor answered. The list may legitimately be empty.
    Extracted(Vec<PhraseHit>),
    /// The extractor contributed nothing.
    Empty(Degraded),
}

impl PhraseSignal {
    pub fn phrases(&self) -> &[PhraseHit] {
        match self {
            PhraseSignal::Extracted(hits) => hits,
            PhraseSignal::Empty(_) => &[],
        }
    }
}

/// Extract phrases without ever failing.
pub async fn extract_fail_open(
    extractor: Option<&dyn PhraseExtractor>,
    text: &str,
    timeout: Duration,
) -> PhraseSignal {
    let Some(extractor) = extractor else {
        return PhraseSignal::Empty(Degraded::Unconfigured);
    };

    match bounded(timeout, extractor.extract(text)).await {
        Ok(hits) => {
            debug!(extractor = extractor.name(), phrases = hits.len(), "Extracted phrases");
            PhraseSignal::Extracted(hits)
        }
        Err(reason) => {
            warn!(extractor = extractor.name(), %reason, "Phrase extractor degraded, using no phrases");
            PhraseSignal::Empty(reason)
        }
    }
}
