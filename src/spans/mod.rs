// Span engine — locating, canonicalizing and masking flagged regions of text.
//
// Detectors hand us untrusted candidates: phrases without positions, or
// spans that may overlap, touch, or run past the end of the text. The three
// stages here turn that into something the renderer can trust:
//
//   locate()    phrases -> raw spans (character offsets)
//   normalize() raw spans -> canonical spans (clamped, sorted, merged)
//   render()    canonical spans -> masked text
//
// All offsets are character offsets (Unicode scalar values), never bytes.

pub mod locate;
pub mod merge;
pub mod render;

use serde::{Deserialize, Serialize};

/// Mask token used when a span carries no explicit replacement.
pub const DEFAULT_MASK: &str = "******";

/// One flagged region of the original text, plus whatever the detector said
/// about it.
///
/// Spans are values: clamping and merging build new spans instead of editing
/// existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedSpan {
    /// Inclusive character offset into the original text.
    pub start: i64,
    /// Exclusive character offset into the original text.
    pub end: i64,
    /// The text the span covered when it was created.
    pub original: String,
    /// Replacement token; `None` renders as [`DEFAULT_MASK`].
    pub masked: Option<String>,
    pub lang: Option<String>,
    pub category: Option<String>,
    /// "low" | "medium" | "high" by convention, not enforced here.
    pub severity: Option<String>,
    /// 0.0 to 1.0 when the detector gave a numeric score.
    pub confidence: Option<f64>,
}

impl FlaggedSpan {
    /// A bare span with no metadata. Mostly useful for tests and callers that
    /// only care about ranges.
    pub fn new(start: i64, end: i64, original: impl Into<String>) -> Self {
        Self {
            start,
            end,
            original: original.into(),
            masked: None,
            lang: None,
            category: None,
            severity: None,
            confidence: None,
        }
    }

    /// Same span, different range. Metadata is carried over unchanged.
    pub fn with_range(&self, start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    /// Same span with `confidence` filled in, unless it already had one.
    pub fn with_default_confidence(&self, confidence: f64) -> Self {
        Self {
            confidence: self.confidence.or(Some(confidence)),
            ..self.clone()
        }
    }

    /// The token the renderer substitutes for this span.
    pub fn mask_token(&self) -> &str {
        self.masked.as_deref().unwrap_or(DEFAULT_MASK)
    }
}

/// Number of characters in `text`, the unit every span offset is measured in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte position of every character boundary in `text`, including the end.
///
/// `boundaries[i]` is the byte offset of character `i`; the last entry is
/// `text.len()`. Lets callers slice by character offset without rescanning.
pub(crate) fn char_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    boundaries
}
