// Overall severity rollup.
//
// Individual spans carry free-form severity tags from the detectors. The
// verdict for the whole text is the worst recognized tag, with one policy
// twist: flagged spans that carry no tag at all count as medium, so an
// unclassified hit is never reported as "none".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spans::FlaggedSpan;

/// Overall severity of a moderated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Parse a span-level tag. Only the exact lowercase names are recognized;
    /// anything else is treated as untagged.
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce a span list to one severity.
pub fn aggregate(spans: &[FlaggedSpan]) -> Severity {
    if spans.is_empty() {
        return Severity::None;
    }

    spans
        .iter()
        .filter_map(|s| s.severity.as_deref().and_then(Severity::from_tag))
        .max()
        .unwrap_or(Severity::Medium)
}
