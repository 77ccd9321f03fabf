// Abusive phrase extraction.
//
// An LLM reads the complaint and lists the abusive words or phrases it sees,
// with language, category and severity tags. It is deliberately not asked
// for positions; the span locator finds those itself.

pub mod groq;
pub mod traits;

use serde::{Deserialize, Serialize};

/// One phrase reported by an extractor. Tags are free-form strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhraseHit {
    pub phrase: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}
