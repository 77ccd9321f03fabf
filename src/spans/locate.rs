// Phrase locator — turns detector phrases into positioned spans.
//
// The phrase extractor only tells us *what* was abusive, never *where*. We
// don't trust a language model with offsets anyway, so every phrase is looked
// up in the text with a case-insensitive literal search. Each phrase is
// searched independently; two different phrases may produce overlapping
// spans, which normalize() sorts out later.

use crate::phrases::PhraseHit;

use super::{FlaggedSpan, DEFAULT_MASK};

/// Find every occurrence of every phrase in `text` and emit one span each.
///
/// Occurrences of a single phrase never overlap: after a match the search
/// resumes at the end of that match. Phrases that never appear produce no
/// spans. Empty phrases are skipped.
pub fn locate(text: &str, phrases: &[PhraseHit]) -> Vec<FlaggedSpan> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    for hit in phrases {
        if hit.phrase.is_empty() {
            continue;
        }
        let needle: Vec<char> = hit.phrase.chars().collect();

        for start in find_all_ignore_case(&chars, &needle) {
            let end = start + needle.len();
            spans.push(FlaggedSpan {
                start: start as i64,
                end: end as i64,
                original: chars[start..end].iter().collect(),
                masked: Some(DEFAULT_MASK.to_string()),
                lang: hit.lang.clone(),
                category: hit.category.clone(),
                severity: hit.severity.clone(),
                confidence: None,
            });
        }
    }

    spans
}

/// Start offsets of all non-overlapping, case-insensitive matches of `needle`
/// in `haystack`, scanning left to right.
fn find_all_ignore_case(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() || needle.len() > haystack.len() {
        return found;
    }

    let mut cursor = 0;
    while cursor + needle.len() <= haystack.len() {
        let window = &haystack[cursor..cursor + needle.len()];
        if window.iter().zip(needle).all(|(a, b)| chars_eq_ignore_case(*a, *b)) {
            found.push(cursor);
            cursor += needle.len();
        } else {
            cursor += 1;
        }
    }

    found
}

/// Compare two characters by their full lowercase mappings.
///
/// Comparing per character (instead of lowercasing the whole string first)
/// keeps offsets exact even for characters whose lowercase form is longer,
/// such as 'İ'.
fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
