// Span normalizer — clamp, filter, sort, merge.
//
// Output is the canonical span list every later stage relies on: sorted by
// start, all inside [0, text_length], and no two spans overlapping or even
// touching. A span that ends exactly where the next one starts is merged
// with it, so the renderer never emits two mask tokens back to back.

use super::FlaggedSpan;

/// Canonicalize a raw span list against a text of `text_length` characters.
///
/// When spans merge, the earliest-starting span's metadata (original, mask,
/// tags, confidence) is kept and the later span's is dropped. Ties on start
/// keep input order. Pure and idempotent.
pub fn normalize(spans: &[FlaggedSpan], text_length: usize) -> Vec<FlaggedSpan> {
    let limit = i64::try_from(text_length).unwrap_or(i64::MAX);

    let mut cleaned: Vec<FlaggedSpan> = spans
        .iter()
        .filter_map(|span| {
            let start = span.start.clamp(0, limit);
            let end = span.end.clamp(0, limit);
            (end > start).then(|| span.with_range(start, end))
        })
        .collect();

    // sort_by_key is stable, which makes equal-start merges deterministic
    cleaned.sort_by_key(|span| span.start);

    let mut iter = cleaned.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for next in iter {
        if next.start <= current.end {
            current = current.with_range(current.start, current.end.max(next.end));
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    merged
}

/// True if `spans` is already in canonical form for a text of `text_length`
/// characters.
pub fn is_canonical(spans: &[FlaggedSpan], text_length: usize) -> bool {
    let limit = i64::try_from(text_length).unwrap_or(i64::MAX);
    let in_bounds = spans
        .iter()
        .all(|s| 0 <= s.start && s.start < s.end && s.end <= limit);
    let separated = spans.windows(2).all(|pair| pair[0].end < pair[1].start);
    in_bounds && separated
}
