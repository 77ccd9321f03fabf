// Masking renderer.

use std::borrow::Cow;

use super::{char_boundaries, FlaggedSpan};

/// Rebuild `text` with every span replaced by its mask token.
///
/// Expects canonical spans (see `merge::normalize`). Offsets past the end of
/// the text are clamped and a span starting before the cursor is treated as
/// starting at the cursor, so bad input degrades instead of panicking.
pub fn render<'a>(text: &'a str, spans: &[FlaggedSpan]) -> Cow<'a, str> {
    if spans.is_empty() {
        return Cow::Borrowed(text);
    }

    let boundaries = char_boundaries(text);
    let last = boundaries.len() - 1;
    let byte_at = |offset: i64| boundaries[usize::try_from(offset.max(0)).unwrap_or(0).min(last)];

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for span in spans {
        let start = byte_at(span.start).max(cursor);
        out.push_str(&text[cursor..start]);
        out.push_str(span.mask_token());
        cursor = byte_at(span.end).max(start);
    }
    out.push_str(&text[cursor..]);

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spans::DEFAULT_MASK;

    fn masked(start: i64, end: i64, mask: &str) -> FlaggedSpan {
        FlaggedSpan {
            masked: Some(mask.to_string()),
            ..FlaggedSpan::new(start, end, "")
        }
    }

    #[test]
    fn test_masks_single_span() {
        let out = render("you idiot now", &[masked(4, 9, "*****")]);
        assert_eq!(out, "you *****now");
    }

    #[test]
    fn test_no_spans_borrows_input() {
        let out = render("all good here", &[]);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "all good here");
    }

    #[test]
    fn test_default_mask_when_unset() {
        let out = render("bad word", &[FlaggedSpan::new(0, 3, "bad")]);
        assert_eq!(out, format!("{DEFAULT_MASK} word"));
    }

    #[test]
    fn test_multiple_spans_and_tail() {
        let out = render("a xx b yy c", &[masked(2, 4, "#"), masked(7, 9, "#")]);
        assert_eq!(out, "a # b # c");
    }

    #[test]
    fn test_span_at_both_edges() {
        let out = render("xx mid yy", &[masked(0, 2, "*"), masked(7, 9, "*")]);
        assert_eq!(out, "* mid *");
    }

    #[test]
    fn test_multibyte_text() {
        // Mask "कुत्ता" (6 chars) inside mixed-script text
        let text = "ye कुत्ता hai";
        let out = render(text, &[masked(3, 9, "***")]);
        assert_eq!(out, "ye *** hai");
    }

    #[test]
    fn test_out_of_range_span_does_not_panic() {
        let out = render("short", &[masked(3, 500, "*")]);
        assert_eq!(out, "sho*");
    }
}
