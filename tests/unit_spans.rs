// Unit tests for the span engine: locate -> normalize -> render.
//
// Exercises the public functions with the worked examples the moderation
// service is expected to reproduce exactly, plus the chained flow over
// mixed-script complaint text.

use bleep::phrases::PhraseHit;
use bleep::spans::locate::locate;
use bleep::spans::merge::{is_canonical, normalize};
use bleep::spans::render::render;
use bleep::spans::{char_len, FlaggedSpan, DEFAULT_MASK};

fn span(start: i64, end: i64) -> FlaggedSpan {
    FlaggedSpan::new(start, end, "")
}

fn ranges(spans: &[FlaggedSpan]) -> Vec<(i64, i64)> {
    spans.iter().map(|s| (s.start, s.end)).collect()
}

fn phrase(text: &str, severity: &str) -> PhraseHit {
    PhraseHit {
        phrase: text.to_string(),
        lang: None,
        category: Some("abuse".to_string()),
        severity: Some(severity.to_string()),
    }
}

// ============================================================
// normalize — worked examples
// ============================================================

#[test]
fn merge_overlapping_example() {
    let out = normalize(&[span(2, 5), span(4, 8), span(10, 12)], 20);
    assert_eq!(ranges(&out), vec![(2, 8), (10, 12)]);
}

#[test]
fn merge_touching_example() {
    let out = normalize(&[span(0, 3), span(3, 6)], 20);
    assert_eq!(ranges(&out), vec![(0, 6)]);
}

#[test]
fn clamp_example() {
    let out = normalize(&[span(-5, 100)], 10);
    assert_eq!(ranges(&out), vec![(0, 10)]);
}

#[test]
fn single_span_survives_unchanged() {
    let mut input = span(1, 4);
    input.original = "abc".to_string();
    input.confidence = Some(0.7);
    let out = normalize(std::slice::from_ref(&input), 10);
    assert_eq!(out, vec![input]);
}

#[test]
fn one_apart_spans_stay_separate() {
    let out = normalize(&[span(0, 3), span(4, 6)], 10);
    assert_eq!(ranges(&out), vec![(0, 3), (4, 6)]);
    assert!(is_canonical(&out, 10));
}

#[test]
fn zero_length_text_drops_everything() {
    assert!(normalize(&[span(0, 5), span(-1, 1)], 0).is_empty());
}

// ============================================================
// render — worked examples
// ============================================================

#[test]
fn masking_example() {
    let mut s = span(4, 9);
    s.masked = Some("*****".to_string());
    assert_eq!(render("you idiot now", &[s]), "you *****now");
}

#[test]
fn render_without_spans_returns_input() {
    let text = "Street light not working for 3 weeks";
    assert_eq!(render(text, &[]), text);
}

// ============================================================
// locate -> normalize -> render chain
// ============================================================

#[test]
fn overlapping_phrases_mask_once() {
    let text = "you bloody fool, fix the road";
    let raw = locate(text, &[phrase("bloody fool", "high"), phrase("fool", "low")]);
    assert_eq!(raw.len(), 2);

    let canonical = normalize(&raw, char_len(text));
    assert_eq!(ranges(&canonical), vec![(4, 15)]);
    // Earliest span's metadata wins
    assert_eq!(canonical[0].severity.as_deref(), Some("high"));

    assert_eq!(render(text, &canonical), format!("you {DEFAULT_MASK}, fix the road"));
}

#[test]
fn adjacent_phrases_become_one_mask() {
    let text = "chor neta wapas jao";
    let raw = locate(text, &[phrase("chor", "medium"), phrase(" neta", "low")]);
    let canonical = normalize(&raw, char_len(text));
    assert_eq!(ranges(&canonical), vec![(0, 9)]);
    assert_eq!(render(text, &canonical), format!("{DEFAULT_MASK} wapas jao"));
}

#[test]
fn mixed_script_complaint() {
    let text = "पानी नहीं आ रहा, saala officer kuch nahi karta. SAALA!";
    let raw = locate(text, &[phrase("saala", "medium")]);
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[1].original, "SAALA");

    let canonical = normalize(&raw, char_len(text));
    let clean = render(text, &canonical);
    assert_eq!(
        clean,
        format!("पानी नहीं आ रहा, {DEFAULT_MASK} officer kuch nahi karta. {DEFAULT_MASK}!")
    );
}

#[test]
fn located_spans_cover_their_original_text() {
    let text = "Idiot clerk. idiot CLERK again";
    let raw = locate(text, &[phrase("idiot clerk", "medium")]);
    let chars: Vec<char> = text.chars().collect();
    for s in &raw {
        let covered: String = chars[s.start as usize..s.end as usize].iter().collect();
        assert_eq!(covered, s.original);
    }
}
