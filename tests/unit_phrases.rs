// Unit tests for detector payload parsing.
//
// Both detectors are LLM/ML services with loosely specified output. These
// tests pin down which shapes are accepted, which are rejected (and so
// degrade to "nothing detected"), and which items are skipped.

use bleep::phrases::groq::parse_phrase_payload;
use bleep::toxicity::huggingface::parse_inference_payload;

// ============================================================
// Groq phrase payloads
// ============================================================

#[test]
fn parses_full_payload() {
    let content = r#"{"abusive_phrases": [
        {"phrase": "kamina", "lang": "hinglish", "category": "abuse", "severity": "high"},
        {"phrase": "idiot", "lang": "en", "category": "abuse", "severity": "medium"}
    ]}"#;
    let hits = parse_phrase_payload(content).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].phrase, "kamina");
    assert_eq!(hits[0].lang.as_deref(), Some("hinglish"));
    assert_eq!(hits[1].severity.as_deref(), Some("medium"));
}

#[test]
fn empty_list_is_ok() {
    let hits = parse_phrase_payload(r#"{"abusive_phrases": []}"#).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn fenced_payload_is_accepted() {
    let content = "```json\n{\"abusive_phrases\": [{\"phrase\": \"ullu\"}]}\n```";
    let hits = parse_phrase_payload(content).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].phrase, "ullu");
    assert!(hits[0].severity.is_none());
}

#[test]
fn non_json_is_rejected() {
    assert!(parse_phrase_payload("There are no abusive words here.").is_err());
}

#[test]
fn non_object_is_rejected() {
    assert!(parse_phrase_payload(r#"["idiot"]"#).is_err());
    assert!(parse_phrase_payload("42").is_err());
}

#[test]
fn missing_or_wrong_field_is_rejected() {
    assert!(parse_phrase_payload(r#"{"phrases": []}"#).is_err());
    assert!(parse_phrase_payload(r#"{"abusive_phrases": "idiot"}"#).is_err());
    assert!(parse_phrase_payload(r#"{"abusive_phrases": null}"#).is_err());
}

#[test]
fn malformed_items_are_skipped() {
    let content = r#"{"abusive_phrases": [
        "bare string",
        {"phrase": 12},
        {"lang": "en"},
        {"phrase": "gadha", "severity": "low"}
    ]}"#;
    let hits = parse_phrase_payload(content).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].phrase, "gadha");
    assert_eq!(hits[0].severity.as_deref(), Some("low"));
}

#[test]
fn non_string_tags_keep_the_phrase() {
    let content = r#"{"abusive_phrases": [
        {"phrase": "idiot", "lang": "en", "category": "abuse", "severity": 3},
        {"phrase": "gadha", "lang": ["hi"], "category": {"kind": "abuse"}, "severity": "low"}
    ]}"#;
    let hits = parse_phrase_payload(content).unwrap();
    assert_eq!(hits.len(), 2);

    assert_eq!(hits[0].phrase, "idiot");
    assert_eq!(hits[0].lang.as_deref(), Some("en"));
    assert_eq!(hits[0].category.as_deref(), Some("abuse"));
    assert!(hits[0].severity.is_none());

    assert_eq!(hits[1].phrase, "gadha");
    assert!(hits[1].lang.is_none());
    assert!(hits[1].category.is_none());
    assert_eq!(hits[1].severity.as_deref(), Some("low"));
}

#[test]
fn null_tags_are_accepted() {
    let content = r#"{"abusive_phrases": [{"phrase": "x", "lang": null, "category": null, "severity": null}]}"#;
    let hits = parse_phrase_payload(content).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].lang.is_none());
}

// ============================================================
// Hugging Face toxicity payloads
// ============================================================

#[test]
fn hf_scores_use_max_label() {
    let body = r#"[[{"label": "toxicity", "score": 0.2}, {"label": "obscene", "score": 0.7}]]"#;
    let result = parse_inference_payload(body).unwrap();
    assert!((result.toxicity - 0.7).abs() < 1e-10);
    assert_eq!(result.label.as_deref(), Some("obscene"));
}

#[test]
fn hf_loading_is_rejected() {
    let body = r#"{"error": "Model unitary/unbiased-toxic-roberta is currently loading", "estimated_time": 20.0}"#;
    assert!(parse_inference_payload(body).is_err());
}
