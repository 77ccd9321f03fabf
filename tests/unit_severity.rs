// Unit tests for the overall severity rollup.

use bleep::severity::{aggregate, Severity};
use bleep::spans::FlaggedSpan;

fn with_severity(severity: Option<&str>) -> FlaggedSpan {
    FlaggedSpan {
        severity: severity.map(str::to_string),
        ..FlaggedSpan::new(0, 3, "abc")
    }
}

#[test]
fn empty_list_is_none() {
    assert_eq!(aggregate(&[]), Severity::None);
}

#[test]
fn low_and_high_is_high() {
    let spans = [with_severity(Some("low")), with_severity(Some("high"))];
    assert_eq!(aggregate(&spans), Severity::High);
}

#[test]
fn all_untagged_is_medium() {
    let spans = [with_severity(None), with_severity(None), with_severity(None)];
    assert_eq!(aggregate(&spans), Severity::Medium);
}

#[test]
fn medium_beats_low() {
    let spans = [with_severity(Some("low")), with_severity(Some("medium"))];
    assert_eq!(aggregate(&spans), Severity::Medium);
}

#[test]
fn tagged_low_beats_untagged_default() {
    // The medium default only applies when no span carries a known tag
    let spans = [with_severity(None), with_severity(Some("low"))];
    assert_eq!(aggregate(&spans), Severity::Low);
}

#[test]
fn order_does_not_matter() {
    let a = [with_severity(Some("high")), with_severity(Some("low"))];
    let b = [with_severity(Some("low")), with_severity(Some("high"))];
    assert_eq!(aggregate(&a), aggregate(&b));
}

#[test]
fn severity_ordering() {
    assert!(Severity::None < Severity::Low);
    assert!(Severity::Low < Severity::Medium);
    assert!(Severity::Medium < Severity::High);
}

#[test]
fn severity_json_round_trip() {
    let parsed: Severity = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(parsed, Severity::Medium);
    assert_eq!(serde_json::to_string(&Severity::None).unwrap(), "\"none\"");
}
