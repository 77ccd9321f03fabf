// Colored terminal output for moderation results.

use colored::{ColoredString, Colorize};

use crate::pipeline::batch::BatchSummary;
use crate::pipeline::moderation::ModerationResult;
use crate::severity::Severity;

use super::truncate_chars;

/// Display one moderation result with its flagged spans.
pub fn display_result(result: &ModerationResult) {
    println!("\n{}", "=== Moderation Result ===".bold());
    println!();
    println!("  Severity:  {}", colorize_severity(result.severity));
    println!("  Abusive:   {}", if result.has_abuse { "yes".red() } else { "no".green() });
    println!();
    println!("  {}", "Original".dimmed());
    println!("    {}", result.original_text);
    println!("  {}", "Clean".dimmed());
    println!("    {}", result.clean_text);

    if result.flagged_spans.is_empty() {
        return;
    }

    println!();
    println!(
        "  {:>5} {:>5}  {:<24} {:<9} {:<9} {:<8} {:>5}",
        "Start".dimmed(),
        "End".dimmed(),
        "Original".dimmed(),
        "Lang".dimmed(),
        "Category".dimmed(),
        "Severity".dimmed(),
        "Conf".dimmed(),
    );
    println!("  {}", "-".repeat(74).dimmed());

    for span in &result.flagged_spans {
        let confidence = span
            .confidence
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>5} {:>5}  {:<24} {:<9} {:<9} {:<8} {:>5}",
            span.start,
            span.end,
            truncate_chars(&span.original, 21),
            span.lang.as_deref().unwrap_or("-"),
            span.category.as_deref().unwrap_or("-"),
            span.severity.as_deref().unwrap_or("-"),
            confidence,
        );
    }
}

/// Display counts after a batch run.
pub fn display_batch_summary(summary: &BatchSummary) {
    println!("\n{}", "Batch complete.".bold());
    println!("  Processed: {}", summary.processed);
    println!("  Flagged:   {}", summary.flagged);
    if summary.skipped > 0 {
        println!("  {} {} unparseable lines skipped", "Warning:".yellow(), summary.skipped);
    }
}

fn colorize_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::High => severity.as_str().red().bold(),
        Severity::Medium => severity.as_str().yellow().bold(),
        Severity::Low => severity.as_str().yellow(),
        Severity::None => severity.as_str().green(),
    }
}
