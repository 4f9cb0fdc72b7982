//! Console reports for finished runs and dry runs

use colored::Colorize;

use crate::logging::format_message;

use super::context::{PlannedOperation, RunSummary};

/// Renders the final summary of a run
pub fn render_summary(summary: &RunSummary) -> String {
    let mut lines = vec![
        String::new(),
        "Summary:".to_string(),
        "--------".to_string(),
        format!("  Files processed: {}", summary.processed),
        format!("  Converted:       {}", summary.succeeded),
        format!("  Failed:          {}", summary.failed),
    ];
    if summary.cancelled {
        lines.push(format!("  Not started:     {} (cancelled)", summary.skipped));
    }

    if !summary.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failed files:".to_string());
        for failure in &summary.failures {
            lines.push(format!("  {failure}"));
        }
    }

    if !summary.unreadable.is_empty() {
        lines.push(String::new());
        lines.push("Unreadable entries:".to_string());
        for failure in &summary.unreadable {
            lines.push(format!("  {failure}"));
        }
    }

    lines.join("\n")
}

/// Prints the final summary of a run, coloured when stdout is a terminal
pub fn print_summary(summary: &RunSummary) {
    let plain = render_summary(summary);
    let colored = if summary.is_clean() {
        plain.as_str().green().to_string()
    } else {
        plain.as_str().yellow().to_string()
    };
    println!("{}", format_message(&plain, &colored));
}

/// Renders the conversions a dry run would perform
///
/// Only files with a derivable output path count as conversions.
pub fn render_plan(plan: &[PlannedOperation]) -> String {
    let mut lines = vec![
        String::new(),
        "Detailed plan of operations:".to_string(),
        "===========================".to_string(),
    ];
    let mut skipped = 0;
    for operation in plan {
        lines.push(format!("  From: {}", operation.source.display()));
        match &operation.destination {
            Ok(destination) => lines.push(format!("  To:   {}", destination.display())),
            Err(reason) => {
                skipped += 1;
                lines.push(format!("  Skip: {reason}"));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("  Files to be converted: {}", plan.len() - skipped));
    if skipped > 0 {
        lines.push(format!("  Files to be skipped:   {skipped}"));
    }
    lines.push(String::new());
    lines.push("Run without --dry flag to execute these operations.".to_string());
    lines.join("\n")
}

/// Prints the conversions a dry run would perform
pub fn print_plan(plan: &[PlannedOperation]) {
    println!("{}", render_plan(plan));
}
