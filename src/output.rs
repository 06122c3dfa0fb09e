//! CLI output formatting for both pipeline stages.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ```text
//! Travels
//! 001 Osaka (jp) 2018-05-01 ~ 2018-05-05 (2 posts)
//!     001 Arrival
//!         Source: 01-arrival.md
//!     002 Dotonbori
//!         Source: 02-dotonbori.md
//!
//! Skipped
//!     travel '2016-bad': no info.json
//! ```

use crate::generate::GenerateReport;
use crate::scan::ScanReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

pub fn format_scan(report: &ScanReport) -> Vec<String> {
    let mut lines = vec!["Travels".to_string()];

    for (i, travel) in report.travels.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}) {} ~ {} ({} posts)",
            format_index(i + 1),
            travel.name,
            travel.country,
            travel.start,
            travel.end,
            travel.posts.len()
        ));
        for (j, post) in travel.posts.iter().enumerate() {
            lines.push(format!("    {} {}", format_index(j + 1), post.title()));
            lines.push(format!("        Source: {}.md", post.slug));
        }
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for note in &report.skipped {
            lines.push(format!("    {note}"));
        }
    }

    lines
}

pub fn format_generate(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .written
        .iter()
        .map(|file| format!("Generated '{file}'"))
        .collect();

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &report.warnings {
            lines.push(format!("    {warning}"));
        }
    }

    lines
}

pub fn print_scan(report: &ScanReport) {
    for line in format_scan(report) {
        println!("{line}");
    }
}

pub fn print_generate(report: &GenerateReport) {
    for line in format_generate(report) {
        println!("{line}");
    }
}
