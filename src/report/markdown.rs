//! Markdown rendering of the results report

use chrono::{DateTime, SecondsFormat, Utc};

use crate::testing::{SuiteRunResult, TestStatus};

use super::{collect_entries, ReportEntry, ReportSummary};

/// URLs longer than this are shortened in the results table
const URL_MAX_CHARS: usize = 60;

/// Error messages are cut to this many characters in the results table
const ERROR_MAX_CHARS: usize = 100;

/// Render the full `report.md` content
pub fn render(suite_results: &[SuiteRunResult], generated_at: DateTime<Utc>) -> String {
    let entries = collect_entries(suite_results);
    let summary = ReportSummary::from_entries(&entries);

    let mut lines: Vec<String> = vec![
        "# Contextractor Test Results Report".to_string(),
        String::new(),
        format!(
            "Generated: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        String::new(),
        "## Summary".to_string(),
        String::new(),
        format!("- **Total test cases:** {}", summary.total),
        format!("- **Passed:** {} ✅", summary.passed),
        format!("- **Failed:** {} ❌", summary.failed),
        String::new(),
        "## Results".to_string(),
        String::new(),
    ];
    lines.extend(table_lines(&entries));
    lines.push(String::new());

    if summary.failed > 0 {
        lines.push("## Failed Test Cases".to_string());
        lines.push(String::new());
        for entry in entries.iter().filter(|e| e.status == TestStatus::Error) {
            lines.push(format!("### {}/{}", entry.suite_name, entry.test_case_slug));
            lines.push(String::new());
            lines.push(format!("- **URL:** {}", entry.url));
            lines.push(format!(
                "- **Error:** {}",
                entry.error_message.as_deref().unwrap_or("Unknown")
            ));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

fn table_lines(entries: &[ReportEntry]) -> Vec<String> {
    let mut lines = vec![
        "| Suite | Test Case | URL | Status | Error |".to_string(),
        "|-------|-----------|-----|--------|-------|".to_string(),
    ];

    for entry in entries {
        let error_text: String = match entry.error_message.as_deref() {
            Some(message) if !message.is_empty() => {
                escape_cell(message).chars().take(ERROR_MAX_CHARS).collect()
            }
            _ => "-".to_string(),
        };

        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            entry.suite_name,
            entry.test_case_slug,
            truncate_url(&entry.url),
            entry.status.icon(),
            error_text
        ));
    }

    lines
}

/// Shorten a URL to at most 60 characters, ending in `...` when cut
fn truncate_url(url: &str) -> String {
    if url.chars().count() > URL_MAX_CHARS {
        let head: String = url.chars().take(URL_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}

/// Escape table delimiters and keep the cell on one line
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
