//! Markdown report posted back to the pull request.

use std::fmt::Write;

use super::FileAnalysisResult;
use super::delta::delta;
use crate::oracle::ComplexityMetrics;

pub const REPORT_TITLE: &str = "### Complexity report";

pub const TABLE_HEADER: &str =
    "| File | Total Lines | Complexity (before) | Complexity (after) | Change |";
const TABLE_DIVIDER: &str = "| --- | --- | --- | --- | --- |";

/// A result that carries metrics, borrowed from the pipeline output.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzedFile<'a> {
    pub filename: &'a str,
    pub metrics: &'a ComplexityMetrics,
    pub previous_metrics: Option<&'a ComplexityMetrics>,
}

/// Keeps only results with metrics, in input order.
pub fn analyzed_only(results: &[FileAnalysisResult]) -> Vec<AnalyzedFile<'_>> {
    results
        .iter()
        .filter_map(|r| {
            r.metrics().map(|metrics| AnalyzedFile {
                filename: &r.filename,
                metrics,
                previous_metrics: r.previous_metrics(),
            })
        })
        .collect()
}

/// "1 file changed" / "N files changed".
pub fn files_changed_line(count: usize) -> String {
    let noun = if count == 1 { "file" } else { "files" };
    format!("{count} {noun} changed")
}

/// Renders one table row per file, keeping the given order.
///
/// Callers skip posting when `files` is empty.
pub fn render(files: &[AnalyzedFile<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{REPORT_TITLE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", files_changed_line(files.len()));
    let _ = writeln!(out);
    let _ = writeln!(out, "{TABLE_HEADER}");
    let _ = writeln!(out, "{TABLE_DIVIDER}");

    for file in files {
        let d = delta(
            file.metrics.score,
            file.previous_metrics.map(|m| m.score),
        );
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            escape_cell(file.filename),
            file.metrics.total_lines,
            d.previous_display,
            d.current_display,
            d.change_text
        );
    }

    out
}

/// A rendered comment body and the number of rows it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub analyzed_files: usize,
    pub body: String,
}

/// Filters and renders in one step; `None` when nothing was analyzed.
pub fn render_results(results: &[FileAnalysisResult]) -> Option<Report> {
    let files = analyzed_only(results);
    if files.is_empty() {
        return None;
    }

    Some(Report {
        analyzed_files: files.len(),
        body: render(&files),
    })
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
