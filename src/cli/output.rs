//! Output formatting utilities for CLI commands

use std::io::{self, Write};

use crate::export::ExportResult;
use crate::tagging::TagSet;
use texanno_core::Annotation;

/// Format error message for display
pub fn format_error(operation: &str, details: &str) -> String {
    format!("ERROR: {} - {}", operation, details)
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content).map_err(|e| format!("Failed to write to {}: {}", path, e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Serialize to pretty JSON with a trailing newline
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| format!("JSON serialization failed: {}", e))
}

fn join_tags(tags: &TagSet) -> String {
    tags.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// One `surface<TAB>tags` line per position. Surfaces are debug-quoted so
/// whitespace stays visible.
pub fn format_export(result: &ExportResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# window {}..{} ({} positions)\n",
        result.begin.start,
        result.end.end,
        result.len()
    ));
    for tag in &result.iob_tags {
        out.push_str(&format!("{:?}\t{}\n", tag.surface(), join_tags(tag.tags())));
    }
    out
}

/// Per-set listing of diff output
pub fn format_diff(names: &[String], sets: &[Vec<Annotation>], preview_width: usize) -> String {
    let mut out = String::new();
    for (name, set) in names.iter().zip(sets) {
        out.push_str(&format!("== {} ({} not shared) ==\n", name, set.len()));
        for anno in set {
            let text: String = anno.text.chars().take(preview_width).collect();
            out.push_str(&format!("  {} {}\n", anno.span_key(), text.replace('\n', "\\\\")));
        }
    }
    out
}
