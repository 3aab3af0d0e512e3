//! Score reports and the textual annotation diff.
//!
//! ```text
//! === Score Report ===
//!
//! ## Macro Scores
//!   Precision: 50.0%
//!   Recall:    50.0%
//!   F1:        33.3%
//!
//! ## Per-Class
//!   definition   P=50% R=100% F1=67% (n=1)
//!   theorem      P=0% R=0% F1=0% (n=1)
//!
//! ## Counts
//!   positions: 2, system: 3 annotations, reference: 2 annotations
//!
//! ## Diff (+ system only, - reference only)
//! +    (theorem:0) Let $G$ be a group...
//! - (definition:12) group
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::score::ClassMetrics;
use crate::Result;
use texanno_core::Annotation;

/// Which side an annotation is missing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffSign {
    /// Present only in the system output.
    #[serde(rename = "+")]
    SystemOnly,
    /// Present only in the reference.
    #[serde(rename = "-")]
    ReferenceOnly,
}

impl fmt::Display for DiffSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffSign::SystemOnly => write!(f, "+"),
            DiffSign::ReferenceOnly => write!(f, "-"),
        }
    }
}

/// An annotation present on one side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Side it came from.
    pub sign: DiffSign,
    /// Start offset.
    pub start: usize,
    /// End offset.
    pub end: usize,
    /// Tag.
    pub tag: String,
    /// Full annotation text.
    pub text: String,
}

impl DiffLine {
    /// True for `+` lines.
    #[must_use]
    pub fn is_system_only(&self) -> bool {
        self.sign == DiffSign::SystemOnly
    }

    /// The `(tag:start)` label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("({}:{})", self.tag, self.start)
    }

    /// Text cut to `width` chars (`...` appended when cut), newlines shown
    /// as `\\`.
    #[must_use]
    pub fn preview(&self, width: usize) -> String {
        let cut = if self.text.chars().count() > width {
            let mut s: String = self.text.chars().take(width).collect();
            s.push_str("...");
            s
        } else {
            self.text.clone()
        };
        cut.replace('\n', "\\\\")
    }
}

/// Annotations present on exactly one side, tag in `tags`, sorted by
/// `(start, end, tag, text)`.
#[must_use]
pub fn build_diff_lines<S: AsRef<str>>(
    system: &[Annotation],
    reference: &[Annotation],
    tags: &[S],
) -> Vec<DiffLine> {
    let wanted = |tag: &str| tags.iter().any(|t| t.as_ref() == tag);
    let sys: BTreeSet<_> = system.iter().map(Annotation::content_key).collect();
    let gold: BTreeSet<_> = reference.iter().map(Annotation::content_key).collect();

    let mut lines: Vec<DiffLine> = sys
        .difference(&gold)
        .map(|k| (DiffSign::SystemOnly, k))
        .chain(gold.difference(&sys).map(|k| (DiffSign::ReferenceOnly, k)))
        .filter(|(_, (_, _, tag, _))| wanted(tag))
        .map(|(sign, &(start, end, tag, text))| DiffLine {
            sign,
            start,
            end,
            tag: tag.to_string(),
            text: text.to_string(),
        })
        .collect();
    lines.sort_by(|a, b| {
        (a.start, a.end, &a.tag, &a.text).cmp(&(b.start, b.end, &b.tag, &b.text))
    });
    lines
}

/// Render diff lines with labels right-aligned to the widest label.
#[must_use]
pub fn format_diff_lines(lines: &[DiffLine], preview_width: usize) -> Vec<String> {
    let labels: Vec<String> = lines.iter().map(DiffLine::label).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    lines
        .iter()
        .zip(labels)
        .map(|(line, label)| {
            format!(
                "{} {:>width$} {}",
                line.sign,
                label,
                line.preview(preview_width),
                width = width
            )
        })
        .collect()
}

/// Annotation and position counts of a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Positions scored.
    pub positions: usize,
    /// Annotations in the system export.
    pub system_annotations: usize,
    /// Annotations in the reference export.
    pub reference_annotations: usize,
    /// `+` diff lines.
    pub system_only: usize,
    /// `-` diff lines.
    pub reference_only: usize,
}

/// Scores and diff of a system export against a reference export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Macro F1.
    pub f1: f64,
    /// Macro precision.
    pub precision: f64,
    /// Macro recall.
    pub recall: f64,
    /// Per-class scores.
    pub per_class: Vec<ClassMetrics>,
    /// Annotations on one side only.
    pub diff_lines: Vec<DiffLine>,
    /// Counts.
    pub counts: Counts,
    /// Preview width used when rendering the diff.
    pub preview_width: usize,
}

impl Report {
    /// Diff block as aligned text lines.
    #[must_use]
    pub fn diff_text(&self) -> Vec<String> {
        format_diff_lines(&self.diff_lines, self.preview_width)
    }

    /// Multi-line human-readable report.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();

        out.push_str("=== Score Report ===\n\n");
        out.push_str("## Macro Scores\n");
        out.push_str(&format!("  Precision: {:.1}%\n", self.precision * 100.0));
        out.push_str(&format!("  Recall:    {:.1}%\n", self.recall * 100.0));
        out.push_str(&format!("  F1:        {:.1}%\n\n", self.f1 * 100.0));

        if !self.per_class.is_empty() {
            out.push_str("## Per-Class\n");
            for class in &self.per_class {
                out.push_str(&format!(
                    "  {:12} P={:.0}% R={:.0}% F1={:.0}% (n={})\n",
                    class.label,
                    class.precision * 100.0,
                    class.recall * 100.0,
                    class.f1 * 100.0,
                    class.counts.support()
                ));
            }
            out.push('\n');
        }

        out.push_str("## Counts\n");
        out.push_str(&format!(
            "  positions: {}, system: {} annotations, reference: {} annotations\n",
            self.counts.positions, self.counts.system_annotations, self.counts.reference_annotations
        ));

        if !self.diff_lines.is_empty() {
            out.push_str("\n## Diff (+ system only, - reference only)\n");
            for line in self.diff_text() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
