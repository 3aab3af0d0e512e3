//! Comparing annotation sets.
//!
//! # Overview
//!
//! - [`diff`]: which annotations of each of N sets are not shared by all
//! - [`score`]: macro precision/recall/F1 of tag sequences over a
//!   data-dependent vocabulary
//! - [`report`]: scores plus a `+`/`-` annotation diff, as text or JSON
//! - [`agreement`]: inter-annotator agreement over all final saves
//!
//! # Scoring two exports
//!
//! ```rust
//! use texanno::eval::ScoreEngine;
//! use texanno::export::AnnotationExporter;
//! use texanno::Annotation;
//!
//! let text = "Let G be a group.";
//! let gold = vec![Annotation::new("g", 11, 16, "definition").with_text("group")];
//! let sys = vec![Annotation::new("s", 11, 16, "definition").with_text("group")];
//!
//! let exporter = AnnotationExporter::default().with_whole_file(true);
//! let reference = exporter.export(&gold, text, None, None, None)?;
//! let system = exporter.export(&sys, text, None, None, None)?;
//!
//! let report = ScoreEngine::default().score_and_diff(&system, &reference, &["definition"])?;
//! assert_eq!(report.f1, 1.0);
//! assert!(report.diff_lines.is_empty());
//! # Ok::<(), texanno::Error>(())
//! ```

pub mod agreement;
pub mod diff;
pub mod report;
pub mod score;

pub use agreement::{agreement_dashboard, AgreementEntry, AgreementGroup};
pub use diff::{diff, diff_whole};
pub use report::{build_diff_lines, format_diff_lines, Counts, DiffLine, DiffSign, Report};
pub use score::{
    label_vocabulary, score_sequences, ClassCounts, ClassMetrics, ScoreEngine, ScoreSummary,
};
