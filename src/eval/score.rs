//! Multi-label tag scoring.
//!
//! Each position (character or token) carries a set of labels. After `B-`/`I-`
//! prefixes are stripped, both sequences are binarized over a vocabulary and
//! per-class counts are collected with the reference as ground truth:
//!
//! | reference has T | system has T | count |
//! |-----------------|--------------|-------|
//! | yes | yes | TP |
//! | no  | yes | FP |
//! | yes | no  | FN |
//!
//! Macro scores are unweighted means of the per-class scores. A class with no
//! predictions or no support scores 0 rather than NaN.
//!
//! # Vocabulary
//!
//! Only classes that appear somewhere in either sequence are scored, so a
//! class neither side used never drags the macro average down.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::report::{build_diff_lines, Counts, Report};
use crate::export::ExportResult;
use crate::tagging::{strip_prefix, TagSet};
use crate::{Error, Result};

/// Default width of diff text previews.
pub const DEFAULT_PREVIEW_WIDTH: usize = 75;

/// Confusion counts for one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    /// Positions where both sides carry the class.
    pub tp: usize,
    /// Positions where only the system carries the class.
    pub fp: usize,
    /// Positions where only the reference carries the class.
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ClassCounts {
    /// Precision, 0 when nothing was predicted.
    #[must_use]
    pub fn precision(&self) -> f64 {
        let predicted = self.tp + self.fp;
        if predicted == 0 {
            return 0.0;
        }
        self.tp as f64 / predicted as f64
    }

    /// Recall, 0 when the class has no support.
    #[must_use]
    pub fn recall(&self) -> f64 {
        let support = self.support();
        if support == 0 {
            return 0.0;
        }
        self.tp as f64 / support as f64
    }

    /// Harmonic mean of precision and recall.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    /// Reference positions carrying the class.
    #[must_use]
    pub fn support(&self) -> usize {
        self.tp + self.fn_
    }
}

/// Scores for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Class name.
    pub label: String,
    /// Raw counts.
    pub counts: ClassCounts,
    /// Precision.
    pub precision: f64,
    /// Recall.
    pub recall: f64,
    /// F1.
    pub f1: f64,
}

/// Macro-averaged scores plus the per-class breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Macro precision.
    pub precision: f64,
    /// Macro recall.
    pub recall: f64,
    /// Macro F1 (mean of per-class F1).
    pub f1: f64,
    /// One entry per vocabulary class, in vocabulary order.
    pub per_class: Vec<ClassMetrics>,
    /// Number of positions scored.
    pub positions: usize,
}

impl ScoreSummary {
    /// Scores for `label`, if it was in the vocabulary.
    #[must_use]
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.per_class.iter().find(|c| c.label == label)
    }

    /// The vocabulary scored, in order.
    #[must_use]
    pub fn vocabulary(&self) -> Vec<&str> {
        self.per_class.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Strip `B-`/`I-` from every tag; duplicates collapse.
#[must_use]
pub fn strip_sequence(tags: &[TagSet]) -> Vec<HashSet<String>> {
    tags.iter()
        .map(|set| set.iter().map(|t| strip_prefix(t).to_string()).collect())
        .collect()
}

/// Candidate tags that occur in either stripped sequence, in candidate order.
#[must_use]
pub fn label_vocabulary<S: AsRef<str>>(
    candidates: &[S],
    system: &[HashSet<String>],
    reference: &[HashSet<String>],
) -> Vec<String> {
    let observed: HashSet<&str> = system
        .iter()
        .chain(reference)
        .flat_map(|set| set.iter().map(String::as_str))
        .collect();

    let mut vocabulary: Vec<String> = Vec::new();
    for tag in candidates {
        let tag = tag.as_ref();
        if observed.contains(tag) && !vocabulary.iter().any(|v| v == tag) {
            vocabulary.push(tag.to_string());
        }
    }
    vocabulary
}

/// Score `system` against `reference` over the candidate `tags`.
///
/// Both sequences must have one entry per position of the same segmentation;
/// otherwise [`Error::LengthMismatch`].
pub fn score_sequences<S: AsRef<str>>(
    system: &[TagSet],
    reference: &[TagSet],
    tags: &[S],
) -> Result<ScoreSummary> {
    if system.len() != reference.len() {
        return Err(Error::LengthMismatch {
            system: system.len(),
            reference: reference.len(),
        });
    }

    let system = strip_sequence(system);
    let reference = strip_sequence(reference);
    let vocabulary = label_vocabulary(tags, &system, &reference);

    if vocabulary.is_empty() {
        warn!("score: no candidate tag occurs in either sequence; scores are 0");
    }

    let per_class: Vec<ClassMetrics> = vocabulary
        .into_iter()
        .map(|label| {
            let mut counts = ClassCounts::default();
            for (sys, gold) in system.iter().zip(&reference) {
                match (sys.contains(&label), gold.contains(&label)) {
                    (true, true) => counts.tp += 1,
                    (true, false) => counts.fp += 1,
                    (false, true) => counts.fn_ += 1,
                    (false, false) => {}
                }
            }
            ClassMetrics {
                precision: counts.precision(),
                recall: counts.recall(),
                f1: counts.f1(),
                label,
                counts,
            }
        })
        .collect();

    let mean = |f: fn(&ClassMetrics) -> f64| {
        if per_class.is_empty() {
            0.0
        } else {
            per_class.iter().map(f).sum::<f64>() / per_class.len() as f64
        }
    };

    let summary = ScoreSummary {
        precision: mean(|c| c.precision),
        recall: mean(|c| c.recall),
        f1: mean(|c| c.f1),
        positions: system.len(),
        per_class,
    };
    debug!(
        "score: {} positions, vocabulary {:?}, macro F1 {:.3}",
        summary.positions,
        summary.vocabulary(),
        summary.f1
    );
    Ok(summary)
}

/// Scores two exports and diffs their annotations.
#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine {
    /// Characters of annotation text shown per diff line.
    pub preview_width: usize,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self {
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

impl ScoreEngine {
    /// Engine with a custom preview width.
    #[must_use]
    pub fn new(preview_width: usize) -> Self {
        Self { preview_width }
    }

    /// Score `system` against `reference` and list the annotations that
    /// differ, both restricted to `tags`.
    pub fn score_and_diff<S: AsRef<str>>(
        &self,
        system: &ExportResult,
        reference: &ExportResult,
        tags: &[S],
    ) -> Result<Report> {
        let scores = score_sequences(&system.tag_sequence(), &reference.tag_sequence(), tags)?;
        let diff_lines = build_diff_lines(&system.annotations, &reference.annotations, tags);

        let counts = Counts {
            positions: scores.positions,
            system_annotations: system.annotations.len(),
            reference_annotations: reference.annotations.len(),
            system_only: diff_lines.iter().filter(|l| l.is_system_only()).count(),
            reference_only: diff_lines.iter().filter(|l| !l.is_system_only()).count(),
        };

        Ok(Report {
            precision: scores.precision,
            recall: scores.recall,
            f1: scores.f1,
            per_class: scores.per_class,
            diff_lines,
            counts,
            preview_width: self.preview_width,
        })
    }
}
