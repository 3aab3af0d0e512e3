//! Annotation and link records.
//!
//! An [`Annotation`] marks a character span of a document's raw text with a
//! semantic tag ("definition", "theorem", "proof", ...). A [`Link`] is a
//! directed relation between two annotations of the same file and save.
//!
//! # Offsets
//!
//! `start` and `end` are **character** offsets (Unicode scalar values) into
//! the raw document text, never byte offsets. Whether `end` is exclusive or
//! inclusive is decided by the consumer: span tagging uses a configurable
//! boundary convention, while the diff sweep treats `end` as inclusive.
//!
//! # Sentinels
//!
//! Two reserved tags, [`BEGIN_ANNOTATION`] and [`END_ANNOTATION`], mark the
//! user-chosen export window. They are not semantic classes and are excluded
//! from tagging and scoring unless a caller opts in.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Tag of the sentinel row marking the start of the export window.
pub const BEGIN_ANNOTATION: &str = "begin annotation";

/// Tag of the sentinel row marking the end of the export window.
pub const END_ANNOTATION: &str = "end annotation";

/// Highlight color used when a record carries none.
pub const DEFAULT_COLOR: &str = "#d3d3d3";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A tagged character span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation identifier (unique within a save).
    #[serde(alias = "annoid", default)]
    pub id: String,
    /// Document the annotation belongs to.
    #[serde(rename = "fileid", alias = "fileId", alias = "file_id", default)]
    pub file_id: String,
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
    /// Semantic tag, or one of the sentinel tags.
    pub tag: String,
    /// Surface text covered by the span.
    #[serde(default)]
    pub text: String,
    /// Highlight color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Outgoing links whose `source` is this annotation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Annotation {
    /// Create an annotation with empty text and the default color.
    #[must_use]
    pub fn new(id: impl Into<String>, start: usize, end: usize, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_id: String::new(),
            start,
            end,
            tag: tag.into(),
            text: String::new(),
            color: default_color(),
            links: Vec::new(),
        }
    }

    /// Set the surface text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the owning document.
    #[must_use]
    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = file_id.into();
        self
    }

    /// Set the highlight color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Attach outgoing links.
    #[must_use]
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    /// True for the `begin annotation` sentinel.
    #[must_use]
    pub fn is_begin_sentinel(&self) -> bool {
        self.tag == BEGIN_ANNOTATION
    }

    /// True for the `end annotation` sentinel.
    #[must_use]
    pub fn is_end_sentinel(&self) -> bool {
        self.tag == END_ANNOTATION
    }

    /// True for either sentinel tag.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.is_begin_sentinel() || self.is_end_sentinel()
    }

    /// Identity used by the diff sweep: `(start, end, tag)`.
    ///
    /// Text is deliberately not part of the key; two annotations with the
    /// same span and tag but different text compare equal here.
    #[must_use]
    pub fn span_key(&self) -> SpanKey {
        SpanKey {
            start: self.start,
            end: self.end,
            tag: self.tag.clone(),
        }
    }

    /// Identity used by the textual score diff: `(start, end, tag, text)`.
    #[must_use]
    pub fn content_key(&self) -> (usize, usize, &str, &str) {
        (self.start, self.end, self.tag.as_str(), self.text.as_str())
    }

    /// Validate the span against a document of `text_char_len` characters.
    ///
    /// Returns every issue found (empty if valid). Out-of-range spans are
    /// reported but are legal input for windowed tagging, which clips them.
    #[must_use]
    pub fn validate(&self, text_char_len: usize) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.start > self.end {
            issues.push(ValidationIssue::InvalidSpan {
                start: self.start,
                end: self.end,
                reason: "start must not exceed end".to_string(),
            });
        }

        if self.end > text_char_len {
            issues.push(ValidationIssue::SpanOutOfBounds {
                end: self.end,
                text_len: text_char_len,
            });
        }

        if self.tag.trim().is_empty() {
            issues.push(ValidationIssue::EmptyTag {
                id: self.id.clone(),
            });
        }

        issues
    }

    /// Fail with [`Error::InvalidInput`] if `start > end`.
    pub fn ensure_ordered(&self) -> Result<()> {
        if self.start > self.end {
            return Err(Error::invalid_input(format!(
                "annotation {} has start {} > end {}",
                self.id, self.start, self.end
            )));
        }
        Ok(())
    }
}

/// A directed relation between two annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Id of the source annotation.
    pub source: String,
    /// Id of the target annotation.
    pub target: String,
    /// Relation tag.
    pub tag: String,
    /// Start offset of the link's anchor span.
    pub start: usize,
    /// End offset of the link's anchor span.
    pub end: usize,
    /// Highlight color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Document the link belongs to.
    #[serde(rename = "fileid", alias = "fileId", alias = "file_id", default)]
    pub file_id: String,
}

impl Link {
    /// Create a link between two annotation ids.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        tag: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            tag: tag.into(),
            start,
            end,
            color: default_color(),
            file_id: String::new(),
        }
    }
}

/// `(start, end, tag)` identity triple of an annotation.
///
/// Ordered by start, then end, then tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpanKey {
    /// Start character offset.
    pub start: usize,
    /// End character offset (inclusive for the diff sweep).
    pub end: usize,
    /// Tag.
    pub tag: String,
}

impl SpanKey {
    /// Whether the inclusive range `[start, end]` covers `pos`.
    #[must_use]
    pub fn covers(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl fmt::Display for SpanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{}-{})", self.tag, self.start, self.end)
    }
}

/// Validation issue found on an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Span bounds are invalid (start > end).
    InvalidSpan {
        /// Start position of the invalid span.
        start: usize,
        /// End position of the invalid span.
        end: usize,
        /// Description of why the span is invalid.
        reason: String,
    },
    /// Span extends beyond the document.
    SpanOutOfBounds {
        /// End position that exceeds the text.
        end: usize,
        /// Character length of the text.
        text_len: usize,
    },
    /// Tag is empty or whitespace.
    EmptyTag {
        /// Id of the offending annotation.
        id: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::InvalidSpan { start, end, reason } => {
                write!(f, "Invalid span [{}, {}): {}", start, end, reason)
            }
            ValidationIssue::SpanOutOfBounds { end, text_len } => {
                write!(f, "Span end {} exceeds text length {}", end, text_len)
            }
            ValidationIssue::EmptyTag { id } => write!(f, "Annotation {} has an empty tag", id),
        }
    }
}
