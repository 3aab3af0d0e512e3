//! IOB tagging over characters and tokens.
//!
//! Two steps turn a bag of possibly overlapping span annotations into a tag
//! sequence a token classifier can train on:
//!
//! 1. [`SpanIndex`] tags every character of a window with the set of
//!    `B-`/`I-` tags of the annotations covering it, or `{"O"}`.
//! 2. [`TokenAligner`] unions the character sets under each token and
//!    resolves `O`/`B-`/`I-` conflicts.
//!
//! ```rust
//! use texanno::tagging::{SpanIndex, TokenAligner, TagSet};
//! use texanno::Annotation;
//!
//! let annos = vec![Annotation::new("d1", 0, 2, "definition")];
//! let chars = SpanIndex::default().tag(5, &annos, 0);
//! assert_eq!(chars[0], TagSet::from(["B-definition".to_string()]));
//! assert_eq!(chars[2], TagSet::from(["O".to_string()]));
//!
//! let tokens = TokenAligner::align(&[Some((0, 3)), None, Some((3, 5))], &chars);
//! assert_eq!(tokens.len(), 2);
//! assert!(tokens[0].contains("B-definition"));
//! assert!(!tokens[0].contains("O"));
//! ```

mod align;
mod span_index;

pub use align::TokenAligner;
pub use span_index::SpanIndex;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Tags active at one position. Ordered so output is deterministic.
pub type TagSet = BTreeSet<String>;

/// The "no tag" marker.
pub const OUTSIDE: &str = "O";

/// Prefix of the tag at a span's first position.
pub const BEGIN_PREFIX: &str = "B-";

/// Prefix of the tag at every later position of a span.
pub const INSIDE_PREFIX: &str = "I-";

/// The singleton `{"O"}` set.
#[must_use]
pub fn outside() -> TagSet {
    TagSet::from([OUTSIDE.to_string()])
}

/// Which character positions a span `(start, end)` covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanBoundary {
    /// `[start, end)`: `end` is the first position after the span.
    #[default]
    HalfOpen,
    /// `[start, end]`: `end` is the last position of the span.
    Inclusive,
}

impl SpanBoundary {
    /// Exclusive end position of a span under this convention.
    #[must_use]
    pub fn exclusive_end(self, end: usize) -> usize {
        match self {
            SpanBoundary::HalfOpen => end,
            SpanBoundary::Inclusive => end.saturating_add(1),
        }
    }
}

impl fmt::Display for SpanBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanBoundary::HalfOpen => write!(f, "half_open"),
            SpanBoundary::Inclusive => write!(f, "inclusive"),
        }
    }
}

impl std::str::FromStr for SpanBoundary {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "half_open" | "exclusive" => Ok(SpanBoundary::HalfOpen),
            "inclusive" | "closed" => Ok(SpanBoundary::Inclusive),
            other => Err(crate::Error::invalid_input(format!(
                "unknown span boundary '{}' (expected half_open or inclusive)",
                other
            ))),
        }
    }
}

/// Position marker of a tag within its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPosition {
    /// `B-`: first position of a span.
    Begin,
    /// `I-`: continuation of a span.
    Inside,
    /// `O`.
    Outside,
}

/// A tag split into position marker and class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag<'a> {
    /// Position marker.
    pub position: TagPosition,
    /// Class name; `None` for `O`.
    pub class: Option<&'a str>,
}

impl<'a> ParsedTag<'a> {
    /// Parse `B-T`, `I-T` or `O`. Anything else is a bare class with an
    /// `Inside` marker, so already-stripped labels survive a second pass.
    #[must_use]
    pub fn parse(tag: &'a str) -> Self {
        if tag == OUTSIDE {
            return Self {
                position: TagPosition::Outside,
                class: None,
            };
        }
        if let Some(class) = tag.strip_prefix(BEGIN_PREFIX) {
            return Self {
                position: TagPosition::Begin,
                class: Some(class),
            };
        }
        Self {
            position: TagPosition::Inside,
            class: Some(tag.strip_prefix(INSIDE_PREFIX).unwrap_or(tag)),
        }
    }
}

/// Strip a `B-`/`I-` prefix, leaving the class name (`O` stays `O`).
#[must_use]
pub fn strip_prefix(tag: &str) -> &str {
    ParsedTag::parse(tag).class.unwrap_or(OUTSIDE)
}

/// Invariant violation found in a tag sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagIssue {
    /// Position carries no tag at all.
    Empty {
        /// Position index.
        position: usize,
    },
    /// `O` shares a position with a real tag.
    OutsideWithTag {
        /// Position index.
        position: usize,
    },
    /// `B-T` and `I-T` at the same position.
    BeginAndInside {
        /// Position index.
        position: usize,
        /// Conflicting class.
        class: String,
    },
}

impl fmt::Display for TagIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagIssue::Empty { position } => write!(f, "position {} has no tag", position),
            TagIssue::OutsideWithTag { position } => {
                write!(f, "position {} mixes O with a class tag", position)
            }
            TagIssue::BeginAndInside { position, class } => {
                write!(f, "position {} has both B-{} and I-{}", position, class, class)
            }
        }
    }
}

/// Check a tag sequence for the coverage and exclusion invariants.
///
/// Character-level output of [`SpanIndex`] may legitimately carry `B-T` and
/// `I-T` together when two spans of one class abut or nest; aligned token
/// output never does.
#[must_use]
pub fn validate_tag_sequence(tags: &[TagSet]) -> Vec<TagIssue> {
    let mut issues = Vec::new();
    for (position, set) in tags.iter().enumerate() {
        if set.is_empty() {
            issues.push(TagIssue::Empty { position });
            continue;
        }
        if set.contains(OUTSIDE) && set.len() > 1 {
            issues.push(TagIssue::OutsideWithTag { position });
        }
        for tag in set {
            let parsed = ParsedTag::parse(tag);
            if let (TagPosition::Begin, Some(class)) = (parsed.position, parsed.class) {
                if set.contains(&format!("{}{}", INSIDE_PREFIX, class)) {
                    issues.push(TagIssue::BeginAndInside {
                        position,
                        class: class.to_string(),
                    });
                }
            }
        }
    }
    issues
}
