//! Character tags to token tags.

use super::{outside, ParsedTag, TagPosition, TagSet, INSIDE_PREFIX, OUTSIDE};
use crate::offset::TokenOffsets;

/// Maps character tag sets onto a token segmentation.
///
/// Stateless; all methods are associated functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenAligner;

impl TokenAligner {
    /// One tag set per traceable token.
    ///
    /// Token spans are half-open char ranges into the same window as
    /// `char_tags`. Tokens with a `None` span emit nothing.
    #[must_use]
    pub fn align(token_spans: &[Option<(usize, usize)>], char_tags: &[TagSet]) -> Vec<TagSet> {
        Self::align_indexed(token_spans, char_tags)
            .into_iter()
            .map(|(_, tags)| tags)
            .collect()
    }

    /// Like [`TokenAligner::align`], keeping each output's token index.
    #[must_use]
    pub fn align_indexed(
        token_spans: &[Option<(usize, usize)>],
        char_tags: &[TagSet],
    ) -> Vec<(usize, TagSet)> {
        token_spans
            .iter()
            .enumerate()
            .filter_map(|(idx, span)| {
                let (start, end) = (*span)?;
                let end = end.min(char_tags.len());
                let mut union = TagSet::new();
                if start < end {
                    for set in &char_tags[start..end] {
                        union.extend(set.iter().cloned());
                    }
                }
                Some((idx, Self::resolve(union)))
            })
            .collect()
    }

    /// Align against a [`TokenOffsets`] map.
    #[must_use]
    pub fn align_offsets(tokens: &TokenOffsets, char_tags: &[TagSet]) -> Vec<(usize, TagSet)> {
        Self::align_indexed(tokens.spans(), char_tags)
    }

    /// Apply the per-token cleanup rules to a unioned set.
    ///
    /// `O` is dropped next to any other tag; `I-T` is dropped next to `B-T`.
    /// An empty set becomes `{"O"}`.
    #[must_use]
    pub fn resolve(mut tags: TagSet) -> TagSet {
        if tags.len() > 1 {
            tags.remove(OUTSIDE);
        }
        let shadowed: Vec<String> = tags
            .iter()
            .map(|t| ParsedTag::parse(t))
            .filter(|p| p.position == TagPosition::Begin)
            .filter_map(|p| p.class)
            .map(|class| format!("{}{}", INSIDE_PREFIX, class))
            .collect();
        for tag in shadowed {
            tags.remove(&tag);
        }
        if tags.is_empty() {
            outside()
        } else {
            tags
        }
    }
}
