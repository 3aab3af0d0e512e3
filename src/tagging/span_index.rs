//! Character-level IOB tagging.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{outside, SpanBoundary, TagSet, BEGIN_PREFIX, INSIDE_PREFIX};
use texanno_core::Annotation;

/// Tags every character of a text window with the annotations covering it.
///
/// Configured once, then applied to any number of windows. Pure: no state is
/// kept between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanIndex {
    /// How `Annotation::end` is read.
    pub boundary: SpanBoundary,
    /// Skip the `begin annotation`/`end annotation` sentinel rows.
    pub skip_endpoints: bool,
}

impl Default for SpanIndex {
    fn default() -> Self {
        Self {
            boundary: SpanBoundary::HalfOpen,
            skip_endpoints: true,
        }
    }
}

impl SpanIndex {
    /// Create an index with the given boundary convention.
    #[must_use]
    pub fn new(boundary: SpanBoundary) -> Self {
        Self {
            boundary,
            ..Self::default()
        }
    }

    /// Include or skip the sentinel rows.
    #[must_use]
    pub fn with_skip_endpoints(mut self, skip: bool) -> Self {
        self.skip_endpoints = skip;
        self
    }

    /// Tag a window of `text_len` characters starting at absolute `offset`.
    ///
    /// Position `p` of the output describes absolute character `offset + p`.
    /// A span's first character gets `B-tag`, the rest `I-tag`. Positions
    /// outside the window are dropped, so a span crossing the window edge
    /// keeps its `B-` only if its start lies inside. Untouched positions get
    /// `{"O"}`.
    #[must_use]
    pub fn tag(&self, text_len: usize, annotations: &[Annotation], offset: usize) -> Vec<TagSet> {
        let mut tags: Vec<TagSet> = vec![TagSet::new(); text_len];
        let window_end = offset.saturating_add(text_len);
        let mut clipped = 0usize;

        for anno in annotations {
            if self.skip_endpoints && anno.is_sentinel() {
                continue;
            }

            let span_end = self.boundary.exclusive_end(anno.end);
            let from = anno.start.max(offset);
            let to = span_end.min(window_end);
            if anno.start < offset || span_end > window_end {
                clipped += 1;
            }

            let begin = format!("{}{}", BEGIN_PREFIX, anno.tag);
            let inside = format!("{}{}", INSIDE_PREFIX, anno.tag);
            for abs in from..to {
                let tag = if abs == anno.start { &begin } else { &inside };
                tags[abs - offset].insert(tag.clone());
            }
        }

        if clipped > 0 {
            debug!(
                "span index: {} of {} annotations clipped to window [{}, {})",
                clipped,
                annotations.len(),
                offset,
                window_end
            );
        }

        for set in &mut tags {
            if set.is_empty() {
                *set = outside();
            }
        }
        tags
    }
}
