//! Annotation export: resolve a window, tag it, optionally align to tokens.
//!
//! # Window resolution
//!
//! | bound | 1st choice | 2nd choice | fallback |
//! |-------|-----------|------------|----------|
//! | begin | explicit argument | first `begin annotation` row | minimal `start` |
//! | end   | explicit argument | first `end annotation` row | maximal `end` |
//!
//! Unless `whole_file` is set the text is cut to `[begin.start, end.end)`
//! (in characters) and tagging runs with `begin.start` as offset.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::offset::{char_len, char_slice};
use crate::store::AnnotationStore;
use crate::tagging::{SpanIndex, TagSet, TokenAligner};
use crate::tokenize::{Tokenization, Tokenizer};
use crate::{Error, Result};
use texanno_core::Annotation;

/// One exported position: a character or token surface string and its tags.
///
/// Serializes as a `[surface, [tags...]]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IobTag(pub String, pub TagSet);

impl IobTag {
    /// Surface string.
    #[must_use]
    pub fn surface(&self) -> &str {
        &self.0
    }

    /// Tag set.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.1
    }
}

/// Result of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResult {
    /// Tagged positions: one per character, or one per traceable token.
    pub iob_tags: Vec<IobTag>,
    /// The annotations the export was built from, unchanged.
    pub annotations: Vec<Annotation>,
    /// Resolved window start annotation.
    pub begin: Annotation,
    /// Resolved window end annotation.
    pub end: Annotation,
    /// The (possibly sliced) text that was tagged.
    #[serde(alias = "tex")]
    pub text: String,
}

impl ExportResult {
    /// Tag sets in position order.
    #[must_use]
    pub fn tag_sequence(&self) -> Vec<TagSet> {
        self.iob_tags.iter().map(|t| t.1.clone()).collect()
    }

    /// Number of tagged positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iob_tags.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iob_tags.is_empty()
    }
}

/// Pick the export window's begin and end annotations.
///
/// Fails with [`Error::EmptyAnnotationSet`] only when a bound is not given
/// explicitly and there are no annotations to derive it from.
pub fn resolve_window(
    annotations: &[Annotation],
    begin: Option<&Annotation>,
    end: Option<&Annotation>,
) -> Result<(Annotation, Annotation)> {
    let begin = match begin {
        Some(b) => b.clone(),
        None => annotations
            .iter()
            .find(|a| a.is_begin_sentinel())
            .or_else(|| annotations.iter().min_by_key(|a| a.start))
            .cloned()
            .ok_or(Error::EmptyAnnotationSet)?,
    };
    let end = match end {
        Some(e) => e.clone(),
        None => annotations
            .iter()
            .find(|a| a.is_end_sentinel())
            .or_else(|| annotations.iter().rev().max_by_key(|a| a.end))
            .cloned()
            .ok_or(Error::EmptyAnnotationSet)?,
    };
    Ok((begin, end))
}

/// Builds [`ExportResult`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationExporter {
    /// Character tagging configuration.
    pub span_index: SpanIndex,
    /// Tag the whole text instead of the resolved window.
    pub whole_file: bool,
}

impl AnnotationExporter {
    /// Exporter with the given tagging configuration.
    #[must_use]
    pub fn new(span_index: SpanIndex) -> Self {
        Self {
            span_index,
            whole_file: false,
        }
    }

    /// Tag the whole text rather than the window.
    #[must_use]
    pub fn with_whole_file(mut self, whole_file: bool) -> Self {
        self.whole_file = whole_file;
        self
    }

    /// Export `annotations` over `raw_text`.
    ///
    /// With `tokens`, the tokenization must be of the text actually tagged
    /// (the window, or the whole text when `whole_file` is set). Use
    /// [`AnnotationExporter::export_with`] to let the exporter tokenize.
    pub fn export(
        &self,
        annotations: &[Annotation],
        raw_text: &str,
        tokens: Option<&Tokenization>,
        begin: Option<&Annotation>,
        end: Option<&Annotation>,
    ) -> Result<ExportResult> {
        let (begin, end) = resolve_window(annotations, begin, end)?;
        let (text, offset) = self.window_text(raw_text, &begin, &end);

        let text_len = char_len(&text);
        let char_tags = self.span_index.tag(text_len, annotations, offset);

        let iob_tags: Vec<IobTag> = match tokens {
            Some(tokens) => TokenAligner::align_offsets(tokens.offsets(), &char_tags)
                .into_iter()
                .map(|(idx, tags)| {
                    IobTag(tokens.token_str(idx).unwrap_or_default().to_string(), tags)
                })
                .collect(),
            None => text
                .chars()
                .zip(char_tags)
                .map(|(ch, tags)| IobTag(ch.to_string(), tags))
                .collect(),
        };

        match tokens {
            Some(tokens) => debug!(
                "export: window [{}, {}] -> {} chars, {} of {} tokens traceable",
                begin.start,
                end.end,
                text_len,
                tokens.offsets().traceable(),
                tokens.len()
            ),
            None => debug!(
                "export: window [{}, {}] -> {} chars",
                begin.start, end.end, text_len
            ),
        }

        Ok(ExportResult {
            iob_tags,
            annotations: annotations.to_vec(),
            begin,
            end,
            text,
        })
    }

    /// Export, tokenizing the tagged text with `tokenizer` first.
    pub fn export_with(
        &self,
        annotations: &[Annotation],
        raw_text: &str,
        tokenizer: &dyn Tokenizer,
        begin: Option<&Annotation>,
        end: Option<&Annotation>,
    ) -> Result<ExportResult> {
        let (b, e) = resolve_window(annotations, begin, end)?;
        let (text, _) = self.window_text(raw_text, &b, &e);
        let tokens = tokenizer.tokenize(&text)?;
        debug!("export: {} tokenizer produced {} tokens", tokenizer.name(), tokens.len());
        self.export(annotations, raw_text, Some(&tokens), Some(&b), Some(&e))
    }

    /// Text to tag and its absolute char offset. The window runs from the
    /// begin annotation's start through the end annotation's last covered
    /// character, read with the configured span boundary.
    fn window_text(&self, raw_text: &str, begin: &Annotation, end: &Annotation) -> (String, usize) {
        if self.whole_file {
            (raw_text.to_string(), 0)
        } else {
            let stop = self.span_index.boundary.exclusive_end(end.end);
            (char_slice(raw_text, begin.start, stop).to_string(), begin.start)
        }
    }
}

/// Export a stored save: load its annotations and its document's text.
///
/// `timestamp` of `None` selects the user's latest save on the document.
pub fn export_save(
    store: &dyn AnnotationStore,
    exporter: &AnnotationExporter,
    file_id: &str,
    user_id: &str,
    timestamp: Option<&DateTime<Utc>>,
    tokenizer: Option<&dyn Tokenizer>,
) -> Result<ExportResult> {
    let annotations = store.load_annotations(file_id, user_id, timestamp)?;
    let text = store.document_text(file_id)?;
    match tokenizer {
        Some(tokenizer) => exporter.export_with(&annotations, &text, tokenizer, None, None),
        None => exporter.export(&annotations, &text, None, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::WordTokenizer;
    use texanno_core::{BEGIN_ANNOTATION, END_ANNOTATION};

    fn set(tags: &[&str]) -> TagSet {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_resolve_window_prefers_explicit_then_sentinels() {
        let annos = vec![
            Annotation::new("d", 2, 5, "definition"),
            Annotation::new("s", 1, 1, BEGIN_ANNOTATION),
            Annotation::new("e", 8, 9, END_ANNOTATION),
        ];
        let (b, e) = resolve_window(&annos, None, None).unwrap();
        assert_eq!((b.id.as_str(), e.id.as_str()), ("s", "e"));

        let explicit = Annotation::new("x", 0, 0, "anything");
        let (b, e) = resolve_window(&annos, Some(&explicit), None).unwrap();
        assert_eq!((b.id.as_str(), e.id.as_str()), ("x", "e"));
    }

    #[test]
    fn test_resolve_window_falls_back_to_extremes() {
        let annos = vec![
            Annotation::new("a", 4, 6, "proof"),
            Annotation::new("b", 1, 3, "name"),
            Annotation::new("c", 5, 9, "theorem"),
        ];
        let (b, e) = resolve_window(&annos, None, None).unwrap();
        assert_eq!(b.id, "b");
        assert_eq!(e.id, "c");
    }

    #[test]
    fn test_resolve_window_empty() {
        assert!(matches!(
            resolve_window(&[], None, None),
            Err(Error::EmptyAnnotationSet)
        ));
        let b = Annotation::new("b", 0, 0, BEGIN_ANNOTATION);
        let e = Annotation::new("e", 3, 3, END_ANNOTATION);
        assert!(resolve_window(&[], Some(&b), Some(&e)).is_ok());
    }

    #[test]
    fn test_export_characters() {
        let annos = vec![Annotation::new("d", 0, 2, "definition").with_text("AB")];
        let result = AnnotationExporter::default()
            .export(&annos, "ABCDE", None, None, None)
            .unwrap();
        // Window is [0, 2): only the annotation itself.
        assert_eq!(result.text, "AB");
        assert_eq!(result.iob_tags[0], IobTag("A".into(), set(&["B-definition"])));
        assert_eq!(result.iob_tags[1], IobTag("B".into(), set(&["I-definition"])));

        let whole = AnnotationExporter::default()
            .with_whole_file(true)
            .export(&annos, "ABCDE", None, None, None)
            .unwrap();
        assert_eq!(whole.len(), 5);
        assert_eq!(whole.iob_tags[4].tags(), &set(&["O"]));
    }

    #[test]
    fn test_inclusive_window_keeps_last_character() {
        use crate::tagging::{SpanBoundary, SpanIndex};

        let annos = vec![Annotation::new("d", 0, 4, "definition")];
        let exporter = AnnotationExporter::new(SpanIndex::new(SpanBoundary::Inclusive));

        let windowed = exporter.export(&annos, "ABCDE", None, None, None).unwrap();
        assert_eq!(windowed.text, "ABCDE");
        assert_eq!(windowed.len(), 5);
        assert_eq!(windowed.iob_tags[4], IobTag("E".into(), set(&["I-definition"])));

        let whole = exporter
            .with_whole_file(true)
            .export(&annos, "ABCDE", None, None, None)
            .unwrap();
        assert_eq!(whole.iob_tags, windowed.iob_tags);

        // An end past the text is clipped, not an error.
        let past = vec![Annotation::new("d", 2, 9, "definition")];
        let clipped = exporter.export(&past, "ABCDE", None, None, None).unwrap();
        assert_eq!(clipped.text, "CDE");
    }

    #[test]
    fn test_export_window_from_sentinels() {
        let text = "Intro. A group is a set. Done.";
        let annos = vec![
            Annotation::new("b", 7, 7, BEGIN_ANNOTATION),
            Annotation::new("d", 9, 14, "definition").with_text("group"),
            Annotation::new("e", 24, 24, END_ANNOTATION),
        ];
        let result = AnnotationExporter::default()
            .export(&annos, text, None, None, None)
            .unwrap();
        assert_eq!(result.text, "A group is a set.");
        assert_eq!(result.iob_tags[2].surface(), "g");
        assert_eq!(result.iob_tags[2].tags(), &set(&["B-definition"]));
        assert_eq!(result.iob_tags[0].tags(), &set(&["O"]));
    }

    #[test]
    fn test_export_tokens() {
        let text = "Let G be a group";
        let annos = vec![
            Annotation::new("n", 4, 5, "name"),
            Annotation::new("d", 0, 16, "definition"),
        ];
        let result = AnnotationExporter::default()
            .export_with(&annos, text, &WordTokenizer, None, None)
            .unwrap();
        let surfaces: Vec<&str> = result.iob_tags.iter().map(IobTag::surface).collect();
        assert_eq!(surfaces, vec!["Let", "G", "be", "a", "group"]);
        assert_eq!(result.iob_tags[0].tags(), &set(&["B-definition"]));
        assert_eq!(result.iob_tags[1].tags(), &set(&["B-name", "I-definition"]));
        assert_eq!(result.iob_tags[4].tags(), &set(&["I-definition"]));
    }

    #[test]
    fn test_export_serializes_pairs() {
        let annos = vec![Annotation::new("d", 0, 1, "name")];
        let result = AnnotationExporter::default()
            .export(&annos, "xy", None, None, None)
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["iob_tags"][0], serde_json::json!(["x", ["B-name"]]));
        assert_eq!(json["text"], "x");
    }
}
