//! Character, byte and token offsets.
//!
//! # The Three Coordinate Systems
//!
//! Annotations are stored in **character** offsets (what the annotation UI
//! counts), Rust strings are indexed by **byte**, and tokenizers report
//! **token** indices with a per-token span back into the text.
//!
//! ```text
//! Text:   "Let $G$ be a group. Théorème"
//!
//! CHAR    T h é o r è m e        <- annotation offsets
//!         0 1 2 3 4 5 6 7
//! BYTE    T h [é ] o r [è ] m e  <- &str indexing, HF tokenizer offsets
//!         0 1 2-3  4 5 6-7  8 9
//! TOKEN   ["Th", "éor", "ème"]   <- token i maps to a char span, or to
//!            0      1      2        nothing at all for special tokens
//! ```
//!
//! Tagging runs in char space. Anything coming from byte space (slicing,
//! tokenizer offsets) goes through a [`SpanConverter`] first.
//!
//! This module provides:
//! - [`SpanConverter`]: O(1) byte -> char conversion for one text
//! - [`TokenOffsets`]: per-token char spans, `None` for untraceable tokens
//! - [`char_slice`]: slice a `&str` by char offsets, clipping out-of-range ends

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by character offsets `[char_start, char_end)`.
///
/// Offsets past the end are clipped; an inverted range yields `""`.
///
/// ```
/// use texanno::offset::char_slice;
///
/// assert_eq!(char_slice("Théorème", 2, 5), "éor");
/// assert_eq!(char_slice("abc", 1, 99), "bc");
/// assert_eq!(char_slice("abc", 2, 1), "");
/// ```
#[must_use]
pub fn char_slice(text: &str, char_start: usize, char_end: usize) -> &str {
    if char_start >= char_end {
        return "";
    }
    let (byte_start, byte_end) = chars_to_bytes(text, char_start, char_end);
    text.get(byte_start..byte_end).unwrap_or("")
}

/// Convert character offsets to byte offsets, clipping to the text.
#[must_use]
pub fn chars_to_bytes(text: &str, char_start: usize, char_end: usize) -> (usize, usize) {
    let mut byte_start = text.len();
    let mut byte_end = text.len();

    for (char_idx, (byte_idx, _ch)) in text.char_indices().enumerate() {
        if char_idx == char_start {
            byte_start = byte_idx;
        }
        if char_idx == char_end {
            byte_end = byte_idx;
            break;
        }
    }

    (byte_start, byte_end)
}

/// Byte-to-char converter for many offsets over the same text.
///
/// Pre-computes a mapping table so each conversion is O(1). ASCII text skips
/// the table entirely.
#[derive(Debug, Clone)]
pub struct SpanConverter {
    byte_to_char: Vec<usize>,
    char_count: usize,
    is_ascii: bool,
}

impl SpanConverter {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                byte_to_char: Vec::new(),
                char_count: text.len(),
                is_ascii: true,
            };
        }

        let mut byte_to_char = vec![0usize; text.len() + 1];
        let mut char_count = 0;

        for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
            for slot in &mut byte_to_char[byte_idx..byte_idx + ch.len_utf8()] {
                *slot = char_idx;
            }
            char_count = char_idx + 1;
        }
        byte_to_char[text.len()] = char_count;

        Self {
            byte_to_char,
            char_count,
            is_ascii: false,
        }
    }

    /// Number of characters in the text.
    #[must_use]
    pub const fn char_count(&self) -> usize {
        self.char_count
    }

    /// Convert byte offset to char offset (clipped to the text end).
    #[must_use]
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        if self.is_ascii {
            byte_idx.min(self.char_count)
        } else {
            self.byte_to_char
                .get(byte_idx)
                .copied()
                .unwrap_or(self.char_count)
        }
    }

    /// Convert a byte range to a char range.
    #[must_use]
    pub fn byte_range_to_chars(&self, range: Range<usize>) -> Range<usize> {
        self.byte_to_char(range.start)..self.byte_to_char(range.end)
    }

    /// Check if this text is ASCII.
    #[must_use]
    pub const fn is_ascii(&self) -> bool {
        self.is_ascii
    }
}

/// Character span of every token in a tokenization.
///
/// Spans are half-open `[start, end)` in char space. Tokens that cannot be
/// traced back to source characters (special or added tokens) hold `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOffsets {
    spans: Vec<Option<(usize, usize)>>,
}

impl TokenOffsets {
    /// Create from explicit per-token char spans.
    #[must_use]
    pub fn new(spans: Vec<Option<(usize, usize)>>) -> Self {
        Self { spans }
    }

    /// Build from byte offsets as reported by byte-oriented tokenizers.
    ///
    /// `special[i] == true` marks token `i` as untraceable regardless of its
    /// reported offsets; so does a zero-width `(0, 0)` span.
    #[must_use]
    pub fn from_byte_offsets(text: &str, offsets: &[(usize, usize)], special: &[bool]) -> Self {
        let converter = SpanConverter::new(text);
        let spans = offsets
            .iter()
            .enumerate()
            .map(|(idx, &(start, end))| {
                let is_special = special.get(idx).copied().unwrap_or(false);
                if is_special || (start == 0 && end == 0) {
                    None
                } else {
                    let chars = converter.byte_range_to_chars(start..end);
                    Some((chars.start, chars.end))
                }
            })
            .collect();
        Self { spans }
    }

    /// Char span of token `idx`; `None` if untraceable or out of range.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<(usize, usize)> {
        self.spans.get(idx).copied().flatten()
    }

    /// All spans in token order.
    #[must_use]
    pub fn spans(&self) -> &[Option<(usize, usize)>] {
        &self.spans
    }

    /// Number of tokens, traceable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of tokens with a char span.
    #[must_use]
    pub fn traceable(&self) -> usize {
        self.spans.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_slice_unicode() {
        let text = "Soit $\\mathbb{Z}$ — l'anneau";
        assert_eq!(char_slice(text, 18, 19), "—");
        assert_eq!(char_slice(text, 20, 28), "l'anneau");
    }

    #[test]
    fn test_char_slice_clips() {
        assert_eq!(char_slice("abc", 0, 10), "abc");
        assert_eq!(char_slice("abc", 5, 10), "");
        assert_eq!(char_slice("", 0, 1), "");
    }

    #[test]
    fn test_converter_ascii() {
        let conv = SpanConverter::new("Lemma 1");
        assert!(conv.is_ascii());
        assert_eq!(conv.byte_to_char(5), 5);
        assert_eq!(conv.byte_to_char(99), 7);
        assert_eq!(conv.char_count(), 7);
    }

    #[test]
    fn test_converter_unicode() {
        let text = "Théorème 2";
        let conv = SpanConverter::new(text);

        assert!(!conv.is_ascii());
        assert_eq!(conv.char_count(), 10);
        // 'é' occupies bytes 2..4
        assert_eq!(conv.byte_to_char(2), 2);
        assert_eq!(conv.byte_to_char(3), 2);
        assert_eq!(conv.byte_to_char(4), 3);
        assert_eq!(conv.byte_to_char(text.len()), 10);
        assert_eq!(conv.byte_range_to_chars(2..6), 2..5);
    }

    #[test]
    fn test_token_offsets_from_bytes() {
        let text = "Théorème de Lagrange";
        // "Th" "éor" "ème" [SEP]
        let offsets = vec![(0, 2), (2, 6), (6, 10), (0, 0)];
        let special = vec![false, false, false, true];
        let tokens = TokenOffsets::from_byte_offsets(text, &offsets, &special);

        assert_eq!(tokens.get(0), Some((0, 2)));
        assert_eq!(tokens.get(1), Some((2, 5)));
        assert_eq!(tokens.get(2), Some((5, 8)));
        assert_eq!(tokens.get(3), None);
        assert_eq!(tokens.traceable(), 3);
    }

    #[test]
    fn test_zero_width_offsets_untraceable() {
        let tokens = TokenOffsets::from_byte_offsets("ab", &[(0, 0), (0, 2)], &[]);
        assert_eq!(tokens.spans(), &[None, Some((0, 2))]);
        assert_eq!(tokens.traceable(), 1);
    }
}
