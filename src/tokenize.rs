//! Tokenizers that report where each token came from.
//!
//! The exporter only needs three things from a tokenizer: the token count,
//! each token's char span (or `None`), and each token's surface string.
//! [`Tokenization`] carries exactly that.
//!
//! - [`WordTokenizer`]: Unicode word boundaries (UAX #29), whitespace dropped.
//!   Always available.
//! - [`HfTokenizer`]: a HuggingFace `tokenizer.json` (feature `hf-tokenizer`).
//!   No special tokens are added; any the model emits anyway get a `None` span.

use unicode_segmentation::UnicodeSegmentation;

use crate::offset::{SpanConverter, TokenOffsets};
use crate::Result;

/// Output of one tokenizer call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenization {
    tokens: Vec<String>,
    offsets: TokenOffsets,
}

impl Tokenization {
    /// Pair surface strings with char spans. Both must have one entry per token.
    pub fn new(tokens: Vec<String>, offsets: TokenOffsets) -> Result<Self> {
        if tokens.len() != offsets.len() {
            return Err(crate::Error::tokenizer(format!(
                "{} tokens but {} offsets",
                tokens.len(),
                offsets.len()
            )));
        }
        Ok(Self { tokens, offsets })
    }

    /// Number of tokens, special ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Char span `[start, end)` of token `idx`, `None` if untraceable.
    #[must_use]
    pub fn char_span(&self, idx: usize) -> Option<(usize, usize)> {
        self.offsets.get(idx)
    }

    /// Surface string of token `idx`.
    #[must_use]
    pub fn token_str(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(String::as_str)
    }

    /// All token spans.
    #[must_use]
    pub fn offsets(&self) -> &TokenOffsets {
        &self.offsets
    }
}

/// Something that can split text into traceable tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text`. Spans are char offsets into `text`.
    fn tokenize(&self, text: &str) -> Result<Tokenization>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Splits on Unicode word boundaries and drops whitespace segments.
///
/// `$\alpha$` becomes `$`, `\`, `alpha`, `$`, which is fine-grained enough
/// for LaTeX sources without a vocabulary file.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Tokenization> {
        let converter = SpanConverter::new(text);
        let mut tokens = Vec::new();
        let mut spans = Vec::new();

        for (byte_start, segment) in text.split_word_bound_indices() {
            if segment.trim().is_empty() {
                continue;
            }
            let chars = converter.byte_range_to_chars(byte_start..byte_start + segment.len());
            tokens.push(segment.to_string());
            spans.push(Some((chars.start, chars.end)));
        }

        Tokenization::new(tokens, TokenOffsets::new(spans))
    }

    fn name(&self) -> &str {
        "word"
    }
}

#[cfg(feature = "hf-tokenizer")]
pub use hf::HfTokenizer;

#[cfg(feature = "hf-tokenizer")]
mod hf {
    use std::path::Path;

    use super::{Tokenization, Tokenizer};
    use crate::offset::TokenOffsets;
    use crate::{Error, Result};

    /// Adapter over a HuggingFace `tokenizers` model.
    pub struct HfTokenizer {
        inner: tokenizers::Tokenizer,
        name: String,
    }

    impl HfTokenizer {
        /// Load a `tokenizer.json`.
        pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let inner = tokenizers::Tokenizer::from_file(path)
                .map_err(|e| Error::tokenizer(format!("{}: {}", path.display(), e)))?;
            log::info!("[tokenize] loaded {}", path.display());
            Ok(Self {
                inner,
                name: path.display().to_string(),
            })
        }
    }

    impl std::fmt::Debug for HfTokenizer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("HfTokenizer").field("name", &self.name).finish()
        }
    }

    impl Tokenizer for HfTokenizer {
        fn tokenize(&self, text: &str) -> Result<Tokenization> {
            let encoding = self
                .inner
                .encode(text, false)
                .map_err(|e| Error::tokenizer(format!("encode: {}", e)))?;

            let special: Vec<bool> = encoding
                .get_special_tokens_mask()
                .iter()
                .map(|&m| m == 1)
                .collect();
            // Offsets from the Rust tokenizers crate are byte offsets.
            let offsets = TokenOffsets::from_byte_offsets(text, encoding.get_offsets(), &special);

            Tokenization::new(encoding.get_tokens().to_vec(), offsets)
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}
