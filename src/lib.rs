//! # texanno
//!
//! Collaborative annotation of LaTeX sources: turn character-span
//! annotations into IOB tag sequences, compare annotators, and score a
//! system against a reference.
//!
//! - **Tagging**: [`tagging::SpanIndex`] writes `B-`/`I-` tags per character,
//!   [`tagging::TokenAligner`] lifts them onto any tokenization
//! - **Export**: [`export::AnnotationExporter`] resolves the annotated window
//!   and produces an [`export::ExportResult`]
//! - **Evaluation**: N-way [`eval::diff`], macro P/R/F1 with a `+`/`-`
//!   annotation diff ([`eval::ScoreEngine`]), agreement over final saves
//! - **Storage**: [`store::AnnotationStore`] with an in-memory implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use texanno::prelude::*;
//!
//! let text = "Let G be a group.";
//! let annotations = vec![
//!     Annotation::new("d1", 11, 16, "definition").with_text("group"),
//! ];
//!
//! let exporter = AnnotationExporter::default().with_whole_file(true);
//! let export = exporter.export(&annotations, text, None, None, None)?;
//!
//! assert_eq!(export.len(), text.chars().count());
//! assert!(export.iob_tags[11].tags().contains("B-definition"));
//! assert!(export.iob_tags[12].tags().contains("I-definition"));
//! # Ok::<(), texanno::Error>(())
//! ```
//!
//! ## Offsets
//!
//! All annotation offsets are character offsets; see [`offset`] for the
//! byte and token conversions.
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! texanno = { version = "0.3", default-features = false }        # library only
//! texanno = { version = "0.3", features = ["hf-tokenizer"] }     # + tokenizer.json
//! ```

#![warn(missing_docs)]

mod error;

pub mod compare;
pub mod config;
pub mod eval;
pub mod export;
pub mod offset;
pub mod store;
pub mod tagging;
pub mod tokenize;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};

pub use texanno_core::{
    format_timestamp, parse_timestamp, Annotation, Link, Save, SaveFilter, SaveKey, SaveSummary,
    SpanKey, ValidationIssue, BEGIN_ANNOTATION, DEFAULT_COLOR, END_ANNOTATION,
};

pub use compare::{diff_saves, score_saves};
pub use config::Config;
pub use eval::{diff, diff_whole, Report, ScoreEngine};
pub use export::{export_save, AnnotationExporter, ExportResult, IobTag};
pub use store::{AnnotationStore, MemoryStore};
pub use tagging::{SpanBoundary, SpanIndex, TagSet, TokenAligner};
pub use tokenize::{Tokenization, Tokenizer, WordTokenizer};

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use texanno::prelude::*;
    //!
    //! let store = MemoryStore::new();
    //! store.add_document("doc.tex", "Proof. Trivial.")?;
    //! let key = store.insert_annotations(
    //!     "doc.tex",
    //!     "ana",
    //!     &[Annotation::new("p", 0, 15, "proof")],
    //!     false,
    //!     None,
    //! )?;
    //! assert_eq!(store.load_annotations("doc.tex", "ana", Some(&key.timestamp))?.len(), 1);
    //! # Ok::<(), texanno::Error>(())
    //! ```
    pub use crate::error::{Error, Result};
    pub use crate::eval::{diff, Report, ScoreEngine};
    pub use crate::export::{AnnotationExporter, ExportResult};
    pub use crate::store::{AnnotationStore, MemoryStore};
    pub use crate::tagging::{SpanBoundary, SpanIndex, TagSet, TokenAligner};
    pub use crate::tokenize::{Tokenizer, WordTokenizer};
    pub use crate::Config;
    pub use texanno_core::{Annotation, Link, SaveFilter, SaveKey, BEGIN_ANNOTATION, END_ANNOTATION};
}
