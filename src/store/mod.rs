//! Annotation persistence interface.
//!
//! The algorithms never touch storage directly. Store-backed entry points
//! ([`crate::export::export_save`], [`crate::compare`],
//! [`crate::eval::agreement`]) take an `&dyn AnnotationStore` built once by the
//! caller and passed down.
//!
//! # Save lifecycle
//!
//! ```text
//! insert (autosave=false) ──> new timestamped save, never overwritten
//! insert (autosave=true)  ──> replaces the previous autosave of the same
//!                             (file, user, savename)
//! finalize_save           ──> toggles `final`
//! delete_save             ──> sets `deleted` (hidden from listings)
//! ```

mod group;
mod memory;

pub use group::{group_rows, prefix_ids, AnnotationRow};
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::Result;
use texanno_core::{Annotation, SaveFilter, SaveKey, SaveSummary};

/// Repository of documents, saves and their annotations.
pub trait AnnotationStore: Send + Sync {
    /// Register (or replace) a document's raw text.
    fn add_document(&self, file_id: &str, text: &str) -> Result<()>;

    /// Raw text of a document.
    ///
    /// Fails with `NotFound` for unknown ids.
    fn document_text(&self, file_id: &str) -> Result<String>;

    /// Ids of all known documents, sorted.
    fn document_ids(&self) -> Result<Vec<String>>;

    /// Annotations of the latest non-deleted save, by any user, of every
    /// document except `exclude_file_id`, links nested. Targets for
    /// cross-document links.
    fn load_other_documents(&self, exclude_file_id: &str) -> Result<Vec<Annotation>>;

    /// Store `annotations` as a save of `user_id` on `file_id`.
    ///
    /// A missing `savename` is generated. Returns the new save's key.
    fn insert_annotations(
        &self,
        file_id: &str,
        user_id: &str,
        annotations: &[Annotation],
        autosave: bool,
        savename: Option<&str>,
    ) -> Result<SaveKey>;

    /// Annotations of one save, links nested under their source annotation.
    ///
    /// Without a timestamp the user's latest non-deleted save on the document
    /// is used; if there is none the result is empty.
    fn load_annotations(
        &self,
        file_id: &str,
        user_id: &str,
        timestamp: Option<&DateTime<Utc>>,
    ) -> Result<Vec<Annotation>>;

    /// Non-deleted saves passing `filter`, newest first.
    fn load_saves(&self, filter: &SaveFilter) -> Result<Vec<SaveSummary>>;

    /// Mark a save deleted.
    fn delete_save(&self, key: &SaveKey) -> Result<()>;

    /// Toggle a save's final flag; returns the new value.
    fn finalize_save(&self, key: &SaveKey) -> Result<bool>;

    /// User who created the earliest save named `savename`.
    fn initial_user(&self, savename: &str) -> Result<Option<String>>;
}
