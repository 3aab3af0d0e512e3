//! Comparisons between stored saves.

use log::debug;

use crate::eval::diff::diff;
use crate::eval::report::Report;
use crate::eval::score::ScoreEngine;
use crate::export::{export_save, AnnotationExporter};
use crate::store::{prefix_ids, AnnotationStore};
use crate::tokenize::Tokenizer;
use crate::{Error, Result};
use texanno_core::{Annotation, SaveKey};

fn same_document(keys: &[&SaveKey]) -> Result<()> {
    if let Some(first) = keys.first() {
        if let Some(other) = keys.iter().find(|k| k.file_id != first.file_id) {
            return Err(Error::invalid_input(format!(
                "saves belong to different documents: '{}' and '{}'",
                first.file_id, other.file_id
            )));
        }
    }
    Ok(())
}

/// Export two saves of one document and score `system` against `reference`.
pub fn score_saves<S: AsRef<str>>(
    store: &dyn AnnotationStore,
    exporter: &AnnotationExporter,
    engine: &ScoreEngine,
    system: &SaveKey,
    reference: &SaveKey,
    tags: &[S],
    tokenizer: Option<&dyn Tokenizer>,
) -> Result<Report> {
    same_document(&[system, reference])?;
    let sys = export_save(
        store,
        exporter,
        &system.file_id,
        &system.user_id,
        Some(&system.timestamp),
        tokenizer,
    )?;
    let gold = export_save(
        store,
        exporter,
        &reference.file_id,
        &reference.user_id,
        Some(&reference.timestamp),
        tokenizer,
    )?;
    engine.score_and_diff(&sys, &gold, tags)
}

/// Diff several saves of one document.
///
/// Annotation ids are prefixed with their save's timestamp so results from
/// different saves never collide. `window` is an inclusive char range and
/// defaults to the whole document.
pub fn diff_saves<S: AsRef<str>>(
    store: &dyn AnnotationStore,
    saves: &[SaveKey],
    tags: &[S],
    window: Option<(usize, usize)>,
) -> Result<Vec<Vec<Annotation>>> {
    let Some(first) = saves.first() else {
        return Ok(Vec::new());
    };
    same_document(&saves.iter().collect::<Vec<_>>())?;

    let text = store.document_text(&first.file_id)?;
    let sets = saves
        .iter()
        .map(|key| {
            let annos = store.load_annotations(&key.file_id, &key.user_id, Some(&key.timestamp))?;
            Ok(prefix_ids(&annos, &key.id_prefix()))
        })
        .collect::<Result<Vec<_>>>()?;

    let (start, end) = window.unwrap_or((0, usize::MAX));
    debug!("compare: diffing {} saves of {}", saves.len(), first.file_id);
    Ok(diff(&text, &sets, tags, start, end))
}
