//! Inter-annotator agreement over final saves.
//!
//! Final saves are grouped by the window they cover, `(fileid, start, end)`.
//! Inside a group every annotator is scored against each other annotator in
//! turn and their macro F1 values are averaged.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::score::score_sequences;
use crate::export::{export_save, AnnotationExporter};
use crate::store::AnnotationStore;
use crate::tagging::TagSet;
use crate::{Error, Result};
use texanno_core::SaveFilter;

/// One annotator's standing within a window group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementEntry {
    /// Author of the final save.
    pub user_id: String,
    /// Author of the earliest save bearing the same savename.
    pub initial_user: Option<String>,
    /// Mean macro F1 against every other annotator; `None` without peers.
    pub f1: Option<f64>,
}

/// All final saves covering one window of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementGroup {
    /// Document id.
    pub file_id: String,
    /// Window start from the save's begin sentinel.
    pub start: Option<usize>,
    /// Window end from the save's end sentinel.
    pub end: Option<usize>,
    /// One entry per final save, newest first.
    pub entries: Vec<AgreementEntry>,
}

/// Build the agreement dashboard over every final save in `store`.
///
/// Pairs whose exports differ in length are skipped with a warning rather
/// than failing the whole dashboard.
pub fn agreement_dashboard<S: AsRef<str>>(
    store: &dyn AnnotationStore,
    exporter: &AnnotationExporter,
    tags: &[S],
) -> Result<Vec<AgreementGroup>> {
    type Member = (String, Option<String>, Vec<TagSet>);
    let mut groups: BTreeMap<(String, Option<usize>, Option<usize>), Vec<Member>> = BTreeMap::new();

    let finals = store.load_saves(&SaveFilter::all().finals())?;
    debug!("agreement: {} final saves", finals.len());

    for summary in finals {
        let save = summary.save;
        let export = export_save(
            store,
            exporter,
            &save.key.file_id,
            &save.key.user_id,
            Some(&save.key.timestamp),
            None,
        )?;
        let initial = store.initial_user(&save.key.savename)?;
        groups
            .entry((save.key.file_id.clone(), save.start, save.end))
            .or_default()
            .push((save.key.user_id, initial, export.tag_sequence()));
    }

    let mut dashboard = Vec::with_capacity(groups.len());
    for ((file_id, start, end), members) in groups {
        let mut entries = Vec::with_capacity(members.len());
        for (user, initial, tags_sys) in &members {
            let mut scores = Vec::new();
            for (peer, _, tags_ref) in members.iter().filter(|(p, _, _)| p != user) {
                match score_sequences(tags_sys, tags_ref, tags) {
                    Ok(summary) => scores.push(summary.f1),
                    Err(Error::LengthMismatch { system, reference }) => warn!(
                        "agreement: {} vs {} on {} have {} vs {} positions, skipped",
                        user, peer, file_id, system, reference
                    ),
                    Err(e) => return Err(e),
                }
            }
            let f1 = if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            };
            entries.push(AgreementEntry {
                user_id: user.clone(),
                initial_user: initial.clone(),
                f1,
            });
        }
        dashboard.push(AgreementGroup {
            file_id,
            start,
            end,
            entries,
        });
    }
    Ok(dashboard)
}
