//! Flat joined rows to nested annotations.
//!
//! Relational backends return one row per (annotation, link) pair from an
//! `annotations LEFT JOIN links ON annoid = source` query. Annotations without
//! links appear once with all link columns null.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use texanno_core::{Annotation, Link, DEFAULT_COLOR};

/// One row of the annotation/link join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRow {
    /// Annotation id.
    pub annoid: String,
    /// Document id.
    pub fileid: String,
    /// Start offset.
    pub start: usize,
    /// End offset.
    pub end: usize,
    /// Tag.
    pub tag: String,
    /// Covered text.
    #[serde(default)]
    pub text: String,
    /// Highlight color.
    #[serde(default)]
    pub color: Option<String>,
    /// Link source id.
    #[serde(default)]
    pub link_source: Option<String>,
    /// Link target id.
    #[serde(default)]
    pub link_target: Option<String>,
    /// Link tag.
    #[serde(default)]
    pub link_tag: Option<String>,
    /// Link start offset.
    #[serde(default)]
    pub link_start: Option<usize>,
    /// Link end offset.
    #[serde(default)]
    pub link_end: Option<usize>,
    /// Link document id.
    #[serde(default)]
    pub link_fileid: Option<String>,
    /// Link color.
    #[serde(default)]
    pub link_color: Option<String>,
}

impl AnnotationRow {
    /// Row for `anno` with no link columns.
    #[must_use]
    pub fn unlinked(anno: &Annotation) -> Self {
        Self {
            annoid: anno.id.clone(),
            fileid: anno.file_id.clone(),
            start: anno.start,
            end: anno.end,
            tag: anno.tag.clone(),
            text: anno.text.clone(),
            color: Some(anno.color.clone()),
            link_source: None,
            link_target: None,
            link_tag: None,
            link_start: None,
            link_end: None,
            link_fileid: None,
            link_color: None,
        }
    }

    /// Row for `anno` joined with `link`.
    #[must_use]
    pub fn linked(anno: &Annotation, link: &Link) -> Self {
        Self {
            link_source: Some(link.source.clone()),
            link_target: Some(link.target.clone()),
            link_tag: Some(link.tag.clone()),
            link_start: Some(link.start),
            link_end: Some(link.end),
            link_fileid: Some(link.file_id.clone()),
            link_color: Some(link.color.clone()),
            ..Self::unlinked(anno)
        }
    }

    /// Left-join `annotations` with `links` on `annoid = source`.
    #[must_use]
    pub fn join(annotations: &[Annotation], links: &[Link]) -> Vec<Self> {
        let mut rows = Vec::with_capacity(annotations.len() + links.len());
        for anno in annotations {
            let mut matched = false;
            for link in links.iter().filter(|l| l.source == anno.id) {
                rows.push(Self::linked(anno, link));
                matched = true;
            }
            if !matched {
                rows.push(Self::unlinked(anno));
            }
        }
        rows
    }

    fn link(&self) -> Option<Link> {
        let mut link = Link::new(
            self.link_source.clone()?,
            self.link_target.clone()?,
            self.link_tag.clone()?,
            self.link_start?,
            self.link_end?,
        );
        if let Some(color) = &self.link_color {
            link.color = color.clone();
        }
        link.file_id = self.link_fileid.clone().unwrap_or_default();
        Some(link)
    }
}

type GroupKey = (String, String, usize, usize, String, String, String);

/// Group joined rows into annotations with nested links.
///
/// Rows are grouped by `(annoid, fileid, start, end, tag, text, color)` in
/// first-seen order. Rows whose link columns are incomplete contribute no
/// link.
#[must_use]
pub fn group_rows(rows: &[AnnotationRow]) -> Vec<Annotation> {
    let mut order: Vec<Annotation> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for row in rows {
        let color = row.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let key = (
            row.annoid.clone(),
            row.fileid.clone(),
            row.start,
            row.end,
            row.tag.clone(),
            row.text.clone(),
            color.clone(),
        );
        let slot = *index.entry(key).or_insert_with(|| {
            order.push(
                Annotation::new(row.annoid.clone(), row.start, row.end, row.tag.clone())
                    .with_file_id(row.fileid.clone())
                    .with_text(row.text.clone())
                    .with_color(color),
            );
            order.len() - 1
        });
        if let Some(link) = row.link() {
            order[slot].links.push(link);
        }
    }
    order
}

/// Prefix annotation ids and link endpoints so several saves can share a view.
#[must_use]
pub fn prefix_ids(annotations: &[Annotation], prefix: &str) -> Vec<Annotation> {
    annotations
        .iter()
        .map(|anno| {
            let mut anno = anno.clone();
            anno.id = format!("{}{}", prefix, anno.id);
            for link in &mut anno.links {
                link.source = format!("{}{}", prefix, link.source);
                link.target = format!("{}{}", prefix, link.target);
            }
            anno
        })
        .collect()
}
