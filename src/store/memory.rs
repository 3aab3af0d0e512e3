//! In-memory [`AnnotationStore`].

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};

use super::group::{group_rows, AnnotationRow};
use super::AnnotationStore;
use crate::{Error, Result};
use texanno_core::{Annotation, Link, Save, SaveFilter, SaveKey, SaveSummary};

#[derive(Debug, Clone)]
struct StoredSave {
    save: Save,
    rows: Vec<AnnotationRow>,
    count: usize,
}

#[derive(Debug, Default)]
struct Inner {
    documents: BTreeMap<String, String>,
    saves: Vec<StoredSave>,
    last_timestamp: Option<DateTime<Utc>>,
    generated_names: usize,
}

impl Inner {
    /// Wall-clock time, bumped so every save gets a distinct timestamp at
    /// the microsecond precision timestamps are rendered with.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn find_mut(&mut self, key: &SaveKey) -> Result<&mut StoredSave> {
        self.saves
            .iter_mut()
            .find(|s| s.save.key == *key)
            .ok_or_else(|| Error::not_found(format!("save '{}' at {}", key.savename, key.id_prefix())))
    }
}

/// Thread-safe store keeping everything in memory.
///
/// Annotations are kept in joined-row form and regrouped on load, the same
/// shape a relational backend would return.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saves held, deleted ones included.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.read().saves.len()
    }
}

impl AnnotationStore for MemoryStore {
    fn add_document(&self, file_id: &str, text: &str) -> Result<()> {
        self.inner
            .write()
            .documents
            .insert(file_id.to_string(), text.to_string());
        Ok(())
    }

    fn document_text(&self, file_id: &str) -> Result<String> {
        self.inner
            .read()
            .documents
            .get(file_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("document '{}'", file_id)))
    }

    fn document_ids(&self) -> Result<Vec<String>> {
        Ok(self.inner.read().documents.keys().cloned().collect())
    }

    fn load_other_documents(&self, exclude_file_id: &str) -> Result<Vec<Annotation>> {
        let inner = self.inner.read();
        let mut latest: BTreeMap<&str, &StoredSave> = BTreeMap::new();
        for stored in inner
            .saves
            .iter()
            .filter(|s| !s.save.deleted && s.save.key.file_id != exclude_file_id)
        {
            let slot = latest.entry(stored.save.key.file_id.as_str()).or_insert(stored);
            if stored.save.key.timestamp > slot.save.key.timestamp {
                *slot = stored;
            }
        }
        debug!(
            "store: latest saves of {} documents besides {}",
            latest.len(),
            exclude_file_id
        );
        Ok(latest.values().flat_map(|s| group_rows(&s.rows)).collect())
    }

    fn insert_annotations(
        &self,
        file_id: &str,
        user_id: &str,
        annotations: &[Annotation],
        autosave: bool,
        savename: Option<&str>,
    ) -> Result<SaveKey> {
        for anno in annotations {
            anno.ensure_ordered()?;
        }

        let mut inner = self.inner.write();

        let savename = match savename {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => {
                inner.generated_names += 1;
                format!("save-{}", inner.generated_names)
            }
        };

        if autosave {
            let before = inner.saves.len();
            inner.saves.retain(|s| {
                !(s.save.autosave
                    && s.save.key.file_id == file_id
                    && s.save.key.user_id == user_id
                    && s.save.key.savename == savename)
            });
            if inner.saves.len() < before {
                debug!("store: replaced autosave '{}' of {} on {}", savename, user_id, file_id);
            }
        }

        // One row per distinct (start, end, tag); later duplicates are dropped.
        let mut seen = HashSet::new();
        let kept: Vec<Annotation> = annotations
            .iter()
            .filter(|a| seen.insert(a.span_key()))
            .map(|a| {
                let mut a = a.clone().with_file_id(file_id);
                a.links.clear();
                a
            })
            .collect();
        if kept.len() < annotations.len() {
            debug!(
                "store: dropped {} duplicate annotations",
                annotations.len() - kept.len()
            );
        }
        let links: Vec<Link> = annotations
            .iter()
            .flat_map(|a| a.links.iter().cloned())
            .collect();

        let timestamp = inner.next_timestamp();
        let key = SaveKey::new(file_id, user_id, savename, timestamp);
        let save = Save {
            key: key.clone(),
            is_final: false,
            autosave,
            deleted: false,
            start: kept.iter().find(|a| a.is_begin_sentinel()).map(|a| a.start),
            end: kept.iter().find(|a| a.is_end_sentinel()).map(|a| a.end),
        };

        info!(
            "store: {} '{}' by {} on {} ({} annotations, {} links)",
            if autosave { "autosave" } else { "save" },
            key.savename,
            user_id,
            file_id,
            kept.len(),
            links.len()
        );

        inner.saves.push(StoredSave {
            save,
            rows: AnnotationRow::join(&kept, &links),
            count: kept.len(),
        });
        Ok(key)
    }

    fn load_annotations(
        &self,
        file_id: &str,
        user_id: &str,
        timestamp: Option<&DateTime<Utc>>,
    ) -> Result<Vec<Annotation>> {
        let inner = self.inner.read();
        let stored = match timestamp {
            Some(ts) => Some(
                inner
                    .saves
                    .iter()
                    .find(|s| {
                        s.save.key.file_id == file_id
                            && s.save.key.user_id == user_id
                            && s.save.key.timestamp == *ts
                    })
                    .ok_or_else(|| {
                        Error::not_found(format!(
                            "save of {} on {} at {}",
                            user_id,
                            file_id,
                            texanno_core::format_timestamp(ts)
                        ))
                    })?,
            ),
            None => inner
                .saves
                .iter()
                .filter(|s| {
                    !s.save.deleted && s.save.key.file_id == file_id && s.save.key.user_id == user_id
                })
                .max_by_key(|s| s.save.key.timestamp),
        };
        Ok(stored.map(|s| group_rows(&s.rows)).unwrap_or_default())
    }

    fn load_saves(&self, filter: &SaveFilter) -> Result<Vec<SaveSummary>> {
        let inner = self.inner.read();
        let mut saves: Vec<SaveSummary> = inner
            .saves
            .iter()
            .filter(|s| filter.matches(&s.save))
            .map(|s| SaveSummary {
                save: s.save.clone(),
                count: s.count,
            })
            .collect();
        saves.sort_by(|a, b| b.save.key.timestamp.cmp(&a.save.key.timestamp));
        Ok(saves)
    }

    fn delete_save(&self, key: &SaveKey) -> Result<()> {
        let mut inner = self.inner.write();
        inner.find_mut(key)?.save.deleted = true;
        info!("store: deleted save '{}' of {}", key.savename, key.user_id);
        Ok(())
    }

    fn finalize_save(&self, key: &SaveKey) -> Result<bool> {
        let mut inner = self.inner.write();
        let stored = inner.find_mut(key)?;
        stored.save.is_final = !stored.save.is_final;
        info!(
            "store: save '{}' of {} final={}",
            key.savename, key.user_id, stored.save.is_final
        );
        Ok(stored.save.is_final)
    }

    fn initial_user(&self, savename: &str) -> Result<Option<String>> {
        Ok(self
            .inner
            .read()
            .saves
            .iter()
            .filter(|s| s.save.key.savename == savename)
            .min_by_key(|s| s.save.key.timestamp)
            .map(|s| s.save.key.user_id.clone()))
    }
}
