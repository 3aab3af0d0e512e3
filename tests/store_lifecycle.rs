//! Save lifecycle against the in-memory store, and the store-backed
//! export, comparison and agreement entry points.

use std::sync::Arc;
use std::thread;

use texanno::eval::agreement_dashboard;
use texanno::prelude::*;
use texanno::{diff_saves, export_save, score_saves, SaveSummary};

const DOC: &str = "Definition 1. A group is a set with an operation.";

fn windowed(extra: Vec<Annotation>) -> Vec<Annotation> {
    let mut annos = vec![
        Annotation::new("begin", 0, 0, BEGIN_ANNOTATION),
        Annotation::new("end", 49, 49, END_ANNOTATION),
    ];
    annos.extend(extra);
    annos
}

fn definition(id: &str, start: usize, end: usize) -> Annotation {
    Annotation::new(id, start, end, "definition").with_text(&DOC[start..end])
}

fn store() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_document("groups.tex", DOC).unwrap();
    store
}

#[test]
fn test_saves_are_never_overwritten() {
    let store = store();
    let first = store
        .insert_annotations("groups.tex", "ana", &windowed(vec![definition("d", 14, 21)]), false, Some("draft"))
        .unwrap();
    let second = store
        .insert_annotations("groups.tex", "ana", &windowed(vec![definition("d", 14, 49)]), false, Some("draft"))
        .unwrap();

    assert!(second.timestamp > first.timestamp);
    assert_eq!(store.load_saves(&SaveFilter::all()).unwrap().len(), 2);

    let old = store.load_annotations("groups.tex", "ana", Some(&first.timestamp)).unwrap();
    assert!(old.iter().any(|a| a.end == 21));
    let latest = store.load_annotations("groups.tex", "ana", None).unwrap();
    assert!(latest.iter().any(|a| a.end == 49 && a.tag == "definition"));
}

#[test]
fn test_autosave_replaces_previous_autosave() {
    let store = store();
    for end in [20, 21, 22] {
        store
            .insert_annotations("groups.tex", "ana", &windowed(vec![definition("d", 14, end)]), true, Some("auto"))
            .unwrap();
    }
    let saves: Vec<SaveSummary> = store.load_saves(&SaveFilter::all().user("ana")).unwrap();
    assert_eq!(saves.len(), 1);
    assert!(saves[0].save.autosave);
    assert_eq!(saves[0].count, 3);
}

#[test]
fn test_delete_and_finalize() {
    let store = store();
    let older = store
        .insert_annotations("groups.tex", "ana", &windowed(vec![definition("d", 14, 21)]), false, None)
        .unwrap();
    let newer = store
        .insert_annotations("groups.tex", "ana", &windowed(vec![]), false, None)
        .unwrap();
    assert_ne!(older.savename, newer.savename);

    store.delete_save(&newer).unwrap();
    let latest = store.load_annotations("groups.tex", "ana", None).unwrap();
    assert!(latest.iter().any(|a| a.tag == "definition"));
    assert_eq!(store.load_saves(&SaveFilter::all()).unwrap().len(), 1);

    assert!(store.finalize_save(&older).unwrap());
    assert_eq!(store.load_saves(&SaveFilter::all().finals()).unwrap().len(), 1);
    assert!(!store.finalize_save(&older).unwrap());
}

#[test]
fn test_links_survive_the_round_trip() {
    let store = store();
    let annos = windowed(vec![
        definition("d", 14, 21).with_links(vec![Link::new("d", "o", "reference", 14, 21)]),
        Annotation::new("o", 39, 48, "name").with_text("operation"),
    ]);
    let key = store.insert_annotations("groups.tex", "ana", &annos, false, None).unwrap();

    let loaded = store.load_annotations("groups.tex", "ana", Some(&key.timestamp)).unwrap();
    let d = loaded.iter().find(|a| a.id == "d").unwrap();
    assert_eq!(d.links.len(), 1);
    assert_eq!(d.links[0].target, "o");
    assert!(loaded.iter().find(|a| a.id == "o").unwrap().links.is_empty());
}

#[test]
fn test_concurrent_inserts() {
    let store = Arc::new(store());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let user = format!("user{}", i);
                for _ in 0..5 {
                    store
                        .insert_annotations("groups.tex", &user, &windowed(vec![]), false, None)
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let saves = store.load_saves(&SaveFilter::all()).unwrap();
    assert_eq!(saves.len(), 20);
    // Newest first, timestamps unique.
    for pair in saves.windows(2) {
        assert!(pair[0].save.key.timestamp > pair[1].save.key.timestamp);
    }
}

#[test]
fn test_export_score_and_diff_saves() {
    let store = store();
    let exporter = AnnotationExporter::default();
    let ana = store
        .insert_annotations("groups.tex", "ana", &windowed(vec![definition("d", 14, 21)]), false, None)
        .unwrap();
    let ben = store
        .insert_annotations("groups.tex", "ben", &windowed(vec![definition("d", 14, 49)]), false, None)
        .unwrap();

    let export = export_save(&store, &exporter, "groups.tex", "ana", None, None).unwrap();
    assert_eq!(export.len(), 49);
    assert!(export.iob_tags[14].tags().contains("B-definition"));

    let words = WordTokenizer;
    let tokenized = export_save(&store, &exporter, "groups.tex", "ana", None, Some(&words as &dyn Tokenizer)).unwrap();
    assert!(tokenized.len() < export.len());

    let report = score_saves(&store, &exporter, &ScoreEngine::default(), &ana, &ben, &["definition"], None)
        .unwrap();
    assert!(report.recall < 1.0);
    assert_eq!(report.precision, 1.0);
    assert_eq!(report.counts.system_only, 1);
    assert_eq!(report.counts.reference_only, 1);

    let unique = diff_saves(&store, &[ana.clone(), ben.clone()], &["definition"], None).unwrap();
    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].len(), 1);
    assert!(unique[0][0].id.starts_with(&ana.id_prefix()));
    assert!(unique[1][0].id.starts_with(&ben.id_prefix()));
}

#[test]
fn test_agreement_over_final_saves() {
    let store = store();
    let exporter = AnnotationExporter::default();
    let same = windowed(vec![definition("d", 14, 21)]);
    let keys = [
        store.insert_annotations("groups.tex", "ana", &same, false, Some("round-1")).unwrap(),
        store.insert_annotations("groups.tex", "ben", &same, false, Some("round-1b")).unwrap(),
    ];
    for key in &keys {
        store.finalize_save(key).unwrap();
    }

    let dashboard = agreement_dashboard(&store, &exporter, &["definition"]).unwrap();
    assert_eq!(dashboard.len(), 1);
    assert_eq!(dashboard[0].start, Some(0));
    assert_eq!(dashboard[0].end, Some(49));
    assert_eq!(dashboard[0].entries.len(), 2);
    for entry in &dashboard[0].entries {
        assert_eq!(entry.f1, Some(1.0));
    }
}

#[test]
fn test_other_documents_for_cross_document_links() {
    let store = store();
    store.add_document("rings.tex", "A ring is a group with more.").unwrap();
    store
        .insert_annotations("groups.tex", "ana", &windowed(vec![definition("d", 14, 21)]), false, None)
        .unwrap();
    store
        .insert_annotations(
            "rings.tex",
            "ben",
            &[Annotation::new("r", 2, 6, "definition").with_text("ring")],
            false,
            None,
        )
        .unwrap();

    let targets = store.load_other_documents("rings.tex").unwrap();
    assert_eq!(targets.len(), 3);
    assert!(targets.iter().all(|a| a.file_id == "groups.tex"));
    assert_eq!(store.load_other_documents("none.tex").unwrap().len(), 4);
}
