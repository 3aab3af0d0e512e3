//! Multi-way annotation diff.
//!
//! For N annotation sets over one text, find the annotations of each set that
//! are not shared by all sets, looking only at an inclusive character window
//! `[start, end]` and a whitelist of tags.
//!
//! # The sweep, collapsed
//!
//! Conceptually, at every position `i` of the window:
//!
//! ```text
//! Active(k, i) = { (s, e, tag) in set k : s <= i <= e }
//! Common(i)    = Active(0, i) ∩ ... ∩ Active(N-1, i)
//! Unique[k]   ∪= { t in Active(k, i) \ Common(i) : t.tag wanted }
//! ```
//!
//! A triple's presence in `Active(j, i)` depends only on whether set `j`
//! contains that triple, since the interval tested is the triple's own. So a
//! triple of set `k` lands in `Unique[k]` exactly when it overlaps the window,
//! its tag is wanted, and at least one set lacks it. That is what [`diff`]
//! computes, in O(total annotations) instead of O(window × annotations).
//!
//! Identity is `(start, end, tag)`; text is ignored.

use log::debug;
use std::collections::HashSet;

use crate::offset::char_len;
use texanno_core::{Annotation, SpanKey};

/// Per-set annotations not common to all sets.
///
/// Returns one list per input set, holding that set's original annotation
/// objects in input order. `end` is clamped to the last character of `text`;
/// empty text or `start > end` yields empty lists.
#[must_use]
pub fn diff<S: AsRef<str>>(
    text: &str,
    annotation_sets: &[Vec<Annotation>],
    tags_of_interest: &[S],
    start: usize,
    end: usize,
) -> Vec<Vec<Annotation>> {
    let empty = || vec![Vec::new(); annotation_sets.len()];

    let len = char_len(text);
    if len == 0 {
        return empty();
    }
    let end = end.min(len - 1);
    if start > end {
        return empty();
    }

    let wanted: HashSet<&str> = tags_of_interest.iter().map(|t| t.as_ref()).collect();
    let keys: Vec<HashSet<SpanKey>> = annotation_sets
        .iter()
        .map(|set| set.iter().map(Annotation::span_key).collect())
        .collect();
    let in_all = |key: &SpanKey| keys.iter().all(|set| set.contains(key));

    let result: Vec<Vec<Annotation>> = annotation_sets
        .iter()
        .map(|set| {
            set.iter()
                .filter(|a| a.start <= end && a.end >= start && a.start <= a.end)
                .filter(|a| wanted.contains(a.tag.as_str()))
                .filter(|a| !in_all(&a.span_key()))
                .cloned()
                .collect()
        })
        .collect();

    debug!(
        "diff: {} sets over [{}, {}], unique counts {:?}",
        annotation_sets.len(),
        start,
        end,
        result.iter().map(Vec::len).collect::<Vec<_>>()
    );
    result
}

/// Diff every set over the whole of `text`.
#[must_use]
pub fn diff_whole<S: AsRef<str>>(
    text: &str,
    annotation_sets: &[Vec<Annotation>],
    tags_of_interest: &[S],
) -> Vec<Vec<Annotation>> {
    diff(text, annotation_sets, tags_of_interest, 0, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: &[&str] = &["definition", "theorem", "proof"];

    fn a(id: &str, start: usize, end: usize, tag: &str) -> Annotation {
        Annotation::new(id, start, end, tag)
    }

    #[test]
    fn test_identical_sets_have_no_diff() {
        let set = vec![a("1", 0, 2, "definition").with_text("AB")];
        let out = diff("ABCD", &[set.clone(), set], TAGS, 0, 3);
        assert_eq!(out, vec![Vec::<Annotation>::new(), Vec::new()]);
    }

    #[test]
    fn test_text_is_not_identity() {
        let left = vec![a("1", 0, 2, "definition").with_text("AB")];
        let right = vec![a("2", 0, 2, "definition").with_text("ab")];
        let out = diff("ABCD", &[left, right], TAGS, 0, 3);
        assert!(out.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_unique_annotations_kept_per_set() {
        let left = vec![a("1", 0, 3, "theorem"), a("2", 5, 8, "proof")];
        let right = vec![a("3", 0, 3, "theorem"), a("4", 5, 9, "proof")];
        let out = diff("0123456789", &[left, right], TAGS, 0, 9);
        assert_eq!(out[0].len(), 1);
        assert_eq!(out[0][0].id, "2");
        assert_eq!(out[1][0].id, "4");
    }

    #[test]
    fn test_three_way_needs_all_sets() {
        let shared = a("s", 1, 2, "definition");
        let sets = vec![
            vec![shared.clone()],
            vec![shared.clone()],
            vec![a("x", 4, 4, "proof")],
        ];
        let out = diff("abcdef", &sets, TAGS, 0, 5);
        assert_eq!(out[0][0].id, "s");
        assert_eq!(out[1][0].id, "s");
        assert_eq!(out[2][0].id, "x");
    }

    #[test]
    fn test_window_and_whitelist() {
        let left = vec![
            a("in", 2, 3, "proof"),
            a("edge", 5, 7, "proof"),
            a("out", 8, 9, "proof"),
            a("name", 2, 3, "name"),
        ];
        let out = diff("0123456789", &[left, vec![]], TAGS, 0, 5);
        let ids: Vec<&str> = out[0].iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["in", "edge"]);
        assert!(out[1].is_empty());
    }

    #[test]
    fn test_end_inclusive_and_clamped() {
        let left = vec![a("last", 3, 3, "theorem")];
        let out = diff("abcd", &[left.clone(), vec![]], TAGS, 0, 3);
        assert_eq!(out[0].len(), 1);
        let out = diff("abcd", &[left, vec![]], TAGS, 0, 100);
        assert_eq!(out[0].len(), 1);
    }

    #[test]
    fn test_degenerate_inputs() {
        let set = vec![a("1", 0, 0, "proof")];
        assert_eq!(diff("", &[set.clone(), vec![]], TAGS, 0, 0).len(), 2);
        assert!(diff("", &[set.clone(), vec![]], TAGS, 0, 0)[0].is_empty());
        assert!(diff("abc", &[set.clone(), vec![]], TAGS, 2, 1)[0].is_empty());
        assert!(diff("abc", &[], TAGS, 0, 2).is_empty());
        assert!(diff_whole("abc", &[set], TAGS)[0].is_empty());
    }

    #[test]
    fn test_duplicates_in_one_set_both_reported() {
        let left = vec![a("1", 0, 1, "proof"), a("2", 0, 1, "proof")];
        let out = diff("ab", &[left, vec![]], TAGS, 0, 1);
        assert_eq!(out[0].len(), 2);
    }
}
