//! Benchmarks for span tagging, token alignment, diffing and scoring.
//!
//! ```bash
//! cargo bench --bench tagging
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use texanno::eval::score::score_sequences;
use texanno::{diff_whole, Annotation, SpanIndex, TokenAligner, Tokenizer, WordTokenizer};

const PARAGRAPH: &str = "Definition 2.1. Let $G$ be a group and $H \\le G$ a subgroup. \
    Theorem 2.2 (Lagrange). If $G$ is finite then $|H|$ divides $|G|$. \
    Proof. The cosets of $H$ partition $G$ and all have $|H|$ elements. ";

const TAGS: &[&str] = &["definition", "theorem", "proof", "name"];

fn document(repeats: usize) -> (String, Vec<Annotation>) {
    let text = PARAGRAPH.repeat(repeats);
    let len = PARAGRAPH.chars().count();
    let mut annos = Vec::with_capacity(repeats * 4);
    for i in 0..repeats {
        let base = i * len;
        annos.push(Annotation::new(format!("d{}", i), base, base + 60, "definition"));
        annos.push(Annotation::new(format!("t{}", i), base + 61, base + 127, "theorem"));
        annos.push(Annotation::new(format!("n{}", i), base + 73, base + 81, "name"));
        annos.push(Annotation::new(format!("p{}", i), base + 128, base + len - 1, "proof"));
    }
    (text, annos)
}

fn bench_span_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("span_index");
    for repeats in [1, 10, 100] {
        let (text, annos) = document(repeats);
        let len = text.chars().count();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| SpanIndex::default().tag(black_box(len), black_box(&annos), 0))
        });
    }
    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let (text, annos) = document(50);
    let chars = SpanIndex::default().tag(text.chars().count(), &annos, 0);
    let tokens = match WordTokenizer.tokenize(&text) {
        Ok(tokens) => tokens,
        Err(e) => panic!("tokenize failed: {}", e),
    };

    c.bench_function("align_words", |b| {
        b.iter(|| TokenAligner::align_offsets(black_box(tokens.offsets()), black_box(&chars)))
    });
}

fn bench_diff_and_score(c: &mut Criterion) {
    let (text, annos) = document(50);
    let mut shifted = annos.clone();
    for a in shifted.iter_mut().step_by(3) {
        a.end += 1;
    }
    let sets = vec![annos.clone(), shifted.clone(), annos.clone()];

    c.bench_function("diff_three_sets", |b| {
        b.iter(|| diff_whole(black_box(&text), black_box(&sets), TAGS))
    });

    let len = text.chars().count();
    let system = SpanIndex::default().tag(len, &shifted, 0);
    let reference = SpanIndex::default().tag(len, &annos, 0);
    c.bench_function("score_sequences", |b| {
        b.iter(|| score_sequences(black_box(&system), black_box(&reference), TAGS))
    });
}

criterion_group!(benches, bench_span_index, bench_alignment, bench_diff_and_score);
criterion_main!(benches);
