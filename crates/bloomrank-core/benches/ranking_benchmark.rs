//! Benchmarks for filter construction, both rankers and the rank distance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bloomrank_core::{
    rank_approximate, rank_distance, rank_exact, Corpus, FilterKey, Rounds, SearchTerm,
};

fn generate_chunks(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "Chapter {} opens with a long passage about {} and wanders through the \
                 countryside, describing rivers, hills and the people who live there {}.",
                i,
                match i % 5 {
                    0 => "technology",
                    1 => "science",
                    2 => "travel",
                    3 => "cooking",
                    _ => "sports",
                },
                i * 7
            )
        })
        .collect()
}

fn bench_build_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_filters");
    let chunks = generate_chunks(100);

    for elements in [34, 60, 100] {
        let keys: Vec<FilterKey> = (1..=3)
            .map(|k| FilterKey::new(Rounds::new(k).expect("rounds"), elements))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(elements), &keys, |b, keys| {
            b.iter(|| {
                let mut corpus = Corpus::from_chunks(chunks.iter().cloned());
                corpus.build_filters(keys).expect("build");
                black_box(corpus)
            });
        });
    }

    group.finish();
}

fn bench_rankers(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let rounds = Rounds::new(2).expect("rounds");
    let mut corpus = Corpus::from_chunks(generate_chunks(100));
    corpus
        .build_filters(&[FilterKey::new(rounds, 100)])
        .expect("build");
    let term = SearchTerm::from_text("countryside").expect("term");

    group.bench_function("exact", |b| {
        b.iter(|| black_box(rank_exact(rounds, 100, &term, corpus.documents())))
    });
    group.bench_function("approximate", |b| {
        b.iter(|| black_box(rank_approximate(rounds, 100, &term, corpus.documents())))
    });

    group.finish();
}

fn bench_rank_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_distance");
    let exact: Vec<usize> = (0..100).collect();
    let approx: Vec<usize> = (0..100).rev().collect();

    for prefix in [10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(prefix), &prefix, |b, &n| {
            b.iter(|| black_box(rank_distance(&exact, &approx, n)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_filters, bench_rankers, bench_rank_distance);
criterion_main!(benches);
