//! Performance benchmarks for GXI
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gxi::index::BiFmIndex;
use gxi::search::{search_one, MaxError, SearchConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A pseudo-random DNA text of the given length (ranks 0..4).
fn random_text(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..4)).collect()
}

fn bench_index_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_construction");
    for size in [10_000usize, 100_000] {
        let text = random_text(size, 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| BiFmIndex::new(black_box(text)));
        });
    }
    group.finish();
}

fn bench_exact_search(c: &mut Criterion) {
    let text = random_text(100_000, 2);
    let index = BiFmIndex::new(&text);
    let config = SearchConfig::new();

    let mut rng = StdRng::seed_from_u64(3);
    let queries: Vec<Vec<u8>> = (0..100)
        .map(|_| {
            let start = rng.gen_range(0..text.len() - 20);
            text[start..start + 20].to_vec()
        })
        .collect();

    c.bench_function("exact_search_100x20bp", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(search_one(&index, black_box(query), &config));
            }
        });
    });
}

fn bench_approximate_search(c: &mut Criterion) {
    let text = random_text(100_000, 4);
    let index = BiFmIndex::new(&text);

    let mut rng = StdRng::seed_from_u64(5);
    let queries: Vec<Vec<u8>> = (0..20)
        .map(|_| {
            let start = rng.gen_range(0..text.len() - 20);
            text[start..start + 20].to_vec()
        })
        .collect();

    let mut group = c.benchmark_group("approximate_search");
    for errors in [1u8, 2] {
        let config = SearchConfig::new().max_error(MaxError::substitutions(errors));
        group.bench_with_input(
            BenchmarkId::from_parameter(errors),
            &config,
            |b, config| {
                b.iter(|| {
                    for query in &queries {
                        black_box(search_one(&index, black_box(query), config));
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_index_construction,
    bench_exact_search,
    bench_approximate_search
);
criterion_main!(benches);
