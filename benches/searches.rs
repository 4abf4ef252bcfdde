use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pandigital::harness::registry;
use pandigital::{MAX_K, is_pandigital_digits, is_pandigital_mask, render_concat};
use std::time::Duration;

fn bench_searches(c: &mut Criterion) {
    // Benchmarks every strategy regardless of the host probe; the portable
    // 16-lane path still runs (split into narrower registers) without it.
    for strategy in registry(true) {
        c.bench_function(strategy.name, |b| {
            b.iter(|| black_box((strategy.search)(black_box(MAX_K))))
        });
    }
}

fn bench_validators(c: &mut Criterion) {
    let pairs: Vec<(u32, u32)> = (1..=MAX_K).map(|k| (k, k * 2)).collect();

    c.bench_function("is_pandigital_mask", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for &(p1, p2) in &pairs {
                acc += is_pandigital_mask(black_box(p1), black_box(p2)) as u32;
            }
            black_box(acc)
        });
    });

    c.bench_function("is_pandigital_digits", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for &(p1, p2) in &pairs {
                let text = render_concat(black_box(p1), black_box(p2));
                acc += is_pandigital_digits(&text) as u32;
            }
            black_box(acc)
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(200)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(5));
    targets = bench_searches, bench_validators
}

criterion_main!(benches);
