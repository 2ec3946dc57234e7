//! Performance benchmarks for quotebook-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quotebook_engine::{
    export_json, parse_import, MemoryStorage, MergeStrategy, Quote, QuoteStore, Reconciler,
    QUOTES_KEY,
};

fn populated_store(size: u64) -> QuoteStore {
    let mut store = QuoteStore::open(Box::new(MemoryStorage::with_entry(QUOTES_KEY, "[]")), 0);
    for i in 0..size {
        let _ = store.add(&format!("Quote {}", i), "Bench", 1000 + i);
    }
    store
}

fn remote_batch(size: u64, timestamp: u64) -> Vec<Quote> {
    (0..size)
        .map(|i| Quote::from_server(i, format!("post {}", i), timestamp))
        .collect()
}

fn bench_store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_operations");

    // Store opening falls back to seeds
    group.bench_function("open_seeded", |b| {
        b.iter(|| QuoteStore::open(black_box(Box::new(MemoryStorage::new())), black_box(0)))
    });

    // Each add persists the whole list
    group.bench_function("add", |b| {
        let mut store = populated_store(100);
        let mut ts = 10_000u64;

        b.iter(|| {
            ts += 1;
            let _ = store.add(black_box("Benchmark quote"), black_box("Bench"), ts);
        })
    });

    group.bench_function("get", |b| {
        let store = populated_store(1000);
        b.iter(|| store.get(black_box("local-1500")))
    });

    group.bench_function("categories", |b| {
        let store = populated_store(1000);
        b.iter(|| store.categories())
    });

    group.finish();
}

fn bench_reconciliation(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation");

    for size in [10u64, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::new("reconcile", size), size, |b, &size| {
            // Half the local list is server quotes the batch will overlap with
            let mut local: Vec<Quote> = remote_batch(size / 2, 1000);
            local.extend((0..size / 2).map(|i| Quote::local(format!("mine {}", i), "Mine", i)));
            let remote = remote_batch(size, 2000);

            b.iter(|| {
                Reconciler::new(&MergeStrategy::LastWriteWins)
                    .reconcile(black_box(&local), black_box(remote.clone()))
            })
        });
    }

    group.finish();
}

fn bench_interchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("interchange");

    for size in [100u64, 500, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("export", size), size, |b, &size| {
            let store = populated_store(size);
            b.iter(|| export_json(black_box(store.all())))
        });

        group.bench_with_input(BenchmarkId::new("import", size), size, |b, &size| {
            let file = export_json(populated_store(size).all()).unwrap();
            b.iter(|| parse_import(black_box(&file)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_store_operations,
    bench_reconciliation,
    bench_interchange,
);
criterion_main!(benches);
