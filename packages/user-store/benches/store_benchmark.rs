//! Criterion benchmarks for user store operations.
//!
//! Measures the in-memory store so the numbers reflect table and snapshot
//! costs rather than disk flushes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use user_store::{NewUser, UserPatch, UserStore};

/// Creates an in-memory store pre-populated with `count` users.
fn populated_store(count: u64) -> UserStore {
    let store = UserStore::in_memory();
    let users = (0..count)
        .map(|i| NewUser::new(format!("User {}", i), format!("user{}@example.com", i)))
        .collect();
    store
        .insert_batch(users)
        .expect("Failed to populate benchmark store");
    store
}

/// Benchmark: point lookups by id
fn benchmark_get_by_id(c: &mut Criterion) {
    let store = populated_store(1000);

    c.bench_function("get_by_id", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = i % 1000 + 1;
            black_box(store.get_by_id(i).ok());
        })
    });
}

/// Benchmark: full listing at different table sizes
fn benchmark_list_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_all");
    for size in [10u64, 100, 1000] {
        let store = populated_store(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(store.list_all().ok()));
        });
    }
    group.finish();
}

/// Benchmark: copy-on-write updates
fn benchmark_update(c: &mut Criterion) {
    let store = populated_store(100);

    c.bench_function("update_name", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = i % 100 + 1;
            black_box(store.update(i, UserPatch::name(format!("Renamed {}", i))).ok());
        })
    });
}

criterion_group!(
    benches,
    benchmark_get_by_id,
    benchmark_list_all,
    benchmark_update
);
criterion_main!(benches);
