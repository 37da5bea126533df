//! Benchmarks for dot-notation array helpers.
//!
//! Run with: cargo bench -p zd-helpers --bench arr

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use zd_helpers::json::{self, Build, Value};
use zd_helpers::{arr, tree};

fn rows(n: i64) -> Value {
    let mut list = json::arr();
    for i in 1..=n {
        list = list.with_item(
            json::obj()
                .with("id", json::int(i))
                .with("parent_id", json::int(i / 4))
                .with("name", json::str(format!("row {i}"))),
        );
    }
    list
}

// =============================================================================
// Dot Access Benchmarks
// =============================================================================

fn bench_dot_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("arr_dot_access");

    let config = json::decode(
        r#"{"app":{"db":{"hosts":["a","b","c"],"port":5432},"cache":{"ttl":60}}}"#,
    )
    .unwrap_or(Value::Null);

    group.bench_function("get_shallow", |b| {
        b.iter(|| arr::get(black_box(&config), black_box("app")))
    });

    group.bench_function("get_deep", |b| {
        b.iter(|| arr::get(black_box(&config), black_box("app.db.hosts.2")))
    });

    group.bench_function("get_miss", |b| {
        b.iter(|| arr::get(black_box(&config), black_box("app.db.user.name")))
    });

    group.bench_function("set_deep", |b| {
        b.iter(|| {
            let mut target = config.clone();
            arr::set(&mut target, black_box("app.cache.driver.name"), json::str("redis"));
            target
        })
    });

    group.finish();
}

// =============================================================================
// Collection Benchmarks
// =============================================================================

fn bench_collections(c: &mut Criterion) {
    let mut group = c.benchmark_group("arr_collections");

    for n in [10i64, 100, 1000] {
        let data = rows(n);

        group.bench_with_input(BenchmarkId::new("pluck", n), &data, |b, data| {
            b.iter(|| arr::pluck(data, "name", Some("id")))
        });

        group.bench_with_input(BenchmarkId::new("merge", n), &data, |b, data| {
            b.iter(|| arr::merge(&[data.clone(), data.clone()]))
        });

        group.bench_with_input(BenchmarkId::new("data_get_star", n), &data, |b, data| {
            let wrapped = json::obj().with("rows", data.clone());
            b.iter(|| arr::data_get(&wrapped, "rows.*.id"))
        });

        let flat: Vec<Value> = json::as_array(&data).map(<[Value]>::to_vec).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("tree_children", n), &flat, |b, flat| {
            b.iter(|| tree::children(flat, &json::int(0), tree::TreeKeys::default()))
        });
    }

    group.finish();
}

// =============================================================================
// Main
// =============================================================================

criterion_group!(benches, bench_dot_access, bench_collections);

criterion_main!(benches);
