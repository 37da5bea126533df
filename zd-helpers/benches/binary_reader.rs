//! Benchmarks for the byte cursor.
//!
//! Run with: cargo bench -p zd-helpers --bench binary_reader

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use zd_helpers::BinaryReader;
use zd_helpers::binary_reader::Needle;

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

// =============================================================================
// Sequential Read Benchmarks
// =============================================================================

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_reader_sequential");

    for size in [64usize, 4096, 65536] {
        let data = sample(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("next", size), &data, |b, data| {
            b.iter(|| {
                let mut reader = BinaryReader::from_buffer(data);
                let mut sum = 0u64;
                while let Some(byte) = reader.next() {
                    sum += u64::from(byte);
                }
                black_box(sum)
            })
        });

        group.bench_with_input(BenchmarkId::new("read_u32", size), &data, |b, data| {
            b.iter(|| {
                let mut reader = BinaryReader::from_buffer(data);
                let mut sum = 0u64;
                while let Ok(word) = reader.read_u32() {
                    sum += u64::from(word);
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

// =============================================================================
// Search Benchmarks
// =============================================================================

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_reader_search");

    let mut text = "x".repeat(8192);
    text.push_str("</script>");
    let reader = BinaryReader::from(text.as_str());

    group.bench_function("index_of_far", |b| {
        b.iter(|| reader.index_of(black_box(b"</script>"), 0, None))
    });

    let needles: [&[u8]; 3] = [b"<!--", b"</style>", b"</script>"];
    group.bench_function("min_index_3", |b| {
        b.iter(|| reader.min_index(black_box(&needles)))
    });

    let mut positioned = BinaryReader::from(r#"{"key":"value\\\"more"}"#);
    positioned.seek(15).ok();
    group.bench_function("next_is", |b| {
        b.iter(|| {
            positioned.next_is(black_box(&[
                Needle::Byte(b'"'),
                Needle::Bytes(b"more"),
                Needle::Byte(b'm'),
            ]))
        })
    });

    group.bench_function("reverse_count", |b| {
        b.iter(|| positioned.reverse_count(black_box(b'\\')))
    });

    group.finish();
}

// =============================================================================
// Construction Benchmarks
// =============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_reader_construction");

    let data = sample(4096);
    let hex = hex::encode(&data);
    group.bench_function("from_hex_4k", |b| {
        b.iter(|| BinaryReader::from_hex(black_box(&hex)))
    });

    group.bench_function("from_buffer_4k", |b| {
        b.iter(|| BinaryReader::from_buffer(black_box(&data)))
    });

    group.finish();
}

// =============================================================================
// Main
// =============================================================================

criterion_group!(benches, bench_sequential, bench_search, bench_construction);

criterion_main!(benches);
