//! Performance benchmarks for FastGenome2Vec
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fast_genome2vec::formats::parse_interval;
use fast_genome2vec::{ClosestFinder, ClosestIndex, GenomicInterval, LinearScan};
use std::path::Path;

/// Deterministic synthetic annotation records spread over 22 chromosomes
fn synthetic_records(n: usize) -> Vec<GenomicInterval> {
    (0..n)
        .map(|i| {
            let chrom = format!("chr{}", i % 22 + 1);
            let start = (i as u64).wrapping_mul(2_654_435_761) % 100_000_000;
            GenomicInterval::new(chrom, start, start + 200, vec![])
        })
        .collect()
}

/// Benchmark index construction at different collection sizes
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [1_000usize, 10_000, 100_000] {
        let records = synthetic_records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let index = ClosestIndex::build(black_box(records)).unwrap();
                black_box(index)
            })
        });
    }

    group.finish();
}

/// Benchmark single nearest queries against a large index
fn bench_nearest_query(c: &mut Criterion) {
    let records = synthetic_records(100_000);
    let index = ClosestIndex::build(&records).unwrap();

    c.bench_function("nearest_single", |b| {
        b.iter(|| {
            let hit = index.nearest(black_box("chr1"), black_box(5_000_000), black_box(5_000_500));
            black_box(hit)
        })
    });
}

/// Benchmark a batch of nearest queries
fn bench_nearest_batch(c: &mut Criterion) {
    let records = synthetic_records(100_000);
    let index = ClosestIndex::build(&records).unwrap();

    let queries: Vec<(String, u64, u64)> = (0..1000u64)
        .map(|i| {
            let start = i.wrapping_mul(97_003) % 100_000_000;
            (format!("chr{}", i % 22 + 1), start, start + 500)
        })
        .collect();

    let mut group = c.benchmark_group("nearest_batch");
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("1000_queries", |b| {
        b.iter(|| {
            for (chrom, start, end) in &queries {
                black_box(index.nearest(chrom, *start, *end));
            }
        })
    });
    group.finish();
}

/// Compare the indexed lookup to the brute-force reference implementation
fn bench_index_vs_linear_scan(c: &mut Criterion) {
    let records = synthetic_records(10_000);
    let index = ClosestIndex::build(&records).unwrap();
    let scan = LinearScan::new(&records);

    let mut group = c.benchmark_group("closest_finder");
    group.bench_function("indexed", |b| {
        b.iter(|| black_box(index.closest(black_box("chr5"), 1_000_000, 1_000_200)))
    });
    group.bench_function("linear_scan", |b| {
        b.iter(|| black_box(scan.closest(black_box("chr5"), 1_000_000, 1_000_200)))
    });
    group.finish();
}

/// Benchmark BED row parsing with a wide payload
fn bench_row_parsing(c: &mut Criterion) {
    let mut line = String::from("chr1\t1000\t2000\tgeneA\t+");
    for i in 0..512 {
        line.push_str(&format!("\t0.{}", i % 10));
    }
    let line = line.into_bytes();
    let file = Path::new("bench.bed");

    c.bench_function("row_parse_gene", |b| {
        b.iter(|| {
            let record = parse_interval(black_box(&line), file, 1).unwrap();
            black_box(record)
        })
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_nearest_query,
    bench_nearest_batch,
    bench_index_vs_linear_scan,
    bench_row_parsing,
);

criterion_main!(benches);
