//! Benchmarks for parallel DEFLATE throughput.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use parazip_deflate::{CodingMode, DeflateOptions, Lz77Level, deflate};

/// Incompressible bytes from a simple LCG.
fn generate_random(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed = 12345u64;
    for _ in 0..size {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        data.push((seed >> 56) as u8);
    }
    data
}

/// Word-salad text with realistic match structure.
fn generate_text(size: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[
        b"the", b"quick", b"brown", b"fox", b"jumps", b"over", b"lazy", b"dog", b"and", b"runs",
        b"through", b"forest", b"near", b"river", b"under", b"blue", b"sky",
    ];
    let mut data = Vec::with_capacity(size);
    let mut seed = 42u64;
    while data.len() < size {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        data.extend_from_slice(words[(seed >> 16) as usize % words.len()]);
        data.push(b' ');
    }
    data.truncate(size);
    data
}

fn bench_deflate(c: &mut Criterion) {
    let corpora = [
        ("text", generate_text(4 << 20)),
        ("random", generate_random(4 << 20)),
    ];

    let mut group = c.benchmark_group("deflate");
    for (name, data) in &corpora {
        group.throughput(Throughput::Bytes(data.len() as u64));
        for workers in [1, 4] {
            let options = DeflateOptions {
                mode: CodingMode::Dynamic,
                level: Lz77Level::new(2).unwrap(),
                workers,
            };
            group.bench_with_input(
                BenchmarkId::new(*name, workers),
                data,
                |b, data| b.iter(|| deflate(data, &options).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_levels(c: &mut Criterion) {
    let data = generate_text(1 << 20);

    let mut group = c.benchmark_group("lz77_level");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for level in 0..=3u32 {
        let options = DeflateOptions {
            mode: CodingMode::Dynamic,
            level: Lz77Level::new(level).unwrap(),
            workers: 1,
        };
        group.bench_with_input(BenchmarkId::from_parameter(level), &data, |b, data| {
            b.iter(|| deflate(data, &options).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_deflate, bench_levels);
criterion_main!(benches);
