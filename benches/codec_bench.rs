// In benches/codec_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use huffpack::kernels::{frequency, tree};
use huffpack::{compress_bytes, decompress_bytes, CodecConfig};

// --- Data Generation ---

/// Generates a vector of highly compressible data.
fn generate_low_entropy_bytes(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let pattern = b"aaaaaaaabbbbccdeaaaabbc";
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

/// Generates a vector where every byte value is equally likely.
fn generate_high_entropy_bytes(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let pattern: Vec<u8> = (0..=255u8).collect();
    while data.len() < size {
        data.extend_from_slice(&pattern);
    }
    data.truncate(size);
    data
}

// --- Benchmark Suite ---

const BENCH_DATA_SIZE: usize = 65536; // 64 KB

fn bench_codec(c: &mut Criterion) {
    let config = CodecConfig::default();
    let low_entropy_data = generate_low_entropy_bytes(BENCH_DATA_SIZE);
    let high_entropy_data = generate_high_entropy_bytes(BENCH_DATA_SIZE);

    let encoded_low = compress_bytes(&low_entropy_data, &config).unwrap();
    let encoded_high = compress_bytes(&high_entropy_data, &config).unwrap();

    let mut group = c.benchmark_group("Huffman Codec");
    group.throughput(criterion::Throughput::Bytes(BENCH_DATA_SIZE as u64));

    group.bench_function("Encode (Low Entropy)", |b| {
        b.iter(|| black_box(compress_bytes(black_box(&low_entropy_data), &config)))
    });
    group.bench_function("Decode (Low Entropy)", |b| {
        b.iter(|| black_box(decompress_bytes(black_box(&encoded_low))))
    });
    group.bench_function("Encode (High Entropy)", |b| {
        b.iter(|| black_box(compress_bytes(black_box(&high_entropy_data), &config)))
    });
    group.bench_function("Decode (High Entropy)", |b| {
        b.iter(|| black_box(decompress_bytes(black_box(&encoded_high))))
    });

    group.finish();
}

fn bench_code_construction(c: &mut Criterion) {
    let frequencies = frequency::analyze_slice(&generate_high_entropy_bytes(BENCH_DATA_SIZE));

    c.bench_function("Build Tree + Codes (257 symbols)", |b| {
        b.iter(|| {
            let code_tree = tree::build_tree(black_box(&frequencies)).unwrap();
            black_box(tree::generate_codes(&code_tree))
        })
    });
}

criterion_group!(benches, bench_codec, bench_code_construction);
criterion_main!(benches);
