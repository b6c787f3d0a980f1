use criterion::{black_box, criterion_group, criterion_main, Criterion};
use huf_compress::Compressor;

fn criterion_benchmark(c: &mut Criterion) {
    let compressor = Compressor::default();
    let text = b"the quick brown fox jumps over the lazy dog. ".repeat(2048);
    let random_input = (0..65536).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();

    c.bench_function("huffman compress text", |b| {
        b.iter(|| compressor.compress_bytes(black_box(&text)))
    });
    c.bench_function("huffman compress random", |b| {
        b.iter(|| compressor.compress_bytes(black_box(&random_input)))
    });

    let packed = compressor.compress_bytes(&text).unwrap();
    c.bench_function("huffman decompress text", |b| {
        b.iter(|| compressor.decompress_bytes(black_box(&packed)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
