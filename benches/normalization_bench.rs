//! Normalizer throughput benchmarks.
//!
//! The normalizer is on the hot path for every ingested comic and every
//! search query, so even small regressions compound at scale.
//!
//! ```sh
//! cargo bench --bench normalization_bench
//! open target/criterion/report/index.html
//! ```

use corpus_normalizer::Normalizer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn short_phrase_bench(c: &mut Criterion) {
    let n = Normalizer::new();
    let mut group = c.benchmark_group("short_phrase");
    group.throughput(Throughput::Elements(1));

    group.bench_function("title_and_alt_text", |b| {
        b.iter(|| black_box(n.norm("The Great Comic About Running, Jumping, and Quickly Diving!").unwrap()))
    });

    group.finish();
}

fn long_phrase_bench(c: &mut Criterion) {
    let n = Normalizer::new();
    let mut group = c.benchmark_group("long_phrase");

    let transcript = "the quick brown fox jumps over the lazy dog while running and jumping ".repeat(40);
    group.throughput(Throughput::Bytes(transcript.len() as u64));

    group.bench_with_input(BenchmarkId::new("transcript_sized", transcript.len()), &transcript, |b, phrase| {
        b.iter(|| black_box(n.norm(phrase).unwrap()))
    });

    group.finish();
}

fn punctuation_heavy_bench(c: &mut Criterion) {
    let n = Normalizer::new();
    let mut group = c.benchmark_group("punctuation_heavy");

    let phrase = "c++ programming+language! what's-the_deal? (seriously,) #hashtags @mentions...";
    group.throughput(Throughput::Elements(1));

    group.bench_function("mixed_punctuation", |b| b.iter(|| black_box(n.norm(phrase).unwrap())));

    group.finish();
}

criterion_group!(normalization_benches, short_phrase_bench, long_phrase_bench, punctuation_heavy_bench);
criterion_main!(normalization_benches);
