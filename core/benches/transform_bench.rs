//! Transform and codec throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cdp_core::cdf::{self, CdfCodec, UnknownTagPolicy};
use cdp_core::cdp;
use cdp_core::pipeline::{run_forward_parallel, CancellationToken, ParallelismProfile};
use cdp_core::resonance::{CanonicalDictionary, ResonanceMap};
use cdp_core::schema::{HasherKind, Schema};

fn benchmark_transform(c: &mut Criterion) {
    let map = ResonanceMap::standard().unwrap();
    let mut group = c.benchmark_group("cdp_transform");

    for (size, label) in [(64 * 1024usize, "64KB"), (1024 * 1024, "1MB"), (8 * 1024 * 1024, "8MB")] {
        let data: Vec<u8> = (0..size).map(|i| (i * 31 % 256) as u8).collect();
        let streams = cdp::forward(&data, &map);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("forward", label), &data, |b, data| {
            b.iter(|| black_box(cdp::forward(data, &map)));
        });
        group.bench_with_input(BenchmarkId::new("inverse", label), &streams, |b, s| {
            b.iter(|| black_box(cdp::inverse(&s.class_stream, &s.index_stream, &map).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_parallel_forward(c: &mut Criterion) {
    let map = ResonanceMap::standard().unwrap();
    let size = 16 * 1024 * 1024usize;
    let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
    let cancel = CancellationToken::new();

    let mut group = c.benchmark_group("parallel_forward");
    group.throughput(Throughput::Bytes(size as u64));
    group.sample_size(10);

    for workers in [1usize, 2, 4, 8] {
        let profile = ParallelismProfile::single_threaded()
            .with_workers(workers)
            .with_inflight_chunks(workers * 2);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &profile, |b, p| {
            b.iter(|| black_box(run_forward_parallel(&data, &map, p, &cancel).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_codec(c: &mut Criterion) {
    let map = ResonanceMap::standard().unwrap();
    let dict = CanonicalDictionary::new(&map);
    let mut schema = Schema::with_kind("bench", HasherKind::Crc32);
    schema.register_all(["heart_rate", "spo2", "temp", "resp_rate"]).unwrap();
    let labels = ["heart_rate", "spo2", "temp", "resp_rate"];
    let pairs: Vec<(&str, u8)> = (0..100_000usize).map(|i| (labels[i % 4], (i * 7 % 256) as u8)).collect();
    let codec = CdfCodec::new(&dict);
    let encoded = codec.encode_stream(pairs.iter().copied(), &schema).unwrap();

    let mut group = c.benchmark_group("cdf_codec");
    group.throughput(Throughput::Elements(pairs.len() as u64));

    group.bench_function("encode_100k", |b| {
        b.iter(|| black_box(codec.encode_stream(pairs.iter().copied(), &schema).unwrap()));
    });
    group.bench_function("decode_100k", |b| {
        b.iter(|| black_box(cdf::decode_stream(&encoded, &schema, UnknownTagPolicy::Abort).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, benchmark_transform, benchmark_parallel_forward, benchmark_codec);
criterion_main!(benches);
