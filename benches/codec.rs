//! Cost of crossing the payload codec, isolated from any backend.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use cachebench::codec::{BinaryCodec, JsonCodec, PayloadCodec, RawCodec};

const OPS: u64 = 10_000;

fn round_trip<C: PayloadCodec>(c: &mut Criterion, name: &str) {
    let codec = C::default();
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("encode", |b| {
        b.iter(|| {
            for id in 0..OPS as usize {
                let value = codec.make_value(id);
                black_box(codec.to_bytes(value).ok());
            }
        })
    });

    let encoded: Vec<_> = (0..OPS as usize)
        .filter_map(|id| codec.to_bytes(codec.make_value(id)).ok())
        .collect();
    group.bench_function("decode", |b| {
        b.iter(|| {
            for data in &encoded {
                black_box(codec.from_bytes(data.clone()).ok());
            }
        })
    });

    group.finish();
}

fn bench_raw(c: &mut Criterion) {
    round_trip::<RawCodec>(c, "codec_raw");
}

fn bench_binary(c: &mut Criterion) {
    round_trip::<BinaryCodec>(c, "codec_binary");
}

fn bench_json(c: &mut Criterion) {
    round_trip::<JsonCodec>(c, "codec_json");
}

criterion_group!(benches, bench_raw, bench_binary, bench_json);
criterion_main!(benches);
