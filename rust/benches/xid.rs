use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use std::thread::scope;
use xid::{Xid, XidGen, decode_text, encode_text};

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator = XidGen::new();
    group.bench_function(format!("xid/elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_xid());
            }
        })
    });

    group.bench_function(format!("ulid/elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(ulid::Ulid::new());
            }
        })
    });

    group.finish();
}

fn bench_generate_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_contended");
    let threads = 4;
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    let generator = Arc::new(XidGen::new());
    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            scope(|s| {
                for _ in 0..threads {
                    let generator = Arc::clone(&generator);
                    s.spawn(move || {
                        for _ in 0..TOTAL_IDS {
                            black_box(generator.next_xid());
                        }
                    });
                }
            });
        })
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let id = XidGen::new().next_xid();
    let text = id.to_string();

    group.bench_function("encode", |b| b.iter(|| black_box(encode_text(black_box(id.as_bytes())))));
    group.bench_function("decode", |b| b.iter(|| black_box(decode_text(black_box(&text)))));
    group.bench_function("parse", |b| b.iter(|| black_box(text.parse::<Xid>())));

    group.finish();
}

criterion_group!(benches, bench_generate, bench_generate_contended, bench_codec);
criterion_main!(benches);
