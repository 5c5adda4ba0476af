//! Criterion benchmarks for the Pelco-D frame synchroniser.
//!
//! The joystick link runs at 2400 baud, so throughput is never the concern;
//! these benches guard against accidental quadratic behaviour when the
//! stream is full of noise.
//!
//! Run with:
//! ```bash
//! cargo bench --package pelco-core --bench synchronizer_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pelco_core::protocol::command::CMD2_GOTO_PRESET;
use pelco_core::{build_preset, FrameSynchronizer};

// ── Stream fixtures ───────────────────────────────────────────────────────────

fn clean_stream(frames: usize) -> Vec<u8> {
    let frame = build_preset(1, CMD2_GOTO_PRESET, 1).unwrap();
    frame.as_bytes().repeat(frames)
}

fn noisy_stream(frames: usize) -> Vec<u8> {
    let frame = build_preset(1, CMD2_GOTO_PRESET, 1).unwrap();
    let mut out = Vec::with_capacity(frames * 10);
    for _ in 0..frames {
        out.extend_from_slice(&[0x12, 0x34, 0x56]);
        out.extend_from_slice(frame.as_bytes());
    }
    out
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed");

    for frames in [1usize, 64, 1024] {
        let clean = clean_stream(frames);
        group.bench_with_input(BenchmarkId::new("clean", frames), &clean, |b, input| {
            b.iter(|| {
                let mut sync = FrameSynchronizer::new();
                let n = sync.feed(black_box(input)).count();
                n
            })
        });

        let noisy = noisy_stream(frames);
        group.bench_with_input(BenchmarkId::new("noisy", frames), &noisy, |b, input| {
            b.iter(|| {
                let mut sync = FrameSynchronizer::new();
                let n = sync.feed(black_box(input)).count();
                n
            })
        });
    }

    group.finish();
}

fn bench_pure_noise(c: &mut Criterion) {
    let noise = vec![0x55u8; 64 * 1024];
    c.bench_function("pure_noise_64k", |b| {
        b.iter(|| {
            let mut sync = FrameSynchronizer::new();
            let n = sync.feed(black_box(&noise)).count();
            n
        })
    });
}

criterion_group!(benches, bench_feed, bench_pure_noise);
criterion_main!(benches);
