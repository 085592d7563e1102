use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use tickscope::dsp::oscillator::{Oscillator, Waveform};
use tickscope::scope::buffer::{DataPoint, SampleBuffer};
use tickscope::scope::path;

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillator_advance");
    for waveform in [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Sawtooth,
        Waveform::Pulse,
        Waveform::SampleAndHold,
    ] {
        group.bench_function(waveform.label(), |b| {
            let mut osc = Oscillator::with_seed(5.0, waveform, 1);
            b.iter(|| black_box(osc.advance(black_box(1.0 / 60.0))));
        });
    }
    group.finish();
}

fn bench_tick_path(c: &mut Criterion) {
    // The full per-tick hot path at a realistic window size: push,
    // snapshot, rebuild geometry.
    let capacity = 512;
    let mut buffer = SampleBuffer::new(capacity);
    for seq in 0..capacity as u64 {
        buffer.push(DataPoint {
            seq,
            value: (seq as f64 * 0.1).sin(),
        });
    }
    let mut window = Vec::with_capacity(capacity);
    let mut seq = capacity as u64;

    c.bench_function("push_snapshot_build_512", |b| {
        b.iter(|| {
            buffer.push(DataPoint {
                seq,
                value: (seq as f64 * 0.1).sin(),
            });
            seq += 1;
            buffer.snapshot_into(&mut window);
            black_box(path::build(&window, 1.0, 1.0))
        });
    });
}

criterion_group!(benches, bench_oscillator, bench_tick_path);
criterion_main!(benches);
