use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use evm_panel::machine::ToneSpec;
use std::hint::black_box;

/// Tone rendering cost at the stock spec and at shorter durations
fn bench_tone_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("tone_render");

    group.bench_function("stock_2000ms", |b| {
        let spec = ToneSpec::confirmation();
        b.iter(|| black_box(spec.render(black_box(44_100))))
    });

    for duration_ms in [50u64, 200, 500] {
        let spec = ToneSpec {
            duration_ms,
            ..ToneSpec::confirmation()
        };
        group.bench_with_input(
            BenchmarkId::new("by_duration", duration_ms),
            &spec,
            |b, spec| b.iter(|| black_box(spec.render(44_100))),
        );
    }

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let spec = ToneSpec::confirmation();
    c.bench_function("envelope_at", |b| {
        b.iter(|| black_box(spec.amplitude_at(black_box(1.0))))
    });
}

criterion_group!(benches, bench_tone_render, bench_envelope);
criterion_main!(benches);
