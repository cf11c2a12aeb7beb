//! Benchmark for the detector hot path: one `check` call per tick.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use greenguard::config::DetectorConfig;
use greenguard::detector::GreenGuardDetector;

fn bench_check(c: &mut Criterion) {
    c.bench_function("detector_check_steady_state", |b| {
        let mut detector = GreenGuardDetector::new(DetectorConfig::default());
        // Warm the window so every measured call pays full window statistics.
        for i in 0..30 {
            detector.check(3.4 + (i as f64 / 60.0).sin(), i as f64);
        }
        let mut ts = 30.0;
        b.iter(|| {
            ts += 1.0;
            black_box(detector.check(black_box(3.4), ts))
        });
    });

    c.bench_function("detector_check_with_anomalies", |b| {
        let mut detector = GreenGuardDetector::new(DetectorConfig::default());
        let mut ts = 0.0;
        let mut i = 0u64;
        b.iter(|| {
            ts += 1.0;
            i += 1;
            let kw = if i % 10 == 0 { 20.0 } else { 3.4 };
            black_box(detector.check(black_box(kw), ts))
        });
    });
}

criterion_group!(benches, bench_check);
criterion_main!(benches);
