//! Benchmark for per-tick detector cost.
//!
//! Run with: cargo bench --package sentinel_security --bench detector_benchmark

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sentinel_security::{
    AimAnalyzer, AimConfig, AttackerState, DirectionCheck, DirectionConfig, TargetState,
    Violation, ViolationSink,
};
use sentinel_shared::{RotationEvent, Vec3};

struct Discard;

impl ViolationSink for Discard {
    fn record(&self, violation: Violation) {
        black_box(violation);
    }
}

fn random_rotations(count: usize) -> Vec<RotationEvent> {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5E17_1AE1);
    (0..count)
        .map(|_| RotationEvent::new(rng.gen_range(-10.0..10.0), rng.gen_range(-4.0..4.0)))
        .collect()
}

fn benchmark_rotation_ticks(c: &mut Criterion) {
    let events = random_rotations(10_000);
    let mut analyzer = AimAnalyzer::new(1, AimConfig::default(), Arc::new(Discard));

    // Amortised over the window: 99 cheap ticks and one batch analysis.
    c.bench_function("aim_10k_ticks", |b| {
        b.iter(|| {
            for event in &events {
                analyzer.process(black_box(event));
            }
        });
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let events = random_rotations(100);
    let mut group = c.benchmark_group("aim_batch");

    group.bench_function("full_window", |b| {
        b.iter(|| {
            let mut analyzer = AimAnalyzer::new(1, AimConfig::default(), Arc::new(Discard));
            for event in &events {
                analyzer.process(event);
            }
            black_box(analyzer.last_batch().copied())
        });
    });

    group.finish();
}

fn benchmark_direction(c: &mut Criterion) {
    let mut check = DirectionCheck::new(1, DirectionConfig::default(), Arc::new(Discard));
    let target = TargetState {
        position: Vec3::new(0.5, 0.0, 6.0),
        eye_height: Some(1.62),
        valid: true,
    };

    c.bench_function("direction_check", |b| {
        let mut yaw = 0.0f32;
        b.iter(|| {
            yaw = (yaw + 7.3) % 360.0;
            let attacker = AttackerState {
                position: Vec3::ZERO,
                eye_height: 1.62,
                yaw,
                pitch: -5.0,
            };
            black_box(check.check(black_box(&attacker), &target))
        });
    });
}

criterion_group!(
    benches,
    benchmark_rotation_ticks,
    benchmark_batch,
    benchmark_direction
);
criterion_main!(benches);
