//! Integration tests: scripted rotation and attack streams through the
//! public API.

use std::sync::Arc;
use std::thread;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sentinel_security::{
    AimAnalyzer, AimConfig, AttackerState, Category, SecurityConfig, SecurityMonitor,
    TargetState, Violation, ViolationLog,
};
use sentinel_shared::{RotationEvent, Vec3};

/// Mouse counts to degrees for a mid-range sensitivity.
const SENSITIVITY_STEP: f32 = 0.0243;

/// Small integer LCG so scenarios are reproducible bit for bit.
struct Lcg(u32);

impl Lcg {
    fn next_u24(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0 >> 8
    }

    fn unit(&mut self) -> f32 {
        self.next_u24() as f32 / 16_777_216.0
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        self.unit() * (hi - lo) + lo
    }

    /// Whole mouse counts in `-n..=n`.
    fn counts(&mut self, n: u32) -> f32 {
        ((self.next_u24() % (2 * n + 1)) as i32 - n as i32) as f32
    }
}

fn analyzer(config: AimConfig) -> (Arc<ViolationLog>, AimAnalyzer) {
    let log = Arc::new(ViolationLog::new());
    let analyzer = AimAnalyzer::new(1, config, log.clone());
    (log, analyzer)
}

fn none_with_prefix(log: &ViolationLog, prefixes: &[&str]) -> bool {
    prefixes.iter().all(|p| log.count_with_prefix(p) == 0)
}

#[test]
fn test_quantized_mouse_input_is_clean() {
    for seed in 1..=3 {
        let (log, mut aim) = analyzer(AimConfig::default());
        let mut rng = Lcg(seed);
        for _ in 0..3000 {
            let yaw = rng.counts(200) * SENSITIVITY_STEP;
            let pitch = rng.counts(80) * SENSITIVITY_STEP;
            aim.process(&RotationEvent::new(yaw, pitch));
        }
        assert!(log.is_empty(), "seed {seed}: {:?}", log.snapshot());
        assert_eq!(aim.buffers().linearity, 0.0);
    }
}

#[test]
fn test_fast_quantized_turns_have_no_periodicity() {
    let (log, mut aim) = analyzer(AimConfig::default());
    let mut rng = Lcg(5);
    for _ in 0..600 {
        let yaw = (rng.next_u24() % 160 + 80) as f32 * SENSITIVITY_STEP;
        let pitch = (rng.next_u24() % 100 + 20) as f32 * SENSITIVITY_STEP;
        aim.process(&RotationEvent::new(yaw, pitch));
    }
    assert_eq!(log.count_with_prefix("GCD"), 0);
}

#[test]
fn test_fast_continuous_turns_flag_periodicity() {
    let (log, mut aim) = analyzer(AimConfig::default());
    let mut rng = Lcg(5);
    for _ in 0..600 {
        let event = RotationEvent::new(rng.range(2.0, 6.0), rng.range(0.5, 3.0));
        aim.process(&event);
    }

    let violations = log.snapshot();
    assert!(!violations.is_empty());
    for v in &violations {
        assert_eq!(v.category, Category::Aim);
        assert!(v.message.starts_with("GCD low="), "{v}");
        assert_eq!(v.severity, 2.0);
    }
}

#[test]
fn test_continuous_random_rotation_is_never_linear() {
    let (log, mut aim) = analyzer(AimConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..5000 {
        let event = RotationEvent::new(rng.gen_range(-10.0..10.0), rng.gen_range(-4.0..4.0));
        aim.process(&event);
    }
    assert!(none_with_prefix(&log, &["Linear", "Rank", "LongTerm"]));
    let report = aim.last_batch().expect("batches ran");
    assert!(report.outliers > 0);
    assert!((report.rank - 1.0).abs() < 1e-6);
}

#[test]
fn test_repeated_micro_adjustments_flag_bot_pattern() {
    const PATTERN: [f32; 7] = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];

    // Same periodic wobble at two turn rates. Only a fast turn qualifies.
    for (base, expected) in [(5.0f32, 1), (1.0, 0)] {
        let (log, mut aim) = analyzer(AimConfig::default());
        let mut rng = Lcg(3);
        for i in 0..100 {
            let yaw = base + PATTERN[i % PATTERN.len()] * 1e-4;
            let pitch = rng.counts(40) * SENSITIVITY_STEP;
            aim.process(&RotationEvent::new(yaw, pitch));
        }
        let report = aim.last_batch().expect("one batch");
        assert!(report.repetitions > 12, "repetitions={}", report.repetitions);
        assert_eq!(log.count_with_prefix("BotPattern"), expected, "base={base}");
    }
}

#[test]
fn test_locked_pitch_flags_jitter_ratio() {
    // Pitch is held for six ticks at the start of every window, so each
    // batch has exactly one infinite ratio and a wide finite spread.
    let (log, mut aim) = analyzer(AimConfig::default());
    let mut rng = Lcg(11);
    let mut tick = |aim: &mut AimAnalyzer, i: usize| {
        let yaw = rng.range(-8.0, 8.0);
        let pitch = if i % 100 < 6 { 0.5 } else { rng.range(-0.4, 0.4) };
        aim.process(&RotationEvent::new(yaw, pitch));
    };

    for i in 0..1000 {
        tick(&mut aim, i);
    }
    let report = *aim.last_batch().expect("batches ran");
    assert_eq!(report.infinite_ratios, 1);
    assert!(report.iqr.is_some_and(|iqr| iqr > 20.0 && iqr < 96.0));
    assert_eq!(log.count_with_prefix("IQR"), 0);
    assert!(aim.buffers().pattern > 10.0);

    for i in 1000..1500 {
        tick(&mut aim, i);
    }
    let violations = log.snapshot();
    assert!(violations.len() >= 2);
    for v in &violations {
        assert!(v.message.starts_with("IQR iqr="), "{v}");
        assert!(v.message.ends_with("infs=1"), "{v}");
    }
}

#[test]
fn test_coarse_steady_turn_flags_rank() {
    // A steady right turn in quarter-degree steps repeats the same few yaw
    // values, so each window lands in the low distinctness band.
    let (log, mut aim) = analyzer(AimConfig::default());
    let mut rng = Lcg(2);
    for _ in 0..2000 {
        let yaw = 3.0 + rng.counts(12) * 0.25;
        let pitch = rng.counts(40) * SENSITIVITY_STEP;
        aim.process(&RotationEvent::new(yaw, pitch));
    }

    let rank: Vec<_> = log
        .snapshot()
        .into_iter()
        .filter(|v| v.message.starts_with("Rank r="))
        .collect();
    assert!(rank.len() >= 5, "rank violations: {}", rank.len());
    assert!(rank.iter().all(|v| v.severity == 2.0 && v.category == Category::Aim));
    assert!(aim.buffers().rank <= 6.0);
}

#[test]
fn test_config_file_disables_check() {
    let config = SecurityConfig::from_toml_str(
        r"
        [aim.checks]
        bot_signature = false
        ",
    )
    .unwrap();

    let log = Arc::new(ViolationLog::new());
    let mut monitor = SecurityMonitor::new(config, log.clone());
    for i in 0..300u16 {
        let wobble = f32::from(i % 7) * 1e-4;
        monitor.on_rotation(3, &RotationEvent::new(5.0 + wobble, 0.5));
    }
    assert_eq!(log.count_with_prefix("BotPattern"), 0);
    assert_eq!(
        monitor.player(3).unwrap().aim.last_batch().unwrap().repetitions,
        0
    );
}

#[test]
fn test_channel_sink_delivers_to_reporter_thread() {
    let (tx, rx) = crossbeam_channel::unbounded::<Violation>();
    let reporter = thread::spawn(move || rx.iter().collect::<Vec<_>>());

    let mut monitor = SecurityMonitor::new(SecurityConfig::default(), Arc::new(tx));
    let target = TargetState {
        position: Vec3::new(0.0, 0.63, 3.0),
        eye_height: Some(1.8),
        valid: true,
    };
    let looking_away = AttackerState {
        position: Vec3::ZERO,
        eye_height: 1.62,
        yaw: 90.0,
        pitch: 0.0,
    };

    let cancelled = (0..5)
        .filter(|_| monitor.on_attack(8, &looking_away, &target))
        .count();
    assert_eq!(cancelled, 2);

    // Dropping the monitor drops the last sender and ends the reporter.
    drop(monitor);
    let received = reporter.join().unwrap();
    assert_eq!(received.len(), 2);
    assert!(received.iter().all(|v| v.player == 8 && v.category == Category::Fight));
}
