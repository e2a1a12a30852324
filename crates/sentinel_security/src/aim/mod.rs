//! # Aim Analysis
//!
//! Per-player rotation-pattern detector.
//!
//! Every tick the host reports how far the player's view turned. Human aim
//! is noisy in a broad, rarely-repeating way; aim assistance leaves
//! regularities behind. Deltas are collected into a 100-sample window and
//! each full window runs four independent batch checks:
//!
//! - **Jitter ratio**: IQR of yaw/pitch higher-order differences, with
//!   exact-zero pitch steps counted separately.
//! - **Bot signature**: bit-identical repeats of tiny or huge difference
//!   values.
//! - **Linearity**: per-chunk deviation spread with no outliers.
//! - **Distinctness rank**: how many unique difference values a batch has,
//!   per batch and over the last ten batches.
//!
//! Fast rotations additionally feed a floored-GCD periodicity check on
//! consecutive pitch deltas.
//!
//! A check that has no evidence (too few values, zero spread) does nothing.

pub mod periodicity;
pub mod window;

use std::sync::Arc;

use sentinel_shared::{stats, RotationEvent, Vec2};

use crate::buffer::LeakyIntegrator;
use crate::config::AimConfig;
use crate::violation::{emit, Category, PlayerId, Violation, ViolationSink};

use periodicity::{PeriodicityHistory, PeriodicityVerdict};
use window::{SampleWindow, SAMPLE_SIZE};

/// Name reported for violations from this detector.
pub const CHECK_NAME: &str = "ProjectAIM";

/// Both absolute deltas below this: the tick carries no information.
const MOTION_EPSILON: f32 = 1e-5;

// Fast-rotation trigger for the periodicity check.
const FAST_YAW: f32 = 1.35;
const FAST_PITCH: f32 = 1.35;
const FAST_PITCH_MIN_YAW: f32 = 0.32;

// Deltas outside this range never enter the GCD history.
const GCD_MIN_DELTA: f32 = 0.25;
const GCD_MAX_DELTA: f32 = 20.0;

const BATCH_DEPTH: usize = 5;
const CHUNK_SIZE: usize = 10;
const CHUNK_DISTINCT_DEPTH: usize = 4;
const CHUNK_DEVIATION_DEPTH: usize = 5;

/// Distinct values a fully irregular batch produces: 10 chunks × 6.
const EXPECTED_DISTINCT: f32 = 60.0;

const RANK_HISTORY_SIZE: usize = 10;

/// Magnitudes whose shortest decimal form carries an exponent.
const SCI_SMALL: f32 = 1e-3;
const SCI_LARGE: f32 = 1e7;

const ZSCORE_THRESHOLD: f64 = 0.5;

/// Buffer values at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BufferSnapshot {
    /// Jitter-ratio buffer.
    pub pattern: f32,
    /// Linearity buffer.
    pub linearity: f32,
    /// Per-batch rank buffer.
    pub rank: f32,
    /// GCD periodicity buffer.
    pub periodicity: f32,
}

/// Measurements from the most recent batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BatchReport {
    /// Jitter-ratio IQR, if any ratios were produced.
    pub iqr: Option<f64>,
    /// Ratios recorded as infinite.
    pub infinite_ratios: usize,
    /// Ordered pairs of repeated scientific-range values.
    pub repetitions: usize,
    /// Z-score outliers among chunk deviations.
    pub outliers: usize,
    /// Distinct values over [`EXPECTED_DISTINCT`].
    pub rank: f32,
    /// Mean signed yaw delta.
    pub mean_yaw: f64,
}

/// Last ten batch ranks.
#[derive(Clone, Debug)]
struct RankHistory {
    values: [f64; RANK_HISTORY_SIZE],
    len: usize,
}

impl RankHistory {
    const fn new() -> Self {
        Self {
            values: [0.0; RANK_HISTORY_SIZE],
            len: 0,
        }
    }

    /// Appends a rank. On the tenth, returns (mean, entries above 0.97) and clears.
    fn push(&mut self, rank: f64) -> Option<(f64, usize)> {
        self.values[self.len] = rank;
        self.len += 1;
        if self.len < RANK_HISTORY_SIZE {
            return None;
        }
        let avg = stats::mean(&self.values);
        let normal = self.values.iter().filter(|&&r| r > 0.97).count();
        self.len = 0;
        Some((avg, normal))
    }
}

/// Per-player rotation-pattern detector.
pub struct AimAnalyzer {
    player: PlayerId,
    config: AimConfig,
    sink: Arc<dyn ViolationSink>,

    window: SampleWindow,
    last_abs: Vec2,

    pattern: LeakyIntegrator,
    linearity: LeakyIntegrator,
    rank: LeakyIntegrator,
    periodicity: LeakyIntegrator,

    rank_history: RankHistory,
    gcd_history: PeriodicityHistory,
    last_batch: Option<BatchReport>,

    // Scratch reused by every batch.
    jiff_yaw: Vec<f32>,
    jiff_pitch: Vec<f32>,
    ratios: Vec<f32>,
    chunk: Vec<f32>,
    deviations: Vec<f64>,
}

impl AimAnalyzer {
    /// Creates a detector for one player.
    #[must_use]
    pub fn new(player: PlayerId, config: AimConfig, sink: Arc<dyn ViolationSink>) -> Self {
        Self {
            player,
            sink,
            window: SampleWindow::new(),
            last_abs: Vec2::ZERO,
            pattern: LeakyIntegrator::new(config.pattern_buffer),
            linearity: LeakyIntegrator::new(config.linearity_buffer),
            rank: LeakyIntegrator::new(config.rank_buffer),
            periodicity: LeakyIntegrator::new(config.periodicity_buffer),
            config,
            rank_history: RankHistory::new(),
            gcd_history: PeriodicityHistory::new(),
            last_batch: None,
            jiff_yaw: Vec::with_capacity(SAMPLE_SIZE),
            jiff_pitch: Vec::with_capacity(SAMPLE_SIZE),
            ratios: Vec::with_capacity(SAMPLE_SIZE),
            chunk: Vec::with_capacity(CHUNK_SIZE),
            deviations: Vec::with_capacity(SAMPLE_SIZE / CHUNK_SIZE),
        }
    }

    /// Current buffer values.
    #[must_use]
    pub fn buffers(&self) -> BufferSnapshot {
        BufferSnapshot {
            pattern: self.pattern.value(),
            linearity: self.linearity.value(),
            rank: self.rank.value(),
            periodicity: self.periodicity.value(),
        }
    }

    /// Samples waiting for the next batch.
    #[must_use]
    pub fn pending_samples(&self) -> usize {
        self.window.len()
    }

    /// GCD values waiting for the next periodicity evaluation.
    #[must_use]
    pub fn pending_gcds(&self) -> usize {
        self.gcd_history.len()
    }

    /// Measurements from the most recent batch.
    #[must_use]
    pub fn last_batch(&self) -> Option<&BatchReport> {
        self.last_batch.as_ref()
    }

    /// Processes one tick of rotation.
    pub fn process(&mut self, event: &RotationEvent) {
        let abs = event.abs_delta;
        if !event.delta.is_finite() || !abs.is_finite() {
            return;
        }
        if abs.x < MOTION_EPSILON && abs.y < MOTION_EPSILON {
            return;
        }

        if self.window.push(event.delta.x, event.delta.y) {
            self.analyze_batch();
            self.window.reset();
        }

        if abs.x > FAST_YAW || (abs.y > FAST_PITCH && abs.x > FAST_PITCH_MIN_YAW) {
            self.check_periodicity(abs);
        }

        self.pattern.decay();
        self.linearity.decay();
        self.rank.decay();
        self.periodicity.decay();

        self.last_abs = abs;
    }

    fn analyze_batch(&mut self) {
        let checks = self.config.checks;
        let mean_yaw = stats::mean(self.window.yaw());
        stats::finite_difference_into(self.window.yaw(), BATCH_DEPTH, &mut self.jiff_yaw);
        stats::finite_difference_into(self.window.pitch(), BATCH_DEPTH, &mut self.jiff_pitch);

        let mut report = BatchReport {
            mean_yaw,
            ..BatchReport::default()
        };

        if checks.jitter_ratio {
            let (iqr, infinite) = self.check_jitter_ratio();
            report.iqr = iqr;
            report.infinite_ratios = infinite;
        }
        if checks.bot_signature {
            report.repetitions = self.check_bot_signature(mean_yaw);
        }

        let distinct_sum = self.measure_chunks();
        report.rank = distinct_sum as f32 / EXPECTED_DISTINCT;

        if checks.linearity {
            report.outliers = self.check_linearity();
        }
        if checks.rank {
            self.check_rank(report.rank, mean_yaw);
        }

        tracing::debug!(
            player = self.player,
            iqr = report.iqr.unwrap_or(0.0),
            infinite = report.infinite_ratios,
            repetitions = report.repetitions,
            outliers = report.outliers,
            rank = f64::from(report.rank),
            "rotation batch analyzed"
        );
        self.last_batch = Some(report);
    }

    /// Returns the IQR (if any ratios) and the infinite-ratio count.
    fn check_jitter_ratio(&mut self) -> (Option<f64>, usize) {
        self.ratios.clear();
        let mut infinite = 0usize;
        for (&jy, &jp) in self.jiff_yaw.iter().zip(&self.jiff_pitch) {
            let ratio = if jp != 0.0 {
                // A subnormal divisor can overflow to infinity too.
                jy / jp
            } else if jy != 0.0 {
                f32::INFINITY
            } else {
                continue;
            };
            if ratio.is_infinite() {
                infinite += 1;
            }
            self.ratios.push(ratio);
        }
        if self.ratios.is_empty() {
            return (None, infinite);
        }

        let iqr = stats::interquartile_range(&mut self.ratios);
        if iqr > 12.5 && iqr < 96.0 && infinite > 0 {
            self.pattern.add(if iqr > 20.0 { 1.4 } else { 0.8 });
            if self.pattern.take_violation_if_triggered().is_some() {
                self.flag(format!("IQR iqr={iqr:.2} infs={infinite}"), 2.5);
            }
        } else if iqr < 13.0 || infinite == 0 {
            self.pattern.relax(if iqr < 7.0 { 5.0 } else { 3.5 });
        }
        (Some(iqr), infinite)
    }

    /// Returns the repetition count.
    fn check_bot_signature(&self, mean_yaw: f64) -> usize {
        let values = &self.jiff_yaw;
        let mut repetitions = 0usize;
        for (i, &v) in values.iter().enumerate() {
            if v == 0.0 || !in_scientific_range(v) {
                continue;
            }
            repetitions += values
                .iter()
                .enumerate()
                .filter(|&(r, &other)| r != i && other.to_bits() == v.to_bits())
                .count();
        }

        if repetitions > 2 && mean_yaw > 3.0 && !matches!(repetitions, 4 | 6 | 12) {
            self.flag(format!("BotPattern p={repetitions}"), 3.5);
        }
        repetitions
    }

    /// Fills the chunk deviation list and returns the summed distinct count.
    fn measure_chunks(&mut self) -> usize {
        self.deviations.clear();
        let mut distinct_sum = 0usize;
        for chunk in self.window.yaw().chunks_exact(CHUNK_SIZE) {
            stats::finite_difference_into(chunk, CHUNK_DISTINCT_DEPTH, &mut self.chunk);
            distinct_sum += stats::distinct_count(&self.chunk);
            stats::finite_difference_into(chunk, CHUNK_DEVIATION_DEPTH, &mut self.chunk);
            self.deviations.push(stats::std_dev(&self.chunk));
        }
        distinct_sum
    }

    /// Returns the outlier count.
    fn check_linearity(&mut self) -> usize {
        let outliers = stats::zscore_outliers(&self.deviations, ZSCORE_THRESHOLD);
        let too_linear = match outliers.as_slice() {
            [] => true,
            [single] => {
                let magnitude = single.abs();
                magnitude > 10.0 && magnitude < 100.0
            }
            _ => false,
        };

        if too_linear {
            self.linearity.add(1.5);
            if self.linearity.take_violation_if_triggered().is_some() {
                self.flag(format!("Linear out={}", outliers.len()), 3.5);
            }
        } else {
            self.linearity.relax(1.0);
        }
        outliers.len()
    }

    fn check_rank(&mut self, rank: f32, mean_yaw: f64) {
        if let Some((avg, normal)) = self.rank_history.push(f64::from(rank)) {
            if avg < 0.95 && normal < 4 {
                self.flag(format!("LongTerm avg={avg:.3} norm={normal}"), 5.5);
            }
        }

        if rank > 0.7 && rank < 1.0 && mean_yaw.abs() > 1.8 {
            if self.rank.value() < 0.01 {
                // Slow start: only the lower band can open an empty buffer.
                if rank < 0.8 {
                    self.rank.add(0.2);
                }
            } else {
                let increment = if rank > 0.9 {
                    0.08
                } else if rank > 0.8 {
                    2.0
                } else {
                    3.0
                };
                self.rank.add(increment);
                if self.rank.take_violation_if_triggered().is_some() {
                    self.flag(format!("Rank r={rank:.3}"), 2.0);
                }
            }
        } else {
            self.rank.relax(2.25);
        }
    }

    fn check_periodicity(&mut self, abs: Vec2) {
        if !self.config.checks.periodicity {
            return;
        }
        let (dy, dp) = (abs.x, abs.y);
        if dy < GCD_MIN_DELTA || dp < GCD_MIN_DELTA || dy > GCD_MAX_DELTA || dp > GCD_MAX_DELTA {
            return;
        }
        if self.last_abs.y <= GCD_MIN_DELTA {
            return;
        }

        let gcd = stats::floored_gcd(stats::expand(dp), stats::expand(self.last_abs.y));
        let Some(summary) = self.gcd_history.push(gcd) else {
            return;
        };

        match summary.verdict() {
            PeriodicityVerdict::Suspicious => {
                self.periodicity.add(3.5);
                if self.periodicity.take_violation_if_triggered().is_some() {
                    self.flag(
                        format!(
                            "GCD low={:.2} spikes={:.2} unique={:.2}",
                            summary.low_fraction, summary.spike_fraction, summary.uniqueness
                        ),
                        2.0,
                    );
                }
            }
            PeriodicityVerdict::Spiky => self.periodicity.relax(4.0),
            PeriodicityVerdict::Neutral => self.periodicity.relax(1.0),
        }
        tracing::debug!(
            player = self.player,
            low = summary.low_fraction,
            spikes = summary.spike_fraction,
            unique = summary.uniqueness,
            buffer = f64::from(self.periodicity.value()),
            "gcd history evaluated"
        );
    }

    fn flag(&self, message: String, severity: f32) {
        emit(
            self.sink.as_ref(),
            Violation {
                player: self.player,
                category: Category::Aim,
                check_name: CHECK_NAME,
                message,
                severity,
            },
        );
    }
}

/// Magnitude test standing in for "prints with an exponent".
#[inline]
fn in_scientific_range(v: f32) -> bool {
    let magnitude = v.abs();
    magnitude < SCI_SMALL || magnitude >= SCI_LARGE
}
