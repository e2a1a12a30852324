//! Rolling history of floored GCDs between consecutive fast pitch deltas.
//!
//! Organic pitch deltas share no common step, so their floored GCD jumps
//! around with the occasional large spike when two deltas happen to line
//! up. Quantized synthetic deltas stay consistently small while still
//! varying in scale.

/// GCD values per evaluation.
pub const HISTORY_SIZE: usize = 20;

/// Values below this count as low.
const LOW_GCD: u64 = 120_000;
/// Values above this count as spikes.
const SPIKE_GCD: u64 = 250_000;
/// Uniqueness is measured among values below this.
const UNIQUE_CEILING: u64 = 150_000;

const MOSTLY_LOW: f64 = 0.75;
const FEW_SPIKES: f64 = 0.10;
const COMMON_SPIKES: f64 = 0.15;
const HIGH_UNIQUENESS: f64 = 0.8;

/// Classification of a full history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodicityVerdict {
    /// Mostly low, few spikes, high uniqueness.
    Suspicious,
    /// Spikes are common: organic.
    Spiky,
    /// Neither.
    Neutral,
}

/// Fractions computed from a full history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicitySummary {
    /// Share of values below 120000.
    pub low_fraction: f64,
    /// Share of values above 250000.
    pub spike_fraction: f64,
    /// Share of distinct values among those below 150000 (0 if there are none).
    pub uniqueness: f64,
}

impl PeriodicitySummary {
    /// Classifies the summary.
    #[must_use]
    pub fn verdict(&self) -> PeriodicityVerdict {
        if self.low_fraction >= MOSTLY_LOW
            && self.spike_fraction <= FEW_SPIKES
            && self.uniqueness >= HIGH_UNIQUENESS
        {
            PeriodicityVerdict::Suspicious
        } else if self.spike_fraction > COMMON_SPIKES {
            PeriodicityVerdict::Spiky
        } else {
            PeriodicityVerdict::Neutral
        }
    }
}

/// Bounded GCD history with a running low count.
#[derive(Clone, Debug)]
pub struct PeriodicityHistory {
    values: [u64; HISTORY_SIZE],
    len: usize,
    low_count: usize,
}

impl PeriodicityHistory {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0; HISTORY_SIZE],
            len: 0,
            low_count: 0,
        }
    }

    /// Number of stored values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Running count of low values.
    #[must_use]
    pub const fn low_count(&self) -> usize {
        self.low_count
    }

    /// Records a GCD. When this fills the history, summarises it and clears
    /// both the history and the low count.
    pub fn push(&mut self, gcd: u64) -> Option<PeriodicitySummary> {
        self.values[self.len] = gcd;
        self.len += 1;
        if gcd < LOW_GCD {
            self.low_count += 1;
        }
        if self.len < HISTORY_SIZE {
            return None;
        }

        let summary = self.summarize();
        self.len = 0;
        self.low_count = 0;
        Some(summary)
    }

    fn summarize(&self) -> PeriodicitySummary {
        let values = &self.values[..self.len];
        let total = values.len() as f64;
        let spikes = values.iter().filter(|&&v| v > SPIKE_GCD).count();

        let mut small = 0usize;
        let mut distinct = 0usize;
        for (i, &v) in values.iter().enumerate() {
            if v >= UNIQUE_CEILING {
                continue;
            }
            small += 1;
            if !values[..i].contains(&v) {
                distinct += 1;
            }
        }

        PeriodicitySummary {
            low_fraction: self.low_count as f64 / total,
            spike_fraction: spikes as f64 / total,
            uniqueness: if small == 0 {
                0.0
            } else {
                distinct as f64 / small as f64
            },
        }
    }
}

impl Default for PeriodicityHistory {
    fn default() -> Self {
        Self::new()
    }
}
