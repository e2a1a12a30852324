//! # Confidence Buffers
//!
//! A leaky integrator turns repeated weak evidence into a violation signal.
//!
//! ```text
//!   value ─┬─ add(evidence) ──► value > threshold ? ──► violation, value = floor
//!          ├─ decay()  (fixed per-tick rate)
//!          └─ relax(n) (clean batch)
//! ```
//!
//! The value never drops below zero. After a trigger it restarts from the
//! post-trigger floor, not from zero, so a repeat offender reaches the
//! threshold again sooner.

use serde::{Deserialize, Serialize};

/// Shape of a [`LeakyIntegrator`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Amount removed by each [`LeakyIntegrator::decay`] call.
    pub decay_rate: f32,
    /// The buffer triggers when its value is strictly above this.
    pub trigger_threshold: f32,
    /// Value the buffer restarts from after triggering.
    pub post_trigger_floor: f32,
}

impl IntegratorConfig {
    /// Creates a new integrator shape.
    #[must_use]
    pub const fn new(decay_rate: f32, trigger_threshold: f32, post_trigger_floor: f32) -> Self {
        Self {
            decay_rate,
            trigger_threshold,
            post_trigger_floor,
        }
    }
}

/// Non-negative decaying accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeakyIntegrator {
    value: f32,
    config: IntegratorConfig,
}

impl LeakyIntegrator {
    /// Creates an empty integrator.
    #[must_use]
    pub const fn new(config: IntegratorConfig) -> Self {
        Self { value: 0.0, config }
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Adds evidence.
    #[inline]
    pub fn add(&mut self, amount: f32) {
        if amount.is_nan() {
            return;
        }
        self.value = (self.value + amount).max(0.0);
    }

    /// Removes the configured decay rate.
    #[inline]
    pub fn decay(&mut self) {
        self.relax(self.config.decay_rate);
    }

    /// Removes an explicit amount, clamped at zero.
    #[inline]
    pub fn relax(&mut self, amount: f32) {
        self.value = (self.value - amount).max(0.0);
    }

    /// If the value is above the trigger threshold, resets it to the
    /// post-trigger floor and returns the value that tripped.
    #[must_use]
    pub fn take_violation_if_triggered(&mut self) -> Option<f32> {
        if self.value > self.config.trigger_threshold {
            let tripped = self.value;
            self.value = self.config.post_trigger_floor;
            Some(tripped)
        } else {
            None
        }
    }
}
