//! # Detector Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file) yields the tuned production values.
//!
//! ```toml
//! [direction]
//! enabled = true
//! precision_margin_deg = 2.6
//!
//! [direction.buffer]
//! decay_rate = 1.5
//! trigger_threshold = 8.0
//! post_trigger_floor = 6.0
//!
//! [aim.checks]
//! bot_signature = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buffer::IntegratorConfig;
use crate::error::{SecurityError, SecurityResult};

/// Top-level configuration for both detectors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Sight-line validator settings.
    pub direction: DirectionConfig,
    /// Rotation-pattern detector settings.
    pub aim: AimConfig,
}

impl SecurityConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Parse`] for malformed TOML and
    /// [`SecurityError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> SecurityResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Io`] if the file cannot be read, otherwise
    /// as [`SecurityConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> SecurityResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SecurityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded security config");
        Ok(config)
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> SecurityResult<()> {
        if !(self.direction.precision_margin_deg >= 0.0
            && self.direction.precision_margin_deg < 90.0)
        {
            return Err(SecurityError::InvalidConfig(format!(
                "direction.precision_margin_deg must be in [0, 90), got {}",
                self.direction.precision_margin_deg
            )));
        }
        validate_integrator("direction.buffer", self.direction.buffer)?;
        validate_integrator("aim.pattern_buffer", self.aim.pattern_buffer)?;
        validate_integrator("aim.linearity_buffer", self.aim.linearity_buffer)?;
        validate_integrator("aim.rank_buffer", self.aim.rank_buffer)?;
        validate_integrator("aim.periodicity_buffer", self.aim.periodicity_buffer)?;
        Ok(())
    }
}

fn validate_integrator(name: &str, shape: IntegratorConfig) -> SecurityResult<()> {
    let finite = shape.decay_rate.is_finite()
        && shape.trigger_threshold.is_finite()
        && shape.post_trigger_floor.is_finite();
    if !finite || shape.decay_rate < 0.0 || shape.post_trigger_floor < 0.0 {
        return Err(SecurityError::InvalidConfig(format!(
            "{name}: values must be finite and non-negative"
        )));
    }
    if shape.post_trigger_floor > shape.trigger_threshold {
        return Err(SecurityError::InvalidConfig(format!(
            "{name}: post_trigger_floor {} exceeds trigger_threshold {}",
            shape.post_trigger_floor, shape.trigger_threshold
        )));
    }
    Ok(())
}

/// Sight-line validator settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionConfig {
    /// Run the check at all.
    pub enabled: bool,
    /// Degrees added to the hitbox half-angle before an attack counts as off-target.
    pub precision_margin_deg: f64,
    /// Deviation buffer. `decay_rate` is applied per clean attack.
    pub buffer: IntegratorConfig,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            precision_margin_deg: 2.6,
            buffer: IntegratorConfig::new(1.5, 8.0, 6.0),
        }
    }
}

/// Toggles for the rotation detector's sub-checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct AimChecks {
    /// Jitter-ratio IQR check.
    pub jitter_ratio: bool,
    /// Exact-repetition check.
    pub bot_signature: bool,
    /// Missing-outliers check.
    pub linearity: bool,
    /// Distinctness-rank checks (per batch and long term).
    pub rank: bool,
    /// Integer-GCD check on fast rotations.
    pub periodicity: bool,
}

impl Default for AimChecks {
    fn default() -> Self {
        Self {
            jitter_ratio: true,
            bot_signature: true,
            linearity: true,
            rank: true,
            periodicity: true,
        }
    }
}

/// Rotation-pattern detector settings.
///
/// Buffer `decay_rate`s are per tick. A batch runs every 100 ticks, so a
/// rate of 0.005 drains 0.5 between batches. The rank buffer only opens
/// on a 0.2 nudge, so its rate must stay below 0.002 for the nudge to
/// survive until the next batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Enabled sub-checks.
    pub checks: AimChecks,
    /// Jitter-ratio buffer.
    pub pattern_buffer: IntegratorConfig,
    /// Linearity buffer.
    pub linearity_buffer: IntegratorConfig,
    /// Per-batch rank buffer.
    pub rank_buffer: IntegratorConfig,
    /// GCD periodicity buffer.
    pub periodicity_buffer: IntegratorConfig,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            checks: AimChecks::default(),
            pattern_buffer: IntegratorConfig::new(0.004, 11.0, 9.0),
            linearity_buffer: IntegratorConfig::new(0.005, 8.0, 5.0),
            rank_buffer: IntegratorConfig::new(0.001, 6.0, 5.0),
            periodicity_buffer: IntegratorConfig::new(0.01, 5.0, 2.0),
        }
    }
}
