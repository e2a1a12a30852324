//! # Sight-Line Validation
//!
//! Server-side check that an attack was geometrically possible.
//!
//! ## Philosophy
//!
//! NEVER trust the client. The client says "I hit entity X".
//! We verify the attacker was actually looking at X:
//! 1. Build the target's hitbox from its server-side position.
//! 2. Turn the attacker's yaw/pitch into a look vector.
//! 3. Compare the look vector with the direction to the nearest hitbox point.
//!
//! A single off-angle hit is not a violation (latency, interpolation). The
//! perpendicular miss distance of every off-angle hit feeds a buffer, and
//! clean hits drain it.

use std::sync::Arc;

use sentinel_shared::{trig, Vec3};

use crate::buffer::LeakyIntegrator;
use crate::config::DirectionConfig;
use crate::violation::{emit, Category, PlayerId, Violation, ViolationSink};

/// Name reported for violations from this check.
pub const CHECK_NAME: &str = "Direction";

/// Hitbox width (and depth) for every target.
const HITBOX_WIDTH: f64 = 0.6;

/// Hitbox height for targets without an eye height.
const DEFAULT_HITBOX_HEIGHT: f64 = 1.8;

/// Eye height to hitbox height for living targets.
const EYE_HEIGHT_SCALE: f64 = 1.1;

/// Closest point this near the eye means the target overlaps the attacker.
const OVERLAP_DISTANCE: f64 = 0.001;

/// Deviations at or below this many degrees count as clean.
const MIN_DEVIATION_DEG: f64 = 0.1;

/// Buffer gain per block of perpendicular miss distance.
const MISS_WEIGHT: f64 = 0.8;

const SEVERITY: f32 = 2.0;

/// Attacker at the moment of the attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerState {
    /// Feet position.
    pub position: Vec3,
    /// Eye height above the feet.
    pub eye_height: f64,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
}

impl AttackerState {
    /// Eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.eye_height,
            self.position.z,
        )
    }
}

/// Target entity at the moment of the attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetState {
    /// Feet position.
    pub position: Vec3,
    /// Eye height, for living entities.
    pub eye_height: Option<f64>,
    /// False once the entity is dead or removed.
    pub valid: bool,
}

/// Axis-aligned hitbox.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    /// Center position.
    pub center: Vec3,
    /// Half-extents (width/2, height/2, depth/2).
    pub half_extents: Vec3,
}

impl Hitbox {
    /// Creates a new hitbox.
    #[must_use]
    pub const fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Hitbox for a target: 0.6 wide, `eye_height * 1.1` tall for living
    /// entities and 1.8 tall otherwise, standing on its feet position.
    #[must_use]
    pub fn for_target(target: &TargetState) -> Self {
        let height = target
            .eye_height
            .map_or(DEFAULT_HITBOX_HEIGHT, |eye| eye * EYE_HEIGHT_SCALE);
        let half_width = HITBOX_WIDTH / 2.0;
        let half_height = height / 2.0;
        Self {
            center: Vec3::new(
                target.position.x,
                target.position.y + half_height,
                target.position.z,
            ),
            half_extents: Vec3::new(half_width, half_height, half_width),
        }
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Point of the box closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min(), self.max())
    }

    /// Returns true if a point is inside the hitbox.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        let d = point - self.center;
        d.x.abs() <= self.half_extents.x
            && d.y.abs() <= self.half_extents.y
            && d.z.abs() <= self.half_extents.z
    }
}

/// Degrees by which `look` misses the hitbox as seen from `eye`.
///
/// Zero when the angle to the closest hitbox point is within the box's
/// subtended half-angle plus `precision_margin_deg`, or when the eye is
/// inside or touching the box.
#[must_use]
pub fn angular_deviation(eye: Vec3, look: Vec3, hitbox: &Hitbox, precision_margin_deg: f64) -> f64 {
    if hitbox.contains(eye) {
        return 0.0;
    }
    let look = look.normalize_or_self();
    let to_target = hitbox.closest_point(eye) - eye;
    let distance = to_target.length();
    if distance < OVERLAP_DISTANCE {
        return 0.0;
    }

    let cos_angle = look.dot(to_target * (1.0 / distance)).clamp(-1.0, 1.0);
    let angle = cos_angle.acos().to_degrees();
    let half_size = hitbox.half_extents.x.max(hitbox.half_extents.y);
    let allowed = half_size.atan2(distance).to_degrees() + precision_margin_deg;

    if angle <= allowed {
        0.0
    } else {
        angle - allowed
    }
}

/// Result of one attack evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttackVerdict {
    /// Degrees beyond the allowed angle.
    pub deviation_deg: f64,
    /// Perpendicular distance from the look ray to the hitbox center, for
    /// off-angle attacks.
    pub miss_distance: Option<f64>,
    /// The attack should be cancelled and a violation was recorded.
    pub flagged: bool,
}

/// Per-player sight-line validator.
pub struct DirectionCheck {
    player: PlayerId,
    config: DirectionConfig,
    buffer: LeakyIntegrator,
    sink: Arc<dyn ViolationSink>,
}

impl DirectionCheck {
    /// Creates a validator for one player.
    #[must_use]
    pub fn new(player: PlayerId, config: DirectionConfig, sink: Arc<dyn ViolationSink>) -> Self {
        let buffer = LeakyIntegrator::new(config.buffer);
        Self {
            player,
            config,
            buffer,
            sink,
        }
    }

    /// Current deviation buffer.
    #[must_use]
    pub fn buffer(&self) -> f32 {
        self.buffer.value()
    }

    /// Checks one attack. Returns true if it should be cancelled.
    pub fn check(&mut self, attacker: &AttackerState, target: &TargetState) -> bool {
        self.evaluate(attacker, target).flagged
    }

    /// Checks one attack and reports the measured geometry.
    pub fn evaluate(&mut self, attacker: &AttackerState, target: &TargetState) -> AttackVerdict {
        if !self.config.enabled || !target.valid {
            return AttackVerdict::default();
        }

        let hitbox = Hitbox::for_target(target);
        let look = trig::look_direction(attacker.yaw, attacker.pitch);
        let eye = attacker.eye();
        let deviation = angular_deviation(eye, look, &hitbox, self.config.precision_margin_deg);

        if deviation <= MIN_DEVIATION_DEG {
            self.buffer.decay();
            return AttackVerdict {
                deviation_deg: deviation,
                ..AttackVerdict::default()
            };
        }

        let to_center = hitbox.center - eye;
        let look_len = look.length();
        let miss = if look_len > 0.0 {
            to_center.cross(look).length() / look_len
        } else {
            to_center.length()
        };

        self.buffer.add((miss * MISS_WEIGHT) as f32);
        tracing::debug!(
            player = self.player,
            deviation,
            miss,
            buffer = f64::from(self.buffer.value()),
            "off-angle attack"
        );

        let flagged = self.buffer.take_violation_if_triggered().is_some();
        if flagged {
            emit(
                self.sink.as_ref(),
                Violation {
                    player: self.player,
                    category: Category::Fight,
                    check_name: CHECK_NAME,
                    message: format!("off={deviation:.2} dist={miss:.2}"),
                    severity: SEVERITY,
                },
            );
        }

        AttackVerdict {
            deviation_deg: deviation,
            miss_distance: Some(miss),
            flagged,
        }
    }
}
