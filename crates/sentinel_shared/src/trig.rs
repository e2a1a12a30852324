//! # Lookup-Table Trigonometry
//!
//! Yaw/pitch to look-direction conversion without transcendental calls on
//! the hot path.
//!
//! The table holds 65536 sine samples over one full turn. An angle in
//! radians maps to a table slot via `radians * 10430.378`, truncated and
//! masked to 16 bits. The samples come from `libm`, not the platform math
//! library, so results are identical on every platform the server runs on. Resolution is one slot per ~0.0055 degrees.
//!
//! The table is built on first use and shared read-only afterwards.

use once_cell::sync::Lazy;

use crate::math::Vec3;

/// Number of entries in the sine table.
pub const SIN_TABLE_SIZE: usize = 65536;

/// Radians to table-slot scale (`65536 / 2π`).
pub const SIN_SCALE: f32 = 10430.378;

/// Table offset of a quarter turn, used for cosine.
const QUARTER_TURN: f32 = 16384.0;

/// Degrees to radians, at the precision the game client uses.
pub const DEG_TO_RAD: f32 = 0.017_453_292;

static SIN_TABLE: Lazy<Box<[f32]>> = Lazy::new(|| {
    (0..SIN_TABLE_SIZE)
        .map(|i| libm::sin(i as f64 * std::f64::consts::PI * 2.0 / SIN_TABLE_SIZE as f64) as f32)
        .collect()
});

/// Forces table construction. Call once during server startup to keep the
/// first attack check off the allocation path.
pub fn warm_up() {
    Lazy::force(&SIN_TABLE);
}

#[inline]
fn slot(units: f32) -> usize {
    // `as i32` truncates toward zero and saturates; the mask wraps negatives.
    ((units as i32) & 0xFFFF) as usize
}

/// Table sine of an angle in radians.
#[inline]
#[must_use]
pub fn sin(radians: f32) -> f32 {
    SIN_TABLE[slot(radians * SIN_SCALE)]
}

/// Table cosine of an angle in radians.
#[inline]
#[must_use]
pub fn cos(radians: f32) -> f32 {
    SIN_TABLE[slot(radians * SIN_SCALE + QUARTER_TURN)]
}

/// Unit look direction for a yaw/pitch orientation in degrees.
///
/// Yaw increases clockwise with 0 facing +Z; pitch 0 is horizontal and
/// positive pitch looks down.
#[must_use]
pub fn look_direction(yaw_deg: f32, pitch_deg: f32) -> Vec3 {
    let pitch = pitch_deg * DEG_TO_RAD;
    let yaw = -yaw_deg * DEG_TO_RAD;
    let cos_yaw = cos(yaw);
    let sin_yaw = sin(yaw);
    let cos_pitch = cos(pitch);
    let sin_pitch = sin(pitch);

    Vec3::new(
        f64::from(sin_yaw * cos_pitch),
        f64::from(-sin_pitch),
        f64::from(cos_yaw * cos_pitch),
    )
}
