//! Per-tick input events delivered by the host engine.
//!
//! Events are ephemeral: created once per tick, consumed immediately and
//! never retained by a detector.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Viewpoint rotation since the previous tick, in degrees.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct RotationEvent {
    /// Signed (yaw, pitch) change.
    pub delta: Vec2,
    /// Absolute (yaw, pitch) change.
    pub abs_delta: Vec2,
}

impl RotationEvent {
    /// Builds an event from signed deltas, deriving the absolute values.
    #[must_use]
    pub fn new(delta_yaw: f32, delta_pitch: f32) -> Self {
        let delta = Vec2::new(delta_yaw, delta_pitch);
        Self {
            delta,
            abs_delta: delta.abs(),
        }
    }

    /// Builds an event from the previous and current orientation.
    ///
    /// The yaw delta is wrapped into `[-180, 180)` so crossing the 0/360
    /// seam is not reported as a full turn.
    #[must_use]
    pub fn between(previous: Vec2, current: Vec2) -> Self {
        let yaw = (current.x - previous.x + 180.0).rem_euclid(360.0) - 180.0;
        Self::new(yaw, current.y - previous.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abs_delta_derived() {
        let event = RotationEvent::new(-2.5, 1.25);
        assert_eq!(event.abs_delta, Vec2::new(2.5, 1.25));
    }

    #[test]
    fn test_between_wraps_yaw_seam() {
        let event = RotationEvent::between(Vec2::new(359.0, 0.0), Vec2::new(1.0, -3.0));
        assert!((event.delta.x - 2.0).abs() < 1e-4);
        assert!((event.delta.y + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_event_is_pod() {
        let events = [RotationEvent::new(1.0, 2.0), RotationEvent::new(-3.0, 4.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&events);
        assert_eq!(bytes.len(), 32);
        let back: &[RotationEvent] = bytemuck::cast_slice(bytes);
        assert_eq!(back[1].abs_delta, Vec2::new(3.0, 4.0));
    }
}
