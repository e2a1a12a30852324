//! # SENTINEL Shared
//!
//! Numeric building blocks for the detectors.
//!
//! - [`math`] - `Vec3` world vectors and `Vec2` yaw/pitch pairs
//! - [`trig`] - lookup-table sine/cosine and look-direction conversion
//! - [`stats`] - mean, deviation, finite differences, IQR, z-scores, floored GCD
//! - [`events`] - the per-tick `RotationEvent`
//!
//! ## CRITICAL RULE
//!
//! This crate performs no I/O and no logging. Everything here is callable
//! from inside a server tick.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod events;
pub mod math;
pub mod stats;
pub mod trig;

pub use events::RotationEvent;
pub use math::{Vec2, Vec3};
