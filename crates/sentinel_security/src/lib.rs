//! # SENTINEL Security - The Detectors
//!
//! Server-side detection of aim assistance and impossible attack angles.
//!
//! ## Features
//!
//! - **Rotation Analysis**: Per-player statistics over 100-tick windows of
//!   yaw/pitch deltas (finite differences, IQR, distinctness rank, GCD)
//! - **Sight-Line Validation**: Look vector vs target hitbox on every attack
//! - **Confidence Buffers**: Leaky integrators so one noisy sample never flags
//! - **Violation Sinks**: In-memory log or channel to a reporting thread
//!
//! ## Architecture
//!
//! ```text
//! HOST SERVER                         SENTINEL
//!     │                                   │
//!     │─── RotationEvent ───────────────►│ AimAnalyzer ──┐
//!     │─── Attack (attacker, target) ───►│ DirectionCheck┤
//!     │◄── cancel? ──────────────────────│               │
//!     │                                   │               ▼
//!     │                                   │        ViolationSink
//!     │                                   │   (log / channel / custom)
//! ```
//!
//! Every per-player detector is owned by one thread at a time. Sinks are
//! `Send + Sync` and shared between players.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod aim;
pub mod buffer;
pub mod config;
pub mod direction;
pub mod error;
pub mod monitor;
pub mod violation;

pub use aim::{AimAnalyzer, BatchReport, BufferSnapshot};
pub use buffer::{IntegratorConfig, LeakyIntegrator};
pub use config::{AimChecks, AimConfig, DirectionConfig, SecurityConfig};
pub use direction::{AttackVerdict, AttackerState, DirectionCheck, Hitbox, TargetState};
pub use error::{SecurityError, SecurityResult};
pub use monitor::{PlayerChecks, SecurityMonitor};
pub use violation::{Category, PlayerId, Violation, ViolationLog, ViolationSink};
