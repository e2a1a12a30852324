//! Per-player check registry.
//!
//! The host forwards raw events keyed by player; the monitor creates the
//! player's detectors on first sight and drops them on disconnect.

use std::collections::HashMap;
use std::sync::Arc;

use sentinel_shared::{trig, RotationEvent, Vec2};

use crate::aim::AimAnalyzer;
use crate::config::SecurityConfig;
use crate::direction::{AttackerState, DirectionCheck, TargetState};
use crate::violation::{PlayerId, ViolationSink};

/// Detectors owned by one player session.
pub struct PlayerChecks {
    /// Rotation-pattern detector.
    pub aim: AimAnalyzer,
    /// Sight-line validator.
    pub direction: DirectionCheck,
}

impl PlayerChecks {
    fn new(player: PlayerId, config: &SecurityConfig, sink: &Arc<dyn ViolationSink>) -> Self {
        Self {
            aim: AimAnalyzer::new(player, config.aim.clone(), Arc::clone(sink)),
            direction: DirectionCheck::new(player, config.direction.clone(), Arc::clone(sink)),
        }
    }
}

/// Routes host events to per-player detectors.
pub struct SecurityMonitor {
    config: SecurityConfig,
    sink: Arc<dyn ViolationSink>,
    players: HashMap<PlayerId, PlayerChecks>,
}

impl SecurityMonitor {
    /// Creates an empty monitor. Every player gets detectors built from `config`.
    ///
    /// Builds the shared sine table so the first attack check does not pay for it.
    #[must_use]
    pub fn new(config: SecurityConfig, sink: Arc<dyn ViolationSink>) -> Self {
        trig::warm_up();
        Self {
            config,
            sink,
            players: HashMap::new(),
        }
    }

    /// Configuration applied to new sessions.
    #[must_use]
    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Number of players with live detectors.
    #[must_use]
    pub fn tracked_players(&self) -> usize {
        self.players.len()
    }

    /// Detectors for a player, if the session exists.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerChecks> {
        self.players.get(&player)
    }

    /// Feeds one tick of rotation to the player's aim detector.
    pub fn on_rotation(&mut self, player: PlayerId, event: &RotationEvent) {
        self.session(player).aim.process(event);
    }

    /// Feeds one tick of rotation given as the previous and current
    /// (yaw, pitch) orientation in degrees. Yaw is wrapped across the 0/360 seam.
    pub fn on_orientation(&mut self, player: PlayerId, previous: Vec2, current: Vec2) {
        self.on_rotation(player, &RotationEvent::between(previous, current));
    }

    /// Validates one attack. Returns true if the host should cancel it.
    pub fn on_attack(
        &mut self,
        player: PlayerId,
        attacker: &AttackerState,
        target: &TargetState,
    ) -> bool {
        self.session(player).direction.check(attacker, target)
    }

    /// Drops the player's detectors. Returns false if there was no session.
    pub fn disconnect(&mut self, player: PlayerId) -> bool {
        let removed = self.players.remove(&player).is_some();
        if removed {
            tracing::info!(player, tracked = self.players.len(), "player session dropped");
        }
        removed
    }

    fn session(&mut self, player: PlayerId) -> &mut PlayerChecks {
        let Self {
            config,
            sink,
            players,
        } = self;
        players.entry(player).or_insert_with(|| {
            tracing::info!(player, "player session created");
            PlayerChecks::new(player, config, sink)
        })
    }
}
