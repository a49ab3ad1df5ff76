//! Engine-internal action events
//!
//! The host adapts its own event types into these before anything else in
//! the engine sees them. One `ActionEvent` may fan out into a passive
//! experience award, an ability activation attempt, or both, depending on
//! the configured mapping.

use crate::core::types::{PlayerId, TimestampMs};
use serde::{Deserialize, Serialize};

/// Kind of player action the engine tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Melee hit on another entity
    AttackEntity,
    /// Fired an arrow or other projectile
    ShootProjectile,
    /// Took damage from any source
    DamageTaken,
    /// Started sprinting
    Sprint,
    /// Broke a mineable block
    MineBlock,
    /// Chopped a log
    ChopLog,
    /// Dug soil, sand, or gravel
    DigGround,
    /// Harvested a grown crop
    HarvestCrop,
    /// Cast a spell
    CastSpell,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::AttackEntity,
            ActionKind::ShootProjectile,
            ActionKind::DamageTaken,
            ActionKind::Sprint,
            ActionKind::MineBlock,
            ActionKind::ChopLog,
            ActionKind::DigGround,
            ActionKind::HarvestCrop,
            ActionKind::CastSpell,
        ]
    }
}

/// A single tracked action, already translated from the host's event model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub kind: ActionKind,
    pub player: PlayerId,
    /// When the host observed the action
    pub timestamp_ms: TimestampMs,
    /// Scales passive awards: damage dealt, block hardness, crop maturity.
    /// The host decides the scale; 1.0 means "one nominal unit of work".
    pub magnitude: f64,
    /// Free-form target tag for host-side effect application (entity id,
    /// block position). The engine never interprets it.
    pub target: Option<String>,
}

impl ActionEvent {
    pub fn new(kind: ActionKind, player: PlayerId, timestamp_ms: TimestampMs) -> Self {
        Self {
            kind,
            player,
            timestamp_ms,
            magnitude: 1.0,
            target: None,
        }
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = magnitude;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}
