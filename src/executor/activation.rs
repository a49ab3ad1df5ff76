//! Activation requests, outcomes, and the rejection taxonomy

use crate::bridge::event::{ActionEvent, ActionKind};
use crate::bridge::exemption::ExemptionGrant;
use crate::catalog::ability::AbilityId;
use crate::catalog::skill::SkillId;
use crate::cooldown::tracker::ReserveError;
use crate::core::types::{PlayerId, TimestampMs};
use thiserror::Error;

/// The transient request record flowing through the executor.
///
/// Exists for the duration of one activation attempt; never persisted.
#[derive(Debug, Clone)]
pub struct AbilityActivation {
    pub player: PlayerId,
    pub ability: AbilityId,
    /// The action that triggered this attempt
    pub action: ActionEvent,
}

impl AbilityActivation {
    pub fn new(player: PlayerId, ability: AbilityId, action: ActionEvent) -> Self {
        Self {
            player,
            ability,
            action,
        }
    }
}

/// Phases an activation moves through.
///
/// `Completed` and `Rejected` are terminal. Rejection is possible from
/// `Validating` (ineligible), `Reserved` (tracker refusal), and
/// `Executing` (host refusal, costs stand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationPhase {
    Idle,
    Validating,
    Reserved,
    Executing,
    Completed,
    Rejected,
}

/// Why an activation was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActivationError {
    /// The player's session ended before the attempt reserved anything
    #[error("no live session for {0}")]
    SessionGone(PlayerId),

    #[error("unknown ability {0:?}")]
    UnknownAbility(AbilityId),

    #[error("{ability:?} is toggled off")]
    ToggledOff { ability: AbilityId },

    #[error("{ability:?} requires {skill:?} level {required}, player has {actual}")]
    SkillTooLow {
        ability: AbilityId,
        skill: SkillId,
        required: u32,
        actual: u32,
    },

    #[error("{action:?} does not trigger {ability:?}")]
    TriggerMismatch {
        ability: AbilityId,
        action: ActionKind,
    },

    /// The qualifying action rolled under the ability's activation chance
    #[error("activation chance not met for {ability:?}")]
    ChanceNotMet { ability: AbilityId },

    /// Tracker refusal, surfaced unchanged
    #[error(transparent)]
    Reserve(#[from] ReserveError),

    /// The host rejected the effect. The reservation is NOT refunded:
    /// cost and cooldown were committed at reservation time.
    #[error("host rejected effect for {ability:?}")]
    EffectFailed { ability: AbilityId },
}

impl ActivationError {
    /// Which phase this rejection came from
    pub fn rejected_in(&self) -> ActivationPhase {
        match self {
            ActivationError::SessionGone(_)
            | ActivationError::UnknownAbility(_)
            | ActivationError::ToggledOff { .. }
            | ActivationError::SkillTooLow { .. }
            | ActivationError::TriggerMismatch { .. }
            | ActivationError::ChanceNotMet { .. } => ActivationPhase::Validating,
            ActivationError::Reserve(_) => ActivationPhase::Reserved,
            ActivationError::EffectFailed { .. } => ActivationPhase::Executing,
        }
    }

    /// Did this rejection consume the player's cost and cooldown?
    pub fn cost_committed(&self) -> bool {
        matches!(self, ActivationError::EffectFailed { .. })
    }
}

/// A completed activation
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationReceipt {
    pub player: PlayerId,
    pub ability: AbilityId,
    pub completed_at_ms: TimestampMs,
    /// When the ability comes off cooldown
    pub cooldown_until_ms: TimestampMs,
    /// Exemption window granted toward external monitors, if any
    pub exemption: Option<ExemptionGrant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_phases() {
        let err = ActivationError::ToggledOff {
            ability: AbilityId::Bleed,
        };
        assert_eq!(err.rejected_in(), ActivationPhase::Validating);
        assert!(!err.cost_committed());

        let err = ActivationError::Reserve(ReserveError::OnCooldown { remaining_ms: 10 });
        assert_eq!(err.rejected_in(), ActivationPhase::Reserved);
        assert!(!err.cost_committed());

        let err = ActivationError::EffectFailed {
            ability: AbilityId::Bleed,
        };
        assert_eq!(err.rejected_in(), ActivationPhase::Executing);
        assert!(err.cost_committed());
    }
}
