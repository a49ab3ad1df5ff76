//! The ability state machine driver
//!
//! Coordinates one activation attempt end to end:
//!
//! ```text
//! Idle -> Validating -> Reserved -> Executing -> Completed
//!             |             |           |
//!             +-------------+-----------+--> Rejected
//! ```
//!
//! Locking discipline: validation and reservation happen inside the
//! per-player critical section; the host effect call runs with that lock
//! RELEASED so a slow host cannot stall the player's other actions. What
//! stays held across the whole attempt is the per-(player, ability) gate,
//! which is what makes activations for the same pair strictly sequential
//! while other abilities and players proceed independently.

use crate::bridge::event::ActionEvent;
use crate::bridge::exemption::ExemptionLedger;
use crate::catalog::ability::{AbilityDefinition, ActivationChance, EffectDescriptor};
use crate::catalog::registry::Catalog;
use crate::cooldown::tracker::try_reserve;
use crate::core::types::{Clock, PlayerId};
use crate::executor::activation::{
    AbilityActivation, ActivationError, ActivationReceipt,
};
use crate::player::{PlayerState, PlayerTable};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Opaque host-side effect failure. The engine only cares that it failed;
/// the detail is logged and dropped.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct HostEffectError {
    pub detail: String,
}

impl HostEffectError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Everything the host needs to apply one effect
#[derive(Debug, Clone)]
pub struct EffectRequest {
    pub player: PlayerId,
    pub effect: EffectDescriptor,
    /// The action that triggered the ability, for targeting context
    pub action: ActionEvent,
}

pub type EffectFuture = Pin<Box<dyn Future<Output = Result<(), HostEffectError>> + Send>>;

/// External collaborator that lands effects in the game world.
///
/// May block or be slow; may fail for reasons outside the engine's
/// control (host busy, target invalid). The engine never holds a player
/// lock across this call.
pub trait EffectApplier: Send + Sync {
    fn apply(&self, request: EffectRequest) -> EffectFuture;
}

/// Effect applier that always succeeds without doing anything; useful for
/// tests and dry runs
#[derive(Debug, Default)]
pub struct NoopEffectApplier;

impl EffectApplier for NoopEffectApplier {
    fn apply(&self, _: EffectRequest) -> EffectFuture {
        Box::pin(async { Ok(()) })
    }
}

/// Drives ability activations through the state machine
pub struct AbilityExecutor {
    catalog: Arc<Catalog>,
    players: Arc<PlayerTable>,
    effects: Arc<dyn EffectApplier>,
    exemptions: Arc<ExemptionLedger>,
    clock: Arc<dyn Clock>,
    rng: Mutex<ChaCha8Rng>,
}

impl AbilityExecutor {
    pub fn new(
        catalog: Arc<Catalog>,
        players: Arc<PlayerTable>,
        effects: Arc<dyn EffectApplier>,
        exemptions: Arc<ExemptionLedger>,
        clock: Arc<dyn Clock>,
        rng_seed: Option<u64>,
    ) -> Self {
        let rng = match rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            catalog,
            players,
            effects,
            exemptions,
            clock,
            rng: Mutex::new(rng),
        }
    }

    /// Process one activation attempt start to finish.
    ///
    /// Cancellation note: a session that disappears before reservation is
    /// a plain `SessionGone` rejection with nothing consumed. Once
    /// `try_reserve` commits, cost and cooldown stand whatever happens
    /// afterwards.
    pub async fn activate(
        &self,
        activation: AbilityActivation,
    ) -> Result<ActivationReceipt, ActivationError> {
        let ability = self
            .catalog
            .ability(activation.ability)
            .map_err(|_| ActivationError::UnknownAbility(activation.ability))?;

        let handle = self
            .players
            .get(activation.player)
            .ok_or(ActivationError::SessionGone(activation.player))?;

        // Serialize attempts for this (player, ability) pair
        let gate = handle.activation_gate(ability.id);
        let _gate = gate.lock().await;

        // The session may have ended while we waited on the gate; nothing
        // has been reserved yet, so this is still a free abandonment
        if self.players.get(activation.player).is_none() {
            return Err(ActivationError::SessionGone(activation.player));
        }

        // Validating -> Reserved, inside the player's critical section
        let reservation = {
            let mut state = handle.lock().await;
            self.validate(&state, ability, &activation)?;
            let now_ms = self.clock.now_ms();
            let state = &mut *state;
            try_reserve(&mut state.cooldowns, &mut state.resources, ability, now_ms)?
        };
        tracing::debug!(
            "{} reserved {:?} (cooldown until {}ms)",
            activation.player,
            ability.id,
            reservation.cooldown_until_ms
        );

        // Executing, player lock released
        let request = EffectRequest {
            player: activation.player,
            effect: ability.effect,
            action: activation.action.clone(),
        };
        let effect_result = self.effects.apply(request).await;

        // Finalize. No-refund policy means rejection here has no
        // compensation bookkeeping: the reservation simply stands.
        let now_ms = self.clock.now_ms();
        match effect_result {
            Ok(()) => {
                let exemption = ability.exemption.map(|spec| {
                    self.exemptions
                        .grant(activation.player, spec.category, now_ms, spec.duration_ms)
                });
                tracing::debug!("{} completed {:?}", activation.player, ability.id);
                Ok(ActivationReceipt {
                    player: activation.player,
                    ability: ability.id,
                    completed_at_ms: now_ms,
                    cooldown_until_ms: reservation.cooldown_until_ms,
                    exemption,
                })
            }
            Err(error) => {
                tracing::debug!(
                    "host rejected {:?} for {}: {}; cost stands",
                    ability.id,
                    activation.player,
                    error
                );
                Err(ActivationError::EffectFailed {
                    ability: ability.id,
                })
            }
        }
    }

    /// Eligibility checks: toggle, unlock level, trigger predicate
    fn validate(
        &self,
        state: &PlayerState,
        ability: &AbilityDefinition,
        activation: &AbilityActivation,
    ) -> Result<(), ActivationError> {
        if state.progression.is_toggled_off(ability.id) {
            return Err(ActivationError::ToggledOff {
                ability: ability.id,
            });
        }

        let progress = state.progression.skill(ability.skill);
        if progress.level < ability.unlock_level {
            return Err(ActivationError::SkillTooLow {
                ability: ability.id,
                skill: ability.skill,
                required: ability.unlock_level,
                actual: progress.level,
            });
        }

        if !ability.trigger.matches(activation.action.kind) {
            return Err(ActivationError::TriggerMismatch {
                ability: ability.id,
                action: activation.action.kind,
            });
        }

        if let ActivationChance::PerLevel { .. } = ability.trigger.chance {
            let percent = ability.trigger.chance.percent_at(progress.level);
            let roll: f64 = {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                rng.gen_range(0.0..100.0)
            };
            if roll >= percent {
                return Err(ActivationError::ChanceNotMet {
                    ability: ability.id,
                });
            }
        }

        Ok(())
    }
}
