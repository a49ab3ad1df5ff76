//! Ability cooldowns and the reserve gate
//!
//! One tracker per player, guarded by the player's lock. `try_reserve` is
//! the single gate in front of ability execution: it checks the cooldown,
//! checks the resource pool, and only if both pass does it debit and stamp
//! the cooldown. Failures mutate nothing. Atomicity against concurrent
//! activations by the same player comes from the caller holding the
//! per-player lock across the whole call.

use crate::catalog::ability::{AbilityDefinition, AbilityId};
use crate::cooldown::resources::ResourcePool;
use crate::core::types::{DurationMs, ResourceKind, TimestampMs};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed reservation failure, surfaced to the caller unchanged
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ReserveError {
    #[error("on cooldown for another {remaining_ms}ms")]
    OnCooldown { remaining_ms: DurationMs },

    #[error("insufficient {kind:?}: have {have:.1}, need {need:.1}")]
    InsufficientResource {
        kind: ResourceKind,
        have: f64,
        need: f64,
    },
}

/// Successful reservation: cost committed, cooldown running
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reservation {
    pub ability: AbilityId,
    pub cost: f64,
    pub cooldown_until_ms: TimestampMs,
}

/// Per-player cooldown entries, keyed by ability.
///
/// Entries expire lazily: an expired entry is treated as absent and swept
/// on the next lookup that touches it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooldownTracker {
    entries: AHashMap<AbilityId, TimestampMs>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds until the ability is usable again; zero if ready.
    /// Pure read apart from sweeping an expired entry.
    pub fn remaining(&mut self, ability: AbilityId, now_ms: TimestampMs) -> DurationMs {
        match self.entries.get(&ability) {
            Some(&expiry) if expiry > now_ms => expiry - now_ms,
            Some(_) => {
                self.entries.remove(&ability);
                0
            }
            None => 0,
        }
    }

    pub fn is_ready(&mut self, ability: AbilityId, now_ms: TimestampMs) -> bool {
        self.remaining(ability, now_ms) == 0
    }

    /// Start (or restart) a cooldown
    pub fn stamp(&mut self, ability: AbilityId, now_ms: TimestampMs, duration_ms: DurationMs) {
        self.entries
            .insert(ability, now_ms.saturating_add(duration_ms));
    }

    /// Number of live entries (expired ones may linger until touched)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check cooldown and resources, then commit the reservation.
///
/// Cooldown is checked first, so a broke player hammering an ability on
/// cooldown sees `OnCooldown`, not their wallet. On failure neither the
/// pool nor the tracker changes; in particular no cooldown entry is
/// created for an unaffordable attempt.
pub fn try_reserve(
    cooldowns: &mut CooldownTracker,
    resources: &mut ResourcePool,
    ability: &AbilityDefinition,
    now_ms: TimestampMs,
) -> Result<Reservation, ReserveError> {
    let remaining_ms = cooldowns.remaining(ability.id, now_ms);
    if remaining_ms > 0 {
        return Err(ReserveError::OnCooldown { remaining_ms });
    }

    let cost = ability.cost;
    if !resources.can_afford(cost.kind, cost.amount) {
        return Err(ReserveError::InsufficientResource {
            kind: cost.kind,
            have: resources.available(cost.kind),
            need: cost.amount,
        });
    }

    // Both checks passed; commit debit + cooldown together
    resources.debit(cost.kind, cost.amount);
    cooldowns.stamp(ability.id, now_ms, ability.cooldown_ms);
    Ok(Reservation {
        ability: ability.id,
        cost: cost.amount,
        cooldown_until_ms: now_ms.saturating_add(ability.cooldown_ms),
    })
}
