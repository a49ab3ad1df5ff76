//! Experience awards and level-ups
//!
//! The only code path that mutates progression. Awards cascade through
//! level thresholds one level at a time, carrying leftover experience, so
//! a single large award that crosses several thresholds emits one level-up
//! per crossing and never skips a level.

use crate::catalog::ability::AbilityId;
use crate::catalog::skill::{SkillDefinition, SkillId};
use crate::core::types::{GainReason, PlayerId};
use crate::progression::progress::{PlayerProgression, SkillProgress};
use thiserror::Error;

/// Rejected experience award: amounts must be strictly positive and finite
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid experience award: {amount}")]
pub struct InvalidAward {
    pub amount: f64,
}

/// Events emitted by ledger mutations, for the host to display or relay
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    /// Experience was credited to a skill
    ExperienceGained {
        player: PlayerId,
        skill: SkillId,
        amount: f64,
        reason: GainReason,
        /// State after the award settled
        level: u32,
        experience: f64,
    },
    /// One level crossing; cascading awards emit one of these per level
    LevelUp {
        player: PlayerId,
        skill: SkillId,
        new_level: u32,
        reason: GainReason,
    },
    /// A skill was reset to zero
    SkillReset { player: PlayerId, skill: SkillId },
}

/// Credit experience to a skill and cascade any level-ups.
///
/// Returns the emitted events, level-ups in crossing order followed by the
/// settled `ExperienceGained`. Experience past the level cap is discarded,
/// never stored.
pub fn award_experience(
    progression: &mut PlayerProgression,
    skill: &SkillDefinition,
    amount: f64,
    reason: GainReason,
) -> Result<Vec<ProgressionEvent>, InvalidAward> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(InvalidAward { amount });
    }

    let player = progression.player;
    let slot = progression.skill_mut(skill.id);
    slot.experience += amount;

    let mut events = cascade(player, slot, skill, reason);
    if !events.is_empty() {
        tracing::debug!(
            "{} reached {} level {}",
            player,
            skill.display_name,
            slot.level
        );
    }

    events.push(ProgressionEvent::ExperienceGained {
        player,
        skill: skill.id,
        amount,
        reason,
        level: slot.level,
        experience: slot.experience,
    });
    Ok(events)
}

/// Directly grant whole levels (admin path).
///
/// Carried experience is preserved unless `reset_experience` is set, and
/// the cascade re-runs afterwards so the stored state still satisfies the
/// threshold invariant.
pub fn grant_levels(
    progression: &mut PlayerProgression,
    skill: &SkillDefinition,
    levels: u32,
    reset_experience: bool,
) -> Vec<ProgressionEvent> {
    let player = progression.player;
    let slot = progression.skill_mut(skill.id);

    let mut events = Vec::new();
    for _ in 0..levels {
        if slot.level >= skill.max_level {
            break;
        }
        slot.level += 1;
        events.push(ProgressionEvent::LevelUp {
            player,
            skill: skill.id,
            new_level: slot.level,
            reason: GainReason::Command,
        });
    }
    if reset_experience {
        slot.experience = 0.0;
    }
    events.extend(cascade(player, slot, skill, GainReason::Command));
    events
}

/// Reset a skill to zero and re-enable its toggled-off abilities
pub fn reset_skill(
    progression: &mut PlayerProgression,
    skill: &SkillDefinition,
    skill_abilities: &[AbilityId],
) -> ProgressionEvent {
    let player = progression.player;
    *progression.skill_mut(skill.id) = SkillProgress::default();
    progression.clear_toggles_for(skill_abilities);
    tracing::info!("reset {} for {}", skill.display_name, player);
    ProgressionEvent::SkillReset {
        player,
        skill: skill.id,
    }
}

/// Does stored progress satisfy the threshold invariant under this curve?
pub fn is_consistent(progress: SkillProgress, skill: &SkillDefinition) -> bool {
    if progress.level > skill.max_level || progress.experience < 0.0 {
        return false;
    }
    if progress.level == skill.max_level {
        return progress.experience == 0.0;
    }
    progress.experience < skill.curve.threshold(progress.level)
}

/// Consume thresholds while experience allows, one level per iteration
fn cascade(
    player: PlayerId,
    slot: &mut SkillProgress,
    skill: &SkillDefinition,
    reason: GainReason,
) -> Vec<ProgressionEvent> {
    let mut events = Vec::new();
    while slot.level < skill.max_level {
        let needed = skill.curve.threshold(slot.level);
        if slot.experience < needed {
            break;
        }
        slot.experience -= needed;
        slot.level += 1;
        events.push(ProgressionEvent::LevelUp {
            player,
            skill: skill.id,
            new_level: slot.level,
            reason,
        });
    }
    if slot.level >= skill.max_level {
        // Capped: overflow is discarded, never stored
        slot.experience = 0.0;
    }
    events
}
