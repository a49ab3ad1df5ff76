//! Ability identifiers and definitions

use crate::bridge::event::ActionKind;
use crate::bridge::exemption::ExemptionCategory;
use crate::catalog::skill::SkillId;
use crate::core::types::{DurationMs, ResourceKind};
use serde::{Deserialize, Serialize};

/// Unique identifier for an active ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    // Swords
    Bleed,
    SerratedStrikes,
    // Axes
    SkullSplitter,
    // Archery
    Daze,
    // Mining
    SuperBreaker,
    // Woodcutting
    TreeFeller,
    // Excavation
    GigaDrill,
    // Herbalism
    GreenThumb,
    // Fitness
    SecondWind,
    BurstOfSpeed,
    // Sorcery
    ArcaneBlast,
}

impl AbilityId {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            AbilityId::Bleed => "Bleed",
            AbilityId::SerratedStrikes => "Serrated Strikes",
            AbilityId::SkullSplitter => "Skull Splitter",
            AbilityId::Daze => "Daze",
            AbilityId::SuperBreaker => "Super Breaker",
            AbilityId::TreeFeller => "Tree Feller",
            AbilityId::GigaDrill => "Giga Drill",
            AbilityId::GreenThumb => "Green Thumb",
            AbilityId::SecondWind => "Second Wind",
            AbilityId::BurstOfSpeed => "Burst of Speed",
            AbilityId::ArcaneBlast => "Arcane Blast",
        }
    }
}

/// Resource debit taken at reservation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub kind: ResourceKind,
    pub amount: f64,
}

/// Chance that a qualifying action actually fires the ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationChance {
    /// Every qualifying action triggers
    Always,
    /// Percentage scaling with skill level, capped
    PerLevel {
        base_percent: f64,
        per_level_percent: f64,
        max_percent: f64,
    },
}

impl ActivationChance {
    /// Effective trigger percentage at a skill level
    pub fn percent_at(&self, level: u32) -> f64 {
        match self {
            ActivationChance::Always => 100.0,
            ActivationChance::PerLevel {
                base_percent,
                per_level_percent,
                max_percent,
            } => (base_percent + per_level_percent * f64::from(level)).min(*max_percent),
        }
    }
}

/// Which actions qualify to trigger an ability, and how often they do
#[derive(Debug, Clone, Copy)]
pub struct TriggerSpec {
    /// Action kinds that can fire this ability
    pub actions: &'static [ActionKind],
    pub chance: ActivationChance,
}

impl TriggerSpec {
    pub fn matches(&self, action: ActionKind) -> bool {
        self.actions.contains(&action)
    }
}

/// What the ability does, interpreted by the host.
///
/// The engine treats these as opaque payloads: it validates, reserves, and
/// hands the descriptor to the host's effect applier. Closed set, no
/// runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectDescriptor {
    /// Damage-over-time on the struck entity
    DamageOverTime { ticks: u32, damage_per_tick: f64 },
    /// Next strikes hit surrounding entities too
    AreaStrike { radius: f64, damage_scale: f64 },
    /// Stun/slow the struck entity
    Stagger { duration_ms: DurationMs },
    /// Blocks of the matching type break instantly for a window
    InstantBreak { duration_ms: DurationMs },
    /// Fell a connected structure in one action
    FellConnected { max_blocks: u32 },
    /// Extra drops from the qualifying action
    BonusDrops { bonus_rolls: u32 },
    /// Replant the harvested crop
    Replant,
    /// Restore health to the player
    Heal { amount: f64 },
    /// Temporary movement speed boost
    SpeedBoost { multiplier: f64, duration_ms: DurationMs },
    /// Burst of area spell damage
    SpellBurst { radius: f64, damage: f64 },
}

/// External-monitor category the effect could trip, and for how long the
/// exemption window must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemptionSpec {
    pub category: ExemptionCategory,
    pub duration_ms: DurationMs,
}

/// Immutable catalog entry for an ability
///
/// Read-only after the catalog load phase. Gates: owning skill level,
/// cooldown, resource cost, trigger predicate.
#[derive(Debug, Clone)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub skill: SkillId,
    pub display_name: &'static str,
    /// Minimum level in the owning skill before the ability unlocks
    pub unlock_level: u32,
    pub cooldown_ms: DurationMs,
    pub cost: ResourceCost,
    pub trigger: TriggerSpec,
    pub effect: EffectDescriptor,
    /// Present when the effect could look like cheating to an external
    /// monitor; scoped to the minimum window the effect needs
    pub exemption: Option<ExemptionSpec>,
}
