//! Built-in skill and ability definitions
//!
//! The static library every engine instance loads by default. Hosts that
//! want a different balance build their own registries and hand them to
//! [`crate::catalog::registry::Catalog::new`].

use crate::bridge::event::ActionKind;
use crate::bridge::exemption::ExemptionCategory;
use crate::catalog::ability::{
    AbilityDefinition, AbilityId, ActivationChance, EffectDescriptor, ExemptionSpec, ResourceCost,
    TriggerSpec,
};
use crate::catalog::skill::{ExperienceCurve, SkillDefinition, SkillId};
use crate::core::types::ResourceKind;

/// Standard progression curve: ~100 xp for the first level, stretching to
/// ~1100 per level near the cap
const STANDARD_CURVE: ExperienceCurve = ExperienceCurve::Polynomial {
    base: 100.0,
    scale: 1.0,
    exponent: 1.5,
};

/// Built-in skills
pub static SKILL_LIBRARY: &[SkillDefinition] = &[
    SkillDefinition {
        id: SkillId::Swords,
        display_name: "Swords",
        max_level: 100,
        curve: STANDARD_CURVE,
    },
    SkillDefinition {
        id: SkillId::Axes,
        display_name: "Axes",
        max_level: 100,
        curve: STANDARD_CURVE,
    },
    SkillDefinition {
        id: SkillId::Archery,
        display_name: "Archery",
        max_level: 100,
        curve: STANDARD_CURVE,
    },
    SkillDefinition {
        id: SkillId::Mining,
        display_name: "Mining",
        max_level: 100,
        curve: STANDARD_CURVE,
    },
    SkillDefinition {
        id: SkillId::Woodcutting,
        display_name: "Woodcutting",
        max_level: 100,
        curve: STANDARD_CURVE,
    },
    SkillDefinition {
        id: SkillId::Excavation,
        display_name: "Excavation",
        max_level: 100,
        curve: STANDARD_CURVE,
    },
    SkillDefinition {
        id: SkillId::Herbalism,
        display_name: "Herbalism",
        max_level: 100,
        curve: ExperienceCurve::Linear {
            base: 80.0,
            per_level: 20.0,
        },
    },
    SkillDefinition {
        id: SkillId::Fitness,
        display_name: "Fitness",
        max_level: 50,
        curve: ExperienceCurve::Linear {
            base: 150.0,
            per_level: 30.0,
        },
    },
    SkillDefinition {
        id: SkillId::Sorcery,
        display_name: "Sorcery",
        max_level: 100,
        curve: ExperienceCurve::Polynomial {
            base: 120.0,
            scale: 2.0,
            exponent: 1.5,
        },
    },
];

/// Built-in abilities
pub static ABILITY_LIBRARY: &[AbilityDefinition] = &[
    AbilityDefinition {
        id: AbilityId::Bleed,
        skill: SkillId::Swords,
        display_name: "Bleed",
        unlock_level: 5,
        cooldown_ms: 3_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 4.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::AttackEntity],
            chance: ActivationChance::PerLevel {
                base_percent: 5.0,
                per_level_percent: 0.25,
                max_percent: 30.0,
            },
        },
        effect: EffectDescriptor::DamageOverTime {
            ticks: 3,
            damage_per_tick: 1.5,
        },
        exemption: None,
    },
    AbilityDefinition {
        id: AbilityId::SerratedStrikes,
        skill: SkillId::Swords,
        display_name: "Serrated Strikes",
        unlock_level: 25,
        cooldown_ms: 120_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 20.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::AttackEntity],
            chance: ActivationChance::Always,
        },
        effect: EffectDescriptor::AreaStrike {
            radius: 2.5,
            damage_scale: 0.25,
        },
        exemption: Some(ExemptionSpec {
            category: ExemptionCategory::FastAttack,
            duration_ms: 5_000,
        }),
    },
    AbilityDefinition {
        id: AbilityId::SkullSplitter,
        skill: SkillId::Axes,
        display_name: "Skull Splitter",
        unlock_level: 25,
        cooldown_ms: 120_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 20.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::AttackEntity],
            chance: ActivationChance::Always,
        },
        effect: EffectDescriptor::AreaStrike {
            radius: 2.0,
            damage_scale: 0.5,
        },
        exemption: Some(ExemptionSpec {
            category: ExemptionCategory::FastAttack,
            duration_ms: 5_000,
        }),
    },
    AbilityDefinition {
        id: AbilityId::Daze,
        skill: SkillId::Archery,
        display_name: "Daze",
        unlock_level: 10,
        cooldown_ms: 10_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 6.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::ShootProjectile],
            chance: ActivationChance::PerLevel {
                base_percent: 5.0,
                per_level_percent: 0.3,
                max_percent: 40.0,
            },
        },
        effect: EffectDescriptor::Stagger { duration_ms: 1_500 },
        exemption: None,
    },
    AbilityDefinition {
        id: AbilityId::SuperBreaker,
        skill: SkillId::Mining,
        display_name: "Super Breaker",
        unlock_level: 20,
        cooldown_ms: 240_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 25.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::MineBlock],
            chance: ActivationChance::Always,
        },
        effect: EffectDescriptor::InstantBreak {
            duration_ms: 10_000,
        },
        exemption: Some(ExemptionSpec {
            category: ExemptionCategory::FastBreak,
            duration_ms: 10_000,
        }),
    },
    AbilityDefinition {
        id: AbilityId::TreeFeller,
        skill: SkillId::Woodcutting,
        display_name: "Tree Feller",
        unlock_level: 20,
        cooldown_ms: 240_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 25.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::ChopLog],
            chance: ActivationChance::Always,
        },
        effect: EffectDescriptor::FellConnected { max_blocks: 64 },
        exemption: Some(ExemptionSpec {
            category: ExemptionCategory::FastBreak,
            duration_ms: 3_000,
        }),
    },
    AbilityDefinition {
        id: AbilityId::GigaDrill,
        skill: SkillId::Excavation,
        display_name: "Giga Drill",
        unlock_level: 20,
        cooldown_ms: 240_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 25.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::DigGround],
            chance: ActivationChance::Always,
        },
        effect: EffectDescriptor::InstantBreak {
            duration_ms: 10_000,
        },
        exemption: Some(ExemptionSpec {
            category: ExemptionCategory::FastBreak,
            duration_ms: 10_000,
        }),
    },
    AbilityDefinition {
        id: AbilityId::GreenThumb,
        skill: SkillId::Herbalism,
        display_name: "Green Thumb",
        unlock_level: 10,
        cooldown_ms: 1_500,
        cost: ResourceCost {
            kind: ResourceKind::Mana,
            amount: 3.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::HarvestCrop],
            chance: ActivationChance::PerLevel {
                base_percent: 10.0,
                per_level_percent: 0.4,
                max_percent: 50.0,
            },
        },
        effect: EffectDescriptor::Replant,
        exemption: Some(ExemptionSpec {
            category: ExemptionCategory::BlockPlace,
            duration_ms: 1_000,
        }),
    },
    AbilityDefinition {
        id: AbilityId::SecondWind,
        skill: SkillId::Fitness,
        display_name: "Second Wind",
        unlock_level: 15,
        cooldown_ms: 60_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 15.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::DamageTaken],
            chance: ActivationChance::PerLevel {
                base_percent: 5.0,
                per_level_percent: 0.5,
                max_percent: 35.0,
            },
        },
        effect: EffectDescriptor::Heal { amount: 4.0 },
        exemption: None,
    },
    AbilityDefinition {
        id: AbilityId::BurstOfSpeed,
        skill: SkillId::Fitness,
        display_name: "Burst of Speed",
        unlock_level: 30,
        cooldown_ms: 90_000,
        cost: ResourceCost {
            kind: ResourceKind::Stamina,
            amount: 18.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::Sprint],
            chance: ActivationChance::Always,
        },
        effect: EffectDescriptor::SpeedBoost {
            multiplier: 1.4,
            duration_ms: 8_000,
        },
        // Window runs slightly past the boost so the monitor never sees the
        // tail end of the accelerated movement
        exemption: Some(ExemptionSpec {
            category: ExemptionCategory::Movement,
            duration_ms: 8_400,
        }),
    },
    AbilityDefinition {
        id: AbilityId::ArcaneBlast,
        skill: SkillId::Sorcery,
        display_name: "Arcane Blast",
        unlock_level: 25,
        cooldown_ms: 30_000,
        cost: ResourceCost {
            kind: ResourceKind::Mana,
            amount: 30.0,
        },
        trigger: TriggerSpec {
            actions: &[ActionKind::CastSpell],
            chance: ActivationChance::Always,
        },
        effect: EffectDescriptor::SpellBurst {
            radius: 4.0,
            damage: 12.0,
        },
        exemption: None,
    },
];

/// Look up a built-in ability definition
pub fn get_ability_definition(id: AbilityId) -> Option<&'static AbilityDefinition> {
    ABILITY_LIBRARY.iter().find(|def| def.id == id)
}

/// Look up a built-in skill definition
pub fn get_skill_definition(id: SkillId) -> Option<&'static SkillDefinition> {
    SKILL_LIBRARY.iter().find(|def| def.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_skill_id_is_defined() {
        for id in SkillId::all() {
            assert!(get_skill_definition(*id).is_some(), "{:?} missing", id);
        }
    }

    #[test]
    fn test_abilities_reference_defined_skills() {
        for ability in ABILITY_LIBRARY {
            assert!(
                get_skill_definition(ability.skill).is_some(),
                "{:?} references undefined {:?}",
                ability.id,
                ability.skill
            );
        }
    }

    #[test]
    fn test_unlock_levels_within_caps() {
        for ability in ABILITY_LIBRARY {
            let skill = get_skill_definition(ability.skill).unwrap();
            assert!(ability.unlock_level <= skill.max_level);
        }
    }

    #[test]
    fn test_costs_are_positive() {
        for ability in ABILITY_LIBRARY {
            assert!(ability.cost.amount > 0.0, "{:?} has no cost", ability.id);
        }
    }
}
