//! Definition registries with a lookup-or-fail contract
//!
//! Registration happens during startup only. A sealed [`Catalog`] is shared
//! immutably for the life of the process; any inconsistency found while
//! loading is fatal rather than running with a corrupt definition set.

use crate::catalog::ability::{AbilityDefinition, AbilityId};
use crate::catalog::definitions::{ABILITY_LIBRARY, SKILL_LIBRARY};
use crate::catalog::skill::{SkillDefinition, SkillId};
use ahash::AHashMap;
use thiserror::Error;

/// Catalog misconfiguration, fatal at load time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate skill definition: {0:?}")]
    DuplicateSkill(SkillId),

    #[error("duplicate ability definition: {0:?}")]
    DuplicateAbility(AbilityId),

    #[error("unknown skill: {0:?}")]
    UnknownSkill(SkillId),

    #[error("unknown ability: {0:?}")]
    UnknownAbility(AbilityId),

    #[error("ability {ability:?} unlocks at level {unlock_level} but {skill:?} caps at {max_level}")]
    UnlockAboveCap {
        ability: AbilityId,
        skill: SkillId,
        unlock_level: u32,
        max_level: u32,
    },

    #[error("skill {skill:?} has a non-positive threshold at level {level}")]
    DegenerateCurve { skill: SkillId, level: u32 },
}

/// Registry of skill definitions
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: AHashMap<SkillId, SkillDefinition>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill definition. Startup only.
    pub fn register(&mut self, definition: SkillDefinition) -> Result<(), CatalogError> {
        if self.skills.contains_key(&definition.id) {
            return Err(CatalogError::DuplicateSkill(definition.id));
        }
        self.skills.insert(definition.id, definition);
        Ok(())
    }

    /// Look up a skill definition, failing if absent
    pub fn get(&self, id: SkillId) -> Result<&SkillDefinition, CatalogError> {
        self.skills.get(&id).ok_or(CatalogError::UnknownSkill(id))
    }

    pub fn contains(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }
}

/// Registry of ability definitions
#[derive(Debug, Clone, Default)]
pub struct AbilityRegistry {
    abilities: AHashMap<AbilityId, AbilityDefinition>,
    by_skill: AHashMap<SkillId, Vec<AbilityId>>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ability definition. Startup only.
    pub fn register(&mut self, definition: AbilityDefinition) -> Result<(), CatalogError> {
        if self.abilities.contains_key(&definition.id) {
            return Err(CatalogError::DuplicateAbility(definition.id));
        }
        self.by_skill
            .entry(definition.skill)
            .or_default()
            .push(definition.id);
        self.abilities.insert(definition.id, definition);
        Ok(())
    }

    /// Look up an ability definition, failing if absent
    pub fn get(&self, id: AbilityId) -> Result<&AbilityDefinition, CatalogError> {
        self.abilities
            .get(&id)
            .ok_or(CatalogError::UnknownAbility(id))
    }

    pub fn contains(&self, id: AbilityId) -> bool {
        self.abilities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values()
    }

    /// Abilities owned by a skill, in registration order
    pub fn for_skill(&self, skill: SkillId) -> &[AbilityId] {
        self.by_skill.get(&skill).map_or(&[], Vec::as_slice)
    }
}

/// Sealed pair of registries, validated as a whole
#[derive(Debug, Clone)]
pub struct Catalog {
    skills: SkillRegistry,
    abilities: AbilityRegistry,
}

impl Catalog {
    /// Build and validate a catalog from explicit registries
    pub fn new(skills: SkillRegistry, abilities: AbilityRegistry) -> Result<Self, CatalogError> {
        let catalog = Self { skills, abilities };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build the built-in catalog from the static definition library
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut skills = SkillRegistry::new();
        for definition in SKILL_LIBRARY {
            skills.register(definition.clone())?;
        }
        let mut abilities = AbilityRegistry::new();
        for definition in ABILITY_LIBRARY {
            abilities.register(definition.clone())?;
        }
        Self::new(skills, abilities)
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    pub fn abilities(&self) -> &AbilityRegistry {
        &self.abilities
    }

    pub fn skill(&self, id: SkillId) -> Result<&SkillDefinition, CatalogError> {
        self.skills.get(id)
    }

    pub fn ability(&self, id: AbilityId) -> Result<&AbilityDefinition, CatalogError> {
        self.abilities.get(id)
    }

    /// Cross-checks: every ability references a known skill, unlocks within
    /// the skill's cap, and every curve yields positive thresholds.
    fn validate(&self) -> Result<(), CatalogError> {
        for skill in self.skills.iter() {
            for level in 0..skill.max_level {
                if skill.curve.threshold(level) <= 0.0 {
                    return Err(CatalogError::DegenerateCurve {
                        skill: skill.id,
                        level,
                    });
                }
            }
        }
        for ability in self.abilities.iter() {
            let skill = self.skills.get(ability.skill)?;
            if ability.unlock_level > skill.max_level {
                return Err(CatalogError::UnlockAboveCap {
                    ability: ability.id,
                    skill: skill.id,
                    unlock_level: ability.unlock_level,
                    max_level: skill.max_level,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ability::{
        ActivationChance, EffectDescriptor, ResourceCost, TriggerSpec,
    };
    use crate::catalog::skill::ExperienceCurve;
    use crate::core::types::ResourceKind;

    fn sample_skill() -> SkillDefinition {
        SkillDefinition {
            id: SkillId::Swords,
            display_name: "Swords",
            max_level: 50,
            curve: ExperienceCurve::Linear {
                base: 100.0,
                per_level: 10.0,
            },
        }
    }

    fn sample_ability(unlock_level: u32) -> AbilityDefinition {
        AbilityDefinition {
            id: AbilityId::Bleed,
            skill: SkillId::Swords,
            display_name: "Bleed",
            unlock_level,
            cooldown_ms: 1_000,
            cost: ResourceCost {
                kind: ResourceKind::Stamina,
                amount: 5.0,
            },
            trigger: TriggerSpec {
                actions: &[crate::bridge::event::ActionKind::AttackEntity],
                chance: ActivationChance::Always,
            },
            effect: EffectDescriptor::DamageOverTime {
                ticks: 3,
                damage_per_tick: 1.0,
            },
            exemption: None,
        }
    }

    #[test]
    fn test_duplicate_skill_rejected() {
        let mut registry = SkillRegistry::new();
        registry.register(sample_skill()).unwrap();
        assert_eq!(
            registry.register(sample_skill()),
            Err(CatalogError::DuplicateSkill(SkillId::Swords))
        );
    }

    #[test]
    fn test_duplicate_ability_rejected() {
        let mut registry = AbilityRegistry::new();
        registry.register(sample_ability(5)).unwrap();
        assert_eq!(
            registry.register(sample_ability(5)),
            Err(CatalogError::DuplicateAbility(AbilityId::Bleed))
        );
    }

    #[test]
    fn test_lookup_or_fail() {
        let registry = AbilityRegistry::new();
        assert_eq!(
            registry.get(AbilityId::Bleed).unwrap_err(),
            CatalogError::UnknownAbility(AbilityId::Bleed)
        );
    }

    #[test]
    fn test_ability_with_unknown_skill_fails_load() {
        let skills = SkillRegistry::new();
        let mut abilities = AbilityRegistry::new();
        abilities.register(sample_ability(5)).unwrap();
        assert_eq!(
            Catalog::new(skills, abilities).unwrap_err(),
            CatalogError::UnknownSkill(SkillId::Swords)
        );
    }

    #[test]
    fn test_unlock_above_cap_fails_load() {
        let mut skills = SkillRegistry::new();
        skills.register(sample_skill()).unwrap();
        let mut abilities = AbilityRegistry::new();
        abilities.register(sample_ability(51)).unwrap();
        assert!(matches!(
            Catalog::new(skills, abilities).unwrap_err(),
            CatalogError::UnlockAboveCap { .. }
        ));
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.skills().is_empty());
        assert!(!catalog.abilities().is_empty());
        // Every skill with abilities indexes them
        for ability in catalog.abilities().iter() {
            assert!(catalog
                .abilities()
                .for_skill(ability.skill)
                .contains(&ability.id));
        }
    }
}
