//! Immutable skill and ability catalog
//!
//! Definitions are registered once at startup, validated as a whole, and
//! read-only afterwards. Lookups fail loudly instead of returning stale or
//! partial data.

pub mod ability;
pub mod definitions;
pub mod registry;
pub mod skill;

pub use ability::{
    AbilityDefinition, AbilityId, ActivationChance, EffectDescriptor, ExemptionSpec, ResourceCost,
    TriggerSpec,
};
pub use definitions::{ABILITY_LIBRARY, SKILL_LIBRARY};
pub use registry::{AbilityRegistry, Catalog, CatalogError, SkillRegistry};
pub use skill::{ExperienceCurve, SkillDefinition, SkillId};
