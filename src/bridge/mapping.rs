//! Routing from host actions to engine reactions
//!
//! The mapping is data, not code: hosts override it from TOML to rebalance
//! passive experience or move abilities between triggers without touching
//! the engine. The default covers the built-in catalog.

use crate::bridge::event::ActionKind;
use crate::catalog::ability::AbilityId;
use crate::catalog::skill::SkillId;
use serde::{Deserialize, Serialize};

/// A passive experience award for a tracked action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassiveRoute {
    pub action: ActionKind,
    pub skill: SkillId,
    /// Base award, scaled by the event's magnitude
    pub base_xp: f64,
}

/// An ability activation attempt for a tracked action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveRoute {
    pub action: ActionKind,
    pub ability: AbilityId,
}

/// The full action routing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventMapping {
    pub passive: Vec<PassiveRoute>,
    pub active: Vec<ActiveRoute>,
}

impl EventMapping {
    /// Parse a mapping from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Passive awards for an action kind
    pub fn passive_routes(&self, kind: ActionKind) -> impl Iterator<Item = &PassiveRoute> {
        self.passive.iter().filter(move |route| route.action == kind)
    }

    /// Ability attempts for an action kind
    pub fn active_routes(&self, kind: ActionKind) -> impl Iterator<Item = &ActiveRoute> {
        self.active.iter().filter(move |route| route.action == kind)
    }
}

impl Default for EventMapping {
    fn default() -> Self {
        Self {
            passive: vec![
                PassiveRoute {
                    action: ActionKind::AttackEntity,
                    skill: SkillId::Swords,
                    base_xp: 12.0,
                },
                PassiveRoute {
                    action: ActionKind::ShootProjectile,
                    skill: SkillId::Archery,
                    base_xp: 10.0,
                },
                PassiveRoute {
                    action: ActionKind::DamageTaken,
                    skill: SkillId::Fitness,
                    base_xp: 4.0,
                },
                PassiveRoute {
                    action: ActionKind::MineBlock,
                    skill: SkillId::Mining,
                    base_xp: 8.0,
                },
                PassiveRoute {
                    action: ActionKind::ChopLog,
                    skill: SkillId::Woodcutting,
                    base_xp: 8.0,
                },
                PassiveRoute {
                    action: ActionKind::DigGround,
                    skill: SkillId::Excavation,
                    base_xp: 6.0,
                },
                PassiveRoute {
                    action: ActionKind::HarvestCrop,
                    skill: SkillId::Herbalism,
                    base_xp: 7.0,
                },
                PassiveRoute {
                    action: ActionKind::CastSpell,
                    skill: SkillId::Sorcery,
                    base_xp: 9.0,
                },
            ],
            active: vec![
                ActiveRoute {
                    action: ActionKind::AttackEntity,
                    ability: AbilityId::Bleed,
                },
                ActiveRoute {
                    action: ActionKind::AttackEntity,
                    ability: AbilityId::SerratedStrikes,
                },
                ActiveRoute {
                    action: ActionKind::AttackEntity,
                    ability: AbilityId::SkullSplitter,
                },
                ActiveRoute {
                    action: ActionKind::ShootProjectile,
                    ability: AbilityId::Daze,
                },
                ActiveRoute {
                    action: ActionKind::MineBlock,
                    ability: AbilityId::SuperBreaker,
                },
                ActiveRoute {
                    action: ActionKind::ChopLog,
                    ability: AbilityId::TreeFeller,
                },
                ActiveRoute {
                    action: ActionKind::DigGround,
                    ability: AbilityId::GigaDrill,
                },
                ActiveRoute {
                    action: ActionKind::HarvestCrop,
                    ability: AbilityId::GreenThumb,
                },
                ActiveRoute {
                    action: ActionKind::DamageTaken,
                    ability: AbilityId::SecondWind,
                },
                ActiveRoute {
                    action: ActionKind::Sprint,
                    ability: AbilityId::BurstOfSpeed,
                },
                ActiveRoute {
                    action: ActionKind::CastSpell,
                    ability: AbilityId::ArcaneBlast,
                },
            ],
        }
    }
}
