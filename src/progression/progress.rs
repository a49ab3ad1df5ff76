//! Per-player progression state

use crate::catalog::ability::AbilityId;
use crate::catalog::skill::SkillId;
use crate::core::types::PlayerId;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Level and experience in a single skill.
///
/// Experience is per-level: it resets to the carried remainder on level-up,
/// so it always sits below the current level's threshold. At the level cap
/// it is pinned to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub level: u32,
    pub experience: f64,
}

/// Durable record of a player's skills, experience, and ability toggles.
///
/// Owned by the progression store; mutated only through the ledger. The
/// whole record is persisted as one snapshot so a stored record can never
/// pair a level with experience from a different moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProgression {
    pub player: PlayerId,
    #[serde(default)]
    skills: AHashMap<SkillId, SkillProgress>,
    /// Abilities this player has switched off; they never activate
    #[serde(default)]
    toggled_off: AHashSet<AbilityId>,
}

impl PlayerProgression {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            skills: AHashMap::new(),
            toggled_off: AHashSet::new(),
        }
    }

    /// Progress in a skill; untrained skills read as level 0 with no exp
    pub fn skill(&self, id: SkillId) -> SkillProgress {
        self.skills.get(&id).copied().unwrap_or_default()
    }

    pub fn skill_mut(&mut self, id: SkillId) -> &mut SkillProgress {
        self.skills.entry(id).or_default()
    }

    /// Sum of all skill levels
    pub fn power_level(&self) -> u32 {
        self.skills.values().map(|progress| progress.level).sum()
    }

    pub fn is_toggled_off(&self, ability: AbilityId) -> bool {
        self.toggled_off.contains(&ability)
    }

    /// Switch an ability on or off. Returns true if anything changed.
    pub fn set_toggled_off(&mut self, ability: AbilityId, off: bool) -> bool {
        if off {
            self.toggled_off.insert(ability)
        } else {
            self.toggled_off.remove(&ability)
        }
    }

    /// Re-enable every toggled-off ability belonging to a skill
    pub fn clear_toggles_for(&mut self, abilities: &[AbilityId]) {
        for ability in abilities {
            self.toggled_off.remove(ability);
        }
    }

    pub fn trained_skills(&self) -> impl Iterator<Item = (SkillId, SkillProgress)> + '_ {
        self.skills.iter().map(|(id, progress)| (*id, *progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untrained_skill_reads_zero() {
        let progression = PlayerProgression::new(PlayerId::new());
        assert_eq!(progression.skill(SkillId::Mining), SkillProgress::default());
        assert_eq!(progression.power_level(), 0);
    }

    #[test]
    fn test_power_level_sums_levels() {
        let mut progression = PlayerProgression::new(PlayerId::new());
        progression.skill_mut(SkillId::Mining).level = 12;
        progression.skill_mut(SkillId::Swords).level = 30;
        assert_eq!(progression.power_level(), 42);
    }

    #[test]
    fn test_toggle_roundtrip() {
        let mut progression = PlayerProgression::new(PlayerId::new());
        assert!(!progression.is_toggled_off(AbilityId::Bleed));
        assert!(progression.set_toggled_off(AbilityId::Bleed, true));
        assert!(progression.is_toggled_off(AbilityId::Bleed));
        // Toggling off twice changes nothing
        assert!(!progression.set_toggled_off(AbilityId::Bleed, true));
        assert!(progression.set_toggled_off(AbilityId::Bleed, false));
        assert!(!progression.is_toggled_off(AbilityId::Bleed));
    }

    #[test]
    fn test_serde_roundtrip_preserves_state() {
        let mut progression = PlayerProgression::new(PlayerId::new());
        progression.skill_mut(SkillId::Herbalism).level = 7;
        progression.skill_mut(SkillId::Herbalism).experience = 33.5;
        progression.set_toggled_off(AbilityId::GreenThumb, true);

        let json = serde_json::to_string(&progression).unwrap();
        let restored: PlayerProgression = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.player, progression.player);
        assert_eq!(
            restored.skill(SkillId::Herbalism),
            progression.skill(SkillId::Herbalism)
        );
        assert!(restored.is_toggled_off(AbilityId::GreenThumb));
    }
}
