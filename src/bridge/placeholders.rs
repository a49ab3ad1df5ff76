//! Read-only data exposure for text/placeholder integrations
//!
//! Everything here is a pure read of live session state; there is no
//! mutation path through this surface.

use crate::catalog::registry::Catalog;
use crate::catalog::skill::SkillId;
use crate::core::types::PlayerId;
use crate::player::PlayerTable;
use std::sync::Arc;

/// Accessor handle the host wires into its placeholder/text system
#[derive(Clone)]
pub struct Placeholders {
    players: Arc<PlayerTable>,
    catalog: Arc<Catalog>,
}

impl Placeholders {
    pub fn new(players: Arc<PlayerTable>, catalog: Arc<Catalog>) -> Self {
        Self { players, catalog }
    }

    /// Current level in a skill; `None` when the player has no session
    pub async fn current_level(&self, player: PlayerId, skill: SkillId) -> Option<u32> {
        let handle = self.players.get(player)?;
        let state = handle.lock().await;
        Some(state.progression.skill(skill).level)
    }

    /// Current experience within the level
    pub async fn current_experience(&self, player: PlayerId, skill: SkillId) -> Option<f64> {
        let handle = self.players.get(player)?;
        let state = handle.lock().await;
        Some(state.progression.skill(skill).experience)
    }

    /// Experience still needed to reach the next level; zero at the cap
    pub async fn experience_to_next_level(
        &self,
        player: PlayerId,
        skill: SkillId,
    ) -> Option<f64> {
        let definition = self.catalog.skill(skill).ok()?;
        let handle = self.players.get(player)?;
        let state = handle.lock().await;
        let progress = state.progression.skill(skill);
        if progress.level >= definition.max_level {
            return Some(0.0);
        }
        Some((definition.curve.threshold(progress.level) - progress.experience).max(0.0))
    }

    /// Sum of all the player's skill levels
    pub async fn power_level(&self, player: PlayerId) -> Option<u32> {
        let handle = self.players.get(player)?;
        let state = handle.lock().await;
        Some(state.progression.power_level())
    }
}
