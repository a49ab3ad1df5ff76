//! Per-player session state and its concurrency envelope
//!
//! Every live player gets one [`PlayerHandle`]: a mutex-guarded state
//! record plus per-ability activation gates. All mutations of one player's
//! progression, cooldowns, or resources go through that mutex, serializing
//! them; different players hold different mutexes and proceed fully in
//! parallel. The table itself is only locked long enough to clone a handle.

use crate::catalog::ability::AbilityId;
use crate::cooldown::resources::ResourcePool;
use crate::cooldown::tracker::CooldownTracker;
use crate::core::config::ResourceConfig;
use crate::core::types::{PlayerId, ResourceKind};
use crate::progression::progress::PlayerProgression;
use ahash::AHashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Everything the engine tracks for one live player.
///
/// Progression is durable; cooldowns and resources are session state and
/// die with the session (matching how the original stores skill rows but
/// never cooldowns).
#[derive(Debug)]
pub struct PlayerState {
    pub progression: PlayerProgression,
    pub cooldowns: CooldownTracker,
    pub resources: ResourcePool,
}

impl PlayerState {
    /// Fresh session around a loaded (or new) progression record
    pub fn new(progression: PlayerProgression, resources: &ResourceConfig) -> Self {
        let mut pool = ResourcePool::new();
        pool.set_max(ResourceKind::Stamina, resources.stamina_max);
        pool.set_max(ResourceKind::Mana, resources.mana_max);
        Self {
            progression,
            cooldowns: CooldownTracker::new(),
            resources: pool,
        }
    }
}

/// A live player's guarded state plus activation gates
pub struct PlayerHandle {
    pub id: PlayerId,
    state: tokio::sync::Mutex<PlayerState>,
    /// One gate per ability, created on first use. Held start-to-finish
    /// across an activation so a second trigger for the same (player,
    /// ability) waits instead of interleaving. Separate from `state` so
    /// the state lock can be released during the slow host effect call.
    gates: Mutex<AHashMap<AbilityId, Arc<tokio::sync::Mutex<()>>>>,
}

impl PlayerHandle {
    pub fn new(state: PlayerState) -> Self {
        Self {
            id: state.progression.player,
            state: tokio::sync::Mutex::new(state),
            gates: Mutex::new(AHashMap::new()),
        }
    }

    /// Enter the player's critical section
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, PlayerState> {
        self.state.lock().await
    }

    /// The activation gate for one of this player's abilities
    pub fn activation_gate(&self, ability: AbilityId) -> Arc<tokio::sync::Mutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        gates
            .entry(ability)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// All live player sessions
#[derive(Default)]
pub struct PlayerTable {
    inner: RwLock<AHashMap<PlayerId, Arc<PlayerHandle>>>,
}

impl PlayerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Replaces any stale handle for the same player.
    pub fn insert(&self, state: PlayerState) -> Arc<PlayerHandle> {
        let handle = Arc::new(PlayerHandle::new(state));
        let mut table = self.inner.write().unwrap_or_else(|e| e.into_inner());
        table.insert(handle.id, handle.clone());
        handle
    }

    /// Look up a live session
    pub fn get(&self, player: PlayerId) -> Option<Arc<PlayerHandle>> {
        let table = self.inner.read().unwrap_or_else(|e| e.into_inner());
        table.get(&player).cloned()
    }

    /// Drop a session, returning its handle for a final flush
    pub fn remove(&self, player: PlayerId) -> Option<Arc<PlayerHandle>> {
        let mut table = self.inner.write().unwrap_or_else(|e| e.into_inner());
        table.remove(&player)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        let table = self.inner.read().unwrap_or_else(|e| e.into_inner());
        table.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> PlayerState {
        PlayerState::new(
            PlayerProgression::new(PlayerId::new()),
            &ResourceConfig::default(),
        )
    }

    #[test]
    fn test_fresh_session_pools_are_full() {
        let state = sample_state();
        assert_eq!(state.resources.available(ResourceKind::Stamina), 100.0);
        assert_eq!(state.resources.available(ResourceKind::Mana), 100.0);
        assert!(state.cooldowns.is_empty());
    }

    #[test]
    fn test_table_insert_get_remove() {
        let table = PlayerTable::new();
        let handle = table.insert(sample_state());
        let player = handle.id;

        assert!(table.get(player).is_some());
        assert_eq!(table.len(), 1);
        assert!(table.remove(player).is_some());
        assert!(table.get(player).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_gate_is_stable_per_ability() {
        let handle = PlayerHandle::new(sample_state());
        let first = handle.activation_gate(AbilityId::Bleed);
        let again = handle.activation_gate(AbilityId::Bleed);
        let other = handle.activation_gate(AbilityId::Daze);
        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn test_state_lock_serializes() {
        let handle = Arc::new(PlayerHandle::new(sample_state()));
        let guard = handle.lock().await;
        assert!(handle.state.try_lock().is_err());
        drop(guard);
        assert!(handle.state.try_lock().is_ok());
    }
}
