//! Engine facade wiring the components together
//!
//! The host owns threads and event dispatch; it calls into this facade
//! from its own execution context. Per-player state is guarded by one
//! mutex per player, so calls for different players run fully in
//! parallel while calls for the same player serialize.

use crate::bridge::event::ActionEvent;
use crate::bridge::exemption::{ExemptionCategory, ExemptionLedger, ExemptionNotifier};
use crate::bridge::placeholders::Placeholders;
use crate::bridge::EventBridge;
use crate::catalog::ability::AbilityId;
use crate::catalog::registry::Catalog;
use crate::catalog::skill::SkillId;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Clock, DurationMs, GainReason, PlayerId, ResourceKind, SystemClock};
use crate::executor::activation::{AbilityActivation, ActivationError, ActivationReceipt};
use crate::executor::executor::{AbilityExecutor, EffectApplier};
use crate::player::{PlayerState, PlayerTable};
use crate::progression::ledger;
use crate::progression::progress::PlayerProgression;
use crate::progression::store::{SharedStore, StoreError};
use crate::progression::worker::{PersistenceQueue, PersistenceWorker};
use crate::progression::ProgressionEvent;
use std::sync::Arc;
use std::time::Duration;

/// Everything one handled event produced, for the host to display or relay
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Progression(ProgressionEvent),
    AbilityCompleted(ActivationReceipt),
    AbilityRejected {
        player: PlayerId,
        ability: AbilityId,
        error: ActivationError,
    },
}

/// The progression/ability engine core
pub struct Engine {
    config: EngineConfig,
    catalog: Arc<Catalog>,
    players: Arc<PlayerTable>,
    store: SharedStore,
    worker: PersistenceWorker,
    queue: PersistenceQueue,
    executor: AbilityExecutor,
    bridge: EventBridge,
    exemptions: Arc<ExemptionLedger>,
    clock: Arc<dyn Clock>,
}

impl Engine {
    /// Build an engine around the built-in catalog and the wall clock.
    ///
    /// Must be called within a tokio runtime; the persistence worker is
    /// spawned here. Catalog problems are fatal: a misconfigured
    /// definition set refuses to start rather than run corrupt.
    pub fn new(
        config: EngineConfig,
        store: SharedStore,
        effects: Arc<dyn EffectApplier>,
        notifier: Arc<dyn ExemptionNotifier>,
    ) -> Result<Self> {
        let catalog = Catalog::builtin()?;
        Self::with_parts(config, catalog, store, effects, notifier, Arc::new(SystemClock))
    }

    /// Build an engine from explicit parts (custom catalog, test clock)
    pub fn with_parts(
        config: EngineConfig,
        catalog: Catalog,
        store: SharedStore,
        effects: Arc<dyn EffectApplier>,
        notifier: Arc<dyn ExemptionNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let catalog = Arc::new(catalog);
        let players = Arc::new(PlayerTable::new());
        let exemptions = Arc::new(ExemptionLedger::new(notifier));
        let worker = PersistenceWorker::spawn(store.clone(), config.persistence.clone());
        let queue = worker.queue();
        let executor = AbilityExecutor::new(
            catalog.clone(),
            players.clone(),
            effects,
            exemptions.clone(),
            clock.clone(),
            config.rng_seed,
        );
        let bridge = EventBridge::new(config.mapping.clone(), exemptions.clone());
        tracing::info!(
            "engine ready: {} skills, {} abilities",
            catalog.skills().len(),
            catalog.abilities().len()
        );
        Ok(Self {
            config,
            catalog,
            players,
            store,
            worker,
            queue,
            executor,
            bridge,
            exemptions,
            clock,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only accessor handle for placeholder/text integrations
    pub fn placeholders(&self) -> Placeholders {
        Placeholders::new(self.players.clone(), self.catalog.clone())
    }

    /// Is the player currently exempt from an external check category?
    pub fn is_exempt(&self, player: PlayerId, category: ExemptionCategory) -> bool {
        self.exemptions
            .is_exempt(player, category, self.clock.now_ms())
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.players.len()
    }

    /// Start a session: load the player's record (with retries) and seed
    /// fresh session pools
    pub async fn player_join(&self, player: PlayerId) -> Result<()> {
        let progression = self
            .load_with_retries(player)
            .await?
            .unwrap_or_else(|| PlayerProgression::new(player));
        self.players
            .insert(PlayerState::new(progression, &self.config.resources));
        tracing::info!("session started for {}", player);
        Ok(())
    }

    /// End a session, queueing a final snapshot
    pub async fn player_quit(&self, player: PlayerId) -> Result<()> {
        let handle = self
            .players
            .remove(player)
            .ok_or(EngineError::UnknownPlayer(player))?;
        let state = handle.lock().await;
        self.queue.queue_save(state.progression.clone());
        self.exemptions.clear_player(player);
        tracing::info!("session ended for {}", player);
        Ok(())
    }

    /// Route one host event through the bridge: passive awards first, then
    /// ability attempts. Returns everything that happened.
    pub async fn handle_event(&self, event: ActionEvent) -> Result<Vec<EngineEvent>> {
        let plan = self.bridge.plan(&event);
        let mut out = Vec::new();

        for route in &plan.awards {
            let amount = route.base_xp * event.magnitude;
            if !amount.is_finite() || amount <= 0.0 {
                tracing::debug!(
                    "skipping degenerate award {} for {:?}",
                    amount,
                    route.action
                );
                continue;
            }
            let events = self
                .award_experience(event.player, route.skill, amount, GainReason::Action)
                .await?;
            out.extend(events.into_iter().map(EngineEvent::Progression));
        }

        for route in &plan.attempts {
            let activation =
                AbilityActivation::new(event.player, route.ability, event.clone());
            match self.executor.activate(activation).await {
                Ok(receipt) => out.push(EngineEvent::AbilityCompleted(receipt)),
                Err(error) => out.push(EngineEvent::AbilityRejected {
                    player: event.player,
                    ability: route.ability,
                    error,
                }),
            }
        }

        Ok(out)
    }

    /// Credit experience to a skill and persist the result
    pub async fn award_experience(
        &self,
        player: PlayerId,
        skill: SkillId,
        amount: f64,
        reason: GainReason,
    ) -> Result<Vec<ProgressionEvent>> {
        let definition = self.catalog.skill(skill)?;
        let handle = self
            .players
            .get(player)
            .ok_or(EngineError::UnknownPlayer(player))?;

        let mut state = handle.lock().await;
        let events = ledger::award_experience(&mut state.progression, definition, amount, reason)?;
        self.queue.queue_save(state.progression.clone());
        Ok(events)
    }

    /// Attempt one ability activation directly (bypassing the mapping)
    pub async fn activate_ability(
        &self,
        player: PlayerId,
        ability: AbilityId,
        action: ActionEvent,
    ) -> std::result::Result<ActivationReceipt, ActivationError> {
        self.executor
            .activate(AbilityActivation::new(player, ability, action))
            .await
    }

    /// Admin: grant whole levels
    pub async fn grant_levels(
        &self,
        player: PlayerId,
        skill: SkillId,
        levels: u32,
        reset_experience: bool,
    ) -> Result<Vec<ProgressionEvent>> {
        let definition = self.catalog.skill(skill)?;
        let handle = self
            .players
            .get(player)
            .ok_or(EngineError::UnknownPlayer(player))?;

        let mut state = handle.lock().await;
        let events =
            ledger::grant_levels(&mut state.progression, definition, levels, reset_experience);
        self.queue.queue_save(state.progression.clone());
        Ok(events)
    }

    /// Admin: reset a skill to zero and re-enable its abilities
    pub async fn reset_skill(&self, player: PlayerId, skill: SkillId) -> Result<ProgressionEvent> {
        let definition = self.catalog.skill(skill)?;
        let abilities = self.catalog.abilities().for_skill(skill).to_vec();
        let handle = self
            .players
            .get(player)
            .ok_or(EngineError::UnknownPlayer(player))?;

        let mut state = handle.lock().await;
        let event = ledger::reset_skill(&mut state.progression, definition, &abilities);
        self.queue.queue_save(state.progression.clone());
        Ok(event)
    }

    /// Toggle an ability off (or back on) for a player
    pub async fn set_ability_toggled_off(
        &self,
        player: PlayerId,
        ability: AbilityId,
        off: bool,
    ) -> Result<()> {
        // Validate against the catalog before touching player state
        self.catalog.ability(ability)?;
        let handle = self
            .players
            .get(player)
            .ok_or(EngineError::UnknownPlayer(player))?;

        let mut state = handle.lock().await;
        if state.progression.set_toggled_off(ability, off) {
            self.queue.queue_save(state.progression.clone());
        }
        Ok(())
    }

    /// Milliseconds until an ability is usable again; zero if ready
    pub async fn remaining_cooldown(
        &self,
        player: PlayerId,
        ability: AbilityId,
    ) -> Result<DurationMs> {
        let handle = self
            .players
            .get(player)
            .ok_or(EngineError::UnknownPlayer(player))?;
        let mut state = handle.lock().await;
        let now_ms = self.clock.now_ms();
        Ok(state.cooldowns.remaining(ability, now_ms))
    }

    /// Restore spent resources (host regen hook)
    pub async fn credit_resource(
        &self,
        player: PlayerId,
        kind: ResourceKind,
        amount: f64,
    ) -> Result<()> {
        let handle = self
            .players
            .get(player)
            .ok_or(EngineError::UnknownPlayer(player))?;
        let mut state = handle.lock().await;
        state.resources.credit(kind, amount);
        Ok(())
    }

    /// Wait until every queued snapshot has reached the store
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    /// Flush all live sessions and stop the persistence worker
    pub async fn shutdown(self) {
        for player in self.players.player_ids() {
            if let Some(handle) = self.players.remove(player) {
                let state = handle.lock().await;
                self.queue.queue_save(state.progression.clone());
            }
        }
        self.worker.shutdown().await;
        tracing::info!("engine shut down");
    }

    async fn load_with_retries(
        &self,
        player: PlayerId,
    ) -> Result<Option<PlayerProgression>> {
        let config = &self.config.persistence;
        let mut backoff = config.initial_backoff_ms;
        let mut attempt = 1u32;
        loop {
            let store = self.store.clone();
            let result = tokio::task::spawn_blocking(move || store.load(player)).await;
            let error = match result {
                Ok(Ok(record)) => return Ok(record),
                Ok(Err(error)) => error,
                Err(join_error) => StoreError::Unavailable(join_error.to_string()),
            };
            if attempt >= config.max_attempts {
                tracing::warn!("could not load progression for {}: {}", player, error);
                return Err(error.into());
            }
            tokio::time::sleep(Duration::from_millis(backoff)).await;
            backoff = backoff.saturating_mul(2).min(config.max_backoff_ms);
            attempt += 1;
        }
    }
}
