//! Skillforge - Skill & Ability Progression Engine
//!
//! A headless progression core for RPG layers on game servers: tracks
//! per-player skill experience, grants levels, and executes timed,
//! resource-gated abilities that have to coexist with external systems
//! watching the same players (anti-cheat, region protection).
//!
//! The host server owns the world, the entities, and event dispatch; this
//! crate owns the state machine in between:
//!
//! - `catalog`: immutable skill/ability definitions, validated at startup
//! - `progression`: experience ledger, durable records, async persistence
//! - `cooldown`: per-player cooldown timers and resource pools
//! - `executor`: the activation state machine
//! - `bridge`: host-event routing, exemption grants, placeholder reads
//! - `engine`: the facade wiring it all together

pub mod bridge;
pub mod catalog;
pub mod cooldown;
pub mod core;
pub mod engine;
pub mod executor;
pub mod player;
pub mod progression;

pub use crate::core::{
    Clock, EngineError, GainReason, ManualClock, PlayerId, ResourceKind, Result, SystemClock,
};
pub use bridge::{
    ActionEvent, ActionKind, EventBridge, EventMapping, ExemptionCategory, ExemptionGrant,
    ExemptionLedger, ExemptionNotifier, NoopNotifier, Placeholders,
};
pub use catalog::{
    AbilityDefinition, AbilityId, Catalog, CatalogError, EffectDescriptor, ExperienceCurve,
    SkillDefinition, SkillId,
};
pub use cooldown::{CooldownTracker, ResourcePool, ReserveError};
pub use engine::{Engine, EngineEvent};
pub use executor::{
    AbilityActivation, ActivationError, ActivationPhase, ActivationReceipt, EffectApplier,
    EffectFuture, EffectRequest, HostEffectError, NoopEffectApplier,
};
pub use player::{PlayerHandle, PlayerState, PlayerTable};
pub use progression::{
    InvalidAward, JsonFileStore, MemoryStore, PlayerProgression, ProgressionEvent,
    ProgressionStore, SkillProgress, StoreError,
};

/// Engine configuration types
pub use crate::core::config::{EngineConfig, PersistenceConfig, ResourceConfig};
