//! Ability activation state machine

pub mod activation;
pub mod executor;

pub use activation::{
    AbilityActivation, ActivationError, ActivationPhase, ActivationReceipt,
};
pub use executor::{
    AbilityExecutor, EffectApplier, EffectFuture, EffectRequest, HostEffectError,
    NoopEffectApplier,
};
