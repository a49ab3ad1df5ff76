//! Crate-level error type aggregating the typed component errors
//!
//! Component errors stay typed on their own APIs (the executor surfaces
//! tracker failures unchanged, the ledger rejects bad awards); this enum
//! exists for facade entry points that can hit more than one concern.

use crate::catalog::registry::CatalogError;
use crate::core::types::PlayerId;
use crate::executor::activation::ActivationError;
use crate::progression::ledger::InvalidAward;
use crate::progression::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Catalog misconfiguration. Fatal at load time; the engine must not
    /// start with a corrupt definition set.
    #[error("catalog integrity: {0}")]
    Integrity(#[from] CatalogError),

    /// The player has no live session in the engine
    #[error("no session for player {0}")]
    UnknownPlayer(PlayerId),

    #[error(transparent)]
    InvalidAward(#[from] InvalidAward),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error("persistence: {0}")]
    Store(#[from] StoreError),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
