//! Engine configuration with documented defaults
//!
//! Everything tunable lives here so a host can load one TOML file and get
//! a fully configured engine. Defaults are safe for production use.

use crate::bridge::mapping::EventMapping;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Persistence retry/backoff tuning
    pub persistence: PersistenceConfig,

    /// Starting resource pools for a fresh session
    pub resources: ResourceConfig,

    /// Seed for the ability-trigger RNG.
    ///
    /// When unset the RNG is seeded from OS entropy. Set it to make
    /// chance-gated ability activation reproducible.
    pub rng_seed: Option<u64>,

    /// Routing from host actions to passive awards and active triggers
    pub mapping: EventMapping,
}

impl EngineConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Tuning for the asynchronous progression writer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Save attempts before the store is declared degraded
    ///
    /// Each failed attempt doubles the backoff, starting from
    /// `initial_backoff_ms` and capped at `max_backoff_ms`.
    pub max_attempts: u32,

    /// Backoff after the first failed save attempt (milliseconds)
    pub initial_backoff_ms: u64,

    /// Upper bound on a single backoff sleep (milliseconds)
    pub max_backoff_ms: u64,

    /// How long to wait before re-trying a degraded store (milliseconds)
    ///
    /// While degraded, dirty records are kept in memory and re-offered to
    /// the store at this interval. Nothing is dropped.
    pub recovery_interval_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff_ms: 100,
            max_backoff_ms: 5_000,
            recovery_interval_ms: 10_000,
        }
    }
}

/// Starting resource pools for a fresh player session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Stamina pool cap (also the starting value)
    pub stamina_max: f64,

    /// Mana pool cap (also the starting value)
    pub mana_max: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            stamina_max: 100.0,
            mana_max: 100.0,
        }
    }
}
