//! Per-player spendable resource pools

use crate::core::types::ResourceKind;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A pool of one resource kind: current amount and cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeter {
    pub current: f64,
    pub max: f64,
}

/// Session-scoped resource pools for one player.
///
/// Pools start full and never go negative; a debit either covers the whole
/// amount or does nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    pools: AHashMap<ResourceKind, ResourceMeter>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a pool's cap and fill it
    pub fn set_max(&mut self, kind: ResourceKind, max: f64) {
        let meter = self.pools.entry(kind).or_default();
        meter.max = max;
        meter.current = max;
    }

    /// Current amount of a resource
    pub fn available(&self, kind: ResourceKind) -> f64 {
        self.pools.get(&kind).map_or(0.0, |meter| meter.current)
    }

    /// Can the pool cover this amount?
    pub fn can_afford(&self, kind: ResourceKind, amount: f64) -> bool {
        self.available(kind) >= amount
    }

    /// Take `amount` out of the pool. Returns false (and changes nothing)
    /// if the pool cannot cover it.
    pub fn debit(&mut self, kind: ResourceKind, amount: f64) -> bool {
        match self.pools.get_mut(&kind) {
            Some(meter) if meter.current >= amount => {
                meter.current -= amount;
                true
            }
            _ => false,
        }
    }

    /// Add to the pool, clamped at the cap
    pub fn credit(&mut self, kind: ResourceKind, amount: f64) {
        if let Some(meter) = self.pools.get_mut(&kind) {
            meter.current = (meter.current + amount).min(meter.max);
        }
    }
}
