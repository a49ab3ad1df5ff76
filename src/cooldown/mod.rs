//! Cooldown timers and resource pools gating ability use

pub mod resources;
pub mod tracker;

pub use resources::{ResourceMeter, ResourcePool};
pub use tracker::{try_reserve, CooldownTracker, Reservation, ReserveError};
