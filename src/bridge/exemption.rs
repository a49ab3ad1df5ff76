//! Exemption grants toward external monitoring systems
//!
//! Some ability effects look exactly like cheating to an anti-cheat or
//! region-protection plugin (instant block breaking, sudden speed). Before
//! such an effect lands, the engine grants a short-lived exemption scoped
//! to one player and one check category. Grants carry an explicit expiry
//! and can never outlive their window: reads compare against the clock, so
//! a grant is implicitly invalid the instant it expires even if nothing
//! ever revokes it.

use crate::core::types::{DurationMs, PlayerId, TimestampMs};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// External check category an exemption suspends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExemptionCategory {
    /// Block-break speed checks
    FastBreak,
    /// Attack-rate checks
    FastAttack,
    /// Movement-speed checks
    Movement,
    /// Region block-place protection
    BlockPlace,
}

/// A short-lived exemption window for one player and category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemptionGrant {
    pub player: PlayerId,
    pub category: ExemptionCategory,
    pub expires_at_ms: TimestampMs,
}

/// External collaborator notified of grants.
///
/// Fire-and-forget: no acknowledgment, and duplicate calls for overlapping
/// windows must be harmless on the receiving side.
pub trait ExemptionNotifier: Send + Sync {
    fn grant_exemption(&self, player: PlayerId, category: ExemptionCategory, duration_ms: DurationMs);
}

/// Notifier used when no external monitor is wired up
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl ExemptionNotifier for NoopNotifier {
    fn grant_exemption(&self, _: PlayerId, _: ExemptionCategory, _: DurationMs) {}
}

/// Active exemption windows, lazily expired on read.
///
/// Overlapping grants for the same (player, category) extend the window to
/// the later expiry instead of stacking, which keeps repeated grants
/// idempotent.
pub struct ExemptionLedger {
    grants: Mutex<AHashMap<(PlayerId, ExemptionCategory), TimestampMs>>,
    notifier: std::sync::Arc<dyn ExemptionNotifier>,
}

impl ExemptionLedger {
    pub fn new(notifier: std::sync::Arc<dyn ExemptionNotifier>) -> Self {
        Self {
            grants: Mutex::new(AHashMap::new()),
            notifier,
        }
    }

    /// Record a grant and notify the external collaborator.
    ///
    /// Returns the resulting window.
    pub fn grant(
        &self,
        player: PlayerId,
        category: ExemptionCategory,
        now_ms: TimestampMs,
        duration_ms: DurationMs,
    ) -> ExemptionGrant {
        let expires_at_ms = {
            let mut grants = self.grants.lock().unwrap_or_else(|e| e.into_inner());
            let entry = grants.entry((player, category)).or_insert(0);
            // Extend, never shorten
            *entry = (*entry).max(now_ms.saturating_add(duration_ms));
            *entry
        };
        tracing::debug!(
            "granted {:?} exemption for {} until {}ms",
            category,
            player,
            expires_at_ms
        );
        self.notifier.grant_exemption(player, category, duration_ms);
        ExemptionGrant {
            player,
            category,
            expires_at_ms,
        }
    }

    /// Is the player currently exempt from this category?
    ///
    /// Pure read apart from dropping the entry once it has expired.
    pub fn is_exempt(
        &self,
        player: PlayerId,
        category: ExemptionCategory,
        now_ms: TimestampMs,
    ) -> bool {
        let mut grants = self.grants.lock().unwrap_or_else(|e| e.into_inner());
        match grants.get(&(player, category)) {
            Some(&expiry) if expiry > now_ms => true,
            Some(_) => {
                grants.remove(&(player, category));
                false
            }
            None => false,
        }
    }

    /// Drop every grant for a player (session teardown)
    pub fn clear_player(&self, player: PlayerId) {
        let mut grants = self.grants.lock().unwrap_or_else(|e| e.into_inner());
        grants.retain(|(owner, _), _| *owner != player);
    }
}
