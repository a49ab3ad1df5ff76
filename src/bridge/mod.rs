//! Boundary between the host server and the engine
//!
//! Inbound: host game events arrive already translated into
//! [`event::ActionEvent`]s and are routed by the configured
//! [`mapping::EventMapping`] to passive experience awards and/or ability
//! activation attempts. Outbound: short-lived exemption grants toward
//! anti-cheat/region-protection collaborators, and read-only placeholder
//! accessors for text integrations.

pub mod event;
pub mod exemption;
pub mod mapping;
pub mod placeholders;

pub use event::{ActionEvent, ActionKind};
pub use exemption::{
    ExemptionCategory, ExemptionGrant, ExemptionLedger, ExemptionNotifier, NoopNotifier,
};
pub use mapping::{ActiveRoute, EventMapping, PassiveRoute};
pub use placeholders::Placeholders;

use crate::core::types::{DurationMs, PlayerId, TimestampMs};
use std::sync::Arc;

/// Where one action event must be routed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePlan {
    /// Passive experience awards to apply
    pub awards: Vec<PassiveRoute>,
    /// Ability activations to attempt
    pub attempts: Vec<ActiveRoute>,
}

impl RoutePlan {
    pub fn is_empty(&self) -> bool {
        self.awards.is_empty() && self.attempts.is_empty()
    }
}

/// Adapts host events into engine work and owns the exemption surface
pub struct EventBridge {
    mapping: EventMapping,
    exemptions: Arc<ExemptionLedger>,
}

impl EventBridge {
    pub fn new(mapping: EventMapping, exemptions: Arc<ExemptionLedger>) -> Self {
        Self {
            mapping,
            exemptions,
        }
    }

    /// Resolve an event against the configured mapping
    pub fn plan(&self, event: &ActionEvent) -> RoutePlan {
        let plan = RoutePlan {
            awards: self.mapping.passive_routes(event.kind).copied().collect(),
            attempts: self.mapping.active_routes(event.kind).copied().collect(),
        };
        if plan.is_empty() {
            tracing::trace!("{:?} maps to nothing", event.kind);
        }
        plan
    }

    pub fn mapping(&self) -> &EventMapping {
        &self.mapping
    }

    /// One-shot exemption grant toward an external monitor
    pub fn grant_exemption(
        &self,
        player: PlayerId,
        category: ExemptionCategory,
        now_ms: TimestampMs,
        duration_ms: DurationMs,
    ) -> ExemptionGrant {
        self.exemptions.grant(player, category, now_ms, duration_ms)
    }

    /// Query a live exemption window
    pub fn is_exempt(
        &self,
        player: PlayerId,
        category: ExemptionCategory,
        now_ms: TimestampMs,
    ) -> bool {
        self.exemptions.is_exempt(player, category, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_splits_passive_and_active() {
        let bridge = EventBridge::new(
            EventMapping::default(),
            Arc::new(ExemptionLedger::new(Arc::new(NoopNotifier))),
        );
        let event = ActionEvent::new(ActionKind::MineBlock, PlayerId::new(), 0);
        let plan = bridge.plan(&event);
        assert_eq!(plan.awards.len(), 1);
        assert_eq!(plan.attempts.len(), 1);

        // Swords attacks fan out to several candidate abilities
        let event = ActionEvent::new(ActionKind::AttackEntity, PlayerId::new(), 0);
        let plan = bridge.plan(&event);
        assert_eq!(plan.attempts.len(), 3);
    }
}
