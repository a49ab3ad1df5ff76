//! Integration tests for the ability activation flow

use skillforge::{
    AbilityId, ActionEvent, ActionKind, ActivationError, Catalog, Engine, EngineConfig,
    EngineEvent, ExemptionCategory, GainReason, ManualClock, MemoryStore, NoopEffectApplier,
    NoopNotifier, PlayerId, ReserveError, ResourceKind, SkillId,
};
use std::sync::Arc;

fn test_engine(config: EngineConfig, clock: Arc<ManualClock>) -> Engine {
    Engine::with_parts(
        config,
        Catalog::builtin().unwrap(),
        Arc::new(MemoryStore::new()),
        Arc::new(NoopEffectApplier),
        Arc::new(NoopNotifier),
        clock,
    )
    .unwrap()
}

async fn join_at_level(engine: &Engine, skill: SkillId, level: u32) -> PlayerId {
    let player = PlayerId::new();
    engine.player_join(player).await.unwrap();
    if level > 0 {
        engine.grant_levels(player, skill, level, false).await.unwrap();
    }
    player
}

/// Test 1: one host event produces both the passive award and the ability
/// activation
#[tokio::test]
async fn test_event_routes_passive_and_active() {
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = test_engine(EngineConfig::default(), clock);
    let player = join_at_level(&engine, SkillId::Mining, 20).await;

    let events = engine
        .handle_event(ActionEvent::new(ActionKind::MineBlock, player, 1_000))
        .await
        .unwrap();

    let mut saw_award = false;
    let mut saw_completion = false;
    for event in &events {
        match event {
            EngineEvent::Progression(_) => saw_award = true,
            EngineEvent::AbilityCompleted(receipt) => {
                assert_eq!(receipt.ability, AbilityId::SuperBreaker);
                saw_completion = true;
            }
            EngineEvent::AbilityRejected { .. } => {}
        }
    }
    assert!(saw_award);
    assert!(saw_completion);
}

/// Test 2: locked abilities reject through the event path without cost
#[tokio::test]
async fn test_locked_ability_rejects_through_event() {
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = test_engine(EngineConfig::default(), clock);
    let player = join_at_level(&engine, SkillId::Mining, 5).await;

    let events = engine
        .handle_event(ActionEvent::new(ActionKind::MineBlock, player, 1_000))
        .await
        .unwrap();

    let rejection = events
        .iter()
        .find_map(|event| match event {
            EngineEvent::AbilityRejected { error, .. } => Some(error.clone()),
            _ => None,
        })
        .expect("locked ability should reject");
    assert!(matches!(rejection, ActivationError::SkillTooLow { .. }));
    assert_eq!(
        engine
            .remaining_cooldown(player, AbilityId::SuperBreaker)
            .await
            .unwrap(),
        0
    );
}

/// Test 3: cost 25 against a 5-point pool: InsufficientResource and no
/// cooldown entry
#[tokio::test]
async fn test_insufficient_resource_creates_no_cooldown() {
    let clock = Arc::new(ManualClock::new(1_000));
    let mut config = EngineConfig::default();
    config.resources.stamina_max = 5.0;
    let engine = test_engine(config, clock);
    let player = join_at_level(&engine, SkillId::Mining, 20).await;

    let error = engine
        .activate_ability(
            player,
            AbilityId::SuperBreaker,
            ActionEvent::new(ActionKind::MineBlock, player, 1_000),
        )
        .await
        .unwrap_err();
    assert_eq!(
        error,
        ActivationError::Reserve(ReserveError::InsufficientResource {
            kind: ResourceKind::Stamina,
            have: 5.0,
            need: 25.0,
        })
    );
    assert_eq!(
        engine
            .remaining_cooldown(player, AbilityId::SuperBreaker)
            .await
            .unwrap(),
        0
    );
}

/// Test 4: cooldown counts down with the clock and expires cleanly
#[tokio::test]
async fn test_cooldown_lifecycle() {
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = test_engine(EngineConfig::default(), clock.clone());
    let player = join_at_level(&engine, SkillId::Mining, 20).await;

    engine
        .activate_ability(
            player,
            AbilityId::SuperBreaker,
            ActionEvent::new(ActionKind::MineBlock, player, 1_000),
        )
        .await
        .unwrap();

    assert_eq!(
        engine
            .remaining_cooldown(player, AbilityId::SuperBreaker)
            .await
            .unwrap(),
        240_000
    );

    clock.advance(100_000);
    assert_eq!(
        engine
            .remaining_cooldown(player, AbilityId::SuperBreaker)
            .await
            .unwrap(),
        140_000
    );

    // Refill what the first activation spent, then pass the expiry
    engine
        .credit_resource(player, ResourceKind::Stamina, 25.0)
        .await
        .unwrap();
    clock.advance(140_000);
    assert_eq!(
        engine
            .remaining_cooldown(player, AbilityId::SuperBreaker)
            .await
            .unwrap(),
        0
    );
    engine
        .activate_ability(
            player,
            AbilityId::SuperBreaker,
            ActionEvent::new(ActionKind::MineBlock, player, 241_000),
        )
        .await
        .unwrap();
}

/// Test 5: a completed activation grants its exemption window, and the
/// window dies on its own
#[tokio::test]
async fn test_exemption_window_self_expires() {
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = test_engine(EngineConfig::default(), clock.clone());
    let player = join_at_level(&engine, SkillId::Fitness, 30).await;

    let receipt = engine
        .activate_ability(
            player,
            AbilityId::BurstOfSpeed,
            ActionEvent::new(ActionKind::Sprint, player, 1_000),
        )
        .await
        .unwrap();
    let grant = receipt.exemption.expect("burst of speed grants movement exemption");
    assert_eq!(grant.category, ExemptionCategory::Movement);
    assert_eq!(grant.expires_at_ms, 1_000 + 8_400);

    assert!(engine.is_exempt(player, ExemptionCategory::Movement));
    clock.advance(8_400);
    // Nothing revoked the grant; it is simply over
    assert!(!engine.is_exempt(player, ExemptionCategory::Movement));
}

/// Test 6: toggled-off abilities never activate but passive gains continue
#[tokio::test]
async fn test_toggle_disables_ability_not_skill() {
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = test_engine(EngineConfig::default(), clock);
    let player = join_at_level(&engine, SkillId::Mining, 20).await;

    engine
        .set_ability_toggled_off(player, AbilityId::SuperBreaker, true)
        .await
        .unwrap();

    let events = engine
        .handle_event(ActionEvent::new(ActionKind::MineBlock, player, 1_000))
        .await
        .unwrap();

    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::AbilityRejected {
            error: ActivationError::ToggledOff { .. },
            ..
        }
    )));
    // The passive award still landed
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::Progression(_))));
}

/// Test 7: chance-gated abilities respect the seeded RNG
#[tokio::test]
async fn test_chance_gated_trigger_is_deterministic() {
    let clock = Arc::new(ManualClock::new(1_000));
    let mut config = EngineConfig::default();
    config.rng_seed = Some(7);
    let engine = test_engine(config, clock.clone());
    // Level 100 Swords: Bleed procs at its 30% cap
    let player = join_at_level(&engine, SkillId::Swords, 100).await;

    let mut completions = 0usize;
    let mut chance_rejections = 0usize;
    for attempt in 0..200u64 {
        // Walk past the 3s cooldown and keep the pool topped up so only
        // the chance gate varies between attempts
        clock.advance(3_000);
        engine
            .credit_resource(player, ResourceKind::Stamina, 4.0)
            .await
            .unwrap();

        let action = ActionEvent::new(ActionKind::AttackEntity, player, 1_000 + attempt * 3_000);
        match engine
            .activate_ability(player, AbilityId::Bleed, action)
            .await
        {
            Ok(_) => completions += 1,
            Err(ActivationError::ChanceNotMet { .. }) => chance_rejections += 1,
            Err(other) => panic!("unexpected rejection: {other:?}"),
        }
    }
    // Seeded RNG around a 30% proc rate: both outcomes occur, rejections
    // dominate
    assert!(completions > 0);
    assert!(chance_rejections > completions);
}

/// Test 8: experience gained through events uses the mapping's scaling
#[tokio::test]
async fn test_event_award_scales_with_magnitude() {
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = test_engine(EngineConfig::default(), clock);
    let player = join_at_level(&engine, SkillId::Herbalism, 0).await;

    // Default herbalism route is 7 xp; magnitude 2 doubles it
    let event = ActionEvent::new(ActionKind::HarvestCrop, player, 1_000).with_magnitude(2.0);
    engine.handle_event(event).await.unwrap();

    assert_eq!(
        engine
            .placeholders()
            .current_experience(player, SkillId::Herbalism)
            .await,
        Some(14.0)
    );
}

/// Test 9: awards can be injected for other reasons (admin commands)
#[tokio::test]
async fn test_admin_award_reason() {
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = test_engine(EngineConfig::default(), clock);
    let player = join_at_level(&engine, SkillId::Sorcery, 0).await;

    let events = engine
        .award_experience(player, SkillId::Sorcery, 50.0, GainReason::Command)
        .await
        .unwrap();
    assert!(events.iter().any(|event| matches!(
        event,
        skillforge::ProgressionEvent::ExperienceGained {
            reason: GainReason::Command,
            ..
        }
    )));
}
