//! Integration tests for experience awards and level progression

use skillforge::{
    Engine, EngineConfig, GainReason, ManualClock, MemoryStore, NoopEffectApplier, NoopNotifier,
    PlayerId, ProgressionEvent, SkillId,
};
use std::sync::Arc;

async fn engine_with_player() -> (Engine, PlayerId) {
    let engine = Engine::with_parts(
        EngineConfig::default(),
        skillforge::Catalog::builtin().unwrap(),
        Arc::new(MemoryStore::new()),
        Arc::new(NoopEffectApplier),
        Arc::new(NoopNotifier),
        Arc::new(ManualClock::new(1_000)),
    )
    .unwrap();
    let player = PlayerId::new();
    engine.player_join(player).await.unwrap();
    (engine, player)
}

fn level_up_count(events: &[ProgressionEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, ProgressionEvent::LevelUp { .. }))
        .count()
}

/// Test 1: a fresh player levels up once when crossing the first threshold
#[tokio::test]
async fn test_first_level_up() {
    let (engine, player) = engine_with_player().await;
    let threshold = engine
        .catalog()
        .skill(SkillId::Mining)
        .unwrap()
        .curve
        .threshold(0);

    // One short of the threshold: no level yet
    let events = engine
        .award_experience(player, SkillId::Mining, threshold - 1.0, GainReason::Action)
        .await
        .unwrap();
    assert_eq!(level_up_count(&events), 0);

    // The exact remaining amount triggers exactly one level-up
    let events = engine
        .award_experience(player, SkillId::Mining, 1.0, GainReason::Action)
        .await
        .unwrap();
    assert_eq!(level_up_count(&events), 1);

    let placeholders = engine.placeholders();
    assert_eq!(placeholders.current_level(player, SkillId::Mining).await, Some(1));
    assert_eq!(
        placeholders.current_experience(player, SkillId::Mining).await,
        Some(0.0)
    );
}

/// Test 2: a huge award cascades level by level without skipping
#[tokio::test]
async fn test_cascading_award() {
    let (engine, player) = engine_with_player().await;
    // Herbalism's thresholds are whole numbers (80, 100, 120, 140), so the
    // carried remainder is exact
    let curve = engine.catalog().skill(SkillId::Herbalism).unwrap().curve;

    // Enough for exactly four levels plus 10 spare
    let amount: f64 = (0..4).map(|level| curve.threshold(level)).sum::<f64>() + 10.0;
    let events = engine
        .award_experience(player, SkillId::Herbalism, amount, GainReason::Action)
        .await
        .unwrap();

    assert_eq!(level_up_count(&events), 4);
    // Level-ups arrive in crossing order
    let levels: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            ProgressionEvent::LevelUp { new_level, .. } => Some(*new_level),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![1, 2, 3, 4]);

    let placeholders = engine.placeholders();
    assert_eq!(
        placeholders.current_level(player, SkillId::Herbalism).await,
        Some(4)
    );
    assert_eq!(
        placeholders.current_experience(player, SkillId::Herbalism).await,
        Some(10.0)
    );
}

/// Test 3: invalid awards are rejected and change nothing
#[tokio::test]
async fn test_invalid_award_rejected() {
    let (engine, player) = engine_with_player().await;

    for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        assert!(engine
            .award_experience(player, SkillId::Mining, amount, GainReason::Action)
            .await
            .is_err());
    }
    assert_eq!(
        engine
            .placeholders()
            .current_experience(player, SkillId::Mining)
            .await,
        Some(0.0)
    );
}

/// Test 4: experience past the level cap is discarded, never stored
#[tokio::test]
async fn test_level_cap() {
    let (engine, player) = engine_with_player().await;
    let definition = engine.catalog().skill(SkillId::Fitness).unwrap();
    let max_level = definition.max_level;

    // Far more experience than the whole curve needs
    let total: f64 = (0..max_level)
        .map(|level| definition.curve.threshold(level))
        .sum();
    let events = engine
        .award_experience(player, SkillId::Fitness, total * 3.0, GainReason::Action)
        .await
        .unwrap();
    assert_eq!(level_up_count(&events), max_level as usize);

    let placeholders = engine.placeholders();
    assert_eq!(
        placeholders.current_level(player, SkillId::Fitness).await,
        Some(max_level)
    );
    assert_eq!(
        placeholders.current_experience(player, SkillId::Fitness).await,
        Some(0.0)
    );
    assert_eq!(
        placeholders
            .experience_to_next_level(player, SkillId::Fitness)
            .await,
        Some(0.0)
    );
}

/// Test 5: power level sums levels across skills
#[tokio::test]
async fn test_power_level() {
    let (engine, player) = engine_with_player().await;
    engine
        .grant_levels(player, SkillId::Mining, 12, false)
        .await
        .unwrap();
    engine
        .grant_levels(player, SkillId::Swords, 8, false)
        .await
        .unwrap();
    assert_eq!(engine.placeholders().power_level(player).await, Some(20));
}

/// Test 6: resetting a skill zeroes it and re-enables its abilities
#[tokio::test]
async fn test_reset_skill() {
    let (engine, player) = engine_with_player().await;
    engine
        .grant_levels(player, SkillId::Mining, 30, false)
        .await
        .unwrap();
    engine
        .set_ability_toggled_off(player, skillforge::AbilityId::SuperBreaker, true)
        .await
        .unwrap();

    engine.reset_skill(player, SkillId::Mining).await.unwrap();
    assert_eq!(
        engine
            .placeholders()
            .current_level(player, SkillId::Mining)
            .await,
        Some(0)
    );

    // After re-leveling, the ability activates again (it was untoggled by
    // the reset)
    engine
        .grant_levels(player, SkillId::Mining, 30, false)
        .await
        .unwrap();
    let receipt = engine
        .activate_ability(
            player,
            skillforge::AbilityId::SuperBreaker,
            skillforge::ActionEvent::new(skillforge::ActionKind::MineBlock, player, 1_000),
        )
        .await
        .unwrap();
    assert_eq!(receipt.ability, skillforge::AbilityId::SuperBreaker);
}

/// Test 7: awards to an unknown player fail instead of creating state
#[tokio::test]
async fn test_award_requires_session() {
    let (engine, _player) = engine_with_player().await;
    let ghost = PlayerId::new();
    assert!(engine
        .award_experience(ghost, SkillId::Mining, 10.0, GainReason::Action)
        .await
        .is_err());
}
