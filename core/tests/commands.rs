//! Player commands: selection guards, rebirth and reset.

use plantlife_core::{
    command::PlayerCommand,
    config::PlantConfig,
    engine::PlantEngine,
    event::EngineSignal,
    snapshot,
    state::ProgressState,
    types::{ActivityId, GrowthStatId, Resource},
};

fn build() -> PlantEngine {
    PlantEngine::build_test().expect("build test engine")
}

/// An engine whose plant already holds `levels` Root Depth levels.
fn engine_with_root_depth(levels: u32) -> PlantEngine {
    let config = PlantConfig::builtin();
    let mut state = ProgressState::new(&config);
    state.growth_mut(GrowthStatId::RootDepth).level = levels;
    state.add_resource(Resource::Nutrients, 500.0);

    let mut engine = PlantEngine::build_test_with(config).expect("build test engine");
    engine
        .import_snapshot(&snapshot::encode(&state).unwrap())
        .expect("import");
    engine
}

fn command_received(signals: &[EngineSignal], expected: &str) -> bool {
    signals.iter().any(|s| matches!(
        s,
        EngineSignal::PlayerCommandReceived { command_type, .. } if command_type == expected
    ))
}

#[test]
fn locked_activity_selection_is_ignored() {
    let mut engine = build();

    let signals = engine.execute(PlayerCommand::SelectActivity { id: ActivityId::NightBloom });

    assert!(command_received(&signals, "select_activity"));
    assert_eq!(engine.state().selected_activity, Some(ActivityId::AbsorbWater));
}

#[test]
fn locked_growth_selection_is_ignored() {
    let mut engine = build();
    engine.execute(PlayerCommand::SelectGrowth { id: GrowthStatId::FlowerBuds });
    assert_eq!(engine.state().selected_growth, Some(GrowthStatId::RootDepth));
}

#[test]
fn unlocked_selection_is_applied() {
    let mut engine = engine_with_root_depth(1);
    engine.execute(PlayerCommand::SelectActivity { id: ActivityId::ExtendRoots });
    engine.execute(PlayerCommand::SelectGrowth { id: GrowthStatId::StemHeight });

    assert_eq!(engine.state().selected_activity, Some(ActivityId::ExtendRoots));
    assert_eq!(engine.state().selected_growth, Some(GrowthStatId::StemHeight));

    engine.tick(1.0);
    assert!(engine.state().resource(Resource::Nutrients) > 500.0);
}

#[test]
fn every_command_gets_a_distinct_id() {
    let mut engine = build();
    let mut ids = Vec::new();
    for _ in 0..3 {
        for signal in engine.execute(PlayerCommand::RequestRebirth) {
            if let EngineSignal::PlayerCommandReceived { command_id, .. } = signal {
                ids.push(command_id);
            }
        }
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn rebirth_before_ancient_changes_nothing() {
    let mut engine = engine_with_root_depth(99);
    let before = engine.state().clone();

    let signals = engine.execute(PlayerCommand::RequestRebirth);

    assert!(!engine.rebirth_eligible());
    assert_eq!(engine.state(), &before);
    assert!(!signals.iter().any(|s| matches!(s, EngineSignal::Reborn { .. })));
}

#[test]
fn crossing_the_ancient_threshold_signals_eligibility() {
    let config = PlantConfig::builtin();
    let mut state = ProgressState::new(&config);
    state.growth_mut(GrowthStatId::RootDepth).level = 99;
    let mut engine = PlantEngine::build_test_with(config).unwrap();
    engine.import_snapshot(&snapshot::encode(&state).unwrap()).unwrap();
    engine.tick(0.0);

    // Root Depth 99 → 100 costs floor(10 × 1.15^99); one huge tick covers it.
    let signals = engine.tick(1.0e8);

    assert!(engine.rebirth_eligible());
    assert!(signals.contains(&EngineSignal::RebirthEligibilityChanged { eligible: true }));
}

#[test]
fn rebirth_starts_a_new_life_with_multipliers() {
    let mut engine = engine_with_root_depth(100);
    engine.tick(3.0);
    assert!(engine.rebirth_eligible());
    assert_eq!(engine.rebirth_preview()[&GrowthStatId::RootDepth], 11.0);

    let signals = engine.execute(PlayerCommand::RequestRebirth);

    assert!(signals.iter().any(|s| matches!(s, EngineSignal::Reborn { lifetime: 2, .. })));
    assert!(signals.contains(&EngineSignal::RebirthEligibilityChanged { eligible: false }));

    let state = engine.state();
    assert_eq!(state.calendar.lifetime_count, 2);
    assert_eq!(state.calendar.year, 1);
    assert_eq!(state.calendar.day_index(), 1);
    assert_eq!(state.total_growth_levels(), 0);
    assert_eq!(state.resource(Resource::Nutrients), 0.0);
    assert_eq!(state.prestige.multiplier(GrowthStatId::RootDepth), 11.0);
    assert_eq!(state.prestige.multiplier(GrowthStatId::LeafSize), 1.0);

    // The next tick repaints everything.
    assert_eq!(engine.tick(0.1).first(), Some(&EngineSignal::FullRefreshNeeded));
}

#[test]
fn multipliers_speed_up_growth_in_the_next_life() {
    let mut engine = engine_with_root_depth(100);
    engine.execute(PlayerCommand::RequestRebirth);

    // 11 × 10 XP/s for one second covers levels 0..6 (10+11+13+15+17+20+23).
    engine.tick(1.0);
    let root = engine.state().growth(GrowthStatId::RootDepth);
    assert_eq!(root.level, 7);
    assert_eq!(root.xp, 1.0);
}

#[test]
fn a_weaker_life_never_lowers_a_multiplier() {
    let mut engine = engine_with_root_depth(100);
    engine.execute(PlayerCommand::RequestRebirth);
    let first = engine.state().prestige.multiplier(GrowthStatId::RootDepth);

    // Second life reaches eligibility on a different stat.
    let mut state = engine.state().clone();
    state.growth_mut(GrowthStatId::StemHeight).level = 100;
    engine.import_snapshot(&snapshot::encode(&state).unwrap()).unwrap();
    engine.execute(PlayerCommand::RequestRebirth);

    let prestige = &engine.state().prestige;
    assert!(prestige.multiplier(GrowthStatId::RootDepth) >= first);
    assert_eq!(prestige.multiplier(GrowthStatId::StemHeight), 11.0);
    assert_eq!(engine.state().calendar.lifetime_count, 3);
}

#[test]
fn reset_requires_the_exact_confirmation() {
    let mut engine = engine_with_root_depth(100);
    engine.execute(PlayerCommand::RequestRebirth);

    for attempt in ["", "reset", "RESET ", "yes"] {
        let signals = engine.execute(PlayerCommand::RequestReset { confirmation: attempt.into() });
        assert!(!signals.contains(&EngineSignal::StateReset), "{attempt:?} reset the plant");
    }
    assert_eq!(engine.state().calendar.lifetime_count, 2);

    let signals = engine.execute(PlayerCommand::RequestReset { confirmation: "RESET".into() });

    assert!(signals.contains(&EngineSignal::StateReset));
    assert_eq!(engine.state(), &ProgressState::new(engine.config()));
    assert_eq!(engine.state().prestige.multiplier(GrowthStatId::RootDepth), 1.0);
}

#[test]
fn commands_serialize_with_a_cmd_tag() {
    let json = serde_json::to_string(&PlayerCommand::SelectActivity { id: ActivityId::ExtendRoots }).unwrap();
    assert_eq!(json, r#"{"cmd":"select_activity","id":"extendRoots"}"#);

    let parsed: PlayerCommand =
        serde_json::from_str(r#"{"cmd":"request_reset","confirmation":"RESET"}"#).unwrap();
    assert_eq!(parsed, PlayerCommand::RequestReset { confirmation: "RESET".into() });
}
