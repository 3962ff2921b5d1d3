//! Prestige controller: rebirth eligibility and the rebirth law.
//!
//! Rebirth is voluntary once the plant reaches the configured total
//! growth level ("Ancient"). Per-stat multipliers are permanent and
//! monotonic: a weaker life can never lower them. Ancient Memory then
//! compounds every multiplier on every rebirth.

use crate::{
    config::PlantConfig,
    state::ProgressState,
    types::GrowthStatId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiplier bonus per Ancient Memory level, applied at rebirth.
pub const ANCIENT_MEMORY_BONUS: f64 = 0.02;
/// A stat's multiplier candidate is 1 + max level / this.
pub const LEVELS_PER_MULTIPLIER: f64 = 10.0;

pub fn is_eligible(state: &ProgressState, config: &PlantConfig) -> bool {
    state.total_growth_levels() >= config.tuning().rebirth_min_total_levels
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebirthOutcome {
    /// Lifetime number of the life that just started.
    pub lifetime:     u32,
    /// Total growth levels of the life that ended.
    pub total_levels: u32,
    pub multipliers:  BTreeMap<GrowthStatId, f64>,
}

/// Multipliers and max levels a rebirth right now would produce.
pub fn preview(state: &ProgressState) -> (BTreeMap<GrowthStatId, f64>, BTreeMap<GrowthStatId, u32>) {
    let memory = 1.0 + f64::from(state.growth_level(GrowthStatId::AncientMemory)) * ANCIENT_MEMORY_BONUS;

    let mut multipliers = BTreeMap::new();
    let mut max_levels = BTreeMap::new();
    for id in GrowthStatId::ALL {
        let max_level = state.prestige.max_level(id).max(state.growth_level(id));
        let candidate = 1.0 + f64::from(max_level) / LEVELS_PER_MULTIPLIER;
        let kept = state.prestige.multiplier(id).max(candidate);
        multipliers.insert(id, kept * memory);
        max_levels.insert(id, max_level);
    }
    (multipliers, max_levels)
}

/// Rebirth if eligible. Returns None (and changes nothing) otherwise.
pub fn rebirth(state: &mut ProgressState, config: &PlantConfig) -> Option<RebirthOutcome> {
    if !is_eligible(state, config) {
        return None;
    }
    let total_levels = state.total_growth_levels();
    let (multipliers, max_levels) = preview(state);

    state.prestige.multipliers = multipliers.clone();
    state.prestige.max_level_reached = max_levels;
    state.start_new_life(config);

    log::info!(
        "rebirth: lifetime {} begins after {total_levels} total levels",
        state.calendar.lifetime_count
    );

    Some(RebirthOutcome {
        lifetime: state.calendar.lifetime_count,
        total_levels,
        multipliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Resource;

    fn ancient_state(config: &PlantConfig) -> ProgressState {
        let mut state = ProgressState::new(config);
        state.growth_mut(GrowthStatId::RootDepth).level = 40;
        state.growth_mut(GrowthStatId::StemHeight).level = 30;
        state.growth_mut(GrowthStatId::LeafSize).level = 30;
        state
    }

    #[test]
    fn ineligible_rebirth_is_a_no_op() {
        let config = PlantConfig::builtin();
        let mut state = ProgressState::new(&config);
        state.growth_mut(GrowthStatId::RootDepth).level = 99;
        let before = state.clone();
        assert!(rebirth(&mut state, &config).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn rebirth_sets_multipliers_from_levels() {
        let config = PlantConfig::builtin();
        let mut state = ancient_state(&config);
        state.add_resource(Resource::Nutrients, 1000.0);

        let outcome = rebirth(&mut state, &config).unwrap();

        assert_eq!(outcome.lifetime, 2);
        assert_eq!(outcome.total_levels, 100);
        assert_eq!(state.prestige.multiplier(GrowthStatId::RootDepth), 5.0);
        assert_eq!(state.prestige.multiplier(GrowthStatId::StemHeight), 4.0);
        assert_eq!(state.prestige.multiplier(GrowthStatId::FlowerBuds), 1.0);
        assert_eq!(state.prestige.max_level(GrowthStatId::RootDepth), 40);
        assert_eq!(state.total_growth_levels(), 0);
        assert_eq!(state.resource(Resource::Nutrients), 0.0);
    }

    #[test]
    fn ancient_memory_compounds_every_multiplier() {
        let config = PlantConfig::builtin();
        let mut state = ancient_state(&config);
        state.growth_mut(GrowthStatId::AncientMemory).level = 10;

        rebirth(&mut state, &config).unwrap();

        let bonus = 1.0 + 10.0 * ANCIENT_MEMORY_BONUS;
        let root = state.prestige.multiplier(GrowthStatId::RootDepth);
        let buds = state.prestige.multiplier(GrowthStatId::FlowerBuds);
        assert!((root - 5.0 * bonus).abs() < 1e-12);
        assert!((buds - bonus).abs() < 1e-12);
    }

    #[test]
    fn weaker_life_never_lowers_multipliers() {
        let config = PlantConfig::builtin();
        let mut state = ancient_state(&config);
        rebirth(&mut state, &config).unwrap();
        let first = state.prestige.multipliers.clone();

        state.growth_mut(GrowthStatId::RootDepth).level = 10;
        state.growth_mut(GrowthStatId::FlowerBuds).level = 90;
        rebirth(&mut state, &config).unwrap();

        for id in GrowthStatId::ALL {
            assert!(
                state.prestige.multiplier(id) >= first[&id],
                "{id} decreased: {} -> {}",
                first[&id],
                state.prestige.multiplier(id)
            );
        }
        assert_eq!(state.prestige.max_level(GrowthStatId::RootDepth), 40);
        assert_eq!(state.prestige.multiplier(GrowthStatId::FlowerBuds), 10.0);
    }
}
