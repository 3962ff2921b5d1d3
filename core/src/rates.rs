//! Rate calculator: resource rates, XP gains and the level-cost curve.
//!
//! Every function here is pure. Growth bonuses compose by multiplication,
//! so the order in which they are applied does not matter.

use crate::{
    config::PlantConfig,
    state::{LevelProgress, ProgressState},
    types::{ActivityId, GrowthStatId, Resource},
};

/// Rate gained per activity level.
pub const ACTIVITY_LEVEL_BONUS: f64 = 0.10;
/// Sunlight bonus per Stem Height level.
pub const STEM_HEIGHT_SUNLIGHT_BONUS: f64 = 0.05;
/// Sunlight bonus per Leaf Size level.
pub const LEAF_SIZE_SUNLIGHT_BONUS: f64 = 0.10;
/// Nutrient bonus per Root Depth level.
pub const ROOT_DEPTH_NUTRIENT_BONUS: f64 = 0.10;
/// Global bonus per Aura Strength level.
pub const AURA_STRENGTH_BONUS: f64 = 0.05;

/// floor(base × growth^level). `level` is the current level, before the
/// pending level-up.
pub fn xp_required_with(base: f64, level: u32, growth: f64) -> f64 {
    (base * growth.powf(f64::from(level))).floor()
}

/// The configured cost curve.
pub fn xp_required(config: &PlantConfig, base: f64, level: u32) -> f64 {
    xp_required_with(base, level, config.tuning().level_cost_growth)
}

/// Resource per second for `id` at the current levels.
pub fn activity_rate(id: ActivityId, state: &ProgressState, config: &PlantConfig) -> f64 {
    let def = config.activity(id);
    let level = f64::from(state.activity(id).level);
    let growth = |stat: GrowthStatId| f64::from(state.growth_level(stat));

    let mut rate = def.base_rate * (1.0 + level * ACTIVITY_LEVEL_BONUS);

    match def.resource {
        Resource::Sunlight => {
            rate *= 1.0 + growth(GrowthStatId::StemHeight) * STEM_HEIGHT_SUNLIGHT_BONUS;
            rate *= 1.0 + growth(GrowthStatId::LeafSize) * LEAF_SIZE_SUNLIGHT_BONUS;
        }
        Resource::Nutrients => {
            rate *= 1.0 + growth(GrowthStatId::RootDepth) * ROOT_DEPTH_NUTRIENT_BONUS;
        }
        Resource::Water | Resource::Moonlight | Resource::Essence => {}
    }

    rate * (1.0 + growth(GrowthStatId::AuraStrength) * AURA_STRENGTH_BONUS)
}

/// Activity XP for `dt` seconds. Flat: no resource bonus, no multiplier.
pub fn activity_xp_gain(config: &PlantConfig, dt: f64) -> f64 {
    dt * config.tuning().xp_per_second
}

/// Growth XP for `dt` seconds, scaled by the stat's permanent multiplier.
pub fn growth_xp_gain(id: GrowthStatId, state: &ProgressState, config: &PlantConfig, dt: f64) -> f64 {
    dt * config.tuning().xp_per_second * state.prestige.multiplier(id)
}

/// Add `amount` to a running total, saturating at `f64::MAX` so totals
/// stay serializable.
pub fn saturating_gain(total: f64, amount: f64) -> f64 {
    (total + amount).min(f64::MAX)
}

/// Spend XP on as many level-ups as it covers. Overflow carries into the
/// next level; returns the number of levels gained.
pub fn resolve_level_ups(progress: &mut LevelProgress, base: f64, config: &PlantConfig) -> u32 {
    let mut gained = 0u32;
    loop {
        let required = xp_required(config, base, progress.level);
        // Written as a negated `>=` so a NaN xp stops the loop.
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let short = !(progress.xp >= required);
        // Past f64 range the next level can never be paid for.
        if short || !required.is_finite() || progress.level == u32::MAX {
            return gained;
        }
        progress.xp -= required;
        progress.level += 1;
        gained += 1;
    }
}
