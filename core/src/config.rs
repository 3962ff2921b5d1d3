//! Definition tables and tuning.
//!
//! RULE: the engine never reads a definition that has not been validated.
//! `PlantConfig` is built through `load()` or `from_parts()`, which run
//! `validate()`, or `builtin()`, whose tables are checked by
//! `builtin_tables_validate`. Fields are private, so a validated config
//! cannot be edited afterwards. Every activity and growth-stat id is
//! guaranteed to have a definition.

use crate::{
    error::{SimError, SimResult},
    types::{ActivityId, GrowthCategory, GrowthStatId, Resource},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot slot key, shared with the store.
pub const SAVE_KEY: &str = "plant_life_save";

/// Confirmation token the UI must forward with a full reset.
pub const RESET_CONFIRMATION: &str = "RESET";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockRequirement {
    pub growth: GrowthStatId,
    pub level:  u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDef {
    pub name:       String,
    pub resource:   Resource,
    pub base_rate:  f64,
    #[serde(default)]
    pub unlock_req: Option<UnlockRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthStatDef {
    pub name:        String,
    pub category:    GrowthCategory,
    pub base_xp_req: f64,
    #[serde(default)]
    pub unlock_req:  Option<UnlockRequirement>,
    /// Flavor text shown next to the stat.
    #[serde(default)]
    pub effect:      String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeStage {
    pub name:       String,
    pub min_levels: u32,
}

/// Numeric knobs of the tick engine and prestige controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// In-game days per real second.
    pub days_per_second:          f64,
    /// XP earned per real second by the selected activity and growth stat.
    pub xp_per_second:            f64,
    /// Base XP requirement shared by every activity.
    pub activity_base_xp:         f64,
    /// Per-level growth of every XP requirement.
    pub level_cost_growth:        f64,
    /// Total growth levels needed to rebirth ("Ancient").
    pub rebirth_min_total_levels: u32,
    /// Persist the state every N ticks.
    pub save_interval_ticks:      u64,
    /// Advisory real-time tick interval for drivers.
    pub tick_rate_ms:             u64,
    pub default_activity:         ActivityId,
    pub default_growth:           GrowthStatId,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            days_per_second:          1.0,
            xp_per_second:            10.0,
            activity_base_xp:         20.0,
            level_cost_growth:        1.15,
            rebirth_min_total_levels: 100,
            save_interval_ticks:      1,
            tick_rate_ms:             100,
            default_activity:         ActivityId::AbsorbWater,
            default_growth:           GrowthStatId::RootDepth,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ActivitiesFile {
    activities: BTreeMap<ActivityId, ActivityDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct GrowthStatsFile {
    growth_stats: BTreeMap<GrowthStatId, GrowthStatDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct LifeStagesFile {
    life_stages: Vec<LifeStage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlantConfig {
    activities:   BTreeMap<ActivityId, ActivityDef>,
    growth_stats: BTreeMap<GrowthStatId, GrowthStatDef>,
    life_stages:  Vec<LifeStage>,
    tuning:       Tuning,
}

impl PlantConfig {
    /// Load from the data/ directory.
    /// In tests, use PlantConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/activities.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let activities: ActivitiesFile = serde_json::from_str(&content)?;

        let growth_path = format!("{data_dir}/growth_stats.json");
        let growth_content = std::fs::read_to_string(&growth_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {growth_path}: {e}"))?;
        let growth: GrowthStatsFile = serde_json::from_str(&growth_content)?;

        let stage_path = format!("{data_dir}/life_stages.json");
        let stage_content = std::fs::read_to_string(&stage_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {stage_path}: {e}"))?;
        let stages: LifeStagesFile = serde_json::from_str(&stage_content)?;

        let tuning_path = format!("{data_dir}/tuning.json");
        let tuning_content = std::fs::read_to_string(&tuning_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {tuning_path}: {e}"))?;
        let tuning: Tuning = serde_json::from_str(&tuning_content)?;

        let config = Self::from_parts(
            activities.activities,
            growth.growth_stats,
            stages.life_stages,
            tuning,
        )?;
        log::debug!(
            "Loaded {} activities, {} growth stats, {} life stages from {data_dir}",
            config.activities.len(),
            config.growth_stats.len(),
            config.life_stages.len()
        );
        Ok(config)
    }

    /// Build and validate a config from its tables.
    pub fn from_parts(
        activities:   BTreeMap<ActivityId, ActivityDef>,
        growth_stats: BTreeMap<GrowthStatId, GrowthStatDef>,
        life_stages:  Vec<LifeStage>,
        tuning:       Tuning,
    ) -> SimResult<Self> {
        let config = Self { activities, growth_stats, life_stages, tuning };
        config.validate()?;
        Ok(config)
    }

    /// The tables the game ships with.
    pub fn builtin() -> Self {
        use ActivityId as A;
        use GrowthCategory::{Magical, Physical};
        use GrowthStatId as G;
        use Resource as R;

        fn req(growth: GrowthStatId, level: u32) -> Option<UnlockRequirement> {
            Some(UnlockRequirement { growth, level })
        }
        fn act(name: &str, resource: Resource, base_rate: f64, unlock_req: Option<UnlockRequirement>) -> ActivityDef {
            ActivityDef { name: name.into(), resource, base_rate, unlock_req }
        }
        fn stat(
            name: &str,
            category: GrowthCategory,
            base_xp_req: f64,
            unlock_req: Option<UnlockRequirement>,
            effect: &str,
        ) -> GrowthStatDef {
            GrowthStatDef { name: name.into(), category, base_xp_req, unlock_req, effect: effect.into() }
        }

        let activities = BTreeMap::from([
            (A::AbsorbWater,          act("Absorb Water", R::Water, 1.0, None)),
            (A::Photosynthesize,      act("Photosynthesize", R::Sunlight, 0.8, req(G::LeafSize, 1))),
            (A::ExtendRoots,          act("Extend Roots", R::Nutrients, 0.5, req(G::RootDepth, 1))),
            (A::DeepTapRoot,          act("Deep Tap Root", R::Nutrients, 2.0, req(G::RootDepth, 10))),
            (A::BroadCanopy,          act("Broad Canopy", R::Sunlight, 3.0, req(G::LeafSize, 10))),
            (A::NightBloom,           act("Night Bloom", R::Moonlight, 0.3, req(G::FlowerBuds, 5))),
            (A::ChannelEssence,       act("Channel Essence", R::Essence, 0.1, req(G::EssenceAbsorption, 5))),
            (A::AncientRoots,         act("Ancient Roots", R::Nutrients, 10.0, req(G::RootDepth, 25))),
            (A::CosmicPhotosynthesis, act("Cosmic Photosynthesis", R::Sunlight, 15.0, req(G::CosmicAttunement, 5))),
        ]);

        let growth_stats = BTreeMap::from([
            (G::RootDepth,         stat("Root Depth", Physical, 10.0, None, "Unlocks nutrient activities")),
            (G::StemHeight,        stat("Stem Height", Physical, 15.0, None, "Increases sunlight gain")),
            (G::LeafSize,          stat("Leaf Size", Physical, 12.0, None, "Multiplies photosynthesis")),
            (G::FlowerBuds,        stat("Flower Buds", Physical, 20.0, req(G::StemHeight, 5), "Unlocks moonlight activities")),
            (G::EssenceAbsorption, stat("Essence Absorption", Magical, 50.0, req(G::FlowerBuds, 10), "Unlocks essence activities")),
            (G::AuraStrength,      stat("Aura Strength", Magical, 80.0, req(G::EssenceAbsorption, 5), "Multiplies all resource gain")),
            (G::AncientMemory,     stat("Ancient Memory", Magical, 100.0, req(G::AuraStrength, 10), "Increases rebirth multipliers")),
            (G::CosmicAttunement,  stat("Cosmic Attunement", Magical, 150.0, req(G::AncientMemory, 10), "Unlocks final tier activities")),
        ]);

        let life_stages = [
            ("Seed", 0), ("Sprout", 5), ("Sapling", 20),
            ("Mature", 50), ("Ancient", 100), ("Withering", 200),
        ]
        .into_iter()
        .map(|(name, min_levels)| LifeStage { name: name.into(), min_levels })
        .collect();

        Self { activities, growth_stats, life_stages, tuning: Tuning::default() }
    }

    // ── Lookups ────────────────────────────────────────────────────

    pub fn activity(&self, id: ActivityId) -> &ActivityDef {
        &self.activities[&id]
    }

    pub fn growth_stat(&self, id: GrowthStatId) -> &GrowthStatDef {
        &self.growth_stats[&id]
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn life_stages(&self) -> &[LifeStage] {
        &self.life_stages
    }

    /// Last stage whose threshold is at or below `total_levels`.
    pub fn life_stage_for(&self, total_levels: u32) -> &LifeStage {
        let mut stage = &self.life_stages[0];
        for s in &self.life_stages {
            if total_levels >= s.min_levels {
                stage = s;
            }
        }
        stage
    }

    // ── Validation ─────────────────────────────────────────────────

    fn validate(&self) -> SimResult<()> {
        let t = &self.tuning;
        if !(t.days_per_second.is_finite() && t.days_per_second > 0.0) {
            return Err(invalid(format!("days_per_second must be positive, got {}", t.days_per_second)));
        }
        if !(t.xp_per_second.is_finite() && t.xp_per_second > 0.0) {
            return Err(invalid(format!("xp_per_second must be positive, got {}", t.xp_per_second)));
        }
        if !(t.level_cost_growth.is_finite() && t.level_cost_growth > 1.0) {
            return Err(invalid(format!("level_cost_growth must exceed 1, got {}", t.level_cost_growth)));
        }
        if t.save_interval_ticks == 0 {
            return Err(invalid("save_interval_ticks must be at least 1"));
        }
        if t.rebirth_min_total_levels == 0 {
            return Err(invalid("rebirth_min_total_levels must be at least 1"));
        }
        self.check_base_xp("activity_base_xp", t.activity_base_xp)?;

        for id in ActivityId::ALL {
            let def = self.activities.get(&id)
                .ok_or_else(|| invalid(format!("missing activity definition: {id}")))?;
            if !(def.base_rate.is_finite() && def.base_rate >= 0.0) {
                return Err(invalid(format!("{id}: base_rate must be non-negative, got {}", def.base_rate)));
            }
        }

        for id in GrowthStatId::ALL {
            let def = self.growth_stats.get(&id)
                .ok_or_else(|| invalid(format!("missing growth stat definition: {id}")))?;
            self.check_base_xp(id.key(), def.base_xp_req)?;
            if matches!(&def.unlock_req, Some(r) if r.growth == id && r.level > 0) {
                return Err(invalid(format!("{id}: unlock requirement on itself can never be met")));
            }
        }

        match self.life_stages.first() {
            Some(first) if first.min_levels == 0 => {}
            _ => return Err(invalid("life stages must start at 0 total levels")),
        }
        if self.life_stages.windows(2).any(|w| w[1].min_levels <= w[0].min_levels) {
            return Err(invalid("life stage thresholds must be strictly increasing"));
        }

        let default_locked = |req: &Option<UnlockRequirement>| matches!(req, Some(r) if r.level > 0);
        if default_locked(&self.activity(t.default_activity).unlock_req) {
            return Err(invalid(format!("default activity {} is locked on a fresh life", t.default_activity)));
        }
        if default_locked(&self.growth_stat(t.default_growth).unlock_req) {
            return Err(invalid(format!("default growth {} is locked on a fresh life", t.default_growth)));
        }
        Ok(())
    }

    /// floor(b·g^(L+1)) > floor(b·g^L) for every L whenever b·(g−1) ≥ 1,
    /// and floor(b·g^0) == b needs an integral b.
    fn check_base_xp(&self, what: &str, base: f64) -> SimResult<()> {
        if !base.is_finite() || base.fract() != 0.0 || base < 1.0 {
            return Err(invalid(format!("{what}: base XP must be a positive integer, got {base}")));
        }
        if base * (self.tuning.level_cost_growth - 1.0) < 1.0 {
            return Err(invalid(format!(
                "{what}: base XP {base} too small for cost growth {}",
                self.tuning.level_cost_growth
            )));
        }
        Ok(())
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

fn invalid(reason: impl Into<String>) -> SimError {
    SimError::InvalidConfig { reason: reason.into() }
}
