//! The progress model: the single mutable aggregate of a plant's run.
//!
//! RULE: only the tick engine (`tick.rs`) and the prestige controller
//! (`prestige.rs`) mutate a `ProgressState` held by the engine. Commands
//! change the selections and nothing else.

use crate::{
    calendar::Calendar,
    config::PlantConfig,
    rates,
    types::{ActivityId, GrowthStatId, Resource},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// XP towards the next level plus the level itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelProgress {
    pub xp:    f64,
    pub level: u32,
}

/// Permanent rebirth state. Survives every rebirth; only a full reset
/// clears it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestigeState {
    /// Growth XP multiplier per stat. Never decreases.
    #[serde(default)]
    pub multipliers:       BTreeMap<GrowthStatId, f64>,
    /// Highest level each stat has reached in any finished life.
    #[serde(default)]
    pub max_level_reached: BTreeMap<GrowthStatId, u32>,
}

impl PrestigeState {
    pub fn multiplier(&self, id: GrowthStatId) -> f64 {
        self.multipliers.get(&id).copied().unwrap_or(1.0)
    }

    pub fn max_level(&self, id: GrowthStatId) -> u32 {
        self.max_level_reached.get(&id).copied().unwrap_or(0)
    }

    fn fill_missing(&mut self) {
        for id in GrowthStatId::ALL {
            self.multipliers.entry(id).or_insert(1.0);
            self.max_level_reached.entry(id).or_insert(0);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    #[serde(default)]
    pub calendar:          Calendar,
    #[serde(default)]
    pub resources:         BTreeMap<Resource, f64>,
    #[serde(default)]
    pub selected_activity: Option<ActivityId>,
    #[serde(default)]
    pub selected_growth:   Option<GrowthStatId>,
    #[serde(default)]
    pub activity_progress: BTreeMap<ActivityId, LevelProgress>,
    #[serde(default)]
    pub growth_progress:   BTreeMap<GrowthStatId, LevelProgress>,
    #[serde(default)]
    pub prestige:          PrestigeState,
}

impl ProgressState {
    /// A fresh first life with the configured default selections.
    pub fn new(config: &PlantConfig) -> Self {
        let mut state = Self {
            calendar:          Calendar::new(),
            resources:         BTreeMap::new(),
            selected_activity: Some(config.tuning().default_activity),
            selected_growth:   Some(config.tuning().default_growth),
            activity_progress: BTreeMap::new(),
            growth_progress:   BTreeMap::new(),
            prestige:          PrestigeState::default(),
        };
        state.fill_missing();
        state
    }

    /// Insert zeroed entries for every resource and id that has none.
    /// Older or hand-edited saves may omit entries.
    pub fn fill_missing(&mut self) {
        for kind in Resource::ALL {
            self.resources.entry(kind).or_insert(0.0);
        }
        for id in ActivityId::ALL {
            self.activity_progress.entry(id).or_default();
        }
        for id in GrowthStatId::ALL {
            self.growth_progress.entry(id).or_default();
        }
        self.prestige.fill_missing();
    }

    /// Clear everything that belongs to the current life. The calendar
    /// moves to a new lifetime; prestige state is untouched.
    pub fn start_new_life(&mut self, config: &PlantConfig) {
        self.calendar.start_new_life();
        for amount in self.resources.values_mut() {
            *amount = 0.0;
        }
        for progress in self.activity_progress.values_mut() {
            *progress = LevelProgress::default();
        }
        for progress in self.growth_progress.values_mut() {
            *progress = LevelProgress::default();
        }
        self.selected_activity = Some(config.tuning().default_activity);
        self.selected_growth = Some(config.tuning().default_growth);
        self.fill_missing();
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub fn resource(&self, kind: Resource) -> f64 {
        self.resources.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn activity(&self, id: ActivityId) -> LevelProgress {
        self.activity_progress.get(&id).copied().unwrap_or_default()
    }

    pub fn growth(&self, id: GrowthStatId) -> LevelProgress {
        self.growth_progress.get(&id).copied().unwrap_or_default()
    }

    pub fn growth_level(&self, id: GrowthStatId) -> u32 {
        self.growth(id).level
    }

    /// Sum of every growth stat's level; drives life stage and rebirth.
    pub fn total_growth_levels(&self) -> u32 {
        self.growth_progress
            .values()
            .fold(0u32, |acc, p| acc.saturating_add(p.level))
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Saturates at `f64::MAX`.
    pub fn add_resource(&mut self, kind: Resource, amount: f64) {
        let total = self.resources.entry(kind).or_insert(0.0);
        *total = rates::saturating_gain(*total, amount);
    }

    pub fn activity_mut(&mut self, id: ActivityId) -> &mut LevelProgress {
        self.activity_progress.entry(id).or_default()
    }

    pub fn growth_mut(&mut self, id: GrowthStatId) -> &mut LevelProgress {
        self.growth_progress.entry(id).or_default()
    }
}
