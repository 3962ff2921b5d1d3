//! The tick engine's state transition.
//!
//! ORDER (fixed, every tick):
//!   1. Advance the calendar by dt × days_per_second.
//!   2. Selected activity: resources, activity XP, level-ups.
//!   3. Selected growth stat: growth XP, level-ups.
//!   4. Diff unlocks, rebirth eligibility and life stage against the
//!      values from before step 2.
//!
//! `advance()` is pure state mutation. Persistence and signal emission
//! belong to `PlantEngine`.

use crate::{
    calendar::CalendarAdvance,
    config::PlantConfig,
    prestige,
    rates,
    state::ProgressState,
    types::{ActivityId, GrowthStatId, Resource},
    unlock::{self, UnlockSet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp<Id> {
    pub id:            Id,
    /// Level after the tick.
    pub level:         u32,
    pub levels_gained: u32,
}

/// Everything one tick changed that a caller may want to react to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// The dt actually applied, after sanitizing.
    pub dt:                   f64,
    pub calendar:             CalendarAdvance,
    pub resource_gained:      Option<(Resource, f64)>,
    pub activity_level_up:    Option<LevelUp<ActivityId>>,
    pub growth_level_up:      Option<LevelUp<GrowthStatId>>,
    pub new_unlocks:          UnlockSet,
    /// New eligibility, present only when it changed.
    pub rebirth_eligibility:  Option<bool>,
    /// New life stage name, present only when it changed.
    pub life_stage:           Option<String>,
}

impl TickReport {
    pub fn leveled_up(&self) -> bool {
        self.activity_level_up.is_some() || self.growth_level_up.is_some()
    }
}

/// Advance `state` by `dt` real seconds.
pub fn advance(state: &mut ProgressState, config: &PlantConfig, dt: f64) -> TickReport {
    let dt = sanitize_dt(dt);
    let mut report = TickReport { dt, ..TickReport::default() };

    report.calendar = state.calendar.advance(dt * config.tuning().days_per_second);

    let unlocks_before = UnlockSet::capture(state, config);
    let eligible_before = prestige::is_eligible(state, config);
    let stage_before = config.life_stage_for(state.total_growth_levels()).min_levels;

    if let Some(id) = state.selected_activity {
        if unlock::activity_unlocked(id, state, config) {
            let def = config.activity(id);
            let gained = rates::saturating_gain(0.0, rates::activity_rate(id, state, config) * dt);
            state.add_resource(def.resource, gained);
            report.resource_gained = Some((def.resource, gained));

            let xp = rates::activity_xp_gain(config, dt);
            let base = config.tuning().activity_base_xp;
            let progress = state.activity_mut(id);
            progress.xp = rates::saturating_gain(progress.xp, xp);
            let levels = rates::resolve_level_ups(progress, base, config);
            if levels > 0 {
                report.activity_level_up = Some(LevelUp { id, level: progress.level, levels_gained: levels });
            }
        }
    }

    if let Some(id) = state.selected_growth {
        if unlock::growth_unlocked(id, state, config) {
            let xp = rates::growth_xp_gain(id, state, config, dt);
            let base = config.growth_stat(id).base_xp_req;
            let progress = state.growth_mut(id);
            progress.xp = rates::saturating_gain(progress.xp, xp);
            let levels = rates::resolve_level_ups(progress, base, config);
            if levels > 0 {
                report.growth_level_up = Some(LevelUp { id, level: progress.level, levels_gained: levels });
            }
        }
    }

    // Only level-ups can change unlocks, eligibility or stage.
    if report.leveled_up() {
        report.new_unlocks = UnlockSet::capture(state, config).newly_unlocked_since(&unlocks_before);

        let eligible_after = prestige::is_eligible(state, config);
        if eligible_after != eligible_before {
            report.rebirth_eligibility = Some(eligible_after);
        }

        let stage_after = config.life_stage_for(state.total_growth_levels());
        if stage_after.min_levels != stage_before {
            report.life_stage = Some(stage_after.name.clone());
        }
    }

    report
}

/// Resolve every pending level-up without advancing time. Used after
/// loading a snapshot that may carry unspent XP.
pub fn settle_levels(state: &mut ProgressState, config: &PlantConfig) {
    let activity_base = config.tuning().activity_base_xp;
    for id in ActivityId::ALL {
        rates::resolve_level_ups(state.activity_mut(id), activity_base, config);
    }
    for id in GrowthStatId::ALL {
        let base = config.growth_stat(id).base_xp_req;
        rates::resolve_level_ups(state.growth_mut(id), base, config);
    }
}

fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("ignoring invalid tick delta {dt}; treating as 0");
        0.0
    }
}
