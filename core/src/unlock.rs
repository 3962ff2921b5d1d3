//! Unlock resolver: is an activity or growth stat accessible right now?
//!
//! Pure reads of growth levels. No caching; every call re-evaluates.

use crate::{
    config::{PlantConfig, UnlockRequirement},
    state::ProgressState,
    types::{ActivityId, GrowthStatId},
};
use std::collections::BTreeSet;

/// True when there is no requirement or the required growth stat has
/// reached the required level.
pub fn is_unlocked(requirement: Option<&UnlockRequirement>, state: &ProgressState) -> bool {
    match requirement {
        None => true,
        Some(req) => state.growth_level(req.growth) >= req.level,
    }
}

pub fn activity_unlocked(id: ActivityId, state: &ProgressState, config: &PlantConfig) -> bool {
    is_unlocked(config.activity(id).unlock_req.as_ref(), state)
}

pub fn growth_unlocked(id: GrowthStatId, state: &ProgressState, config: &PlantConfig) -> bool {
    is_unlocked(config.growth_stat(id).unlock_req.as_ref(), state)
}

/// Every unlocked id at one instant, for before/after comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnlockSet {
    pub activities:   BTreeSet<ActivityId>,
    pub growth_stats: BTreeSet<GrowthStatId>,
}

impl UnlockSet {
    pub fn capture(state: &ProgressState, config: &PlantConfig) -> Self {
        Self {
            activities: ActivityId::ALL
                .into_iter()
                .filter(|id| activity_unlocked(*id, state, config))
                .collect(),
            growth_stats: GrowthStatId::ALL
                .into_iter()
                .filter(|id| growth_unlocked(*id, state, config))
                .collect(),
        }
    }

    /// Ids unlocked in `self` but not in `before`.
    pub fn newly_unlocked_since(&self, before: &UnlockSet) -> UnlockSet {
        UnlockSet {
            activities:   self.activities.difference(&before.activities).copied().collect(),
            growth_stats: self.growth_stats.difference(&before.growth_stats).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty() && self.growth_stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_entries_are_always_unlocked() {
        let config = PlantConfig::builtin();
        let state = ProgressState::new(&config);
        assert!(activity_unlocked(ActivityId::AbsorbWater, &state, &config));
        assert!(growth_unlocked(GrowthStatId::RootDepth, &state, &config));
        assert!(!activity_unlocked(ActivityId::Photosynthesize, &state, &config));
        assert!(!growth_unlocked(GrowthStatId::FlowerBuds, &state, &config));
    }

    #[test]
    fn threshold_is_inclusive() {
        let config = PlantConfig::builtin();
        let mut state = ProgressState::new(&config);
        state.growth_mut(GrowthStatId::RootDepth).level = 9;
        assert!(!activity_unlocked(ActivityId::DeepTapRoot, &state, &config));
        state.growth_mut(GrowthStatId::RootDepth).level = 10;
        assert!(activity_unlocked(ActivityId::DeepTapRoot, &state, &config));
    }

    #[test]
    fn resolver_is_idempotent() {
        let config = PlantConfig::builtin();
        let mut state = ProgressState::new(&config);
        state.growth_mut(GrowthStatId::StemHeight).level = 5;
        let first = UnlockSet::capture(&state, &config);
        let second = UnlockSet::capture(&state, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn newly_unlocked_reports_only_the_difference() {
        let config = PlantConfig::builtin();
        let mut state = ProgressState::new(&config);
        let before = UnlockSet::capture(&state, &config);
        state.growth_mut(GrowthStatId::LeafSize).level = 1;
        state.growth_mut(GrowthStatId::StemHeight).level = 5;
        let fresh = UnlockSet::capture(&state, &config).newly_unlocked_since(&before);
        assert_eq!(fresh.activities.into_iter().collect::<Vec<_>>(), vec![ActivityId::Photosynthesize]);
        assert_eq!(fresh.growth_stats.into_iter().collect::<Vec<_>>(), vec![GrowthStatId::FlowerBuds]);
    }
}
