//! Snapshot serialization: full progress state to/from JSON.
//!
//! Snapshots are versionless and written wholesale. Decoding is lenient
//! about missing entries (they are zero-filled, as older saves omit
//! them) and strict about everything else: unknown ids, wrong shapes,
//! negative or non-finite numbers and out-of-range calendars are all
//! `MalformedSnapshot`.

use crate::{
    config::PlantConfig,
    error::{SimError, SimResult},
    state::ProgressState,
    tick,
};
use chrono::NaiveDate;

pub fn encode(state: &ProgressState) -> SimResult<String> {
    Ok(serde_json::to_string(state)?)
}

pub fn encode_pretty(state: &ProgressState) -> SimResult<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parse and validate a snapshot. Pending level-ups are resolved so the
/// returned state satisfies xp < requirement everywhere.
pub fn decode(json: &str, config: &PlantConfig) -> SimResult<ProgressState> {
    let mut state: ProgressState =
        serde_json::from_str(json).map_err(|e| SimError::malformed(e.to_string()))?;
    state.fill_missing();
    validate(&state)?;
    tick::settle_levels(&mut state, config);
    Ok(state)
}

/// Default file name for an exported save.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("plant-life-save-{}.json", date.format("%Y-%m-%d"))
}

fn validate(state: &ProgressState) -> SimResult<()> {
    if !state.calendar.is_valid() {
        return Err(SimError::malformed(format!(
            "calendar out of range: day {} year {} lifetime {}",
            state.calendar.day_within_year(),
            state.calendar.year,
            state.calendar.lifetime_count
        )));
    }
    for (kind, amount) in &state.resources {
        if !(amount.is_finite() && *amount >= 0.0) {
            return Err(SimError::malformed(format!("resource {} is {amount}", kind.name())));
        }
    }
    for (id, progress) in &state.activity_progress {
        if !(progress.xp.is_finite() && progress.xp >= 0.0) {
            return Err(SimError::malformed(format!("activity {id} xp is {}", progress.xp)));
        }
    }
    for (id, progress) in &state.growth_progress {
        if !(progress.xp.is_finite() && progress.xp >= 0.0) {
            return Err(SimError::malformed(format!("growth {id} xp is {}", progress.xp)));
        }
    }
    for (id, multiplier) in &state.prestige.multipliers {
        if !(multiplier.is_finite() && *multiplier >= 1.0) {
            return Err(SimError::malformed(format!("growth {id} multiplier is {multiplier}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityId, GrowthStatId, Resource};

    #[test]
    fn missing_entries_are_zero_filled() {
        let config = PlantConfig::builtin();
        let json = r#"{
            "resources": { "water": 12.5 },
            "selectedActivity": "absorbWater",
            "growthProgress": { "leafSize": { "xp": 3.0, "level": 4 } }
        }"#;
        let state = decode(json, &config).unwrap();
        assert_eq!(state.resource(Resource::Water), 12.5);
        assert_eq!(state.resource(Resource::Essence), 0.0);
        assert_eq!(state.growth_level(GrowthStatId::LeafSize), 4);
        assert_eq!(state.activity_progress.len(), ActivityId::ALL.len());
        assert_eq!(state.selected_growth, None);
        assert_eq!(state.calendar.lifetime_count, 1);
    }

    #[test]
    fn unknown_ids_are_malformed() {
        let config = PlantConfig::builtin();
        let json = r#"{ "growthProgress": { "thornCount": { "xp": 0.0, "level": 1 } } }"#;
        let err = decode(json, &config).unwrap_err();
        assert!(matches!(err, SimError::MalformedSnapshot { .. }), "got {err:?}");
    }

    #[test]
    fn negative_resources_are_malformed() {
        let config = PlantConfig::builtin();
        let json = r#"{ "resources": { "sunlight": -4.0 } }"#;
        assert!(matches!(decode(json, &config), Err(SimError::MalformedSnapshot { .. })));
    }

    #[test]
    fn out_of_range_day_is_malformed() {
        let config = PlantConfig::builtin();
        let json = r#"{ "calendar": { "dayUnits": 365000000, "year": 1, "totalUnits": 0, "lifetimeCount": 1 } }"#;
        assert!(matches!(decode(json, &config), Err(SimError::MalformedSnapshot { .. })));
    }

    #[test]
    fn not_json_is_malformed() {
        let config = PlantConfig::builtin();
        assert!(matches!(decode("plant", &config), Err(SimError::MalformedSnapshot { .. })));
    }

    #[test]
    fn pending_xp_is_settled_on_decode() {
        let config = PlantConfig::builtin();
        let json = r#"{ "activityProgress": { "absorbWater": { "xp": 50.0, "level": 0 } } }"#;
        let state = decode(json, &config).unwrap();
        let progress = state.activity(ActivityId::AbsorbWater);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp, 7.0);
    }

    #[test]
    fn export_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "plant-life-save-2024-03-09.json");
    }
}
