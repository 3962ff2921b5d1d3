//! Signals from the engine to the presentation layer.
//!
//! RULE: the engine never touches a display. Everything a renderer needs
//! to know about a change arrives as an `EngineSignal`; everything else
//! it reads through the engine's accessors.
//! Variants are appended only, never removed or reordered.

use crate::types::{ActivityId, EntityId, GrowthStatId, Tick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineSignal {
    // ── Render invalidation ────────────────────────
    /// Repaint everything: first tick after load, import, rebirth or reset.
    FullRefreshNeeded,
    /// Integer day changed: refresh time, resources and progress bars.
    DayBoundaryCrossed {
        day:  u64,
        year: u32,
    },

    // ── Progression ────────────────────────────────
    ActivityLeveledUp {
        activity: ActivityId,
        level:    u32,
    },
    GrowthLeveledUp {
        growth: GrowthStatId,
        level:  u32,
    },
    NewUnlocksAvailable {
        activities:   Vec<ActivityId>,
        growth_stats: Vec<GrowthStatId>,
    },
    LifeStageChanged {
        stage: String,
    },

    // ── Prestige ───────────────────────────────────
    RebirthEligibilityChanged {
        eligible: bool,
    },
    Reborn {
        lifetime:    u32,
        multipliers: BTreeMap<GrowthStatId, f64>,
    },
    StateReset,

    // ── Player command events ──────────────────────
    PlayerCommandReceived {
        command_id:   EntityId,
        command_type: String,
    },
}

impl EngineSignal {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FullRefreshNeeded                => "full_refresh_needed",
            Self::DayBoundaryCrossed { .. }        => "day_boundary_crossed",
            Self::ActivityLeveledUp { .. }         => "activity_leveled_up",
            Self::GrowthLeveledUp { .. }           => "growth_leveled_up",
            Self::NewUnlocksAvailable { .. }       => "new_unlocks_available",
            Self::LifeStageChanged { .. }          => "life_stage_changed",
            Self::RebirthEligibilityChanged { .. } => "rebirth_eligibility_changed",
            Self::Reborn { .. }                    => "reborn",
            Self::StateReset                       => "state_reset",
            Self::PlayerCommandReceived { .. }     => "player_command_received",
        }
    }

    /// Render-invalidation signals are not worth a row in the log.
    pub fn is_logged(&self) -> bool {
        !matches!(self, Self::FullRefreshNeeded | Self::DayBoundaryCrossed { .. })
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    /// Engine build that wrote the row; ticks restart at 0 on every build.
    pub session_id: EntityId,
    pub tick:       Tick,
    pub lifetime:   u32,
    pub event_type: String,
    pub payload:    String, // JSON-serialized EngineSignal
}
