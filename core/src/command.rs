use crate::types::{ActivityId, GrowthStatId};
use serde::{Deserialize, Serialize};

/// All player-issued commands forwarded by the UI layer.
/// Variants are appended only, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Ignored while the activity is locked.
    SelectActivity { id: ActivityId },
    /// Ignored while the growth stat is locked.
    SelectGrowth { id: GrowthStatId },
    /// Ignored while rebirth is not yet available.
    RequestRebirth,
    /// Wipes all progress; `confirmation` must equal "RESET".
    RequestReset { confirmation: String },
}

impl PlayerCommand {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SelectActivity { .. } => "select_activity",
            Self::SelectGrowth { .. }   => "select_growth",
            Self::RequestRebirth        => "request_rebirth",
            Self::RequestReset { .. }   => "request_reset",
        }
    }
}
