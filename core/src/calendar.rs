//! In-game calendar: day within year, year, total elapsed days, lifetimes.
//!
//! Time is fixed point. One day is `DAY_UNITS` micro-days, so long idle
//! sessions never drift the way a summed f64 day counter would.
//!
//! ROUNDING: each advance is rounded once, to the nearest micro-day
//! (half away from zero). The integer day used for day-boundary
//! detection is `day_units / DAY_UNITS`, i.e. floor.

use serde::{Deserialize, Serialize};

/// Micro-days per day.
pub const DAY_UNITS: u64 = 1_000_000;
pub const DAYS_PER_YEAR: u64 = 365;
pub const YEAR_UNITS: u64 = DAY_UNITS * DAYS_PER_YEAR;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    /// Position within the current year, always < YEAR_UNITS.
    day_units:          u64,
    pub year:           u32,
    /// Days lived across every life, in micro-days.
    total_units:        u64,
    pub lifetime_count: u32,
}

/// What changed during one calendar advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarAdvance {
    /// The integer day or the year changed.
    pub day_boundary: bool,
    pub years_rolled: u32,
}

impl Calendar {
    /// Day 1 of year 1 in the first life.
    pub fn new() -> Self {
        Self {
            day_units:      DAY_UNITS,
            year:           1,
            total_units:    0,
            lifetime_count: 1,
        }
    }

    /// A calendar positioned at `day` (fractional) of `year`.
    /// Returns None when `day` is outside [0, 365).
    pub fn at(day: f64, year: u32) -> Option<Self> {
        let units = days_to_units(day)?;
        if units >= YEAR_UNITS {
            return None;
        }
        Some(Self { day_units: units, year, ..Self::new() })
    }

    /// Advance by a (possibly large) number of days. Whole years are
    /// carried out of the day counter one by one into `year`.
    pub fn advance(&mut self, days: f64) -> CalendarAdvance {
        let Some(units) = days_to_units(days) else {
            return CalendarAdvance::default();
        };
        let prev_day = self.day_index();
        let prev_year = self.year;

        let mut years = units / YEAR_UNITS;
        self.day_units += units % YEAR_UNITS;
        if self.day_units >= YEAR_UNITS {
            self.day_units -= YEAR_UNITS;
            years += 1;
        }
        let years = u32::try_from(years).unwrap_or(u32::MAX);
        self.year = self.year.saturating_add(years);
        self.total_units = self.total_units.saturating_add(units);

        CalendarAdvance {
            day_boundary: self.day_index() != prev_day || self.year != prev_year,
            years_rolled: years,
        }
    }

    /// Start a new life: back to day 1 of year 1.
    /// Total elapsed days carry over as a lifetime statistic.
    pub fn start_new_life(&mut self) {
        self.day_units = DAY_UNITS;
        self.year = 1;
        self.lifetime_count = self.lifetime_count.saturating_add(1);
    }

    /// Fractional day within the current year, in [0, 365).
    pub fn day_within_year(&self) -> f64 {
        self.day_units as f64 / DAY_UNITS as f64
    }

    /// floor(day_within_year).
    pub fn day_index(&self) -> u64 {
        self.day_units / DAY_UNITS
    }

    pub fn total_elapsed_days(&self) -> f64 {
        self.total_units as f64 / DAY_UNITS as f64
    }

    /// Holds for every calendar this module produced; imports may not.
    pub fn is_valid(&self) -> bool {
        self.day_units < YEAR_UNITS && self.year >= 1 && self.lifetime_count >= 1
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

/// Days to micro-days. None for negative or non-finite input.
fn days_to_units(days: f64) -> Option<u64> {
    if !days.is_finite() || days < 0.0 {
        return None;
    }
    // `as` saturates at u64::MAX for absurdly large inputs.
    Some((days * DAY_UNITS as f64).round() as u64)
}
