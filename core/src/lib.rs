//! Plant Life: the progression engine of an idle growth game.
//!
//! One plant gathers resources through a selected activity while its
//! growth stats level up, unlocking new activities and boosting rates.
//! Rebirth trades a life's progress for permanent growth multipliers.
//!
//! `engine::PlantEngine` is the entry point; everything else is the
//! machinery it drives.

pub mod calendar;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod prestige;
pub mod rates;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod tick;
pub mod types;
pub mod unlock;
