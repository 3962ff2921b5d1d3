//! The simulation engine: the owning context for one plant.
//!
//! EXECUTION ORDER per tick (fixed, documented, never reordered):
//!   1. Tick transition (`tick::advance`): calendar, activity, growth.
//!   2. Persist the state every `save_interval_ticks` ticks.
//!   3. Translate the tick report into signals.
//!   4. Append loggable signals to the event log.
//!
//! RULES:
//!   - The engine owns the only `ProgressState`; there are no globals.
//!   - Ticks are strictly sequential; a tick never observes a partial one.
//!   - Persistence failures are logged and never interrupt the simulation.
//!   - Invalid commands are ignored, not errors.

use crate::{
    config::{LifeStage, PlantConfig, RESET_CONFIRMATION, SAVE_KEY},
    command::PlayerCommand,
    error::SimResult,
    event::{EngineSignal, EventLogEntry},
    prestige,
    rates,
    snapshot,
    state::ProgressState,
    store::PlantStore,
    tick::{self, TickReport},
    types::{ActivityId, EntityId, GrowthStatId, Tick},
    unlock,
};
use chrono::Utc;
use std::collections::BTreeMap;
use uuid::Uuid;

pub struct PlantEngine {
    state:              ProgressState,
    config:             PlantConfig,
    store:              PlantStore,
    /// Keys this build's event-log rows; `ticks` restarts at 0 per build.
    session_id:         EntityId,
    ticks:              Tick,
    needs_full_refresh: bool,
}

impl PlantEngine {
    /// Build an engine, resuming from the save slot when it holds a
    /// readable snapshot and starting a fresh plant otherwise.
    pub fn build(config: PlantConfig, store: PlantStore) -> Self {
        let state = match store.load_state(SAVE_KEY) {
            Ok(Some(json)) => match snapshot::decode(&json, &config) {
                Ok(state) => {
                    log::info!(
                        "Resumed plant: lifetime {}, year {}, {} total growth levels",
                        state.calendar.lifetime_count,
                        state.calendar.year,
                        state.total_growth_levels()
                    );
                    state
                }
                Err(e) => {
                    log::warn!("Saved state rejected, starting fresh: {e}");
                    ProgressState::new(&config)
                }
            },
            Ok(None) => ProgressState::new(&config),
            Err(e) => {
                log::warn!("Cannot read saved state, starting fresh: {e}");
                ProgressState::new(&config)
            }
        };

        let session_id = Uuid::new_v4().to_string();
        log::debug!("Engine session {session_id} started");

        Self {
            state,
            config,
            store,
            session_id,
            ticks: 0,
            needs_full_refresh: true,
        }
    }

    /// Builtin tables on a migrated in-memory store.
    pub fn build_test() -> SimResult<Self> {
        Self::build_test_with(PlantConfig::builtin())
    }

    pub fn build_test_with(config: PlantConfig) -> SimResult<Self> {
        let store = PlantStore::in_memory()?;
        store.migrate()?;
        Ok(Self::build(config, store))
    }

    // ── Tick ───────────────────────────────────────────────────────

    /// Advance the plant by `dt` real seconds. This is the core simulation step.
    pub fn tick(&mut self, dt: f64) -> Vec<EngineSignal> {
        self.ticks += 1;
        let report = tick::advance(&mut self.state, &self.config, dt);

        if self.ticks % self.config.tuning().save_interval_ticks == 0 {
            self.persist();
        }

        let signals = self.signals_for(&report);
        self.record(&signals);

        if let Some(up) = &report.growth_level_up {
            log::debug!("tick={} growth {} -> level {}", self.ticks, up.id, up.level);
        }
        if let Some(up) = &report.activity_level_up {
            log::debug!("tick={} activity {} -> level {}", self.ticks, up.id, up.level);
        }
        signals
    }

    /// Run `n` ticks of `dt` seconds each. Used for testing and fast-forward.
    pub fn run_ticks(&mut self, n: u64, dt: f64) -> Vec<EngineSignal> {
        let mut signals = Vec::new();
        for _ in 0..n {
            signals.extend(self.tick(dt));
        }
        signals
    }

    fn signals_for(&mut self, report: &TickReport) -> Vec<EngineSignal> {
        let mut signals = Vec::new();

        if self.needs_full_refresh {
            self.needs_full_refresh = false;
            signals.push(EngineSignal::FullRefreshNeeded);
        } else if report.calendar.day_boundary {
            signals.push(EngineSignal::DayBoundaryCrossed {
                day:  self.state.calendar.day_index(),
                year: self.state.calendar.year,
            });
        }

        if let Some(up) = &report.activity_level_up {
            signals.push(EngineSignal::ActivityLeveledUp { activity: up.id, level: up.level });
        }
        if let Some(up) = &report.growth_level_up {
            signals.push(EngineSignal::GrowthLeveledUp { growth: up.id, level: up.level });
        }
        if !report.new_unlocks.is_empty() {
            signals.push(EngineSignal::NewUnlocksAvailable {
                activities:   report.new_unlocks.activities.iter().copied().collect(),
                growth_stats: report.new_unlocks.growth_stats.iter().copied().collect(),
            });
        }
        if let Some(stage) = &report.life_stage {
            signals.push(EngineSignal::LifeStageChanged { stage: stage.clone() });
        }
        if let Some(eligible) = report.rebirth_eligibility {
            signals.push(EngineSignal::RebirthEligibilityChanged { eligible });
        }
        signals
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Apply a player command immediately. Commands that are not
    /// currently allowed are logged and ignored.
    pub fn execute(&mut self, command: PlayerCommand) -> Vec<EngineSignal> {
        let mut signals = vec![EngineSignal::PlayerCommandReceived {
            command_id:   Uuid::new_v4().to_string(),
            command_type: command.type_name().to_string(),
        }];

        match command {
            PlayerCommand::SelectActivity { id } => {
                if self.activity_unlocked(id) {
                    self.state.selected_activity = Some(id);
                } else {
                    log::debug!("Ignoring selection of locked activity {id}");
                }
            }
            PlayerCommand::SelectGrowth { id } => {
                if self.growth_unlocked(id) {
                    self.state.selected_growth = Some(id);
                } else {
                    log::debug!("Ignoring selection of locked growth stat {id}");
                }
            }
            PlayerCommand::RequestRebirth => {
                match prestige::rebirth(&mut self.state, &self.config) {
                    Some(outcome) => {
                        self.needs_full_refresh = true;
                        self.persist();
                        signals.push(EngineSignal::Reborn {
                            lifetime:    outcome.lifetime,
                            multipliers: outcome.multipliers,
                        });
                        signals.push(EngineSignal::RebirthEligibilityChanged { eligible: false });
                    }
                    None => log::debug!(
                        "Ignoring rebirth request at {} total levels",
                        self.state.total_growth_levels()
                    ),
                }
            }
            PlayerCommand::RequestReset { confirmation } => {
                if confirmation == RESET_CONFIRMATION {
                    self.reset();
                    signals.push(EngineSignal::StateReset);
                } else {
                    log::debug!("Ignoring reset without confirmation");
                }
            }
        }

        self.record(&signals);
        signals
    }

    /// Replace all progress, prestige included, with a fresh plant.
    fn reset(&mut self) {
        self.state = ProgressState::new(&self.config);
        self.needs_full_refresh = true;
        if let Err(e) = self.store.clear_state(SAVE_KEY) {
            log::warn!("Persistence failure clearing save slot: {e}");
        }
        log::info!("Progress reset to a fresh plant");
    }

    // ── Import / export ────────────────────────────────────────────

    pub fn export_snapshot(&self) -> SimResult<String> {
        snapshot::encode_pretty(&self.state)
    }

    /// Replace the active state with an externally supplied snapshot.
    /// On any error the current state is left untouched.
    pub fn import_snapshot(&mut self, json: &str) -> SimResult<()> {
        let imported = snapshot::decode(json, &self.config)?;
        self.store.save_state(SAVE_KEY, &snapshot::encode(&imported)?, Utc::now())?;
        self.state = imported;
        self.needs_full_refresh = true;
        log::info!(
            "Imported snapshot: lifetime {}, {} total growth levels",
            self.state.calendar.lifetime_count,
            self.state.total_growth_levels()
        );
        Ok(())
    }

    /// Write the state to the save slot now.
    pub fn save_now(&self) -> SimResult<()> {
        let json = snapshot::encode(&self.state)?;
        self.store.save_state(SAVE_KEY, &json, Utc::now())
    }

    fn persist(&self) {
        match self.save_now() {
            Ok(()) => log::trace!("tick={} state saved", self.ticks),
            Err(e) => log::warn!("Persistence failure at tick {}: {e}", self.ticks),
        }
    }

    fn record(&self, signals: &[EngineSignal]) {
        for signal in signals.iter().filter(|s| s.is_logged()) {
            let payload = match serde_json::to_string(signal) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Cannot encode {} for the event log: {e}", signal.type_name());
                    continue;
                }
            };
            let entry = EventLogEntry {
                id:         None,
                session_id: self.session_id.clone(),
                tick:       self.ticks,
                lifetime:   self.state.calendar.lifetime_count,
                event_type: signal.type_name().to_string(),
                payload,
            };
            if let Err(e) = self.store.append_event(&entry) {
                log::warn!("Persistence failure appending {}: {e}", entry.event_type);
            }
        }
    }

    // ── Reads for the presentation layer ───────────────────────────

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn store(&self) -> &PlantStore {
        &self.store
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Ticks run since this engine was built.
    pub fn ticks(&self) -> Tick {
        self.ticks
    }

    pub fn life_stage(&self) -> &LifeStage {
        self.config.life_stage_for(self.state.total_growth_levels())
    }

    pub fn activity_rate(&self, id: ActivityId) -> f64 {
        rates::activity_rate(id, &self.state, &self.config)
    }

    pub fn activity_xp_required(&self, id: ActivityId) -> f64 {
        rates::xp_required(&self.config, self.config.tuning().activity_base_xp, self.state.activity(id).level)
    }

    pub fn growth_xp_required(&self, id: GrowthStatId) -> f64 {
        let base = self.config.growth_stat(id).base_xp_req;
        rates::xp_required(&self.config, base, self.state.growth(id).level)
    }

    pub fn activity_unlocked(&self, id: ActivityId) -> bool {
        unlock::activity_unlocked(id, &self.state, &self.config)
    }

    pub fn growth_unlocked(&self, id: GrowthStatId) -> bool {
        unlock::growth_unlocked(id, &self.state, &self.config)
    }

    pub fn rebirth_eligible(&self) -> bool {
        prestige::is_eligible(&self.state, &self.config)
    }

    /// Multipliers a rebirth right now would leave behind.
    pub fn rebirth_preview(&self) -> BTreeMap<GrowthStatId, f64> {
        prestige::preview(&self.state).0
    }

    /// Events this session logged at `tick`.
    pub fn store_events_for_tick(&self, tick: Tick) -> SimResult<Vec<EventLogEntry>> {
        self.store.events_for_tick(&self.session_id, tick)
    }
}
