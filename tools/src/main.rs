//! plant-runner: headless driver for the Plant Life progression engine.
//!
//! Usage:
//!   plant-runner --seconds 600 --dt 0.1 --db plant.db
//!   plant-runner --growth leafSize --export save.json
//!   plant-runner --import save.json --seconds 60 --export
//!   plant-runner --realtime --seconds 30
//!   plant-runner --ipc-mode

use anyhow::{Context, Result};
use plantlife_core::{
    command::PlayerCommand,
    config::PlantConfig,
    engine::PlantEngine,
    event::EngineSignal,
    snapshot,
    store::PlantStore,
    types::{ActivityId, GrowthStatId, Resource, Tick},
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick {
        seconds: f64,
        #[serde(default = "default_dt")]
        dt: f64,
    },
    Command {
        command: PlayerCommand,
    },
    Export,
    Import {
        snapshot: String,
    },
    Quit,
}

fn default_dt() -> f64 {
    0.1
}

#[derive(serde::Serialize)]
struct IpcReply {
    state:   UiState,
    signals: Vec<EngineSignal>,
}

#[derive(serde::Serialize)]
struct UiState {
    ticks:             Tick,
    day:               u64,
    year:              u32,
    lifetime:          u32,
    total_days:        f64,
    life_stage:        String,
    total_levels:      u32,
    resources:         BTreeMap<Resource, f64>,
    selected_activity: Option<ActivityId>,
    selected_growth:   Option<GrowthStatId>,
    activities:        Vec<ActivityRow>,
    growth_stats:      Vec<GrowthRow>,
    rebirth_eligible:  bool,
    rebirth_preview:   BTreeMap<GrowthStatId, f64>,
}

#[derive(serde::Serialize)]
struct ActivityRow {
    id:          ActivityId,
    name:        String,
    level:       u32,
    xp:          f64,
    xp_required: f64,
    rate:        f64,
    unlocked:    bool,
}

#[derive(serde::Serialize)]
struct GrowthRow {
    id:          GrowthStatId,
    name:        String,
    level:       u32,
    xp:          f64,
    xp_required: f64,
    multiplier:  f64,
    unlocked:    bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seconds = parse_arg(&args, "--seconds", 600.0f64);
    let dt = parse_arg(&args, "--dt", 0.1f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let realtime = args.iter().any(|a| a == "--realtime");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");

    let config = PlantConfig::load(data_dir)?;
    let store = PlantStore::open_migrated(db)?;
    let mut engine = PlantEngine::build(config, store);

    if let Some(path) = string_arg(&args, "--import") {
        let json = std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
        engine
            .import_snapshot(&json)
            .with_context(|| format!("Cannot import {path}"))?;
    }

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
        return Ok(());
    }

    println!("Plant Life: plant-runner");
    println!("  seconds:   {seconds}");
    println!("  dt:        {dt}");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!();

    if let Some(key) = string_arg(&args, "--activity") {
        match ActivityId::from_key(key) {
            Some(id) => {
                engine.execute(PlayerCommand::SelectActivity { id });
            }
            None => log::warn!("Unknown activity: {key}"),
        }
    }
    if let Some(key) = string_arg(&args, "--growth") {
        match GrowthStatId::from_key(key) {
            Some(id) => {
                engine.execute(PlayerCommand::SelectGrowth { id });
            }
            None => log::warn!("Unknown growth stat: {key}"),
        }
    }

    let signals = if realtime {
        run_realtime(&mut engine, seconds)
    } else {
        engine.run_ticks(tick_count(seconds, dt), dt)
    };
    print_summary(&engine, &signals);

    if args.iter().any(|a| a == "--export") {
        // A bare `--export` writes to the dated default file name.
        let path = match string_arg(&args, "--export") {
            Some(p) if !p.starts_with("--") => p.to_string(),
            _ => snapshot::export_file_name(chrono::Local::now().date_naive()),
        };
        write_export(&engine, &path)?;
    }

    engine.save_now()?;
    Ok(())
}

/// Tick at the configured cadence for `seconds` of wall time, feeding
/// the engine the measured elapsed time of each frame.
fn run_realtime(engine: &mut PlantEngine, seconds: f64) -> Vec<EngineSignal> {
    let frame = Duration::from_millis(engine.config().tuning().tick_rate_ms);
    let started = Instant::now();
    let mut last = started;
    let mut signals = Vec::new();

    while started.elapsed().as_secs_f64() < seconds {
        std::thread::sleep(frame);
        let now = Instant::now();
        signals.extend(engine.tick(now.duration_since(last).as_secs_f64()));
        last = now;
    }
    signals
}

fn run_ipc_loop(engine: &mut PlantEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let signals = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Vec::new(),
            IpcCommand::Tick { seconds, dt } => engine.run_ticks(tick_count(seconds, dt), dt),
            IpcCommand::Command { command } => engine.execute(command),
            IpcCommand::Export => {
                let json = engine.export_snapshot()?;
                writeln!(stdout, "{}", serde_json::json!({ "snapshot": json }))?;
                stdout.flush()?;
                continue;
            }
            IpcCommand::Import { snapshot } => {
                if let Err(e) = engine.import_snapshot(&snapshot) {
                    log::warn!("Rejected import: {e}");
                    writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                    stdout.flush()?;
                    continue;
                }
                Vec::new()
            }
        };

        let reply = IpcReply { state: build_ui_state(engine), signals };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }

    engine.save_now()?;
    Ok(())
}

fn build_ui_state(engine: &PlantEngine) -> UiState {
    let state = engine.state();
    let config = engine.config();

    let activities = ActivityId::ALL
        .iter()
        .map(|&id| {
            let progress = state.activity(id);
            ActivityRow {
                id,
                name: config.activity(id).name.clone(),
                level: progress.level,
                xp: progress.xp,
                xp_required: engine.activity_xp_required(id),
                rate: engine.activity_rate(id),
                unlocked: engine.activity_unlocked(id),
            }
        })
        .collect();

    let growth_stats = GrowthStatId::ALL
        .iter()
        .map(|&id| {
            let progress = state.growth(id);
            GrowthRow {
                id,
                name: config.growth_stat(id).name.clone(),
                level: progress.level,
                xp: progress.xp,
                xp_required: engine.growth_xp_required(id),
                multiplier: state.prestige.multiplier(id),
                unlocked: engine.growth_unlocked(id),
            }
        })
        .collect();

    UiState {
        ticks: engine.ticks(),
        day: state.calendar.day_index(),
        year: state.calendar.year,
        lifetime: state.calendar.lifetime_count,
        total_days: state.calendar.total_elapsed_days(),
        life_stage: engine.life_stage().name.clone(),
        total_levels: state.total_growth_levels(),
        resources: state.resources.clone(),
        selected_activity: state.selected_activity,
        selected_growth: state.selected_growth,
        activities,
        growth_stats,
        rebirth_eligible: engine.rebirth_eligible(),
        rebirth_preview: engine.rebirth_preview(),
    }
}

fn print_summary(engine: &PlantEngine, signals: &[EngineSignal]) {
    let state = engine.state();
    let level_ups = signals
        .iter()
        .filter(|s| matches!(s, EngineSignal::ActivityLeveledUp { .. } | EngineSignal::GrowthLeveledUp { .. }))
        .count();

    println!("=== RUN SUMMARY ===");
    println!("  ticks run:      {}", engine.ticks());
    println!("  lifetime:       {}", state.calendar.lifetime_count);
    println!("  date:           day {}, year {}", state.calendar.day_index(), state.calendar.year);
    println!("  total days:     {}", format_number(state.calendar.total_elapsed_days()));
    println!("  life stage:     {}", engine.life_stage().name);
    println!("  total levels:   {}", state.total_growth_levels());
    println!("  level-ups:      {level_ups}");
    println!("  rebirth ready:  {}", engine.rebirth_eligible());

    println!();
    println!("=== RESOURCES ===");
    for kind in Resource::ALL {
        println!("  {:<10} {}", kind.name(), format_number(state.resource(kind)));
    }

    println!();
    println!("=== GROWTH ===");
    for id in GrowthStatId::ALL {
        let progress = state.growth(id);
        if progress.level == 0 && !engine.growth_unlocked(id) {
            continue;
        }
        println!(
            "  {:<20} lvl {:>3} | XP {:.0}/{:.0} | x{:.2}",
            engine.config().growth_stat(id).name,
            progress.level,
            progress.xp,
            engine.growth_xp_required(id),
            state.prestige.multiplier(id)
        );
    }
}

fn write_export(engine: &PlantEngine, path: &str) -> Result<()> {
    let json = engine.export_snapshot()?;
    std::fs::write(path, json).with_context(|| format!("Cannot write {path}"))?;
    println!("Exported save to {path}");
    Ok(())
}

/// Whole ticks of `dt` covering `seconds`. Non-positive input runs none.
fn tick_count(seconds: f64, dt: f64) -> u64 {
    if !(seconds > 0.0 && dt > 0.0) {
        return 0;
    }
    (seconds / dt).round() as u64
}

/// 1234 → "1.23K"; values below a thousand are floored.
fn format_number(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{}", value.floor())
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
