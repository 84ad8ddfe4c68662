use std::{path::PathBuf, time::Duration};

use blockfall_engine::{Command, Engine, EngineConfig, PieceSeed, Snapshot};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Piece seed as 32 hex digits (random when omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Engine tuning file (JSON); missing fields keep their defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of ticks to run
    #[clap(long, default_value_t = 3600)]
    ticks: u32,
    /// Elapsed time per tick in milliseconds
    #[clap(long, default_value_t = 16)]
    tick_ms: u64,
    /// Input script (JSON array of `{ "tick": n, "action": ... }`); a random
    /// player is used when omitted
    #[clap(long)]
    script: Option<PathBuf>,
    /// Seed of the random player
    #[clap(long, default_value_t = 0)]
    player_seed: u64,
    /// Keep ticking after game over instead of stopping
    #[clap(long)]
    keep_going: bool,
    /// Output file path (defaults to stdout)
    #[clap(long)]
    output: Option<PathBuf>,
}

/// Something an adapter does to the engine before a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum Action {
    Press(Command),
    SoftDrop(bool),
    TogglePause,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
struct ScriptStep {
    tick: u32,
    action: Action,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    ticks_run: u32,
    line_cleared_counter: [u64; 5],
    snapshot: Snapshot,
}

fn apply(engine: &mut Engine, action: Action) {
    match action {
        Action::Press(command) => engine.press(command),
        Action::SoftDrop(active) => engine.set_soft_drop(active),
        Action::TogglePause => engine.toggle_pause(),
        Action::Restart => engine.restart(),
    }
}

/// Picks at most one action per tick, mostly moves and rotations.
fn random_action(rng: &mut Pcg32) -> Option<Action> {
    let action = match rng.random_range(0..40) {
        0..4 => Action::Press(Command::MoveLeft),
        4..8 => Action::Press(Command::MoveRight),
        8..10 => Action::Press(Command::RotateCw),
        10..12 => Action::Press(Command::RotateCcw),
        12 => Action::Press(Command::HardDrop),
        13 => Action::Press(Command::Swap),
        14 => Action::SoftDrop(rng.random_bool(0.5)),
        _ => return None,
    };
    Some(action)
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        config,
        ticks,
        tick_ms,
        script,
        player_seed,
        keep_going,
        output,
    } = arg;

    let config: EngineConfig = match config {
        Some(path) => util::read_json_file("engine config", path)?,
        None => EngineConfig::default(),
    };
    let mut script: Vec<ScriptStep> = match script {
        Some(path) => util::read_json_file("input script", path)?,
        None => vec![],
    };
    script.sort_by_key(|step| step.tick);

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut engine = Engine::with_config(config, seed);
    let mut player = script.is_empty().then(|| Pcg32::seed_from_u64(*player_seed));
    let dt = Duration::from_millis(*tick_ms);
    tracing::info!(%seed, ticks, tick_ms, "simulation started");

    let mut steps = script.iter().peekable();
    let mut ticks_run = 0;
    for tick in 0..*ticks {
        while let Some(step) = steps.next_if(|step| step.tick <= tick) {
            apply(&mut engine, step.action);
        }
        if let Some(action) = player.as_mut().and_then(random_action) {
            apply(&mut engine, action);
        }
        engine.tick(dt);
        ticks_run = tick + 1;
        if engine.is_game_over() && !keep_going {
            break;
        }
    }

    let report = SimulationReport {
        seed,
        ticks_run,
        line_cleared_counter: *engine.stats().line_cleared_counter(),
        snapshot: engine.snapshot(),
    };
    tracing::info!(
        ticks_run,
        score = report.snapshot.score,
        lines = report.snapshot.lines,
        game_over = report.snapshot.game_over,
        "simulation finished"
    );
    util::write_json(&report, output.as_deref())
}
