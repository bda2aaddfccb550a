//! Headless game driver (default binary).
//!
//! Runs the engine under a fixed 16ms timestep with the heuristic bot at the
//! controls. Three modes, picked with `STACKERZ_MODE`:
//!
//! - `solo` (default): one recorded game; the replay blob is written to
//!   `STACKERZ_REPLAY_OUT` when set
//! - `sprint`: a recorded solo game that ends when `STACKERZ_SPRINT_LINES`
//!   (default 40) lines are cleared; reports the completion time
//! - `versus`: two bots exchanging garbage in-process
//! - `online`: joins a relay room and plays against whoever else is there
//!
//! Logging goes through `tracing`; set `RUST_LOG` to adjust.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use stackerz::adapter::{OnlineSession, RelayClient, RelayConfig, RelayEvent, SessionPhase};
use stackerz::core::EngineConfig;
use stackerz::engine::{
    BotConfig, BotController, BotDifficulty, Pilot, Side, Sprint, SprintResult, VersusMatch,
    SPRINT_LINES,
};
use stackerz::replay::{RecordedGame, ReplayBlob};
use stackerz::types::TICK_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Solo,
    Sprint,
    Versus,
    Online,
}

#[derive(Debug, Clone)]
struct DriverConfig {
    mode: Mode,
    seed: i64,
    /// Game-time limit for solo and versus runs.
    duration_ms: u64,
    sprint_lines: u32,
    replay_out: Option<PathBuf>,
    engine: EngineConfig,
    difficulty: BotDifficulty,
}

impl DriverConfig {
    fn from_env() -> Result<Self> {
        let var = |key: &str| {
            env::var(key)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mode = match var("STACKERZ_MODE").as_deref() {
            None | Some("solo") => Mode::Solo,
            Some("sprint") => Mode::Sprint,
            Some("versus") => Mode::Versus,
            Some("online") => Mode::Online,
            Some(other) => {
                bail!("unknown STACKERZ_MODE {other:?} (expected solo, sprint, versus or online)")
            }
        };

        let seed = match var("STACKERZ_SEED") {
            Some(s) => s
                .parse()
                .with_context(|| format!("STACKERZ_SEED must be an integer, got {s:?}"))?,
            None => 1,
        };

        let duration_ms = match var("STACKERZ_DURATION_MS") {
            Some(s) => s
                .parse()
                .with_context(|| format!("STACKERZ_DURATION_MS must be an integer, got {s:?}"))?,
            None => 120_000,
        };

        let sprint_lines = match var("STACKERZ_SPRINT_LINES") {
            Some(s) => s
                .parse()
                .with_context(|| format!("STACKERZ_SPRINT_LINES must be an integer, got {s:?}"))?,
            None => SPRINT_LINES,
        };

        let mut engine = EngineConfig::default();
        if let Some(s) = var("STACKERZ_SPEED") {
            let speed: f64 = s
                .parse()
                .with_context(|| format!("STACKERZ_SPEED must be a number, got {s:?}"))?;
            if !speed.is_finite() || speed <= 0.0 {
                bail!("STACKERZ_SPEED must be positive, got {speed}");
            }
            engine.speed_multiplier = speed;
        }
        engine.time_level_bonus = matches!(
            var("STACKERZ_TIME_LEVEL_BONUS").as_deref(),
            Some("1" | "true" | "yes" | "on")
        );

        let difficulty = match var("STACKERZ_BOT") {
            Some(s) => BotDifficulty::from_str(&s)
                .with_context(|| format!("STACKERZ_BOT must be easy, normal or hard, got {s:?}"))?,
            None => BotDifficulty::default(),
        };

        Ok(Self {
            mode,
            seed,
            duration_ms,
            sprint_lines,
            replay_out: var("STACKERZ_REPLAY_OUT").map(PathBuf::from),
            engine,
            difficulty,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DriverConfig::from_env()?;
    tracing::info!(mode = ?config.mode, seed = config.seed, "starting");

    match config.mode {
        Mode::Solo => run_solo(&config),
        Mode::Sprint => run_sprint(&config),
        Mode::Versus => run_versus(&config),
        Mode::Online => run_online(&config),
    }
}

fn run_solo(config: &DriverConfig) -> Result<()> {
    let mut game = RecordedGame::with_config(config.seed, config.engine);
    let mut bot = BotController::new(BotConfig::for_difficulty(config.difficulty));

    while !game.state().game_over() && game.recorder().clock_ms() < config.duration_ms {
        for action in bot.decide(game.state(), TICK_MS) {
            game.apply(action);
        }
        game.update(TICK_MS);
        if let Some(event) = game.take_last_event() {
            if event.lines_cleared > 0 {
                tracing::debug!(
                    lines = event.lines_cleared,
                    score_delta = event.score_delta,
                    t_spin = event.t_spin,
                    back_to_back = event.back_to_back,
                    combo = event.combo,
                    "lines cleared"
                );
            }
        }
    }

    let clock_ms = game.recorder().clock_ms();
    let (state, blob) = game.finish();
    tracing::info!(
        score = state.score(),
        lines = state.lines(),
        level = state.display_level(),
        pieces = state.pieces_spawned(),
        game_over = state.game_over(),
        clock_ms,
        "solo game finished"
    );

    write_replay(config, &blob)?;

    println!(
        "score={} lines={} pieces={} game_over={}",
        state.score(),
        state.lines(),
        state.pieces_spawned(),
        state.game_over()
    );
    Ok(())
}

fn run_sprint(config: &DriverConfig) -> Result<()> {
    let mut game = RecordedGame::with_config(config.seed, config.engine);
    let mut bot = BotController::new(BotConfig::for_difficulty(config.difficulty));
    let mut sprint = Sprint::new(config.sprint_lines);

    while !sprint.is_finished() && game.recorder().clock_ms() < config.duration_ms {
        for action in bot.decide(game.state(), TICK_MS) {
            game.apply(action);
        }
        game.update(TICK_MS);
        sprint.observe(game.state(), TICK_MS);
    }

    let (state, blob) = game.finish();
    write_replay(config, &blob)?;

    match sprint.result() {
        Some(SprintResult::Cleared { time_ms }) => {
            let secs = time_ms / 1000;
            println!(
                "sprint cleared {} lines in {:02}:{:02}.{:03} score={}",
                sprint.target_lines(),
                secs / 60,
                secs % 60,
                time_ms % 1000,
                state.score()
            );
        }
        Some(SprintResult::ToppedOut { lines }) => {
            println!("topped out at {lines}/{} lines", sprint.target_lines());
        }
        None => println!(
            "time limit reached at {}/{} lines",
            state.lines(),
            sprint.target_lines()
        ),
    }
    Ok(())
}

/// Write the blob to `STACKERZ_REPLAY_OUT` when set.
fn write_replay(config: &DriverConfig, blob: &ReplayBlob) -> Result<()> {
    let Some(path) = &config.replay_out else {
        return Ok(());
    };
    let json = blob.to_json().context("failed to encode replay")?;
    fs::write(path, json).with_context(|| format!("failed to write replay to {}", path.display()))?;
    tracing::info!(path = %path.display(), inputs = blob.inputs.len(), "replay written");
    Ok(())
}

fn run_versus(config: &DriverConfig) -> Result<()> {
    let player = BotController::new(BotConfig::default());
    let opponent = BotController::new(BotConfig::for_difficulty(config.difficulty));
    let mut game = VersusMatch::new(config.seed, player, opponent);

    let outcome = game.run_for(TICK_MS, config.duration_ms);
    for side in [Side::Player, Side::Opponent] {
        let state = game.state(side);
        println!(
            "{side:?}: score={} lines={} garbage_received={} game_over={}",
            state.score(),
            state.lines(),
            game.garbage_received(side),
            state.game_over()
        );
    }
    match outcome {
        Some(outcome) => println!("outcome: {outcome:?}"),
        None => println!("outcome: time limit reached after {}ms", game.elapsed_ms()),
    }
    Ok(())
}

fn run_online(config: &DriverConfig) -> Result<()> {
    let relay = RelayConfig::from_env();
    let mut client = RelayClient::connect(&relay)?;
    let mut session = OnlineSession::new(config.engine);
    let mut bot = BotController::new(BotConfig::for_difficulty(config.difficulty));

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        while let Some(event) = client.try_recv() {
            match event {
                RelayEvent::Message(msg) => session.handle(msg),
                RelayEvent::Disconnected => {
                    tracing::warn!("relay closed the connection");
                    return Ok(());
                }
            }
        }

        if session.phase() == SessionPhase::Finished {
            if let Some(game) = session.game() {
                println!("score={} lines={} (topped out)", game.score(), game.lines());
            }
            return Ok(());
        }

        if let Some(actions) = session.game().map(|game| bot.decide(game, TICK_MS)) {
            for action in actions {
                session.apply(action);
            }
        }
        for msg in session.tick(TICK_MS) {
            client.send(msg);
        }

        let elapsed = last_tick.elapsed();
        if elapsed < tick_duration {
            thread::sleep(tick_duration - elapsed);
        }
        last_tick = Instant::now();
    }
}
