//! Replay checker.
//!
//! Usage: `replay-check <replay.json> [speed]`
//!
//! Loads and validates a replay blob, plays it through a fresh engine built
//! from the blob's stored settings up to its recorded end clock, and prints
//! the final board and stats. With a speed (1, 2, 4 or 8) the replay is
//! played in real time at that speed instead of as fast as possible.

use std::env;
use std::fs;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use stackerz::replay::{ReplayBlob, ReplayPlayer, ReplaySpeed};
use stackerz::types::TICK_MS;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .context("usage: replay-check <replay.json> [speed]")?;
    let speed = match args.next() {
        Some(s) => {
            let factor: u32 = s
                .parse()
                .with_context(|| format!("speed must be 1, 2, 4 or 8, got {s:?}"))?;
            Some(
                ReplaySpeed::from_factor(factor)
                    .with_context(|| format!("speed must be 1, 2, 4 or 8, got {factor}"))?,
            )
        }
        None => None,
    };

    let json = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let blob = ReplayBlob::from_json(&json).with_context(|| format!("invalid replay {path}"))?;
    let mut player = ReplayPlayer::new(blob)?;

    match speed {
        Some(speed) => {
            player.set_speed(speed);
            while !player.is_finished() {
                player.tick(TICK_MS);
                thread::sleep(Duration::from_millis(TICK_MS as u64));
            }
        }
        None => player.run_to_end(),
    }

    let state = player.state();
    for row in state.snapshot().grid {
        println!("{row}");
    }
    println!(
        "seed={} inputs={} clock_ms={} score={} lines={} pieces={} game_over={}",
        player.blob().seed,
        player.position(),
        player.clock_ms(),
        state.score(),
        state.lines(),
        state.pieces_spawned(),
        state.game_over()
    );
    Ok(())
}
