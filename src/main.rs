//! Headless demo runner.
//!
//! Runs a scripted session against the simulation core, logging the
//! events it produces, then replays the same script twice to verify
//! the determinism guarantee. Takes an optional JSON config path as
//! its first argument and a seed as its second.

use anyhow::{ensure, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tiremaze::game::tick::replay_session;
use tiremaze::{tick, GameConfig, GameSession, InputFrame, TICK_RATE};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            serde_json::from_str::<GameConfig>(&text)
                .with_context(|| format!("parsing config file {path}"))?
        }
        None => GameConfig::default(),
    };
    config.validate().context("invalid configuration")?;

    let seed: u64 = match args.next() {
        Some(raw) => raw.parse().context("seed must be a u64")?,
        None => 2026,
    };

    run_demo(&config, seed);
    verify_replay(&config, seed)?;
    Ok(())
}

/// Two minutes of scripted weaving toward the exit.
fn demo_script() -> Vec<InputFrame> {
    (0..(TICK_RATE as usize * 120))
        .map(|i| InputFrame {
            forward: true,
            backward: false,
            left: i % 240 < 80,
            right: i % 240 >= 160,
        })
        .collect()
}

fn run_demo(config: &GameConfig, seed: u64) {
    let mut session = GameSession::new(*config, seed);
    info!(
        seed,
        entrance = session.maze().entrance_col(),
        exit = session.maze().exit_col(),
        walls = session.maze().wall_segments().len(),
        doors = session.hazards().doors().len(),
        "demo session starting"
    );

    for input in demo_script() {
        let result = tick(&mut session, &input);
        for event in &result.events {
            info!(tick = event.tick, event = ?event.kind, "event");
        }
        if result.ended {
            break;
        }
    }

    info!(
        phase = ?session.phase(),
        ticks = session.tick_count(),
        elapsed_ms = session.elapsed_ms(),
        score = session.score(),
        lives = session.lives(),
        "demo session finished"
    );
}

fn verify_replay(config: &GameConfig, seed: u64) -> Result<()> {
    let script = demo_script();
    let first = replay_session(config, seed, &script);
    let second = replay_session(config, seed, &script);
    ensure!(
        first == second,
        "replay diverged: {} events vs {}",
        first.len(),
        second.len()
    );
    info!(events = first.len(), "replay verified deterministic");
    Ok(())
}
