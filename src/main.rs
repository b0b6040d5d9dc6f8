//! Bubble Pop entry point
//!
//! Headless runner: plays a session with a simple aiming bot on the fixed
//! timestep driver and reports the result. Front ends embed the library
//! instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use bubble_pop::input::{Aim, FULL_POWER_DRAG};
use bubble_pop::sim::{BoardEvent, Resolution};
use bubble_pop::{GameConfig, GameSession, SessionPhase, Snapshot, format_clock};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board seed (defaults to the clock)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to play before giving up
    #[arg(long, default_value_t = 180.0)]
    seconds: f32,

    /// Stop after this many shots
    #[arg(long)]
    shots: Option<u32>,

    /// JSON config overriding the built-in constants
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    GameConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
}

/// Lowest bubble matching the next shot's color, else the lowest bubble
fn choose_target(snapshot: &Snapshot) -> Option<Vec2> {
    let lowest = |a: &&bubble_pop::sim::Bubble, b: &&bubble_pop::sim::Bubble| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    snapshot
        .bubbles
        .iter()
        .filter(|b| b.color == snapshot.next_color)
        .max_by(lowest)
        .or_else(|| snapshot.bubbles.iter().max_by(lowest))
        .map(|b| b.pos)
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!("Bubble Pop (headless) starting with seed {}", seed);

    let frame_dt = config.tick_dt();
    let max_frames = (args.seconds.max(0.0) / frame_dt).ceil() as u64;
    let mut session = GameSession::new(config, seed);
    session.start();

    let mut shots = 0u32;
    let mut pops = 0u32;
    for _ in 0..max_frames {
        if !session.is_running() {
            break;
        }

        if !session.board().in_flight() && args.shots.is_none_or(|limit| shots < limit) {
            let snapshot = session.snapshot();
            if let Some(target) = choose_target(&snapshot) {
                // Aim a little past the target so the shot always reaches it
                let pointer = snapshot.launcher + (target - snapshot.launcher).normalize_or_zero() * 200.0;
                if let Some(aim) = Aim::from_drag(snapshot.launcher, pointer, FULL_POWER_DRAG) {
                    if session.fire(aim.direction, aim.power) {
                        shots += 1;
                    }
                }
            }
        }

        session.advance(frame_dt);

        for event in session.drain_events() {
            if let BoardEvent::Resolved(Resolution::Popped(pop)) = event {
                pops += 1;
                log::info!(
                    "Popped {} {} bubbles (+{})",
                    pop.count,
                    pop.color.as_str(),
                    pop.points
                );
            }
        }

        if args.shots.is_some_and(|limit| shots >= limit) && !session.board().in_flight() {
            break;
        }
    }

    let result = match session.phase() {
        SessionPhase::Over(cause) => format!("{:?}", cause),
        phase => format!("{:?} (stopped)", phase),
    };
    println!(
        "Result: {}  score: {}  shots: {}  pops: {}  bubbles left: {}  time played: {}",
        result,
        session.score(),
        shots,
        pops,
        session.board().bubbles.len(),
        format_clock(session.elapsed_seconds())
    );

    if args.dump {
        let json = serde_json::to_string_pretty(&session.snapshot())?;
        println!("{}", json);
    }

    Ok(())
}
