//! Skystrike entry point
//!
//! Headless driver: runs the fixed-timestep loop with a small autopilot
//! standing in for the keyboard collaborator, drains simulation events,
//! and records the final score on the CSV leaderboard.

use std::path::{Path, PathBuf};
use std::time::Instant;

use skystrike::consts::{MAX_SUBSTEPS, SIM_DT};
use skystrike::sim::{tick, GameEvent, GameState, InputState};
use skystrike::{Leaderboard, SimConfig};

const SCORES_PATH: &str = "skystrike_scores.csv";

struct Args {
    seed: u64,
    pilot: String,
    config: Option<PathBuf>,
    max_secs: f32,
}

fn parse_args() -> Args {
    let mut args = Args {
        seed: 0xB01D_FACE,
        pilot: "anonymous".to_string(),
        config: None,
        max_secs: 120.0,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--seed" => {
                if let Some(v) = iter.next().and_then(|s| s.parse().ok()) {
                    args.seed = v;
                }
            }
            "--pilot" => {
                if let Some(v) = iter.next() {
                    args.pilot = v;
                }
            }
            "--config" => {
                args.config = iter.next().map(PathBuf::from);
            }
            "--max-secs" => {
                if let Some(v) = iter.next().and_then(|s| s.parse().ok()) {
                    args.max_secs = v;
                }
            }
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: skystrike [--seed N] [--pilot NAME] [--config FILE] [--max-secs S]");
                std::process::exit(2);
            }
        }
    }
    args
}

fn load_config(path: Option<&Path>) -> SimConfig {
    match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("bad config {}: {err}, using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                log::warn!("cannot read {}: {err}, using defaults", path.display());
                SimConfig::default()
            }
        },
        None => SimConfig::default(),
    }
}

/// Stand-in for the input collaborator: hold fire and shadow the nearest
/// enemy's column so shots connect.
fn autopilot(state: &GameState, input: &mut InputState) {
    input.fire = true;
    input.left = false;
    input.right = false;

    let px = state.player.plane.pos.x;
    let nearest = state
        .enemies
        .iter()
        .filter(|e| !e.plane.is_destroyed())
        .min_by(|a, b| {
            let da = (a.plane.pos.x - px).abs();
            let db = (b.plane.pos.x - px).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(enemy) = nearest {
        let dx = enemy.plane.pos.x - px;
        if dx > 4.0 {
            input.right = true;
        } else if dx < -4.0 {
            input.left = true;
        }
    }
}

/// Best-effort collaborator hand-off: a failed leaderboard write must
/// never take the process down mid-report.
fn record_score(pilot: &str, score: u64) {
    let path = Path::new(SCORES_PATH);
    if let Err(err) = Leaderboard::append(path, pilot, score) {
        log::warn!("could not record score: {err}");
        return;
    }
    match Leaderboard::load(path) {
        Ok(board) => {
            println!("-- leaderboard --");
            for (rank, entry) in board.top(skystrike::highscores::TOP_N).iter().enumerate() {
                println!("{:>2}. {:<20} {}", rank + 1, entry.name, entry.score);
            }
        }
        Err(err) => log::warn!("could not read leaderboard: {err}"),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = load_config(args.config.as_deref());
    let mut state = match GameState::new(config, args.seed, args.pilot.clone()) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    log::info!("run started: pilot={} seed={}", args.pilot, args.seed);

    let mut input = InputState::default();
    let mut accumulator = 0.0f32;
    let mut last = Instant::now();
    let max_ticks = (args.max_secs / SIM_DT) as u64;

    'run: loop {
        let now = Instant::now();
        accumulator += now.duration_since(last).as_secs_f32().min(0.1);
        last = now;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            autopilot(&state, &mut input);
            tick(&mut state, &input);
            accumulator -= SIM_DT;
            substeps += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::GameOver { name, score } => {
                        println!("game over: {name} scored {score}");
                        record_score(&name, score);
                        break 'run;
                    }
                    GameEvent::EnemyDowned => {
                        log::info!("enemy down, score {}", state.player.score);
                    }
                    // Audio collaborator hooks; nothing to play headless
                    GameEvent::Started
                    | GameEvent::ShotFired { .. }
                    | GameEvent::ExplosionStarted { .. }
                    | GameEvent::PickupCollected { .. } => {}
                }
            }

            if state.time_ticks >= max_ticks {
                println!(
                    "time limit reached: {} scored {}",
                    state.pilot, state.player.score
                );
                record_score(&state.pilot, state.player.score);
                break 'run;
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
