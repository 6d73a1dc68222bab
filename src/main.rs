//! Parking Rush headless driver
//!
//! Rendering and keyboard capture live in the front-end; this binary runs
//! the simulation on its own for smoke-testing tuning files and seeds.
//!
//! Usage: `parking-rush [seed] [tuning.json]`

use std::process::ExitCode;

use parking_rush::format_time;
use parking_rush::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use parking_rush::{Tuning, TuningError};

/// Simulated frame rate
const FRAME_DT: f32 = 1.0 / 60.0;
/// Frames to hold the accelerator at the start of the demo run
const THROTTLE_FRAMES: u32 = 45;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Parking Rush (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), TuningError> {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let mut state = GameState::with_tuning(seed, tuning)?;
    log::info!("Game initialized with seed: {}", seed);
    println!("{}", serde_json::to_string_pretty(&state.level)?);

    let throttle = TickInput {
        accelerate: true,
        ..Default::default()
    };
    let coast = TickInput::default();

    // Drive straight ahead, then let friction stop the car
    let max_frames = (state.tuning.time_limit / FRAME_DT) as u32 + 1;
    for frame in 0..max_frames {
        let input = if frame < THROTTLE_FRAMES { &throttle } else { &coast };
        tick(&mut state, input, FRAME_DT);

        for event in state.drain_events() {
            report(&event);
        }
        if state.phase() != GamePhase::Driving {
            break;
        }
        if frame > THROTTLE_FRAMES && state.level.player.is_stopped() {
            let check = state.level.parking_check();
            log::info!(
                "Car at rest after {} frames: in spot {}, aligned {}, stopped {}",
                frame + 1,
                check.in_spot,
                check.aligned,
                check.stopped
            );
            break;
        }
    }

    println!(
        "level {} | {} | time left {}",
        state.level_number,
        phase_label(state.phase()),
        format_time(state.level.time_remaining)
    );
    Ok(())
}

fn phase_label(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Driving => "driving",
        GamePhase::Completed => "parked",
        GamePhase::Failed => "game over",
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::LevelStarted { number } | GameEvent::LevelRestarted { number } => {
            log::info!("Level {} started", number)
        }
        GameEvent::LevelCompleted {
            number,
            time_remaining,
        } => println!("Level {number} complete! {} left", format_time(*time_remaining)),
        GameEvent::LevelFailed { number, reason } => {
            println!("Level {number}: {}", reason.as_str())
        }
    }
}
