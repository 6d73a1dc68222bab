//! Per-frame simulation step
//!
//! The caller captures input into a `TickInput` and passes the elapsed
//! wall-clock seconds; nothing here reads global state.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use super::vehicle::Steer;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held: speed up
    pub accelerate: bool,
    /// Held: slow down / reverse
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// One-shot: regenerate the current level
    pub reset: bool,
    /// One-shot: go to the next level (honoured only after parking)
    pub advance: bool,
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.reset {
        state.reset_level();
        return;
    }

    match state.phase() {
        GamePhase::Driving => {
            let car = &mut state.level.player;
            if input.accelerate {
                car.accelerate();
            }
            if input.brake {
                car.brake();
            }
            if input.steer_left {
                car.turn(Steer::Left);
            }
            if input.steer_right {
                car.turn(Steer::Right);
            }

            state.level.update(dt);
            record_outcome(state);
        }
        GamePhase::Completed => {
            state.outcome_secs += dt;
            if input.advance && state.can_advance() {
                state.advance_level();
            }
        }
        GamePhase::Failed => {
            state.outcome_secs += dt;
        }
    }
}

/// Emit the level's outcome on the tick it happens
fn record_outcome(state: &mut GameState) {
    let level = &state.level;
    let event = if level.completed {
        log::info!(
            "Level {} complete with {:.1}s to spare",
            level.number,
            level.time_remaining
        );
        GameEvent::LevelCompleted {
            number: level.number,
            time_remaining: level.time_remaining,
        }
    } else if let Some(reason) = level.failure {
        log::info!("Level {} failed: {}", level.number, reason.as_str());
        GameEvent::LevelFailed {
            number: level.number,
            reason,
        }
    } else {
        return;
    };
    state.events.push(event);
}
