//! Game state: level sequencing around the current `Level`
//!
//! Everything needed to reproduce a run lives here (seed, generation
//! counter, tuning), so the whole state can be snapshotted with serde.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{FailReason, Level};
use crate::tuning::{Tuning, TuningError};

/// Where the current level stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clock running, player in control
    Driving,
    /// Parked; waiting for an advance request
    Completed,
    /// Crashed or timed out; waiting for a reset
    Failed,
}

/// Notifications for the presentation layer (sounds, banners, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { number: u32 },
    LevelRestarted { number: u32 },
    LevelCompleted { number: u32, time_remaining: f32 },
    LevelFailed { number: u32, reason: FailReason },
}

/// RNG state wrapper for serialization.
/// Each level gets its own PCG stream, so a level can be rebuilt from
/// `(seed, generation)` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Levels generated so far this run (including retries)
    pub generation: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, generation: 0 }
    }

    /// RNG for the next level; bumps the generation
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.generation);
        self.generation += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// Current level number, starting at 1
    pub level_number: u32,
    pub level: Level,
    pub tuning: Tuning,
    /// Seconds since the current level was won or lost
    pub outcome_secs: f32,
    /// Pending events, oldest first
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New run at level 1 with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// New run at level 1 with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut rng_state = RngState::new(seed);
        let level = Level::generate(1, &tuning, &mut rng_state.next_rng());
        Self {
            seed,
            rng_state,
            level_number: 1,
            level,
            tuning,
            outcome_secs: 0.0,
            events: vec![GameEvent::LevelStarted { number: 1 }],
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.level.completed {
            GamePhase::Completed
        } else if self.level.failed {
            GamePhase::Failed
        } else {
            GamePhase::Driving
        }
    }

    fn replace_level(&mut self) {
        let mut rng = self.rng_state.next_rng();
        self.level = Level::generate(self.level_number, &self.tuning, &mut rng);
        self.outcome_secs = 0.0;
    }

    /// Throw the current level away and lay out a fresh one with the same number
    pub fn reset_level(&mut self) {
        log::info!("Restarting level {}", self.level_number);
        self.replace_level();
        self.events.push(GameEvent::LevelRestarted {
            number: self.level_number,
        });
    }

    /// Move on to the next level number
    pub fn advance_level(&mut self) {
        self.level_number += 1;
        log::info!("Advancing to level {}", self.level_number);
        self.replace_level();
        self.events.push(GameEvent::LevelStarted {
            number: self.level_number,
        });
    }

    /// True once a completed level has waited long enough to accept advance
    pub fn can_advance(&self) -> bool {
        self.phase() == GamePhase::Completed && self.outcome_secs >= self.tuning.advance_delay
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
