//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied time deltas only
//! - Seeded RNG only, and only during level generation
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use collision::{
    Bounds, ParkingCheck, ParkingRules, check_car_collision, check_cone_collision, check_parking,
};
pub use level::{Cone, FailReason, Level, ParkingSpot, SPOT_ANGLES};
pub use state::{GameEvent, GamePhase, GameState, RngState};
pub use tick::{TickInput, tick};
pub use vehicle::{CarColor, Steer, Vehicle};
