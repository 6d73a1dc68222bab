//! Game balance and rule presets
//!
//! Everything the level generator and detectors treat as a constant lives
//! here, so a run can be re-tuned from a JSON file without recompiling.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration rejected at load time
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("friction must be in (0, 1), got {0}")]
    Friction(f32),

    #[error("{0} does not fit inside the playfield")]
    DoesNotFit(&'static str),

    #[error("{0} must be at least 1")]
    Threshold(&'static str),

    #[error("Failed to parse tuning: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Which rectangle the parking containment test measures against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpotFootprint {
    /// Bounding box of the spot as drawn (rotated by its angle)
    #[default]
    Rotated,
    /// The spot's rectangle before rotation
    Unrotated,
}

impl SpotFootprint {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotFootprint::Rotated => "rotated",
            SpotFootprint::Unrotated => "unrotated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rotated" => Some(SpotFootprint::Rotated),
            "unrotated" | "axis" => Some(SpotFootprint::Unrotated),
            _ => None,
        }
    }
}

/// Per-car handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarHandling {
    /// Speed gained per accelerate/brake call
    pub acceleration: f32,
    /// Forward speed cap; reverse is capped at half of this
    pub max_speed: f32,
    /// Degrees of heading change per turn call at full speed
    pub turn_speed: f32,
    /// Per-tick speed multiplier, in (0, 1)
    pub friction: f32,
}

impl Default for CarHandling {
    fn default() -> Self {
        Self {
            acceleration: CAR_ACCELERATION,
            max_speed: CAR_MAX_SPEED,
            turn_speed: CAR_TURN_SPEED,
            friction: CAR_FRICTION,
        }
    }
}

/// Axis-aligned spawn region: `origin + random * extent` on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRegion {
    pub origin: Vec2,
    pub extent: Vec2,
}

impl SpawnRegion {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            extent: Vec2::new(w, h),
        }
    }

    /// Map two unit samples into the region
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Vec2 {
        self.origin + self.extent * Vec2::new(u, v)
    }
}

/// Game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield size in pixels
    pub field_size: Vec2,
    /// Spots and cones keep this far from every edge
    pub field_margin: f32,
    /// Seconds allowed per level
    pub time_limit: f32,

    // === Cars ===
    pub car_size: Vec2,
    pub handling: CarHandling,

    // === Parking ===
    pub spot_size: Vec2,
    pub park_margin: f32,
    pub park_angle_tolerance: f32,
    pub park_max_speed: f32,
    pub footprint: SpotFootprint,

    // === Hazards ===
    pub cone_radius: f32,
    /// First obstacle car appears from this level
    pub first_car_level: u32,
    pub first_car_region: SpawnRegion,
    /// Second obstacle car appears from this level
    pub second_car_level: u32,
    pub second_car_region: SpawnRegion,
    /// Cones (one per level number) appear from this level
    pub cone_level: u32,

    // === Sequencing ===
    pub advance_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_size: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            field_margin: FIELD_MARGIN,
            time_limit: TIME_LIMIT_SECS,

            car_size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            handling: CarHandling::default(),

            spot_size: Vec2::new(SPOT_WIDTH, SPOT_HEIGHT),
            park_margin: PARK_MARGIN,
            park_angle_tolerance: PARK_ANGLE_TOLERANCE,
            park_max_speed: PARK_MAX_SPEED,
            footprint: SpotFootprint::Rotated,

            cone_radius: CONE_RADIUS,
            first_car_level: 2,
            first_car_region: SpawnRegion::new(300.0, 200.0, 200.0, 200.0),
            second_car_level: 3,
            second_car_region: SpawnRegion::new(200.0, 100.0, 300.0, 400.0),
            cone_level: 4,

            advance_delay: ADVANCE_DELAY_SECS,
        }
    }
}

impl Tuning {
    /// Region the parking spot's top-left corner is drawn from
    pub fn spot_region(&self) -> SpawnRegion {
        let m = self.field_margin;
        let extent = self.field_size - Vec2::splat(2.0 * m) - self.spot_size;
        SpawnRegion::new(m, m, extent.x, extent.y)
    }

    /// Region cone centers are drawn from
    pub fn cone_region(&self) -> SpawnRegion {
        let m = self.field_margin;
        let extent = self.field_size - Vec2::splat(2.0 * m);
        SpawnRegion::new(m, m, extent.x, extent.y)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            (self.field_size.min_element(), "field_size"),
            (self.time_limit, "time_limit"),
            (self.car_size.min_element(), "car_size"),
            (self.spot_size.min_element(), "spot_size"),
            (self.cone_radius, "cone_radius"),
            (self.handling.acceleration, "acceleration"),
            (self.handling.max_speed, "max_speed"),
            (self.park_max_speed, "park_max_speed"),
            (self.park_angle_tolerance, "park_angle_tolerance"),
        ];
        for (value, name) in positive {
            // Also catches NaN
            if !(value > 0.0) {
                return Err(TuningError::NonPositive(name));
            }
        }

        let friction = self.handling.friction;
        if !(friction > 0.0 && friction < 1.0) {
            return Err(TuningError::Friction(friction));
        }

        if self.field_margin < 0.0 || self.park_margin < 0.0 || self.advance_delay < 0.0 {
            return Err(TuningError::Negative("margins and delays"));
        }
        if self.spot_region().extent.min_element() < 0.0 {
            return Err(TuningError::DoesNotFit("parking spot"));
        }
        if self.cone_region().extent.min_element() < 0.0 {
            return Err(TuningError::DoesNotFit("cone region"));
        }

        for (level, name) in [
            (self.first_car_level, "first_car_level"),
            (self.second_car_level, "second_car_level"),
            (self.cone_level, "cone_level"),
        ] {
            if level == 0 {
                return Err(TuningError::Threshold(name));
            }
        }

        Ok(())
    }

    /// Parse and validate a JSON tuning document. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
