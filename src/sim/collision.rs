//! Collision and parking detection
//!
//! Both car tests are deliberately approximate and the game is tuned
//! around them:
//! - car vs car compares the axis-aligned boxes of each car's rotated
//!   corners, not the rotated rectangles themselves
//! - car vs cone only checks the four corners, so a cone sitting against
//!   the middle of a long side is not a hit

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{Cone, ParkingSpot};
use super::vehicle::Vehicle;
use crate::normalize_degrees;
use crate::tuning::{SpotFootprint, Tuning};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Grow by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Overlap test; touching edges count as overlapping
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y)
    }

    /// True if `inner` lies entirely within this box (edges inclusive)
    pub fn contains(&self, inner: &Bounds) -> bool {
        inner.min.x >= self.min.x
            && inner.max.x <= self.max.x
            && inner.min.y >= self.min.y
            && inner.max.y <= self.max.y
    }
}

/// Car vs car: boxes around the rotated corners overlap
pub fn check_car_collision(a: &Vehicle, b: &Vehicle) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// Car vs cone: any corner strictly inside the cone
pub fn check_cone_collision(car: &Vehicle, cone: &Cone) -> bool {
    car.corners()
        .iter()
        .any(|corner| crate::distance(*corner, cone.pos) < cone.radius)
}

/// Parking rules, lifted out of `Tuning`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkingRules {
    /// Slack around the spot footprint, per side
    pub margin: f32,
    /// Max heading error in degrees (exclusive)
    pub angle_tolerance: f32,
    /// Max |speed| (exclusive)
    pub max_speed: f32,
    pub footprint: SpotFootprint,
}

impl Default for ParkingRules {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

impl From<&Tuning> for ParkingRules {
    fn from(t: &Tuning) -> Self {
        Self {
            margin: t.park_margin,
            angle_tolerance: t.park_angle_tolerance,
            max_speed: t.park_max_speed,
            footprint: t.footprint,
        }
    }
}

/// Outcome of a parking test, split by condition for HUD hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingCheck {
    pub in_spot: bool,
    pub aligned: bool,
    pub stopped: bool,
}

impl ParkingCheck {
    #[inline]
    pub fn is_parked(&self) -> bool {
        self.in_spot && self.aligned && self.stopped
    }
}

/// Heading error to the spot, within tolerance modulo 360
pub fn heading_aligned(car_angle: f32, spot_angle: f32, tolerance: f32) -> bool {
    let diff = (normalize_degrees(car_angle) - normalize_degrees(spot_angle)).abs();
    diff < tolerance || diff > 360.0 - tolerance
}

/// Evaluate the three parking conditions for `car` against `spot`
pub fn check_parking(car: &Vehicle, spot: &ParkingSpot, rules: &ParkingRules) -> ParkingCheck {
    let target = spot.footprint(rules.footprint).expand(rules.margin);
    ParkingCheck {
        in_spot: target.contains(&car.bounds()),
        aligned: heading_aligned(car.angle, spot.angle, rules.angle_tolerance),
        stopped: car.speed.abs() < rules.max_speed,
    }
}
