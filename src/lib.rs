//! Parking Rush - A top-down parking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (car kinematics, collisions, levels, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, asset loading and keyboard capture live outside this crate;
//! they read the simulation state and feed a `sim::TickInput` each frame.

pub mod sim;
pub mod tuning;

pub use tuning::{SpotFootprint, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Level time limit (3 minutes)
    pub const TIME_LIMIT_SECS: f32 = 180.0;

    /// Car defaults - player and obstacle cars share a body
    pub const CAR_WIDTH: f32 = 91.0;
    pub const CAR_HEIGHT: f32 = 52.0;
    pub const CAR_ACCELERATION: f32 = 0.15;
    pub const CAR_MAX_SPEED: f32 = 4.0;
    pub const CAR_TURN_SPEED: f32 = 2.5; // degrees per tick at full speed
    pub const CAR_FRICTION: f32 = 0.95;

    /// Below this |speed| a car snaps to rest and cannot steer
    pub const STOP_THRESHOLD: f32 = 0.1;

    /// Parking spot defaults (~40% wider, 50% taller than the car)
    pub const SPOT_WIDTH: f32 = 130.0;
    pub const SPOT_HEIGHT: f32 = 78.0;
    /// Keep spots and cones this far from the playfield edge
    pub const FIELD_MARGIN: f32 = 100.0;
    /// Slack around the spot when testing containment
    pub const PARK_MARGIN: f32 = 5.0;
    /// Heading must be within this many degrees of the spot angle
    pub const PARK_ANGLE_TOLERANCE: f32 = 15.0;
    /// Car must be slower than this to count as parked
    pub const PARK_MAX_SPEED: f32 = 0.2;

    /// Cone defaults
    pub const CONE_RADIUS: f32 = 10.0;

    /// Seconds after completion before an advance request is honoured
    pub const ADVANCE_DELAY_SECS: f32 = 0.5;
}

/// Degrees to radians
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Radians to degrees
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Normalized heading in [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Rotate `point` about `pivot` by `angle` degrees.
///
/// Screen-space convention (y down): a positive angle turns +x toward +y,
/// the same direction a car with a positive heading travels. Car corners,
/// spot footprints and the renderer's canvas rotation all go through here.
#[inline]
pub fn rotate_point(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    let rot = Vec2::from_angle(degrees_to_radians(angle));
    pivot + rot.rotate(point - pivot)
}

/// Format seconds as `M:SS` for the HUD timer
pub fn format_time(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u32;
    let rest = (seconds % 60.0).floor() as u32;
    format!("{minutes}:{rest:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_angle_conversions() {
        assert!((degrees_to_radians(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((radians_to_degrees(std::f32::consts::FRAC_PI_2) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-3);
        let tiny = normalize_degrees(-1e-6);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
        assert!((distance(Vec2::new(-1.0, -1.0), Vec2::new(-4.0, -5.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_point_screen_space() {
        let pivot = Vec2::new(10.0, 10.0);
        // +x turns toward +y (downward on screen)
        let p = rotate_point(Vec2::new(20.0, 10.0), pivot, 90.0);
        assert!(close(p, Vec2::new(10.0, 20.0)));

        let p = rotate_point(Vec2::new(20.0, 10.0), pivot, 180.0);
        assert!(close(p, Vec2::new(0.0, 10.0)));

        // Pivot is fixed
        assert!(close(rotate_point(pivot, pivot, 37.0), pivot));
    }

    #[test]
    fn test_rotate_matches_heading_direction() {
        // Rotating the "nose" offset lands where driving forward would go
        let heading = 30.0;
        let rad = degrees_to_radians(heading);
        let forward = Vec2::new(rad.cos(), rad.sin());
        let nose = rotate_point(Vec2::new(1.0, 0.0), Vec2::ZERO, heading);
        assert!(close(nose, forward));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(180.0), "3:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(9.2), "0:09");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
