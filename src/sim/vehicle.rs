//! Car kinematics
//!
//! An arcade model, not a physics engine: speed is a signed scalar along
//! the heading, friction is a per-tick multiplier, and steering only works
//! while moving.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use crate::consts::STOP_THRESHOLD;
use crate::tuning::CarHandling;
use crate::{degrees_to_radians, rotate_point};

/// Paint job, picked by the renderer to choose a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarColor {
    Yellow,
    Blue,
    Red,
}

impl CarColor {
    /// CSS hex color
    pub fn hex(&self) -> &'static str {
        match self {
            CarColor::Yellow => "#FFD700",
            CarColor::Blue => "#4169E1",
            CarColor::Red => "#DC143C",
        }
    }
}

/// Steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    /// -1 for left, +1 for right (screen space, y down)
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Right => 1.0,
        }
    }
}

/// A car: player-driven or parked as an obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Top-left of the unrotated body
    pub pos: Vec2,
    /// Body width (along the heading) and height
    pub size: Vec2,
    /// Heading in degrees, 0 = +x, grows clockwise on screen. Not wrapped.
    pub angle: f32,
    /// Signed speed in pixels per tick, positive = forward
    pub speed: f32,
    pub handling: CarHandling,
    pub color: CarColor,
}

impl Vehicle {
    pub fn new(pos: Vec2, size: Vec2, color: CarColor, handling: CarHandling) -> Self {
        Self {
            pos,
            size,
            angle: 0.0,
            speed: 0.0,
            handling,
            color,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Reverse is capped at half the forward top speed
    #[inline]
    pub fn max_reverse(&self) -> f32 {
        -self.handling.max_speed / 2.0
    }

    pub fn accelerate(&mut self) {
        self.speed = (self.speed + self.handling.acceleration).min(self.handling.max_speed);
    }

    /// Slows down, then reverses
    pub fn brake(&mut self) {
        self.speed = (self.speed - self.handling.acceleration).max(self.max_reverse());
    }

    /// Steer proportionally to the current speed fraction.
    /// Reversing flips the effective direction; a car at rest cannot turn.
    pub fn turn(&mut self, steer: Steer) {
        if self.speed.abs() > STOP_THRESHOLD {
            self.angle += steer.sign() * self.handling.turn_speed * (self.speed / self.handling.max_speed);
        }
    }

    /// Advance one tick: move along the heading, then apply friction
    pub fn update(&mut self) {
        if self.speed != 0.0 {
            let rad = degrees_to_radians(self.angle);
            self.pos += Vec2::new(rad.cos(), rad.sin()) * self.speed;
        }

        self.speed *= self.handling.friction;
        if self.speed.abs() < STOP_THRESHOLD {
            self.speed = 0.0;
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.speed == 0.0
    }

    /// Body corners rotated by the heading about the center:
    /// top-left, top-right, bottom-right, bottom-left (before rotation)
    pub fn corners(&self) -> [Vec2; 4] {
        let center = self.center();
        let half = self.size / 2.0;
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|offset| rotate_point(center + offset, center, self.angle))
    }

    /// Axis-aligned box around the rotated corners
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.corners())
    }
}
