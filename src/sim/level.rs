//! A single level: layout generation and the per-tick update
//!
//! A level owns everything on the playfield. It is never reset in place;
//! retrying or advancing builds a fresh one.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{
    Bounds, ParkingCheck, ParkingRules, check_car_collision, check_cone_collision, check_parking,
};
use super::vehicle::{CarColor, Vehicle};
use crate::rotate_point;
use crate::tuning::{SpotFootprint, Tuning};

/// Spot orientations, drawn uniformly
pub const SPOT_ANGLES: [f32; 4] = [0.0, 90.0, 180.0, 270.0];

/// Traffic cone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Center
    pub pos: Vec2,
    pub radius: f32,
}

/// Target rectangle, rotated about its center by `angle`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpot {
    /// Top-left before rotation
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees, one of `SPOT_ANGLES`; also the heading the car must match
    pub angle: f32,
}

impl ParkingSpot {
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Outline corners as drawn
    pub fn corners(&self) -> [Vec2; 4] {
        let center = self.center();
        [
            self.pos,
            self.pos + Vec2::new(self.size.x, 0.0),
            self.pos + self.size,
            self.pos + Vec2::new(0.0, self.size.y),
        ]
        .map(|p| rotate_point(p, center, self.angle))
    }

    /// Box the parked car must fit in (before the parking margin)
    pub fn footprint(&self, kind: SpotFootprint) -> Bounds {
        match kind {
            SpotFootprint::Rotated => Bounds::from_points(&self.corners()),
            SpotFootprint::Unrotated => Bounds::new(self.pos, self.pos + self.size),
        }
    }
}

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    Timeout,
    CarCollision,
    ConeCollision,
}

impl FailReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailReason::Timeout => "Out of time",
            FailReason::CarCollision => "Hit a car",
            FailReason::ConeCollision => "Hit a cone",
        }
    }
}

/// One level's playfield and clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub number: u32,
    pub player: Vehicle,
    /// Obstacle cars, in spawn order
    pub cars: Vec<Vehicle>,
    pub cones: Vec<Cone>,
    pub spot: ParkingSpot,
    pub rules: ParkingRules,
    pub time_limit: f32,
    /// Seconds left; may go negative on the tick that times out
    pub time_remaining: f32,
    pub completed: bool,
    pub failed: bool,
    pub failure: Option<FailReason>,
}

impl Level {
    /// Lay out level `number`. Random draws are taken in a fixed order
    /// (spot x, y, angle, then each car's x, y, then each cone's x, y) so a
    /// seeded `rng` reproduces the same level.
    pub fn generate<R: Rng>(number: u32, tuning: &Tuning, rng: &mut R) -> Self {
        let spot_pos = tuning.spot_region().sample(rng.random(), rng.random());
        let angle = SPOT_ANGLES[rng.random_range(0..SPOT_ANGLES.len())];
        let spot = ParkingSpot {
            pos: spot_pos,
            size: tuning.spot_size,
            angle,
        };

        // Spawn on the far side of the field from the spot
        let field = tuning.field_size;
        let near = Vec2::splat(tuning.field_margin);
        let far = field - near;
        let player_pos = Vec2::new(
            if spot.pos.x < field.x / 2.0 { far.x } else { near.x },
            if spot.pos.y < field.y / 2.0 { far.y } else { near.y },
        );
        let player = Vehicle::new(player_pos, tuning.car_size, CarColor::Yellow, tuning.handling);

        let mut cars = Vec::new();
        if number >= tuning.first_car_level {
            let pos = tuning.first_car_region.sample(rng.random(), rng.random());
            cars.push(Vehicle::new(pos, tuning.car_size, CarColor::Blue, tuning.handling));
        }
        if number >= tuning.second_car_level {
            let pos = tuning.second_car_region.sample(rng.random(), rng.random());
            cars.push(Vehicle::new(pos, tuning.car_size, CarColor::Red, tuning.handling));
        }

        let mut cones = Vec::new();
        if number >= tuning.cone_level {
            let region = tuning.cone_region();
            for _ in 0..number {
                cones.push(Cone {
                    pos: region.sample(rng.random(), rng.random()),
                    radius: tuning.cone_radius,
                });
            }
        }

        log::info!(
            "Level {}: spot at ({:.0}, {:.0}) facing {}°, {} cars, {} cones",
            number,
            spot.pos.x,
            spot.pos.y,
            spot.angle,
            cars.len(),
            cones.len()
        );

        Self {
            number,
            player,
            cars,
            cones,
            spot,
            rules: ParkingRules::from(tuning),
            time_limit: tuning.time_limit,
            time_remaining: tuning.time_limit,
            completed: false,
            failed: false,
            failure: None,
        }
    }

    /// True once the level is won or lost
    #[inline]
    pub fn is_over(&self) -> bool {
        self.completed || self.failed
    }

    /// Current parking conditions, for HUD hints
    pub fn parking_check(&self) -> ParkingCheck {
        check_parking(&self.player, &self.spot, &self.rules)
    }

    fn fail(&mut self, reason: FailReason) {
        log::debug!("Level {} failed: {}", self.number, reason.as_str());
        self.failed = true;
        self.failure = Some(reason);
    }

    /// Advance one tick of `dt` seconds. Does nothing once the level is over.
    pub fn update(&mut self, dt: f32) {
        if self.is_over() {
            return;
        }

        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.fail(FailReason::Timeout);
            return;
        }

        self.player.update();

        if self.cars.iter().any(|car| check_car_collision(&self.player, car)) {
            self.fail(FailReason::CarCollision);
            return;
        }

        if self.cones.iter().any(|cone| check_cone_collision(&self.player, cone)) {
            self.fail(FailReason::ConeCollision);
            return;
        }

        if self.parking_check().is_parked() {
            log::debug!("Level {} parked with {:.1}s left", self.number, self.time_remaining);
            self.completed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level(number: u32, seed: u64) -> Level {
        let mut rng = Pcg32::seed_from_u64(seed);
        Level::generate(number, &Tuning::default(), &mut rng)
    }

    /// Put the player squarely in the spot, at rest
    fn park(level: &mut Level) {
        let p = &mut level.player;
        p.pos = level.spot.center() - p.size / 2.0;
        p.angle = level.spot.angle;
        p.speed = 0.0;
    }

    #[test]
    fn test_obstacle_counts_by_level() {
        for seed in 0..20 {
            let l1 = level(1, seed);
            assert_eq!(l1.cars.len(), 0);
            assert_eq!(l1.cones.len(), 0);

            let l2 = level(2, seed);
            assert_eq!(l2.cars.len(), 1);
            assert_eq!(l2.cones.len(), 0);

            let l3 = level(3, seed);
            assert_eq!(l3.cars.len(), 2);
            assert_eq!(l3.cones.len(), 0);

            for n in 4..12 {
                let l = level(n, seed);
                assert_eq!(l.cars.len(), 2);
                assert_eq!(l.cones.len(), n as usize);
            }
        }
    }

    #[test]
    fn test_obstacle_car_colors() {
        let l = level(3, 7);
        assert_eq!(l.player.color, CarColor::Yellow);
        assert_eq!(l.cars[0].color, CarColor::Blue);
        assert_eq!(l.cars[1].color, CarColor::Red);
    }

    #[test]
    fn test_spot_placement() {
        for seed in 0..200 {
            let l = level(1, seed);
            let s = l.spot;
            assert!(SPOT_ANGLES.contains(&s.angle));
            assert_eq!(s.size, Vec2::new(130.0, 78.0));
            assert!(s.pos.x >= 100.0 && s.pos.x + s.size.x <= 700.0);
            assert!(s.pos.y >= 100.0 && s.pos.y + s.size.y <= 500.0);
        }
    }

    #[test]
    fn test_all_spot_angles_occur() {
        let mut seen = [false; 4];
        for seed in 0..200 {
            let a = level(1, seed).spot.angle;
            let i = SPOT_ANGLES.iter().position(|x| *x == a).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_player_spawns_opposite_spot() {
        for seed in 0..100 {
            let l = level(1, seed);
            let want_x = if l.spot.pos.x < 400.0 { 700.0 } else { 100.0 };
            let want_y = if l.spot.pos.y < 300.0 { 500.0 } else { 100.0 };
            assert_eq!(l.player.pos, Vec2::new(want_x, want_y));
            assert_eq!(l.player.size, Vec2::new(91.0, 52.0));
            assert_eq!(l.player.angle, 0.0);
            assert_eq!(l.player.speed, 0.0);
        }
    }

    #[test]
    fn test_hazard_regions() {
        for seed in 0..50 {
            let l = level(9, seed);
            let a = l.cars[0].pos;
            assert!((300.0..=500.0).contains(&a.x) && (200.0..=400.0).contains(&a.y));
            let b = l.cars[1].pos;
            assert!((200.0..=500.0).contains(&b.x) && (100.0..=500.0).contains(&b.y));
            for cone in &l.cones {
                assert_eq!(cone.radius, 10.0);
                assert!((100.0..=700.0).contains(&cone.pos.x));
                assert!((100.0..=500.0).contains(&cone.pos.y));
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        assert_eq!(level(6, 4242), level(6, 4242));
        assert_ne!(level(6, 4242).spot, level(6, 4243).spot);
    }

    #[test]
    fn test_fresh_level_clock_and_flags() {
        let l = level(1, 1);
        assert_eq!(l.time_limit, 180.0);
        assert_eq!(l.time_remaining, 180.0);
        assert!(!l.completed && !l.failed);
        assert_eq!(l.failure, None);
    }

    #[test]
    fn test_timeout() {
        let mut l = level(1, 3);
        l.time_remaining = 0.05;
        l.player.speed = 2.0;
        let pos = l.player.pos;

        l.update(0.1);
        assert!(l.failed);
        assert!(!l.completed);
        assert_eq!(l.failure, Some(FailReason::Timeout));
        assert!(l.time_remaining <= 0.0);
        assert!((l.time_remaining + 0.05).abs() < 1e-6);
        // Player is not integrated on the tick that times out
        assert_eq!(l.player.pos, pos);
    }

    #[test]
    fn test_clock_counts_down() {
        let mut l = level(1, 3);
        l.update(0.5);
        l.update(0.25);
        assert!((l.time_remaining - 179.25).abs() < 1e-4);
        assert!(!l.is_over());
    }

    #[test]
    fn test_update_moves_player() {
        let mut l = level(1, 3);
        let x = l.player.pos.x;
        l.player.accelerate();
        l.update(1.0 / 60.0);
        assert!((l.player.pos.x - (x + 0.15)).abs() < 1e-3);
        assert!((l.player.speed - 0.15 * 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_car_collision_fails() {
        let mut l = level(2, 11);
        l.player.pos = l.cars[0].pos + Vec2::new(10.0, 10.0);
        l.update(0.016);
        assert!(l.failed);
        assert_eq!(l.failure, Some(FailReason::CarCollision));
    }

    #[test]
    fn test_cone_collision_fails() {
        let mut l = level(4, 11);
        l.cars.clear();
        let corner = l.player.corners()[0];
        l.cones[0].pos = corner + Vec2::new(2.0, 2.0);
        l.update(0.016);
        assert!(l.failed);
        assert_eq!(l.failure, Some(FailReason::ConeCollision));
    }

    #[test]
    fn test_collision_beats_parking() {
        let mut l = level(2, 5);
        park(&mut l);
        l.cars[0].pos = l.player.pos;
        l.update(0.016);
        assert!(l.failed);
        assert!(!l.completed);
    }

    #[test]
    fn test_parking_completes() {
        for seed in 0..40 {
            let mut l = level(1, seed);
            park(&mut l);
            l.update(0.016);
            assert!(l.completed, "seed {seed}: spot angle {}", l.spot.angle);
            assert!(!l.failed);
        }
    }

    #[test]
    fn test_rolling_through_spot_does_not_complete() {
        let mut l = level(1, 9);
        park(&mut l);
        l.player.speed = 1.0;
        l.update(0.016);
        assert!(!l.completed);
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut l = level(5, 21);
        l.player.speed = 3.0;
        l.failed = true;
        let before = l.clone();
        for _ in 0..10 {
            l.update(0.5);
        }
        assert_eq!(l, before);

        let mut l = level(1, 21);
        park(&mut l);
        l.update(0.016);
        assert!(l.completed);
        let before = l.clone();
        l.update(0.016);
        l.update(1000.0);
        assert_eq!(l, before);
        assert!(!l.failed);
    }

    #[test]
    fn test_spot_footprint() {
        let spot = ParkingSpot {
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::new(130.0, 78.0),
            angle: 90.0,
        };
        let rotated = spot.footprint(SpotFootprint::Rotated);
        assert!((rotated.width() - 78.0).abs() < 1e-3);
        assert!((rotated.height() - 130.0).abs() < 1e-3);
        assert!(rotated.min.distance(Vec2::new(126.0, 74.0)) < 1e-3);

        let plain = spot.footprint(SpotFootprint::Unrotated);
        assert_eq!(plain, Bounds::new(Vec2::new(100.0, 100.0), Vec2::new(230.0, 178.0)));
    }

    #[test]
    fn test_level_snapshot_json() {
        let l = level(4, 8);
        let json = serde_json::to_string(&l).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cones.len(), 4);
        assert_eq!(back.number, 4);
    }
}
