//! The Obsidian Wing: pose, flight state and status pools.

use engine_core::{Lifetime, Transform, Vec3};

use crate::config::FlightConfig;

/// Shields, hull and heat. Always within `[0, max]` after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipStatus {
    pub shields: f32,
    pub max_shields: f32,
    pub hull: f32,
    pub max_hull: f32,
    pub heat: f32,
    pub max_heat: f32,
}

impl ShipStatus {
    pub fn new(config: &FlightConfig) -> Self {
        Self {
            shields: config.max_shields,
            max_shields: config.max_shields,
            hull: config.max_hull,
            max_hull: config.max_hull,
            heat: 0.0,
            max_heat: config.max_heat,
        }
    }

    /// Drain shields; whatever the shields cannot absorb comes off the hull.
    pub fn absorb(&mut self, amount: f32) {
        self.shields -= amount;
        if self.shields < 0.0 {
            self.hull += self.shields;
            self.shields = 0.0;
        }
        self.clamp();
    }

    /// Direct hull damage, bypassing shields.
    pub fn damage_hull(&mut self, amount: f32) {
        self.hull -= amount;
        self.clamp();
    }

    pub fn add_heat(&mut self, amount: f32) {
        self.heat += amount;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.shields = self.shields.clamp(0.0, self.max_shields);
        self.hull = self.hull.clamp(0.0, self.max_hull);
        self.heat = self.heat.clamp(0.0, self.max_heat);
    }

    /// (shields, hull, heat) as percentages for the HUD.
    pub fn percentages(&self) -> (f32, f32, f32) {
        let pct = |v: f32, max: f32| if max > 0.0 { v / max * 100.0 } else { 0.0 };
        (
            pct(self.shields, self.max_shields),
            pct(self.hull, self.max_hull),
            pct(self.heat, self.max_heat),
        )
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull <= 0.0
    }
}

/// Player ship.
#[derive(Debug, Clone)]
pub struct Ship {
    pub transform: Transform,
    /// Forward speed in units per tick. Never negative.
    pub speed: f32,
    /// Visual roll angle, eased toward the yaw direction.
    pub bank: f32,
    pub status: ShipStatus,
    /// Red tint after vent damage.
    pub damage_flash: Lifetime,
}

impl Ship {
    /// Spawn at `position` facing the sun at the origin.
    pub fn new(position: Vec3, config: &FlightConfig) -> Self {
        Self {
            transform: Transform::looking_at(position, Vec3::ZERO),
            speed: 0.0,
            bank: 0.0,
            status: ShipStatus::new(config),
            damage_flash: Lifetime::default(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Teleport and face `target`. Throttle setting is kept.
    pub fn relocate(&mut self, position: Vec3, target: Vec3) {
        self.transform = Transform::looking_at(position, target);
    }

    /// Engine trails are lit above a crawl.
    pub fn is_thrusting(&self) -> bool {
        self.speed > 0.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_overflow_spills_into_hull() {
        let mut status = ShipStatus::new(&FlightConfig::default());
        status.shields = 1.0;
        status.absorb(3.0);
        assert_eq!(status.shields, 0.0);
        assert_eq!(status.hull, 98.0);
    }

    #[test]
    fn status_never_leaves_bounds() {
        let mut status = ShipStatus::new(&FlightConfig::default());
        status.absorb(1000.0);
        status.add_heat(1000.0);
        assert_eq!(status.shields, 0.0);
        assert_eq!(status.hull, 0.0);
        assert_eq!(status.heat, 100.0);
        assert!(status.is_destroyed());
        status.add_heat(-1000.0);
        assert_eq!(status.heat, 0.0);
    }

    #[test]
    fn new_ship_faces_the_sun() {
        let ship = Ship::new(Vec3::new(0.0, 0.0, -350.0), &FlightConfig::default());
        assert!(ship.transform.forward().distance(Vec3::Z) < 1e-4);
        assert_eq!(ship.status.percentages(), (100.0, 100.0, 0.0));
    }
}
