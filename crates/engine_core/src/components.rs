//! Common ECS components used across the simulation.

use serde::{Deserialize, Serialize};

/// Health component for damageable entities (agents, junctions).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtract `amount`. Not floored: callers compare against zero to detect death.
    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Countdown for temporary things (flashes, explosion effects), in simulation dt units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(remaining: f32) -> Self {
        Self { remaining }
    }

    /// Advance by `dt`. Returns true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_goes_negative_and_reports_dead() {
        let mut h = Health::new(1.0);
        h.take_damage(1.0);
        assert!(h.is_dead());
        h.take_damage(1.0);
        assert_eq!(h.current, -1.0);
        assert_eq!(h.percentage(), 0.0);
    }

    #[test]
    fn lifetime_expires_after_enough_dt() {
        let mut l = Lifetime::new(6.0);
        assert!(!l.update(5.0));
        assert!(l.is_active());
        assert!(l.update(1.0));
        assert!(!l.is_active());
    }
}
