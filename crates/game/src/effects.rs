//! Short-lived world effects: junction explosions and their expanding blast.

use engine_core::Lifetime;
use glam::Vec3;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectKind {
    JunctionExplosion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec3,
    pub lifetime: Lifetime,
    /// Lifetime the effect started with, for progress queries.
    pub duration: f32,
}

impl Effect {
    pub fn junction_explosion(position: Vec3, duration: f32) -> Self {
        Self {
            kind: EffectKind::JunctionExplosion,
            position,
            lifetime: Lifetime::new(duration),
            duration,
        }
    }

    /// 0 at spawn, 1 at expiry.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.lifetime.remaining / self.duration).clamp(0.0, 1.0)
    }
}

/// Every live effect in the world.
#[derive(Debug, Default)]
pub struct Effects {
    pub active: Vec<Effect>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, effect: Effect) {
        self.active.push(effect);
    }

    pub fn update(&mut self, dt: f32) {
        for effect in &mut self.active {
            effect.lifetime.update(dt);
        }
        self.active.retain(|e| e.lifetime.is_active());
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.active.iter()
    }
}
