//! Discrete, fire-and-forget notifications for the presentation layer.
//!
//! The core pushes events while it ticks and hands the batch back in the
//! [`crate::TickReport`]; nothing waits on them being consumed.

use glam::Vec3;
use hecs::Entity;

use crate::corroder::CorroderKind;
use crate::zone::Zone;

/// Why a corroder entered the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnCause {
    Initial,
    Factory,
    Replication,
    JunctionRaid,
}

/// Why a corroder left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Shot down by the ship's lasers.
    Destroyed,
    /// Mite reached the ship and self-destructed on contact.
    Contact,
    /// Drifted too far from the shell.
    OutOfBounds,
}

/// What hurt the ship this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    PlasmaVent,
    Corroder,
    SanctumHeat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    AgentSpawned {
        entity: Entity,
        kind: CorroderKind,
        position: Vec3,
        cause: SpawnCause,
    },
    AgentDestroyed {
        entity: Entity,
        kind: CorroderKind,
        position: Vec3,
        cause: DeathCause,
    },
    /// Sector is past half its collapse threshold; `glow` is damage / threshold.
    SectorStressed { sector: usize, glow: f32 },
    SectorCollapsed { sector: usize, vents: Vec<Vec3> },
    JunctionDestroyed { index: usize, position: Vec3 },
    ZoneTransitioned { from: Zone, to: Zone },
    ShotFired { origins: Vec<Vec3> },
    ShipDamaged { source: DamageSource },
}

/// Per-tick event buffer.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take every event queued so far, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }
}
