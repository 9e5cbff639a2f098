//! Corroder enemy types and components.

use engine_core::{Health, Transform, Vec3};
use hecs::{Entity, World};
use serde::Serialize;

use crate::zone::Zone;

/// Types of corroder with different behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CorroderKind {
    /// Small, fast unit that leaps onto the cockpit and self-destructs.
    Mite,
    /// Heavy unit that grinds toward the ship and devours hull plating.
    Processor,
    /// Stationary factory that builds mites.
    Assembler,
}

impl CorroderKind {
    /// Edge length of the corroder's cubic hull.
    pub fn size(&self) -> f32 {
        match self {
            CorroderKind::Mite => 2.0,
            CorroderKind::Processor => 6.0,
            CorroderKind::Assembler => 15.0,
        }
    }

    pub fn health(&self) -> f32 {
        match self {
            CorroderKind::Mite => 1.0,
            CorroderKind::Processor => 3.0,
            CorroderKind::Assembler => 10.0,
        }
    }

    /// Units per dt.
    pub fn speed(&self) -> f32 {
        match self {
            CorroderKind::Mite => 2.0,
            CorroderKind::Processor => 0.5,
            CorroderKind::Assembler => 0.2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CorroderKind::Mite => "MITE",
            CorroderKind::Processor => "PROCESSOR",
            CorroderKind::Assembler => "ASSEMBLER",
        }
    }

    /// Fresh behaviour state for a newly built corroder of this kind.
    pub fn behavior(&self) -> Behavior {
        match self {
            CorroderKind::Mite => Behavior::Jumper,
            CorroderKind::Processor => Behavior::Tank,
            CorroderKind::Assembler => Behavior::Factory { last_spawn_ms: None },
        }
    }
}

/// Behaviour policy, carrying exactly the state each policy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Hunts the ship inside the hunt radius, otherwise drifts with the swarm.
    Jumper,
    /// Always advances on the ship in formation.
    Tank,
    /// Stationary; builds a mite whenever its cooldown elapses.
    Factory { last_spawn_ms: Option<u64> },
}

impl Behavior {
    pub fn is_factory(&self) -> bool {
        matches!(self, Behavior::Factory { .. })
    }
}

/// What a corroder is trying to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentTarget {
    #[default]
    Ship,
    /// Index into the sanctum's junction list.
    Junction(usize),
}

/// Corroder enemy component.
#[derive(Debug, Clone)]
pub struct Corroder {
    pub kind: CorroderKind,
    pub speed: f32,
    pub behavior: Behavior,
    pub target: AgentTarget,
    /// Zone this corroder lives in; only the active zone's swarm is simulated.
    pub zone: Zone,
}

impl Corroder {
    pub fn new(kind: CorroderKind, zone: Zone) -> Self {
        Self {
            kind,
            speed: kind.speed(),
            behavior: kind.behavior(),
            target: AgentTarget::Ship,
            zone,
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.kind.size() * 0.5
    }
}

/// Bundle of components for spawning a corroder.
pub struct CorroderBundle {
    pub transform: Transform,
    pub health: Health,
    pub corroder: Corroder,
}

impl CorroderBundle {
    /// Corroder at `position`, oriented toward the sun like the rest of the swarm.
    pub fn new(kind: CorroderKind, position: Vec3, zone: Zone) -> Self {
        Self {
            transform: Transform::looking_at(position, Vec3::ZERO),
            health: Health::new(kind.health()),
            corroder: Corroder::new(kind, zone),
        }
    }

    pub fn targeting(mut self, target: AgentTarget) -> Self {
        self.corroder.target = target;
        self
    }

    /// Spawn into the ECS world.
    pub fn spawn(self, world: &mut World) -> Entity {
        world.spawn((self.transform, self.health, self.corroder))
    }
}

/// Number of corroders alive across all zones.
pub fn population(world: &World) -> usize {
    world.query::<&Corroder>().iter().count()
}
