//! Read-only view of the world handed to the presentation layer each tick.

use engine_core::{Health, Quat, Transform, Vec3};
use serde::Serialize;

use crate::corroder::{Corroder, CorroderKind};
use crate::effects::EffectKind;
use crate::simulation::Simulation;
use crate::zone::{Ambient, Zone};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipSnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    pub forward: Vec3,
    pub speed: f32,
    /// Visual roll in radians.
    pub bank: f32,
    pub shields_pct: f32,
    pub hull_pct: f32,
    pub heat_pct: f32,
    /// Engine trails on.
    pub thrusting: bool,
    /// Vent damage tint still showing.
    pub damage_flash: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub id: u64,
    pub kind: CorroderKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub size: f32,
    pub health_pct: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    pub position: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JunctionSnapshot {
    pub index: usize,
    pub position: Vec3,
    pub health_pct: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSnapshot {
    pub kind: EffectKind,
    pub position: Vec3,
    /// 0 at spawn, 1 at expiry.
    pub progress: f32,
}

/// Everything a renderer or HUD needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub zone: Zone,
    pub zone_name: &'static str,
    pub zone_label: &'static str,
    pub ship: ShipSnapshot,
    /// Agents of the active zone only.
    pub agents: Vec<AgentSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub collapsed_sectors: Vec<usize>,
    pub sector_count: usize,
    /// Open plasma vents. Empty inside the sanctum.
    pub hazards: Vec<Vec3>,
    pub junctions: Vec<JunctionSnapshot>,
    /// Sanctum plasma clouds, visual only.
    pub plasma_clouds: Vec<Vec3>,
    pub effects: Vec<EffectSnapshot>,
    pub ambient: Ambient,
    pub alert_level: f32,
    /// Corroders alive across every zone.
    pub population: usize,
}

impl WorldSnapshot {
    pub fn capture(sim: &Simulation) -> Self {
        let ship = sim.ship();
        let (shields_pct, hull_pct, heat_pct) = ship.status.percentages();
        let zone = sim.zone().current;

        let agents = sim
            .agents()
            .query::<(&Transform, &Health, &Corroder)>()
            .iter()
            .filter(|(_, (_, _, c))| c.zone == zone)
            .map(|(entity, (t, h, c))| AgentSnapshot {
                id: entity.to_bits().get(),
                kind: c.kind,
                position: t.position,
                rotation: t.rotation,
                size: c.kind.size(),
                health_pct: h.percentage() * 100.0,
            })
            .collect();

        let (junctions, plasma_clouds) = match (zone, sim.zone().sanctum()) {
            (Zone::Mercury, Some(sanctum)) => (
                sanctum
                    .junctions
                    .iter()
                    .enumerate()
                    .map(|(index, j)| JunctionSnapshot {
                        index,
                        position: j.position,
                        health_pct: j.health.percentage() * 100.0,
                        alive: j.alive,
                    })
                    .collect(),
                sanctum.plasma_clouds.clone(),
            ),
            _ => (Vec::new(), Vec::new()),
        };

        let hazards = if zone == Zone::Sphere {
            sim.shell().vents().map(|v| v.position).collect()
        } else {
            Vec::new()
        };

        Self {
            tick: sim.tick_count(),
            zone,
            zone_name: zone.name(),
            zone_label: zone.display_name(),
            ship: ShipSnapshot {
                position: ship.position(),
                rotation: ship.transform.rotation,
                forward: ship.transform.forward(),
                speed: ship.speed,
                bank: ship.bank,
                shields_pct,
                hull_pct,
                heat_pct,
                thrusting: ship.is_thrusting(),
                damage_flash: ship.damage_flash.is_active(),
            },
            agents,
            projectiles: sim
                .projectiles()
                .iter()
                .map(|p| ProjectileSnapshot {
                    position: p.position,
                    direction: p.direction,
                })
                .collect(),
            collapsed_sectors: sim.shell().collapsed_sectors(),
            sector_count: sim.shell().sector_count(),
            hazards,
            junctions,
            plasma_clouds,
            effects: sim
                .effects()
                .iter()
                .map(|e| EffectSnapshot {
                    kind: e.kind,
                    position: e.position,
                    progress: e.progress(),
                })
                .collect(),
            ambient: sim.zone().ambient,
            alert_level: sim.swarm().alert_level,
            population: sim.population(),
        }
    }

    /// Collapsed sectors out of the total, for the mission readout.
    pub fn shell_integrity(&self) -> (usize, usize) {
        (self.collapsed_sectors.len(), self.sector_count)
    }
}
