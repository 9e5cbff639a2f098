//! Corroder swarm: shared alert state, cohesion, per-kind behaviour,
//! factory output, replication and out-of-bounds culling.
//!
//! One pass per tick. Cohesion reads the positions agents had when the pass
//! started, so the order agents are visited in does not change the result.
//! Spawns and removals are collected during the pass and applied after it.

use engine_core::{Transform, Vec3};
use hecs::{Entity, World};
use rand::Rng;

use crate::config::SwarmConfig;
use crate::corroder::{population, AgentTarget, Behavior, Corroder, CorroderBundle, CorroderKind};
use crate::events::{DamageSource, DeathCause, EventQueue, SimEvent, SpawnCause};
use crate::neighbors::{AgentPoint, BruteForceNeighbors, GridNeighbors, NeighborQuery};
use crate::ship::Ship;
use crate::spawner::{random_offset, spawn_corroder};
use crate::zone::Zone;

/// Above this many active agents cohesion switches to the hash grid. Only
/// reachable when the population cap is raised past it.
const GRID_THRESHOLD: usize = 256;

/// Per-tick inputs the swarm pass needs besides the world and the ship.
#[derive(Debug, Clone, Copy)]
pub struct SwarmTick {
    pub dt: f32,
    pub now_ms: u64,
    /// Only agents in this zone move, spawn or replicate.
    pub zone: Zone,
    pub shell_radius: f32,
}

/// Swarm-wide state shared by every corroder.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmIntelligence {
    /// Population over the density normaliser.
    pub density: f32,
    /// 0..=1, rises while the ship is near or inside the shell. Never decays.
    pub alert_level: f32,
    pub last_replication_ms: Option<u64>,
    pub communication_radius: f32,
}

impl SwarmIntelligence {
    pub fn new(config: &SwarmConfig) -> Self {
        Self {
            density: 0.0,
            alert_level: 0.0,
            last_replication_ms: None,
            communication_radius: config.communication_radius,
        }
    }

    pub fn update_metrics(
        &mut self,
        population: usize,
        ship_position: Vec3,
        shell_radius: f32,
        dt: f32,
        config: &SwarmConfig,
    ) {
        self.density = population as f32 / config.density_normalizer;
        let presence =
            (1.0 - (ship_position.length() - shell_radius) / config.alert_falloff).max(0.0);
        self.alert_level = (self.alert_level + presence * config.alert_gain * dt).min(1.0);
    }

    /// Milliseconds between factory builds at the current alert level.
    pub fn factory_cooldown_ms(&self, config: &SwarmConfig) -> f32 {
        config.factory_cooldown_base_ms - self.alert_level * config.factory_cooldown_alert_scale_ms
    }

    /// Per-tick probability of a replication attempt.
    pub fn replication_probability(&self, config: &SwarmConfig) -> f32 {
        self.density * self.alert_level * config.replication_chance
    }

    pub fn replication_ready(&self, now_ms: u64, config: &SwarmConfig) -> bool {
        self.last_replication_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= config.replication_cooldown_ms)
    }

    /// Copy a random non-factory agent of `zone`. Fails during cooldown, at
    /// the population cap, or when no eligible parent exists.
    pub fn attempt_replication<R: Rng>(
        &mut self,
        world: &mut World,
        zone: Zone,
        now_ms: u64,
        config: &SwarmConfig,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> Option<Entity> {
        if !self.replication_ready(now_ms, config) || population(world) >= config.population_cap {
            return None;
        }
        let parents: Vec<(CorroderKind, Vec3)> = world
            .query::<(&Transform, &Corroder)>()
            .iter()
            .filter(|(_, (_, c))| c.zone == zone && !c.behavior.is_factory())
            .map(|(_, (t, c))| (c.kind, t.position))
            .collect();
        if parents.is_empty() {
            return None;
        }
        let (parent_kind, parent_position) = parents[rng.gen_range(0..parents.len())];
        let kind = offspring_kind(parent_kind, rng);
        let position = parent_position + random_offset(rng, config.replication_spread);
        let entity = spawn_corroder(
            world,
            CorroderBundle::new(kind, position, zone),
            SpawnCause::Replication,
            Some(config.population_cap),
            events,
        )?;
        self.last_replication_ms = Some(now_ms);
        log::debug!("{} replicated into a {}", parent_kind.name(), kind.name());
        Some(entity)
    }

    /// Run one swarm pass over the active zone.
    pub fn update<R: Rng>(
        &mut self,
        world: &mut World,
        ship: &mut Ship,
        tick: SwarmTick,
        config: &SwarmConfig,
        rng: &mut R,
        events: &mut EventQueue,
    ) {
        let ship_position = ship.position();
        self.update_metrics(population(world), ship_position, tick.shell_radius, tick.dt, config);

        if rng.gen::<f32>() < self.replication_probability(config) {
            self.attempt_replication(world, tick.zone, tick.now_ms, config, rng, events);
        }

        let points: Vec<AgentPoint> = world
            .query::<(&Transform, &Corroder)>()
            .iter()
            .filter(|(_, (_, c))| c.zone == tick.zone)
            .map(|(entity, (t, _))| AgentPoint {
                entity,
                position: t.position,
            })
            .collect();
        let neighbors: Box<dyn NeighborQuery> = if points.len() > GRID_THRESHOLD {
            Box::new(GridNeighbors::new(points, self.communication_radius))
        } else {
            Box::new(BruteForceNeighbors::new(points))
        };

        let factory_cooldown = self.factory_cooldown_ms(config);
        let out_of_bounds = tick.shell_radius + config.out_of_bounds_margin;
        let mut removals: Vec<(Entity, CorroderKind, Vec3, DeathCause)> = Vec::new();
        let mut builds: Vec<Vec3> = Vec::new();

        for (entity, (transform, corroder)) in
            world.query_mut::<(&mut Transform, &mut Corroder)>()
        {
            // Junction raiders are steered by the sanctum.
            if corroder.zone != tick.zone || matches!(corroder.target, AgentTarget::Junction(_)) {
                continue;
            }
            let swarm = cohesion_vector(
                neighbors.as_ref(),
                entity,
                transform.position,
                self.communication_radius,
                config.cohesion_strength,
            );
            let to_ship = ship_position - transform.position;

            match &mut corroder.behavior {
                Behavior::Jumper => {
                    if to_ship.length() < config.hunt_radius {
                        let dir = (to_ship.normalize_or_zero() + swarm).normalize_or_zero();
                        transform.position += dir * corroder.speed * tick.dt;
                        if transform.position.distance(ship_position) < config.contact_range {
                            ship.status.shields -= config.contact_shield_damage * tick.dt;
                            ship.status.hull -= config.contact_hull_damage * tick.dt;
                            ship.status.clamp();
                            events.push(SimEvent::ShipDamaged {
                                source: DamageSource::Corroder,
                            });
                            removals.push((
                                entity,
                                corroder.kind,
                                transform.position,
                                DeathCause::Contact,
                            ));
                            continue;
                        }
                    } else {
                        transform.position += swarm * corroder.speed * 0.5 * tick.dt;
                    }
                }
                Behavior::Tank => {
                    let dir = (to_ship.normalize_or_zero() + swarm).normalize_or_zero();
                    transform.position += dir * corroder.speed * tick.dt;
                    transform.look_at(ship_position, Vec3::Y);
                }
                Behavior::Factory { last_spawn_ms } => {
                    let ready = last_spawn_ms.map_or(true, |last| {
                        tick.now_ms.saturating_sub(last) as f32 > factory_cooldown
                    });
                    if ready {
                        builds.push(transform.position + random_offset(rng, config.factory_spread));
                        *last_spawn_ms = Some(tick.now_ms);
                    }
                }
            }

            if transform.position.length() > out_of_bounds {
                removals.push((entity, corroder.kind, transform.position, DeathCause::OutOfBounds));
            }
        }

        for (entity, kind, position, cause) in removals {
            if world.despawn(entity).is_ok() {
                if cause == DeathCause::OutOfBounds {
                    log::debug!("{} drifted out of bounds at {:?}", kind.name(), position);
                }
                events.push(SimEvent::AgentDestroyed {
                    entity,
                    kind,
                    position,
                    cause,
                });
            }
        }

        for position in builds {
            let built = spawn_corroder(
                world,
                CorroderBundle::new(CorroderKind::Mite, position, tick.zone),
                SpawnCause::Factory,
                Some(config.population_cap),
                events,
            );
            if built.is_some() {
                log::debug!("Assembler built a mite at {:?}", position);
            }
        }
    }
}

/// Pull toward the average position of neighbours within `radius`.
pub fn cohesion_vector(
    neighbors: &dyn NeighborQuery,
    entity: Entity,
    position: Vec3,
    radius: f32,
    strength: f32,
) -> Vec3 {
    let near = neighbors.neighbors_within(position, radius, entity);
    if near.is_empty() {
        return Vec3::ZERO;
    }
    let average = near.iter().copied().sum::<Vec3>() / near.len() as f32;
    (average - position).normalize_or_zero() * strength
}

/// Replicas mostly come out as mites.
pub fn offspring_kind<R: Rng>(parent: CorroderKind, rng: &mut R) -> CorroderKind {
    match parent {
        CorroderKind::Mite => CorroderKind::Mite,
        CorroderKind::Processor => {
            if rng.gen::<f32>() < 0.7 {
                CorroderKind::Mite
            } else {
                CorroderKind::Processor
            }
        }
        CorroderKind::Assembler => {
            if rng.gen::<f32>() < 0.8 {
                CorroderKind::Mite
            } else {
                CorroderKind::Processor
            }
        }
    }
}
