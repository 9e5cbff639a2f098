//! The simulation context: owns every piece of mutable state and runs the
//! ordered per-tick pass (flight, zone, swarm, combat, effects).

use engine_core::Vec3;
use hecs::{Entity, World};
use input::InputSnapshot;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::combat::{update_projectiles, Projectile, Weapon};
use crate::config::SimConfig;
use crate::corroder::{population, CorroderBundle, CorroderKind};
use crate::effects::Effects;
use crate::error::ConfigError;
use crate::events::{EventQueue, SimEvent, SpawnCause};
use crate::flight::{apply_vent_hazards, update_flight, FlightOutcome};
use crate::shell::Shell;
use crate::ship::Ship;
use crate::snapshot::WorldSnapshot;
use crate::spawner::spawn_initial_population;
use crate::swarm::{SwarmIntelligence, SwarmTick};
use crate::zone::{
    apply_sanctum_heat, spawn_junction_raider, update_junction_raiders, Zone, ZoneState,
};

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<SimEvent>,
    pub flight: FlightOutcome,
    /// Vents the ship sat in this tick.
    pub vent_exposure: usize,
    pub kills: usize,
}

pub struct Simulation {
    config: SimConfig,
    rng: StdRng,
    tick: u64,
    ship: Ship,
    shell: Shell,
    agents: World,
    projectiles: Vec<Projectile>,
    weapon: Weapon,
    swarm: SwarmIntelligence,
    zone: ZoneState,
    effects: Effects,
    events: EventQueue,
}

impl Simulation {
    /// Build the battlefield: shell, ship at the battlefield entry point and the opening swarm.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let shell = Shell::new(&config.shell, &mut rng);
        let ship = Ship::new(Vec3::from(config.zone.battlefield_entry), &config.flight);
        let mut agents = World::new();
        let mut events = EventQueue::new();
        spawn_initial_population(
            &mut agents,
            config.swarm.initial_population,
            config.shell.radius,
            config.swarm.initial_mix,
            &mut rng,
            &mut events,
        );
        log::info!(
            "Simulation ready: {} sectors, {} surface structures, seed {:?}",
            shell.sector_count(),
            shell.structures().len(),
            config.seed
        );

        Ok(Self {
            swarm: SwarmIntelligence::new(&config.swarm),
            zone: ZoneState::new(&config.zone),
            config,
            rng,
            tick: 0,
            ship,
            shell,
            agents,
            projectiles: Vec::new(),
            weapon: Weapon::new(),
            effects: Effects::new(),
            events,
        })
    }

    /// Advance one tick. `dt` is the normalized frame delta, `now_ms` the wall clock.
    pub fn tick(&mut self, input: &InputSnapshot, dt: f32, now_ms: u64) -> TickReport {
        self.tick += 1;
        let zone = self.zone.current;

        // Flight and shell collisions
        let obstacles = if zone == Zone::Sphere {
            self.shell.structures()
        } else {
            &[]
        };
        let flight = update_flight(
            &mut self.ship,
            input,
            dt,
            &self.config.flight,
            &self.config.shell,
            obstacles,
        );
        let vent_exposure = if zone == Zone::Sphere {
            apply_vent_hazards(
                &mut self.ship,
                &self.shell,
                dt,
                &self.config.shell,
                self.config.flight.damage_flash,
                &mut self.events,
            )
        } else {
            0
        };

        // Zone transitions, then the active zone's rules
        if input.enter_sanctum {
            self.zone.request_enter_sanctum(
                &mut self.ship,
                self.config.shell.radius,
                &self.config.zone,
                now_ms,
                &mut self.rng,
                &mut self.events,
            );
        }
        if input.exit_sanctum {
            self.zone
                .request_exit_sanctum(&mut self.ship, &self.config.zone, now_ms, &mut self.events);
        }
        let zone = self.zone.current;
        if zone == Zone::Mercury {
            apply_sanctum_heat(&mut self.ship, dt, &self.config.zone, &mut self.events);
            if let Some(sanctum) = self.zone.sanctum_mut() {
                spawn_junction_raider(
                    &mut self.agents,
                    sanctum,
                    &self.config.zone,
                    &self.config.swarm,
                    &mut self.rng,
                    &mut self.events,
                );
                update_junction_raiders(
                    &mut self.agents,
                    sanctum,
                    dt,
                    &self.config.zone,
                    &mut self.effects,
                    &mut self.events,
                );
            }
        }

        // Swarm
        self.swarm.update(
            &mut self.agents,
            &mut self.ship,
            SwarmTick {
                dt,
                now_ms,
                zone,
                shell_radius: self.config.shell.radius,
            },
            &self.config.swarm,
            &mut self.rng,
            &mut self.events,
        );

        // Combat
        self.weapon.update(
            input.fire,
            &self.ship,
            &self.config.weapons,
            &mut self.projectiles,
            &mut self.events,
        );
        let kills = update_projectiles(
            &mut self.projectiles,
            &mut self.agents,
            zone,
            &mut self.shell,
            dt,
            &self.config.weapons,
            &mut self.rng,
            &mut self.events,
        );

        self.effects.update(dt);
        self.ship.status.clamp();

        let events = self.events.drain();
        log::trace!(
            "tick {}: {} events, {} agents, {} bolts, alert {:.2}",
            self.tick,
            events.len(),
            population(&self.agents),
            self.projectiles.len(),
            self.swarm.alert_level
        );
        TickReport {
            tick: self.tick,
            events,
            flight,
            vent_exposure,
            kills,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    /// Spawn a corroder in the active zone. Ignores the population cap.
    pub fn spawn_agent(&mut self, kind: CorroderKind, position: Vec3) -> Entity {
        let bundle = CorroderBundle::new(kind, position, self.zone.current);
        let kind = bundle.corroder.kind;
        let entity = bundle.spawn(&mut self.agents);
        self.events.push(SimEvent::AgentSpawned {
            entity,
            kind,
            position,
            cause: SpawnCause::Initial,
        });
        entity
    }

    /// Damage a shell sector directly. Events surface in the next tick's report.
    pub fn damage_sector(&mut self, index: usize, amount: f32) {
        self.shell
            .damage_sector(index, amount, &mut self.rng, &mut self.events);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn agents(&self) -> &World {
        &self.agents
    }

    pub fn population(&self) -> usize {
        population(&self.agents)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn swarm(&self) -> &SwarmIntelligence {
        &self.swarm
    }

    pub fn swarm_mut(&mut self) -> &mut SwarmIntelligence {
        &mut self.swarm
    }

    pub fn zone(&self) -> &ZoneState {
        &self.zone
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.seed = Some(7);
        config.swarm.initial_population = 0;
        config.shell.surface_structures = [0; 4];
        config
    }

    #[test]
    fn new_builds_the_opening_battlefield() {
        let mut config = SimConfig::default();
        config.seed = Some(1);
        let sim = Simulation::new(config).unwrap();
        assert_eq!(sim.population(), 60);
        assert_eq!(sim.shell().structures().len(), 295);
        assert_eq!(sim.ship().position(), Vec3::new(0.0, 0.0, -350.0));
        assert_eq!(sim.zone().current, Zone::Sphere);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = quiet_config();
        config.swarm.population_cap = 0;
        assert!(matches!(Simulation::new(config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn same_seed_same_world() {
        let mut config = SimConfig::default();
        config.seed = Some(99);
        let mut a = Simulation::new(config.clone()).unwrap();
        let mut b = Simulation::new(config).unwrap();
        let input = InputSnapshot {
            throttle_up: true,
            fire: true,
            ..Default::default()
        };
        for i in 0..120 {
            a.tick(&input, 1.0, i * 17);
            b.tick(&input, 1.0, i * 17);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn sanctum_freezes_battlefield_agents() {
        let mut config = quiet_config();
        config.zone.junction_spawn_chance = 0.0;
        let mut sim = Simulation::new(config).unwrap();
        let agent = sim.spawn_agent(CorroderKind::Processor, Vec3::new(0.0, 0.0, 395.0));
        let enter = InputSnapshot {
            enter_sanctum: true,
            ..Default::default()
        };
        let report = sim.tick(&enter, 1.0, 0);
        assert!(report.events.contains(&SimEvent::ZoneTransitioned {
            from: Zone::Sphere,
            to: Zone::Mercury
        }));
        assert_eq!(sim.zone().current, Zone::Mercury);
        assert!(sim.snapshot().agents.is_empty());

        let parked = *sim.agents().get::<&engine_core::Transform>(agent).unwrap();
        sim.tick(&InputSnapshot::default(), 1.0, 16);
        let later = *sim.agents().get::<&engine_core::Transform>(agent).unwrap();
        assert_eq!(parked.position, later.position);
    }

    #[test]
    fn sanctum_heat_builds_up() {
        let mut sim = Simulation::new(quiet_config()).unwrap();
        let enter = InputSnapshot {
            enter_sanctum: true,
            ..Default::default()
        };
        sim.tick(&enter, 1.0, 0);
        for i in 1..100 {
            sim.tick(&InputSnapshot::default(), 1.0, i * 16);
        }
        let status = sim.ship().status;
        assert!(status.heat > 0.0);
        assert!(status.shields < status.max_shields);
    }
}
