//! Zone state machine: the shell battlefield (SPHERE) and the inner sanctum
//! around the core (MERCURY), plus the sanctum's own rules.

use engine_core::{Health, Transform, Vec3};
use hecs::World;
use rand::Rng;
use serde::Serialize;

use crate::config::{SwarmConfig, ZoneConfig};
use crate::corroder::{AgentTarget, Corroder, CorroderBundle, CorroderKind};
use crate::effects::{Effect, Effects};
use crate::events::{DamageSource, EventQueue, SimEvent, SpawnCause};
use crate::ship::Ship;
use crate::spawner::{random_offset, spawn_corroder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Zone {
    #[default]
    Sphere,
    Mercury,
}

impl Zone {
    pub fn name(&self) -> &'static str {
        match self {
            Zone::Sphere => "SPHERE",
            Zone::Mercury => "MERCURY",
        }
    }

    /// Label shown on the HUD.
    pub fn display_name(&self) -> &'static str {
        match self {
            Zone::Sphere => "AEGIS SHELL",
            Zone::Mercury => "MERCURY (INNER SANCTUM)",
        }
    }
}

/// Lighting the presentation layer should use for the current zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ambient {
    pub sun_intensity: f32,
    /// Sky tint as linear RGB.
    pub tint: [f32; 3],
}

impl Ambient {
    pub fn for_zone(zone: Zone, config: &ZoneConfig) -> Self {
        match zone {
            Zone::Sphere => Self {
                sun_intensity: config.battlefield_sun_intensity,
                tint: [0.0, 0.0, 0.07],
            },
            Zone::Mercury => Self {
                sun_intensity: config.sanctum_sun_intensity,
                tint: [0.13, 0.07, 0.0],
            },
        }
    }
}

/// Defensive structure around the core. Corroders raid these.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub position: Vec3,
    pub health: Health,
    pub alive: bool,
}

/// Static contents of the inner sanctum, built on first entry.
#[derive(Debug, Clone, Default)]
pub struct Sanctum {
    pub junctions: Vec<Junction>,
    pub plasma_clouds: Vec<Vec3>,
}

impl Sanctum {
    pub fn build<R: Rng>(config: &ZoneConfig, rng: &mut R) -> Self {
        let junctions = (0..config.junction_count)
            .map(|_| Junction {
                position: random_offset(rng, config.junction_spread),
                health: Health::new(config.junction_hp),
                alive: true,
            })
            .collect();
        let plasma_clouds = (0..config.plasma_clouds)
            .map(|_| random_offset(rng, config.plasma_cloud_spread))
            .collect();
        Self {
            junctions,
            plasma_clouds,
        }
    }

    /// Live junction position, `None` when destroyed or out of range.
    pub fn junction_target(&self, index: usize) -> Option<Vec3> {
        self.junctions
            .get(index)
            .filter(|j| j.alive)
            .map(|j| j.position)
    }
}

pub struct ZoneState {
    pub current: Zone,
    /// Transitions are refused until this wall-clock time.
    guard_until_ms: Option<u64>,
    sanctum: Option<Sanctum>,
    pub ambient: Ambient,
}

impl ZoneState {
    pub fn new(config: &ZoneConfig) -> Self {
        Self {
            current: Zone::Sphere,
            guard_until_ms: None,
            sanctum: None,
            ambient: Ambient::for_zone(Zone::Sphere, config),
        }
    }

    pub fn is_transitioning(&self, now_ms: u64) -> bool {
        self.guard_until_ms.map_or(false, |until| now_ms < until)
    }

    pub fn sanctum(&self) -> Option<&Sanctum> {
        self.sanctum.as_ref()
    }

    pub fn sanctum_mut(&mut self) -> Option<&mut Sanctum> {
        self.sanctum.as_mut()
    }

    /// Dive from the shell into the core. Returns whether the transition happened.
    pub fn request_enter_sanctum<R: Rng>(
        &mut self,
        ship: &mut Ship,
        shell_radius: f32,
        config: &ZoneConfig,
        now_ms: u64,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> bool {
        if self.current != Zone::Sphere || self.is_transitioning(now_ms) {
            return false;
        }
        if ship.position().length() >= shell_radius - config.entry_depth {
            log::debug!("Sanctum entry refused: ship not deep enough inside the shell");
            return false;
        }
        if self.sanctum.is_none() {
            let sanctum = Sanctum::build(config, rng);
            log::info!(
                "Inner sanctum built: {} junctions, {} plasma clouds",
                sanctum.junctions.len(),
                sanctum.plasma_clouds.len()
            );
            self.sanctum = Some(sanctum);
        }
        ship.relocate(Vec3::from(config.sanctum_entry), Vec3::ZERO);
        self.switch_to(Zone::Mercury, config, now_ms, events);
        true
    }

    /// Climb back out to the shell.
    pub fn request_exit_sanctum(
        &mut self,
        ship: &mut Ship,
        config: &ZoneConfig,
        now_ms: u64,
        events: &mut EventQueue,
    ) -> bool {
        if self.current != Zone::Mercury || self.is_transitioning(now_ms) {
            return false;
        }
        ship.relocate(Vec3::from(config.battlefield_entry), Vec3::ZERO);
        self.switch_to(Zone::Sphere, config, now_ms, events);
        true
    }

    fn switch_to(&mut self, to: Zone, config: &ZoneConfig, now_ms: u64, events: &mut EventQueue) {
        let from = self.current;
        self.current = to;
        self.ambient = Ambient::for_zone(to, config);
        self.guard_until_ms = Some(now_ms + config.transition_guard_ms);
        events.push(SimEvent::ZoneTransitioned { from, to });
        log::info!("Zone transition: {} -> {}", from.name(), to.display_name());
    }
}

/// Heat multiplier at `distance` from the core.
pub fn heat_multiplier(distance: f32, config: &ZoneConfig) -> f32 {
    (1.0 - distance / config.heat_falloff).max(config.min_heat_multiplier)
}

/// Core heat: heat rises, shields bleed, and past the critical point the hull cooks.
pub fn apply_sanctum_heat(ship: &mut Ship, dt: f32, config: &ZoneConfig, events: &mut EventQueue) {
    let hm = heat_multiplier(ship.position().length(), config);
    let status = &mut ship.status;
    status.add_heat(hm * dt);
    status.shields -= hm * config.shield_bleed * dt;
    if status.heat > config.critical_heat {
        let overheat = status.heat - config.critical_heat;
        status.damage_hull(overheat * config.critical_heat_hull_rate * dt);
        events.push(SimEvent::ShipDamaged {
            source: DamageSource::SanctumHeat,
        });
    }
    status.clamp();
}

/// Occasionally drop a raider next to a live junction.
pub fn spawn_junction_raider<R: Rng>(
    world: &mut World,
    sanctum: &Sanctum,
    config: &ZoneConfig,
    swarm: &SwarmConfig,
    rng: &mut R,
    events: &mut EventQueue,
) {
    if rng.gen::<f32>() >= config.junction_spawn_chance {
        return;
    }
    let alive: Vec<usize> = (0..sanctum.junctions.len())
        .filter(|&i| sanctum.junctions[i].alive)
        .collect();
    if alive.is_empty() {
        return;
    }
    let index = alive[rng.gen_range(0..alive.len())];
    let kind = if rng.gen::<f32>() < config.junction_raider_mite_chance {
        CorroderKind::Mite
    } else {
        CorroderKind::Processor
    };
    let position =
        sanctum.junctions[index].position + random_offset(rng, config.junction_spawn_spread);
    let bundle = CorroderBundle::new(kind, position, Zone::Mercury)
        .targeting(AgentTarget::Junction(index));
    let cap = Some(swarm.population_cap);
    if spawn_corroder(world, bundle, SpawnCause::JunctionRaid, cap, events).is_some() {
        log::debug!("{} raiding junction {}", kind.name(), index);
    }
}

/// Move junction raiders and let them chew on their target. Raiders whose
/// junction is gone drop back to hunting the ship.
pub fn update_junction_raiders(
    world: &mut World,
    sanctum: &mut Sanctum,
    dt: f32,
    config: &ZoneConfig,
    effects: &mut Effects,
    events: &mut EventQueue,
) {
    for (_, (transform, corroder)) in world.query_mut::<(&mut Transform, &mut Corroder)>() {
        if corroder.zone != Zone::Mercury {
            continue;
        }
        let AgentTarget::Junction(index) = corroder.target else {
            continue;
        };
        let Some(target) = sanctum.junction_target(index) else {
            corroder.target = AgentTarget::Ship;
            continue;
        };

        let to_target = target - transform.position;
        transform.position += to_target.normalize_or_zero() * corroder.speed * dt;

        if transform.position.distance(target) < config.junction_attack_range {
            let junction = &mut sanctum.junctions[index];
            junction.health.take_damage(config.junction_attack_rate * dt);
            if junction.health.is_dead() {
                junction.alive = false;
                effects.spawn(Effect::junction_explosion(
                    junction.position,
                    config.explosion_lifetime,
                ));
                events.push(SimEvent::JunctionDestroyed {
                    index,
                    position: junction.position,
                });
                log::info!("Junction {} destroyed", index);
            }
        }
    }
}
