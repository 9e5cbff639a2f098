//! Quad lasers: burst firing from the wing hardpoints, bolt flight, and hits
//! against corroders. Kills wound the shell sector the corroder died over.

use engine_core::{Health, Transform, Vec3};
use hecs::{Entity, World};
use physics::Capsule;
use rand::Rng;

use crate::config::WeaponConfig;
use crate::corroder::{Corroder, CorroderKind};
use crate::events::{DeathCause, EventQueue, SimEvent};
use crate::shell::Shell;
use crate::ship::Ship;
use crate::zone::Zone;

/// A laser bolt in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    /// Unit direction, fixed at launch.
    pub direction: Vec3,
    /// Ticks left before the bolt fizzles.
    pub life: u32,
}

impl Projectile {
    pub fn capsule(&self, config: &WeaponConfig) -> Capsule {
        Capsule::new(self.position, self.direction, config.bolt_length, config.bolt_radius)
    }
}

/// Burst cooldown, counted in ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weapon {
    pub cooldown: u32,
    /// Trigger state seen on the previous tick.
    trigger_down: bool,
}

impl Weapon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown == 0
    }

    /// Fire one bolt per hardpoint on a fresh trigger press once the cooldown
    /// has run out. Holding the trigger does not refire; a press during the
    /// cooldown is dropped. The cooldown ticks down every call either way.
    pub fn update(
        &mut self,
        trigger: bool,
        ship: &Ship,
        config: &WeaponConfig,
        projectiles: &mut Vec<Projectile>,
        events: &mut EventQueue,
    ) -> bool {
        let pressed = trigger && !self.trigger_down;
        self.trigger_down = trigger;
        let fired = pressed && self.can_fire();
        if fired {
            let origins = hardpoint_origins(&ship.transform, config);
            let direction = ship.transform.forward();
            projectiles.extend(origins.iter().map(|&position| Projectile {
                position,
                direction,
                life: config.projectile_lifetime,
            }));
            events.push(SimEvent::ShotFired { origins });
            self.cooldown = config.fire_cooldown;
        }
        self.cooldown = self.cooldown.saturating_sub(1);
        fired
    }
}

/// World-space muzzle positions for the ship's current pose.
pub fn hardpoint_origins(transform: &Transform, config: &WeaponConfig) -> Vec<Vec3> {
    let right = transform.right();
    let up = transform.up();
    config
        .hardpoints
        .iter()
        .map(|[x, y]| transform.position + right * *x + up * *y)
        .collect()
}

struct Target {
    entity: Entity,
    kind: CorroderKind,
    position: Vec3,
    half_extent: f32,
}

/// Advance every bolt and resolve hits against the active zone's corroders.
///
/// A bolt stops at its first hit. A kill despawns the corroder and damages
/// the shell sector under it.
#[allow(clippy::too_many_arguments)]
pub fn update_projectiles<R: Rng>(
    projectiles: &mut Vec<Projectile>,
    world: &mut World,
    zone: Zone,
    shell: &mut Shell,
    dt: f32,
    config: &WeaponConfig,
    rng: &mut R,
    events: &mut EventQueue,
) -> usize {
    let mut targets: Vec<Target> = world
        .query::<(&Transform, &Corroder)>()
        .iter()
        .filter(|(_, (_, c))| c.zone == zone)
        .map(|(entity, (t, c))| Target {
            entity,
            kind: c.kind,
            position: t.position,
            half_extent: c.half_extent(),
        })
        .collect();
    let mut kills = 0;

    let mut i = projectiles.len();
    while i > 0 {
        i -= 1;
        let bolt = &mut projectiles[i];
        bolt.position += bolt.direction * config.projectile_speed * dt;
        bolt.life = bolt.life.saturating_sub(1);
        let capsule = bolt.capsule(config);
        let expired = bolt.life == 0;

        let hit = targets
            .iter()
            .rposition(|t| capsule.intersects_cube(t.position, t.half_extent));
        if let Some(j) = hit {
            let target = &targets[j];
            let dead = match world.get::<&mut Health>(target.entity) {
                Ok(mut health) => {
                    health.take_damage(config.damage_per_hit);
                    health.is_dead()
                }
                Err(_) => false,
            };
            if dead {
                let target = targets.remove(j);
                if world.despawn(target.entity).is_ok() {
                    let sector = shell.sector_for_position(target.position);
                    shell.damage_sector(sector, config.kill_sector_damage, rng, events);
                    events.push(SimEvent::AgentDestroyed {
                        entity: target.entity,
                        kind: target.kind,
                        position: target.position,
                        cause: DeathCause::Destroyed,
                    });
                    log::debug!("{} destroyed over sector {}", target.kind.name(), sector);
                    kills += 1;
                }
            }
            projectiles.swap_remove(i);
        } else if expired {
            projectiles.swap_remove(i);
        }
    }
    kills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlightConfig, ShellConfig};
    use crate::corroder::CorroderBundle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ship() -> Ship {
        Ship::new(Vec3::new(0.0, 0.0, -300.0), &FlightConfig::default())
    }

    fn bare_shell(rng: &mut StdRng) -> Shell {
        let config = ShellConfig {
            surface_structures: [0; 4],
            ..ShellConfig::default()
        };
        Shell::new(&config, rng)
    }

    /// One tick of bolt flight in the battlefield zone.
    fn step(
        bolts: &mut Vec<Projectile>,
        world: &mut World,
        shell: &mut Shell,
        rng: &mut StdRng,
        events: &mut EventQueue,
    ) -> usize {
        let config = WeaponConfig::default();
        update_projectiles(bolts, world, Zone::Sphere, shell, 1.0, &config, rng, events)
    }

    #[test]
    fn held_trigger_fires_one_burst() {
        let config = WeaponConfig::default();
        let ship = ship();
        let mut weapon = Weapon::new();
        let mut bolts = Vec::new();
        let mut events = EventQueue::new();
        let bursts = (0..17)
            .filter(|_| weapon.update(true, &ship, &config, &mut bolts, &mut events))
            .count();
        assert_eq!(bursts, 1);
        assert_eq!(bolts.len(), 4);
    }

    #[test]
    fn fresh_press_refires_only_after_cooldown() {
        let config = WeaponConfig::default();
        let ship = ship();
        let mut weapon = Weapon::new();
        let mut bolts = Vec::new();
        let mut events = EventQueue::new();
        // Press on even ticks, release on odd ones.
        let fired: Vec<usize> = (0..17)
            .filter(|i| weapon.update(i % 2 == 0, &ship, &config, &mut bolts, &mut events))
            .collect();
        assert_eq!(fired, vec![0, 8, 16]);
        assert_eq!(bolts.len(), 12);
    }

    #[test]
    fn hardpoints_follow_ship_orientation() {
        let config = WeaponConfig::default();
        let ship = ship();
        // Facing +Z with +Y up puts the ship's right along -X.
        let origins = hardpoint_origins(&ship.transform, &config);
        assert!((origins[0] - Vec3::new(3.0, 1.0, -300.0)).length() < 1e-4);
        assert!((origins[3] - Vec3::new(-3.0, -1.0, -300.0)).length() < 1e-4);
    }

    #[test]
    fn bolts_expire_after_their_lifetime() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shell = bare_shell(&mut rng);
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut bolts = vec![Projectile {
            position: Vec3::ZERO,
            direction: Vec3::X,
            life: 40,
        }];
        for _ in 0..39 {
            step(&mut bolts, &mut world, &mut shell, &mut rng, &mut events);
        }
        assert_eq!(bolts.len(), 1);
        assert!((bolts[0].position.x - 312.0).abs() < 1e-3);
        step(&mut bolts, &mut world, &mut shell, &mut rng, &mut events);
        assert!(bolts.is_empty());
    }

    #[test]
    fn kill_damages_sector_and_consumes_bolt() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shell = bare_shell(&mut rng);
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = Vec3::new(0.0, 20.0, 380.0);
        let mite = CorroderBundle::new(CorroderKind::Mite, target, Zone::Sphere).spawn(&mut world);
        let mut bolts = vec![Projectile {
            position: target - Vec3::Z * 10.0,
            direction: Vec3::Z,
            life: 40,
        }];

        let kills = step(&mut bolts, &mut world, &mut shell, &mut rng, &mut events);
        assert_eq!(kills, 1);
        assert!(!world.contains(mite));
        assert!(bolts.is_empty());
        let sector = shell.sector_for_position(target);
        assert_eq!(shell.sector(sector).damage, 5.0);
    }

    #[test]
    fn tough_targets_soak_hits_and_other_zones_are_untouchable() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shell = bare_shell(&mut rng);
        let mut world = World::new();
        let mut events = EventQueue::new();
        let processor = CorroderBundle::new(
            CorroderKind::Processor,
            Vec3::new(0.0, 0.0, 10.0),
            Zone::Sphere,
        )
        .spawn(&mut world);
        let ghost =
            CorroderBundle::new(CorroderKind::Mite, Vec3::new(50.0, 0.0, 10.0), Zone::Mercury)
                .spawn(&mut world);
        let mut bolts = vec![
            Projectile {
                position: Vec3::ZERO,
                direction: Vec3::Z,
                life: 40,
            },
            Projectile {
                position: Vec3::new(50.0, 0.0, 0.0),
                direction: Vec3::Z,
                life: 40,
            },
        ];

        step(&mut bolts, &mut world, &mut shell, &mut rng, &mut events);
        assert_eq!(world.get::<&Health>(processor).unwrap().current, 2.0);
        assert!(world.contains(ghost));
        assert_eq!(bolts.len(), 1);
        assert!(shell.sectors().iter().all(|s| s.damage == 0.0));
    }
}
