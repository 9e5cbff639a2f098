//! Corroder spawning: the initial swarm on the shell and every later spawn
//! (factories, replication, junction raids), all bounded by the population cap.

use engine_core::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use crate::corroder::{population, CorroderBundle, CorroderKind};
use crate::events::{EventQueue, SimEvent, SpawnCause};
use crate::shell::random_point_on_sphere;
use crate::zone::Zone;

/// Random offset inside a cube of edge `spread` centred on the origin.
pub fn random_offset<R: Rng>(rng: &mut R, spread: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
    )
}

/// Weighted pick for the opening swarm: `mix` holds cumulative thresholds.
pub fn random_initial_kind<R: Rng>(rng: &mut R, mix: [f32; 2]) -> CorroderKind {
    let roll = rng.gen::<f32>();
    if roll < mix[0] {
        CorroderKind::Mite
    } else if roll < mix[1] {
        CorroderKind::Processor
    } else {
        CorroderKind::Assembler
    }
}

/// Spawn a corroder unless the population is already at `cap`.
pub fn spawn_corroder(
    world: &mut World,
    bundle: CorroderBundle,
    cause: SpawnCause,
    cap: Option<usize>,
    events: &mut EventQueue,
) -> Option<Entity> {
    if let Some(cap) = cap {
        if population(world) >= cap {
            return None;
        }
    }
    let kind = bundle.corroder.kind;
    let position = bundle.transform.position;
    let entity = bundle.spawn(world);
    events.push(SimEvent::AgentSpawned {
        entity,
        kind,
        position,
        cause,
    });
    Some(entity)
}

/// Scatter the opening swarm uniformly over the shell surface.
pub fn spawn_initial_population<R: Rng>(
    world: &mut World,
    count: usize,
    shell_radius: f32,
    mix: [f32; 2],
    rng: &mut R,
    events: &mut EventQueue,
) {
    for _ in 0..count {
        let position = random_point_on_sphere(rng, shell_radius);
        let kind = random_initial_kind(rng, mix);
        spawn_corroder(
            world,
            CorroderBundle::new(kind, position, Zone::Sphere),
            SpawnCause::Initial,
            None,
            events,
        );
    }
    log::info!("Spawned {} corroders on the shell", count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn initial_swarm_sits_on_the_shell() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut events = EventQueue::new();
        spawn_initial_population(&mut world, 60, 400.0, [0.4, 0.8], &mut rng, &mut events);
        assert_eq!(population(&world), 60);
        assert_eq!(events.len(), 60);
        for (_, t) in world.query::<&engine_core::Transform>().iter() {
            assert!((t.position.length() - 400.0).abs() < 1e-2);
        }
    }

    #[test]
    fn cap_blocks_spawns() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        for _ in 0..3 {
            spawn_corroder(
                &mut world,
                CorroderBundle::new(CorroderKind::Mite, Vec3::ZERO, Zone::Sphere),
                SpawnCause::Factory,
                Some(2),
                &mut events,
            );
        }
        assert_eq!(population(&world), 2);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn initial_mix_respects_thresholds() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            match random_initial_kind(&mut rng, [0.4, 0.8]) {
                CorroderKind::Mite => counts[0] += 1,
                CorroderKind::Processor => counts[1] += 1,
                CorroderKind::Assembler => counts[2] += 1,
            }
        }
        assert!(counts[0] > 3700 && counts[0] < 4300);
        assert!(counts[2] > 1700 && counts[2] < 2300);
    }

    #[test]
    fn offsets_stay_inside_the_box() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let o = random_offset(&mut rng, 20.0);
            assert!(o.abs().max_element() <= 10.0);
        }
    }
}
