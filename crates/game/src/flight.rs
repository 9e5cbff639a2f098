//! Flight and collision resolver: throttle, steering, banking, shell boundary,
//! surface-structure contacts and plasma-vent exposure.

use input::InputSnapshot;

use crate::config::{FlightConfig, ShellConfig};
use crate::events::{DamageSource, EventQueue, SimEvent};
use crate::shell::{Shell, SurfaceStructure};
use crate::ship::Ship;

/// What the resolver did to the ship this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightOutcome {
    pub hit_boundary: bool,
    pub obstacle_contacts: usize,
}

/// Integrate one tick of flight.
///
/// Speed is units per tick (not scaled by `dt`); rotation and throttle are.
pub fn update_flight(
    ship: &mut Ship,
    input: &InputSnapshot,
    dt: f32,
    flight: &FlightConfig,
    shell: &ShellConfig,
    obstacles: &[SurfaceStructure],
) -> FlightOutcome {
    let mut outcome = FlightOutcome::default();
    ship.damage_flash.update(dt);

    // Throttle (no reverse)
    if input.throttle_up {
        ship.speed += flight.acceleration * dt;
    }
    if input.throttle_down {
        ship.speed -= flight.acceleration * dt;
    }
    ship.speed = ship.speed.clamp(0.0, flight.max_speed);

    // Steering
    if input.pitch_up {
        ship.transform.rotate_local_x(flight.pitch_rate * dt);
    }
    if input.pitch_down {
        ship.transform.rotate_local_x(-flight.pitch_rate * dt);
    }
    if input.yaw_left {
        ship.transform.rotate_local_y(flight.yaw_rate * dt);
    }
    if input.yaw_right {
        ship.transform.rotate_local_y(-flight.yaw_rate * dt);
    }

    // Banking: roll into the turn, eased rather than snapped
    let target_bank = input.bank_axis() * flight.max_bank;
    let t = (flight.bank_easing * dt).clamp(0.0, 1.0);
    ship.bank += (target_bank - ship.bank) * t;

    let forward = ship.transform.forward();
    ship.transform.translate(forward * ship.speed);

    // Shell boundary: inelastic, lose half the speed
    let limit = shell.radius - shell.boundary_margin;
    if let Some(clamped) = physics::clamp_inside_sphere(ship.transform.position, limit) {
        ship.transform.position = clamped;
        ship.speed *= 0.5;
        outcome.hit_boundary = true;
    }

    // Surface structures, applied cumulatively in order
    for obstacle in obstacles {
        if let Some(pushed) = physics::push_out_of(
            ship.transform.position,
            obstacle.position,
            shell.obstacle_contact_radius,
            shell.obstacle_push,
        ) {
            ship.transform.position = pushed;
            ship.speed *= shell.obstacle_speed_penalty;
            outcome.obstacle_contacts += 1;
        }
    }

    ship.status.clamp();
    outcome
}

/// Damage the ship for every open vent it is inside. Returns the number of vents.
pub fn apply_vent_hazards(
    ship: &mut Ship,
    shell: &Shell,
    dt: f32,
    config: &ShellConfig,
    flash: f32,
    events: &mut EventQueue,
) -> usize {
    let exposed = shell.vents_threatening(ship.position());
    for _ in 0..exposed {
        ship.status.absorb(config.hazard_shield_rate * dt);
        ship.status.add_heat(config.hazard_heat_rate * dt);
    }
    if exposed > 0 {
        ship.damage_flash.remaining = flash;
        events.push(SimEvent::ShipDamaged {
            source: DamageSource::PlasmaVent,
        });
    }
    exposed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::shell::StructureKind;
    use engine_core::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ship_at(position: Vec3) -> Ship {
        Ship::new(position, &FlightConfig::default())
    }

    fn fly(
        ship: &mut Ship,
        input: &InputSnapshot,
        dt: f32,
        obstacles: &[SurfaceStructure],
    ) -> FlightOutcome {
        let config = SimConfig::default();
        update_flight(ship, input, dt, &config.flight, &config.shell, obstacles)
    }

    #[test]
    fn throttle_is_clamped_without_reverse() {
        let mut ship = ship_at(Vec3::new(0.0, 0.0, -100.0));
        let down = InputSnapshot {
            throttle_down: true,
            ..Default::default()
        };
        fly(&mut ship, &down, 1.0, &[]);
        assert_eq!(ship.speed, 0.0);

        let up = InputSnapshot {
            throttle_up: true,
            ..Default::default()
        };
        for _ in 0..500 {
            fly(&mut ship, &up, 1.0, &[]);
            ship.transform.position = Vec3::new(0.0, 0.0, -100.0);
        }
        assert_eq!(ship.speed, FlightConfig::default().max_speed);
    }

    #[test]
    fn ship_moves_speed_units_along_forward() {
        let mut ship = ship_at(Vec3::new(0.0, 0.0, -100.0));
        ship.speed = 2.0;
        fly(&mut ship, &InputSnapshot::default(), 1.0, &[]);
        assert!(ship.position().distance(Vec3::new(0.0, 0.0, -98.0)) < 1e-4);
    }

    #[test]
    fn boundary_clamps_exactly_and_halves_speed() {
        // Facing away from the sun, 3 units inside the limit, moving 5 per tick.
        let mut ship = ship_at(Vec3::new(0.0, 0.0, -392.0));
        ship.transform.look_at(Vec3::new(0.0, 0.0, -1000.0), Vec3::Y);
        ship.speed = 5.0;
        let outcome = fly(&mut ship, &InputSnapshot::default(), 1.0, &[]);
        assert!(outcome.hit_boundary);
        assert!((ship.position().length() - 395.0).abs() < 1e-3);
        assert_eq!(ship.speed, 2.5);
    }

    #[test]
    fn bank_eases_toward_turn() {
        let max_bank = FlightConfig::default().max_bank;
        let mut ship = ship_at(Vec3::new(0.0, 0.0, -100.0));
        let left = InputSnapshot {
            yaw_left: true,
            ..Default::default()
        };
        fly(&mut ship, &left, 1.0, &[]);
        let first = ship.bank;
        assert!(first > 0.0 && first < max_bank * 0.2);
        for _ in 0..200 {
            fly(&mut ship, &left, 1.0, &[]);
        }
        assert!((ship.bank - max_bank).abs() < 1e-3);
    }

    #[test]
    fn both_yaw_keys_bank_right() {
        let mut ship = ship_at(Vec3::new(0.0, 0.0, -100.0));
        let both = InputSnapshot {
            yaw_left: true,
            yaw_right: true,
            ..Default::default()
        };
        fly(&mut ship, &both, 1.0, &[]);
        assert!(ship.bank < 0.0);
    }

    #[test]
    fn overlapping_structures_push_cumulatively() {
        let mut ship = ship_at(Vec3::new(0.0, 0.0, -100.0));
        let obstacles = [
            SurfaceStructure {
                kind: StructureKind::Panel,
                position: Vec3::new(3.0, 0.0, -99.0),
            },
            SurfaceStructure {
                kind: StructureKind::Ruin,
                position: Vec3::new(4.0, 0.0, -99.0),
            },
        ];
        ship.speed = 1.0;
        let outcome = fly(&mut ship, &InputSnapshot::default(), 0.0, &obstacles);
        assert_eq!(outcome.obstacle_contacts, 2);
        assert!((ship.speed - 0.49).abs() < 1e-5);
        assert!(ship.position().x < -0.99);
    }

    #[test]
    fn vents_drain_shields_then_hull() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let bare = ShellConfig {
            surface_structures: [0; 4],
            ..Default::default()
        };
        let mut shell = Shell::new(&bare, &mut rng);
        let mut events = EventQueue::new();
        shell.damage_sector(5, 100.0, &mut rng, &mut events);
        let vent = shell.sector(5).vents[0].position;

        let mut ship = ship_at(vent);
        ship.status.shields = 1.0;
        let exposed = apply_vent_hazards(&mut ship, &shell, 1.0, &config.shell, 6.0, &mut events);
        assert!(exposed >= 1);
        assert_eq!(ship.status.shields, 0.0);
        assert!(ship.status.hull < 100.0);
        assert!(ship.status.heat >= 1.0);
        assert!(ship.damage_flash.is_active());
    }
}
