//! The Aegis shell: angular sectors that take structural damage, collapse,
//! and open plasma vents; plus the static surface structures the ship can hit.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::config::ShellConfig;
use crate::events::{EventQueue, SimEvent};

/// A plasma vent opened by a collapsed sector. Persists for the life of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlasmaVent {
    pub position: Vec3,
}

/// One angular wedge of the shell.
#[derive(Debug, Clone)]
pub struct Sector {
    pub index: usize,
    /// Start angle of the wedge (radians, azimuth in the XY plane).
    pub angle: f32,
    /// Accumulated structural damage, capped at the collapse threshold.
    pub damage: f32,
    /// Terminal once set.
    pub collapsed: bool,
    pub vents: Vec<PlasmaVent>,
}

/// Kinds of static structure bolted onto the shell surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    Panel,
    Conduit,
    HeatSinkTower,
    Ruin,
}

impl StructureKind {
    /// Height above the shell surface the structure is anchored at.
    fn radial_offset(&self) -> f32 {
        match self {
            StructureKind::Panel => 0.5,
            StructureKind::Conduit => 1.0,
            StructureKind::HeatSinkTower => 2.0,
            StructureKind::Ruin => 1.5,
        }
    }
}

/// Static obstacle the flight resolver pushes the ship away from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStructure {
    pub kind: StructureKind,
    pub position: Vec3,
}

/// Uniformly distributed point on a sphere of radius `r` around the origin.
pub fn random_point_on_sphere<R: Rng>(rng: &mut R, r: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    spherical(r, theta, phi)
}

fn spherical(r: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Map a position to its sector by azimuth around the Z axis.
///
/// Total for any input: the degenerate on-axis case maps to sector 0.
pub fn sector_for_position(position: Vec3, sector_count: usize) -> usize {
    assert!(sector_count > 0, "sector_count must be positive");
    let angle = position.y.atan2(position.x);
    let normalized = if angle < 0.0 { angle + TAU } else { angle };
    let index = ((normalized / TAU) * sector_count as f32).floor() as usize;
    // atan2 of a tiny negative y rounds up to exactly TAU after normalizing.
    index.min(sector_count - 1)
}

/// The destructible shell.
#[derive(Debug, Clone)]
pub struct Shell {
    config: ShellConfig,
    sectors: Vec<Sector>,
    structures: Vec<SurfaceStructure>,
}

impl Shell {
    /// Build sectors and scatter the surface structures.
    pub fn new<R: Rng>(config: &ShellConfig, rng: &mut R) -> Self {
        let sector_count = config.sector_count;
        let sectors = (0..sector_count)
            .map(|index| Sector {
                index,
                angle: (index as f32 / sector_count as f32) * TAU,
                damage: 0.0,
                collapsed: false,
                vents: Vec::new(),
            })
            .collect();

        let kinds = [
            StructureKind::Panel,
            StructureKind::Conduit,
            StructureKind::HeatSinkTower,
            StructureKind::Ruin,
        ];
        let mut structures = Vec::with_capacity(config.surface_structures.iter().sum());
        for (kind, &count) in kinds.iter().zip(config.surface_structures.iter()) {
            for _ in 0..count {
                let position = random_point_on_sphere(rng, config.radius + kind.radial_offset());
                structures.push(SurfaceStructure { kind: *kind, position });
            }
        }

        Self {
            config: config.clone(),
            sectors,
            structures,
        }
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn sector(&self, index: usize) -> &Sector {
        assert!(index < self.sectors.len(), "sector index {} out of range", index);
        &self.sectors[index]
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn structures(&self) -> &[SurfaceStructure] {
        &self.structures
    }

    pub fn sector_for_position(&self, position: Vec3) -> usize {
        sector_for_position(position, self.sectors.len())
    }

    /// Apply structural damage to a sector.
    ///
    /// No-op on a collapsed sector. Past half the threshold a stress event is
    /// emitted; reaching the threshold collapses the sector exactly once and
    /// opens its vents.
    pub fn damage_sector<R: Rng>(
        &mut self,
        index: usize,
        amount: f32,
        rng: &mut R,
        events: &mut EventQueue,
    ) {
        assert!(index < self.sectors.len(), "sector index {} out of range", index);
        debug_assert!(amount >= 0.0, "sector damage must not heal");

        let threshold = self.config.collapse_threshold;
        let sector_count = self.sectors.len();
        let sector = &mut self.sectors[index];
        if sector.collapsed {
            return;
        }

        sector.damage = (sector.damage + amount.max(0.0)).min(threshold);

        if sector.damage > threshold * 0.5 {
            events.push(SimEvent::SectorStressed {
                sector: index,
                glow: (sector.damage / threshold).clamp(0.0, 1.0),
            });
        }

        if sector.damage >= threshold {
            sector.collapsed = true;
            let wedge = TAU / sector_count as f32;
            let r = self.config.radius + self.config.vent_radial_offset;
            for _ in 0..self.config.vents_per_collapse {
                let theta = (index as f32 + rng.gen_range(0.02..0.98)) * wedge;
                let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                sector.vents.push(PlasmaVent {
                    position: spherical(r, theta, phi),
                });
            }
            log::info!("Sector {} collapsed, {} plasma vents opened", index, sector.vents.len());
            events.push(SimEvent::SectorCollapsed {
                sector: index,
                vents: sector.vents.iter().map(|v| v.position).collect(),
            });
        }
    }

    /// Every open vent across all collapsed sectors.
    pub fn vents(&self) -> impl Iterator<Item = &PlasmaVent> {
        self.sectors
            .iter()
            .filter(|s| s.collapsed)
            .flat_map(|s| s.vents.iter())
    }

    /// Number of vents whose hazard radius contains `position`.
    pub fn vents_threatening(&self, position: Vec3) -> usize {
        let radius = self.config.hazard_radius;
        self.vents()
            .filter(|v| physics::within_radius(position, v.position, radius))
            .count()
    }

    pub fn collapsed_sectors(&self) -> Vec<usize> {
        self.sectors
            .iter()
            .filter(|s| s.collapsed)
            .map(|s| s.index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shell() -> (Shell, StdRng) {
        let mut rng = StdRng::seed_from_u64(3);
        (Shell::new(&ShellConfig::default(), &mut rng), rng)
    }

    #[test]
    fn sector_mapping_covers_every_wedge() {
        let n = 24;
        assert_eq!(sector_for_position(Vec3::new(10.0, 0.0, 0.0), n), 0);
        for i in 0..n {
            let a = (i as f32 + 0.5) / n as f32 * TAU;
            let p = Vec3::new(a.cos() * 100.0, a.sin() * 100.0, 37.0);
            assert_eq!(sector_for_position(p, n), i);
        }
        // Just below the positive X axis rounds into the last wedge, never past it.
        assert_eq!(sector_for_position(Vec3::new(1.0, -1e-9, 0.0), n), n - 1);
        assert_eq!(sector_for_position(Vec3::new(0.0, 0.0, 5.0), n), 0);
    }

    #[test]
    fn damage_below_half_is_silent() {
        let (mut shell, mut rng) = shell();
        let mut events = EventQueue::new();
        shell.damage_sector(4, 50.0, &mut rng, &mut events);
        assert!(events.is_empty());
        shell.damage_sector(4, 5.0, &mut rng, &mut events);
        assert_eq!(
            events.drain(),
            vec![SimEvent::SectorStressed { sector: 4, glow: 0.55 }]
        );
    }

    #[test]
    fn collapse_opens_three_vents_inside_the_wedge() {
        let (mut shell, mut rng) = shell();
        let mut events = EventQueue::new();
        shell.damage_sector(7, 100.0, &mut rng, &mut events);
        let sector = shell.sector(7);
        assert!(sector.collapsed);
        assert_eq!(sector.vents.len(), 3);
        for vent in &sector.vents {
            assert!((vent.position.length() - 402.0).abs() < 1e-2);
            assert_eq!(shell.sector_for_position(vent.position), 7);
        }
        assert_eq!(shell.collapsed_sectors(), vec![7]);
        assert_eq!(shell.vents().count(), 3);
    }

    #[test]
    fn collapsed_sector_ignores_further_damage() {
        let (mut shell, mut rng) = shell();
        let mut events = EventQueue::new();
        shell.damage_sector(2, 120.0, &mut rng, &mut events);
        let before = shell.sector(2).clone();
        events.drain();
        for _ in 0..5 {
            shell.damage_sector(2, 30.0, &mut rng, &mut events);
        }
        assert!(events.is_empty());
        assert_eq!(shell.sector(2).damage, before.damage);
        assert_eq!(shell.sector(2).vents, before.vents);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_sector_is_fatal() {
        let (mut shell, mut rng) = shell();
        shell.damage_sector(24, 1.0, &mut rng, &mut EventQueue::new());
    }

    #[test]
    fn surface_structures_sit_on_the_shell() {
        let (shell, _) = shell();
        assert_eq!(shell.structures().len(), 295);
        for s in shell.structures() {
            let d = s.position.length();
            assert!(d > 400.0 && d <= 402.01);
        }
    }

    #[test]
    fn vent_hazard_radius() {
        let (mut shell, mut rng) = shell();
        shell.damage_sector(0, 100.0, &mut rng, &mut EventQueue::new());
        let vent = shell.sector(0).vents[0].position;
        assert!(shell.vents_threatening(vent + Vec3::X * 14.0) >= 1);
        assert_eq!(shell.vents_threatening(Vec3::ZERO), 0);
    }
}
