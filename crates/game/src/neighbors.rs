//! Neighbour queries for swarm cohesion.
//!
//! Cohesion only talks to [`NeighborQuery`], so the brute-force scan used at
//! the default population cap can be swapped for the hash grid when the cap
//! grows, without touching behaviour code.

use engine_core::Vec3;
use hecs::Entity;
use std::collections::HashMap;

/// A corroder's position at the start of the swarm pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPoint {
    pub entity: Entity,
    pub position: Vec3,
}

pub trait NeighborQuery {
    /// Positions of all agents strictly closer than `radius` to `center`, except `exclude`.
    fn neighbors_within(&self, center: Vec3, radius: f32, exclude: Entity) -> Vec<Vec3>;
}

/// Linear scan over every agent: O(n) per query, O(n²) per tick.
#[derive(Debug, Clone, Default)]
pub struct BruteForceNeighbors {
    points: Vec<AgentPoint>,
}

impl BruteForceNeighbors {
    pub fn new(points: Vec<AgentPoint>) -> Self {
        Self { points }
    }
}

impl NeighborQuery for BruteForceNeighbors {
    fn neighbors_within(&self, center: Vec3, radius: f32, exclude: Entity) -> Vec<Vec3> {
        let r2 = radius * radius;
        self.points
            .iter()
            .filter(|p| p.entity != exclude && p.position.distance_squared(center) < r2)
            .map(|p| p.position)
            .collect()
    }
}

/// Uniform 3D hash grid. Queries only visit cells overlapping the search radius.
#[derive(Debug, Clone)]
pub struct GridNeighbors {
    cell_size: f32,
    points: Vec<AgentPoint>,
    cells: HashMap<(i32, i32, i32), Vec<usize>>,
}

impl GridNeighbors {
    pub fn new(points: Vec<AgentPoint>, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "grid cell size must be positive");
        let inv_cell = 1.0 / cell_size;
        let mut cells: HashMap<(i32, i32, i32), Vec<usize>> = HashMap::new();
        for (idx, p) in points.iter().enumerate() {
            cells.entry(cell_of(p.position, inv_cell)).or_default().push(idx);
        }
        Self {
            cell_size,
            points,
            cells,
        }
    }
}

fn cell_of(p: Vec3, inv_cell: f32) -> (i32, i32, i32) {
    (
        (p.x * inv_cell).floor() as i32,
        (p.y * inv_cell).floor() as i32,
        (p.z * inv_cell).floor() as i32,
    )
}

impl NeighborQuery for GridNeighbors {
    fn neighbors_within(&self, center: Vec3, radius: f32, exclude: Entity) -> Vec<Vec3> {
        let inv_cell = 1.0 / self.cell_size;
        let reach = (radius * inv_cell).ceil() as i32;
        let (cx, cy, cz) = cell_of(center, inv_cell);
        let r2 = radius * radius;

        let mut found = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let Some(cell) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &idx in cell {
                        let p = &self.points[idx];
                        if p.entity != exclude && p.position.distance_squared(center) < r2 {
                            found.push(p.position);
                        }
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn scatter(world: &mut World, n: usize) -> Vec<AgentPoint> {
        let mut rng = StdRng::seed_from_u64(11);
        (0..n)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-200.0..200.0),
                    rng.gen_range(-200.0..200.0),
                    rng.gen_range(-200.0..200.0),
                );
                AgentPoint { entity: world.spawn((0u8,)), position }
            })
            .collect()
    }

    fn sorted(mut v: Vec<Vec3>) -> Vec<[f32; 3]> {
        v.sort_by(|a, b| a.to_array().partial_cmp(&b.to_array()).unwrap());
        v.into_iter().map(|p| p.to_array()).collect()
    }

    #[test]
    fn grid_agrees_with_brute_force() {
        let mut world = World::new();
        let points = scatter(&mut world, 150);
        let brute = BruteForceNeighbors::new(points.clone());
        let grid = GridNeighbors::new(points.clone(), 50.0);
        for p in &points {
            assert_eq!(
                sorted(brute.neighbors_within(p.position, 50.0, p.entity)),
                sorted(grid.neighbors_within(p.position, 50.0, p.entity)),
            );
        }
    }

    #[test]
    fn query_excludes_self() {
        let mut world = World::new();
        let a = world.spawn((0u8,));
        let b = world.spawn((0u8,));
        let q = BruteForceNeighbors::new(vec![
            AgentPoint { entity: a, position: Vec3::ZERO },
            AgentPoint { entity: b, position: Vec3::X * 10.0 },
        ]);
        assert_eq!(q.neighbors_within(Vec3::ZERO, 50.0, a), vec![Vec3::X * 10.0]);
        assert!(q.neighbors_within(Vec3::ZERO, 5.0, a).is_empty());
    }
}
