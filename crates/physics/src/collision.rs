//! Collision tests and penetration responses.

use glam::Vec3;

/// Laser bolt modelled as a capsule: a segment along its direction plus a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub center: Vec3,
    /// Unit direction of the segment.
    pub axis: Vec3,
    pub half_length: f32,
    pub radius: f32,
}

impl Capsule {
    pub fn new(center: Vec3, axis: Vec3, length: f32, radius: f32) -> Self {
        Self {
            center,
            axis: axis.normalize_or_zero(),
            half_length: length * 0.5,
            radius,
        }
    }

    /// Closest point on the capsule's core segment to `p`.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let t = (p - self.center)
            .dot(self.axis)
            .clamp(-self.half_length, self.half_length);
        self.center + self.axis * t
    }

    /// Whether the capsule touches an axis-aligned cube centred at `center`.
    pub fn intersects_cube(&self, center: Vec3, half_extent: f32) -> bool {
        let on_segment = self.closest_point(center);
        let half = Vec3::splat(half_extent);
        let on_cube = on_segment.clamp(center - half, center + half);
        on_segment.distance_squared(on_cube) <= self.radius * self.radius
    }
}

/// True when `a` and `b` are strictly closer than `radius`.
#[inline]
pub fn within_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Clamp `position` onto a sphere of radius `limit` around the origin if it lies outside.
/// Returns the clamped position, or `None` when already inside.
pub fn clamp_inside_sphere(position: Vec3, limit: f32) -> Option<Vec3> {
    let dist = position.length();
    if dist > limit {
        Some(position / dist * limit)
    } else {
        None
    }
}

/// Push `position` away from a spherical `obstacle` by `push` units when within `contact_radius`.
/// Returns the displaced position, or `None` when not in contact.
pub fn push_out_of(position: Vec3, obstacle: Vec3, contact_radius: f32, push: f32) -> Option<Vec3> {
    if within_radius(position, obstacle, contact_radius) {
        let away = (position - obstacle).normalize_or_zero();
        Some(position + away * push)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_inside_sphere_projects_to_surface() {
        let clamped = clamp_inside_sphere(Vec3::new(0.0, 0.0, -400.0), 395.0).unwrap();
        assert!((clamped.length() - 395.0).abs() < 1e-3);
        assert!(clamp_inside_sphere(Vec3::new(0.0, 0.0, -10.0), 395.0).is_none());
    }

    #[test]
    fn push_out_moves_away_from_obstacle() {
        let pos = Vec3::new(3.0, 0.0, 0.0);
        let pushed = push_out_of(pos, Vec3::ZERO, 8.0, 0.5).unwrap();
        assert_eq!(pushed, Vec3::new(3.5, 0.0, 0.0));
        assert!(push_out_of(Vec3::new(9.0, 0.0, 0.0), Vec3::ZERO, 8.0, 0.5).is_none());
    }

    #[test]
    fn capsule_hits_cube_on_its_path_only() {
        let bolt = Capsule::new(Vec3::ZERO, Vec3::Z, 8.0, 0.2);
        assert!(bolt.intersects_cube(Vec3::new(0.0, 0.0, 3.0), 1.0));
        assert!(bolt.intersects_cube(Vec3::new(1.1, 0.0, 0.0), 1.0));
        assert!(!bolt.intersects_cube(Vec3::new(0.0, 0.0, 6.0), 1.0));
        assert!(!bolt.intersects_cube(Vec3::new(3.0, 0.0, 0.0), 1.0));
    }
}
