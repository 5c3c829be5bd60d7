// Collision shapes attached to rigid bodies

use glam::Vec3;

use crate::core::math::{clamp_to_box, VectorExt};

/// Closed set of collision shapes
///
/// A shape lives inside the body it is attached to, so its world placement is
/// always the owning body's position plus the shape offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    Sphere { radius: f32, offset: Vec3 },
    Box { half_extents: Vec3, offset: Vec3 },
}

impl CollisionShape {
    /// Sphere centered on the body
    pub fn sphere(radius: f32) -> Self {
        CollisionShape::Sphere {
            radius,
            offset: Vec3::ZERO,
        }
    }

    /// Axis-aligned box centered on the body
    pub fn cuboid(half_extents: Vec3) -> Self {
        CollisionShape::Box {
            half_extents,
            offset: Vec3::ZERO,
        }
    }

    /// Move the shape relative to its body
    pub fn with_offset(mut self, new_offset: Vec3) -> Self {
        match &mut self {
            CollisionShape::Sphere { offset, .. } | CollisionShape::Box { offset, .. } => {
                *offset = new_offset
            }
        }
        self
    }

    /// Offset relative to the owning body
    pub fn offset(&self) -> Vec3 {
        match *self {
            CollisionShape::Sphere { offset, .. } | CollisionShape::Box { offset, .. } => offset,
        }
    }

    /// Shape center in world space for a body at `body_position`
    pub fn world_position(&self, body_position: Vec3) -> Vec3 {
        body_position + self.offset()
    }

    /// World-space min corner of the shape's bounds
    pub fn min(&self, body_position: Vec3) -> Vec3 {
        self.world_position(body_position) - self.half_size()
    }

    /// World-space max corner of the shape's bounds
    pub fn max(&self, body_position: Vec3) -> Vec3 {
        self.world_position(body_position) + self.half_size()
    }

    fn half_size(&self) -> Vec3 {
        match *self {
            CollisionShape::Sphere { radius, .. } => Vec3::splat(radius),
            CollisionShape::Box { half_extents, .. } => half_extents,
        }
    }

    /// Whether this shape, placed by `position`, touches `other` placed by `other_position`
    ///
    /// Touching counts: every comparison is inclusive.
    pub fn intersects(&self, position: Vec3, other: &CollisionShape, other_position: Vec3) -> bool {
        let a = self.world_position(position);
        let b = other.world_position(other_position);

        match (*self, *other) {
            (CollisionShape::Sphere { radius: ra, .. }, CollisionShape::Sphere { radius: rb, .. }) => {
                a.distance_to(b) <= ra + rb
            }
            (CollisionShape::Box { half_extents: ha, .. }, CollisionShape::Box { half_extents: hb, .. }) => {
                let (min_a, max_a) = (a - ha, a + ha);
                let (min_b, max_b) = (b - hb, b + hb);
                min_a.x <= max_b.x
                    && max_a.x >= min_b.x
                    && min_a.y <= max_b.y
                    && max_a.y >= min_b.y
                    && min_a.z <= max_b.z
                    && max_a.z >= min_b.z
            }
            (CollisionShape::Sphere { radius, .. }, CollisionShape::Box { half_extents, .. }) => {
                sphere_touches_box(a, radius, b, half_extents)
            }
            (CollisionShape::Box { half_extents, .. }, CollisionShape::Sphere { radius, .. }) => {
                sphere_touches_box(b, radius, a, half_extents)
            }
        }
    }
}

fn sphere_touches_box(center: Vec3, radius: f32, box_center: Vec3, half_extents: Vec3) -> bool {
    let closest = clamp_to_box(center, box_center - half_extents, box_center + half_extents);
    closest.distance_to(center) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_sphere_boundaries() {
        let s = CollisionShape::sphere(1.0);
        assert!(s.intersects(Vec3::ZERO, &s, Vec3::new(1.5, 0.0, 0.0)));
        assert!(s.intersects(Vec3::ZERO, &s, Vec3::new(2.0, 0.0, 0.0)), "Touching counts");
        assert!(!s.intersects(Vec3::ZERO, &s, Vec3::new(2.5, 0.0, 0.0)));
    }

    #[test]
    fn test_box_box_boundaries() {
        let b = CollisionShape::cuboid(Vec3::ONE);
        assert!(b.intersects(Vec3::ZERO, &b, Vec3::new(1.9, 0.0, 0.0)));
        assert!(b.intersects(Vec3::ZERO, &b, Vec3::new(2.0, 0.0, 0.0)), "Touching faces");
        assert!(!b.intersects(Vec3::ZERO, &b, Vec3::new(2.1, 0.0, 0.0)));
        assert!(!b.intersects(Vec3::ZERO, &b, Vec3::new(0.0, 0.0, -2.5)));
    }

    #[test]
    fn test_sphere_box_both_orders() {
        let sphere = CollisionShape::sphere(0.5);
        let cube = CollisionShape::cuboid(Vec3::ONE);

        let near = Vec3::new(0.0, 1.4, 0.0);
        let far = Vec3::new(0.0, 1.6, 0.0);
        assert!(sphere.intersects(near, &cube, Vec3::ZERO));
        assert!(cube.intersects(Vec3::ZERO, &sphere, near));
        assert!(!sphere.intersects(far, &cube, Vec3::ZERO));
        assert!(!cube.intersects(Vec3::ZERO, &sphere, far));

        // Corner region uses the true closest point, not the bounding box
        let corner = Vec3::new(1.4, 1.4, 0.0);
        assert!(!sphere.intersects(corner, &cube, Vec3::ZERO));
    }

    #[test]
    fn test_offsets_move_world_position() {
        let shape = CollisionShape::cuboid(Vec3::new(1.0, 2.0, 3.0)).with_offset(Vec3::X);
        let body_pos = Vec3::new(0.0, 5.0, 0.0);

        assert_eq!(shape.offset(), Vec3::X);
        assert_eq!(shape.world_position(body_pos), Vec3::new(1.0, 5.0, 0.0));
        assert_eq!(shape.min(body_pos), Vec3::new(0.0, 3.0, -3.0));
        assert_eq!(shape.max(body_pos), Vec3::new(2.0, 7.0, 3.0));

        let sphere = CollisionShape::sphere(1.0).with_offset(Vec3::new(10.0, 0.0, 0.0));
        assert!(!sphere.intersects(Vec3::ZERO, &CollisionShape::sphere(1.0), Vec3::ZERO));
    }
}
