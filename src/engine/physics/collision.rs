use glam::Vec3;
use std::collections::HashSet;

use super::arena::BodyHandle;
use super::body::RigidBody;
use super::shape::CollisionShape;
use crate::core::math::{clamp_to_box, VectorExt};

/// Centers closer than this are treated as coincident
const COINCIDENT_EPSILON: f32 = 1e-4;

/// Direction used to separate two spheres sharing a center
const SPHERE_FALLBACK_DIRECTION: Vec3 = Vec3::new(0.01, 1.0, 0.0);

/// Contact geometry between two shapes
///
/// `normal` is a unit vector pointing from body A toward body B and `overlap`
/// is the penetration depth along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactManifold {
    pub normal: Vec3,
    pub overlap: f32,
}

/// How the solver treated a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Slow, shallow contact: into-surface velocity removed, no bounce
    Resting,
    /// Approaching contact resolved with a restitution impulse
    Impact,
    /// Overlapping but already moving apart; only positional correction ran
    Separating,
}

/// A contact resolved during a physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub normal: Vec3,
    pub overlap: f32,
    pub kind: ContactKind,
}

/// Collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two bodies started touching
    Started {
        body_a: BodyHandle,
        body_b: BodyHandle,
    },

    /// Two bodies stopped touching
    Stopped {
        body_a: BodyHandle,
        body_b: BodyHandle,
    },
}

/// Compute the contact normal and overlap for two shapes at the given body positions
///
/// Returns `None` when the shapes do not penetrate. Touching exactly (zero
/// penetration) is not a contact.
pub fn contact_manifold(
    shape_a: &CollisionShape,
    position_a: Vec3,
    shape_b: &CollisionShape,
    position_b: Vec3,
) -> Option<ContactManifold> {
    let a = shape_a.world_position(position_a);
    let b = shape_b.world_position(position_b);

    let manifold = match (*shape_a, *shape_b) {
        (CollisionShape::Sphere { radius: ra, .. }, CollisionShape::Sphere { radius: rb, .. }) => {
            let distance = a.distance_to(b);
            let normal = if distance < COINCIDENT_EPSILON {
                SPHERE_FALLBACK_DIRECTION.normalized()
            } else {
                (b - a).normalized()
            };
            ContactManifold {
                normal,
                overlap: (ra + rb) - distance,
            }
        }
        (CollisionShape::Sphere { radius, .. }, CollisionShape::Box { half_extents, .. }) => {
            // Box-to-sphere normal flipped so it runs from A (sphere) to B (box)
            let mut manifold = sphere_box_manifold(a, radius, b, half_extents);
            manifold.normal = -manifold.normal;
            manifold
        }
        (CollisionShape::Box { half_extents, .. }, CollisionShape::Sphere { radius, .. }) => {
            sphere_box_manifold(b, radius, a, half_extents)
        }
        (CollisionShape::Box { half_extents: ha, .. }, CollisionShape::Box { half_extents: hb, .. }) => {
            box_box_manifold(a, ha, b, hb)?
        }
    };

    (manifold.overlap > 0.0).then_some(manifold)
}

/// Contact between the shapes of two bodies, if both have one and they penetrate
pub fn body_contact(a: &RigidBody, b: &RigidBody) -> Option<ContactManifold> {
    let shape_a = a.shape()?;
    let shape_b = b.shape()?;
    if !shape_a.intersects(a.position(), shape_b, b.position()) {
        return None;
    }
    contact_manifold(shape_a, a.position(), shape_b, b.position())
}

/// Normal points from the box toward the sphere
fn sphere_box_manifold(
    sphere_center: Vec3,
    radius: f32,
    box_center: Vec3,
    half_extents: Vec3,
) -> ContactManifold {
    let closest = clamp_to_box(
        sphere_center,
        box_center - half_extents,
        box_center + half_extents,
    );

    let mut normal = (sphere_center - closest).normalized();
    if normal == Vec3::ZERO {
        // Sphere center inside the box
        normal = (sphere_center - box_center).normalized();
    }
    if normal == Vec3::ZERO {
        normal = Vec3::Y;
    }

    ContactManifold {
        normal,
        overlap: radius - sphere_center.distance_to(closest),
    }
}

/// Minimum translation axis between two boxes, signed by the center offset
fn box_box_manifold(a: Vec3, ha: Vec3, b: Vec3, hb: Vec3) -> Option<ContactManifold> {
    let delta = b - a;
    let penetration = (ha + hb) - delta.abs();
    if penetration.x <= 0.0 || penetration.y <= 0.0 || penetration.z <= 0.0 {
        return None;
    }

    let sign = |d: f32| if d < 0.0 { -1.0 } else { 1.0 };
    let (normal, overlap) = if penetration.x <= penetration.y && penetration.x <= penetration.z {
        (Vec3::new(sign(delta.x), 0.0, 0.0), penetration.x)
    } else if penetration.y <= penetration.z {
        (Vec3::new(0.0, sign(delta.y), 0.0), penetration.y)
    } else {
        (Vec3::new(0.0, 0.0, sign(delta.z)), penetration.z)
    };

    Some(ContactManifold { normal, overlap })
}

/// Queue of collision events plus the set of pairs currently touching
///
/// Pairs are keyed in registry order, so (a, b) and (b, a) never both appear.
#[derive(Debug, Default)]
pub struct CollisionEventQueue {
    events: Vec<CollisionEvent>,
    touching: HashSet<(BodyHandle, BodyHandle)>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32), // Pre-allocate for common case
            touching: HashSet::new(),
        }
    }

    /// Clear queued events (call at start of each update)
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Forget all touching pairs and events
    pub fn reset(&mut self) {
        self.events.clear();
        self.touching.clear();
    }

    /// Events queued since the last clear
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Diff this step's contacts against the previous step and queue events
    pub fn record_step(&mut self, contacts: &[Contact]) {
        let current: HashSet<_> = contacts.iter().map(|c| (c.body_a, c.body_b)).collect();

        for contact in contacts {
            let pair = (contact.body_a, contact.body_b);
            if !self.touching.contains(&pair) {
                self.events.push(CollisionEvent::Started {
                    body_a: pair.0,
                    body_b: pair.1,
                });
            }
        }

        // Sorted so the event order does not depend on hash iteration
        let mut ended: Vec<_> = self.touching.difference(&current).copied().collect();
        ended.sort_by_key(|(a, b)| (a.index(), a.generation(), b.index(), b.generation()));
        for (body_a, body_b) in ended {
            self.events.push(CollisionEvent::Stopped { body_a, body_b });
        }

        self.touching = current;
    }

    /// Drop any touching pair that involves `handle`, queuing a stop event
    pub fn forget_body(&mut self, handle: BodyHandle) {
        let mut ended: Vec<_> = self
            .touching
            .iter()
            .filter(|(a, b)| *a == handle || *b == handle)
            .copied()
            .collect();
        ended.sort_by_key(|(a, b)| (a.index(), a.generation(), b.index(), b.generation()));
        for (body_a, body_b) in ended {
            self.touching.remove(&(body_a, body_b));
            self.events.push(CollisionEvent::Stopped { body_a, body_b });
        }
    }

    pub fn is_touching(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.touching.contains(&(a, b)) || self.touching.contains(&(b, a))
    }
}
