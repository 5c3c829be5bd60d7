use glam::Vec3;

use super::shape::CollisionShape;
use crate::core::math::clamp;

/// Speed below which a body starts accumulating sleep time
pub const SLEEP_VELOCITY_THRESHOLD: f32 = 0.01;

/// Seconds a body must stay below the sleep speed before it falls asleep
pub const SLEEP_TIME_THRESHOLD: f32 = 0.5;

/// A point-mass rigid body integrated with semi-implicit Euler
///
/// Bodies carry no rotation; the attached shape only adds an offset from the
/// body position.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    force: Vec3,
    mass: f32,
    drag: f32,
    use_gravity: bool,
    is_static: bool,
    is_sleeping: bool,
    sleep_timer: f32,
    shape: Option<CollisionShape>,
}

impl RigidBody {
    /// Create a dynamic body of unit mass at `position`
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 1.0,
            drag: 0.0,
            use_gravity: true,
            is_static: false,
            is_sleeping: false,
            sleep_timer: 0.0,
            shape: None,
        }
    }

    /// Advance the body by `dt` seconds
    ///
    /// Consumes the force accumulator: continuous forces must be re-applied
    /// every step.
    pub fn update(&mut self, dt: f32) {
        if self.is_static || self.is_sleeping {
            return;
        }

        self.acceleration = self.force / self.mass;
        self.velocity += self.acceleration * dt;
        self.velocity *= 1.0 - self.drag;
        self.position += self.velocity * dt;

        if self.velocity.length() < SLEEP_VELOCITY_THRESHOLD {
            self.sleep_timer += dt;
            if self.sleep_timer >= SLEEP_TIME_THRESHOLD {
                self.is_sleeping = true;
                self.velocity = Vec3::ZERO;
                self.acceleration = Vec3::ZERO;
                self.force = Vec3::ZERO;
            }
        } else {
            self.sleep_timer = 0.0;
        }

        self.force = Vec3::ZERO;
    }

    /// Accumulate a force for the next step
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
        if self.is_sleeping && force != Vec3::ZERO {
            self.wake_up();
        }
    }

    /// Change velocity immediately by `impulse / mass`
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.is_static {
            return;
        }
        self.velocity += impulse / self.mass;
        if self.is_sleeping && impulse != Vec3::ZERO {
            self.wake_up();
        }
    }

    /// Zero velocity, acceleration and pending force; the sleep state is untouched
    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.force = Vec3::ZERO;
    }

    /// Clear the sleep flag and restart the sleep timer
    pub fn wake_up(&mut self) {
        self.is_sleeping = false;
        self.sleep_timer = 0.0;
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }

    /// Inverse mass used by the contact solver; static bodies have none
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Mass seen by the contact solver; static bodies count as zero
    pub fn effective_mass(&self) -> f32 {
        if self.is_static {
            0.0
        } else {
            self.mass
        }
    }

    /// Whether the two bodies' shapes touch; false if either has no shape
    pub fn collides_with(&self, other: &RigidBody) -> bool {
        match (&self.shape, &other.shape) {
            (Some(a), Some(b)) => a.intersects(self.position, b, other.position),
            _ => false,
        }
    }

    /// World-space center of the attached shape
    pub fn shape_world_position(&self) -> Option<Vec3> {
        self.shape.map(|shape| shape.world_position(self.position))
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        if self.is_sleeping && velocity != Vec3::ZERO {
            self.wake_up();
        }
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Force accumulated since the last update
    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass; non-positive values fall back to 1.0
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = if mass <= 0.0 { 1.0 } else { mass };
    }

    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Set per-step velocity damping, clamped to [0, 1]
    pub fn set_drag(&mut self, drag: f32) {
        self.drag = clamp(drag, 0.0, 1.0);
    }

    pub fn uses_gravity(&self) -> bool {
        self.use_gravity
    }

    pub fn set_use_gravity(&mut self, use_gravity: bool) {
        self.use_gravity = use_gravity;
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.stop();
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    pub fn sleep_timer(&self) -> f32 {
        self.sleep_timer
    }

    pub fn shape(&self) -> Option<&CollisionShape> {
        self.shape.as_ref()
    }

    /// Attach a shape, replacing any previous one
    pub fn set_shape(&mut self, shape: CollisionShape) {
        self.shape = Some(shape);
    }

    /// Detach and return the current shape
    pub fn take_shape(&mut self) -> Option<CollisionShape> {
        self.shape.take()
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    position: Vec3,
    velocity: Vec3,
    mass: f32,
    drag: f32,
    use_gravity: bool,
    is_static: bool,
    shape: Option<CollisionShape>,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: 1.0,
            drag: 0.0,
            use_gravity: true,
            is_static: false,
            shape: None,
        }
    }

    /// Create a new static body (completely immovable)
    pub fn new_static() -> Self {
        Self {
            use_gravity: false,
            is_static: true,
            ..Self::new_dynamic()
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Set the initial linear velocity
    pub fn velocity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.velocity = Vec3::new(x, y, z);
        self
    }

    /// Set the mass (non-positive values become 1.0)
    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set per-step velocity damping (clamped to [0, 1])
    pub fn drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Enable or disable world gravity for this body
    pub fn use_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Attach a collision shape
    pub fn shape(mut self, shape: CollisionShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        let mut body = RigidBody::new(self.position);
        body.set_mass(self.mass);
        body.set_drag(self.drag);
        body.use_gravity = self.use_gravity;
        body.is_static = self.is_static;
        body.shape = self.shape;
        if !self.is_static {
            body.velocity = self.velocity;
        }
        body
    }
}

/// Common rigid body configurations
pub mod presets {
    use super::*;

    /// A dynamic ball of unit mass
    pub fn ball(position: Vec3, radius: f32) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(position.x, position.y, position.z)
            .shape(CollisionShape::sphere(radius))
            .build()
    }

    /// A static floor slab whose top face sits at `top_y`
    pub fn ground(top_y: f32, half_width: f32, half_depth: f32) -> RigidBody {
        let half_height = 0.5;
        BodyBuilder::new_static()
            .position(0.0, top_y - half_height, 0.0)
            .shape(CollisionShape::cuboid(Vec3::new(half_width, half_height, half_depth)))
            .build()
    }

    /// A dynamic box with light air resistance
    pub fn crate_box(position: Vec3, half_extents: Vec3, mass: f32) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(position.x, position.y, position.z)
            .mass(mass)
            .drag(0.01)
            .shape(CollisionShape::cuboid(half_extents))
            .build()
    }
}
