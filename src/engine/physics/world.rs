use glam::Vec3;
use log::{debug, trace};

use super::arena::{Arena, BodyHandle};
use super::body::RigidBody;
use super::collision::{
    body_contact, CollisionEvent, CollisionEventQueue, Contact, ContactKind, ContactManifold,
};
use super::config::{validate_gravity, validate_timestep, PhysicsConfig, SolverSettings};
use super::error::{PhysicsError, PhysicsResult};
use super::stepper::FixedStepper;

/// Pairs whose combined effective mass is below this are not resolved
const MIN_PAIR_MASS: f32 = 1e-4;

/// Counters from the most recent update, for logging and debug overlays
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Fixed steps run by the last update
    pub steps: u32,

    /// Contacts resolved in the last step
    pub contacts: usize,

    /// Registered bodies currently asleep
    pub sleeping_bodies: usize,

    /// Fixed steps run since the world was created
    pub total_steps: u64,

    /// Simulated seconds discarded by the catch-up cap since the world was created
    pub dropped_time: f32,
}

/// Physics world that owns every body and drives the simulation
///
/// Bodies are stored in a generational arena and referred to by
/// [`BodyHandle`]; the registry keeps insertion order, which is also the
/// order pairs are resolved in.
pub struct PhysicsWorld {
    /// Active configuration (gravity, timestep, solver tuning)
    config: PhysicsConfig,

    /// Fixed timestep accumulator
    stepper: FixedStepper,

    /// Body storage
    bodies: Arena<RigidBody>,

    /// Registered bodies in insertion order
    registry: Vec<BodyHandle>,

    /// Contacts resolved during the most recent step
    contacts: Vec<Contact>,

    /// Collision event handler
    collision_events: CollisionEventQueue,

    stats: StepStats,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::from_valid_config(PhysicsConfig::default())
    }

    /// Create a physics world from an explicit configuration
    pub fn with_config(config: PhysicsConfig) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PhysicsConfig) -> Self {
        Self {
            stepper: FixedStepper::new(config.fixed_timestep, config.max_substeps),
            config,
            bodies: Arena::new(),
            registry: Vec::new(),
            contacts: Vec::new(),
            collision_events: CollisionEventQueue::new(),
            stats: StepStats::default(),
        }
    }

    /// Advance the simulation by a frame's worth of wall-clock time
    ///
    /// Runs zero or more fixed steps depending on the accumulated time and
    /// returns how many ran. Collision events queued by the previous update are
    /// cleared first.
    pub fn update(&mut self, delta_time: f32) -> u32 {
        self.collision_events.clear_events();

        let steps = self.stepper.advance(delta_time);
        for _ in 0..steps {
            self.step();
        }

        self.stats = StepStats {
            steps,
            contacts: self.contacts.len(),
            sleeping_bodies: self.bodies().filter(|(_, b)| b.is_sleeping()).count(),
            total_steps: self.stepper.total_steps(),
            dropped_time: self.stepper.dropped_time(),
        };
        trace!(
            "update dt={:.4}: {} steps, {} contacts, {} sleeping",
            delta_time,
            steps,
            self.stats.contacts,
            self.stats.sleeping_bodies
        );

        steps
    }

    /// Step the physics simulation forward by exactly one fixed timestep
    ///
    /// Bypasses the accumulator; `update` is the normal per-frame entry point.
    pub fn step(&mut self) {
        let dt = self.config.fixed_timestep;
        let gravity = self.config.gravity;

        for handle in &self.registry {
            if let Some(body) = self.bodies.get_mut(*handle) {
                if !body.is_static() && !body.is_sleeping() && body.uses_gravity() {
                    let mass = body.mass();
                    body.apply_force(gravity * mass);
                }
            }
        }

        for handle in &self.registry {
            if let Some(body) = self.bodies.get_mut(*handle) {
                body.update(dt);
            }
        }

        self.resolve_collisions();
        self.collision_events.record_step(&self.contacts);
    }

    /// Exhaustive pairwise scan in registry order
    fn resolve_collisions(&mut self) {
        self.contacts.clear();
        let solver = self.config.solver;

        for i in 0..self.registry.len() {
            for j in (i + 1)..self.registry.len() {
                let (handle_a, handle_b) = (self.registry[i], self.registry[j]);
                let Some((a, b)) = self.bodies.get2_mut(handle_a, handle_b) else {
                    continue;
                };

                if let Some((manifold, kind)) = resolve_pair(a, b, &solver) {
                    self.contacts.push(Contact {
                        body_a: handle_a,
                        body_b: handle_b,
                        normal: manifold.normal,
                        overlap: manifold.overlap,
                        kind,
                    });
                }
            }
        }
    }

    /// Add a rigid body to the physics world
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.insert(body);
        self.registry.push(handle);
        debug!("Added body {:?} ({} registered)", handle, self.registry.len());
        handle
    }

    /// Remove a body and hand it back; stale or unknown handles are a no-op
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let body = self.bodies.remove(handle)?;
        self.registry.retain(|h| *h != handle);
        self.contacts.retain(|c| c.body_a != handle && c.body_b != handle);
        self.collision_events.forget_body(handle);
        debug!("Removed body {:?} ({} registered)", handle, self.registry.len());
        Some(body)
    }

    /// Remove every body; all outstanding handles become stale
    pub fn clear_bodies(&mut self) {
        self.bodies.clear();
        self.registry.clear();
        self.contacts.clear();
        self.collision_events.reset();
        debug!("Cleared all bodies");
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.registry.len()
    }

    /// Body at a registry position; out-of-range indices give `None`
    pub fn body_at(&self, index: usize) -> Option<&RigidBody> {
        self.bodies.get(*self.registry.get(index)?)
    }

    /// Handle of the body at a registry position
    pub fn handle_at(&self, index: usize) -> Option<BodyHandle> {
        self.registry.get(index).copied()
    }

    /// Registered handles in insertion order
    pub fn handles(&self) -> &[BodyHandle] {
        &self.registry
    }

    /// Iterate over registered bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.registry
            .iter()
            .filter_map(move |&h| self.bodies.get(h).map(|body| (h, body)))
    }

    /// Get a reference to a rigid body
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Whether `handle` still refers to a body in this world
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Add a force to every non-static body for the next step
    pub fn apply_force_to_all(&mut self, force: Vec3) {
        for handle in &self.registry {
            if let Some(body) = self.bodies.get_mut(*handle) {
                if !body.is_static() {
                    body.apply_force(force);
                }
            }
        }
    }

    /// Whether the bodies at two registry positions touch
    ///
    /// Invalid indices and bodies without shapes report `false`.
    pub fn check_collision(&self, index_a: usize, index_b: usize) -> bool {
        self.try_check_collision(index_a, index_b).unwrap_or(false)
    }

    /// Like [`check_collision`](Self::check_collision) but reports bad indices
    pub fn try_check_collision(&self, index_a: usize, index_b: usize) -> PhysicsResult<bool> {
        let a = self.indexed(index_a)?;
        let b = self.indexed(index_b)?;
        Ok(a.collides_with(b))
    }

    /// Contact geometry between two bodies, `None` when they do not penetrate
    pub fn contact_between(
        &self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> PhysicsResult<Option<ContactManifold>> {
        let body_a = self.bodies.get(a).ok_or(PhysicsError::InvalidHandle(a))?;
        let body_b = self.bodies.get(b).ok_or(PhysicsError::InvalidHandle(b))?;
        Ok(body_contact(body_a, body_b))
    }

    fn indexed(&self, index: usize) -> PhysicsResult<&RigidBody> {
        self.body_at(index).ok_or(PhysicsError::IndexOutOfRange {
            index,
            len: self.registry.len(),
        })
    }

    /// Contacts resolved during the most recent step
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Get all collision events from the last update
    pub fn collision_events(&self) -> &[CollisionEvent] {
        self.collision_events.events()
    }

    /// Whether two bodies were in contact at the end of the last step
    pub fn is_touching(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.collision_events.is_touching(a, b)
    }

    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Interpolation factor between the last two steps, for rendering
    pub fn alpha(&self) -> f32 {
        self.stepper.alpha()
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replace the whole configuration; leftover accumulated time is kept
    pub fn set_config(&mut self, config: PhysicsConfig) -> PhysicsResult<()> {
        config.validate()?;
        self.stepper.set_fixed_timestep(config.fixed_timestep);
        self.stepper.set_max_steps(config.max_substeps);
        self.config = config;
        debug!("Physics config replaced: {:?}", self.config);
        Ok(())
    }

    /// Set gravity for the physics world
    pub fn set_gravity(&mut self, gravity: Vec3) -> PhysicsResult<()> {
        validate_gravity(gravity)?;
        self.config.gravity = gravity;
        Ok(())
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Set the timestep for physics simulation
    pub fn set_fixed_timestep(&mut self, dt: f32) -> PhysicsResult<()> {
        validate_timestep(dt)?;
        self.config.fixed_timestep = dt;
        self.stepper.set_fixed_timestep(dt);
        Ok(())
    }

    /// Get the current timestep
    pub fn fixed_timestep(&self) -> f32 {
        self.config.fixed_timestep
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve one pair: positional correction, then a velocity response
///
/// Returns the contact and how it was treated, or `None` if the pair was
/// skipped.
fn resolve_pair(
    a: &mut RigidBody,
    b: &mut RigidBody,
    solver: &SolverSettings,
) -> Option<(ContactManifold, ContactKind)> {
    if a.is_static() && b.is_static() {
        return None;
    }

    let manifold = body_contact(a, b)?;
    if a.effective_mass() + b.effective_mass() < MIN_PAIR_MASS {
        return None;
    }

    let normal = manifold.normal;
    let overlap = manifold.overlap;
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;

    if overlap > solver.slop {
        let correction = (overlap - solver.slop) * solver.correction_percent;
        if !a.is_static() {
            a.translate(-normal * (correction * inv_a / inv_sum));
        }
        if !b.is_static() {
            b.translate(normal * (correction * inv_b / inv_sum));
        }
    }

    let vel_along_normal = (b.velocity() - a.velocity()).dot(normal);
    let snap = solver.velocity_snap;

    let kind = if vel_along_normal.abs() < solver.resting_velocity
        && overlap < solver.resting_overlap
    {
        // A pushes into B along +normal, B pushes into A along -normal
        if !a.is_static() {
            let into = a.velocity().dot(normal);
            if into > 0.0 {
                a.set_velocity(snap_to_zero(a.velocity() - normal * into, snap));
            }
        }
        if !b.is_static() {
            let into = b.velocity().dot(normal);
            if into < 0.0 {
                b.set_velocity(snap_to_zero(b.velocity() - normal * into, snap));
            }
        }
        ContactKind::Resting
    } else if vel_along_normal < 0.0 {
        let magnitude = -(1.0 + solver.restitution) * vel_along_normal / inv_sum;
        let impulse = normal * magnitude;
        if !a.is_static() {
            a.set_velocity(snap_to_zero(a.velocity() - impulse * inv_a, snap));
        }
        if !b.is_static() {
            b.set_velocity(snap_to_zero(b.velocity() + impulse * inv_b, snap));
        }
        ContactKind::Impact
    } else {
        ContactKind::Separating
    };

    Some((manifold, kind))
}

#[inline]
fn snap_to_zero(velocity: Vec3, threshold: f32) -> Vec3 {
    if velocity.length() < threshold {
        Vec3::ZERO
    } else {
        velocity
    }
}
