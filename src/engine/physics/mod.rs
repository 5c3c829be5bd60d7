// Rigid-body physics: fixed-step integration, narrow-phase contacts and
// impulse-based contact resolution

mod arena;
pub mod body;
pub mod collision;
pub mod config;
mod error;
pub mod shape;
mod stepper;
mod world;

pub use arena::{Arena, BodyHandle, Handle};
pub use body::{presets, BodyBuilder, RigidBody};
pub use collision::{CollisionEvent, Contact, ContactKind, ContactManifold};
pub use config::{PhysicsConfig, SolverSettings};
pub use error::{PhysicsError, PhysicsResult};
pub use shape::CollisionShape;
pub use stepper::FixedStepper;
pub use world::{PhysicsWorld, StepStats};
