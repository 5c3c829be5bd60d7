//! Rusted Physics - a small real-time rigid-body physics core
//!
//! Core modules:
//! - `core`: Math utilities on top of `glam`
//! - `engine::physics`: Bodies, shapes, contact resolution and the fixed-step world

pub mod core;
pub mod engine;

pub use engine::physics::{
    BodyBuilder, BodyHandle, CollisionEvent, CollisionShape, PhysicsConfig, PhysicsError,
    PhysicsWorld, RigidBody,
};
pub use glam::{Vec2, Vec3};
