use thiserror::Error;

use super::arena::BodyHandle;

/// Errors surfaced by the physics world for invalid configuration or lookups
///
/// The simulation step itself never fails; these only come back from the
/// configuration and fallible query entry points.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("fixed timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),

    #[error("gravity must be finite, got ({x}, {y}, {z})")]
    InvalidGravity { x: f32, y: f32, z: f32 },

    #[error("maximum substeps per update must be at least 1")]
    InvalidMaxSubsteps,

    #[error("body handle {0:?} does not refer to a live body")]
    InvalidHandle(BodyHandle),

    #[error("body index {index} out of range (registry holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid physics configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
