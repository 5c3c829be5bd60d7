// Physics world configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::{PhysicsError, PhysicsResult};

/// Default fixed timestep (60 updates per second)
pub const DEFAULT_FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Default cap on catch-up steps per update to prevent the spiral of death
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Default gravity (-9.81 m/s² in y-axis)
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Tuning for the contact solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Bounciness of impacts (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,

    /// Penetration depth tolerated before positional correction kicks in
    pub slop: f32,

    /// Fraction of the remaining penetration removed per step
    pub correction_percent: f32,

    /// Relative normal speed below which a shallow contact counts as resting
    pub resting_velocity: f32,

    /// Penetration depth below which a slow contact counts as resting
    pub resting_overlap: f32,

    /// Speeds below this are snapped to zero after resolution
    pub velocity_snap: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            slop: 0.001,
            correction_percent: 0.8,
            resting_velocity: 0.5,
            resting_overlap: 0.01,
            velocity_snap: 0.01,
        }
    }
}

/// Complete configuration of a physics world
///
/// Passed at construction and replaced wholesale through
/// `PhysicsWorld::set_config`, so a world never sees a half-applied change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector applied to every awake dynamic body with `use_gravity` set
    pub gravity: Vec3,

    /// Size of one simulation step in seconds
    pub fixed_timestep: f32,

    /// Maximum number of fixed steps a single update may run
    pub max_substeps: u32,

    /// Contact solver tuning
    pub solver: SolverSettings,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            solver: SolverSettings::default(),
        }
    }
}

impl PhysicsConfig {
    /// Default configuration with a custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Check that the configuration can drive a simulation
    pub fn validate(&self) -> PhysicsResult<()> {
        validate_timestep(self.fixed_timestep)?;
        validate_gravity(self.gravity)?;
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidMaxSubsteps);
        }
        Ok(())
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> PhysicsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty-printed JSON
    pub fn to_json_string(&self) -> PhysicsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub(crate) fn validate_timestep(dt: f32) -> PhysicsResult<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidTimestep(dt))
    }
}

pub(crate) fn validate_gravity(gravity: Vec3) -> PhysicsResult<()> {
    if gravity.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidGravity {
            x: gravity.x,
            y: gravity.y,
            z: gravity.z,
        })
    }
}
