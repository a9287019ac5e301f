//! Space Flyby - procedural object pool for a first-person space demo
//!
//! Core modules:
//! - `sim`: Object pool, motion models, recycling and containment checks
//! - `config`: Data-driven population and tuning
//! - `render`: GPU instance records for the external renderer
//! - `platform`: Browser binding for the render loop

pub mod config;
pub mod error;
pub mod platform;
pub mod render;
pub mod sim;

pub use config::PoolConfig;
pub use error::{FlybyError, FlybyResult};
pub use sim::{CollisionReport, FlybyCamera, Hit, ObjectPool};

/// Tuning constants taken from the original demo
pub mod consts {
    /// Translation multiplier for linear drift
    pub const K_LINEAR: f32 = 3.0;
    /// Angular rate (radians per unit of elapsed time) for precession models
    pub const K_PRECESSION: f32 = 0.0075;

    /// Deflection response: drift z after a bounce
    pub const DEFLECT_RETREAT_Z: f32 = -10.0;
    /// Deflection response: immediate backward nudge along z
    pub const DEFLECT_NUDGE: f32 = 10.0;
    /// Deflection response: synthetic elapsed time used to push the body away
    pub const DEFLECT_ELAPSED: f32 = 5.0;

    /// Default populations
    pub const DEFAULT_ASTEROIDS: i64 = 250;
    pub const DEFAULT_TORUS_KNOTS: i64 = 40;
    pub const DEFAULT_BACKGROUND_FIELDS: i64 = 3;

    /// Asteroid icosahedron radius
    pub const ASTEROID_RADIUS: f32 = 10.0;
    /// Foreground bodies leave the pool's range at this distance
    pub const BODY_RECYCLE_DISTANCE: f32 = 2000.0;
    /// Star fields are re-centred at this distance
    pub const STAR_FIELD_RECYCLE_DISTANCE: f32 = 450.0;

    /// Camera auto-forward speed
    pub const CAMERA_SPEED: f32 = 30.0;
    /// Frame delta scaling applied before the pool sees it
    pub const FRAME_DELTA_SCALE: f32 = 10.0;
    /// Extra scaling the controls apply to the frame delta
    pub const CONTROLS_DELTA_SCALE: f32 = 1.5;
    /// Movement damping applied by the controls
    pub const CAMERA_DAMPING: f32 = 0.5;
    /// Speed change per accelerate/decelerate step
    pub const CAMERA_SPEED_STEP: f32 = 0.1;
    /// Camera starting depth
    pub const CAMERA_START_Z: f32 = 500.0;
}

/// True if every component of the vector is finite
#[inline]
pub fn is_finite_vec3(v: glam::Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
