//! Procedural object pool and motion engine
//!
//! Everything that moves lives here. The module is deterministic given a seed
//! and a clock:
//! - Seeded RNG only (`rand_pcg::Pcg32`)
//! - Wall-clock time only through the `Clock` seam
//! - Stable iteration order (asteroids, then torus knots, by slot index)
//! - No rendering or platform dependencies

pub mod body;
pub mod bounds;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod motion;
pub mod pool;
pub mod random;
pub mod starfield;

pub use body::{BodyHandle, BodyKind, BodyTuning, Geometry, MotionBody};
pub use bounds::Aabb;
pub use camera::FlybyCamera;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collision::{CollisionReport, Hit, validate_viewpoint};
pub use motion::{MotionModel, rotate_about_axis};
pub use pool::{ObjectPool, PoolStats, Renderable, SceneSink};
pub use starfield::{FieldHandle, StarField};
