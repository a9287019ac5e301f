//! Procedurally driven foreground bodies (asteroids and torus knots)
//!
//! A body is spawned once with randomized fields, advanced every tick by its
//! motion model, and repositioned in place when the pool recycles it.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::motion::MotionModel;
use super::random::{in_range, orientation, sign, spread, spread_vec3};
use crate::config::{
    BodyProfile, BodyShape, ContactResponse, DeflectionConstants, DepthPlacement, MotionConstants,
};

/// Body population a handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyKind {
    Asteroid,
    TorusKnot,
}

impl BodyKind {
    /// Numeric code shared by instance records and the browser binding
    pub fn code(self) -> u32 {
        match self {
            BodyKind::Asteroid => 0,
            BodyKind::TorusKnot => 1,
        }
    }
}

/// Stable identity of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle {
    kind: BodyKind,
    index: u32,
}

impl BodyHandle {
    pub(crate) fn new(kind: BodyKind, index: u32) -> Self {
        Self { kind, index }
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// `[kind code, slot index]`, unambiguous across populations
    pub fn to_pair(&self) -> [u32; 2] {
        [self.kind.code(), self.index]
    }
}

/// Renderable geometry of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Asteroid { radius: f32 },
    TorusKnot { radius: f32, tube: f32 },
}

impl Geometry {
    /// Local-space bounding radius
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Geometry::Asteroid { radius } => radius,
            // A (2,3) knot reaches 1.5x its radius, plus the tube
            Geometry::TorusKnot { radius, tube } => radius * 1.5 + tube,
        }
    }
}

/// Per-body copy of the constants `update` and deflection need
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyTuning {
    pub motion: MotionConstants,
    pub deflection: DeflectionConstants,
    pub pulse_amplitude: f32,
    pub pulse_offset: f32,
    pub contact: ContactResponse,
}

/// A pooled, moving body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionBody {
    pub handle: BodyHandle,
    pub geometry: Geometry,
    pub position: Vec3,
    /// Current pulse factor
    pub scale: f32,
    /// Local bounding radius at scale 1
    pub base_size: f32,
    pub drift: Vec3,
    /// Unit axis used by precession models
    pub rotation_axis: Vec3,
    /// Frequency of the scale pulse
    pub pulse_speed: f32,
    pub motion: MotionModel,
    /// Mesh orientation (render only)
    pub orientation: Quat,
    /// Spin rate per axis (render only)
    pub spin: Vec3,
    /// Accumulated per-tick delta, fed to the shader time uniform
    pub age: f32,
    pub tuning: BodyTuning,
    last_wall_clock: f64,
    bounds: Aabb,
}

impl MotionBody {
    /// Spawn a body with fully randomized fields
    pub fn spawn<R: Rng + ?Sized>(
        handle: BodyHandle,
        profile: &BodyProfile,
        tuning: BodyTuning,
        rng: &mut R,
    ) -> Self {
        let geometry = match profile.shape {
            BodyShape::Sphere { radius, size } => Geometry::Asteroid {
                radius: radius * in_range(rng, size),
            },
            BodyShape::Knot { radius, tube } => Geometry::TorusKnot {
                radius: in_range(rng, radius),
                tube: in_range(rng, tube),
            },
        };

        let motion = MotionModel::roll(rng);
        let rotation_axis = Vec3::new(rng.random(), rng.random(), rng.random())
            .try_normalize()
            .unwrap_or(Vec3::Y);
        let drift = spread_vec3(rng, profile.drift_spread);
        let pulse_speed = in_range(rng, profile.pulse_speed);
        let orientation = orientation(rng);
        let spin = spread_vec3(rng, profile.spin * 2.0);
        let position = Vec3::new(
            spread(rng, profile.spawn_spread),
            spread(rng, profile.spawn_spread),
            in_range(rng, profile.spawn_depth),
        );

        let mut body = Self {
            handle,
            base_size: geometry.bounding_radius(),
            geometry,
            position,
            scale: tuning.pulse_offset,
            drift,
            rotation_axis,
            pulse_speed,
            motion,
            orientation,
            spin,
            age: 0.0,
            tuning,
            last_wall_clock: 0.0,
            bounds: Aabb::around(position, 0.0),
        };
        body.refresh_bounds();
        body
    }

    pub fn kind(&self) -> BodyKind {
        self.handle.kind()
    }

    /// Current bounding volume (consistent with position and scale)
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Advance the pulse, the position and the orientation
    ///
    /// `elapsed` is the per-tick delta; `wall_clock` is absolute time in
    /// seconds and drives only the pulse.
    pub fn update(&mut self, elapsed: f32, wall_clock: f64) {
        let t = &self.tuning;
        self.scale = ((wall_clock * self.pulse_speed as f64).sin() as f32) * t.pulse_amplitude
            + t.pulse_offset;

        self.position = self.motion.advance(
            self.position,
            self.drift,
            self.rotation_axis,
            elapsed,
            &t.motion,
        );

        let turn = Quat::from_scaled_axis(self.spin * elapsed);
        self.orientation = (turn * self.orientation).normalize();
        self.age += elapsed;
        self.last_wall_clock = wall_clock;

        self.refresh_bounds();
    }

    /// Pure containment query
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        self.bounds.contains(point)
    }

    /// True if `point` is inside the bounding volume
    ///
    /// Bodies with `ContactResponse::Deflect` bounce away on a hit.
    pub fn intersects_position(&mut self, point: Vec3) -> bool {
        if !self.contains(point) {
            return false;
        }
        if self.tuning.contact == ContactResponse::Deflect {
            self.deflect();
        }
        true
    }

    /// Force linear motion away from the viewpoint and push the body out
    fn deflect(&mut self) {
        let d = self.tuning.deflection;
        self.motion = MotionModel::Linear;
        self.drift.x = -self.drift.x;
        self.drift.y = -self.drift.y;
        self.drift.z = d.retreat_z;
        self.position.z -= d.nudge;
        self.update(d.elapsed, self.last_wall_clock);
        log::debug!(
            "{:?} deflected to ({:.1}, {:.1}, {:.1})",
            self.handle,
            self.position.x,
            self.position.y,
            self.position.z
        );
    }

    /// Reposition relative to `viewpoint` without reallocating the slot
    pub fn recycle<R: Rng + ?Sized>(&mut self, viewpoint: Vec3, profile: &BodyProfile, rng: &mut R) {
        let respawn = &profile.respawn;
        let depth_sign = match respawn.placement {
            DepthPlacement::Ahead => -1.0,
            DepthPlacement::Either => sign(rng),
        };
        self.position = Vec3::new(
            viewpoint.x + spread(rng, respawn.spread),
            viewpoint.y + spread(rng, respawn.spread),
            viewpoint.z + respawn.depth * depth_sign,
        );
        if profile.reroll_drift_on_recycle {
            self.drift = spread_vec3(rng, profile.drift_spread);
        }
        self.refresh_bounds();
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    fn refresh_bounds(&mut self) {
        self.bounds = Aabb::around(self.position, self.base_size * self.scale);
    }
}
