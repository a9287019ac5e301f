//! Pool configuration
//!
//! Everything the pool needs to build its populations lives here, loaded from
//! JSON or taken from `Default` (which reproduces the original demo).

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{FlybyError, FlybyResult};

/// Inclusive float range used for randomized spawn parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn check(&self, what: &str) -> FlybyResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(FlybyError::config(format!(
                "{what}: range [{}, {}] is empty or not finite",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Requested population sizes
///
/// Signed so that a negative request can be rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub asteroids: i64,
    pub torus_knots: i64,
    pub background_fields: i64,
}

impl Default for PopulationCounts {
    fn default() -> Self {
        Self {
            asteroids: DEFAULT_ASTEROIDS,
            torus_knots: DEFAULT_TORUS_KNOTS,
            background_fields: DEFAULT_BACKGROUND_FIELDS,
        }
    }
}

/// Validated population sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Populations {
    pub asteroids: usize,
    pub torus_knots: usize,
    pub background_fields: usize,
}

impl PopulationCounts {
    pub fn resolve(&self) -> FlybyResult<Populations> {
        let count = |name: &str, n: i64| {
            usize::try_from(n)
                .map_err(|_| FlybyError::config(format!("{name} count must not be negative (got {n})")))
        };
        Ok(Populations {
            asteroids: count("asteroids", self.asteroids)?,
            torus_knots: count("torus_knots", self.torus_knots)?,
            background_fields: count("background_fields", self.background_fields)?,
        })
    }
}

/// Geometry a body kind is built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Icosahedron of fixed radius, uniformly resized per body
    Sphere { radius: f32, size: FloatRange },
    /// Torus knot with randomized radius and tube thickness
    Knot { radius: FloatRange, tube: FloatRange },
}

/// What happens when a viewpoint enters a body's bounding volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactResponse {
    /// Report the hit and bounce the body away
    Deflect,
    /// Report the hit only
    ReportOnly,
}

/// Where a recycled body lands along the depth axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthPlacement {
    /// Always `depth` units down -z from the viewpoint
    Ahead,
    /// Ahead or behind with equal odds
    Either,
}

/// Respawn band relative to the current viewpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespawnPolicy {
    /// Full width of the uniform x/y spread around the viewpoint
    pub spread: f32,
    /// Distance along the depth axis
    pub depth: f32,
    pub placement: DepthPlacement,
}

impl RespawnPolicy {
    /// Farthest a respawned body can land from the viewpoint
    pub fn max_distance(&self) -> f32 {
        let half = self.spread / 2.0;
        (self.depth * self.depth + 2.0 * half * half).sqrt()
    }
}

/// Per-kind spawn, motion and recycle policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    pub shape: BodyShape,
    /// Full width of the initial x/y spread around the origin
    pub spawn_spread: f32,
    /// Initial z range
    pub spawn_depth: FloatRange,
    /// Full width of the uniform spread of each drift component
    pub drift_spread: f32,
    pub pulse_amplitude: f32,
    pub pulse_offset: f32,
    /// Frequency range of the scale pulse
    pub pulse_speed: FloatRange,
    /// Maximum spin rate per axis (radians per unit of elapsed time)
    pub spin: f32,
    pub recycle_distance: f32,
    pub respawn: RespawnPolicy,
    pub contact: ContactResponse,
    pub reroll_drift_on_recycle: bool,
}

impl BodyProfile {
    pub fn asteroid() -> Self {
        Self {
            shape: BodyShape::Sphere {
                radius: ASTEROID_RADIUS,
                size: FloatRange::new(0.5, 3.0),
            },
            spawn_spread: 3000.0,
            spawn_depth: FloatRange::new(-1000.0, 350.0),
            drift_spread: 10.0,
            pulse_amplitude: 1.5,
            pulse_offset: 2.5,
            pulse_speed: FloatRange::new(0.001, 2.0),
            spin: 0.03,
            recycle_distance: BODY_RECYCLE_DISTANCE,
            respawn: RespawnPolicy {
                spread: 1000.0,
                depth: 1300.0,
                placement: DepthPlacement::Either,
            },
            contact: ContactResponse::ReportOnly,
            reroll_drift_on_recycle: false,
        }
    }

    pub fn torus_knot() -> Self {
        Self {
            shape: BodyShape::Knot {
                radius: FloatRange::new(5.0, 20.0),
                tube: FloatRange::new(1.5, 5.0),
            },
            spawn_spread: 2000.0,
            spawn_depth: FloatRange::new(-1000.0, 350.0),
            drift_spread: 10.0,
            pulse_amplitude: 1.5,
            pulse_offset: 3.0,
            pulse_speed: FloatRange::new(0.001, 2.0),
            spin: 0.0,
            recycle_distance: BODY_RECYCLE_DISTANCE,
            respawn: RespawnPolicy {
                spread: 1500.0,
                depth: 1000.0,
                placement: DepthPlacement::Either,
            },
            contact: ContactResponse::Deflect,
            reroll_drift_on_recycle: false,
        }
    }

    fn validate(&self, kind: &str) -> FlybyResult<()> {
        match self.shape {
            BodyShape::Sphere { radius, size } => {
                if !(radius > 0.0) {
                    return Err(FlybyError::config(format!("{kind}: radius must be positive")));
                }
                size.check(&format!("{kind}.size"))?;
                if size.min <= 0.0 {
                    return Err(FlybyError::config(format!("{kind}: size must be positive")));
                }
            }
            BodyShape::Knot { radius, tube } => {
                radius.check(&format!("{kind}.radius"))?;
                tube.check(&format!("{kind}.tube"))?;
                if radius.min <= 0.0 || tube.min < 0.0 {
                    return Err(FlybyError::config(format!("{kind}: knot dimensions must be positive")));
                }
            }
        }
        self.spawn_depth.check(&format!("{kind}.spawn_depth"))?;
        self.pulse_speed.check(&format!("{kind}.pulse_speed"))?;

        for (name, value) in [
            ("spawn_spread", self.spawn_spread),
            ("drift_spread", self.drift_spread),
            ("spin", self.spin),
            ("respawn.spread", self.respawn.spread),
            ("respawn.depth", self.respawn.depth),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FlybyError::config(format!("{kind}.{name} must be finite and >= 0")));
            }
        }

        // Scale must stay positive for the bounding volume to contain the body
        if !(self.pulse_offset - self.pulse_amplitude.abs() > 0.0) {
            return Err(FlybyError::config(format!(
                "{kind}: pulse offset {} must exceed amplitude {}",
                self.pulse_offset, self.pulse_amplitude
            )));
        }

        if !(self.recycle_distance > 0.0) {
            return Err(FlybyError::config(format!("{kind}: recycle distance must be positive")));
        }
        if self.respawn.max_distance() > self.recycle_distance {
            return Err(FlybyError::config(format!(
                "{kind}: respawn band reaches {:.1}, beyond recycle distance {}",
                self.respawn.max_distance(),
                self.recycle_distance
            )));
        }
        Ok(())
    }
}

/// One star field layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarLayer {
    /// Depth offset from the viewpoint when the field is re-centred
    pub offset: f32,
    pub star_count: usize,
}

/// Background star field policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarFieldProfile {
    /// Field `i` uses `layers[i % layers.len()]`
    pub layers: Vec<StarLayer>,
    /// Full width of the local x/y spread
    pub spread: f32,
    /// Local z range
    pub depth: FloatRange,
    pub recycle_distance: f32,
}

impl Default for StarFieldProfile {
    fn default() -> Self {
        Self {
            layers: vec![
                // Behind the camera
                StarLayer { offset: 650.0, star_count: 2000 },
                // In front of the camera
                StarLayer { offset: -650.0, star_count: 2000 },
                // Debris
                StarLayer { offset: 100.0, star_count: 500 },
            ],
            spread: 1000.0,
            depth: FloatRange::new(-1000.0, 350.0),
            recycle_distance: STAR_FIELD_RECYCLE_DISTANCE,
        }
    }
}

impl StarFieldProfile {
    pub fn layer(&self, index: usize) -> StarLayer {
        self.layers[index % self.layers.len()]
    }
}

/// Motion model rate constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConstants {
    pub linear: f32,
    pub precession: f32,
}

impl Default for MotionConstants {
    fn default() -> Self {
        Self {
            linear: K_LINEAR,
            precession: K_PRECESSION,
        }
    }
}

/// Bounce response constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeflectionConstants {
    pub retreat_z: f32,
    pub nudge: f32,
    pub elapsed: f32,
}

impl Default for DeflectionConstants {
    fn default() -> Self {
        Self {
            retreat_z: DEFLECT_RETREAT_Z,
            nudge: DEFLECT_NUDGE,
            elapsed: DEFLECT_ELAPSED,
        }
    }
}

/// Complete pool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// RNG seed (drawn at construction when absent)
    pub seed: Option<u64>,
    pub counts: PopulationCounts,
    pub asteroid: BodyProfile,
    pub torus_knot: BodyProfile,
    pub star_field: StarFieldProfile,
    pub motion: MotionConstants,
    pub deflection: DeflectionConstants,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            seed: None,
            counts: PopulationCounts::default(),
            asteroid: BodyProfile::asteroid(),
            torus_knot: BodyProfile::torus_knot(),
            star_field: StarFieldProfile::default(),
            motion: MotionConstants::default(),
            deflection: DeflectionConstants::default(),
        }
    }
}

impl PoolConfig {
    /// Default configuration with explicit counts and seed
    pub fn with_counts(asteroids: i64, torus_knots: i64, background_fields: i64) -> Self {
        Self {
            counts: PopulationCounts {
                asteroids,
                torus_knots,
                background_fields,
            },
            ..Self::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> FlybyResult<Self> {
        let config: PoolConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the whole configuration, returning the resolved populations
    pub fn validate(&self) -> FlybyResult<Populations> {
        let populations = self.counts.resolve()?;
        self.asteroid.validate("asteroid")?;
        self.torus_knot.validate("torus_knot")?;

        let stars = &self.star_field;
        if populations.background_fields > 0 && stars.layers.is_empty() {
            return Err(FlybyError::config("star_field.layers must not be empty"));
        }
        stars.depth.check("star_field.depth")?;
        if !stars.spread.is_finite() || stars.spread < 0.0 {
            return Err(FlybyError::config("star_field.spread must be finite and >= 0"));
        }
        if !(stars.recycle_distance > 0.0) {
            return Err(FlybyError::config("star_field.recycle_distance must be positive"));
        }
        if stars.layers.iter().any(|l| !l.offset.is_finite()) {
            return Err(FlybyError::config("star_field layer offsets must be finite"));
        }

        if !self.motion.linear.is_finite() || !self.motion.precession.is_finite() {
            return Err(FlybyError::config("motion constants must be finite"));
        }
        let d = &self.deflection;
        if !d.retreat_z.is_finite() || !d.nudge.is_finite() || !d.elapsed.is_finite() {
            return Err(FlybyError::config("deflection constants must be finite"));
        }

        Ok(populations)
    }
}
