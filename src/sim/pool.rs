//! Object pool: owner of every star field and moving body
//!
//! The pool is built once with fixed population sizes and then driven by a
//! single `tick` per rendered frame. Nothing is allocated or freed while
//! ticking; spent bodies are recycled in place.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{BodyHandle, BodyKind, BodyTuning, Geometry, MotionBody};
use super::clock::{Clock, SystemClock};
use super::collision::{CollisionReport, Hit, validate_viewpoint};
use super::motion::MotionModel;
use super::starfield::{FieldHandle, StarField};
use crate::config::{BodyProfile, ContactResponse, PoolConfig};
use crate::error::FlybyResult;
use crate::is_finite_vec3;

/// Something the renderer can draw, published once at construction
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    Body {
        handle: BodyHandle,
        geometry: Geometry,
    },
    StarField {
        handle: FieldHandle,
        point_count: usize,
    },
}

/// Registry the pool publishes its renderables to
pub trait SceneSink {
    fn publish(&mut self, renderable: Renderable);
}

impl SceneSink for Vec<Renderable> {
    fn publish(&mut self, renderable: Renderable) {
        self.push(renderable);
    }
}

/// Discards everything (headless runs)
impl SceneSink for () {
    fn publish(&mut self, _renderable: Renderable) {}
}

/// Running totals and population breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub asteroids: usize,
    pub torus_knots: usize,
    pub background_fields: usize,
    pub linear: usize,
    pub parabolic: usize,
    pub corkscrew: usize,
    pub ticks: u64,
    pub body_recycles: u64,
    pub field_recycles: u64,
    pub hits: u64,
    pub deflections: u64,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: u64,
    body_recycles: u64,
    field_recycles: u64,
    hits: u64,
    deflections: u64,
}

pub struct ObjectPool {
    config: PoolConfig,
    seed: u64,
    rng: Pcg32,
    clock: Box<dyn Clock>,
    star_fields: Vec<StarField>,
    asteroids: Vec<MotionBody>,
    torus_knots: Vec<MotionBody>,
    counters: Counters,
}

impl std::fmt::Debug for ObjectPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("seed", &self.seed)
            .field("star_fields", &self.star_fields.len())
            .field("asteroids", &self.asteroids.len())
            .field("torus_knots", &self.torus_knots.len())
            .finish()
    }
}

impl ObjectPool {
    /// Build a pool driven by real wall-clock time
    pub fn new(config: PoolConfig, sink: &mut impl SceneSink) -> FlybyResult<Self> {
        Self::with_clock(config, sink, Box::new(SystemClock))
    }

    /// Build a pool with an explicit time source
    ///
    /// Validation happens before anything is spawned or published, so a bad
    /// configuration never leaves a partial pool behind.
    pub fn with_clock(
        config: PoolConfig,
        sink: &mut impl SceneSink,
        clock: Box<dyn Clock>,
    ) -> FlybyResult<Self> {
        let populations = config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);

        let star_fields: Vec<StarField> = (0..populations.background_fields)
            .map(|i| {
                let layer = config.star_field.layer(i);
                StarField::new(FieldHandle(i as u32), layer, &config.star_field, &mut rng)
            })
            .collect();
        for field in &star_fields {
            sink.publish(Renderable::StarField {
                handle: field.handle,
                point_count: field.points().len(),
            });
        }

        let asteroids = spawn_population(
            BodyKind::Asteroid,
            populations.asteroids,
            &config,
            &config.asteroid,
            &mut rng,
            sink,
        );
        let torus_knots = spawn_population(
            BodyKind::TorusKnot,
            populations.torus_knots,
            &config,
            &config.torus_knot,
            &mut rng,
            sink,
        );

        log::info!(
            "Object pool ready (seed {}): {} star fields, {} asteroids, {} torus knots",
            seed,
            star_fields.len(),
            asteroids.len(),
            torus_knots.len()
        );

        Ok(Self {
            config,
            seed,
            rng,
            clock,
            star_fields,
            asteroids,
            torus_knots,
            counters: Counters::default(),
        })
    }

    /// Advance every body by `elapsed` and test it against `viewpoints`
    ///
    /// Star fields and bodies recycle against the first finite viewpoint;
    /// containment is tested against every finite viewpoint. Non-finite
    /// viewpoints are skipped and listed in the report.
    pub fn tick(&mut self, elapsed: f32, viewpoints: &[Vec3]) -> CollisionReport {
        let mut report = CollisionReport::default();
        let elapsed = if elapsed.is_finite() {
            elapsed
        } else {
            log::warn!("Ignoring non-finite elapsed time {elapsed}");
            0.0
        };
        let wall_clock = self.clock.now_seconds();

        for (i, &v) in viewpoints.iter().enumerate() {
            if let Err(e) = validate_viewpoint(i, v) {
                log::warn!("{e}; skipping it this tick");
                report.invalid_viewpoints.push(i);
            }
        }
        let primary = viewpoints.iter().copied().find(|v| is_finite_vec3(*v));

        if let Some(primary) = primary {
            let threshold = self.config.star_field.recycle_distance;
            for field in &mut self.star_fields {
                if !(field.distance_to(primary) <= threshold) {
                    field.recycle(primary);
                    self.counters.field_recycles += 1;
                }
            }
        }

        let mut sweep = Sweep {
            rng: &mut self.rng,
            counters: &mut self.counters,
            report: &mut report,
            elapsed,
            wall_clock,
            primary,
            viewpoints,
        };
        sweep.run(&mut self.asteroids, &self.config.asteroid);
        sweep.run(&mut self.torus_knots, &self.config.torus_knot);

        self.counters.ticks += 1;
        if !report.is_empty() {
            log::debug!("Tick {}: {} hits", self.counters.ticks, report.len());
        }
        report
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn asteroids(&self) -> &[MotionBody] {
        &self.asteroids
    }

    pub fn torus_knots(&self) -> &[MotionBody] {
        &self.torus_knots
    }

    pub fn star_fields(&self) -> &[StarField] {
        &self.star_fields
    }

    /// All bodies, asteroids first
    pub fn bodies(&self) -> impl Iterator<Item = &MotionBody> {
        self.asteroids.iter().chain(self.torus_knots.iter())
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&MotionBody> {
        match handle.kind() {
            BodyKind::Asteroid => self.asteroids.get(handle.index()),
            BodyKind::TorusKnot => self.torus_knots.get(handle.index()),
        }
    }

    /// Mutable access to a body; its bounds refresh on the next tick
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut MotionBody> {
        match handle.kind() {
            BodyKind::Asteroid => self.asteroids.get_mut(handle.index()),
            BodyKind::TorusKnot => self.torus_knots.get_mut(handle.index()),
        }
    }

    pub fn stats(&self) -> PoolStats {
        let mut stats = PoolStats {
            asteroids: self.asteroids.len(),
            torus_knots: self.torus_knots.len(),
            background_fields: self.star_fields.len(),
            ticks: self.counters.ticks,
            body_recycles: self.counters.body_recycles,
            field_recycles: self.counters.field_recycles,
            hits: self.counters.hits,
            deflections: self.counters.deflections,
            ..Default::default()
        };
        for body in self.bodies() {
            match body.motion {
                MotionModel::Linear => stats.linear += 1,
                MotionModel::Parabolic => stats.parabolic += 1,
                MotionModel::Corkscrew => stats.corkscrew += 1,
            }
        }
        stats
    }
}

fn spawn_population(
    kind: BodyKind,
    count: usize,
    config: &PoolConfig,
    profile: &BodyProfile,
    rng: &mut Pcg32,
    sink: &mut impl SceneSink,
) -> Vec<MotionBody> {
    let tuning = BodyTuning {
        motion: config.motion,
        deflection: config.deflection,
        pulse_amplitude: profile.pulse_amplitude,
        pulse_offset: profile.pulse_offset,
        contact: profile.contact,
    };
    let mut bodies = Vec::with_capacity(count);
    for i in 0..count {
        let body = MotionBody::spawn(BodyHandle::new(kind, i as u32), profile, tuning, rng);
        sink.publish(Renderable::Body {
            handle: body.handle,
            geometry: body.geometry,
        });
        bodies.push(body);
    }
    bodies
}

/// Shared state for one pass over a body population
struct Sweep<'a> {
    rng: &'a mut Pcg32,
    counters: &'a mut Counters,
    report: &'a mut CollisionReport,
    elapsed: f32,
    wall_clock: f64,
    primary: Option<Vec3>,
    viewpoints: &'a [Vec3],
}

impl Sweep<'_> {
    /// update, recycle, then containment, as one unit per body
    fn run(&mut self, bodies: &mut [MotionBody], profile: &BodyProfile) {
        for body in bodies.iter_mut() {
            body.update(self.elapsed, self.wall_clock);

            // A non-finite position compares false and is recycled too
            if let Some(primary) = self.primary
                && !(body.distance_to(primary) <= profile.recycle_distance)
            {
                body.recycle(primary, profile, &mut *self.rng);
                self.counters.body_recycles += 1;
                log::trace!("Recycled {:?}", body.handle);
            }

            for (i, &v) in self.viewpoints.iter().enumerate() {
                if !is_finite_vec3(v) {
                    continue;
                }
                if body.intersects_position(v) {
                    self.report.hits.push(Hit {
                        body: body.handle,
                        viewpoint: i,
                    });
                    self.counters.hits += 1;
                    if profile.contact == ContactResponse::Deflect {
                        self.counters.deflections += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StarLayer;
    use crate::error::FlybyError;
    use crate::sim::clock::ManualClock;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn small_config(asteroids: i64, torus_knots: i64, fields: i64, seed: u64) -> PoolConfig {
        let mut config = PoolConfig::with_counts(asteroids, torus_knots, fields).seeded(seed);
        for layer in &mut config.star_field.layers {
            layer.star_count = 16;
        }
        config
    }

    fn pool(config: PoolConfig) -> (ObjectPool, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(100.0));
        let pool = ObjectPool::with_clock(config, &mut (), Box::new(clock.clone())).unwrap();
        (pool, clock)
    }

    #[test]
    fn test_construction_publishes_every_renderable() {
        let mut sink: Vec<Renderable> = Vec::new();
        let pool = ObjectPool::new(small_config(5, 3, 2, 1), &mut sink).unwrap();
        assert_eq!(sink.len(), 10);
        assert_eq!(pool.asteroids().len(), 5);
        assert_eq!(pool.torus_knots().len(), 3);
        assert_eq!(pool.star_fields().len(), 2);
        assert!(matches!(sink[0], Renderable::StarField { point_count: 16, .. }));
        assert!(matches!(
            sink[9],
            Renderable::Body { geometry: Geometry::TorusKnot { .. }, .. }
        ));
    }

    #[test]
    fn test_negative_count_builds_nothing() {
        let mut sink: Vec<Renderable> = Vec::new();
        let result = ObjectPool::new(small_config(-3, 2, 1, 1), &mut sink);
        assert!(matches!(result, Err(FlybyError::InvalidConfiguration(_))));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_linear_asteroid_scenario() {
        let (mut pool, _clock) = pool(small_config(1, 0, 0, 7));
        let handle = pool.asteroids()[0].handle;
        {
            let body = pool.body_mut(handle).unwrap();
            body.motion = MotionModel::Linear;
            body.drift = Vec3::X;
            body.position = Vec3::ZERO;
        }
        let viewpoint = [Vec3::new(1000.0, 0.0, 0.0)];

        let report = pool.tick(1.0, &viewpoint);
        assert!(report.is_empty());
        let body = pool.body(handle).unwrap();
        assert!((body.position.x - crate::consts::K_LINEAR).abs() < 1e-5);
        assert_eq!(body.position.y, 0.0);

        pool.body_mut(handle).unwrap().position = Vec3::new(-5000.0, 0.0, 0.0);
        pool.tick(1.0, &viewpoint);
        let body = pool.body(handle).unwrap();
        assert!(body.distance_to(viewpoint[0]) <= pool.config().asteroid.recycle_distance);
        assert_eq!(pool.stats().body_recycles, 1);
    }

    #[test]
    fn test_torus_knot_contact_scenario() {
        let (mut pool, _clock) = pool(small_config(0, 1, 0, 8));
        let handle = pool.torus_knots()[0].handle;
        {
            let body = pool.body_mut(handle).unwrap();
            body.motion = MotionModel::Linear;
            body.drift = Vec3::ZERO;
            body.position = Vec3::ZERO;
        }

        let report = pool.tick(0.016, &[Vec3::ZERO]);
        assert_eq!(report.hits, vec![Hit { body: handle, viewpoint: 0 }]);
        let body = pool.body(handle).unwrap();
        assert_eq!(body.drift.z, -10.0);
        assert_eq!(body.motion, MotionModel::Linear);
        assert_eq!(pool.stats().deflections, 1);
    }

    #[test]
    fn test_asteroid_contact_is_report_only() {
        let (mut pool, _clock) = pool(small_config(1, 0, 0, 9));
        let handle = pool.asteroids()[0].handle;
        {
            let body = pool.body_mut(handle).unwrap();
            body.motion = MotionModel::Linear;
            body.drift = Vec3::ZERO;
            body.position = Vec3::ZERO;
        }
        let viewpoints = [Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)];
        let report = pool.tick(0.016, &viewpoints);
        assert_eq!(report.len(), 2);
        assert_eq!(report.hits_for_viewpoint(1).count(), 1);
        assert_eq!(pool.body(handle).unwrap().position, Vec3::ZERO);
        assert_eq!(pool.stats().deflections, 0);
    }

    #[test]
    fn test_invalid_viewpoint_is_isolated() {
        let (mut pool, _clock) = pool(small_config(1, 0, 1, 10));
        let handle = pool.asteroids()[0].handle;
        {
            let body = pool.body_mut(handle).unwrap();
            body.motion = MotionModel::Linear;
            body.drift = Vec3::ZERO;
            body.position = Vec3::new(0.0, 0.0, -20.0);
        }
        let viewpoints = [Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(0.0, 0.0, -20.0)];
        let report = pool.tick(0.016, &viewpoints);

        assert_eq!(report.invalid_viewpoints, vec![0]);
        assert_eq!(report.hits, vec![Hit { body: handle, viewpoint: 1 }]);
        assert!(is_finite_vec3(pool.body(handle).unwrap().position));
    }

    #[test]
    fn test_recycles_against_first_finite_viewpoint() {
        let mut config = small_config(1, 0, 1, 14);
        config.star_field.layers = vec![StarLayer { offset: 100.0, star_count: 8 }];
        let (mut pool, _clock) = pool(config);
        let handle = pool.asteroids()[0].handle;
        {
            let body = pool.body_mut(handle).unwrap();
            body.motion = MotionModel::Linear;
            body.drift = Vec3::ZERO;
            body.position = Vec3::new(0.0, 0.0, -9000.0);
        }
        let valid = Vec3::new(0.0, 0.0, -5000.0);
        let viewpoints = [Vec3::new(f32::INFINITY, 0.0, 0.0), valid];
        let report = pool.tick(0.016, &viewpoints);

        assert_eq!(report.invalid_viewpoints, vec![0]);
        let body = pool.body(handle).unwrap();
        assert!(body.distance_to(valid) <= pool.config().asteroid.recycle_distance);
        assert_eq!(pool.star_fields()[0].origin(), Vec3::new(0.0, 0.0, -5100.0));
        let stats = pool.stats();
        assert_eq!(stats.body_recycles, 1);
        assert_eq!(stats.field_recycles, 1);
    }

    #[test]
    fn test_non_finite_position_is_recycled() {
        let (mut pool, clock) = pool(small_config(0, 1, 0, 15));
        let handle = pool.torus_knots()[0].handle;
        {
            let body = pool.body_mut(handle).unwrap();
            body.motion = MotionModel::Corkscrew;
            body.drift = Vec3::new(4.0, 3.0, 2.0);
            body.position = Vec3::new(0.0, 0.0, -500.0);
        }
        let viewpoint = [Vec3::ZERO];

        // A huge but finite delta overflows the corkscrew translation
        pool.tick(1e38, &viewpoint);
        for _ in 0..5 {
            clock.advance(0.016);
            pool.tick(0.016, &viewpoint);
            let body = pool.body(handle).unwrap();
            assert!(is_finite_vec3(body.position), "{:?}", body.position);
            assert!(body.bounds().contains(body.position));
            assert!(body.distance_to(viewpoint[0]) <= 2000.0);
        }
        assert!(pool.stats().body_recycles >= 1);
    }

    #[test]
    fn test_nan_position_is_recycled_same_tick() {
        let (mut pool, _clock) = pool(small_config(1, 0, 0, 16));
        let handle = pool.asteroids()[0].handle;
        pool.body_mut(handle).unwrap().position = Vec3::splat(f32::NAN);

        pool.tick(0.016, &[Vec3::ZERO]);
        let body = pool.body(handle).unwrap();
        assert!(is_finite_vec3(body.position));
        assert!(body.bounds().contains(body.position));
        assert_eq!(pool.stats().body_recycles, 1);
    }

    #[test]
    fn test_star_field_recycles_as_block() {
        let mut config = small_config(0, 0, 1, 11);
        config.star_field.layers = vec![StarLayer { offset: 100.0, star_count: 8 }];
        let (mut pool, _clock) = pool(config);
        let points = pool.star_fields()[0].points().to_vec();

        let camera = Vec3::new(0.0, 0.0, -1000.0);
        pool.tick(0.016, &[camera]);
        let field = &pool.star_fields()[0];
        assert_eq!(field.origin(), Vec3::new(0.0, 0.0, -1100.0));
        assert_eq!(field.points(), &points[..]);

        // Within range: stays put
        pool.tick(0.016, &[Vec3::new(0.0, 0.0, -1200.0)]);
        assert_eq!(pool.star_fields()[0].origin(), Vec3::new(0.0, 0.0, -1100.0));
        assert_eq!(pool.stats().field_recycles, 1);
    }

    #[test]
    fn test_pulse_follows_clock() {
        let (mut pool, clock) = pool(small_config(1, 0, 0, 12));
        pool.tick(0.0, &[Vec3::ZERO]);
        let first = pool.asteroids()[0].scale;
        clock.advance(0.75);
        pool.tick(0.0, &[Vec3::ZERO]);
        let body = &pool.asteroids()[0];
        let expected = ((100.75f64 * body.pulse_speed as f64).sin() as f32) * 1.5 + 2.5;
        assert!((body.scale - expected).abs() < 1e-4);
        assert_ne!(first, body.scale);
    }

    #[test]
    fn test_stats_motion_breakdown_sums() {
        let (pool, _clock) = pool(small_config(30, 20, 0, 13));
        let stats = pool.stats();
        assert_eq!(stats.linear + stats.parabolic + stats.corkscrew, 50);
    }

    fn trace(seed: u64, frames: usize) -> Vec<Vec3> {
        let (mut pool, clock) = pool(small_config(8, 8, 3, seed));
        let mut camera = Vec3::new(0.0, 0.0, 500.0);
        for _ in 0..frames {
            camera.z -= 40.0;
            clock.advance(1.0 / 60.0);
            pool.tick(0.16, &[camera, camera]);
        }
        pool.bodies()
            .map(|b| b.position)
            .chain(pool.star_fields().iter().map(|f| f.origin()))
            .collect()
    }

    #[test]
    fn test_determinism() {
        assert_eq!(trace(99999, 120), trace(99999, 120));
        assert_ne!(trace(1, 10), trace(2, 10));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_population_is_fixed(
            seed in any::<u64>(),
            frames in 1usize..40,
            dt in 0.0f32..2.0,
            step in -200.0f32..200.0,
        ) {
            let (mut pool, clock) = pool(small_config(6, 4, 3, seed));
            let mut camera = Vec3::ZERO;
            for _ in 0..frames {
                camera.z += step;
                clock.advance(0.016);
                pool.tick(dt, &[camera]);
                prop_assert_eq!(pool.asteroids().len(), 6);
                prop_assert_eq!(pool.torus_knots().len(), 4);
                prop_assert_eq!(pool.star_fields().len(), 3);
            }
        }

        #[test]
        fn prop_far_bodies_come_back_in_range(
            seed in any::<u64>(),
            x in -8000.0f32..8000.0,
            z in -8000.0f32..8000.0,
            dt in 0.0f32..1.0,
        ) {
            let (mut pool, _clock) = pool(small_config(10, 10, 0, seed));
            let viewpoint = Vec3::new(x, 0.0, z);
            let far: Vec<BodyHandle> = pool
                .bodies()
                .filter(|b| b.distance_to(viewpoint) > pool.config().asteroid.recycle_distance)
                .map(|b| b.handle)
                .collect();

            pool.tick(dt, &[viewpoint]);
            for handle in far {
                let body = pool.body(handle).unwrap();
                prop_assert!(body.distance_to(viewpoint) <= 2000.0);
            }
        }

        #[test]
        fn prop_bounds_contain_position(
            seed in any::<u64>(),
            frames in 1usize..30,
            dt in 0.0f32..5.0,
        ) {
            let (mut pool, clock) = pool(small_config(6, 6, 0, seed));
            for i in 0..frames {
                clock.advance(0.05);
                pool.tick(dt, &[Vec3::new(0.0, 0.0, -(i as f32) * 30.0)]);
                for body in pool.bodies() {
                    prop_assert!(body.bounds().contains(body.position));
                    prop_assert!(is_finite_vec3(body.position));
                }
            }
        }
    }
}
