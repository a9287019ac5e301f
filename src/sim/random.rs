//! Uniform sampling helpers over the pool's seeded RNG

use glam::{Quat, Vec3};
use rand::Rng;

use crate::config::FloatRange;

/// Uniform in `[-width / 2, width / 2]`
#[inline]
pub fn spread<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * width
}

/// Uniform in `[range.min, range.max]`
#[inline]
pub fn in_range<R: Rng + ?Sized>(rng: &mut R, range: FloatRange) -> f32 {
    range.min + rng.random::<f32>() * (range.max - range.min)
}

/// Fair coin
#[inline]
pub fn coin<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random::<bool>()
}

/// -1.0 or 1.0 with equal odds
#[inline]
pub fn sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if coin(rng) { 1.0 } else { -1.0 }
}

/// Vector with each component spread independently
pub fn spread_vec3<R: Rng + ?Sized>(rng: &mut R, width: f32) -> Vec3 {
    Vec3::new(spread(rng, width), spread(rng, width), spread(rng, width))
}

/// Random orientation from Euler angles in `[0, π)`
pub fn orientation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    use std::f32::consts::PI;
    Quat::from_euler(
        glam::EulerRot::XYZ,
        rng.random::<f32>() * PI,
        rng.random::<f32>() * PI,
        rng.random::<f32>() * PI,
    )
}
