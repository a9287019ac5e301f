//! Motion models for pooled bodies
//!
//! Each body is assigned one model at spawn and consults it every tick.
//! Rotations pass through the world origin, not the body's own centre.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::random::coin;
use crate::config::MotionConstants;

/// Per-body kinematics strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionModel {
    /// Translate along the drift vector
    Linear,
    /// Precess about the rotation axis through the origin
    Parabolic,
    /// Translate along the drift vector while precessing about it
    Corkscrew,
}

impl MotionModel {
    /// Two fair coin flips: half Linear, a quarter each of the others
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if !coin(rng) {
            return MotionModel::Linear;
        }
        if coin(rng) {
            MotionModel::Corkscrew
        } else {
            MotionModel::Parabolic
        }
    }

    /// Position after `elapsed` units of motion
    pub fn advance(
        self,
        position: Vec3,
        drift: Vec3,
        rotation_axis: Vec3,
        elapsed: f32,
        k: &MotionConstants,
    ) -> Vec3 {
        match self {
            MotionModel::Linear => position + drift * (elapsed * k.linear),
            MotionModel::Parabolic => {
                rotate_about_axis(position, rotation_axis, elapsed * k.precession)
            }
            MotionModel::Corkscrew => {
                let moved = position + drift * elapsed;
                rotate_about_axis(moved, drift, elapsed * k.precession)
            }
        }
    }
}

/// Rotate `point` about `axis` (through the origin); a zero axis leaves it alone
#[inline]
pub fn rotate_about_axis(point: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    match axis.try_normalize() {
        Some(axis) => Quat::from_axis_angle(axis, angle) * point,
        None => point,
    }
}
