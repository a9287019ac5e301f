//! Auto-forward flyby camera
//!
//! Supplies the viewpoints the pool is ticked against: the main camera and,
//! when enabled, a rear-view mirror camera sharing its position.

use glam::Vec3;

use crate::consts::*;

#[derive(Debug, Clone)]
pub struct FlybyCamera {
    pub position: Vec3,
    /// Unit heading
    pub forward: Vec3,
    pub speed: f32,
    pub rear_view: bool,
    eyes: [Vec3; 2],
}

impl Default for FlybyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, CAMERA_START_Z))
    }
}

impl FlybyCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::NEG_Z,
            speed: CAMERA_SPEED,
            rear_view: false,
            eyes: [position; 2],
        }
    }

    pub fn with_rear_view(mut self, enabled: bool) -> Self {
        self.rear_view = enabled;
        self
    }

    pub fn accelerate(&mut self) {
        self.speed += CAMERA_SPEED_STEP;
    }

    pub fn decelerate(&mut self) {
        self.speed = (self.speed - CAMERA_SPEED_STEP).max(0.0);
    }

    /// Advance by one rendered frame of `frame_seconds` real time
    ///
    /// Returns the scaled delta the pool should be ticked with.
    pub fn frame(&mut self, frame_seconds: f32) -> f32 {
        let delta = frame_seconds * FRAME_DELTA_SCALE;
        let step = delta * CONTROLS_DELTA_SCALE * self.speed * CAMERA_DAMPING;
        self.position += self.forward.normalize_or_zero() * step;
        self.eyes = [self.position; 2];
        delta
    }

    /// Viewpoints for this frame (main camera first)
    pub fn viewpoints(&self) -> &[Vec3] {
        if self.rear_view {
            &self.eyes[..]
        } else {
            &self.eyes[..1]
        }
    }
}
