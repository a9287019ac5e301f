//! Per-tick collision report and viewpoint validation

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::BodyHandle;
use crate::error::{FlybyError, FlybyResult};

/// A viewpoint found inside a body's bounding volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub body: BodyHandle,
    /// Index into the tick's viewpoint slice
    pub viewpoint: usize,
}

/// Result of one tick; replaced every tick, never accumulated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionReport {
    pub hits: Vec<Hit>,
    /// Viewpoints skipped because their coordinates were not finite
    pub invalid_viewpoints: Vec<usize>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn hits_for_viewpoint(&self, viewpoint: usize) -> impl Iterator<Item = &Hit> {
        self.hits.iter().filter(move |h| h.viewpoint == viewpoint)
    }
}

/// Reject viewpoints with NaN or infinite coordinates
pub fn validate_viewpoint(index: usize, position: Vec3) -> FlybyResult<Vec3> {
    if crate::is_finite_vec3(position) {
        Ok(position)
    } else {
        Err(FlybyError::InvalidInput { index, position })
    }
}
