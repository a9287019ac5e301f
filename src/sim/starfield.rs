//! Background star fields
//!
//! A field is a fixed cloud of points that moves as one rigid block. Only the
//! origin changes after construction, so the point buffer can be uploaded
//! once and never touched again.

use glam::Vec3;
use rand::Rng;

use super::random::{in_range, spread};
use crate::config::{StarFieldProfile, StarLayer};

/// Stable identity of a star field slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldHandle(pub(crate) u32);

impl FieldHandle {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct StarField {
    pub handle: FieldHandle,
    points: Box<[Vec3]>,
    origin: Vec3,
    /// Depth offset from the viewpoint used on recycle
    pub recycle_offset: f32,
}

impl StarField {
    pub fn new<R: Rng + ?Sized>(
        handle: FieldHandle,
        layer: StarLayer,
        profile: &StarFieldProfile,
        rng: &mut R,
    ) -> Self {
        let points = (0..layer.star_count)
            .map(|_| {
                Vec3::new(
                    spread(rng, profile.spread),
                    spread(rng, profile.spread),
                    in_range(rng, profile.depth),
                )
            })
            .collect();
        Self {
            handle,
            points,
            origin: Vec3::ZERO,
            recycle_offset: layer.offset,
        }
    }

    /// Local-space points
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.origin.distance(point)
    }

    /// Re-centre the whole field on the viewpoint, shifted along depth
    pub fn recycle(&mut self, viewpoint: Vec3) {
        self.origin = Vec3::new(viewpoint.x, viewpoint.y, viewpoint.z - self.recycle_offset);
    }

    /// World-space position of one star
    pub fn world_point(&self, i: usize) -> Option<Vec3> {
        self.points.get(i).map(|p| *p + self.origin)
    }
}
