//! Collision checks between a snapped candidate and the placed layout

use crate::core::config::GenerationConfig;
use crate::spatial::{penetration, Aabb, OrientedBox};
use crate::world::DungeonLayout;

/// Answers whether a candidate's solid volumes interpenetrate placed geometry.
///
/// The candidate is never part of `placed`, so its own volumes are excluded.
pub trait CollisionOracle {
    fn overlaps(&self, candidate: &[OrientedBox], placed: &DungeonLayout) -> bool;
}

/// Broad phase on bounding boxes, then exact penetration depth per pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenetrationOracle {
    tolerance: f32,
}

impl PenetrationOracle {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.penetration_tolerance)
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// True when the boxes overlap deeper than the tolerance
    pub fn collides(&self, a: &OrientedBox, b: &OrientedBox) -> bool {
        if !a.aabb().intersects(&b.aabb()) {
            return false;
        }
        penetration(a, b)
            .is_some_and(|hit| hit.depth > self.tolerance)
    }
}

impl Default for PenetrationOracle {
    fn default() -> Self {
        Self::from_config(crate::core::config())
    }
}

impl CollisionOracle for PenetrationOracle {
    fn overlaps(&self, candidate: &[OrientedBox], placed: &DungeonLayout) -> bool {
        let bounds = candidate
            .iter()
            .fold(Aabb::EMPTY, |acc, volume| acc.merge(&volume.aabb()));
        if bounds.is_empty() {
            return false;
        }

        placed
            .modules()
            .iter()
            .filter(|module| module.bounds().intersects(&bounds))
            .flat_map(|module| module.solids())
            .any(|solid| candidate.iter().any(|volume| self.collides(volume, solid)))
    }
}
