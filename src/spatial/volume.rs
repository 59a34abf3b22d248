//! Collision volumes: authored boxes, their world-space form and bounds

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::transform::Transform;

/// Role of a volume in collision queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeKind {
    /// Blocks other modules
    #[default]
    Solid,
    /// Gameplay trigger, ignored by placement
    Trigger,
    /// Marks a socket opening, ignored by placement
    SocketMarker,
}

impl VolumeKind {
    pub fn is_solid(&self) -> bool {
        matches!(self, VolumeKind::Solid)
    }
}

/// A box volume in module-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxVolume {
    pub kind: VolumeKind,
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl BoxVolume {
    pub fn solid(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            kind: VolumeKind::Solid,
            center,
            half_extents,
            rotation: Quat::IDENTITY,
        }
    }

    /// Place this volume in the world under a module transform
    pub fn to_world(&self, transform: &Transform) -> OrientedBox {
        let rotation = transform.rotation * self.rotation;
        OrientedBox {
            center: transform.transform_point(self.center),
            half_extents: self.half_extents,
            axes: [rotation * Vec3::X, rotation * Vec3::Y, rotation * Vec3::Z],
        }
    }
}

/// A box in world space, described by its center, half extents and unit axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub axes: [Vec3; 3],
}

impl OrientedBox {
    /// Axis-aligned box with no rotation
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            axes: [Vec3::X, Vec3::Y, Vec3::Z],
        }
    }

    /// Half length of this box's shadow on a unit axis
    #[inline]
    pub fn projected_radius(&self, axis: Vec3) -> f32 {
        self.half_extents.x * self.axes[0].dot(axis).abs()
            + self.half_extents.y * self.axes[1].dot(axis).abs()
            + self.half_extents.z * self.axes[2].dot(axis).abs()
    }

    /// Tight world-space bounds
    pub fn aabb(&self) -> Aabb {
        let reach = Vec3::new(
            self.projected_radius(Vec3::X),
            self.projected_radius(Vec3::Y),
            self.projected_radius(Vec3::Z),
        );
        Aabb {
            min: self.center - reach,
            max: self.center + reach,
        }
    }
}

/// Axis-aligned bounding box used for the broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box covering nothing; merging anything into it yields that thing
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// True when the boxes overlap or touch
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }
}
