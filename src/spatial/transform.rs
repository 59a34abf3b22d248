//! Rigid transforms and socket snapping

use glam::{Quat, Vec3};
use std::f32::consts::PI;

/// Below this, two unit vectors are treated as exactly opposite
const ANTIPARALLEL_EPSILON: f32 = 1e-6;

/// Rotation followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    /// Map a point from local space into this transform's space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// Map a direction from local space (translation ignored)
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Compute the module transform that joins a local socket to a world socket.
    ///
    /// The returned transform rotates the module so the local socket faces
    /// opposite to `target_facing`, then translates it so the socket lands
    /// exactly on `target_position`.
    pub fn snap(
        local_position: Vec3,
        local_facing: Vec3,
        target_position: Vec3,
        target_facing: Vec3,
    ) -> Self {
        let rotation = facing_rotation(local_facing, -target_facing);
        let translation = target_position - rotation * local_position;
        Self {
            translation,
            rotation,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Shortest rotation taking direction `from` onto direction `to`.
///
/// For opposite directions the half turn is taken around the world up axis
/// when possible, so horizontal sockets never flip a module upside down.
pub fn facing_rotation(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    if from.dot(to) < -1.0 + ANTIPARALLEL_EPSILON {
        let up = Vec3::Y - from * from.dot(Vec3::Y);
        let axis = if up.length_squared() > ANTIPARALLEL_EPSILON {
            up.normalize()
        } else {
            from.any_orthonormal_vector()
        };
        return Quat::from_axis_angle(axis, PI);
    }

    Quat::from_rotation_arc(from, to)
}
