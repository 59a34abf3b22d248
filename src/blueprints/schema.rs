//! Zone blueprint types.
//!
//! A blueprint is the immutable description of a placeable dungeon segment:
//! its attachment sockets and its collision volumes, all in module-local
//! space. Placed copies live in [`crate::world::ZoneModule`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::spatial::BoxVolume;

/// Broad role of a zone in the dungeon graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    #[default]
    Room,
    Corridor,
    Junction,
    /// Dead end (one socket); closes a branch of the graph
    Terminal,
}

impl ZoneKind {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ZoneKind::Terminal)
    }
}

/// An attachment point in module-local space
#[derive(Debug, Clone, PartialEq)]
pub struct SocketDef {
    pub name: String,
    pub position: Vec3,
    /// Unit vector pointing out of the module through the opening
    pub facing: Vec3,
}

impl SocketDef {
    pub fn new(name: impl Into<String>, position: Vec3, facing: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            facing: facing.normalize_or_zero(),
        }
    }
}

/// Complete zone blueprint
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBlueprint {
    /// Unique string identifier
    pub name: String,
    pub kind: ZoneKind,
    /// Sockets in authored order
    pub sockets: Vec<SocketDef>,
    /// Collision volumes; only solid ones block placement
    pub volumes: Vec<BoxVolume>,
}

impl ZoneBlueprint {
    pub fn new(name: impl Into<String>, kind: ZoneKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sockets: Vec::new(),
            volumes: Vec::new(),
        }
    }

    /// Builder helper: add a socket
    pub fn with_socket(mut self, name: impl Into<String>, position: Vec3, facing: Vec3) -> Self {
        self.sockets.push(SocketDef::new(name, position, facing));
        self
    }

    /// Builder helper: add a volume
    pub fn with_volume(mut self, volume: BoxVolume) -> Self {
        self.volumes.push(volume);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Check authoring mistakes that would break placement
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("zone name is empty".to_string());
        }

        for socket in &self.sockets {
            if socket.facing == Vec3::ZERO {
                errors.push(format!(
                    "{}: socket '{}' has a zero facing direction",
                    self.name, socket.name
                ));
            }
            if !socket.position.is_finite() {
                errors.push(format!(
                    "{}: socket '{}' has a non-finite position",
                    self.name, socket.name
                ));
            }
        }

        for (i, volume) in self.volumes.iter().enumerate() {
            if volume.half_extents.min_element() <= 0.0 {
                errors.push(format!(
                    "{}: volume {} has non-positive half extents {:?}",
                    self.name, i, volume.half_extents
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_facing_is_normalized() {
        let socket = SocketDef::new("east", Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(socket.facing, Vec3::X);
    }

    #[test]
    fn test_validate_flags_bad_geometry() {
        let blueprint = ZoneBlueprint::new("broken", ZoneKind::Room)
            .with_socket("nowhere", Vec3::ZERO, Vec3::ZERO)
            .with_volume(BoxVolume::solid(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)));

        let errors = blueprint.validate();
        assert_eq!(errors.len(), 2);
    }
}
