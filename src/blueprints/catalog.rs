//! Zone catalog for loading and looking up zone blueprints.
//!
//! This module provides the `ZoneCatalog`, the immutable list of candidate
//! blueprints a generation run draws from. Catalogs are built in code or
//! loaded from TOML files containing `[[zones]]` tables.

use ahash::AHashMap;
use glam::{Quat, Vec3};
use serde::Deserialize;
use std::path::Path;

use super::schema::{SocketDef, ZoneBlueprint, ZoneKind};
use crate::core::error::{ForgeError, Result};
use crate::core::types::BlueprintIndex;
use crate::spatial::{BoxVolume, VolumeKind};

/// Ordered list of zone blueprints
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    blueprints: Vec<ZoneBlueprint>,
    /// Map from name to index for fast lookup
    by_name: AHashMap<String, BlueprintIndex>,
}

impl ZoneCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from blueprints, rejecting invalid or duplicate ones
    pub fn from_blueprints(blueprints: impl IntoIterator<Item = ZoneBlueprint>) -> Result<Self> {
        let mut catalog = Self::new();
        for blueprint in blueprints {
            catalog.register(blueprint)?;
        }
        Ok(catalog)
    }

    /// Register a blueprint and return its index
    pub fn register(&mut self, blueprint: ZoneBlueprint) -> Result<BlueprintIndex> {
        let errors = blueprint.validate();
        if !errors.is_empty() {
            return Err(ForgeError::InvalidBlueprint(errors.join(", ")));
        }
        if self.by_name.contains_key(&blueprint.name) {
            return Err(ForgeError::InvalidBlueprint(format!(
                "duplicate zone name '{}'",
                blueprint.name
            )));
        }
        if blueprint.sockets.is_empty() {
            // Still allowed: the planner reports it if the zone is ever drawn
            tracing::warn!("Zone '{}' has no sockets", blueprint.name);
        }

        let index = BlueprintIndex(self.blueprints.len());
        self.by_name.insert(blueprint.name.clone(), index);
        self.blueprints.push(blueprint);
        Ok(index)
    }

    /// Load zones from a TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<BlueprintIndex>> {
        let content = std::fs::read_to_string(path)?;
        let indices = self.parse_into(&content)?;
        tracing::debug!("Loaded {} zones from {}", indices.len(), path.display());
        Ok(indices)
    }

    /// Load all .toml files from a directory recursively, in file name order
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<BlueprintIndex>> {
        let mut indices = Vec::new();
        self.load_directory_recursive(path, &mut indices)?;
        Ok(indices)
    }

    fn load_directory_recursive(
        &mut self,
        path: &Path,
        indices: &mut Vec<BlueprintIndex>,
    ) -> Result<()> {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for entry_path in entries {
            if entry_path.is_dir() {
                self.load_directory_recursive(&entry_path, indices)?;
            } else if entry_path.extension().is_some_and(|ext| ext == "toml") {
                indices.extend(self.load_file(&entry_path)?);
            }
        }
        Ok(())
    }

    /// Load a file or a directory, whichever `path` is
    pub fn load_path(&mut self, path: &Path) -> Result<Vec<BlueprintIndex>> {
        if path.is_dir() {
            self.load_directory(path)
        } else {
            self.load_file(path)
        }
    }

    /// Parse a catalog from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.parse_into(content)?;
        Ok(catalog)
    }

    fn parse_into(&mut self, content: &str) -> Result<Vec<BlueprintIndex>> {
        let file: TomlCatalog = toml::from_str(content)?;
        file.zones
            .into_iter()
            .map(|zone| self.register(zone.into_blueprint()))
            .collect()
    }

    /// Get a blueprint by index
    pub fn get(&self, index: BlueprintIndex) -> Option<&ZoneBlueprint> {
        self.blueprints.get(index.0)
    }

    /// Get a blueprint by name
    pub fn get_by_name(&self, name: &str) -> Option<&ZoneBlueprint> {
        self.index_of(name).and_then(|index| self.get(index))
    }

    /// Get a blueprint index by name
    pub fn index_of(&self, name: &str) -> Option<BlueprintIndex> {
        self.by_name.get(name).copied()
    }

    /// Indices of every blueprint that is not a terminal zone
    pub fn non_terminal_indices(&self) -> Vec<BlueprintIndex> {
        self.blueprints
            .iter()
            .enumerate()
            .filter(|(_, bp)| !bp.is_terminal())
            .map(|(i, _)| BlueprintIndex(i))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneBlueprint> {
        self.blueprints.iter()
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

/// TOML representation of a catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    zones: Vec<TomlZone>,
}

/// TOML representation of a single zone
#[derive(Debug, Deserialize)]
struct TomlZone {
    name: String,
    #[serde(default)]
    kind: ZoneKind,
    #[serde(default)]
    sockets: Vec<TomlSocket>,
    #[serde(default)]
    volumes: Vec<TomlVolume>,
}

#[derive(Debug, Deserialize)]
struct TomlSocket {
    name: String,
    position: [f32; 3],
    facing: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct TomlVolume {
    #[serde(default)]
    kind: VolumeKind,
    center: [f32; 3],
    half_extents: [f32; 3],
    /// Rotation about the vertical axis, in degrees
    #[serde(default)]
    yaw_deg: f32,
}

impl TomlZone {
    fn into_blueprint(self) -> ZoneBlueprint {
        ZoneBlueprint {
            name: self.name,
            kind: self.kind,
            sockets: self
                .sockets
                .into_iter()
                .map(|s| SocketDef::new(s.name, Vec3::from(s.position), Vec3::from(s.facing)))
                .collect(),
            volumes: self
                .volumes
                .into_iter()
                .map(|v| BoxVolume {
                    kind: v.kind,
                    center: Vec3::from(v.center),
                    half_extents: Vec3::from(v.half_extents),
                    rotation: Quat::from_rotation_y(v.yaw_deg.to_radians()),
                })
                .collect(),
        }
    }
}
