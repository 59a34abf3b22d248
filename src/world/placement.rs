//! JSON schema types for generated dungeon layouts
//!
//! Downstream gameplay systems read finished layouts from these files:
//! each placed module with its world transform and socket states, plus the
//! list of socket joints.

use serde::{Deserialize, Serialize};

use crate::core::types::{BlueprintIndex, ModuleId, RunId, SocketRef};

use super::module::ZoneModule;
use super::socket::SocketState;

/// Root structure for layout JSON files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutFile {
    /// Schema version (currently 1)
    pub version: u32,
    pub metadata: LayoutMetadata,
    pub modules: Vec<PlacedModuleJson>,
    pub connections: Vec<ConnectionJson>,
}

impl LayoutFile {
    pub const VERSION: u32 = 1;
}

/// Which run produced the layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutMetadata {
    pub run_id: RunId,
    pub seed: u64,
    pub bias: usize,
    /// Requested zone count, seed module included
    pub total_zones: u32,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// A single placed module
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlacedModuleJson {
    pub id: ModuleId,
    pub blueprint: BlueprintIndex,
    pub name: String,
    /// World position [x, y, z]
    pub position: [f32; 3],
    /// World rotation quaternion [x, y, z, w]
    pub rotation: [f32; 4],
    pub sockets: Vec<SocketJson>,
}

impl PlacedModuleJson {
    pub fn from_module(module: &ZoneModule) -> Self {
        let transform = module.transform();
        Self {
            id: module.id,
            blueprint: module.blueprint,
            name: module.name.clone(),
            position: transform.translation.to_array(),
            rotation: transform.rotation.to_array(),
            sockets: module
                .sockets()
                .iter()
                .map(|s| SocketJson {
                    name: s.name.clone(),
                    position: s.position.to_array(),
                    facing: s.facing.to_array(),
                    state: s.state().into(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocketJson {
    pub name: String,
    pub position: [f32; 3],
    pub facing: [f32; 3],
    pub state: SocketStateJson,
}

/// Socket occupancy as written to JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketStateJson {
    Open,
    Connected,
    Sealed,
}

impl From<SocketState> for SocketStateJson {
    fn from(state: SocketState) -> Self {
        match state {
            SocketState::Open => SocketStateJson::Open,
            SocketState::Connected { .. } => SocketStateJson::Connected,
            SocketState::Sealed => SocketStateJson::Sealed,
        }
    }
}

/// Two joined sockets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionJson {
    pub a: SocketRef,
    pub b: SocketRef,
}
