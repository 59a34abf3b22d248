//! Core identifiers shared by the catalog, layout and planner

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a blueprint inside a zone catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlueprintIndex(pub usize);

/// Identifier of a zone module placed in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

/// Address of one socket: owning module plus position in its socket list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    pub module: ModuleId,
    pub socket: usize,
}

impl SocketRef {
    pub fn new(module: ModuleId, socket: usize) -> Self {
        Self { module, socket }
    }
}

impl std::fmt::Display for SocketRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "module {}:socket {}", self.module.0, self.socket)
    }
}
