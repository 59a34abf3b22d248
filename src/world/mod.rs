//! Placed zone modules, their sockets and the finished dungeon layout

pub mod layout;
pub mod module;
pub mod placement;
pub mod socket;

pub use layout::DungeonLayout;
pub use module::ZoneModule;
pub use placement::{LayoutFile, LayoutMetadata, PlacedModuleJson, SocketStateJson};
pub use socket::{Socket, SocketState};
