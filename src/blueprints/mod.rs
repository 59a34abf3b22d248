//! Zone blueprints and the catalog a generation run draws from

pub mod catalog;
pub mod schema;

pub use catalog::ZoneCatalog;
pub use schema::{SocketDef, ZoneBlueprint, ZoneKind};
