//! Zone Forge - procedural dungeon generation from connector sockets

pub mod blueprints;
pub mod core;
pub mod generation;
pub mod spatial;
pub mod world;
