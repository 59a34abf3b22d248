//! The dungeon scene graph produced by a generation run

use crate::core::types::{ModuleId, SocketRef};

use super::module::ZoneModule;
use super::placement::{ConnectionJson, LayoutFile, LayoutMetadata, PlacedModuleJson};
use super::socket::{Socket, SocketState};

/// Storage for every accepted module and the socket joints between them
#[derive(Debug, Clone, Default)]
pub struct DungeonLayout {
    /// Modules in placement order; `ModuleId(n)` lives at index n
    modules: Vec<ZoneModule>,
    connections: Vec<(SocketRef, SocketRef)>,
}

impl DungeonLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next inserted module will receive
    pub fn next_module_id(&self) -> ModuleId {
        ModuleId(self.modules.len() as u32)
    }

    /// Add an accepted module
    ///
    /// The module must have been instantiated with `next_module_id()`.
    pub fn insert(&mut self, module: ZoneModule) -> ModuleId {
        debug_assert_eq!(module.id, self.next_module_id());
        let id = module.id;
        self.modules.push(module);
        id
    }

    pub fn get(&self, id: ModuleId) -> Option<&ZoneModule> {
        self.modules.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut ZoneModule> {
        self.modules.get_mut(id.0 as usize)
    }

    pub fn socket(&self, at: SocketRef) -> Option<&Socket> {
        self.get(at.module).and_then(|m| m.socket(at.socket))
    }

    fn socket_mut(&mut self, at: SocketRef) -> Option<&mut Socket> {
        self.get_mut(at.module)
            .and_then(|m| m.socket_mut(at.socket))
    }

    pub fn is_open(&self, at: SocketRef) -> bool {
        self.socket(at).is_some_and(Socket::is_open)
    }

    /// Join two open sockets. Returns false (and changes nothing) unless both are open.
    pub fn connect(&mut self, a: SocketRef, b: SocketRef) -> bool {
        if a == b || !self.is_open(a) || !self.is_open(b) {
            return false;
        }
        if let Some(socket) = self.socket_mut(a) {
            socket.connect(b);
        }
        if let Some(socket) = self.socket_mut(b) {
            socket.connect(a);
        }
        self.connections.push((a, b));
        true
    }

    /// Close an open socket as a dead end
    pub fn seal(&mut self, at: SocketRef) -> bool {
        self.socket_mut(at).is_some_and(Socket::seal)
    }

    /// Every open socket, oldest module first
    pub fn open_sockets(&self) -> Vec<SocketRef> {
        self.modules
            .iter()
            .flat_map(|m| m.open_sockets().map(move |i| SocketRef::new(m.id, i)))
            .collect()
    }

    /// Oldest open socket, if any
    pub fn first_open_socket(&self) -> Option<SocketRef> {
        self.modules
            .iter()
            .find_map(|m| m.open_sockets().next().map(|i| SocketRef::new(m.id, i)))
    }

    pub fn modules(&self) -> &[ZoneModule] {
        &self.modules
    }

    pub fn connections(&self) -> &[(SocketRef, SocketRef)] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Count sockets closed as dead ends
    pub fn sealed_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| m.sockets())
            .filter(|s| s.state() == SocketState::Sealed)
            .count()
    }

    /// Export the layout in its JSON file form
    pub fn to_layout_file(&self, metadata: LayoutMetadata) -> LayoutFile {
        LayoutFile {
            version: LayoutFile::VERSION,
            metadata,
            modules: self
                .modules
                .iter()
                .map(PlacedModuleJson::from_module)
                .collect(),
            connections: self
                .connections
                .iter()
                .map(|&(a, b)| ConnectionJson { a, b })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprints::{ZoneBlueprint, ZoneKind};
    use crate::core::types::BlueprintIndex;
    use crate::spatial::Transform;
    use glam::Vec3;

    fn two_door_room() -> ZoneBlueprint {
        ZoneBlueprint::new("room", ZoneKind::Room)
            .with_socket("a", Vec3::new(0.0, 0.0, 1.0), Vec3::Z)
            .with_socket("b", Vec3::new(0.0, 0.0, -1.0), Vec3::NEG_Z)
    }

    fn layout_with_two_rooms() -> DungeonLayout {
        let blueprint = two_door_room();
        let mut layout = DungeonLayout::new();
        for _ in 0..2 {
            let id = layout.next_module_id();
            layout.insert(ZoneModule::instantiate(
                id,
                BlueprintIndex(0),
                &blueprint,
                Transform::IDENTITY,
            ));
        }
        layout
    }

    #[test]
    fn test_connect_occupies_both_sockets() {
        let mut layout = layout_with_two_rooms();
        let a = SocketRef::new(ModuleId(0), 0);
        let b = SocketRef::new(ModuleId(1), 1);

        assert!(layout.connect(a, b));
        assert!(!layout.is_open(a));
        assert!(!layout.is_open(b));
        assert_eq!(layout.connections().len(), 1);

        // Occupied sockets cannot be joined again
        assert!(!layout.connect(a, SocketRef::new(ModuleId(1), 0)));
        assert_eq!(layout.connections().len(), 1);
    }

    #[test]
    fn test_open_sockets_skip_sealed() {
        let mut layout = layout_with_two_rooms();
        assert_eq!(layout.open_sockets().len(), 4);

        assert!(layout.seal(SocketRef::new(ModuleId(0), 0)));
        assert!(!layout.seal(SocketRef::new(ModuleId(0), 0)));

        assert_eq!(layout.open_sockets().len(), 3);
        assert_eq!(
            layout.first_open_socket(),
            Some(SocketRef::new(ModuleId(0), 1))
        );
        assert_eq!(layout.sealed_count(), 1);
    }

    #[test]
    fn test_missing_socket_is_not_open() {
        let layout = layout_with_two_rooms();
        assert!(!layout.is_open(SocketRef::new(ModuleId(7), 0)));
        assert!(!layout.is_open(SocketRef::new(ModuleId(0), 9)));
    }
}
