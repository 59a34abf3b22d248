//! Placed zone modules

use crate::blueprints::{ZoneBlueprint, ZoneKind};
use crate::core::types::{BlueprintIndex, ModuleId};
use crate::spatial::{Aabb, OrientedBox, Transform};

use super::socket::Socket;

/// A blueprint instantiated at a world transform
#[derive(Debug, Clone)]
pub struct ZoneModule {
    pub id: ModuleId,
    pub blueprint: BlueprintIndex,
    pub name: String,
    pub kind: ZoneKind,
    transform: Transform,
    sockets: Vec<Socket>,
    /// Solid volumes in world space; triggers and markers are dropped
    solids: Vec<OrientedBox>,
    bounds: Aabb,
}

impl ZoneModule {
    /// Instantiate a blueprint with every socket open
    pub fn instantiate(
        id: ModuleId,
        index: BlueprintIndex,
        blueprint: &ZoneBlueprint,
        transform: Transform,
    ) -> Self {
        let mut module = Self {
            id,
            blueprint: index,
            name: blueprint.name.clone(),
            kind: blueprint.kind,
            transform,
            sockets: Vec::with_capacity(blueprint.sockets.len()),
            solids: Vec::new(),
            bounds: Aabb::EMPTY,
        };
        module.apply_transform(blueprint, transform);
        module
    }

    /// Move the module, recomputing world-space sockets and volumes.
    ///
    /// Only used on candidates, before any socket has been occupied.
    pub fn apply_transform(&mut self, blueprint: &ZoneBlueprint, transform: Transform) {
        self.transform = transform;

        self.sockets = blueprint
            .sockets
            .iter()
            .map(|def| {
                Socket::new(
                    def.name.clone(),
                    transform.transform_point(def.position),
                    transform
                        .transform_direction(def.facing)
                        .normalize_or_zero(),
                )
            })
            .collect();

        self.solids = blueprint
            .volumes
            .iter()
            .filter(|v| v.kind.is_solid())
            .map(|v| v.to_world(&transform))
            .collect();

        self.bounds = self
            .solids
            .iter()
            .fold(Aabb::EMPTY, |acc, solid| acc.merge(&solid.aabb()));
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn sockets(&self) -> &[Socket] {
        &self.sockets
    }

    pub fn socket(&self, index: usize) -> Option<&Socket> {
        self.sockets.get(index)
    }

    pub fn socket_mut(&mut self, index: usize) -> Option<&mut Socket> {
        self.sockets.get_mut(index)
    }

    /// Indices of sockets that can still take an attachment
    pub fn open_sockets(&self) -> impl Iterator<Item = usize> + '_ {
        self.sockets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_open())
            .map(|(i, _)| i)
    }

    pub fn solids(&self) -> &[OrientedBox] {
        &self.solids
    }

    /// Bounds of all solid volumes (empty when the module has none)
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{BoxVolume, VolumeKind};
    use glam::{Quat, Vec3};
    use std::f32::consts::FRAC_PI_2;

    fn corridor() -> ZoneBlueprint {
        ZoneBlueprint::new("corridor", ZoneKind::Corridor)
            .with_socket("front", Vec3::new(0.0, 0.0, 2.0), Vec3::Z)
            .with_socket("back", Vec3::new(0.0, 0.0, -2.0), Vec3::NEG_Z)
            .with_volume(BoxVolume::solid(Vec3::ZERO, Vec3::new(1.0, 1.0, 2.0)))
            .with_volume(BoxVolume {
                kind: VolumeKind::Trigger,
                center: Vec3::ZERO,
                half_extents: Vec3::ONE,
                rotation: Quat::IDENTITY,
            })
    }

    #[test]
    fn test_instantiate_moves_sockets() {
        let transform = Transform::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let module =
            ZoneModule::instantiate(ModuleId(0), BlueprintIndex(0), &corridor(), transform);

        assert_eq!(module.sockets()[0].position, Vec3::new(10.0, 0.0, 2.0));
        assert_eq!(module.open_sockets().count(), 2);
        // Trigger volume is not solid
        assert_eq!(module.solids().len(), 1);
        assert_eq!(module.bounds().min, Vec3::new(9.0, -1.0, -2.0));
    }

    #[test]
    fn test_apply_transform_rotates_facing() {
        let blueprint = corridor();
        let mut module = ZoneModule::instantiate(
            ModuleId(0),
            BlueprintIndex(0),
            &blueprint,
            Transform::IDENTITY,
        );
        let quarter_turn = Transform::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        module.apply_transform(&blueprint, quarter_turn);

        let facing = module.sockets()[0].facing;
        assert!((facing - Vec3::X).length() < 1e-5);
    }
}
