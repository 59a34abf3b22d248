//! 3D geometry used by placement: transforms, volumes and penetration tests

pub mod penetration;
pub mod transform;
pub mod volume;

pub use penetration::{penetration, Penetration};
pub use transform::{facing_rotation, Transform};
pub use volume::{Aabb, BoxVolume, OrientedBox, VolumeKind};
