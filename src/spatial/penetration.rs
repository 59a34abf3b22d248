//! Exact penetration depth between oriented boxes (separating axis test)

use glam::Vec3;

use super::volume::OrientedBox;

/// Cross products shorter than this come from parallel edges and are skipped
const DEGENERATE_AXIS: f32 = 1e-6;

/// Minimum translation that separates two overlapping boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit direction to move the first box out of the second
    pub direction: Vec3,
    /// Overlap distance along `direction`
    pub depth: f32,
}

/// Compute how deeply `a` penetrates `b`.
///
/// Returns `None` when a separating axis exists. Boxes that merely touch
/// report `Some` with a depth of (approximately) zero, so callers decide
/// what counts as a collision.
pub fn penetration(a: &OrientedBox, b: &OrientedBox) -> Option<Penetration> {
    let offset = b.center - a.center;

    let mut best = Penetration {
        direction: Vec3::ZERO,
        depth: f32::INFINITY,
    };

    for axis in candidate_axes(a, b) {
        let distance = offset.dot(axis);
        let overlap = a.projected_radius(axis) + b.projected_radius(axis) - distance.abs();

        if overlap < 0.0 {
            return None;
        }

        if overlap < best.depth {
            best.depth = overlap;
            best.direction = if distance > 0.0 { -axis } else { axis };
        }
    }

    Some(best)
}

/// Face normals of both boxes plus the normalized edge cross products
fn candidate_axes<'a>(
    a: &'a OrientedBox,
    b: &'a OrientedBox,
) -> impl Iterator<Item = Vec3> + 'a {
    let faces = a.axes.iter().chain(b.axes.iter()).copied();
    let edges = a.axes.iter().flat_map(move |ea| {
        b.axes.iter().filter_map(move |eb| {
            let cross = ea.cross(*eb);
            (cross.length_squared() > DEGENERATE_AXIS).then(|| cross.normalize())
        })
    });
    faces.chain(edges)
}
