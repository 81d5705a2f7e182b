//! Batch outward-normal consistency by majority vote

use crate::float_types::{Real, tolerance};
use nalgebra::Point3;

/// Outcome of one batch vote.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationReport {
    /// Whether the whole batch's winding was flipped.
    pub flipped: bool,
    /// Triangles whose normal disagreed with the expected sign.
    pub disagreeing: usize,
    /// Triangles that cast a vote (degenerate ones abstain).
    pub voting: usize,
}

/// Enforce a consistent winding on one batch of triangles.
///
/// Each triangle's edge-cross-product normal is compared against the vector
/// from `reference` to the triangle centroid; `outward` selects the expected
/// dot-product sign. When more than half of the voting triangles disagree,
/// the *entire batch* has its winding flipped (two indices swapped per
/// triangle). The vote is deliberately batch-level: slice bands and end caps
/// are built with internally consistent winding, so a per-triangle fix would
/// tear the band instead of turning it.
pub fn orient_batch(
    vertices: &[Point3<Real>],
    triangles: &mut [[usize; 3]],
    reference: &Point3<Real>,
    outward: bool,
) -> OrientationReport {
    let tol = tolerance();
    let mut disagreeing = 0;
    let mut voting = 0;

    for tri in triangles.iter() {
        let [a, b, c] = [vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]];
        let normal = (b - a).cross(&(c - a));
        if normal.norm_squared() < tol {
            continue;
        }
        let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
        let alignment = (centroid - reference).dot(&normal);

        voting += 1;
        let agrees = if outward {
            alignment >= 0.0
        } else {
            alignment <= 0.0
        };
        if !agrees {
            disagreeing += 1;
        }
    }

    let flipped = disagreeing * 2 > voting;
    if flipped {
        for tri in triangles.iter_mut() {
            tri.swap(1, 2);
        }
    }

    OrientationReport {
        flipped,
        disagreeing,
        voting,
    }
}
