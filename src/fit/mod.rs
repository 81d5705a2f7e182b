//! Orthogonal-regression fits (PCA/SVD)
//!
//! Both fits minimize *perpendicular* distance, not vertical distance, by
//! decomposing the mean-centered coordinate matrix. Results are invariant
//! under rigid transformation of the input: translating and rotating the
//! points transforms the fitted entities identically.

pub mod line;
pub mod plane;

pub use line::{LineFit, fit_line};
pub use plane::{PlaneFit, fit_plane};

use crate::errors::{Error, Result};
use crate::float_types::Real;
use nalgebra::{DMatrix, Point3, Vector3};

/// Minimum point count for any orthogonal-regression fit.
pub const MIN_FIT_POINTS: usize = 3;

/// Arithmetic mean of a point set.
pub(crate) fn centroid(points: &[Point3<Real>]) -> Point3<Real> {
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as Real)
}

/// Principal directions of the mean-centered point cloud.
///
/// Returns the centroid, the three right-singular directions as rows
/// (strongest first), and the singular values (descending).
pub(crate) fn principal_directions(
    points: &[Point3<Real>],
    what: &'static str,
) -> Result<(Point3<Real>, [Vector3<Real>; 3], [Real; 3])> {
    if points.len() < MIN_FIT_POINTS {
        return Err(Error::InsufficientData {
            what,
            min: MIN_FIT_POINTS,
            actual: points.len(),
        });
    }

    let center = centroid(points);
    let centered = DMatrix::from_fn(points.len(), 3, |r, c| points[r].coords[c] - center.coords[c]);

    let svd = centered.svd(false, true);
    let Some(v_t) = svd.v_t else {
        return Err(Error::Numerical {
            what: "singular value decomposition",
        });
    };

    let axis = |row: usize| Vector3::new(v_t[(row, 0)], v_t[(row, 1)], v_t[(row, 2)]);
    let singular = [
        svd.singular_values[0],
        svd.singular_values[1],
        svd.singular_values[2],
    ];

    Ok((center, [axis(0), axis(1), axis(2)], singular))
}

/// Percent of total variance captured by each principal axis.
pub(crate) fn percent_variance(singular: &[Real; 3]) -> [Real; 3] {
    let total: Real = singular.iter().map(|s| s * s).sum();
    if total <= Real::EPSILON {
        return [0.0; 3];
    }
    [
        singular[0] * singular[0] / total * 100.0,
        singular[1] * singular[1] / total * 100.0,
        singular[2] * singular[2] / total * 100.0,
    ]
}
