//! Best-fit plane through a 3-D point cloud

use super::principal_directions;
use crate::errors::{Error, Result};
use crate::float_types::{Real, tolerance};
use crate::frame::rotation::minimal_rotation;
use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// Result of an orthogonal-regression plane fit.
///
/// Besides the plane itself (centroid + unit normal), the fit carries the
/// rotation that aligns the normal with +Z, so slice boundaries can be
/// flattened into a local 2-D frame for parameterization and triangulation.
#[derive(Debug, Clone)]
pub struct PlaneFit {
    /// A point on the plane (the input centroid).
    pub centroid: Point3<Real>,
    /// Unit normal (least principal direction).
    pub normal: Unit<Vector3<Real>>,
    /// Rotation taking the normal onto +Z.
    pub rotation: Rotation3<Real>,
    /// Sum of squared perpendicular distances to the plane.
    pub sse: Real,
}

impl PlaneFit {
    /// Project a point into the local plane frame.
    ///
    /// The result's x/y are in-plane coordinates about the centroid; z is the
    /// signed out-of-plane offset.
    pub fn flatten(&self, p: &Point3<Real>) -> Point3<Real> {
        Point3::from(self.rotation * (p - self.centroid))
    }

    /// Signed distance of a point from the plane along the normal.
    pub fn signed_distance(&self, p: &Point3<Real>) -> Real {
        (p - self.centroid).dot(&self.normal)
    }
}

/// Fit a plane to `points` by orthogonal regression.
pub fn fit_plane(points: &[Point3<Real>]) -> Result<PlaneFit> {
    let (centroid, axes, singular) = principal_directions(points, "plane")?;

    let normal = Unit::try_new(axes[2], tolerance()).ok_or(Error::ZeroVector {
        what: "plane normal",
    })?;
    let rotation = minimal_rotation(&normal, &Vector3::z_axis())?;

    Ok(PlaneFit {
        centroid,
        normal,
        rotation,
        sse: singular[2] * singular[2],
    })
}
