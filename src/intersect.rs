//! Plane–line and triangle–line intersection tests

use crate::errors::{Error, Result, Warning};
use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};

/// Default determinant tolerance for the triangle–line test.
pub const DEFAULT_RAY_TOLERANCE: Real = 1e-8;

/// A plane–line intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneLineHit {
    /// The intersection point.
    pub point: Point3<Real>,
    /// Parametric distance along the line (`point = line_point + t * line_dir`).
    pub t: Real,
}

/// Intersect an infinite line with a plane.
///
/// Fails with [`Error::ParallelToPlane`] when the direction is perpendicular
/// to the normal within tolerance (the parametric solve would divide by near
/// zero). The recomputed point is checked back against the plane; an excess
/// residual is logged and returned as a [`Warning`], not an error.
pub fn plane_line(
    plane_point: &Point3<Real>,
    plane_normal: &Vector3<Real>,
    line_point: &Point3<Real>,
    line_dir: &Vector3<Real>,
) -> Result<(PlaneLineHit, Option<Warning>)> {
    let tol = tolerance();
    let denom = plane_normal.dot(line_dir);
    if denom.abs() < tol {
        return Err(Error::ParallelToPlane { tolerance: tol });
    }

    let t = plane_normal.dot(&(plane_point - line_point)) / denom;
    let point = line_point + line_dir * t;

    let residual = plane_normal.dot(&(point - plane_point)).abs();
    let warning = if residual > tol.sqrt() {
        let w = Warning::PlaneResidual {
            residual,
            tolerance: tol.sqrt(),
        };
        log::warn!("{}", w);
        Some(w)
    } else {
        None
    };

    Ok((PlaneLineHit { point, t }, warning))
}

/// A triangle–line intersection with its barycentric coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleLineHit {
    /// The intersection point.
    pub point: Point3<Real>,
    /// Parametric distance along the line.
    pub t: Real,
    /// Barycentric coordinate along the first edge.
    pub u: Real,
    /// Barycentric coordinate along the second edge.
    pub v: Real,
}

/// Intersect an infinite line with a triangle (Möller–Trumbore).
///
/// Returns `Ok(None)` when the line misses the triangle (`u` or `v` outside
/// `[0, 1]`, or `u + v > 1`), and [`Error::CoplanarLine`] when the
/// determinant collapses below `det_tolerance` (line parallel to, or inside,
/// the triangle plane).
pub fn triangle_line(
    triangle: &[Point3<Real>; 3],
    line_point: &Point3<Real>,
    line_dir: &Vector3<Real>,
    det_tolerance: Real,
) -> Result<Option<TriangleLineHit>> {
    let edge1 = triangle[1] - triangle[0];
    let edge2 = triangle[2] - triangle[0];

    let pvec = line_dir.cross(&edge2);
    let det = edge1.dot(&pvec);
    if det.abs() < det_tolerance {
        return Err(Error::CoplanarLine {
            determinant: det,
            tolerance: det_tolerance,
        });
    }

    let inv_det = 1.0 / det;
    let tvec = line_point - triangle[0];
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return Ok(None);
    }

    let qvec = tvec.cross(&edge1);
    let v = line_dir.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return Ok(None);
    }

    let t = edge2.dot(&qvec) * inv_det;
    Ok(Some(TriangleLineHit {
        point: line_point + line_dir * t,
        t,
        u,
        v,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_line_hits_where_expected() {
        let (hit, warning) = plane_line(
            &Point3::new(0.0, 0.0, 5.0),
            &Vector3::z(),
            &Point3::new(1.0, 2.0, 0.0),
            &Vector3::z(),
        )
        .unwrap();
        assert!((hit.point - Point3::new(1.0, 2.0, 5.0)).norm() < 1e-12);
        assert!((hit.t - 5.0).abs() < 1e-12);
        assert!(warning.is_none());
    }

    #[test]
    fn parallel_line_is_an_error() {
        let result = plane_line(
            &Point3::new(0.0, 0.0, 5.0),
            &Vector3::z(),
            &Point3::origin(),
            &Vector3::x(),
        );
        assert!(matches!(result, Err(Error::ParallelToPlane { .. })));
    }

    #[test]
    fn line_through_triangle_interior() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let hit = triangle_line(
            &tri,
            &Point3::new(0.25, 0.25, -3.0),
            &Vector3::z(),
            DEFAULT_RAY_TOLERANCE,
        )
        .unwrap()
        .expect("line passes through the triangle");
        assert!((hit.point.z).abs() < 1e-12);
        assert!((hit.u - 0.25).abs() < 1e-12);
        assert!((hit.v - 0.25).abs() < 1e-12);
    }

    #[test]
    fn line_outside_barycentric_range_misses() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let hit = triangle_line(
            &tri,
            &Point3::new(0.9, 0.9, -1.0),
            &Vector3::z(),
            DEFAULT_RAY_TOLERANCE,
        )
        .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn coplanar_line_sets_the_error_flag() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let result = triangle_line(
            &tri,
            &Point3::new(-1.0, 0.5, 0.0),
            &Vector3::x(),
            DEFAULT_RAY_TOLERANCE,
        );
        assert!(matches!(result, Err(Error::CoplanarLine { .. })));
    }
}
