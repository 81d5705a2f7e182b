//! Best-fit line through a 3-D point cloud

use super::{percent_variance, principal_directions};
use crate::errors::{Error, Result};
use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Unit, Vector3};

/// Result of an orthogonal-regression line fit.
///
/// The line passes through [`LineFit::point`] (the centroid of the input)
/// along [`LineFit::direction`]. The sign of the direction is whatever the
/// decomposition produced; callers that need a sign convention normalize it
/// themselves.
#[derive(Debug, Clone)]
pub struct LineFit {
    /// A point on the line (the input centroid).
    pub point: Point3<Real>,
    /// Unit direction of the line (first principal direction).
    pub direction: Unit<Vector3<Real>>,
    /// Per-point projection onto the line, relative to the centroid.
    pub scores: Vec<Real>,
    /// Percent of total variance explained per principal axis.
    pub percent_variance: [Real; 3],
    /// Per-point perpendicular residual vector.
    pub residuals: Vec<Vector3<Real>>,
    /// Sum of squared perpendicular distances.
    pub sse: Real,
}

impl LineFit {
    /// Squared perpendicular distance from an arbitrary point to the fitted line.
    pub fn squared_distance(&self, p: &Point3<Real>) -> Real {
        let rel = p - self.point;
        let along = rel.dot(&self.direction);
        (rel - self.direction.into_inner() * along).norm_squared()
    }
}

/// Fit a line to `points` by orthogonal regression.
///
/// Needs at least [`super::MIN_FIT_POINTS`] points; fewer is
/// [`Error::InsufficientData`]. A degenerate cloud with no dominant
/// direction (all points coincident) is [`Error::ZeroVector`].
pub fn fit_line(points: &[Point3<Real>]) -> Result<LineFit> {
    let (center, axes, singular) = principal_directions(points, "line")?;

    let direction = Unit::try_new(axes[0], tolerance()).ok_or(Error::ZeroVector {
        what: "line direction",
    })?;

    let mut scores = Vec::with_capacity(points.len());
    let mut residuals = Vec::with_capacity(points.len());
    let mut sse = 0.0;
    for p in points {
        let rel = p - center;
        let along = rel.dot(&direction);
        let residual = rel - direction.into_inner() * along;
        sse += residual.norm_squared();
        scores.push(along);
        residuals.push(residual);
    }

    Ok(LineFit {
        point: center,
        direction,
        scores,
        percent_variance: percent_variance(&singular),
        residuals,
        sse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points_is_an_error() {
        let pts = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            fit_line(&pts),
            Err(Error::InsufficientData { actual: 2, .. })
        ));
    }

    #[test]
    fn collinear_points_recover_the_axis() {
        let pts: Vec<_> = (0..7)
            .map(|i| Point3::new(i as Real, 2.0 * i as Real, -1.0))
            .collect();
        let fit = fit_line(&pts).unwrap();

        let expected = Vector3::new(1.0, 2.0, 0.0).normalize();
        let d = fit.direction.into_inner();
        assert!(d.dot(&expected).abs() > 1.0 - 1e-12);
        assert!(fit.sse < 1e-18);
        assert!(fit.percent_variance[0] > 99.999);
    }

    #[test]
    fn residuals_are_perpendicular() {
        let pts = [
            Point3::new(0.0, 0.3, 0.0),
            Point3::new(1.0, -0.2, 0.1),
            Point3::new(2.0, 0.1, -0.1),
            Point3::new(3.0, -0.25, 0.05),
        ];
        let fit = fit_line(&pts).unwrap();
        for r in &fit.residuals {
            assert!(r.dot(&fit.direction).abs() < 1e-12);
        }
    }
}
