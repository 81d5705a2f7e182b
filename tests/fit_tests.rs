//! Rigid-invariance properties of the orthogonal-regression fits

use nalgebra::{Point3, Rotation3, Vector3};
use sliceloft::fit::{fit_line, fit_plane};
use sliceloft::float_types::Real;

fn scattered_points() -> Vec<Point3<Real>> {
    // roughly linear cloud with deterministic jitter
    (0..15)
        .map(|i| {
            let t = i as Real;
            Point3::new(
                2.0 * t + 0.1 * (t * 0.7).sin(),
                -t + 0.08 * (t * 1.3).cos(),
                0.5 * t + 0.05 * (t * 2.1).sin(),
            )
        })
        .collect()
}

fn rigid() -> (Rotation3<Real>, Vector3<Real>) {
    let rotation = Rotation3::from_euler_angles(0.4, -1.1, 2.3);
    let translation = Vector3::new(12.0, -7.0, 3.5);
    (rotation, translation)
}

#[test]
fn line_fit_transforms_with_the_points() {
    let points = scattered_points();
    let (rotation, translation) = rigid();
    let moved: Vec<Point3<Real>> = points
        .iter()
        .map(|p| Point3::from(rotation * p.coords + translation))
        .collect();

    let original = fit_line(&points).unwrap();
    let transformed = fit_line(&moved).unwrap();

    // the centroid moves rigidly
    let expected_point = Point3::from(rotation * original.point.coords + translation);
    assert!((transformed.point - expected_point).norm() < 1e-9);

    // the direction rotates (up to the fit's sign ambiguity)
    let expected_direction = rotation * original.direction.into_inner();
    let dot = transformed.direction.dot(&expected_direction).abs();
    assert!(dot > 1.0 - 1e-9);

    // perpendicular distances are invariant
    assert!((transformed.sse - original.sse).abs() < 1e-9);
    for (a, b) in original.residuals.iter().zip(&transformed.residuals) {
        assert!((a.norm() - b.norm()).abs() < 1e-9);
    }
    assert!(
        (original.percent_variance[0] - transformed.percent_variance[0]).abs() < 1e-9
    );
}

#[test]
fn plane_fit_transforms_with_the_points() {
    // a noisy plane patch
    let points: Vec<Point3<Real>> = (0..6)
        .flat_map(|i| {
            (0..6).map(move |j| {
                let (x, y) = (i as Real, j as Real);
                Point3::new(x, y, 0.3 * x - 0.8 * y + 0.01 * ((x * y).sin()))
            })
        })
        .collect();
    let (rotation, translation) = rigid();
    let moved: Vec<Point3<Real>> = points
        .iter()
        .map(|p| Point3::from(rotation * p.coords + translation))
        .collect();

    let original = fit_plane(&points).unwrap();
    let transformed = fit_plane(&moved).unwrap();

    let expected_centroid = Point3::from(rotation * original.centroid.coords + translation);
    assert!((transformed.centroid - expected_centroid).norm() < 1e-9);

    let expected_normal = rotation * original.normal.into_inner();
    assert!(transformed.normal.dot(&expected_normal).abs() > 1.0 - 1e-9);

    assert!((transformed.sse - original.sse).abs() < 1e-9);
}

#[test]
fn line_scores_span_the_cloud_consistently() {
    let points = scattered_points();
    let fit = fit_line(&points).unwrap();

    // scores are centered projections: they sum to ~zero
    let sum: Real = fit.scores.iter().sum();
    assert!(sum.abs() < 1e-9);

    // reconstructing points from score + residual recovers the input
    for ((p, s), r) in points.iter().zip(&fit.scores).zip(&fit.residuals) {
        let rebuilt = fit.point + fit.direction.into_inner() * *s + *r;
        assert!((p - rebuilt).norm() < 1e-9);
    }
}
