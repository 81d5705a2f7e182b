//! Test support library
//! Shared specimen builders for the integration suites.

// each test binary uses a different subset of these helpers
#![allow(dead_code)]

use nalgebra::Point3;
use sliceloft::SliceStack;
use sliceloft::float_types::{Real, TAU};

/// A circular ring of `n` points at height `z`, counter-clockwise.
pub fn ring(n: usize, radius: Real, z: Real) -> Vec<Point3<Real>> {
    (0..n)
        .map(|i| {
            let theta = TAU * i as Real / n as Real;
            Point3::new(radius * theta.cos(), radius * theta.sin(), z)
        })
        .collect()
}

/// A regular tube: `slices` rings of `n` points, `spacing` apart in z.
pub fn tube(n: usize, radius: Real, slices: usize, spacing: Real) -> SliceStack {
    SliceStack::from_slices(
        (0..slices)
            .map(|s| ring(n, radius, s as Real * spacing))
            .collect(),
    )
    .unwrap()
}

/// The exact prism volume enclosed by stitching `slices` regular n-gon
/// rings `spacing` apart with flat caps.
pub fn ngon_prism_volume(n: usize, radius: Real, slices: usize, spacing: Real) -> Real {
    let polygon_area = 0.5 * n as Real * radius * radius * (TAU / n as Real).sin();
    polygon_area * (slices - 1) as Real * spacing
}
