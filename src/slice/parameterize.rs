//! Slice boundary parameterization
//!
//! Maps an ordered slice boundary to a 1-D coordinate in a locally flattened
//! frame, either as polar angle about a shared center or as cumulative
//! arclength. The parameter fixes the point *order* used for stitching; the
//! vertex ids themselves are never reordered.

use super::SliceStack;
use crate::errors::{Error, Result, Warning};
use crate::fit::{PlaneFit, fit_plane};
use crate::float_types::{FRAC_PI_2, Real, TAU, tolerance};
use nalgebra::Point3;

/// Which 1-D coordinate parameterizes a slice boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamMode {
    /// Polar angle about a shared in-plane center, with discontinuity
    /// unwrapping. Suited to star-shaped closed contours.
    #[default]
    Angular,
    /// Cumulative chord length from the slice's first point. Suited to open
    /// or strongly non-convex contours whose traversal order is trusted.
    Arclength,
}

/// A slice plus its per-point scalar parameter.
#[derive(Debug, Clone)]
pub struct ParameterizedSlice {
    /// `(parameter, local point index)` pairs in parameter order.
    pub params: Vec<(Real, usize)>,
    /// Traversal direction: +1 with the parameter, −1 against it.
    pub direction: i8,
    /// Whether the boundary closes back on its first point.
    pub closed: bool,
    /// Parameter increase of one full traversal (2π, or perimeter).
    pub period: Real,
}

impl ParameterizedSlice {
    /// `(parameter, local index)` pairs in ascending parameter order.
    pub(crate) fn ascending(&self) -> Box<dyn Iterator<Item = (Real, usize)> + '_> {
        if self.direction >= 0 {
            Box::new(self.params.iter().copied())
        } else {
            Box::new(self.params.iter().rev().copied())
        }
    }
}

/// Shared geometry of one adjacent slice pair.
#[derive(Debug, Clone)]
pub struct PairGeometry {
    /// Best-fit plane through both slices' points.
    pub plane: PlaneFit,
    /// Signed distance from the first slice's mean to the second's, along
    /// the shared normal.
    pub separation: Real,
}

/// Parameterize an adjacent slice pair into a comparable 1-D coordinate.
///
/// Angular mode flattens both slices into their common best-fit plane and
/// measures polar angle about a shared center referenced to the first
/// slice's anchor angle, so the two parameter ranges line up. The center
/// must lie strictly inside both boundaries; the combined mean is tried
/// first, then each slice's own mean as recenter attempts, and exhausting
/// all three is [`Error::CenterNotInside`].
pub fn parameterize_pair(
    a: &[Point3<Real>],
    b: &[Point3<Real>],
    slice_a: usize,
    slice_b: usize,
    mode: ParamMode,
    closed: bool,
) -> Result<(ParameterizedSlice, ParameterizedSlice, PairGeometry)> {
    let combined: Vec<Point3<Real>> = a.iter().chain(b.iter()).copied().collect();
    let plane = fit_plane(&combined)?;

    let flatten = |points: &[Point3<Real>]| -> (Vec<(Real, Real)>, Real) {
        let mut z_mean = 0.0;
        let mut flat = Vec::with_capacity(points.len());
        for p in points {
            let q = plane.flatten(p);
            flat.push((q.x, q.y));
            z_mean += q.z;
        }
        (flat, z_mean / points.len() as Real)
    };
    let (a2d, za) = flatten(a);
    let (b2d, zb) = flatten(b);
    let geometry = PairGeometry {
        plane,
        separation: zb - za,
    };

    let (pa, pb) = match mode {
        ParamMode::Angular => {
            let center = shared_center(&a2d, &b2d, slice_a, slice_b)?;
            let anchor = {
                let (x, y) = a2d[0];
                (y - center.1).atan2(x - center.0)
            };
            (
                angular_params(&a2d, center, anchor, closed),
                angular_params(&b2d, center, anchor, closed),
            )
        },
        ParamMode::Arclength => (arclength_params(a, closed), arclength_params(b, closed)),
    };

    Ok((pa, pb, geometry))
}

/// An in-plane center strictly inside both boundaries: the combined mean,
/// then each slice's own mean as the two recenter attempts.
fn shared_center(
    a2d: &[(Real, Real)],
    b2d: &[(Real, Real)],
    slice_a: usize,
    slice_b: usize,
) -> Result<(Real, Real)> {
    let mean = |ring: &[(Real, Real)]| {
        let n = ring.len() as Real;
        let (sx, sy) = ring
            .iter()
            .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
        (sx / n, sy / n)
    };

    // the flattened frame is centered on the combined mean already
    let candidates = [(0.0, 0.0), mean(a2d), mean(b2d)];
    for candidate in candidates {
        if point_in_ring(a2d, candidate) && point_in_ring(b2d, candidate) {
            return Ok(candidate);
        }
    }

    let last = candidates[2];
    let offender = if point_in_ring(a2d, last) { slice_b } else { slice_a };
    Err(Error::CenterNotInside {
        slice: offender,
        attempts: candidates.len(),
    })
}

/// Polar angle per point about `center`, referenced to `anchor` and
/// unwrapped: relative angles above +π/2 drop by 2π, which moves the atan2
/// branch cut away from the boundary's interior run.
fn angular_params(
    ring: &[(Real, Real)],
    center: (Real, Real),
    anchor: Real,
    closed: bool,
) -> ParameterizedSlice {
    let unwrapped: Vec<Real> = ring
        .iter()
        .map(|(x, y)| {
            let mut rel = (y - center.1).atan2(x - center.0) - anchor;
            if rel > FRAC_PI_2 {
                rel -= TAU;
            }
            rel
        })
        .collect();

    let net: Real = unwrapped.windows(2).map(|w| w[1] - w[0]).sum();
    let direction: i8 = if net >= 0.0 { 1 } else { -1 };

    let mut params: Vec<(Real, usize)> =
        unwrapped.into_iter().enumerate().map(|(i, p)| (p, i)).collect();
    if direction > 0 {
        params.sort_by(|l, r| l.0.total_cmp(&r.0));
    } else {
        params.sort_by(|l, r| r.0.total_cmp(&l.0));
    }

    ParameterizedSlice {
        params,
        direction,
        closed,
        period: TAU,
    }
}

/// Cumulative chord length from the slice's first point, in traversal order.
fn arclength_params(points: &[Point3<Real>], closed: bool) -> ParameterizedSlice {
    let mut params = Vec::with_capacity(points.len());
    let mut total = 0.0;
    params.push((0.0, 0));
    for i in 1..points.len() {
        total += (points[i] - points[i - 1]).norm();
        params.push((total, i));
    }
    let closing = (points[0] - points[points.len() - 1]).norm();

    ParameterizedSlice {
        params,
        direction: 1,
        closed,
        period: total + closing,
    }
}

/// Reverse slices whose traversal runs against their predecessor.
///
/// Compares the end-to-end chord vectors of adjacent slices. A normalized
/// dot product below `tol` (default 0.1) means the orders disagree: when
/// reversal would improve the alignment the slice is reversed, otherwise the
/// check is inconclusive and the original order is kept under a
/// [`Warning::AmbiguousOrdering`].
pub fn align_directions(stack: &mut SliceStack, tol: Real) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let eps = tolerance();

    for index in 1..stack.slice_count() {
        let chord = |slice: &[Point3<Real>]| slice[slice.len() - 1] - slice[0];
        let prev = chord(stack.slice(index - 1));
        let cur = chord(stack.slice(index));

        if prev.norm() < eps || cur.norm() < eps {
            let warning = Warning::AmbiguousOrdering {
                slice: index,
                alignment: 0.0,
            };
            log::warn!("{}", warning);
            warnings.push(warning);
            continue;
        }

        let alignment = prev.normalize().dot(&cur.normalize());
        if alignment < tol {
            // reversing negates the chord, so the reversed alignment is -alignment
            if -alignment > alignment {
                stack.reverse_slice(index);
            } else {
                let warning = Warning::AmbiguousOrdering {
                    slice: index,
                    alignment,
                };
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }
    warnings
}

/// Even-odd ray-crossing test; boundary points count as outside.
fn point_in_ring(ring: &[(Real, Real)], point: (Real, Real)) -> bool {
    let (px, py) = point;
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > py) != (yj > py) {
            let x_cross = xi + (py - yi) * (xj - xi) / (yj - yi);
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
