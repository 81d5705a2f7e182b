//! Ridge-point extraction and the robust line fit
//!
//! Per slice of the (already rotated) secondary dataset, a fixed handful of
//! extremal boundary points become ridge candidates. A line is fitted to all
//! candidates and slices whose mean squared perpendicular residual exceeds a
//! threshold are rejected and the fit repeated, until every surviving slice
//! is consistent. The loop removes at least one slice per iteration, so it is
//! bounded by the slice count.

use crate::errors::{Error, Result};
use crate::fit::{LineFit, fit_line};
use crate::float_types::Real;
use crate::slice::SliceStack;
use nalgebra::{Point3, Rotation3};

/// Candidate ridge points, grouped by source slice.
#[derive(Debug, Clone)]
pub struct RidgePointSet {
    /// Candidate points, `group_size` consecutive entries per slice.
    pub points: Vec<Point3<Real>>,
    /// Source slice index of each group.
    pub slice_ids: Vec<usize>,
    /// Candidates per slice.
    pub group_size: usize,
}

impl RidgePointSet {
    pub fn group_count(&self) -> usize {
        self.slice_ids.len()
    }
}

/// Collect the `per_slice` most extreme points of every slice.
///
/// Points are taken into the intermediate frame (`rotation * (p - origin)`)
/// first, then ranked by their x coordinate: largest first when `take_max`
/// (right-side convention), smallest first otherwise. Slices with fewer than
/// `per_slice` points contribute no candidates.
pub fn extract_ridge_points(
    stack: &SliceStack,
    rotation: &Rotation3<Real>,
    origin: &Point3<Real>,
    take_max: bool,
    per_slice: usize,
) -> RidgePointSet {
    let mut points = Vec::new();
    let mut slice_ids = Vec::new();

    for index in 0..stack.slice_count() {
        let slice = stack.slice(index);
        if slice.len() < per_slice {
            continue;
        }
        let mut rotated: Vec<Point3<Real>> = slice
            .iter()
            .map(|p| Point3::from(rotation * (p - origin)))
            .collect();
        if take_max {
            rotated.sort_by(|a, b| b.x.total_cmp(&a.x));
        } else {
            rotated.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
        points.extend_from_slice(&rotated[..per_slice]);
        slice_ids.push(index);
    }

    RidgePointSet {
        points,
        slice_ids,
        group_size: per_slice,
    }
}

/// A converged robust ridge-line fit.
#[derive(Debug, Clone)]
pub struct RidgeFit {
    /// The final line fit over the surviving candidates.
    pub line: LineFit,
    /// Slices that survived the rejection loop.
    pub kept_slices: Vec<usize>,
    /// Slices rejected as outliers, in removal order.
    pub removed_slices: Vec<usize>,
    /// Fit-and-reject iterations performed.
    pub iterations: usize,
}

/// Fit a ridge line with iterative per-slice outlier rejection.
///
/// Each iteration fits all surviving candidates, computes every slice's mean
/// squared perpendicular residual, and removes the slices above
/// `threshold` (squared units, e.g. 25 for 5 mm). An iteration that would
/// remove every remaining slice is [`Error::ConvergenceFailure`].
pub fn robust_ridge_fit(set: &RidgePointSet, threshold: Real) -> Result<RidgeFit> {
    let group = set.group_size;
    let mut points = set.points.clone();
    let mut slices = set.slice_ids.clone();
    let mut removed_slices = Vec::new();
    let mut iterations = 0;

    // bounded: every pass removes at least one slice or returns
    while iterations < set.group_count().max(1) + 1 {
        iterations += 1;
        let line = fit_line(&points)?;

        let offenders: Vec<usize> = line
            .residuals
            .chunks_exact(group)
            .enumerate()
            .filter_map(|(index, chunk)| {
                let mean: Real =
                    chunk.iter().map(|r| r.norm_squared()).sum::<Real>() / group as Real;
                (mean > threshold).then_some(index)
            })
            .collect();

        if offenders.is_empty() {
            return Ok(RidgeFit {
                line,
                kept_slices: slices,
                removed_slices,
                iterations,
            });
        }
        if offenders.len() == slices.len() {
            return Err(Error::ConvergenceFailure { iterations });
        }
        for &index in offenders.iter().rev() {
            removed_slices.push(slices.remove(index));
            points.drain(index * group..(index + 1) * group);
        }
    }

    Err(Error::ConvergenceFailure { iterations })
}
