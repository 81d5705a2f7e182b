//! Contour slice stacks
//!
//! A specimen arrives as an ordered stack of digitized contour slices along a
//! scan axis. Point counts vary per slice, so the stack is a flat vertex
//! buffer plus a prefix-sum offset table giving each slice's `[start, end)`
//! range; the offsets double as the global vertex ids used by stitching.

pub mod endcap;
pub mod parameterize;
pub mod stitch;

pub use endcap::EndCapStyle;
pub use parameterize::{ParamMode, ParameterizedSlice};
pub use stitch::{StitchConfig, build_surface, stitch_pair};

use crate::errors::{Error, Result};
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};
use std::ops::Range;

/// Minimum points a slice boundary needs to be parameterized and stitched.
pub const MIN_SLICE_POINTS: usize = 3;

/// An ordered stack of contour slices in a flat buffer.
#[derive(Debug, Clone)]
pub struct SliceStack {
    points: Vec<Point3<Real>>,
    /// Prefix sums of per-slice point counts; `offsets.len() == slice_count + 1`.
    offsets: Vec<usize>,
}

impl SliceStack {
    /// Build a stack from per-slice point lists.
    pub fn from_slices(slices: Vec<Vec<Point3<Real>>>) -> Result<Self> {
        if slices.is_empty() {
            return Err(Error::TooFewSlices { min: 1, actual: 0 });
        }
        let mut offsets = Vec::with_capacity(slices.len() + 1);
        offsets.push(0);
        let mut points = Vec::with_capacity(slices.iter().map(Vec::len).sum());
        for slice in slices {
            if slice.len() < MIN_SLICE_POINTS {
                return Err(Error::InsufficientData {
                    what: "slice boundary",
                    min: MIN_SLICE_POINTS,
                    actual: slice.len(),
                });
            }
            points.extend(slice);
            offsets.push(points.len());
        }
        Ok(SliceStack { points, offsets })
    }

    /// Build a stack from a flat point buffer and per-slice counts.
    pub fn from_flat(points: Vec<Point3<Real>>, counts: &[usize]) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::TooFewSlices { min: 1, actual: 0 });
        }
        let total: usize = counts.iter().sum();
        if total != points.len() {
            return Err(Error::InputShape {
                what: "slice point buffer",
                columns: total,
                len: points.len(),
            });
        }
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        let mut running = 0;
        offsets.push(running);
        for &count in counts {
            if count < MIN_SLICE_POINTS {
                return Err(Error::InsufficientData {
                    what: "slice boundary",
                    min: MIN_SLICE_POINTS,
                    actual: count,
                });
            }
            running += count;
            offsets.push(running);
        }
        Ok(SliceStack { points, offsets })
    }

    pub fn slice_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// All points, slice by slice.
    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    /// The global-id range `[start, end)` of slice `index`.
    pub fn range(&self, index: usize) -> Range<usize> {
        self.offsets[index]..self.offsets[index + 1]
    }

    /// The points of slice `index`, in traversal order.
    pub fn slice(&self, index: usize) -> &[Point3<Real>] {
        &self.points[self.range(index)]
    }

    /// Arithmetic mean of slice `index`'s points.
    pub fn slice_centroid(&self, index: usize) -> Point3<Real> {
        let slice = self.slice(index);
        let sum = slice
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / slice.len() as Real)
    }

    /// Reverse the traversal order of slice `index` in place.
    ///
    /// Used by the arclength direction-consistency pass, before any global
    /// vertex ids have been handed out.
    pub(crate) fn reverse_slice(&mut self, index: usize) {
        let range = self.range(index);
        self.points[range].reverse();
    }
}
