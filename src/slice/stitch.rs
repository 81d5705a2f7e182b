//! Slice-pair stitching through parameter space
//!
//! Two adjacent slices are embedded into 2-D as (parameter, slice-separation
//! offset) rows, Delaunay-triangulated as a point set, and the resulting
//! connectivity is lifted back onto the 3-D points through the per-slice
//! global-id offsets. Closed rings get a wraparound duplicate of their first
//! point at parameter + period so the band closes on itself.

use super::SliceStack;
use super::endcap::{self, EndCapStyle};
use super::parameterize::{ParamMode, ParameterizedSlice, align_directions, parameterize_pair};
use crate::errors::{Error, Result, Warning};
use crate::float_types::Real;
use crate::mesh::{TriMesh, orient_batch};
use nalgebra::{Point3, Vector3};
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::ops::Range;

/// Tunables for surface reconstruction from a slice stack.
#[derive(Debug, Clone)]
pub struct StitchConfig {
    /// Slice-boundary parameterization.
    pub mode: ParamMode,
    /// Whether slice boundaries are closed rings.
    pub closed: bool,
    /// Adjacent-slice chord-alignment threshold for arclength ordering.
    pub direction_tolerance: Real,
    /// How to close the first and last slice.
    pub end_caps: EndCapStyle,
    /// Whether to offer the finished mesh to the repair collaborator.
    pub improve_mesh: bool,
}

impl Default for StitchConfig {
    fn default() -> Self {
        StitchConfig {
            mode: ParamMode::Angular,
            closed: true,
            direction_tolerance: 0.1,
            end_caps: EndCapStyle::Fan,
            improve_mesh: true,
        }
    }
}

/// Stitch one adjacent slice pair into a band of triangles with global ids.
///
/// Two coplanar parallel rings of n points each come back as exactly 2n
/// triangles (the lateral surface of a prism).
pub fn stitch_pair(
    stack: &SliceStack,
    pair: usize,
    config: &StitchConfig,
) -> Result<Vec<[usize; 3]>> {
    let a = stack.slice(pair);
    let b = stack.slice(pair + 1);
    let (pa, pb, geometry) =
        parameterize_pair(a, b, pair, pair + 1, config.mode, config.closed)?;

    let mut embedded: Vec<Point2<Real>> = Vec::with_capacity(a.len() + b.len() + 2);
    let mut global: Vec<usize> = Vec::with_capacity(a.len() + b.len() + 2);
    embed_row(&pa, 0.0, stack.range(pair).start, &mut embedded, &mut global);
    embed_row(
        &pb,
        geometry.separation,
        stack.range(pair + 1).start,
        &mut embedded,
        &mut global,
    );

    let expected = embedded.len();
    let triangulation = DelaunayTriangulation::<Point2<Real>>::bulk_load_stable(embedded)
        .map_err(|e| Error::Triangulation(e.to_string()))?;
    if triangulation.num_vertices() != expected {
        return Err(Error::Triangulation(format!(
            "coincident parameter points stitching slices {} and {}",
            pair,
            pair + 1
        )));
    }

    let mut triangles = Vec::with_capacity(expected * 2);
    for face in triangulation.inner_faces() {
        let [i0, i1, i2] = face.vertices().map(|v| v.index());
        let tri = [global[i0], global[i1], global[i2]];
        // slivers between a wraparound duplicate and its original collapse
        // to a repeated id; drop them
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            continue;
        }
        triangles.push(tri);
    }
    Ok(triangles)
}

/// Append one slice's 2-D embedding row, plus the wraparound duplicate for
/// closed rings, mapping every embedded point to its global vertex id.
fn embed_row(
    slice: &ParameterizedSlice,
    row: Real,
    offset: usize,
    embedded: &mut Vec<Point2<Real>>,
    global: &mut Vec<usize>,
) {
    let mut first: Option<(Real, usize)> = None;
    for (param, local) in slice.ascending() {
        if first.is_none() {
            first = Some((param, local));
        }
        embedded.push(Point2::new(param, row));
        global.push(offset + local);
    }
    if slice.closed {
        if let Some((param, local)) = first {
            embedded.push(Point2::new(param + slice.period, row));
            global.push(offset + local);
        }
    }
}

/// Reconstruct the full surface of a slice stack: stitched bands between all
/// adjacent pairs, end caps on the first and last slice, and per-batch
/// outward orientation.
///
/// Returns the mesh and the recoverable warnings gathered along the way.
/// Needs at least two slices.
pub fn build_surface(stack: &SliceStack, config: &StitchConfig) -> Result<(TriMesh, Vec<Warning>)> {
    if stack.slice_count() < 2 {
        return Err(Error::TooFewSlices {
            min: 2,
            actual: stack.slice_count(),
        });
    }
    let mut warnings = Vec::new();

    // arclength ordering may reverse slices; work on a copy so the caller's
    // stack stays read-only
    let aligned;
    let stack = if config.mode == ParamMode::Arclength {
        let mut copy = stack.clone();
        warnings.extend(align_directions(&mut copy, config.direction_tolerance));
        aligned = copy;
        &aligned
    } else {
        stack
    };

    let mut vertices: Vec<Point3<Real>> = stack.points().to_vec();

    // triangle arena: upper-bound estimate, trimmed after assembly
    let pair_estimate: usize = (0..stack.slice_count() - 1)
        .map(|i| stack.range(i).len() + stack.range(i + 1).len() + 2)
        .sum();
    let cap_estimate = stack.range(0).len() + stack.range(stack.slice_count() - 1).len() + 2;
    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(pair_estimate + cap_estimate);
    let mut batches: Vec<Range<usize>> = Vec::new();

    for pair in 0..stack.slice_count() - 1 {
        let start = triangles.len();
        triangles.extend(stitch_pair(stack, pair, config)?);
        batches.push(start..triangles.len());
    }

    if config.end_caps != EndCapStyle::None {
        for end in [0, stack.slice_count() - 1] {
            let start = triangles.len();
            let ring = stack.range(end);
            match config.end_caps {
                EndCapStyle::Fan => {
                    triangles.extend(endcap::fan_cap(&mut vertices, ring));
                },
                EndCapStyle::Delaunay => {
                    triangles.extend(endcap::delaunay_cap(stack.slice(end), ring.start)?);
                },
                EndCapStyle::None => unreachable!(),
            }
            batches.push(start..triangles.len());
        }
    }

    triangles.shrink_to_fit();

    // every batch is wound consistently inside itself; vote each one outward
    let reference = Point3::from(
        vertices
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / vertices.len() as Real,
    );
    for batch in &batches {
        orient_batch(&vertices, &mut triangles[batch.clone()], &reference, true);
    }

    let mesh = TriMesh::from_parts(vertices, triangles)?;
    Ok((mesh, warnings))
}
