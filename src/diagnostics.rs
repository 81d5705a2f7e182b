//! Debug visualization hooks
//!
//! The pipeline can hand intermediate meshes and point sets to a sink for
//! inspection. Sinks have no effect on computed results.

use crate::float_types::Real;
use crate::mesh::TriMesh;
use nalgebra::Point3;

/// Receiver for intermediate geometry.
pub trait VisualSink {
    /// An intermediate mesh, e.g. the stitched primary surface.
    fn mesh(&mut self, label: &str, mesh: &TriMesh) {
        let _ = (label, mesh);
    }

    /// An intermediate point set, e.g. ridge candidates.
    fn points(&mut self, label: &str, points: &[Point3<Real>]) {
        let _ = (label, points);
    }
}

/// A sink that discards everything.
pub struct NullSink;

impl VisualSink for NullSink {}
