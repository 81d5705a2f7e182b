//! Error taxonomy and recoverable warnings
//!
//! Fatal conditions abort the current specimen only; recoverable conditions
//! surface as [`Warning`]s attached to results and are additionally logged,
//! never silently swallowed.

use crate::float_types::Real;
use crate::frame::Stage;
use std::fmt::Display;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All the fatal conditions a specimen's pipeline can hit
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An orthogonal-regression fit was handed too few points.
    #[error("{what} fit needs at least {min} points, got {actual}")]
    InsufficientData {
        what: &'static str,
        min: usize,
        actual: usize,
    },

    /// A raw buffer does not split into rows of the expected width.
    #[error("{what} must split into rows of {columns}, got a flat length of {len}")]
    InputShape {
        what: &'static str,
        columns: usize,
        len: usize,
    },

    /// A triangle references a vertex id outside the vertex array.
    #[error("triangle {triangle} references vertex {vertex}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        vertex: usize,
        vertex_count: usize,
    },

    /// A slice stack is missing required slice data.
    #[error("slice stack needs at least {min} slices, got {actual}")]
    TooFewSlices { min: usize, actual: usize },

    /// A line is parallel to a plane within tolerance.
    #[error("line is parallel to plane within tolerance {tolerance:e}")]
    ParallelToPlane { tolerance: Real },

    /// A line is coplanar with a triangle (Möller–Trumbore determinant collapse).
    #[error("line is coplanar with triangle (determinant {determinant:e} below tolerance {tolerance:e})")]
    CoplanarLine {
        determinant: Real,
        tolerance: Real,
    },

    /// No parameterization center could be placed strictly inside a slice
    /// boundary, even after recentring.
    #[error("no reference center inside slice {slice} after {attempts} placement attempts")]
    CenterNotInside { slice: usize, attempts: usize },

    /// A direction vector collapsed to zero length.
    #[error("zero-length {what} vector")]
    ZeroVector { what: &'static str },

    /// The enclosed volume is numerically zero, so first moments are undefined.
    #[error("enclosed volume is numerically zero; mesh is not a closed surface")]
    ZeroVolume,

    /// The robust ridge fit would discard every remaining candidate slice.
    #[error("ridge fit rejected all candidate slices after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    /// The Delaunay backend rejected the parameter-space point set.
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    /// A numerical routine failed to produce a usable decomposition.
    #[error("{what} did not converge")]
    Numerical { what: &'static str },

    /// Wrapper tagging an error with the pipeline stage it occurred in.
    #[error("frame pipeline failed during {stage}: {source}")]
    Pipeline {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Tag an error with the pipeline stage it surfaced in.
    pub(crate) fn at_stage(self, stage: Stage) -> Error {
        match self {
            // already tagged deeper down, keep the innermost stage
            Error::Pipeline { .. } => self,
            other => Error::Pipeline {
                stage,
                source: Box::new(other),
            },
        }
    }
}

/// Recoverable conditions attached to results.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Adjacent-slice direction check was inconclusive; original point order kept.
    AmbiguousOrdering { slice: usize, alignment: Real },
    /// The external mesh-repair collaborator failed; the unrepaired mesh was kept.
    RepairFailed(String),
    /// A recomputed plane–line intersection point sits off the plane.
    PlaneResidual { residual: Real, tolerance: Real },
    /// The ridge line could not be anchored to the reconstructed surface.
    NoSurfaceAnchor,
    /// The stitched mesh came out inside-out before correction.
    InvertedOrientation { volume: Real },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::AmbiguousOrdering { slice, alignment } => write!(
                f,
                "slice {} ordering is ambiguous (chord alignment {:.3}); keeping original order",
                slice, alignment
            ),
            Warning::RepairFailed(detail) => {
                write!(f, "mesh repair failed, keeping unrepaired mesh: {}", detail)
            },
            Warning::PlaneResidual {
                residual,
                tolerance,
            } => write!(
                f,
                "plane-line intersection residual {:e} exceeds tolerance {:e}",
                residual, tolerance
            ),
            Warning::NoSurfaceAnchor => {
                write!(f, "ridge line does not intersect the reconstructed surface")
            },
            Warning::InvertedOrientation { volume } => write!(
                f,
                "stitched mesh was inside-out (signed volume {:.3}) before correction",
                volume
            ),
        }
    }
}
