//! The anatomical coordinate-frame pipeline
//!
//! Composes surface reconstruction, mass properties, principal-axis
//! extraction and the robust ridge-line fit into a two-stage rotation. The
//! stages run in a fixed order; an error anywhere aborts the specimen and is
//! tagged with the [`Stage`] it surfaced in, so batch drivers can tell a bad
//! digitization from a bad ridge.

pub mod ridge;
pub mod rotation;

pub use ridge::{RidgeFit, RidgePointSet, extract_ridge_points, robust_ridge_fit};
pub use rotation::{frame_from_axis, minimal_rotation};

use crate::diagnostics::VisualSink;
use crate::errors::{Error, Result, Warning};
use crate::fit::fit_plane;
use crate::float_types::Real;
use crate::intersect::{DEFAULT_RAY_TOLERANCE, plane_line, triangle_line};
use crate::mesh::repair::try_repair;
use crate::mesh::{AdjacencyIndex, MassProperties, MeshRepair, TriMesh, mass_properties};
use crate::slice::{SliceStack, StitchConfig, build_surface};
use nalgebra::{Point3, Rotation3, SymmetricEigen, Unit, Vector3};
use std::fmt::Display;

/// Anatomical side convention. Affects the sign conventions of the
/// principal-axis target, the ridge extremal direction, and the second
/// frame's reference axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Right,
    Left,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MeshBuilt,
    InertiaComputed,
    FirstRotationApplied,
    RidgeExtracted,
    RidgeFitConverged,
    SecondRotationComposed,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::MeshBuilt => "mesh construction",
            Stage::InertiaComputed => "inertia computation",
            Stage::FirstRotationApplied => "principal-axis rotation",
            Stage::RidgeExtracted => "ridge extraction",
            Stage::RidgeFitConverged => "ridge fit",
            Stage::SecondRotationComposed => "rotation composition",
        };
        f.write_str(name)
    }
}

/// Tunables of the frame pipeline.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Side convention of the specimen.
    pub side: Side,
    /// Stack axis used to pick the anatomical inertia eigenvector.
    pub reference_axis: Vector3<Real>,
    /// Ridge candidates taken per secondary slice.
    pub ridge_points_per_slice: usize,
    /// Squared-residual rejection threshold for the ridge fit (units², the
    /// default 25 corresponds to 5 mm).
    pub residual_threshold: Real,
    /// Surface reconstruction settings for the primary stack.
    pub stitch: StitchConfig,
}

impl Default for FrameConfig {
    fn default() -> Self {
        FrameConfig {
            side: Side::Right,
            reference_axis: Vector3::z(),
            ridge_points_per_slice: 3,
            residual_threshold: 25.0,
            stitch: StitchConfig::default(),
        }
    }
}

/// An origin plus a right-handed orthonormal rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateFrame {
    pub origin: Point3<Real>,
    pub rotation: Rotation3<Real>,
}

/// Everything the pipeline derives for one specimen.
#[derive(Debug, Clone)]
pub struct FrameResult {
    /// The reconstructed (and possibly repaired) surface, source frame.
    pub mesh: TriMesh,
    /// Mesh vertex positions in the final anatomical frame.
    pub transformed_vertices: Vec<Point3<Real>>,
    /// Mass properties of the enclosed volume, source frame.
    pub mass: MassProperties,
    /// The composed two-stage frame: origin at the volume centroid.
    pub frame: CoordinateFrame,
    /// A point on the converged ridge line, intermediate frame.
    pub ridge_point: Point3<Real>,
    /// Ridge direction, sign-normalized so its third component is ≥ 0.
    pub ridge_direction: Unit<Vector3<Real>>,
    /// Where the ridge line meets the reconstructed surface, intermediate
    /// frame; `None` (with a warning) when it misses.
    pub surface_anchor: Option<Point3<Real>>,
    /// Secondary slices rejected by the robust ridge fit.
    pub removed_slices: Vec<usize>,
    /// Recoverable conditions encountered along the way.
    pub warnings: Vec<Warning>,
}

/// The coordinate-frame pipeline for one specimen.
///
/// Specimens are independent; build one pipeline value per specimen (or
/// reuse one serially) and parallelize at the specimen level if needed.
pub struct FramePipeline<'a> {
    config: FrameConfig,
    repair: Option<&'a dyn MeshRepair>,
    sink: Option<&'a mut dyn VisualSink>,
}

impl<'a> FramePipeline<'a> {
    pub fn new(config: FrameConfig) -> Self {
        FramePipeline {
            config,
            repair: None,
            sink: None,
        }
    }

    /// Attach the external repair collaborator.
    pub fn with_repair(mut self, repair: &'a dyn MeshRepair) -> Self {
        self.repair = Some(repair);
        self
    }

    /// Attach a visualization sink for intermediate geometry.
    pub fn with_sink(mut self, sink: &'a mut dyn VisualSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Run the full pipeline: `primary` is the surface stack, `secondary`
    /// the independently digitized ridge-region stack.
    pub fn run(&mut self, primary: &SliceStack, secondary: &SliceStack) -> Result<FrameResult> {
        let mut warnings = Vec::new();

        // stage 1: stitched surface, caps, orientation, advisory repair
        let (mut mesh, mut stitch_warnings) = build_surface(primary, &self.config.stitch)
            .map_err(|e| e.at_stage(Stage::MeshBuilt))?;
        warnings.append(&mut stitch_warnings);
        if self.config.stitch.improve_mesh {
            if let Some(repairer) = self.repair {
                mesh = try_repair(mesh, repairer, &mut warnings);
            }
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.mesh("primary surface", &mesh);
        }

        // stage 2: mass properties and the anatomical inertia axis
        let mut mass =
            mass_properties(&mesh).map_err(|e| e.at_stage(Stage::InertiaComputed))?;
        if mass.is_inside_out() {
            let warning = Warning::InvertedOrientation {
                volume: mass.volume,
            };
            log::warn!("{}", warning);
            warnings.push(warning);
            mesh.flip_all();
            mass = mass_properties(&mesh).map_err(|e| e.at_stage(Stage::InertiaComputed))?;
        }
        let axis = self
            .anatomical_axis(&mass)
            .map_err(|e| e.at_stage(Stage::InertiaComputed))?;

        // stage 3: minimal rotation onto the canonical target, applied to
        // the secondary stack about the volume centroid
        let target = -self.config.reference_axis;
        let first = minimal_rotation(&axis, &target)
            .map_err(|e| e.at_stage(Stage::FirstRotationApplied))?;
        let origin = mass.centroid;

        // stage 4: extremal ridge candidates per secondary slice
        let take_max = self.config.side == Side::Right;
        let candidates = extract_ridge_points(
            secondary,
            &first,
            &origin,
            take_max,
            self.config.ridge_points_per_slice,
        );
        if candidates.group_count() == 0 {
            return Err(Error::InsufficientData {
                what: "ridge candidate",
                min: self.config.ridge_points_per_slice,
                actual: 0,
            }
            .at_stage(Stage::RidgeExtracted));
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.points("ridge candidates", &candidates.points);
        }

        // stage 5: robust fit with per-slice outlier rejection
        let ridge = robust_ridge_fit(&candidates, self.config.residual_threshold)
            .map_err(|e| e.at_stage(Stage::RidgeFitConverged))?;

        // stage 6: sign-normalize the ridge and grow the second frame; the
        // ridge runs roughly along the stack axis, so the Gram–Schmidt seed
        // crosses from the transverse axis
        let mut direction = ridge.line.direction.into_inner();
        if direction.z < 0.0 {
            direction = -direction;
        }
        let gram_schmidt_ref = match self.config.side {
            Side::Right => Vector3::x(),
            Side::Left => -Vector3::x(),
        };
        let second = frame_from_axis(&direction, &gram_schmidt_ref)
            .map_err(|e| e.at_stage(Stage::SecondRotationComposed))?;

        // stage 7: compose and transform the primary mesh
        let rotation = second * first;
        let transformed_vertices = mesh.transformed_vertices(&rotation, &origin);

        let surface_anchor = self.surface_anchor(
            &mesh,
            primary,
            &ridge.line.point,
            &direction,
            &first,
            &origin,
            &mut warnings,
        );

        Ok(FrameResult {
            mesh,
            transformed_vertices,
            mass,
            frame: CoordinateFrame { origin, rotation },
            ridge_point: ridge.line.point,
            ridge_direction: Unit::new_normalize(direction),
            surface_anchor,
            removed_slices: ridge.removed_slices,
            warnings,
        })
    }

    /// The centroidal inertia eigenvector with the largest magnitude
    /// component along the reference axis, sign-forced negative along it.
    fn anatomical_axis(&self, mass: &MassProperties) -> Result<Vector3<Real>> {
        let eigen = SymmetricEigen::new(mass.inertia_centroid);
        let reference = &self.config.reference_axis;

        let mut best_column = 0;
        let mut best_magnitude = -1.0;
        for column in 0..3 {
            let magnitude = eigen.eigenvectors.column(column).dot(reference).abs();
            if magnitude > best_magnitude {
                best_magnitude = magnitude;
                best_column = column;
            }
        }
        if best_magnitude <= 0.0 {
            return Err(Error::ZeroVector {
                what: "anatomical axis",
            });
        }

        let mut axis: Vector3<Real> = eigen.eigenvectors.column(best_column).into_owned();
        if axis.dot(reference) > 0.0 {
            axis = -axis;
        }
        Ok(axis)
    }

    /// Anchor the converged ridge line to the reconstructed surface.
    ///
    /// The line lives in the intermediate frame, so it is taken back into
    /// the source frame and intersected with the triangles incident to the
    /// nearer end slice's vertex range, falling back to that end slice's
    /// best-fit plane. A miss is a warning, never an error.
    #[allow(clippy::too_many_arguments)]
    fn surface_anchor(
        &self,
        mesh: &TriMesh,
        primary: &SliceStack,
        ridge_point: &Point3<Real>,
        ridge_direction: &Vector3<Real>,
        first: &Rotation3<Real>,
        origin: &Point3<Real>,
        warnings: &mut Vec<Warning>,
    ) -> Option<Point3<Real>> {
        let inverse = first.inverse();
        let line_point = Point3::from(inverse * ridge_point.coords) + origin.coords;
        let line_dir = inverse * *ridge_direction;

        // the end slice nearer the ridge centroid
        let ends = [0, primary.slice_count() - 1];
        let end = *ends
            .iter()
            .min_by(|&&a, &&b| {
                let da = (primary.slice_centroid(a) - line_point).norm();
                let db = (primary.slice_centroid(b) - line_point).norm();
                da.total_cmp(&db)
            })
            .unwrap();

        let adjacency = AdjacencyIndex::build(&mesh.triangles);
        let ids: Vec<usize> = primary.range(end).collect();
        let mut best: Option<(Real, Point3<Real>)> = None;
        for row in adjacency.incident_any(&ids) {
            if let Ok(Some(hit)) =
                triangle_line(&mesh.corners(row), &line_point, &line_dir, DEFAULT_RAY_TOLERANCE)
            {
                if best.is_none() || hit.t.abs() < best.as_ref().unwrap().0 {
                    best = Some((hit.t.abs(), hit.point));
                }
            }
        }

        let source_hit = best.map(|(_, p)| p).or_else(|| {
            let plane = fit_plane(primary.slice(end)).ok()?;
            let (hit, warning) =
                plane_line(&plane.centroid, &plane.normal, &line_point, &line_dir).ok()?;
            if let Some(w) = warning {
                warnings.push(w);
            }
            Some(hit.point)
        });

        match source_hit {
            Some(p) => Some(Point3::from(first * (p - origin))),
            None => {
                let warning = Warning::NoSurfaceAnchor;
                log::warn!("{}", warning);
                warnings.push(warning);
                None
            },
        }
    }
}
