//! Indexed triangle meshes
//!
//! A [`TriMesh`] stores one global vertex array plus triangles as index
//! triples into it. Stitching builds a mesh once per specimen; only the
//! orientation corrector and the external repair collaborator mutate it, and
//! the mass-property integrator consumes it read-only.

pub mod adjacency;
pub mod mass;
pub mod orientation;
pub mod repair;

pub use adjacency::AdjacencyIndex;
pub use mass::{MassProperties, mass_properties, mass_properties_raw};
pub use orientation::{OrientationReport, orient_batch};
pub use repair::MeshRepair;

use crate::errors::{Error, Result};
use crate::float_types::Real;
use nalgebra::{Point3, Rotation3, Vector3};

/// An indexed triangle mesh: flat vertex buffer + index triples.
///
/// Invariant: every index is in range. Constructors validate; internal
/// builders only push indices they just created.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<Real>>,
    /// Triangles as vertex indices; winding determines orientation.
    pub triangles: Vec<[usize; 3]>,
}

impl TriMesh {
    /// A new empty mesh.
    pub const fn new() -> Self {
        TriMesh {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// A mesh with preallocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        TriMesh {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Build a mesh from parts, validating that every index is in range.
    pub fn from_parts(
        vertices: Vec<Point3<Real>>,
        triangles: Vec<[usize; 3]>,
    ) -> Result<Self> {
        for (row, tri) in triangles.iter().enumerate() {
            for &v in tri {
                if v >= vertices.len() {
                    return Err(Error::IndexOutOfRange {
                        triangle: row,
                        vertex: v,
                        vertex_count: vertices.len(),
                    });
                }
            }
        }
        Ok(TriMesh {
            vertices,
            triangles,
        })
    }

    /// Build a mesh from flat coordinate and connectivity buffers.
    ///
    /// `coords` must split into rows of three (x, y, z), `indices` into rows
    /// of three vertex ids; anything else is [`Error::InputShape`].
    pub fn from_raw(coords: &[Real], indices: &[usize]) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(Error::InputShape {
                what: "vertex coordinate matrix",
                columns: 3,
                len: coords.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(Error::InputShape {
                what: "triangle connectivity matrix",
                columns: 3,
                len: indices.len(),
            });
        }

        let vertices = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let triangles = indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();
        Self::from_parts(vertices, triangles)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// The three corner points of triangle `row`.
    pub fn corners(&self, row: usize) -> [Point3<Real>; 3] {
        let [a, b, c] = self.triangles[row];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Non-unit outward-candidate normal of triangle `row` (edge cross product).
    pub fn triangle_normal(&self, row: usize) -> Vector3<Real> {
        let [a, b, c] = self.corners(row);
        (b - a).cross(&(c - a))
    }

    /// Centroid of triangle `row`.
    pub fn triangle_centroid(&self, row: usize) -> Point3<Real> {
        let [a, b, c] = self.corners(row);
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Centroid of the vertex cloud (not the enclosed volume).
    pub fn vertex_centroid(&self) -> Point3<Real> {
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.vertices.len().max(1) as Real)
    }

    /// Vertex positions rigidly transformed into another frame:
    /// `v' = rotation * (v - origin)`.
    pub fn transformed_vertices(
        &self,
        rotation: &Rotation3<Real>,
        origin: &Point3<Real>,
    ) -> Vec<Point3<Real>> {
        self.vertices
            .iter()
            .map(|v| Point3::from(rotation * (v - origin)))
            .collect()
    }

    /// Flip the winding of every triangle in place.
    pub fn flip_all(&mut self) {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_ragged_buffers() {
        let bad_coords = TriMesh::from_raw(&[0.0, 1.0], &[0, 1, 2]);
        assert!(matches!(bad_coords, Err(Error::InputShape { .. })));

        let bad_indices = TriMesh::from_raw(&[0.0; 9], &[0, 1]);
        assert!(matches!(bad_indices, Err(Error::InputShape { .. })));
    }

    #[test]
    fn from_parts_rejects_out_of_range_indices() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let result = TriMesh::from_parts(vertices, vec![[0, 1, 3]]);
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange {
                triangle: 0,
                vertex: 3,
                ..
            })
        ));
    }

    #[test]
    fn normal_follows_winding() {
        let mesh = TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2],
        )
        .unwrap();
        assert!(mesh.triangle_normal(0).z > 0.0);

        let mut flipped = mesh.clone();
        flipped.flip_all();
        assert!(flipped.triangle_normal(0).z < 0.0);
    }
}
