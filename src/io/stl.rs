//! STL export of reconstructed surfaces

use crate::float_types::Real;
use crate::mesh::TriMesh;
use std::io::Cursor;

/// Export to ASCII STL
/// Convert this mesh to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use sliceloft::mesh::TriMesh;
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mesh = TriMesh::from_raw(
///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
///     &[0, 1, 2],
/// )?;
/// let text = mesh.to_stl_ascii("my_specimen");
/// assert!(text.starts_with("solid my_specimen"));
/// # Ok(())
/// # }
/// ```
pub fn to_stl_ascii(mesh: &TriMesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for row in 0..mesh.triangle_count() {
        let n = facet_normal(mesh, row);
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.0, n.1, n.2
        ));
        out.push_str("    outer loop\n");
        for p in mesh.corners(row) {
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The resulting `Vec<u8>` can then be written to a file or handled in memory.
pub fn to_stl_binary(mesh: &TriMesh) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::with_capacity(mesh.triangle_count());
    for row in 0..mesh.triangle_count() {
        let n = facet_normal(mesh, row);
        #[allow(clippy::unnecessary_cast)]
        triangles.push(Triangle {
            normal: Normal::new([n.0 as f32, n.1 as f32, n.2 as f32]),
            vertices: mesh
                .corners(row)
                .map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
        });
    }

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Unit facet normal from the winding, zero for degenerate facets.
fn facet_normal(mesh: &TriMesh, row: usize) -> (Real, Real, Real) {
    let n = mesh.triangle_normal(row);
    let len = n.norm();
    if len > 0.0 {
        (n.x / len, n.y / len, n.z / len)
    } else {
        (0.0, 0.0, 0.0)
    }
}

impl TriMesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}
