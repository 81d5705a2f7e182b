//! Polyhedral mass properties by surface integration
//!
//! Closed-form divergence-theorem evaluation over a closed triangulated
//! surface: each triangle contributes signed terms to ten accumulators (the
//! volume integrals of 1, x, y, z, x², y², z², xy, yz, zx), from which
//! volume, centroid and the inertia tensor follow without any volumetric
//! sampling.
//!
//! The sign of the volume depends on mesh orientation. Callers run the
//! orientation corrector first; a negative volume is reported as-is and
//! serves as the inverted-orientation diagnostic.

use super::TriMesh;
use crate::errors::{Error, Result};
use crate::float_types::{Real, tolerance};
use nalgebra::{Matrix3, Point3};

/// Rigid-body mass properties of an enclosed volume (unit density).
#[derive(Debug, Clone, PartialEq)]
pub struct MassProperties {
    /// Signed enclosed volume; negative means the surface is wound inward.
    pub volume: Real,
    /// Centroid of the enclosed volume.
    pub centroid: Point3<Real>,
    /// Inertia tensor about the origin.
    pub inertia_origin: Matrix3<Real>,
    /// Inertia tensor about the centroid (parallel-axis corrected).
    pub inertia_centroid: Matrix3<Real>,
}

impl MassProperties {
    /// Whether the surface encloses its volume with inward-facing normals.
    pub fn is_inside_out(&self) -> bool {
        self.volume < 0.0
    }
}

/// f- and g-polynomials of one coordinate over a triangle (Eberly's
/// subexpression scheme for the face integrals).
#[inline]
fn subexpressions(w0: Real, w1: Real, w2: Real) -> (Real, Real, Real, Real, Real, Real) {
    let temp0 = w0 + w1;
    let f1 = temp0 + w2;
    let temp1 = w0 * w0;
    let temp2 = temp1 + w1 * temp0;
    let f2 = temp2 + w2 * f1;
    let f3 = w0 * temp1 + w1 * temp2 + w2 * f2;
    let g0 = f2 + w0 * (f1 + w0);
    let g1 = f2 + w1 * (f1 + w1);
    let g2 = f2 + w2 * (f1 + w2);
    (f1, f2, f3, g0, g1, g2)
}

/// Integrate mass properties over a closed triangulated surface.
///
/// A numerically zero enclosed volume (open surface, fully collapsed mesh)
/// is [`Error::ZeroVolume`], since the first moments are undefined.
pub fn mass_properties(mesh: &TriMesh) -> Result<MassProperties> {
    let mut intg = [0.0 as Real; 10];

    for row in 0..mesh.triangle_count() {
        let [p0, p1, p2] = mesh.corners(row);
        let (x0, y0, z0) = (p0.x, p0.y, p0.z);
        let (x1, y1, z1) = (p1.x, p1.y, p1.z);
        let (x2, y2, z2) = (p2.x, p2.y, p2.z);

        // edge vectors and their cross product (non-unit facet normal)
        let (a1, b1, c1) = (x1 - x0, y1 - y0, z1 - z0);
        let (a2, b2, c2) = (x2 - x0, y2 - y0, z2 - z0);
        let d0 = b1 * c2 - b2 * c1;
        let d1 = a2 * c1 - a1 * c2;
        let d2 = a1 * b2 - a2 * b1;

        let (f1x, f2x, f3x, g0x, g1x, g2x) = subexpressions(x0, x1, x2);
        let (_f1y, f2y, f3y, g0y, g1y, g2y) = subexpressions(y0, y1, y2);
        let (_f1z, f2z, f3z, g0z, g1z, g2z) = subexpressions(z0, z1, z2);

        intg[0] += d0 * f1x;
        intg[1] += d0 * f2x;
        intg[2] += d1 * f2y;
        intg[3] += d2 * f2z;
        intg[4] += d0 * f3x;
        intg[5] += d1 * f3y;
        intg[6] += d2 * f3z;
        intg[7] += d0 * (y0 * g0x + y1 * g1x + y2 * g2x);
        intg[8] += d1 * (z0 * g0y + z1 * g1y + z2 * g2y);
        intg[9] += d2 * (x0 * g0z + x1 * g1z + x2 * g2z);
    }

    const SCALE: [Real; 10] = [
        1.0 / 6.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 120.0,
        1.0 / 120.0,
        1.0 / 120.0,
    ];
    for (value, scale) in intg.iter_mut().zip(SCALE) {
        *value *= scale;
    }

    let volume = intg[0];
    if volume.abs() < tolerance() {
        return Err(Error::ZeroVolume);
    }
    let centroid = Point3::new(intg[1] / volume, intg[2] / volume, intg[3] / volume);

    // inertia about the origin, assembled from the second moments
    let ixx = intg[5] + intg[6];
    let iyy = intg[4] + intg[6];
    let izz = intg[4] + intg[5];
    let ixy = -intg[7];
    let iyz = -intg[8];
    let ixz = -intg[9];
    let inertia_origin = Matrix3::new(
        ixx, ixy, ixz, //
        ixy, iyy, iyz, //
        ixz, iyz, izz,
    );

    // parallel-axis transfer: I_cg = I_origin - volume * (|cg|^2 * E - cg cg^T)
    let cg = centroid.coords;
    let shift = volume * (cg.norm_squared() * Matrix3::identity() - cg * cg.transpose());
    let inertia_centroid = inertia_origin - shift;

    Ok(MassProperties {
        volume,
        centroid,
        inertia_origin,
        inertia_centroid,
    })
}

/// [`mass_properties`] over flat coordinate and connectivity buffers.
///
/// Both buffers must split into rows of exactly three
/// ([`Error::InputShape`] otherwise).
pub fn mass_properties_raw(coords: &[Real], indices: &[usize]) -> Result<MassProperties> {
    let mesh = TriMesh::from_raw(coords, indices)?;
    mass_properties(&mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit cube from (0,0,0) to (1,1,1), wound outward.
    pub(crate) fn unit_cube() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2], // bottom, -z
            [4, 5, 6],
            [4, 6, 7], // top, +z
            [0, 1, 5],
            [0, 5, 4], // front, -y
            [3, 7, 6],
            [3, 6, 2], // back, +y
            [0, 4, 7],
            [0, 7, 3], // left, -x
            [1, 2, 6],
            [1, 6, 5], // right, +x
        ];
        TriMesh::from_parts(vertices, triangles).unwrap()
    }

    #[test]
    fn unit_cube_mass_properties() {
        let props = mass_properties(&unit_cube()).unwrap();

        assert_relative_eq!(props.volume, 1.0, max_relative = 1e-6);
        assert_relative_eq!(props.centroid.x, 0.5, max_relative = 1e-6);
        assert_relative_eq!(props.centroid.y, 0.5, max_relative = 1e-6);
        assert_relative_eq!(props.centroid.z, 0.5, max_relative = 1e-6);

        // about the centroid: diagonal 1/6, off-diagonal 0
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 / 6.0 } else { 0.0 };
                assert_relative_eq!(
                    props.inertia_centroid[(i, j)],
                    expected,
                    epsilon = 1e-9,
                    max_relative = 1e-6
                );
            }
        }

        // about the origin: diagonal 2/3, off-diagonal -1/4
        assert_relative_eq!(props.inertia_origin[(0, 0)], 2.0 / 3.0, max_relative = 1e-6);
        assert_relative_eq!(props.inertia_origin[(0, 1)], -0.25, max_relative = 1e-6);
    }

    #[test]
    fn inverted_cube_reports_negative_volume() {
        let mut cube = unit_cube();
        cube.flip_all();
        let props = mass_properties(&cube).unwrap();
        assert!(props.is_inside_out());
        assert_relative_eq!(props.volume, -1.0, max_relative = 1e-6);
    }

    #[test]
    fn tensor_is_symmetric() {
        let props = mass_properties(&unit_cube()).unwrap();
        let diff = props.inertia_centroid - props.inertia_centroid.transpose();
        assert!(diff.norm() < 1e-12);
    }

    #[test]
    fn raw_entry_point_validates_shape() {
        let result = mass_properties_raw(&[0.0, 1.0, 2.0, 3.0], &[0, 1, 2]);
        assert!(matches!(result, Err(Error::InputShape { .. })));
    }
}
