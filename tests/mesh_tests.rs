//! Orientation correction and mass-property integration together

use approx::assert_relative_eq;
use nalgebra::Point3;
use sliceloft::float_types::Real;
use sliceloft::mesh::{AdjacencyIndex, TriMesh, mass_properties, orient_batch};

fn unit_cube() -> TriMesh {
    let coords: Vec<Real> = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
        1.0, 0.0, 1.0, //
        1.0, 1.0, 1.0, //
        0.0, 1.0, 1.0,
    ];
    let indices: Vec<usize> = vec![
        0, 2, 1, 0, 3, 2, // bottom
        4, 5, 6, 4, 6, 7, // top
        0, 1, 5, 0, 5, 4, // front
        3, 7, 6, 3, 6, 2, // back
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    TriMesh::from_raw(&coords, &indices).unwrap()
}

#[test]
fn inward_wound_cube_is_flipped_then_integrates_positive() {
    let mut cube = unit_cube();
    cube.flip_all(); // all triangles wound inward

    let inverted = mass_properties(&cube).unwrap();
    assert!(inverted.is_inside_out());

    let reference = Point3::new(0.5, 0.5, 0.5);
    let report = orient_batch(&cube.vertices.clone(), &mut cube.triangles, &reference, true);
    assert!(report.flipped);

    let props = mass_properties(&cube).unwrap();
    assert!(props.volume > 0.0);
    assert_relative_eq!(props.volume, 1.0, max_relative = 1e-6);
    assert_relative_eq!(props.centroid.y, 0.5, max_relative = 1e-6);
}

#[test]
fn inertia_is_positive_semi_definite_for_an_enclosed_volume() {
    let props = mass_properties(&unit_cube()).unwrap();
    let eigen = nalgebra::SymmetricEigen::new(props.inertia_centroid);
    for value in eigen.eigenvalues.iter() {
        assert!(*value >= -1e-12, "eigenvalue {} negative", value);
    }
}

#[test]
fn scaled_cube_scales_volume_cubically() {
    let mut cube = unit_cube();
    for v in &mut cube.vertices {
        v.coords *= 3.0;
    }
    let props = mass_properties(&cube).unwrap();
    assert_relative_eq!(props.volume, 27.0, max_relative = 1e-6);
    assert_relative_eq!(props.centroid.x, 1.5, max_relative = 1e-6);
}

#[test]
fn adjacency_strips_apex_incident_triangles() {
    // cube plus a spurious apex fanned over the top face
    let mut cube = unit_cube();
    let apex = cube.vertices.len();
    cube.vertices.push(Point3::new(0.5, 0.5, 2.0));
    cube.triangles.push([4, 5, apex]);
    cube.triangles.push([5, 6, apex]);
    cube.triangles.push([6, 7, apex]);
    cube.triangles.push([7, 4, apex]);

    let adjacency = AdjacencyIndex::build(&cube.triangles);
    let apex_rows = adjacency.incident_any(&[apex]);
    assert_eq!(apex_rows.len(), 4);

    // strip them and the cube integrates as before
    let kept: Vec<[usize; 3]> = cube
        .triangles
        .iter()
        .enumerate()
        .filter(|(row, _)| !apex_rows.contains(row))
        .map(|(_, t)| *t)
        .collect();
    let stripped = TriMesh::from_parts(cube.vertices.clone(), kept).unwrap();
    let props = mass_properties(&stripped).unwrap();
    assert_relative_eq!(props.volume, 1.0, max_relative = 1e-6);
}
