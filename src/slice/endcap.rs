//! End-cap meshing for open tube ends

use crate::errors::{Error, Result};
use crate::fit::fit_plane;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::ops::Range;

/// How an open end of the stitched tube gets closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCapStyle {
    /// Fan-triangulate the boundary ring against its centroid. Adds one apex
    /// vertex per cap; robust for star-shaped rings.
    #[default]
    Fan,
    /// Triangulate the ring against itself with a Delaunay pass and keep the
    /// triangles on the interior side of the boundary. Adds no vertices;
    /// handles non-convex rings.
    Delaunay,
    /// Leave the end open.
    None,
}

/// Close a ring by fanning it against its centroid.
///
/// The apex vertex is appended to `vertices`; returned triangles use global
/// ids. Winding is consistent within the fan and fixed up afterwards by the
/// batch orientation vote.
pub fn fan_cap(vertices: &mut Vec<Point3<Real>>, ring: Range<usize>) -> Vec<[usize; 3]> {
    let n = ring.len();
    let sum = vertices[ring.clone()]
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    let apex = vertices.len();
    vertices.push(Point3::from(sum / n as Real));

    let mut triangles = Vec::with_capacity(n);
    for i in 0..n {
        let a = ring.start + i;
        let b = ring.start + (i + 1) % n;
        triangles.push([a, b, apex]);
    }
    triangles
}

/// Close a ring against itself with a Delaunay pass.
///
/// The flattened ring points are triangulated as a point set, which covers
/// the convex hull; candidate triangles are then classified inside/outside by
/// a signed side test against an incident boundary edge (a ring-adjacent
/// index pair). A triangle with no incident boundary edge falls back to the
/// nearest pair of its corners by cyclic index distance. The side holding the
/// majority of classified triangles is kept, on the assumption that the
/// boundary mostly encloses the interior.
pub fn delaunay_cap(ring_points: &[Point3<Real>], offset: usize) -> Result<Vec<[usize; 3]>> {
    let n = ring_points.len();
    let plane = fit_plane(ring_points)?;
    let flat: Vec<(Real, Real)> = ring_points
        .iter()
        .map(|p| {
            let q = plane.flatten(p);
            (q.x, q.y)
        })
        .collect();

    let embedded: Vec<Point2<Real>> = flat.iter().map(|&(x, y)| Point2::new(x, y)).collect();
    let triangulation = DelaunayTriangulation::<Point2<Real>>::bulk_load_stable(embedded)
        .map_err(|e| Error::Triangulation(e.to_string()))?;
    if triangulation.num_vertices() != n {
        return Err(Error::Triangulation(
            "coincident points in end-cap boundary".into(),
        ));
    }

    let mut corners_and_sides: Vec<([usize; 3], Real)> = Vec::new();
    for face in triangulation.inner_faces() {
        let corners = face.vertices().map(|v| v.index());
        let centroid = (
            (flat[corners[0]].0 + flat[corners[1]].0 + flat[corners[2]].0) / 3.0,
            (flat[corners[0]].1 + flat[corners[1]].1 + flat[corners[2]].1) / 3.0,
        );

        let pairs = [
            (corners[0], corners[1]),
            (corners[1], corners[2]),
            (corners[0], corners[2]),
        ];
        let boundary_edge = pairs.iter().copied().find(|&(u, v)| ring_distance(u, v, n) == 1);
        let (u, v) = boundary_edge.unwrap_or_else(|| {
            // degenerate candidate: no incident boundary edge, use the
            // nearest pair along the ring instead
            pairs
                .into_iter()
                .min_by_key(|&(u, v)| ring_distance(u, v, n))
                .unwrap()
        });

        // orient the edge along the ring's traversal before taking the side
        let dist = ring_distance(u, v, n);
        let (eu, ev) = if (u + dist) % n == v { (u, v) } else { (v, u) };
        let edge = (flat[ev].0 - flat[eu].0, flat[ev].1 - flat[eu].1);
        let to_centroid = (centroid.0 - flat[eu].0, centroid.1 - flat[eu].1);
        let side = edge.0 * to_centroid.1 - edge.1 * to_centroid.0;

        corners_and_sides.push((corners, side));
    }

    let positive = corners_and_sides.iter().filter(|(_, s)| *s > 0.0).count();
    let negative = corners_and_sides.iter().filter(|(_, s)| *s < 0.0).count();
    let keep_positive = positive >= negative;

    Ok(corners_and_sides
        .into_iter()
        .filter(|&(_, side)| {
            side != 0.0 && ((side > 0.0) == keep_positive)
        })
        .map(|([a, b, c], _)| [offset + a, offset + b, offset + c])
        .collect())
}

/// Cyclic index distance along a ring of `n` points.
fn ring_distance(u: usize, v: usize, n: usize) -> usize {
    let forward = (v + n - u) % n;
    forward.min(n - forward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_cap_adds_apex_and_n_triangles() {
        let mut vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let triangles = fan_cap(&mut vertices, 0..4);

        assert_eq!(vertices.len(), 5);
        assert_eq!(vertices[4], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles.len(), 4);
        assert!(triangles.iter().all(|t| t[2] == 4));
    }

    #[test]
    fn square_cap_is_two_triangles() {
        let ring = vec![
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(1.0, 0.0, 5.0),
            Point3::new(1.0, 1.0, 5.0),
            Point3::new(0.0, 1.0, 5.0),
        ];
        let triangles = delaunay_cap(&ring, 10).unwrap();
        assert_eq!(triangles.len(), 2);
        assert!(triangles.iter().flatten().all(|&v| (10..14).contains(&v)));
    }

    #[test]
    fn concave_cap_skips_the_notch() {
        // an L-shaped ring; the notch is the square x > 1, y > 1
        let ring: Vec<Point3<Real>> = [
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]
        .iter()
        .map(|&(x, y)| Point3::new(x, y, 0.0))
        .collect();

        let triangles = delaunay_cap(&ring, 0).unwrap();

        let area: Real = triangles
            .iter()
            .map(|&[a, b, c]| {
                let (p, q, r) = (ring[a], ring[b], ring[c]);
                ((q - p).cross(&(r - p))).norm() / 2.0
            })
            .sum();
        assert!((area - 3.0).abs() < 1e-9, "kept area {} != L area", area);

        for &[a, b, c] in &triangles {
            let cx = (ring[a].x + ring[b].x + ring[c].x) / 3.0;
            let cy = (ring[a].y + ring[b].y + ring[c].y) / 3.0;
            assert!(!(cx > 1.0 && cy > 1.0), "triangle centroid in the notch");
        }
    }
}
