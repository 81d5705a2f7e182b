//! Node-to-triangle adjacency lookup

use std::collections::HashMap;

/// Vertex-to-triangle incidence index over a triangle array.
///
/// Answers "which triangle rows touch this set of vertex ids", with a
/// connectivity threshold: a triangle qualifies when it shares *more than*
/// `threshold` of the queried ids (threshold 0, the default, means any shared
/// vertex). Used to collect the triangles on a boundary ring, or everything
/// incident to a single apex before re-meshing an end cap.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
    vertex_to_triangles: HashMap<usize, Vec<usize>>,
    triangles: Vec<[usize; 3]>,
}

impl AdjacencyIndex {
    /// Build the incidence map for a triangle array.
    pub fn build(triangles: &[[usize; 3]]) -> Self {
        let mut vertex_to_triangles: HashMap<usize, Vec<usize>> = HashMap::new();
        for (row, tri) in triangles.iter().enumerate() {
            for &v in tri {
                vertex_to_triangles.entry(v).or_default().push(row);
            }
        }
        AdjacencyIndex {
            vertex_to_triangles,
            triangles: triangles.to_vec(),
        }
    }

    /// Triangle rows incident to vertex `v`.
    pub fn triangles_for(&self, v: usize) -> &[usize] {
        self.vertex_to_triangles.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Triangle rows sharing more than `threshold` (0–2) of the queried ids.
    ///
    /// Rows come back sorted and deduplicated.
    pub fn incident_triangles(&self, ids: &[usize], threshold: usize) -> Vec<usize> {
        debug_assert!(threshold <= 2, "a triangle has only 3 vertices");

        let query: std::collections::HashSet<usize> = ids.iter().copied().collect();
        let mut rows: Vec<usize> = Vec::new();
        for &v in &query {
            for &row in self.triangles_for(v) {
                let shared = self.triangles[row]
                    .iter()
                    .filter(|id| query.contains(id))
                    .count();
                if shared > threshold {
                    rows.push(row);
                }
            }
        }
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Triangle rows touching any of the queried ids (threshold 0).
    pub fn incident_any(&self, ids: &[usize]) -> Vec<usize> {
        self.incident_triangles(ids, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      3
    //    / | \
    //   0--1--2    triangles: (0,1,3), (1,2,3)
    fn two_triangles() -> Vec<[usize; 3]> {
        vec![[0, 1, 3], [1, 2, 3]]
    }

    #[test]
    fn any_incidence_finds_both_rows() {
        let adj = AdjacencyIndex::build(&two_triangles());
        assert_eq!(adj.incident_any(&[1]), vec![0, 1]);
        assert_eq!(adj.incident_any(&[0]), vec![0]);
        assert_eq!(adj.incident_any(&[4]), Vec::<usize>::new());
    }

    #[test]
    fn threshold_requires_shared_edges() {
        let adj = AdjacencyIndex::build(&two_triangles());
        // rows sharing more than one of {1, 3}: both triangles contain the edge 1-3
        assert_eq!(adj.incident_triangles(&[1, 3], 1), vec![0, 1]);
        // more than one of {0, 2}: no triangle contains both
        assert_eq!(adj.incident_triangles(&[0, 2], 1), Vec::<usize>::new());
        // more than two of {1, 2, 3}: the full triangle (1,2,3) only
        assert_eq!(adj.incident_triangles(&[1, 2, 3], 2), vec![1]);
    }
}
