//! External mesh-repair collaborator contract

use super::TriMesh;
use crate::errors::Warning;

/// Best-effort topology and aspect-ratio improvement, supplied by the caller.
///
/// Repair rewrites connectivity only: it returns a replacement triangle array
/// over the *same* vertex buffer (dropping duplicate-identical triangles,
/// re-splitting bad bands, stripping slivers). The pipeline treats repair as
/// advisory: an implementation may fail for any reason and the
/// reconstruction continues with the unrepaired mesh and a
/// [`Warning::RepairFailed`] attached to the result.
pub trait MeshRepair {
    /// Return improved connectivity for `mesh`, or an error describing why not.
    fn repair(&self, mesh: &TriMesh) -> Result<Vec<[usize; 3]>, Box<dyn std::error::Error>>;
}

/// Run the collaborator, degrading any failure to a warning.
pub(crate) fn try_repair(
    mesh: TriMesh,
    repairer: &dyn MeshRepair,
    warnings: &mut Vec<Warning>,
) -> TriMesh {
    let outcome = repairer
        .repair(&mesh)
        .and_then(|triangles| {
            TriMesh::from_parts(mesh.vertices.clone(), triangles).map_err(|e| e.to_string().into())
        });
    match outcome {
        Ok(repaired) => repaired,
        Err(err) => {
            let warning = Warning::RepairFailed(err.to_string());
            log::warn!("{}", warning);
            warnings.push(warning);
            mesh
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingRepair;
    impl MeshRepair for FailingRepair {
        fn repair(&self, _mesh: &TriMesh) -> Result<Vec<[usize; 3]>, Box<dyn std::error::Error>> {
            Err("synthetic failure".into())
        }
    }

    struct DedupRepair;
    impl MeshRepair for DedupRepair {
        fn repair(&self, mesh: &TriMesh) -> Result<Vec<[usize; 3]>, Box<dyn std::error::Error>> {
            let mut triangles = mesh.triangles.clone();
            triangles.dedup();
            Ok(triangles)
        }
    }

    struct OutOfRangeRepair;
    impl MeshRepair for OutOfRangeRepair {
        fn repair(&self, _mesh: &TriMesh) -> Result<Vec<[usize; 3]>, Box<dyn std::error::Error>> {
            Ok(vec![[0, 1, 99]])
        }
    }

    fn triangle_mesh() -> TriMesh {
        TriMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2, 0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn failure_keeps_the_mesh_and_warns() {
        let mesh = triangle_mesh();
        let mut warnings = Vec::new();
        let kept = try_repair(mesh.clone(), &FailingRepair, &mut warnings);
        assert_eq!(kept.triangles, mesh.triangles);
        assert!(matches!(warnings.as_slice(), [Warning::RepairFailed(_)]));
    }

    #[test]
    fn success_replaces_the_connectivity() {
        let mut warnings = Vec::new();
        let repaired = try_repair(triangle_mesh(), &DedupRepair, &mut warnings);
        assert_eq!(repaired.triangles, vec![[0, 1, 2]]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn invalid_repair_output_is_rejected_not_trusted() {
        let mesh = triangle_mesh();
        let mut warnings = Vec::new();
        let kept = try_repair(mesh.clone(), &OutOfRangeRepair, &mut warnings);
        assert_eq!(kept.triangles, mesh.triangles);
        assert_eq!(warnings.len(), 1);
    }
}
