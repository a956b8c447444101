//! Applying a homogeneous pose to mesh vertices

use glam::{Mat4, Vec3};

use super::TriMesh;

/// Transform every vertex of `mesh` by `pose`, treating vertices as points (w = 1).
///
/// Faces are carried over unchanged.
pub fn apply_pose(mesh: &TriMesh, pose: &Mat4) -> TriMesh {
    let vertices = mesh
        .vertices
        .iter()
        .map(|v| pose.transform_point3(Vec3::from(*v)).to_array())
        .collect();

    TriMesh::new(vertices, mesh.faces.clone())
}
