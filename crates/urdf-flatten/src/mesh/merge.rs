//! Concatenating meshes into one

use super::{MeshError, TriMesh};

/// Merge meshes into a single mesh.
///
/// Vertices are stacked in input order. Each mesh's faces are shifted by the
/// number of vertices appended before it, so the first mesh keeps its indices.
pub fn merge_meshes<'a, I>(meshes: I) -> Result<TriMesh, MeshError>
where
    I: IntoIterator<Item = &'a TriMesh>,
{
    let mut merged = TriMesh::default();

    for mesh in meshes {
        mesh.validate()?;

        let offset = rebase_offset(merged.vertices.len())?;
        rebase_offset(merged.vertices.len() + mesh.vertices.len())?;

        merged.vertices.extend_from_slice(&mesh.vertices);
        merged
            .faces
            .extend(mesh.faces.iter().map(|f| f.map(|i| i + offset)));
    }

    Ok(merged)
}

/// Face index offset for a mesh appended after `len` vertices
fn rebase_offset(len: usize) -> Result<u32, MeshError> {
    u32::try_from(len).map_err(|_| MeshError::TooLarge(len))
}
