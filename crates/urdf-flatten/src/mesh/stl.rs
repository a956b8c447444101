//! STL file loading

use std::io::BufReader;
use std::path::Path;

use super::{MeshError, TriMesh};

/// Load an STL file (ASCII or binary) as an indexed mesh
pub fn load_stl(path: impl AsRef<Path>) -> Result<TriMesh, MeshError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);

    let mesh = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse(e.to_string()))?;
    let mesh = from_indexed(&mesh)?;

    tracing::debug!(
        "Loaded STL {:?}: {} vertices, {} faces",
        path,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// stl_io already merges shared vertices, so only the index width changes
fn from_indexed(mesh: &stl_io::IndexedMesh) -> Result<TriMesh, MeshError> {
    let vertices = mesh.vertices.iter().map(|v| [v[0], v[1], v[2]]).collect();

    let faces = mesh
        .faces
        .iter()
        .map(|face| {
            let mut out = [0u32; 3];
            for (slot, &index) in out.iter_mut().zip(face.vertices.iter()) {
                *slot = u32::try_from(index).map_err(|_| MeshError::TooLarge(index))?;
            }
            Ok(out)
        })
        .collect::<Result<Vec<_>, MeshError>>()?;

    let mesh = TriMesh::new(vertices, faces);
    mesh.validate()?;
    Ok(mesh)
}
