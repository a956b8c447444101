//! Wavefront OBJ loading (via tobj) and export

use std::io::{BufWriter, Write};
use std::path::Path;

use super::{MeshError, TriMesh};

/// Load an OBJ file, one mesh per object it contains.
///
/// Polygons are triangulated and positions re-indexed to a single index stream.
/// Objects without geometry are skipped.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Vec<TriMesh>, MeshError> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| match e {
        tobj::LoadError::OpenFileFailed => MeshError::Io(format!("cannot open {:?}", path)),
        other => MeshError::Parse(other.to_string()),
    })?;

    let mut meshes = Vec::with_capacity(models.len());
    for model in models {
        if model.mesh.positions.is_empty() {
            tracing::warn!("Skipping empty object '{}' in {:?}", model.name, path);
            continue;
        }
        meshes.push(TriMesh::from_flat(&model.mesh.positions, &model.mesh.indices)?);
    }

    tracing::debug!("Loaded OBJ {:?}: {} object(s)", path, meshes.len());
    Ok(meshes)
}

/// Write a mesh as OBJ text: `v` lines followed by 1-based `f` lines
pub fn write_obj<W: Write>(mesh: &TriMesh, name: &str, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "# urdf2obj")?;
    writeln!(
        writer,
        "# vertices: {} faces: {}",
        mesh.vertex_count(),
        mesh.face_count()
    )?;
    writeln!(writer, "o {}", name)?;

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
    }
    for f in &mesh.faces {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    Ok(())
}

/// Save a mesh to an OBJ file, named after the file stem
pub fn save_obj(mesh: &TriMesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");

    let file = std::fs::File::create(path).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, name, &mut writer).map_err(|e| MeshError::Write(e.to_string()))?;
    writer.flush().map_err(|e| MeshError::Write(e.to_string()))?;

    Ok(())
}
