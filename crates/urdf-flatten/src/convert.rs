//! URDF to OBJ conversion

use std::path::{Path, PathBuf};

use crate::config::ConvertConfig;
use crate::import::{ImportError, ImportOptions, import_visual_meshes};
use crate::mesh::{self, MeshError, TriMesh};

/// Errors from a whole conversion run
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("Cannot create output directory {path:?}: {reason}")]
    OutputDir { path: PathBuf, reason: String },

    #[error("Failed to write {path:?}")]
    Write { path: PathBuf, source: MeshError },
}

/// Summary of a finished conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertReport {
    /// Per-mesh files, in forward-kinematics order (empty unless enabled)
    pub extracted: Vec<PathBuf>,
    /// The merged mesh file
    pub merged: PathBuf,
    /// Number of posed meshes that were merged
    pub mesh_count: usize,
    pub vertex_count: usize,
    pub face_count: usize,
}

/// Convert a URDF file into world-frame OBJ files as described by `config`
pub fn convert(urdf_path: &Path, config: &ConvertConfig) -> Result<ConvertReport, ConvertError> {
    tracing::info!("Converting {:?}", urdf_path);

    let options = ImportOptions {
        base_dir: None,
        package_paths: config.package_paths.clone(),
        joint_positions: config.joint_positions.clone(),
    };
    let posed = import_visual_meshes(urdf_path, &options)?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| ConvertError::OutputDir {
        path: config.output_dir.clone(),
        reason: e.to_string(),
    })?;

    let mut world_meshes: Vec<TriMesh> = Vec::with_capacity(posed.len());
    let mut extracted = Vec::new();

    for (idx, posed_mesh) in posed.iter().enumerate() {
        let world = posed_mesh.to_world();

        if config.multiple_obj {
            let path = config.extracted_path(idx);
            write(&world, &path)?;
            tracing::info!("Wrote {:?} (link '{}')", path, posed_mesh.link);
            extracted.push(path);
        }

        world_meshes.push(world);
    }

    let merged = mesh::merge_meshes(&world_meshes)?;
    let merged_path = config.merged_path();
    write(&merged, &merged_path)?;

    tracing::info!(
        "Wrote {:?}: {} meshes, {} vertices, {} faces",
        merged_path,
        world_meshes.len(),
        merged.vertex_count(),
        merged.face_count()
    );

    Ok(ConvertReport {
        extracted,
        merged: merged_path,
        mesh_count: world_meshes.len(),
        vertex_count: merged.vertex_count(),
        face_count: merged.face_count(),
    })
}

fn write(mesh: &TriMesh, path: &Path) -> Result<(), ConvertError> {
    mesh::save_obj(mesh, path).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_write_error_keeps_cause_out_of_message() {
        let error = ConvertError::Write {
            path: PathBuf::from("out/mesh_merged.obj"),
            source: MeshError::Io("disk full".to_string()),
        };

        assert!(!error.to_string().contains("disk full"));
        let cause = error.source().unwrap();
        assert_eq!(cause.to_string(), "IO error: disk full");
    }
}
