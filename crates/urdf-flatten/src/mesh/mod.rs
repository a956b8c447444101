//! Triangle meshes: loading (STL, OBJ), primitives, posing, merging and OBJ export

mod merge;
mod obj;
mod primitive;
mod stl;
mod transform;

use std::path::Path;

pub use merge::merge_meshes;
pub use obj::{load_obj, save_obj, write_obj};
pub use primitive::{box_mesh, cylinder_mesh, sphere_mesh};
pub use stl::load_stl;
pub use transform::apply_pose;

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    /// Vertex positions
    pub vertices: Vec<[f32; 3]>,
    /// Triangles as indices into `vertices`
    pub faces: Vec<[u32; 3]>,
}

impl TriMesh {
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Check that every face index refers to an existing vertex
    pub fn validate(&self) -> Result<(), MeshError> {
        let count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count: count,
                });
            }
        }
        Ok(())
    }

    /// Build a mesh from a flat position buffer and a flat triangle index buffer
    pub(crate) fn from_flat(positions: &[f32], indices: &[u32]) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Err(MeshError::Parse(format!(
                "buffer lengths are not multiples of 3 ({} positions, {} indices)",
                positions.len(),
                indices.len()
            )));
        }

        let vertices = positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
        let faces = indices.chunks_exact(3).map(|f| [f[0], f[1], f[2]]).collect();

        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }
}

/// Detect mesh format from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    Unknown,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("obj") => MeshFormat::Obj,
            _ => MeshFormat::Unknown,
        }
    }
}

/// Load any supported mesh format.
///
/// Files holding several objects (OBJ) yield one mesh per object.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Vec<TriMesh>, MeshError> {
    let path = path.as_ref();

    match MeshFormat::from_path(path) {
        MeshFormat::Stl => Ok(vec![load_stl(path)?]),
        MeshFormat::Obj => load_obj(path),
        MeshFormat::Unknown => Err(MeshError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}

/// Mesh-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Write error: {0}")]
    Write(String),
    #[error("Unsupported format: {0} (only STL and OBJ are supported)")]
    UnsupportedFormat(String),
    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Merged mesh exceeds the u32 index range ({0} vertices)")]
    TooLarge(usize),
}
