//! Conversion configuration
//!
//! Read from RON. Every field has a default, so a config file only needs the
//! values it wants to change.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::kinematics::JointPositions;

/// Configuration error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(String),
    /// Error during deserialization
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Settings for one URDF to OBJ conversion
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConvertConfig {
    /// Configuration format version
    pub version: u32,
    /// Directory receiving the .obj files (created if missing)
    pub output_dir: PathBuf,
    /// Also write every posed mesh to its own file
    pub multiple_obj: bool,
    /// File name of the merged mesh
    pub merged_file_name: String,
    /// Per-mesh files are named `<prefix><index>.obj`
    pub extracted_prefix: String,
    /// Joint positions for forward kinematics (rad or m); missing joints are 0
    pub joint_positions: JointPositions,
    /// Search roots for `package://` mesh URIs
    pub package_paths: Vec<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            output_dir: PathBuf::from("."),
            multiple_obj: false,
            merged_file_name: "mesh_merged.obj".to_string(),
            extracted_prefix: "mesh_extracted_".to_string(),
            joint_positions: JointPositions::new(),
            package_paths: Vec::new(),
        }
    }
}

impl ConvertConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        if config.version > Self::CURRENT_VERSION {
            tracing::warn!(
                "Config version {} is newer than supported version {}",
                config.version,
                Self::CURRENT_VERSION
            );
        }
        Ok(config)
    }

    /// Path of the merged output file
    pub fn merged_path(&self) -> PathBuf {
        self.output_dir.join(&self.merged_file_name)
    }

    /// Path of the per-mesh output file for mesh `index`
    pub fn extracted_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.obj", self.extracted_prefix, index))
    }
}
