//! Command line arguments

use std::path::PathBuf;

use clap::Parser;
use urdf_flatten::{ConfigError, ConvertConfig};

/// Convert a URDF robot description into world-frame .obj meshes.
#[derive(Parser, Debug)]
#[command(
    name = "urdf2obj",
    about = "Flatten the visual meshes of a URDF into .obj files",
    long_about = "Resolves forward kinematics of a URDF, moves every visual mesh into the \
        world frame and writes them merged into mesh_merged.obj.\n\n\
        EXAMPLES:\n  \
          urdf2obj --urdf_path robot.urdf\n  \
          urdf2obj --urdf_path robot.urdf --multiple_obj --output_dir out\n  \
          urdf2obj --urdf_path robot.urdf --joint shoulder=0.5 --joint elbow=-1.2",
    version
)]
pub struct Args {
    /// Path to the .urdf file.
    #[arg(long = "urdf_path")]
    pub urdf_path: PathBuf,

    /// Export every link mesh to its own .obj file as well.
    #[arg(long = "multiple_obj")]
    pub multiple_obj: bool,

    /// Directory receiving the .obj files.
    #[arg(long = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// RON configuration file; flags given here take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Joint position as NAME=VALUE (rad or m). Repeatable.
    #[arg(long = "joint", value_parser = parse_joint)]
    pub joints: Vec<(String, f32)>,

    /// Search root for package:// mesh URIs. Repeatable.
    #[arg(long = "package_path")]
    pub package_paths: Vec<PathBuf>,
}

impl Args {
    /// Build the conversion config: config file (or defaults) overridden by flags
    pub fn to_config(&self) -> Result<ConvertConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)?,
            None => ConvertConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        config.multiple_obj |= self.multiple_obj;
        config.joint_positions.extend(self.joints.iter().cloned());
        config
            .package_paths
            .extend(self.package_paths.iter().cloned());

        Ok(config)
    }
}

fn parse_joint(s: &str) -> Result<(String, f32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing joint name in '{}'", s));
    }
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid joint value in '{}': {}", s, e))?;
    Ok((name.to_string(), value))
}
