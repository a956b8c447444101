//! URDF import: visual geometry of every link with its world pose

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};

use crate::kinematics::{JointPositions, KinematicTree, KinematicsError};
use crate::mesh::{self, MeshError, TriMesh};
use crate::types::Pose;

/// Import options for URDF loading
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Base directory for resolving relative mesh paths (defaults to the URDF's directory)
    pub base_dir: Option<PathBuf>,
    /// Search roots for `package://` mesh URIs
    pub package_paths: Vec<PathBuf>,
    /// Joint configuration used for forward kinematics
    pub joint_positions: JointPositions,
}

/// Errors that can occur during URDF import
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to parse URDF: {0}")]
    UrdfParse(String),

    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    #[error("Mesh file not found: {path}")]
    MeshNotFound { path: String },

    #[error("Failed to load mesh '{path}'")]
    MeshLoad { path: String, source: MeshError },
}

/// One visual mesh together with the pose that places it in the world frame
#[derive(Debug, Clone)]
pub struct PosedMesh {
    /// Name of the link carrying the visual
    pub link: String,
    /// Mesh in its visual frame
    pub mesh: TriMesh,
    /// World transform (link pose * visual origin * mesh scale)
    pub pose: Mat4,
}

impl PosedMesh {
    /// The mesh with its vertices moved into the world frame
    pub fn to_world(&self) -> TriMesh {
        mesh::apply_pose(&self.mesh, &self.pose)
    }
}

/// Read a URDF file
pub fn load_robot(urdf_path: &Path) -> Result<urdf_rs::Robot, ImportError> {
    urdf_rs::read_file(urdf_path).map_err(|e| ImportError::UrdfParse(e.to_string()))
}

/// Load a URDF file and resolve the world pose of every visual mesh
pub fn import_visual_meshes(
    urdf_path: &Path,
    options: &ImportOptions,
) -> Result<Vec<PosedMesh>, ImportError> {
    let robot = load_robot(urdf_path)?;

    let base_dir = options.base_dir.clone().unwrap_or_else(|| {
        urdf_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    visual_meshes(&robot, &base_dir, options)
}

/// Resolve the visual meshes of a parsed robot.
///
/// Links are visited root first with parents before children; visuals keep
/// their declaration order, and files holding several objects yield one entry each.
pub fn visual_meshes(
    robot: &urdf_rs::Robot,
    base_dir: &Path,
    options: &ImportOptions,
) -> Result<Vec<PosedMesh>, ImportError> {
    let tree = KinematicTree::from_robot(robot)?;
    let link_poses = tree.link_poses(&options.joint_positions)?;

    let links: HashMap<&str, &urdf_rs::Link> =
        robot.links.iter().map(|l| (l.name.as_str(), l)).collect();

    let mut posed = Vec::new();
    for link_pose in &link_poses {
        let Some(link) = links.get(link_pose.link.as_str()) else {
            continue;
        };

        for visual in &link.visual {
            let origin = link_pose.transform * Pose::from(&visual.origin).to_mat4();
            let (meshes, scale) = load_geometry(&visual.geometry, base_dir, &options.package_paths)?;
            let pose = origin * Mat4::from_scale(scale);

            for mesh in meshes {
                if mesh.vertices.is_empty() {
                    tracing::warn!("Skipping empty visual mesh on link '{}'", link.name);
                    continue;
                }
                posed.push(PosedMesh {
                    link: link.name.clone(),
                    mesh,
                    pose,
                });
            }
        }
    }

    tracing::info!(
        "Resolved {} visual mesh(es) over {} link(s) of '{}'",
        posed.len(),
        link_poses.len(),
        robot.name
    );
    Ok(posed)
}

/// Load or tessellate a visual geometry, returning the meshes and their scale
fn load_geometry(
    geometry: &urdf_rs::Geometry,
    base_dir: &Path,
    package_paths: &[PathBuf],
) -> Result<(Vec<TriMesh>, Vec3), ImportError> {
    let result = match geometry {
        urdf_rs::Geometry::Mesh { filename, scale } => {
            let path = resolve_mesh_path(filename, base_dir, package_paths)?;
            tracing::debug!("Loading mesh {:?}", path);
            let meshes = mesh::load_mesh(&path).map_err(|source| ImportError::MeshLoad {
                path: filename.clone(),
                source,
            })?;
            let scale = scale
                .as_ref()
                .map(|s| Vec3::new(s.0[0] as f32, s.0[1] as f32, s.0[2] as f32))
                .unwrap_or(Vec3::ONE);
            (meshes, scale)
        }

        urdf_rs::Geometry::Box { size } => (
            vec![mesh::box_mesh([
                size.0[0] as f32,
                size.0[1] as f32,
                size.0[2] as f32,
            ])],
            Vec3::ONE,
        ),

        urdf_rs::Geometry::Cylinder { radius, length } => (
            vec![mesh::cylinder_mesh(*radius as f32, *length as f32)],
            Vec3::ONE,
        ),

        urdf_rs::Geometry::Sphere { radius } => {
            (vec![mesh::sphere_mesh(*radius as f32)], Vec3::ONE)
        }

        urdf_rs::Geometry::Capsule { radius, length } => {
            // Approximate capsule as cylinder
            (
                vec![mesh::cylinder_mesh(*radius as f32, *length as f32)],
                Vec3::ONE,
            )
        }
    };

    Ok(result)
}

/// Resolve a mesh filename from a URDF into an existing file path.
///
/// Relative paths are joined to `base_dir`. `package://<pkg>/<rel>` is looked up as
/// `<root>/<pkg>/<rel>` then `<root>/<rel>` for every package path, then for `base_dir`.
pub fn resolve_mesh_path(
    filename: &str,
    base_dir: &Path,
    package_paths: &[PathBuf],
) -> Result<PathBuf, ImportError> {
    let not_found = || ImportError::MeshNotFound {
        path: filename.to_string(),
    };

    if let Some(uri) = filename.strip_prefix("package://") {
        let (package, relative) = uri.split_once('/').unwrap_or(("", uri));

        return package_paths
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(base_dir))
            .flat_map(|root| [root.join(package).join(relative), root.join(relative)])
            .find(|candidate| candidate.is_file())
            .ok_or_else(not_found);
    }

    let path_str = filename.strip_prefix("file://").unwrap_or(filename);
    let path = if Path::new(path_str).is_absolute() {
        PathBuf::from(path_str)
    } else {
        base_dir.join(path_str)
    };

    if !path.is_file() {
        return Err(ImportError::MeshNotFound {
            path: path.to_string_lossy().to_string(),
        });
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use approx::assert_relative_eq;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "urdf-flatten-import-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const PRIMITIVES_URDF: &str = r#"
        <robot name="primitives">
          <link name="base">
            <visual>
              <origin xyz="0 0 0.5" rpy="0 0 0"/>
              <geometry><box size="1 1 1"/></geometry>
            </visual>
          </link>
          <link name="sensor"/>
          <link name="head">
            <visual>
              <geometry><sphere radius="0.1"/></geometry>
            </visual>
            <visual>
              <geometry><cylinder radius="0.05" length="0.2"/></geometry>
            </visual>
          </link>
          <joint name="neck" type="fixed">
            <parent link="base"/>
            <child link="head"/>
            <origin xyz="0 0 2" rpy="0 0 0"/>
          </joint>
          <joint name="mount" type="fixed">
            <parent link="base"/>
            <child link="sensor"/>
          </joint>
        </robot>
    "#;

    #[test]
    fn test_visual_meshes_from_primitives() {
        let robot = urdf_rs::read_from_string(PRIMITIVES_URDF).unwrap();
        let posed = visual_meshes(&robot, Path::new("."), &ImportOptions::default()).unwrap();

        let links: Vec<&str> = posed.iter().map(|p| p.link.as_str()).collect();
        assert_eq!(links, vec!["base", "head", "head"]);
        assert_eq!(posed[0].mesh.vertex_count(), 8);

        let base_origin = posed[0].pose.transform_point3(Vec3::ZERO);
        assert_relative_eq!(base_origin.z, 0.5);
        let head_origin = posed[1].pose.transform_point3(Vec3::ZERO);
        assert_relative_eq!(head_origin.z, 2.0);
    }

    #[test]
    fn test_mesh_scale_is_part_of_pose() {
        let dir = scratch_dir("scale");
        std::fs::write(
            dir.join("tri.obj"),
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();
        let robot = urdf_rs::read_from_string(
            r#"<robot name="scaled">
                 <link name="only">
                   <visual>
                     <origin xyz="1 0 0" rpy="0 0 0"/>
                     <geometry><mesh filename="tri.obj" scale="2 2 2"/></geometry>
                   </visual>
                 </link>
               </robot>"#,
        )
        .unwrap();

        let posed = visual_meshes(&robot, &dir, &ImportOptions::default()).unwrap();
        let world = posed[0].to_world();
        assert!(world.vertices.contains(&[3.0, 0.0, 0.0]));
        assert!(world.vertices.contains(&[1.0, 2.0, 0.0]));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_mesh_file() {
        let robot = urdf_rs::read_from_string(
            r#"<robot name="broken">
                 <link name="only">
                   <visual><geometry><mesh filename="nope.stl"/></geometry></visual>
                 </link>
               </robot>"#,
        )
        .unwrap();

        let result = visual_meshes(&robot, Path::new("/nonexistent"), &ImportOptions::default());
        assert!(matches!(result, Err(ImportError::MeshNotFound { .. })));
    }

    #[test]
    fn test_resolve_package_uri() {
        let dir = scratch_dir("package");
        let meshes = dir.join("my_robot").join("meshes");
        std::fs::create_dir_all(&meshes).unwrap();
        std::fs::write(meshes.join("link.stl"), b"").unwrap();

        let resolved = resolve_mesh_path(
            "package://my_robot/meshes/link.stl",
            Path::new("/nonexistent"),
            std::slice::from_ref(&dir),
        )
        .unwrap();
        assert_eq!(resolved, meshes.join("link.stl"));

        // Falls back to the base directory without the package name
        let resolved =
            resolve_mesh_path("package://other/link.stl", &meshes, &[]).unwrap();
        assert_eq!(resolved, meshes.join("link.stl"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_file_uri_and_relative() {
        let dir = scratch_dir("relative");
        std::fs::write(dir.join("part.obj"), b"").unwrap();

        let absolute = format!("file://{}", dir.join("part.obj").display());
        assert_eq!(
            resolve_mesh_path(&absolute, Path::new("."), &[]).unwrap(),
            dir.join("part.obj")
        );
        assert_eq!(
            resolve_mesh_path("part.obj", &dir, &[]).unwrap(),
            dir.join("part.obj")
        );
        assert!(matches!(
            resolve_mesh_path("package://p/missing.obj", &dir, &[]),
            Err(ImportError::MeshNotFound { .. })
        ));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_base_dir_overrides_urdf_directory() {
        let urdf_dir = scratch_dir("override-urdf");
        let mesh_dir = scratch_dir("override-meshes");
        std::fs::write(
            mesh_dir.join("tri.obj"),
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();
        let urdf_path = urdf_dir.join("robot.urdf");
        std::fs::write(
            &urdf_path,
            r#"<robot name="split">
                 <link name="only">
                   <visual><geometry><mesh filename="tri.obj"/></geometry></visual>
                 </link>
               </robot>"#,
        )
        .unwrap();

        // Next to the URDF there is no tri.obj
        let result = import_visual_meshes(&urdf_path, &ImportOptions::default());
        assert!(matches!(result, Err(ImportError::MeshNotFound { .. })));

        let options = ImportOptions {
            base_dir: Some(mesh_dir.clone()),
            ..Default::default()
        };
        let posed = import_visual_meshes(&urdf_path, &options).unwrap();
        assert_eq!(posed.len(), 1);
        assert_eq!(posed[0].mesh.vertex_count(), 3);

        std::fs::remove_dir_all(&urdf_dir).ok();
        std::fs::remove_dir_all(&mesh_dir).ok();
    }

    #[test]
    fn test_mesh_load_error_keeps_cause_out_of_message() {
        let error = ImportError::MeshLoad {
            path: "meshes/link.dae".to_string(),
            source: MeshError::UnsupportedFormat("dae".to_string()),
        };

        assert_eq!(error.to_string(), "Failed to load mesh 'meshes/link.dae'");
        assert!(error.source().unwrap().to_string().contains("dae"));
    }

    #[test]
    fn test_unknown_joint_in_options() {
        let robot = urdf_rs::read_from_string(PRIMITIVES_URDF).unwrap();
        let options = ImportOptions {
            joint_positions: JointPositions::from([("elbow".to_string(), 1.0)]),
            ..Default::default()
        };

        let result = visual_meshes(&robot, Path::new("."), &options);
        assert!(matches!(
            result,
            Err(ImportError::Kinematics(KinematicsError::UnknownJoint(_)))
        ));
    }
}
