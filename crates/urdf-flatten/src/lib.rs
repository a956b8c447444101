//! URDF flattening
//!
//! This crate turns the visual geometry of a URDF robot into triangle meshes
//! expressed in one world frame:
//! - Kinematic tree and forward kinematics
//! - Visual mesh resolution (STL, OBJ, primitives)
//! - Pose application, mesh merging and OBJ export
//! - Conversion driver and its configuration

pub mod config;
pub mod convert;
pub mod import;
pub mod kinematics;
pub mod mesh;
pub mod types;

pub use config::*;
pub use convert::*;
pub use import::*;
pub use kinematics::*;
pub use mesh::*;
pub use types::*;
