//! Joint-related type definitions

use glam::{Mat4, Quat, Vec3};

/// Joint type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JointType {
    #[default]
    Fixed,
    Revolute,
    Continuous,
    Prismatic,
    Floating,
    Planar,
}

impl JointType {
    /// Transform contributed by the joint at `position` (rad or m).
    ///
    /// Floating and planar joints carry more than one DOF and stay at their origin.
    pub fn motion(&self, axis: Vec3, position: f32) -> Mat4 {
        match self {
            JointType::Revolute | JointType::Continuous => {
                Mat4::from_quat(Quat::from_axis_angle(axis.normalize_or_zero(), position))
            }
            JointType::Prismatic => Mat4::from_translation(axis.normalize_or_zero() * position),
            JointType::Fixed | JointType::Floating | JointType::Planar => Mat4::IDENTITY,
        }
    }
}

impl From<&urdf_rs::JointType> for JointType {
    fn from(urdf_type: &urdf_rs::JointType) -> Self {
        match urdf_type {
            urdf_rs::JointType::Fixed => JointType::Fixed,
            urdf_rs::JointType::Revolute => JointType::Revolute,
            urdf_rs::JointType::Continuous => JointType::Continuous,
            urdf_rs::JointType::Prismatic => JointType::Prismatic,
            urdf_rs::JointType::Floating => JointType::Floating,
            urdf_rs::JointType::Planar => JointType::Planar,
            urdf_rs::JointType::Spherical => JointType::Floating, // Approximate as floating
        }
    }
}

/// Joint mimic configuration
/// Makes this joint follow another joint's position: value = multiplier * other_joint + offset
#[derive(Debug, Clone, PartialEq)]
pub struct JointMimic {
    /// Name of the joint to mimic
    pub joint: String,
    /// Multiplier applied to the mimicked joint's position (default: 1.0)
    pub multiplier: f32,
    /// Offset added after multiplication (default: 0.0)
    pub offset: f32,
}

impl JointMimic {
    /// Create a new mimic configuration
    pub fn new(joint: impl Into<String>) -> Self {
        Self {
            joint: joint.into(),
            multiplier: 1.0,
            offset: 0.0,
        }
    }

    /// Calculate the mimic value from the source joint's position
    pub fn calculate(&self, source_position: f32) -> f32 {
        self.multiplier * source_position + self.offset
    }
}

impl From<&urdf_rs::Mimic> for JointMimic {
    fn from(mimic: &urdf_rs::Mimic) -> Self {
        Self {
            joint: mimic.joint.clone(),
            multiplier: mimic.multiplier.unwrap_or(1.0) as f32,
            offset: mimic.offset.unwrap_or(0.0) as f32,
        }
    }
}
