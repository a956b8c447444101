//! Forward kinematics: world transforms of every link

use glam::Mat4;

use super::{Joint, JointPositions, KinematicTree, KinematicsError};

/// World transform of one link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkPose {
    pub link: String,
    pub transform: Mat4,
}

impl KinematicTree {
    /// Compute the world transform of every link, root first.
    ///
    /// Joints missing from `positions` sit at 0. Mimic joints always follow their source.
    pub fn link_poses(&self, positions: &JointPositions) -> Result<Vec<LinkPose>, KinematicsError> {
        if let Some(unknown) = positions.keys().find(|name| self.joint(name).is_none()) {
            return Err(KinematicsError::UnknownJoint(unknown.clone()));
        }

        let mut poses: Vec<LinkPose> = Vec::with_capacity(self.links().len());

        for link in self.traversal_order() {
            let transform = match self.parent_joint(link) {
                Some(joint) => {
                    // Parents are always emitted before their children
                    let parent_transform = poses
                        .iter()
                        .rev()
                        .find(|p| p.link == joint.parent_link)
                        .map(|p| p.transform)
                        .unwrap_or(Mat4::IDENTITY);
                    let position = self.joint_position(joint, positions)?;
                    parent_transform * self.joint_transform(joint, position)
                }
                None => Mat4::IDENTITY,
            };

            poses.push(LinkPose {
                link: link.to_string(),
                transform,
            });
        }

        Ok(poses)
    }

    /// Transform from the parent link frame to the child link frame
    fn joint_transform(&self, joint: &Joint, position: f32) -> Mat4 {
        joint.origin.to_mat4() * joint.joint_type.motion(joint.axis, position)
    }

    /// Effective position of a joint, following mimic chains
    fn joint_position(
        &self,
        joint: &Joint,
        positions: &JointPositions,
    ) -> Result<f32, KinematicsError> {
        let mut current = joint;
        let mut chain = Vec::new();

        // Bounded by the joint count so a mimic loop cannot spin forever
        for _ in 0..=self.joint_count() {
            match &current.mimic {
                Some(mimic) => {
                    chain.push(mimic);
                    current = self.joint(&mimic.joint).ok_or_else(|| {
                        KinematicsError::UnknownMimicSource {
                            joint: current.name.clone(),
                            source_joint: mimic.joint.clone(),
                        }
                    })?;
                }
                None => {
                    let base = positions.get(&current.name).copied().unwrap_or(0.0);
                    return Ok(chain.iter().rev().fold(base, |q, m| m.calculate(q)));
                }
            }
        }

        tracing::warn!("Mimic loop through joint '{}', using 0", joint.name);
        Ok(0.0)
    }
}
