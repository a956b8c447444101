//! Kinematic tree built from a URDF robot
//!
//! Links and joints are addressed by their URDF names. The tree keeps the
//! declaration order of joints so traversal is deterministic.

mod transforms;

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec3;

use crate::types::{JointMimic, JointType, Pose};

pub use transforms::LinkPose;

/// Joint positions keyed by joint name (rad or m)
pub type JointPositions = BTreeMap<String, f32>;

/// A joint connecting two links
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub joint_type: JointType,
    pub parent_link: String,
    pub child_link: String,
    /// Transform from parent link frame to joint frame
    pub origin: Pose,
    /// Joint axis (for revolute/prismatic)
    pub axis: Vec3,
    /// Joint mimic configuration (follows another joint)
    pub mimic: Option<JointMimic>,
}

impl From<&urdf_rs::Joint> for Joint {
    fn from(joint: &urdf_rs::Joint) -> Self {
        Self {
            name: joint.name.clone(),
            joint_type: JointType::from(&joint.joint_type),
            parent_link: joint.parent.link.clone(),
            child_link: joint.child.link.clone(),
            origin: Pose::from(&joint.origin),
            axis: Vec3::new(
                joint.axis.xyz.0[0] as f32,
                joint.axis.xyz.0[1] as f32,
                joint.axis.xyz.0[2] as f32,
            ),
            mimic: joint.mimic.as_ref().map(JointMimic::from),
        }
    }
}

/// Kinematic tree errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KinematicsError {
    #[error("Empty robot: no links defined")]
    EmptyRobot,

    #[error("Joint '{joint}' references unknown link '{link}'")]
    LinkNotFound { joint: String, link: String },

    #[error("Link '{0}' is the child of more than one joint")]
    MultipleParents(String),

    #[error("No root link: every link has a parent")]
    NoRoot,

    #[error("Multiple root links: {0:?}")]
    MultipleRoots(Vec<String>),

    #[error("Joint graph contains a cycle through link '{0}'")]
    Cycle(String),

    #[error("Unknown joint: {0}")]
    UnknownJoint(String),

    #[error("Joint '{joint}' mimics unknown joint '{source_joint}'")]
    UnknownMimicSource { joint: String, source_joint: String },
}

/// Robot structure: links connected by joints, rooted at a single link
#[derive(Debug, Clone)]
pub struct KinematicTree {
    pub name: String,
    /// Link names in declaration order
    links: Vec<String>,
    /// Joints by name
    joints: HashMap<String, Joint>,
    /// Parent link -> [(joint, child link)], in joint declaration order
    children: HashMap<String, Vec<(String, String)>>,
    /// Child link -> (joint, parent link)
    parent: HashMap<String, (String, String)>,
    root: String,
}

impl KinematicTree {
    /// Build the tree from a parsed URDF robot
    pub fn from_robot(robot: &urdf_rs::Robot) -> Result<Self, KinematicsError> {
        let joints: Vec<Joint> = robot.joints.iter().map(Joint::from).collect();
        let links: Vec<String> = robot.links.iter().map(|l| l.name.clone()).collect();
        Self::new(&robot.name, links, joints)
    }

    /// Build the tree from link names and joints
    pub fn new(
        name: impl Into<String>,
        links: Vec<String>,
        joints: Vec<Joint>,
    ) -> Result<Self, KinematicsError> {
        if links.is_empty() {
            return Err(KinematicsError::EmptyRobot);
        }

        let known: HashSet<&str> = links.iter().map(String::as_str).collect();
        let mut children: HashMap<String, Vec<(String, String)>> = HashMap::new();
        let mut parent: HashMap<String, (String, String)> = HashMap::new();

        for joint in &joints {
            for link in [&joint.parent_link, &joint.child_link] {
                if !known.contains(link.as_str()) {
                    return Err(KinematicsError::LinkNotFound {
                        joint: joint.name.clone(),
                        link: link.clone(),
                    });
                }
            }

            if parent
                .insert(
                    joint.child_link.clone(),
                    (joint.name.clone(), joint.parent_link.clone()),
                )
                .is_some()
            {
                return Err(KinematicsError::MultipleParents(joint.child_link.clone()));
            }

            children
                .entry(joint.parent_link.clone())
                .or_default()
                .push((joint.name.clone(), joint.child_link.clone()));
        }

        let roots: Vec<String> = links
            .iter()
            .filter(|l| !parent.contains_key(*l))
            .cloned()
            .collect();

        let root = match roots.as_slice() {
            [] => return Err(KinematicsError::NoRoot),
            [root] => root.clone(),
            _ => return Err(KinematicsError::MultipleRoots(roots)),
        };

        let joints = joints.into_iter().map(|j| (j.name.clone(), j)).collect();
        let tree = Self {
            name: name.into(),
            links,
            joints,
            children,
            parent,
            root,
        };

        tree.check_connected()?;
        Ok(tree)
    }

    /// Every link must be reachable from the root; the rest sit on a cycle
    fn check_connected(&self) -> Result<(), KinematicsError> {
        let reachable: HashSet<&str> = self.traversal_order().into_iter().collect();
        match self.links.iter().find(|l| !reachable.contains(l.as_str())) {
            Some(link) => Err(KinematicsError::Cycle(link.clone())),
            None => Ok(()),
        }
    }

    /// Link names, root first, every parent before its children
    pub fn traversal_order(&self) -> Vec<&str> {
        let mut order = Vec::with_capacity(self.links.len());
        let mut stack = vec![self.root.as_str()];

        while let Some(link) = stack.pop() {
            order.push(link);
            if let Some(children) = self.children.get(link) {
                // Reversed so the first declared child is visited first
                stack.extend(children.iter().rev().map(|(_, child)| child.as_str()));
            }
        }

        order
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.get(name)
    }

    /// Joint connecting `link` to its parent, if any
    pub fn parent_joint(&self, link: &str) -> Option<&Joint> {
        self.parent
            .get(link)
            .and_then(|(joint, _)| self.joints.get(joint))
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn fixed(name: &str, parent: &str, child: &str, xyz: [f32; 3]) -> Joint {
        Joint {
            name: name.to_string(),
            joint_type: JointType::Fixed,
            parent_link: parent.to_string(),
            child_link: child.to_string(),
            origin: Pose::from_position(xyz),
            axis: Vec3::Z,
            mimic: None,
        }
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_traversal_order_parents_first() {
        let tree = KinematicTree::new(
            "arm",
            names(&["tool", "base", "upper", "lower", "side"]),
            vec![
                fixed("j_lower", "upper", "lower", [0.0; 3]),
                fixed("j_upper", "base", "upper", [0.0; 3]),
                fixed("j_tool", "lower", "tool", [0.0; 3]),
                fixed("j_side", "base", "side", [0.0; 3]),
            ],
        )
        .unwrap();

        assert_eq!(tree.root(), "base");
        assert_eq!(
            tree.traversal_order(),
            vec!["base", "upper", "lower", "tool", "side"]
        );
        assert_eq!(tree.parent_joint("tool").unwrap().name, "j_tool");
        assert!(tree.parent_joint("base").is_none());
    }

    #[test]
    fn test_empty_robot() {
        let result = KinematicTree::new("empty", Vec::new(), Vec::new());
        assert_eq!(result.unwrap_err(), KinematicsError::EmptyRobot);
    }

    #[test]
    fn test_unknown_link() {
        let result = KinematicTree::new(
            "r",
            names(&["base"]),
            vec![fixed("j", "base", "ghost", [0.0; 3])],
        );
        assert!(matches!(
            result,
            Err(KinematicsError::LinkNotFound { link, .. }) if link == "ghost"
        ));
    }

    #[test]
    fn test_multiple_parents() {
        let result = KinematicTree::new(
            "r",
            names(&["a", "b", "c"]),
            vec![fixed("j1", "a", "c", [0.0; 3]), fixed("j2", "b", "c", [0.0; 3])],
        );
        assert_eq!(
            result.unwrap_err(),
            KinematicsError::MultipleParents("c".to_string())
        );
    }

    #[test]
    fn test_multiple_roots() {
        let result = KinematicTree::new("r", names(&["a", "b"]), Vec::new());
        assert!(matches!(result, Err(KinematicsError::MultipleRoots(r)) if r.len() == 2));
    }

    #[test]
    fn test_cycle_detected() {
        // "a" is the root; "b" and "c" only reach each other
        let result = KinematicTree::new(
            "r",
            names(&["a", "b", "c"]),
            vec![fixed("j1", "b", "c", [0.0; 3]), fixed("j2", "c", "b", [0.0; 3])],
        );
        assert!(matches!(result, Err(KinematicsError::Cycle(_))));

        let result = KinematicTree::new(
            "r",
            names(&["b", "c"]),
            vec![fixed("j1", "b", "c", [0.0; 3]), fixed("j2", "c", "b", [0.0; 3])],
        );
        assert_eq!(result.unwrap_err(), KinematicsError::NoRoot);
    }
}
