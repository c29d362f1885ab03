use glam::{Quat, Vec3};

use super::joint::{Joint, JointId};
use crate::error::{Error, Result};
use crate::math::Transform;

/// Joint hierarchy stored as an arena. Parents always precede their children.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, name: impl Into<String>, world: Transform) -> JointId {
        self.joints.push(Joint::new(name, None, world));
        JointId(self.joints.len() - 1)
    }

    pub fn add_child(
        &mut self,
        parent: JointId,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<JointId> {
        self.joint(parent)?;
        self.joints.push(Joint::new(name, Some(parent), local));
        Ok(JointId(self.joints.len() - 1))
    }

    /// Adds a child placed at a world-space position with identity world
    /// rotation.
    pub fn add_child_at(
        &mut self,
        parent: JointId,
        name: impl Into<String>,
        world_position: Vec3,
    ) -> Result<JointId> {
        let id = self.add_child(parent, name, Transform::IDENTITY)?;
        self.set_world_rotation(id, Quat::IDENTITY);
        self.set_world_position(id, world_position);
        Ok(id)
    }

    /// Root followed by a straight parent-child chain through `positions`.
    /// Returns the ids in root-to-leaf order.
    pub fn chain(root: Transform, positions: &[Vec3]) -> (Self, Vec<JointId>) {
        let mut skeleton = Self::new();
        let mut ids = vec![skeleton.add_root("root", root)];
        for (i, &position) in positions.iter().enumerate() {
            let parent = ids[ids.len() - 1];
            let id = JointId(skeleton.joints.len());
            skeleton
                .joints
                .push(Joint::new(format!("joint{i}"), Some(parent), Transform::IDENTITY));
            skeleton.set_world_position(id, position);
            ids.push(id);
        }
        (skeleton, ids)
    }

    pub fn joint(&self, id: JointId) -> Result<&Joint> {
        self.joints.get(id.0).ok_or(Error::UnknownJoint(id.0))
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<JointId> {
        self.joints.iter().position(|j| j.name == name).map(JointId)
    }

    pub fn parent(&self, id: JointId) -> Option<JointId> {
        self.joints[id.0].parent
    }

    /// Walks `levels` parents up from `id`.
    pub fn ancestor(&self, id: JointId, levels: usize) -> Option<JointId> {
        (0..levels).try_fold(id, |current, _| self.parent(current))
    }

    pub fn ancestor_count(&self, id: JointId) -> usize {
        std::iter::successors(self.parent(id), |&p| self.parent(p)).count()
    }

    pub fn local_transform(&self, id: JointId) -> Transform {
        self.joints[id.0].local
    }

    pub fn set_local_transform(&mut self, id: JointId, local: Transform) {
        self.joints[id.0].local = local;
    }

    pub fn world_transform(&self, id: JointId) -> Transform {
        let joint = &self.joints[id.0];
        match joint.parent {
            Some(parent) => self.world_transform(parent).mul_transform(&joint.local),
            None => joint.local,
        }
    }

    pub fn world_position(&self, id: JointId) -> Vec3 {
        self.world_transform(id).position
    }

    pub fn world_rotation(&self, id: JointId) -> Quat {
        self.world_transform(id).rotation
    }

    /// Moves the joint, and with it every descendant.
    pub fn set_world_position(&mut self, id: JointId, position: Vec3) {
        let local = match self.joints[id.0].parent {
            Some(parent) => self.world_transform(parent).inverse_transform_point(position),
            None => position,
        };
        self.joints[id.0].local.position = local;
    }

    pub fn set_world_rotation(&mut self, id: JointId, rotation: Quat) {
        let local = match self.joints[id.0].parent {
            Some(parent) => self.world_rotation(parent).inverse() * rotation,
            None => rotation,
        };
        self.joints[id.0].local.rotation = local.normalize();
    }
}
