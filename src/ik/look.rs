use glam::{Quat, Vec3};

use super::joint::JointId;
use super::skeleton::Skeleton;
use crate::error::Result;
use crate::math::look_rotation;

/// Turns a single joint so its rest pose faces a point.
#[derive(Debug, Clone, Copy)]
pub struct ProceduralLook {
    joint: JointId,
    start_rotation: Quat,
}

impl ProceduralLook {
    pub fn new(skeleton: &Skeleton, joint: JointId) -> Result<Self> {
        skeleton.joint(joint)?;
        Ok(Self {
            joint,
            start_rotation: skeleton.world_rotation(joint),
        })
    }

    pub fn joint(&self) -> JointId {
        self.joint
    }

    /// Leaves the joint untouched when `point` sits on the joint or straight
    /// along `up` from it.
    pub fn look_at(&self, skeleton: &mut Skeleton, point: Vec3, up: Vec3) {
        let direction = point - skeleton.world_position(self.joint);
        if direction.try_normalize().is_none() || direction.cross(up).try_normalize().is_none() {
            return;
        }
        skeleton.set_world_rotation(self.joint, look_rotation(direction, up) * self.start_rotation);
    }
}
