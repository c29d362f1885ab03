use std::fmt;

use glam::{Quat, Vec3};
use log::{debug, trace};

use super::constraint::PoleConstraint;
use super::joint::JointId;
use super::skeleton::Skeleton;
use super::solver::{FabrikSolver, SolveResult};
use crate::error::{Error, Result};
use crate::math::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Upper bound on backward/forward pass pairs per solve.
    pub iterations: u32,
    /// The leaf counts as arrived once it is closer than this to the target.
    pub min_delta: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            min_delta: 0.001,
        }
    }
}

impl SolverConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_min_delta(mut self, min_delta: f32) -> Self {
        self.min_delta = min_delta;
        self
    }
}

type OverExtendedListener = Box<dyn FnMut() + Send>;

/// Bends the `num_affected_parents` ancestors of an end effector so the end
/// effector reaches a target.
///
/// All solving happens in the space of the relative root, the ancestor one
/// level above the topmost affected joint. Rest data (bone lengths, bone
/// directions and rotations) is captured from the pose the skeleton has when
/// the chain is initialised.
pub struct ProceduralGrab {
    end_effector: JointId,
    num_affected_parents: usize,
    config: SolverConfig,

    relative_root: JointId,
    bones: Vec<JointId>,
    bone_lengths: Vec<f32>,
    total_length: f32,
    start_directions: Vec<Vec3>,
    start_rotations: Vec<Quat>,
    start_target_rotation: Quat,
    positions: Vec<Vec3>,

    listeners: Vec<OverExtendedListener>,
}

impl ProceduralGrab {
    /// `locator` is the target the end effector rests on in the current pose.
    pub fn new(
        skeleton: &Skeleton,
        end_effector: JointId,
        locator: Transform,
        num_affected_parents: usize,
    ) -> Result<Self> {
        skeleton.joint(end_effector)?;

        let mut grab = Self {
            end_effector,
            num_affected_parents,
            config: SolverConfig::default(),
            relative_root: end_effector,
            bones: Vec::new(),
            bone_lengths: Vec::new(),
            total_length: 0.0,
            start_directions: Vec::new(),
            start_rotations: Vec::new(),
            start_target_rotation: Quat::IDENTITY,
            positions: Vec::new(),
            listeners: Vec::new(),
        };
        grab.init(skeleton, locator.position, locator.rotation)?;
        Ok(grab)
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    pub fn end_effector(&self) -> JointId {
        self.end_effector
    }

    pub fn num_affected_parents(&self) -> usize {
        self.num_affected_parents
    }

    /// The cached chain is rebuilt on the next [`resolve_ik`](Self::resolve_ik).
    pub fn set_num_affected_parents(&mut self, num_affected_parents: usize) {
        self.num_affected_parents = num_affected_parents;
    }

    pub fn relative_root(&self) -> JointId {
        self.relative_root
    }

    /// Chain joints from the topmost affected ancestor down to the end
    /// effector.
    pub fn bones(&self) -> &[JointId] {
        &self.bones
    }

    pub fn bone_lengths(&self) -> &[f32] {
        &self.bone_lengths
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Joint positions from the last solve, in relative-root space.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Registers a callback fired every time a target is out of reach.
    pub fn on_over_extended(&mut self, listener: impl FnMut() + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn init(
        &mut self,
        skeleton: &Skeleton,
        target_position: Vec3,
        target_rotation: Quat,
    ) -> Result<()> {
        let joint_count = self.num_affected_parents + 1;

        let relative_root = skeleton
            .ancestor(self.end_effector, joint_count)
            .ok_or_else(|| Error::ChainTooLong {
                requested: joint_count,
                available: skeleton.ancestor_count(self.end_effector),
            })?;
        let root = skeleton.world_transform(relative_root);

        let mut bones = vec![self.end_effector; joint_count];
        for i in (0..joint_count - 1).rev() {
            bones[i] = skeleton
                .parent(bones[i + 1])
                .ok_or(Error::UnknownJoint(bones[i + 1].index()))?;
        }

        let positions: Vec<Vec3> = bones
            .iter()
            .map(|&bone| position_in_root_space(&root, skeleton.world_position(bone)))
            .collect();

        let mut start_directions: Vec<Vec3> =
            positions.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let target = position_in_root_space(&root, target_position);
        start_directions.push(target - positions[joint_count - 1]);

        self.bone_lengths = start_directions[..joint_count - 1]
            .iter()
            .map(|d| d.length())
            .collect();
        self.total_length = self.bone_lengths.iter().sum();
        self.start_rotations = bones
            .iter()
            .map(|&bone| rotation_in_root_space(&root, skeleton.world_rotation(bone)))
            .collect();
        self.start_target_rotation = rotation_in_root_space(&root, target_rotation);
        self.start_directions = start_directions;
        self.positions = positions;
        self.bones = bones;
        self.relative_root = relative_root;

        debug!(
            "ik chain for joint {} initialised with {} bones, total length {:.3}",
            self.end_effector.index(),
            self.bone_lengths.len(),
            self.total_length
        );
        Ok(())
    }

    /// Solves the chain toward `target_position` and writes the pose back to
    /// `skeleton`. The end effector takes on `target_rotation` relative to the
    /// rotation the locator had at initialisation. Interior joints bend
    /// toward `pole`.
    pub fn resolve_ik(
        &mut self,
        skeleton: &mut Skeleton,
        target_position: Vec3,
        target_rotation: Quat,
        pole: Vec3,
    ) -> Result<SolveResult> {
        if self.bone_lengths.len() != self.num_affected_parents {
            self.init(skeleton, target_position, target_rotation)?;
        }

        // the relative root may have moved since the last frame
        let root = skeleton.world_transform(self.relative_root);
        let target = position_in_root_space(&root, target_position);
        let target_rotation = rotation_in_root_space(&root, target_rotation);
        let pole = position_in_root_space(&root, pole);

        let base = position_in_root_space(&root, skeleton.world_position(self.bones[0]));
        self.positions[0] = base;
        for i in 0..self.positions.len() - 1 {
            self.positions[i + 1] = self.positions[i] + self.start_directions[i];
        }

        let result =
            FabrikSolver::solve(&mut self.positions, &self.bone_lengths, target, &self.config);

        if result.over_extended {
            for listener in &mut self.listeners {
                listener();
            }
        }

        PoleConstraint::new(pole).apply(&mut self.positions);

        let leaf = self.positions.len() - 1;
        for (i, &bone) in self.bones.iter().enumerate() {
            let rotation = if i == leaf {
                target_rotation * self.start_target_rotation.inverse() * self.start_rotations[i]
            } else {
                let solved_direction = self.positions[i + 1] - self.positions[i];
                let swing = rotation_between(self.start_directions[i], solved_direction);
                swing * self.start_rotations[i]
            };

            skeleton.set_world_rotation(bone, root.rotation * rotation);
            skeleton.set_world_position(bone, root.position + root.rotation * self.positions[i]);
        }

        trace!(
            "ik chain for joint {}: {} iterations, {:.4} from target, over extended: {}",
            self.end_effector.index(),
            result.iterations,
            result.final_distance,
            result.over_extended
        );
        Ok(result)
    }
}

impl fmt::Debug for ProceduralGrab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProceduralGrab")
            .field("end_effector", &self.end_effector)
            .field("num_affected_parents", &self.num_affected_parents)
            .field("config", &self.config)
            .field("relative_root", &self.relative_root)
            .field("bones", &self.bones)
            .field("bone_lengths", &self.bone_lengths)
            .field("total_length", &self.total_length)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn position_in_root_space(root: &Transform, position: Vec3) -> Vec3 {
    root.rotation.inverse() * (position - root.position)
}

fn rotation_in_root_space(root: &Transform, rotation: Quat) -> Quat {
    root.rotation.inverse() * rotation
}

/// Shortest rotation carrying `from` onto `to`; identity if either is
/// degenerate.
fn rotation_between(from: Vec3, to: Vec3) -> Quat {
    match (from.try_normalize(), to.try_normalize()) {
        (Some(from), Some(to)) => Quat::from_rotation_arc(from, to),
        _ => Quat::IDENTITY,
    }
}
