use glam::Vec3;

use super::chain::SolverConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    pub converged: bool,
    pub iterations: u32,
    pub final_distance: f32,
    /// The target was out of reach and the chain was stretched toward it.
    pub over_extended: bool,
}

impl SolveResult {
    fn trivial() -> Self {
        Self {
            converged: true,
            iterations: 0,
            final_distance: 0.0,
            over_extended: false,
        }
    }
}

/// FABRIK passes over a buffer of joint positions. `positions[0]` is the
/// chain base and stays where it is; `bone_lengths[i]` separates
/// `positions[i]` and `positions[i + 1]`.
pub struct FabrikSolver;

impl FabrikSolver {
    pub fn solve(
        positions: &mut [Vec3],
        bone_lengths: &[f32],
        target: Vec3,
        config: &SolverConfig,
    ) -> SolveResult {
        let joint_count = positions.len();
        if joint_count < 2 {
            return SolveResult::trivial();
        }
        debug_assert_eq!(bone_lengths.len(), joint_count - 1);

        let base = positions[0];
        let total_length: f32 = bone_lengths.iter().sum();

        if (target - base).length_squared() >= total_length * total_length {
            Self::stretch_towards_target(positions, bone_lengths, target);
            let final_distance = (positions[joint_count - 1] - target).length();
            return SolveResult {
                converged: false,
                iterations: 0,
                final_distance,
                over_extended: true,
            };
        }

        let tolerance_sq = config.min_delta * config.min_delta;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < config.iterations {
            Self::backward_pass(positions, bone_lengths, target);
            Self::forward_pass(positions, bone_lengths, base);
            iterations += 1;

            if (positions[joint_count - 1] - target).length_squared() < tolerance_sq {
                converged = true;
                break;
            }
        }

        SolveResult {
            converged,
            iterations,
            final_distance: (positions[joint_count - 1] - target).length(),
            over_extended: false,
        }
    }

    /// Pins the leaf to the target and walks back toward the base.
    fn backward_pass(positions: &mut [Vec3], bone_lengths: &[f32], target: Vec3) {
        let n = positions.len();

        positions[n - 1] = target;

        for i in (0..n - 1).rev() {
            let next_pos = positions[i + 1];
            let direction = direction_or_up(positions[i] - next_pos);
            positions[i] = next_pos + direction * bone_lengths[i];
        }
    }

    /// Re-pins the base and walks out toward the leaf.
    fn forward_pass(positions: &mut [Vec3], bone_lengths: &[f32], base: Vec3) {
        positions[0] = base;

        for i in 1..positions.len() {
            let prev_pos = positions[i - 1];
            let direction = direction_or_up(positions[i] - prev_pos);
            positions[i] = prev_pos + direction * bone_lengths[i - 1];
        }
    }

    fn stretch_towards_target(positions: &mut [Vec3], bone_lengths: &[f32], target: Vec3) {
        let direction = (target - positions[0]).normalize_or_zero();

        for i in 1..positions.len() {
            positions[i] = positions[i - 1] + direction * bone_lengths[i - 1];
        }
    }
}

fn direction_or_up(dir: Vec3) -> Vec3 {
    let len = dir.length();
    if len > 0.0001 {
        dir / len
    } else {
        Vec3::Y
    }
}
