use glam::{Quat, Vec3};

use crate::math::{signed_angle, Plane};

/// Resolves the twist of a chain by swinging every interior joint toward a
/// pole point.
///
/// Each interior joint is rotated about the line through its two neighbours,
/// so both adjacent bone lengths are left untouched. The first and last
/// joints never move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoleConstraint {
    pub pole: Vec3,
}

impl PoleConstraint {
    pub fn new(pole: Vec3) -> Self {
        Self { pole }
    }

    pub fn apply(&self, positions: &mut [Vec3]) {
        if positions.len() < 3 {
            return;
        }

        for i in 1..positions.len() - 1 {
            let prev = positions[i - 1];
            let pos = positions[i];
            let next = positions[i + 1];

            // neighbours on top of each other leave no axis to swing around
            let Some(plane) = Plane::new(next - prev, prev) else {
                continue;
            };

            let projected_pole = plane.closest_point(self.pole);
            let projected_joint = plane.closest_point(pos);
            let angle = signed_angle(projected_joint - prev, projected_pole - prev, plane.normal);

            positions[i] = Quat::from_axis_angle(plane.normal, angle) * (pos - prev) + prev;
        }
    }
}
