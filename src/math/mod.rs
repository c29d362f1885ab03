//! Math utilities module
//!
//! Transforms, planes and curves shared by the clip and IK modules, plus
//! re-exports of the glam types they are built on.

mod easing;
mod geometry;
mod transform;

pub use easing::{cubic_in_out, quadratic_bezier};
pub use geometry::{signed_angle, Plane};
pub use transform::{look_rotation, rotation_from_axes, Transform};

// Re-export commonly used glam types
pub use glam::{Quat, Vec3};
