use glam::{Mat3, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.position
    }

    /// Maps a point from the space this transform sits in into its local
    /// space.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        (self.rotation.inverse() * (point - self.position)) / self.scale
    }

    /// Child transform expressed in the space this transform sits in.
    /// Non-uniform scale is not carried into the child's rotation.
    pub fn mul_transform(&self, child: &Self) -> Self {
        Self {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Rotation whose forward axis points from `position` at `target`.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            rotation: look_rotation(target - position, up),
            scale: Vec3::ONE,
        }
    }
}

/// Rotation mapping -Z onto `forward` with +Y as close to `up` as possible.
/// Falls back to identity when `forward` is degenerate or parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    let right = forward.cross(up).normalize_or_zero();
    if forward == Vec3::ZERO || right == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let corrected_up = right.cross(forward);
    rotation_from_axes(right, corrected_up, forward)
}

/// Rotation from an orthonormal basis given as right, up and forward axes.
pub fn rotation_from_axes(right: Vec3, up: Vec3, forward: Vec3) -> Quat {
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}
