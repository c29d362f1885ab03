use glam::Vec3;

/// Infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    /// Returns `None` when `normal` has no usable direction.
    pub fn new(normal: Vec3, point: Vec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Self { normal, point })
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point - self.point)
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }
}

/// Angle in radians turning `from` onto `to`, positive when counter-clockwise
/// around `axis`. Zero if either vector is degenerate.
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    if from.length_squared() < 1e-12 || to.length_squared() < 1e-12 {
        return 0.0;
    }
    let angle = from.angle_between(to);
    if axis.dot(from.cross(to)) < 0.0 {
        -angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn projects_onto_plane() {
        let plane = Plane::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_abs_diff_eq!(
            plane.closest_point(Vec3::new(3.0, 5.0, -1.0)),
            Vec3::new(3.0, 1.0, -1.0),
            epsilon = 1e-6
        );
        assert!(Plane::new(Vec3::ZERO, Vec3::ONE).is_none());
    }

    #[test]
    fn signed_angle_follows_axis() {
        assert_abs_diff_eq!(signed_angle(Vec3::X, Vec3::Y, Vec3::Z), FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(
            signed_angle(Vec3::X, Vec3::Y, Vec3::NEG_Z),
            -FRAC_PI_2,
            epsilon = 1e-6
        );
        assert_eq!(signed_angle(Vec3::ZERO, Vec3::Y, Vec3::Z), 0.0);
    }
}
