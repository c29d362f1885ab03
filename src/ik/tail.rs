use std::f32::consts::FRAC_PI_2;

use super::leg::surface_rotation;
use crate::ground::{GroundQuery, Ray};
use crate::math::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailConfig {
    /// Locator speed in units per second.
    pub move_speed: f32,
    /// Locator turn rate in radians per second.
    pub turn_speed: f32,
    /// Height of the locator above the ground below its rest point.
    pub rest_height: f32,
    /// Height above the rest point the ground ray is cast from.
    pub cast_height: f32,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            turn_speed: FRAC_PI_2,
            rest_height: 0.0,
            cast_height: 1.0,
        }
    }
}

impl TailConfig {
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    pub fn with_turn_speed(mut self, speed: f32) -> Self {
        self.turn_speed = speed;
        self
    }

    pub fn with_rest_height(mut self, height: f32) -> Self {
        self.rest_height = height;
        self
    }

    pub fn with_cast_height(mut self, height: f32) -> Self {
        self.cast_height = height;
        self
    }
}

/// Drags a locator toward the ground below a rest point at a bounded speed,
/// for chains that trail the body instead of stepping.
#[derive(Debug, Clone)]
pub struct TailFollower {
    config: TailConfig,
    locator: Transform,
}

impl TailFollower {
    pub fn new(config: TailConfig, locator: Transform) -> Self {
        Self { config, locator }
    }

    pub fn config(&self) -> &TailConfig {
        &self.config
    }

    pub fn locator(&self) -> Transform {
        self.locator
    }

    pub fn set_locator(&mut self, locator: Transform) {
        self.locator = locator;
    }

    /// The ground below `rest` lifted by the rest height, facing along the
    /// rest transform. `rest` itself when the ray misses, keeping the
    /// current locator rotation.
    pub fn goal(&self, rest: &Transform, ground: &impl GroundQuery) -> Transform {
        let up = rest.up();
        let ray = Ray::new(rest.position + up * self.config.cast_height, -up);

        match ground.cast(&ray) {
            Some(hit) => Transform::from_position_rotation(
                hit.point - ray.direction * self.config.rest_height,
                surface_rotation(hit.normal, rest.forward()).unwrap_or(self.locator.rotation),
            ),
            None => Transform::from_position_rotation(rest.position, self.locator.rotation),
        }
    }

    /// Moves the locator one frame closer to its goal and returns it.
    pub fn update(&mut self, rest: &Transform, dt: f32, ground: &impl GroundQuery) -> Transform {
        let goal = self.goal(rest, ground);
        self.locator = Transform::from_position_rotation(
            self.locator.position.move_towards(goal.position, self.config.move_speed * dt),
            self.locator.rotation.rotate_towards(goal.rotation, self.config.turn_speed * dt),
        );
        self.locator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::GroundHit;
    use approx::assert_abs_diff_eq;
    use glam::{Quat, Vec3};

    struct Slope {
        normal: Vec3,
    }

    impl GroundQuery for Slope {
        fn cast(&self, ray: &Ray) -> Option<GroundHit> {
            let denom = self.normal.dot(ray.direction);
            if denom.abs() < 1e-6 {
                return None;
            }
            let distance = -self.normal.dot(ray.origin) / denom;
            ray.contains(distance).then(|| GroundHit {
                point: ray.at(distance),
                normal: self.normal,
                distance,
            })
        }
    }

    struct Void;

    impl GroundQuery for Void {
        fn cast(&self, _ray: &Ray) -> Option<GroundHit> {
            None
        }
    }

    #[test]
    fn settles_above_the_ground_at_bounded_speed() {
        let config = TailConfig::default().with_rest_height(0.2);
        let start = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        let mut tail = TailFollower::new(config, start);
        let ground = Slope { normal: Vec3::Y };

        let first = tail.update(&start, 0.5, &ground);
        assert_abs_diff_eq!(first.position, Vec3::new(0.0, 0.5, 0.0), epsilon = 1e-6);

        let second = tail.update(&start, 0.5, &ground);
        assert_abs_diff_eq!(second.position, Vec3::new(0.0, 0.2, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(second.rotation * Vec3::Y, Vec3::Y, epsilon = 1e-6);
    }

    #[test]
    fn turns_toward_the_surface_normal() {
        let normal = Quat::from_rotation_z(0.5) * Vec3::Y;
        let rest = Transform::from_position(Vec3::new(0.0, 0.5, 0.0));
        let mut tail = TailFollower::new(TailConfig::default().with_turn_speed(0.1), rest);
        let ground = Slope { normal };

        let goal = tail.goal(&rest, &ground);
        assert_abs_diff_eq!(goal.rotation * Vec3::Y, normal, epsilon = 1e-5);

        let turned = tail.update(&rest, 1.0, &ground);
        assert_abs_diff_eq!(turned.rotation.angle_between(Quat::IDENTITY), 0.1, epsilon = 1e-3);
    }

    #[test]
    fn falls_back_to_rest_without_ground() {
        let rest = Transform::from_position(Vec3::new(0.0, 0.4, 0.0));
        let mut tail = TailFollower::new(TailConfig::default(), Transform::IDENTITY);

        let goal = tail.goal(&rest, &Void);
        assert_eq!(goal.position, rest.position);
        assert_eq!(goal.rotation, Quat::IDENTITY);

        let moved = tail.update(&rest, 1.0, &Void);
        assert_abs_diff_eq!(moved.position, rest.position, epsilon = 1e-6);
    }
}
