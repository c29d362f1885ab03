use glam::{Quat, Vec3};
use log::debug;

use crate::ground::{GroundQuery, Ray};
use crate::math::{cubic_in_out, quadratic_bezier, rotation_from_axes, Plane, Transform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    /// A foot farther than this from its rest point, measured in the rest
    /// plane, takes a step.
    pub foot_max_distance: f32,
    /// How far past the rest point a step lands.
    pub overshoot_distance: f32,
    pub min_move_duration: f32,
    pub max_move_duration: f32,
    /// Peak height of the step arc above the straight line.
    pub step_height: f32,
    /// Height of the foot locator above the ground it lands on.
    pub rest_height: f32,
    /// Height above the landing point the ground ray is cast from.
    pub cast_height: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            foot_max_distance: 0.5,
            overshoot_distance: 0.2,
            min_move_duration: 0.15,
            max_move_duration: 0.25,
            step_height: 0.2,
            rest_height: 0.0,
            cast_height: 2.0,
        }
    }
}

impl StepConfig {
    pub fn with_foot_max_distance(mut self, distance: f32) -> Self {
        self.foot_max_distance = distance;
        self
    }

    pub fn with_overshoot_distance(mut self, distance: f32) -> Self {
        self.overshoot_distance = distance;
        self
    }

    pub fn with_move_duration(mut self, min: f32, max: f32) -> Self {
        self.min_move_duration = min;
        self.max_move_duration = max;
        self
    }

    pub fn with_step_height(mut self, height: f32) -> Self {
        self.step_height = height;
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

#[derive(Debug, Clone, Copy)]
struct Step {
    start: Transform,
    control: Vec3,
    end: Transform,
    duration: f32,
    timer: f32,
}

/// Moves a foot locator between rest points along an arc.
///
/// The stepper is driven once per frame: [`try_move`](Self::try_move)
/// decides whether a new step should start, [`advance`](Self::advance) moves
/// the locator of the step in flight.
#[derive(Debug, Clone)]
pub struct LegStepper {
    config: StepConfig,
    locator: Transform,
    time_dilation: f32,
    step: Option<Step>,
}

impl LegStepper {
    pub fn new(config: StepConfig, locator: Transform) -> Self {
        Self {
            config,
            locator,
            time_dilation: 1.0,
            step: None,
        }
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn locator(&self) -> Transform {
        self.locator
    }

    pub fn set_locator(&mut self, locator: Transform) {
        self.locator = locator;
    }

    pub fn is_moving(&self) -> bool {
        self.step.is_some()
    }

    pub fn time_dilation(&self) -> f32 {
        self.time_dilation
    }

    /// Squared distance from `rest` to `point`, ignoring the offset along the
    /// rest transform's up axis.
    pub fn sqr_distance_from_rest(rest: &Transform, point: Vec3) -> f32 {
        match Plane::new(rest.up(), rest.position) {
            Some(plane) => (plane.closest_point(point) - rest.position).length_squared(),
            None => (point - rest.position).length_squared(),
        }
    }

    /// Updates the step speed from the body's movement input and starts a
    /// step when the locator has drifted too far from `rest`. `foot` is the
    /// solved end effector position, where the arc begins. `jitter` in
    /// `[0, 1]` picks the step duration. Returns whether a step started.
    pub fn try_move(
        &mut self,
        rest: &Transform,
        foot: Vec3,
        move_param: f32,
        turn_param: f32,
        jitter: f32,
        ground: &impl GroundQuery,
    ) -> bool {
        self.time_dilation = (move_param.abs() + turn_param.abs()).clamp(0.0, 1.0);

        if self.is_moving() {
            return false;
        }

        let max_distance = self.config.foot_max_distance;
        if Self::sqr_distance_from_rest(rest, self.locator.position) > max_distance * max_distance {
            self.start_step(rest, foot, move_param, jitter, ground)
        } else {
            false
        }
    }

    /// Starts a step toward the rest point unless one is already in flight.
    ///
    /// The arc leaves from `foot`, which trails the locator while the chain
    /// is over-extended. Step length is measured from the locator.
    pub fn start_step(
        &mut self,
        rest: &Transform,
        foot: Vec3,
        move_param: f32,
        jitter: f32,
        ground: &impl GroundQuery,
    ) -> bool {
        if self.is_moving() {
            return false;
        }

        let start = Transform::from_position_rotation(foot, self.locator.rotation);
        let up = rest.up();
        let forward = rest.forward();

        let displacement = rest.position - self.locator.position;
        let step_length = displacement.length() + self.config.overshoot_distance;
        let overshoot = foot + displacement.normalize_or_zero() * step_length;
        let in_front = rest.position + forward * self.config.overshoot_distance * move_param;
        let mut end =
            Transform::from_position_rotation((overshoot + in_front) * 0.5, rest.rotation);

        let ray = Ray::new(end.position + up * self.config.cast_height, -up);
        if let Some(hit) = ground.cast(&ray) {
            end.position = hit.point + hit.normal * self.config.rest_height;
            end.rotation = surface_rotation(hit.normal, forward).unwrap_or(rest.rotation);
        }

        let control = (start.position + end.position) * 0.5 + up * self.config.step_height;
        let jitter = jitter.clamp(0.0, 1.0);
        let duration = self.config.min_move_duration
            + (self.config.max_move_duration - self.config.min_move_duration) * jitter;

        debug!(
            "leg step from {:?} to {:?} over {:.2}s",
            start.position, end.position, duration
        );

        self.step = Some(Step {
            start,
            control,
            end,
            duration,
            timer: 0.0,
        });
        true
    }

    /// Starts a step with no forward bias, for when the IK chain cannot reach
    /// the locator.
    pub fn notify_over_extended(
        &mut self,
        rest: &Transform,
        foot: Vec3,
        jitter: f32,
        ground: &impl GroundQuery,
    ) -> bool {
        self.start_step(rest, foot, 0.0, jitter, ground)
    }

    /// Advances the step in flight. Returns the new locator while a step is
    /// running, including the frame it lands on.
    pub fn advance(&mut self, dt: f32) -> Option<Transform> {
        let step = self.step.as_mut()?;

        step.timer += dt * self.time_dilation;
        let t = if step.duration > 0.0 {
            cubic_in_out(step.timer / step.duration)
        } else {
            1.0
        };

        self.locator = Transform::from_position_rotation(
            quadratic_bezier(t, step.start.position, step.control, step.end.position),
            step.start.rotation.slerp(step.end.rotation, t),
        );

        if step.timer >= step.duration {
            self.step = None;
        }
        Some(self.locator)
    }
}

/// Rotation whose up axis is the surface normal, with forward kept as close
/// to `forward` as the surface allows.
pub(crate) fn surface_rotation(normal: Vec3, forward: Vec3) -> Option<Quat> {
    let up = normal.try_normalize()?;
    let right = forward.cross(up).try_normalize()?;
    let forward = up.cross(right);
    Some(rotation_from_axes(right, up, forward))
}
