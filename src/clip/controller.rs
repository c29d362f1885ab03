use std::sync::Arc;

use super::interpolate::{catmull_rom, lerp, nearest, EvaluationMode};
use super::keyframe::Keyframe;
use super::parameters::{ParameterValue, TransitionParameters};
use super::pool::{Clip, ClipPool, ClipRef};
use super::transition::PlaybackState;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackDirection {
    Reverse = -1,
    Pause = 0,
    Forward = 1,
}

impl PlaybackDirection {
    pub fn sign(self) -> f64 {
        self as i8 as f64
    }
}

/// Playback cursor over a shared [`ClipPool`].
///
/// Each call to [`update`](Self::update) handles at most one keyframe or clip
/// boundary, so a `dt` longer than the current keyframe leaves the cursor
/// behind real time until later frames catch up.
#[derive(Debug, Clone)]
pub struct ClipController {
    name: String,
    pool: Arc<ClipPool>,

    clip_index: usize,
    clip_time: f64,
    clip_parameter: f64,

    keyframe_index: usize,
    keyframe_time: f64,
    keyframe_parameter: f64,

    direction: PlaybackDirection,
    playback_speed: f64,
    parameters: TransitionParameters,
}

impl ClipController {
    /// Starts playing forward at speed 1 from the first keyframe of `start`.
    pub fn new(
        name: impl Into<String>,
        pool: Arc<ClipPool>,
        start: impl Into<ClipRef>,
    ) -> Result<Self> {
        if pool.is_empty() {
            return Err(Error::EmptyClipPool);
        }
        let clip_index = pool.resolve(&start.into())?;
        let keyframe_index = pool[clip_index].first_keyframe();

        let mut controller = Self {
            name: name.into(),
            pool,
            clip_index,
            clip_time: 0.0,
            clip_parameter: 0.0,
            keyframe_index,
            keyframe_time: 0.0,
            keyframe_parameter: 0.0,
            direction: PlaybackDirection::Forward,
            playback_speed: 1.0,
            parameters: TransitionParameters::new(),
        };
        controller.refresh();
        Ok(controller)
    }

    pub fn update(&mut self, dt: f64) -> Result<()> {
        if self.direction == PlaybackDirection::Pause || self.playback_speed <= 0.0 {
            return Ok(());
        }

        self.keyframe_time += dt * self.playback_speed * self.direction.sign();

        match self.direction {
            PlaybackDirection::Forward => {
                let duration = self.current_keyframe().duration();
                if self.keyframe_time >= duration {
                    self.keyframe_time -= duration;
                    if self.keyframe_index == self.current_clip().last_keyframe() {
                        self.run_transition(PlaybackDirection::Forward)?;
                    } else {
                        self.keyframe_index += 1;
                    }
                }
            }
            PlaybackDirection::Reverse => {
                if self.keyframe_time < 0.0 {
                    if self.keyframe_index == self.current_clip().first_keyframe() {
                        self.run_transition(PlaybackDirection::Reverse)?;
                    } else {
                        let overflow = -self.keyframe_time;
                        self.keyframe_index -= 1;
                        self.keyframe_time = self.current_keyframe().duration() - overflow;
                    }
                }
            }
            PlaybackDirection::Pause => {}
        }

        self.refresh();
        Ok(())
    }

    fn run_transition(&mut self, leaving: PlaybackDirection) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let clip = &pool[self.clip_index];
        let transition = match leaving {
            PlaybackDirection::Reverse => clip.backward(),
            _ => clip.forward(),
        };

        let next = transition.apply(&pool, self.state(), &mut self.parameters)?;
        self.clip_index = next.clip_index;
        self.keyframe_index = next.keyframe_index;
        self.keyframe_time = next.keyframe_time;
        self.direction = next.direction;
        Ok(())
    }

    fn refresh(&mut self) {
        let clip = &self.pool[self.clip_index];
        let keyframe = &clip[self.keyframe_index];
        self.keyframe_parameter = self.keyframe_time * keyframe.inverse_duration();
        self.clip_time = clip.keyframe_start(self.keyframe_index) + self.keyframe_time;
        self.clip_parameter = self.clip_time / clip.duration();
    }

    /// Samples the current clip without touching the cursor.
    pub fn evaluate(&self, mode: EvaluationMode) -> f64 {
        let clip = self.current_clip();
        let index = self.keyframe_index;
        let current = clip[index].value();
        let t = self.keyframe_parameter;

        match mode {
            EvaluationMode::Step => current,
            EvaluationMode::Nearest => nearest(current, clip[clip.next_keyframe(index)].value(), t),
            EvaluationMode::Lerp => lerp(current, clip[clip.next_keyframe(index)].value(), t),
            EvaluationMode::CatmullRom => {
                let prev = clip.prev_keyframe(index);
                let next = clip.next_keyframe(index);
                let after = clip.next_keyframe(next);
                catmull_rom(
                    clip[prev].value(),
                    current,
                    clip[next].value(),
                    clip[after].value(),
                    t,
                )
            }
        }
    }

    /// Cross-fades two controllers: `t = 0` is all `a`, `t = 1` all `b`.
    pub fn blend_evaluations(a: &Self, b: &Self, mode: EvaluationMode, t: f64) -> f64 {
        lerp(a.evaluate(mode), b.evaluate(mode), t)
    }

    /// Jumps to the first keyframe of another clip. Direction and speed are
    /// kept.
    pub fn set_current_clip(&mut self, clip: impl Into<ClipRef>) -> Result<()> {
        let clip_index = self.pool.resolve(&clip.into())?;
        log::debug!(
            "{}: switching to clip {} '{}'",
            self.name,
            clip_index,
            self.pool[clip_index].name()
        );
        self.clip_index = clip_index;
        self.keyframe_index = self.pool[clip_index].first_keyframe();
        self.keyframe_time = 0.0;
        self.refresh();
        Ok(())
    }

    pub fn go_to_next_clip(&mut self) -> Result<()> {
        let next = (self.clip_index + 1) % self.pool.count();
        self.set_current_clip(next)
    }

    pub fn go_to_prev_clip(&mut self) -> Result<()> {
        let prev = match self.clip_index {
            0 => self.pool.count() - 1,
            index => index - 1,
        };
        self.set_current_clip(prev)
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            clip_index: self.clip_index,
            keyframe_index: self.keyframe_index,
            keyframe_time: self.keyframe_time,
            direction: self.direction,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pool(&self) -> &Arc<ClipPool> {
        &self.pool
    }

    pub fn current_clip(&self) -> &Clip {
        &self.pool[self.clip_index]
    }

    pub fn current_keyframe(&self) -> &Keyframe {
        &self.current_clip()[self.keyframe_index]
    }

    pub fn clip_index(&self) -> usize {
        self.clip_index
    }

    pub fn clip_time(&self) -> f64 {
        self.clip_time
    }

    pub fn clip_parameter(&self) -> f64 {
        self.clip_parameter
    }

    pub fn keyframe_index(&self) -> usize {
        self.keyframe_index
    }

    pub fn keyframe_time(&self) -> f64 {
        self.keyframe_time
    }

    pub fn keyframe_parameter(&self) -> f64 {
        self.keyframe_parameter
    }

    pub fn direction(&self) -> PlaybackDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: PlaybackDirection) {
        self.direction = direction;
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    /// Speeds at or below zero stop [`update`](Self::update) from advancing.
    pub fn set_playback_speed(&mut self, speed: f64) {
        self.playback_speed = speed;
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.set(name, value);
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn fire_trigger(&mut self, name: impl Into<String>) {
        self.parameters.fire(name);
    }

    pub fn parameters(&self) -> &TransitionParameters {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::keyframe::KeyframePool;
    use crate::clip::transition::{Transition, TransitionKind};
    use approx::assert_relative_eq;

    fn pool_with(
        values: &[f64],
        forward: TransitionKind,
        backward: TransitionKind,
    ) -> Arc<ClipPool> {
        let keys: KeyframePool = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Keyframe::new(i as f64, 1.0, v).unwrap())
            .collect();
        let clip = Clip::new(
            "clip",
            Arc::new(keys),
            0,
            values.len() - 1,
            Transition::new(forward),
            Transition::new(backward),
        )
        .unwrap();
        Arc::new(ClipPool::new(vec![clip]))
    }

    #[test]
    fn starts_at_first_keyframe_of_named_clip() {
        let pool = pool_with(&[0.0, 1.0], TransitionKind::Forward, TransitionKind::Backward);
        let controller = ClipController::new("c", pool.clone(), "clip").unwrap();
        assert_eq!(controller.keyframe_index(), 0);
        assert_eq!(controller.direction(), PlaybackDirection::Forward);
        assert_eq!(controller.playback_speed(), 1.0);

        assert_eq!(
            ClipController::new("c", pool, "missing").unwrap_err(),
            Error::ClipNotFound("missing".into())
        );
        assert_eq!(
            ClipController::new("c", Arc::new(ClipPool::default()), 0usize).unwrap_err(),
            Error::EmptyClipPool
        );
    }

    #[test]
    fn update_zero_changes_nothing() {
        let pool = pool_with(&[0.0, 1.0, 4.0], TransitionKind::Forward, TransitionKind::Backward);
        let mut controller = ClipController::new("c", pool, 0usize).unwrap();
        controller.update(1.3).unwrap();
        let before = controller.state();
        let clip_time = controller.clip_time();

        for _ in 0..5 {
            controller.update(0.0).unwrap();
        }

        assert_eq!(controller.state(), before);
        assert_eq!(controller.clip_time(), clip_time);
    }

    #[test]
    fn paused_or_stopped_controllers_do_not_advance() {
        let pool = pool_with(&[0.0, 1.0], TransitionKind::Forward, TransitionKind::Backward);
        let mut controller = ClipController::new("c", pool, 0usize).unwrap();

        controller.set_playback_speed(0.0);
        controller.update(0.5).unwrap();
        assert_eq!(controller.keyframe_time(), 0.0);

        controller.set_playback_speed(2.0);
        controller.set_direction(PlaybackDirection::Pause);
        controller.update(0.5).unwrap();
        assert_eq!(controller.keyframe_time(), 0.0);

        controller.set_direction(PlaybackDirection::Forward);
        controller.update(0.25).unwrap();
        assert_relative_eq!(controller.keyframe_time(), 0.5);
    }

    #[test]
    fn reverse_steps_back_and_reflects_remainder() {
        let pool = pool_with(&[0.0, 1.0, 2.0], TransitionKind::Forward, TransitionKind::Backward);
        let mut controller = ClipController::new("c", pool, 0usize).unwrap();
        controller.update(1.0).unwrap();
        controller.update(0.25).unwrap();
        assert_eq!(controller.keyframe_index(), 1);

        controller.set_direction(PlaybackDirection::Reverse);
        controller.update(0.5).unwrap();
        assert_eq!(controller.keyframe_index(), 0);
        assert_relative_eq!(controller.keyframe_time(), 0.75);
        assert_relative_eq!(controller.clip_time(), 0.75);
    }

    #[test]
    fn reverse_off_the_start_uses_backward_transition() {
        let pool = pool_with(&[0.0, 1.0, 2.0], TransitionKind::Forward, TransitionKind::Backward);
        let mut controller = ClipController::new("c", pool, 0usize).unwrap();
        controller.set_direction(PlaybackDirection::Reverse);
        controller.update(0.25).unwrap();

        assert_eq!(controller.keyframe_index(), 2);
        assert_relative_eq!(controller.keyframe_time(), 0.75);
        assert_relative_eq!(controller.clip_time(), 2.75);
        assert_relative_eq!(controller.clip_parameter(), 2.75 / 3.0);
    }

    #[test]
    fn evaluation_modes() {
        let pool = pool_with(
            &[0.0, 10.0, 20.0, 30.0],
            TransitionKind::Forward,
            TransitionKind::Backward,
        );
        let mut controller = ClipController::new("c", pool, 0usize).unwrap();
        controller.update(1.0).unwrap();
        controller.update(0.25).unwrap();

        assert_eq!(controller.evaluate(EvaluationMode::Step), 10.0);
        assert_eq!(controller.evaluate(EvaluationMode::Nearest), 10.0);
        assert_relative_eq!(controller.evaluate(EvaluationMode::Lerp), 12.5);
        // evenly spaced values make the spline linear
        assert_relative_eq!(controller.evaluate(EvaluationMode::CatmullRom), 12.5, epsilon = 1e-9);

        controller.update(0.5).unwrap();
        assert_eq!(controller.evaluate(EvaluationMode::Nearest), 20.0);
    }

    #[test]
    fn catmull_rom_wraps_inside_the_clip() {
        let pool = pool_with(
            &[0.0, 10.0, 20.0, 30.0],
            TransitionKind::Forward,
            TransitionKind::Backward,
        );
        let mut controller = ClipController::new("c", pool, 0usize).unwrap();
        for _ in 0..3 {
            controller.update(1.0).unwrap();
        }
        assert_eq!(controller.keyframe_index(), 3);

        controller.update(0.5).unwrap();
        let expected = catmull_rom(20.0, 30.0, 0.0, 10.0, 0.5);
        assert_relative_eq!(controller.evaluate(EvaluationMode::CatmullRom), expected);
    }

    #[test]
    fn clip_navigation_wraps_and_resets_the_cursor() {
        let keys: Arc<KeyframePool> = Arc::new(
            (0..3)
                .map(|i| Keyframe::new(i as f64, 1.0, i as f64).unwrap())
                .collect(),
        );
        let clip = |name: &str, first, last| {
            Clip::new(
                name,
                Arc::clone(&keys),
                first,
                last,
                Transition::new(TransitionKind::Forward),
                Transition::new(TransitionKind::Backward),
            )
            .unwrap()
        };
        let pool = Arc::new(ClipPool::new(vec![clip("a", 0, 0), clip("b", 1, 2)]));
        let mut controller = ClipController::new("c", pool, "a").unwrap();
        controller.update(0.5).unwrap();

        controller.go_to_next_clip().unwrap();
        assert_eq!(controller.clip_index(), 1);
        assert_eq!(controller.keyframe_index(), 1);
        assert_eq!(controller.keyframe_time(), 0.0);

        controller.go_to_next_clip().unwrap();
        assert_eq!(controller.clip_index(), 0);
        controller.go_to_prev_clip().unwrap();
        assert_eq!(controller.current_clip().name(), "b");

        assert!(controller.set_current_clip(5usize).is_err());
        controller.set_current_clip("a").unwrap();
        assert_eq!(controller.current_keyframe().index(), 0);
    }

    #[test]
    fn blend_mixes_two_controllers() {
        let low = pool_with(&[1.0, 1.0], TransitionKind::Forward, TransitionKind::Backward);
        let high = pool_with(&[3.0, 3.0], TransitionKind::Forward, TransitionKind::Backward);
        let a = ClipController::new("low", low, 0usize).unwrap();
        let b = ClipController::new("high", high, 0usize).unwrap();

        let blend = |mode, t| ClipController::blend_evaluations(&a, &b, mode, t);
        assert_relative_eq!(blend(EvaluationMode::Lerp, 0.25), 1.5);
        assert_relative_eq!(blend(EvaluationMode::Step, 1.0), 3.0);
    }
}
