use std::fmt;
use std::sync::Arc;

use super::controller::PlaybackDirection;
use super::parameters::{ParameterValue, TransitionParameters};
use super::pool::{Clip, ClipPool};
use crate::error::{Error, Result};

/// What happens when playback runs off either end of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Hold the boundary keyframe of the current clip.
    Pause,
    /// Play the target from the start of its first keyframe.
    Forward,
    /// Pause at the start of the target's first keyframe.
    ForwardPause,
    /// Rewind the target from the end of its last keyframe.
    Backward,
    /// Pause at the end of the target's last keyframe.
    BackwardPause,
    /// Play the target from its second keyframe.
    ForwardSkip,
    /// Pause at the start of the target's second keyframe.
    ForwardSkipPause,
    /// Rewind the target from its second-to-last keyframe.
    BackwardSkip,
    /// Pause at the end of the target's second-to-last keyframe.
    BackwardSkipPause,
}

/// Playback cursor threaded through a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub clip_index: usize,
    pub keyframe_index: usize,
    pub keyframe_time: f64,
    pub direction: PlaybackDirection,
}

/// Test run against a parameter value when a transition fires.
#[derive(Clone)]
pub enum Predicate {
    /// A trigger that has been fired. Evaluating it re-arms the trigger.
    Triggered,
    IsTrue,
    GreaterThan(f64),
    LessThan(f64),
    Custom(Arc<dyn Fn(&ParameterValue) -> bool + Send + Sync>),
}

impl Predicate {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ParameterValue) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom(Arc::new(f))
    }

    /// Missing parameters and mismatched kinds never match.
    pub fn evaluate(&self, value: Option<&ParameterValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match (self, value) {
            (Predicate::Triggered, ParameterValue::Trigger(fired)) => *fired,
            (Predicate::IsTrue, ParameterValue::Bool(flag) | ParameterValue::Trigger(flag)) => {
                *flag
            }
            (Predicate::GreaterThan(threshold), ParameterValue::Float(v)) => v > threshold,
            (Predicate::LessThan(threshold), ParameterValue::Float(v)) => v < threshold,
            (Predicate::Custom(f), value) => f(value),
            _ => false,
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Triggered => write!(f, "Triggered"),
            Predicate::IsTrue => write!(f, "IsTrue"),
            Predicate::GreaterThan(v) => write!(f, "GreaterThan({v})"),
            Predicate::LessThan(v) => write!(f, "LessThan({v})"),
            Predicate::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub parameter: String,
    pub target: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone)]
pub struct Transition {
    kind: TransitionKind,
    target: Option<String>,
    conditions: Vec<Condition>,
}

impl Transition {
    /// A transition that targets the clip it belongs to.
    pub fn new(kind: TransitionKind) -> Self {
        Self {
            kind,
            target: None,
            conditions: Vec::new(),
        }
    }

    pub fn to(kind: TransitionKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: Some(target.into()),
            conditions: Vec::new(),
        }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Conditions are checked in the order they are added.
    pub fn add_condition(
        &mut self,
        parameter: impl Into<String>,
        target: impl Into<String>,
        predicate: Predicate,
    ) -> &mut Self {
        self.conditions.push(Condition {
            parameter: parameter.into(),
            target: target.into(),
            predicate,
        });
        self
    }

    pub fn with_condition(
        mut self,
        parameter: impl Into<String>,
        target: impl Into<String>,
        predicate: Predicate,
    ) -> Self {
        self.add_condition(parameter, target, predicate);
        self
    }

    /// Index of the clip this transition leads to. The first matching
    /// condition wins, then the default target. Unknown names fall back to
    /// `current`.
    pub fn next_clip(
        &self,
        pool: &ClipPool,
        current: usize,
        parameters: &mut TransitionParameters,
    ) -> usize {
        let target = self
            .conditions
            .iter()
            .find(|condition| {
                let value = parameters.consume(&condition.parameter);
                condition.predicate.evaluate(value.as_ref())
            })
            .map(|condition| condition.target.as_str())
            .or(self.target.as_deref());

        match target {
            None => current,
            Some(name) => pool.index_of(name).unwrap_or_else(|| {
                log::warn!("transition target '{name}' not in pool, staying on clip {current}");
                current
            }),
        }
    }

    /// Computes the cursor after running off the current clip. `state`
    /// carries the out-of-bounds keyframe time.
    pub fn apply(
        &self,
        pool: &ClipPool,
        state: PlaybackState,
        parameters: &mut TransitionParameters,
    ) -> Result<PlaybackState> {
        // a pause holds the current clip and never reads its conditions
        let next_index = match self.kind {
            TransitionKind::Pause => state.clip_index,
            _ => self.next_clip(pool, state.clip_index, parameters),
        };
        let next = &pool[next_index];
        let overflow = state.keyframe_time.abs();

        let result = match self.kind {
            TransitionKind::Pause => {
                let current = &pool[state.clip_index];
                let (keyframe_index, keyframe_time) = match state.direction {
                    PlaybackDirection::Forward => {
                        let last = current.last_keyframe();
                        (last, current[last].duration())
                    }
                    PlaybackDirection::Reverse => (current.first_keyframe(), 0.0),
                    PlaybackDirection::Pause => {
                        return Err(Error::TransitionWhilePaused {
                            clip: state.clip_index,
                        })
                    }
                };
                PlaybackState {
                    clip_index: state.clip_index,
                    keyframe_index,
                    keyframe_time,
                    direction: PlaybackDirection::Pause,
                }
            }
            TransitionKind::Forward => {
                enter_forward(next, next.first_keyframe(), overflow, PlaybackDirection::Forward)
            }
            TransitionKind::ForwardPause => {
                enter_forward(next, next.first_keyframe(), 0.0, PlaybackDirection::Pause)
            }
            TransitionKind::ForwardSkip => {
                enter_forward(next, skip_first(next), overflow, PlaybackDirection::Forward)
            }
            TransitionKind::ForwardSkipPause => {
                enter_forward(next, skip_first(next), 0.0, PlaybackDirection::Pause)
            }
            TransitionKind::Backward => {
                enter_backward(next, next.last_keyframe(), overflow, PlaybackDirection::Reverse)
            }
            TransitionKind::BackwardPause => {
                enter_backward(next, next.last_keyframe(), 0.0, PlaybackDirection::Pause)
            }
            TransitionKind::BackwardSkip => {
                enter_backward(next, skip_last(next), overflow, PlaybackDirection::Reverse)
            }
            TransitionKind::BackwardSkipPause => {
                enter_backward(next, skip_last(next), 0.0, PlaybackDirection::Pause)
            }
        };

        log::debug!(
            "{:?} transition: clip {} -> {} (keyframe {}, t={:.4}, {:?})",
            self.kind,
            state.clip_index,
            result.clip_index,
            result.keyframe_index,
            result.keyframe_time,
            result.direction
        );

        Ok(result)
    }
}

fn enter_forward(
    clip: &Clip,
    keyframe_index: usize,
    keyframe_time: f64,
    direction: PlaybackDirection,
) -> PlaybackState {
    PlaybackState {
        clip_index: clip.index(),
        keyframe_index,
        keyframe_time,
        direction,
    }
}

fn enter_backward(
    clip: &Clip,
    keyframe_index: usize,
    overflow: f64,
    direction: PlaybackDirection,
) -> PlaybackState {
    PlaybackState {
        clip_index: clip.index(),
        keyframe_index,
        keyframe_time: clip[keyframe_index].duration() - overflow,
        direction,
    }
}

// Single-keyframe clips have nothing to skip.
fn skip_first(clip: &Clip) -> usize {
    (clip.first_keyframe() + 1).min(clip.last_keyframe())
}

fn skip_last(clip: &Clip) -> usize {
    clip.last_keyframe()
        .saturating_sub(1)
        .max(clip.first_keyframe())
}
