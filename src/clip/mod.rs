//! Keyframe clip playback
//!
//! Keyframes live in shared, immutable pools. Clips select a range of a pool
//! and carry a [`Transition`] for each end; a [`ClipController`] walks the
//! clips over time and samples the value channel.

pub mod controller;
pub mod interpolate;
pub mod keyframe;
pub mod parameters;
pub mod pool;
pub mod transition;

pub use controller::{ClipController, PlaybackDirection};
pub use interpolate::EvaluationMode;
pub use keyframe::{Keyframe, KeyframePool};
pub use parameters::{ParameterValue, TransitionParameters};
pub use pool::{Clip, ClipPool, ClipRef};
pub use transition::{Condition, PlaybackState, Predicate, Transition, TransitionKind};
