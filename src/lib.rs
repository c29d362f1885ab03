//! # clip-ik
//!
//! Keyframe clip playback with conditional transitions, and a FABRIK-based
//! inverse kinematics solver for planting limbs on uneven ground.
//!
//! ## Features
//! - Shared keyframe and clip pools, one playback cursor per animated entity
//! - Transition graph between clips driven by trigger, bool and float parameters
//! - Step, nearest, linear and Catmull-Rom sampling
//! - FABRIK chain solver with a pole constraint and rotation reconstruction
//! - Procedural look-at, leg stepping and tail following on top of a
//!   host-provided ground query
//!
//! ## Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use clip_ik::clip::{
//!     Clip, ClipController, ClipPool, EvaluationMode, Keyframe, KeyframePool, Transition,
//!     TransitionKind,
//! };
//!
//! let keyframes = Arc::new(KeyframePool::new(vec![
//!     Keyframe::new(0.0, 1.0, 0.0)?,
//!     Keyframe::new(1.0, 1.0, 1.0)?,
//! ]));
//! let idle = Clip::new(
//!     "idle",
//!     keyframes,
//!     0,
//!     1,
//!     Transition::new(TransitionKind::Forward),
//!     Transition::new(TransitionKind::Backward),
//! )?;
//!
//! let mut controller = ClipController::new("body", Arc::new(ClipPool::new(vec![idle])), "idle")?;
//! controller.update(0.5)?;
//! println!("value: {}", controller.evaluate(EvaluationMode::Lerp));
//! ```

pub mod clip;
pub mod error;
pub mod ground;
pub mod ik;
pub mod math;

pub use clip::{
    Clip, ClipController, ClipPool, ClipRef, EvaluationMode, Keyframe, KeyframePool,
    ParameterValue, PlaybackDirection, Predicate, Transition, TransitionKind,
    TransitionParameters,
};
pub use error::{Error, Result};
pub use ground::{GroundHit, GroundQuery, Ray};
pub use ik::{
    FabrikSolver, JointId, LegStepper, ProceduralGrab, ProceduralLook, Skeleton, SolveResult,
    SolverConfig, StepConfig, TailConfig, TailFollower,
};
pub use math::Transform;
