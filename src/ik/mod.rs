//! Inverse kinematics module
//!
//! Joint hierarchies, the FABRIK chain solver with its pole constraint, and
//! the procedural helpers built on top of it.

pub mod chain;
pub mod constraint;
pub mod joint;
pub mod leg;
pub mod look;
pub mod skeleton;
pub mod solver;
pub mod tail;

pub use chain::{ProceduralGrab, SolverConfig};
pub use constraint::PoleConstraint;
pub use joint::{Joint, JointId};
pub use leg::{LegStepper, StepConfig};
pub use look::ProceduralLook;
pub use skeleton::Skeleton;
pub use solver::{FabrikSolver, SolveResult};
pub use tail::{TailConfig, TailFollower};
