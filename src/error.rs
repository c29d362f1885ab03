use thiserror::Error;

/// Errors raised while building clip graphs or IK chains, or when a caller
/// breaks a playback precondition.
///
/// Per-frame lookups never produce these: a transition that names a missing
/// clip falls back to the current clip instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("keyframe duration must be positive and finite, got {duration}")]
    InvalidDuration { duration: f64 },

    #[error("clip '{clip}' references an empty keyframe pool")]
    EmptyKeyframePool { clip: String },

    #[error("clip '{clip}' has first keyframe {first} after last keyframe {last}")]
    InvalidKeyframeRange {
        clip: String,
        first: usize,
        last: usize,
    },

    #[error("no clip named '{0}'")]
    ClipNotFound(String),

    #[error("clip index {index} is out of range for a pool of {count} clips")]
    ClipIndexOutOfRange { index: usize, count: usize },

    #[error("clip pool is empty")]
    EmptyClipPool,

    #[error("pause transition applied on clip {clip} while playback is already paused")]
    TransitionWhilePaused { clip: usize },

    #[error("chain needs {requested} ancestors above the end effector but only {available} exist")]
    ChainTooLong { requested: usize, available: usize },

    #[error("joint {0} does not exist in the skeleton")]
    UnknownJoint(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
