use crate::math::Transform;

/// Handle to a joint inside a [`Skeleton`](super::Skeleton).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub(crate) usize);

impl JointId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub parent: Option<JointId>,
    /// Transform relative to the parent, or to world space for roots.
    pub local: Transform,
}

impl Joint {
    pub fn new(name: impl Into<String>, parent: Option<JointId>, local: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            local,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
