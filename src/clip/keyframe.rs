use std::ops::Index;

use crate::error::{Error, Result};

/// A timed scalar sample spanning `[start_time, start_time + duration)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    start_time: f64,
    duration: f64,
    inverse_duration: f64,
    value: f64,
    index: usize,
}

impl Keyframe {
    pub fn new(start_time: f64, duration: f64, value: f64) -> Result<Self> {
        check_duration(duration)?;
        Ok(Self {
            start_time,
            duration,
            inverse_duration: 1.0 / duration,
            value,
            index: 0,
        })
    }

    /// Builds a keyframe from its start and end times.
    pub fn spanning(start_time: f64, end_time: f64, value: f64) -> Result<Self> {
        Self::new(start_time, end_time - start_time, value)
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn inverse_duration(&self) -> f64 {
        self.inverse_duration
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Position inside the owning pool, assigned by [`KeyframePool::new`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_duration(&mut self, duration: f64) -> Result<()> {
        check_duration(duration)?;
        self.duration = duration;
        self.inverse_duration = 1.0 / duration;
        Ok(())
    }

    pub fn set_inverse_duration(&mut self, inverse_duration: f64) -> Result<()> {
        check_duration(inverse_duration)?;
        self.inverse_duration = inverse_duration;
        self.duration = 1.0 / inverse_duration;
        Ok(())
    }
}

fn check_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidDuration { duration })
    }
}

/// Keyframes in authoring order. Immutable once built; clips share it through
/// an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct KeyframePool {
    keyframes: Vec<Keyframe>,
}

impl KeyframePool {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        let keyframes = keyframes
            .into_iter()
            .enumerate()
            .map(|(index, mut keyframe)| {
                keyframe.index = index;
                keyframe
            })
            .collect();
        Self { keyframes }
    }

    pub fn count(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Keyframe> {
        self.keyframes.get(index)
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }
}

impl Index<usize> for KeyframePool {
    type Output = Keyframe;

    fn index(&self, index: usize) -> &Keyframe {
        &self.keyframes[index]
    }
}

impl FromIterator<Keyframe> for KeyframePool {
    fn from_iter<I: IntoIterator<Item = Keyframe>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
