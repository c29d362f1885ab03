use std::ops::Index;
use std::sync::Arc;

use super::keyframe::{Keyframe, KeyframePool};
use super::transition::Transition;
use crate::error::{Error, Result};

/// A named, contiguous range of keyframes with a transition policy on each
/// end.
#[derive(Debug, Clone)]
pub struct Clip {
    name: String,
    index: usize,
    pool: Arc<KeyframePool>,
    first_keyframe: usize,
    last_keyframe: usize,
    duration: f64,
    keyframe_starts: Vec<f64>,
    forward: Transition,
    backward: Transition,
}

impl Clip {
    /// Out-of-range keyframe bounds are clamped into the pool.
    pub fn new(
        name: impl Into<String>,
        pool: Arc<KeyframePool>,
        first_keyframe: usize,
        last_keyframe: usize,
        forward: Transition,
        backward: Transition,
    ) -> Result<Self> {
        let name = name.into();
        if pool.is_empty() {
            return Err(Error::EmptyKeyframePool { clip: name });
        }

        let max = pool.count() - 1;
        let first = first_keyframe.min(max);
        let last = last_keyframe.min(max);
        if first > last {
            return Err(Error::InvalidKeyframeRange {
                clip: name,
                first,
                last,
            });
        }

        let mut keyframe_starts = Vec::with_capacity(last - first + 1);
        let mut duration = 0.0;
        for keyframe in &pool.keyframes()[first..=last] {
            keyframe_starts.push(duration);
            duration += keyframe.duration();
        }

        Ok(Self {
            name,
            index: 0,
            pool,
            first_keyframe: first,
            last_keyframe: last,
            duration,
            keyframe_starts,
            forward,
            backward,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position inside the owning [`ClipPool`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn first_keyframe(&self) -> usize {
        self.first_keyframe
    }

    pub fn last_keyframe(&self) -> usize {
        self.last_keyframe
    }

    pub fn keyframe_count(&self) -> usize {
        self.last_keyframe - self.first_keyframe + 1
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn pool(&self) -> &Arc<KeyframePool> {
        &self.pool
    }

    /// Keyframe by pool index.
    pub fn keyframe(&self, index: usize) -> &Keyframe {
        &self.pool[index]
    }

    pub fn contains_keyframe(&self, index: usize) -> bool {
        (self.first_keyframe..=self.last_keyframe).contains(&index)
    }

    /// Time from the clip start to the start of the keyframe at `index`.
    pub fn keyframe_start(&self, index: usize) -> f64 {
        self.keyframe_starts[index - self.first_keyframe]
    }

    /// Next keyframe index, wrapping to the first keyframe of this clip.
    pub fn next_keyframe(&self, index: usize) -> usize {
        if index >= self.last_keyframe {
            self.first_keyframe
        } else {
            index + 1
        }
    }

    /// Previous keyframe index, wrapping to the last keyframe of this clip.
    pub fn prev_keyframe(&self, index: usize) -> usize {
        if index <= self.first_keyframe {
            self.last_keyframe
        } else {
            index - 1
        }
    }

    pub fn forward(&self) -> &Transition {
        &self.forward
    }

    pub fn backward(&self) -> &Transition {
        &self.backward
    }

    pub fn forward_mut(&mut self) -> &mut Transition {
        &mut self.forward
    }

    pub fn backward_mut(&mut self) -> &mut Transition {
        &mut self.backward
    }
}

impl Index<usize> for Clip {
    type Output = Keyframe;

    fn index(&self, index: usize) -> &Keyframe {
        self.keyframe(index)
    }
}

/// Selects a clip either by position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipRef {
    Index(usize),
    Name(String),
}

impl From<usize> for ClipRef {
    fn from(index: usize) -> Self {
        ClipRef::Index(index)
    }
}

impl From<&str> for ClipRef {
    fn from(name: &str) -> Self {
        ClipRef::Name(name.to_owned())
    }
}

impl From<String> for ClipRef {
    fn from(name: String) -> Self {
        ClipRef::Name(name)
    }
}

/// Owns a set of clips and assigns each its index.
#[derive(Debug, Clone, Default)]
pub struct ClipPool {
    clips: Vec<Clip>,
}

impl ClipPool {
    pub fn new(clips: Vec<Clip>) -> Self {
        let clips = clips
            .into_iter()
            .enumerate()
            .map(|(index, mut clip)| {
                clip.index = index;
                clip
            })
            .collect();
        Self { clips }
    }

    pub fn count(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    /// Linear scan, first match wins. Pools hold tens of clips at most.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|clip| clip.name == name)
    }

    pub fn by_name(&self, name: &str) -> Option<&Clip> {
        self.index_of(name).map(|index| &self.clips[index])
    }

    pub fn clip_mut(&mut self, index: usize) -> Option<&mut Clip> {
        self.clips.get_mut(index)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Clip> {
        let index = self.index_of(name)?;
        self.clips.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Clip> + '_ {
        self.clips.iter_mut()
    }

    pub fn resolve(&self, clip: &ClipRef) -> Result<usize> {
        match clip {
            ClipRef::Index(index) if *index < self.clips.len() => Ok(*index),
            ClipRef::Index(index) => Err(Error::ClipIndexOutOfRange {
                index: *index,
                count: self.clips.len(),
            }),
            ClipRef::Name(name) => self
                .index_of(name)
                .ok_or_else(|| Error::ClipNotFound(name.clone())),
        }
    }
}

impl Index<usize> for ClipPool {
    type Output = Clip;

    fn index(&self, index: usize) -> &Clip {
        &self.clips[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::transition::TransitionKind;
    use approx::assert_relative_eq;

    fn pool_of(durations: &[f64]) -> Arc<KeyframePool> {
        let mut start = 0.0;
        let keys = durations
            .iter()
            .map(|&d| {
                let key = Keyframe::new(start, d, start).unwrap();
                start += d;
                key
            })
            .collect();
        Arc::new(KeyframePool::new(keys))
    }

    fn looping(name: &str, pool: &Arc<KeyframePool>, first: usize, last: usize) -> Result<Clip> {
        Clip::new(
            name,
            pool.clone(),
            first,
            last,
            Transition::new(TransitionKind::Forward),
            Transition::new(TransitionKind::Backward),
        )
    }

    #[test]
    fn duration_sums_keyframes_in_range() {
        let pool = pool_of(&[0.5, 0.25, 1.0, 2.0]);
        let clip = looping("mid", &pool, 1, 2).unwrap();

        assert_relative_eq!(clip.duration(), 1.25);
        assert_eq!(clip.keyframe_count(), 2);
        assert_relative_eq!(clip.keyframe_start(1), 0.0);
        assert_relative_eq!(clip.keyframe_start(2), 0.25);
    }

    #[test]
    fn bounds_are_clamped_into_the_pool() {
        let pool = pool_of(&[1.0, 1.0, 1.0]);
        let clip = looping("all", &pool, 0, 99).unwrap();
        assert_eq!(clip.last_keyframe(), 2);
        assert_relative_eq!(clip.duration(), 3.0);

        let tail = looping("tail", &pool, 7, 9).unwrap();
        assert_eq!((tail.first_keyframe(), tail.last_keyframe()), (2, 2));
    }

    #[test]
    fn rejects_empty_pools_and_inverted_ranges() {
        let empty = Arc::new(KeyframePool::default());
        assert_eq!(
            looping("none", &empty, 0, 0).unwrap_err(),
            Error::EmptyKeyframePool {
                clip: "none".into()
            }
        );

        let pool = pool_of(&[1.0, 1.0, 1.0]);
        assert!(matches!(
            looping("backwards", &pool, 2, 1),
            Err(Error::InvalidKeyframeRange { first: 2, last: 1, .. })
        ));
    }

    #[test]
    fn neighbours_wrap_inside_the_clip_range() {
        let pool = pool_of(&[1.0; 6]);
        let clip = looping("mid", &pool, 2, 4).unwrap();

        assert_eq!(clip.next_keyframe(3), 4);
        assert_eq!(clip.next_keyframe(4), 2);
        assert_eq!(clip.prev_keyframe(2), 4);
        assert_eq!(clip.prev_keyframe(3), 2);
    }

    #[test]
    fn pool_assigns_indices_and_finds_first_match() {
        let keys = pool_of(&[1.0, 1.0]);
        let pool = ClipPool::new(vec![
            looping("a", &keys, 0, 0).unwrap(),
            looping("b", &keys, 1, 1).unwrap(),
            looping("a", &keys, 0, 1).unwrap(),
        ]);

        assert_eq!(pool[1].index(), 1);
        assert_eq!(pool[2].index(), 2);
        assert_eq!(pool.index_of("a"), Some(0));
        assert_eq!(pool.index_of("zzz"), None);
        assert_eq!(pool.resolve(&"b".into()), Ok(1));
        assert_eq!(
            pool.resolve(&ClipRef::Index(3)),
            Err(Error::ClipIndexOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(
            pool.resolve(&"zzz".into()),
            Err(Error::ClipNotFound("zzz".into()))
        );
    }
}
