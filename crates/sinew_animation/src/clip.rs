use sinew_core::{Result, SinewError, TimeSpan};

use crate::keyframe::{Keyframe, sort_keyframes};

/// A named, time-bounded sequence of keyframes for one or more bones.
///
/// Keyframes are always ordered by `(time, bone)`; the constructor sorts
/// them, so a clip can never be observed out of order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    duration: TimeSpan,
    keyframes: Vec<Keyframe>,
}

impl AnimationClip {
    /// Builds a clip, sorting the keyframes.
    ///
    /// Fails when the clip has no keyframe or a non-positive duration.
    pub fn new(
        name: impl Into<String>,
        duration: TimeSpan,
        mut keyframes: Vec<Keyframe>,
    ) -> Result<Self> {
        let name = name.into();

        if keyframes.is_empty() {
            return Err(SinewError::ClipHasNoKeyframes { clip: name });
        }
        if !duration.is_positive() {
            return Err(SinewError::ClipDurationNotPositive {
                clip: name,
                ticks: duration.ticks(),
            });
        }

        sort_keyframes(&mut keyframes);

        Ok(Self {
            name,
            duration,
            keyframes,
        })
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> TimeSpan {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Largest bone index referenced by any keyframe.
    #[must_use]
    pub fn max_bone(&self) -> Option<usize> {
        self.keyframes.iter().map(|k| k.bone).max()
    }
}
