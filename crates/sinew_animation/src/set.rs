use std::sync::Arc;

use indexmap::IndexMap;
use sinew_core::{Result, SinewError};

use crate::clip::AnimationClip;
use crate::skeleton::Skeleton;

/// A skeleton together with its named clips.
///
/// Immutable once built and shared between players through `Arc`. Clips
/// keep their insertion order; the first clip is the one a new player
/// starts with.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    skeleton: Skeleton,
    clips: IndexMap<String, Arc<AnimationClip>>,
}

impl AnimationSet {
    /// Pairs a skeleton with clips, keyed by each clip's name.
    ///
    /// Fails when two clips share a name or a keyframe targets a bone the
    /// skeleton does not have.
    pub fn new(skeleton: Skeleton, clips: impl IntoIterator<Item = AnimationClip>) -> Result<Self> {
        let bone_count = skeleton.bone_count();
        let mut map = IndexMap::new();

        for clip in clips {
            if let Some(bone) = clip.max_bone().filter(|&b| b >= bone_count) {
                return Err(SinewError::InvalidContent(format!(
                    "clip '{}' animates bone {bone}, but the skeleton has {bone_count} bones",
                    clip.name
                )));
            }
            if map.contains_key(&clip.name) {
                return Err(SinewError::InvalidContent(format!(
                    "duplicate clip name '{}'",
                    clip.name
                )));
            }
            map.insert(clip.name.clone(), Arc::new(clip));
        }

        Ok(Self {
            skeleton,
            clips: map,
        })
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn clips(&self) -> &IndexMap<String, Arc<AnimationClip>> {
        &self.clips
    }

    #[must_use]
    pub fn clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.get(name)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.skeleton.bone_index(name)
    }
}
