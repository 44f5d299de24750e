//! Clip Player
//!
//! Per-instance playback state over a shared [`AnimationSet`].
//!
//! # Overview
//!
//! Every [`AnimationPlayer::update`] produces three transform arrays, one
//! entry per bone:
//!
//! - **bone transforms**: local (parent-relative), seeded from the bind pose
//!   and overwritten by every keyframe up to the current time
//! - **world transforms**: bone transforms accumulated down the hierarchy,
//!   starting from the caller-supplied root transform
//! - **skin transforms**: `world * inverse_bind_pose`, ready for vertex
//!   skinning
//!
//! Keyframes are not interpolated: a bone holds its last applied keyframe
//! until the next one is reached.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut player = AnimationPlayer::new(set)?;
//! player.set_clip("walk")?;
//! player.update(dt, true, &Affine3A::IDENTITY)?;
//! skinner.update_vertices(player.skin_transforms(), 0, vertex_count)?;
//! ```

use std::sync::Arc;

use glam::Affine3A;
use sinew_core::{Result, SinewError};

use crate::clip::AnimationClip;
use crate::set::AnimationSet;

/// Playback state for one skeleton instance.
///
/// Cloning shares the [`AnimationSet`] and copies the pose arrays and the
/// playback position, so the clone advances independently.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    set: Arc<AnimationSet>,

    current_clip: Option<Arc<AnimationClip>>,
    /// Seconds into the current clip, within `[0, duration]`.
    current_time: f32,
    /// Index of the next keyframe to apply.
    keyframe_cursor: usize,
    has_ended: bool,

    bone_transforms: Vec<Affine3A>,
    world_transforms: Vec<Affine3A>,
    skin_transforms: Vec<Affine3A>,
}

impl AnimationPlayer {
    /// Creates a player positioned at the start of the set's first clip.
    pub fn new(set: Arc<AnimationSet>) -> Result<Self> {
        let first = set.clips().first().map(|(_, clip)| Arc::clone(clip));
        let Some(first) = first else {
            return Err(SinewError::NoClips);
        };

        let bone_count = set.skeleton().bone_count();
        let bind_pose = set.skeleton().bind_pose().to_vec();

        let mut player = Self {
            set,
            current_clip: None,
            current_time: 0.0,
            keyframe_cursor: 0,
            has_ended: false,
            bone_transforms: bind_pose,
            world_transforms: vec![Affine3A::IDENTITY; bone_count],
            skin_transforms: vec![Affine3A::IDENTITY; bone_count],
        };
        player.start_clip(first);
        Ok(player)
    }

    /// Switches to the named clip and rewinds to its start.
    ///
    /// Local bone transforms are reset to the bind pose. Calling this with
    /// the clip that is already playing rewinds it.
    pub fn set_clip(&mut self, name: &str) -> Result<()> {
        let clip = self
            .set
            .clip(name)
            .cloned()
            .ok_or_else(|| SinewError::UnknownClip(name.to_string()))?;
        self.start_clip(clip);
        Ok(())
    }

    /// Stops playback. Local bone transforms keep their last values.
    pub fn clear_clip(&mut self) {
        self.current_clip = None;
        self.current_time = 0.0;
        self.keyframe_cursor = 0;
        self.has_ended = false;
    }

    fn start_clip(&mut self, clip: Arc<AnimationClip>) {
        log::debug!("Playing clip '{}' ({})", clip.name, clip.duration());
        self.current_clip = Some(clip);
        self.current_time = 0.0;
        self.keyframe_cursor = 0;
        self.reset_to_bind_pose();
    }

    fn reset_to_bind_pose(&mut self) {
        self.bone_transforms
            .copy_from_slice(self.set.skeleton().bind_pose());
    }

    /// Advances playback and recomputes all three transform arrays.
    ///
    /// With `relative` set, `time` is a delta added to the current time and
    /// playback loops past the end of the clip. Otherwise `time` is an
    /// absolute position, clamped to the clip duration.
    pub fn update(&mut self, time: f32, relative: bool, root: &Affine3A) -> Result<()> {
        self.update_bone_transforms(time, relative)?;
        self.update_world_transforms(root);
        self.update_skin_transforms();
        Ok(())
    }

    /// Advances playback time and applies keyframes to the local bone
    /// transforms. Does nothing to the pose while no clip is set.
    pub fn update_bone_transforms(&mut self, time: f32, relative: bool) -> Result<()> {
        self.has_ended = false;

        let Some(clip) = self.current_clip.clone() else {
            return Ok(());
        };
        let duration = clip.duration().as_secs_f32();

        let mut time = time;
        if relative {
            time += self.current_time;
            if time >= duration {
                time %= duration;
                self.has_ended = true;
            }
        }

        if time.is_nan() || time < 0.0 {
            return Err(SinewError::NegativeTime(time));
        }
        if time > duration {
            time = duration;
        }

        if time < self.current_time {
            self.keyframe_cursor = 0;
            self.reset_to_bind_pose();
        }
        self.current_time = time;

        let keyframes = clip.keyframes();
        while let Some(keyframe) = keyframes.get(self.keyframe_cursor) {
            if keyframe.time.as_secs_f32() > time {
                break;
            }
            if let Some(slot) = self.bone_transforms.get_mut(keyframe.bone) {
                *slot = keyframe.transform;
            }
            self.keyframe_cursor += 1;
        }

        log::trace!(
            "Clip '{}' at {time:.4}s, {} keyframes applied",
            clip.name,
            self.keyframe_cursor
        );
        Ok(())
    }

    /// Accumulates local transforms down the hierarchy, starting at `root`.
    pub fn update_world_transforms(&mut self, root: &Affine3A) {
        let parents = self.set.skeleton().parents();
        for (bone, parent) in parents.iter().enumerate() {
            let parent_world = match parent {
                Some(p) => self.world_transforms[*p],
                None => *root,
            };
            self.world_transforms[bone] = parent_world * self.bone_transforms[bone];
        }
    }

    /// Converts world transforms into bind-pose-relative skin transforms.
    pub fn update_skin_transforms(&mut self) {
        let inverse_bind_pose = self.set.skeleton().inverse_bind_pose();
        for ((skin, world), inverse_bind) in self
            .skin_transforms
            .iter_mut()
            .zip(&self.world_transforms)
            .zip(inverse_bind_pose)
        {
            *skin = *world * *inverse_bind;
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn animation_set(&self) -> &Arc<AnimationSet> {
        &self.set
    }

    #[inline]
    #[must_use]
    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.current_clip.as_deref()
    }

    #[must_use]
    pub fn current_clip_name(&self) -> Option<&str> {
        self.current_clip.as_ref().map(|c| c.name.as_str())
    }

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// `true` only for the update in which playback wrapped past the end.
    #[inline]
    #[must_use]
    pub fn has_ended(&self) -> bool {
        self.has_ended
    }

    #[inline]
    #[must_use]
    pub fn bone_transforms(&self) -> &[Affine3A] {
        &self.bone_transforms
    }

    #[inline]
    #[must_use]
    pub fn world_transforms(&self) -> &[Affine3A] {
        &self.world_transforms
    }

    #[inline]
    #[must_use]
    pub fn skin_transforms(&self) -> &[Affine3A] {
        &self.skin_transforms
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.set.bone_index(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;
    use crate::skeleton::Skeleton;
    use glam::Vec3;
    use sinew_core::TimeSpan;

    fn two_bone_set() -> Arc<AnimationSet> {
        let skeleton = Skeleton::new(
            vec![Affine3A::IDENTITY; 2],
            vec![Affine3A::IDENTITY; 2],
            vec![None, Some(0)],
            vec![Some("root".into()), Some("arm".into())],
        )
        .unwrap();
        let clip = AnimationClip::new(
            "lift",
            TimeSpan::from_secs_f32(1.0),
            vec![
                Keyframe::new(1, TimeSpan::from_secs_f32(0.5), Affine3A::from_translation(Vec3::Y)),
                Keyframe::new(0, TimeSpan::ZERO, Affine3A::IDENTITY),
            ],
        )
        .unwrap();
        Arc::new(AnimationSet::new(skeleton, [clip]).unwrap())
    }

    #[test]
    fn first_clip_is_selected() {
        let player = AnimationPlayer::new(two_bone_set()).unwrap();
        assert_eq!(player.current_clip_name(), Some("lift"));
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn empty_set_cannot_be_played() {
        let skeleton = Skeleton::new(
            vec![Affine3A::IDENTITY],
            vec![Affine3A::IDENTITY],
            vec![None],
            vec![None],
        )
        .unwrap();
        let set = Arc::new(AnimationSet::new(skeleton, Vec::new()).unwrap());
        assert!(matches!(AnimationPlayer::new(set), Err(SinewError::NoClips)));
    }

    #[test]
    fn unknown_clip_is_an_error() {
        let mut player = AnimationPlayer::new(two_bone_set()).unwrap();
        let err = player.set_clip("jump").unwrap_err();
        assert!(matches!(err, SinewError::UnknownClip(name) if name == "jump"));
        assert_eq!(player.current_clip_name(), Some("lift"));
    }

    #[test]
    fn negative_absolute_time_is_an_error() {
        let mut player = AnimationPlayer::new(two_bone_set()).unwrap();
        assert!(matches!(
            player.update(-0.1, false, &Affine3A::IDENTITY),
            Err(SinewError::NegativeTime(_))
        ));
    }

    #[test]
    fn absolute_time_is_clamped_to_duration() {
        let mut player = AnimationPlayer::new(two_bone_set()).unwrap();
        player.update(5.0, false, &Affine3A::IDENTITY).unwrap();
        assert_eq!(player.current_time(), 1.0);
        assert!(!player.has_ended());
    }

    #[test]
    fn idle_player_keeps_pose_but_follows_root() {
        let mut player = AnimationPlayer::new(two_bone_set()).unwrap();
        player.update(0.5, true, &Affine3A::IDENTITY).unwrap();
        player.clear_clip();
        assert_eq!(player.current_clip_name(), None);

        let root = Affine3A::from_translation(Vec3::X);
        player.update(10.0, true, &root).unwrap();
        let arm = player.world_transforms()[1].translation;
        assert!((Vec3::from(arm) - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn clone_advances_independently() {
        let mut a = AnimationPlayer::new(two_bone_set()).unwrap();
        let b = a.clone();
        a.update(0.5, true, &Affine3A::IDENTITY).unwrap();
        assert_eq!(a.current_time(), 0.5);
        assert_eq!(b.current_time(), 0.0);
        assert_eq!(b.bone_transforms()[1], Affine3A::IDENTITY);
        assert!(Arc::ptr_eq(a.animation_set(), b.animation_set()));
    }
}
