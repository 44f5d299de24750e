//! Animation Asset Builder
//!
//! Turns an authored scene into an [`AnimationSet`].
//!
//! # Overview
//!
//! [`AnimationsProcessor::process`] runs these passes over the scene, in
//! order:
//!
//! 1. optional root-bone repair ([`fix_real_bone_root`])
//! 2. mesh validation: unskinned meshes are dropped with a warning
//! 3. skeleton discovery (exactly one skeleton root is required)
//! 4. transform baking of everything outside the skeleton
//! 5. skeleton flattening and the bone limit check
//! 6. clip extraction from the skeleton root's animations, with optional
//!    keyframe resampling
//!
//! The scene is modified in place; callers that need the processed meshes
//! (see [`CpuAnimatedModelProcessor`](crate::CpuAnimatedModelProcessor))
//! read them back afterwards.
//!
//! # Usage
//!
//! ```rust,ignore
//! let processor = AnimationsProcessor::new(ProcessorSettings::default());
//! let set = processor.process(&mut scene)?;
//! ```

use sinew_animation::{AnimationClip, AnimationSet, Keyframe, Skeleton, sort_keyframes};
use sinew_core::{Result, SinewError};

use crate::content::{AnimationContent, NodeContent};
use crate::fix_root::fix_real_bone_root;
use crate::resample::resample_keyframes;
use crate::settings::ProcessorSettings;
use crate::skeleton::{FlatBone, find_skeleton, flatten_skeleton, flatten_transforms};
use crate::validate::validate_meshes;

#[derive(Debug, Clone, Default)]
pub struct AnimationsProcessor {
    settings: ProcessorSettings,
}

impl AnimationsProcessor {
    #[must_use]
    pub fn new(settings: ProcessorSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Builds the skeleton and clips of `input`.
    ///
    /// No partial result is returned: any fatal problem aborts the build.
    /// Non-fatal problems are logged and the offending item is skipped.
    pub fn process(&self, input: &mut NodeContent) -> Result<AnimationSet> {
        if self.settings.fix_real_bone_root {
            fix_real_bone_root(input);
        }

        validate_meshes(input);

        let skeleton_path = find_skeleton(input)?;
        flatten_transforms(input, &skeleton_path);

        let bones = flatten_skeleton(input, &skeleton_path)?;
        if bones.len() > self.settings.max_bones {
            return Err(SinewError::TooManyBones {
                count: bones.len(),
                max: self.settings.max_bones,
            });
        }
        let skeleton = build_skeleton(bones)?;

        let root = input
            .node_at(&skeleton_path)
            .ok_or(SinewError::SkeletonNotFound)?;

        let mut clips = Vec::with_capacity(root.animations.len());
        for (name, animation) in &root.animations {
            clips.push(self.process_animation(name, animation, &skeleton)?);
        }
        if clips.is_empty() {
            log::warn!("Input file does not contain any animations");
        }

        log::info!(
            "Built skeleton with {} bones and {} clips",
            skeleton.bone_count(),
            clips.len()
        );
        AnimationSet::new(skeleton, clips)
    }

    fn process_animation(
        &self,
        name: &str,
        animation: &AnimationContent,
        skeleton: &Skeleton,
    ) -> Result<AnimationClip> {
        let mut keyframes = Vec::new();

        for (bone_name, channel) in &animation.channels {
            let Some(bone) = skeleton.bone_index(bone_name) else {
                log::warn!(
                    "Found animation for bone '{bone_name}', which is not part of the skeleton"
                );
                continue;
            };
            keyframes.extend(
                channel
                    .iter()
                    .map(|k| Keyframe::new(bone, k.time, k.transform)),
            );
        }

        sort_keyframes(&mut keyframes);
        let keyframes =
            resample_keyframes(keyframes, self.settings.generate_keyframes_frequency);

        AnimationClip::new(name, animation.duration, keyframes)
    }
}

fn build_skeleton(bones: Vec<FlatBone>) -> Result<Skeleton> {
    let count = bones.len();
    let mut bind_pose = Vec::with_capacity(count);
    let mut inverse_bind_pose = Vec::with_capacity(count);
    let mut parents = Vec::with_capacity(count);
    let mut names = Vec::with_capacity(count);

    for bone in bones {
        bind_pose.push(bone.bind_pose);
        inverse_bind_pose.push(bone.absolute.inverse());
        parents.push(bone.parent);
        names.push(bone.name);
    }

    Skeleton::new(bind_pose, inverse_bind_pose, parents, names)
}
