//! Sinew Animation
//!
//! Runtime skeletal animation data and playback:
//!
//! - [`Skeleton`]: bind pose, inverse bind pose, parent indices and bone names
//! - [`AnimationClip`]: a named, `(time, bone)`-sorted keyframe list
//! - [`AnimationSet`]: a skeleton and its clips, shared between instances
//! - [`AnimationPlayer`]: per-instance playback producing local, world and
//!   skin transforms

pub mod clip;
pub mod keyframe;
pub mod player;
pub mod set;
pub mod skeleton;

pub use clip::AnimationClip;
pub use keyframe::{Keyframe, is_sorted, sort_keyframes};
pub use player::AnimationPlayer;
pub use set::AnimationSet;
pub use skeleton::Skeleton;
