//! Sinew Pipeline
//!
//! Offline asset building: authored scene in, [`AnimationSet`] and
//! CPU-skinnable vertex data out.
//!
//! - [`content`]: the authored scene tree consumed by the processors
//! - [`fix_root`]: repair for importers that wrap the root bone
//! - [`validate`], [`skeleton`]: mesh validation, skeleton discovery,
//!   transform baking and skeleton flattening
//! - [`resample`]: uniform keyframe generation
//! - [`AnimationsProcessor`] / [`CpuAnimatedModelProcessor`]: the builders
//! - [`ProcessorSettings`]: builder configuration, loadable from JSON
//!
//! [`AnimationSet`]: sinew_animation::AnimationSet

pub mod content;
pub mod cpu_model;
pub mod fix_root;
pub mod processor;
pub mod resample;
pub mod settings;
pub mod skeleton;
pub mod validate;

pub use content::{
    AnimationChannel, AnimationContent, AnimationKeyframe, BoneWeight, GeometryContent,
    MeshContent, NodeContent, NodeKind,
};
pub use cpu_model::{CpuAnimatedModelContent, CpuAnimatedModelProcessor, SkinnedMeshContent};
pub use fix_root::fix_real_bone_root;
pub use processor::AnimationsProcessor;
pub use resample::resample_keyframes;
pub use settings::{BufferType, ProcessorSettings};
pub use skeleton::{FlatBone, find_skeleton, flatten_skeleton, flatten_transforms};
pub use validate::validate_meshes;
