//! # Sinew
//!
//! Skeletal animation pipeline: an offline builder that turns an authored
//! bone hierarchy into a compact animation asset, a clip player that samples
//! that asset over time, and a CPU skinner that deforms mesh vertices with
//! the player's output every frame.
//!
//! ```rust,ignore
//! use sinew::prelude::*;
//!
//! let set = Arc::new(load_animation_set(&bytes)?);
//! let mut player = AnimationPlayer::new(set)?;
//! player.set_clip("walk")?;
//!
//! // each frame
//! player.update(dt, true, &Affine3A::IDENTITY)?;
//! skinned.update_vertices(player.skin_transforms(), 0, skinned.vertex_count())?;
//! ```

pub use sinew_animation as animation;
pub use sinew_assets as assets;
pub use sinew_core as core;
pub use sinew_pipeline as pipeline;
pub use sinew_skinning as skinning;

pub use sinew_animation::{AnimationClip, AnimationPlayer, AnimationSet, Keyframe, Skeleton};
pub use sinew_core::{Result, SinewError, TimeSpan};
pub use sinew_pipeline::{AnimationsProcessor, CpuAnimatedModelProcessor, NodeContent, ProcessorSettings};
pub use sinew_skinning::{
    CpuSkinnedVertexBuffer, GpuVertexBuffer, HostVertexBuffer, SkinVertex, SkinnedVertexData,
};

pub mod prelude {
    pub use std::sync::Arc;

    pub use glam::{Affine3A, Quat, Vec2, Vec3, Vec4};

    pub use sinew_animation::{AnimationClip, AnimationPlayer, AnimationSet, Keyframe, Skeleton};
    pub use sinew_assets::{
        load_animation_set, load_skinned_vertex_data, save_animation_set,
        save_skinned_vertex_data,
    };
    pub use sinew_core::{Result, SinewError, TICKS_PER_SECOND, TimeSpan};
    pub use sinew_pipeline::{
        AnimationContent, AnimationKeyframe, AnimationsProcessor, BoneWeight, BufferType,
        CpuAnimatedModelProcessor, GeometryContent, MeshContent, NodeContent, ProcessorSettings,
    };
    pub use sinew_skinning::{
        BufferUsage, CpuSkinnedVertexBuffer, GpuVertexBuffer, HostVertexBuffer, SetDataOptions,
        SkinVertex, SkinnedVertexData, VertexPositionNormalTexture,
    };
}
