//! Sinew Assets
//!
//! Binary encodings of the runtime assets, little-endian throughout:
//!
//! - [`clip`]: one animation clip blob
//! - [`animations`]: the animation set asset (clips plus skeleton)
//! - [`vertex_buffer`]: the CPU-skinning vertex buffer asset
//!
//! Writers and readers are exact mirrors; decoding validates everything a
//! builder would, so a loaded asset is indistinguishable from a built one.

pub mod animations;
pub mod clip;
pub mod vertex_buffer;

pub use animations::{
    load_animation_set, read_animation_set, save_animation_set, write_animation_set,
};
pub use clip::{read_clip, write_clip};
pub use vertex_buffer::{
    load_skinned_vertex_data, read_cpu_skinned_vertex_buffer, read_declaration,
    read_skinned_vertex_data, save_skinned_vertex_data, write_declaration,
    write_skinned_vertex_data,
};
