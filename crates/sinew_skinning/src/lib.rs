//! Sinew Skinning
//!
//! CPU vertex skinning:
//!
//! - [`SkinVertex`] / [`VertexPositionNormalTexture`]: static input and GPU output vertices
//! - [`VertexDeclaration`]: element layout of serialized vertex data
//! - [`GpuVertexBuffer`]: destination buffer seam, with [`HostVertexBuffer`]
//!   and (feature `wgpu`) `WgpuVertexBuffer` implementations
//! - [`CpuSkinnedVertexBuffer`]: the per-frame linear blend skinner

pub mod buffer;
pub mod cpu_skinned;
pub mod data;
pub mod declaration;
pub mod vertex;

#[cfg(feature = "wgpu")]
pub use buffer::WgpuVertexBuffer;
pub use buffer::{BufferUsage, GpuVertexBuffer, HostVertexBuffer, SetDataOptions};
pub use cpu_skinned::{CpuSkinnedVertexBuffer, blend_transforms};
pub use data::SkinnedVertexData;
pub use declaration::{VertexDeclaration, VertexElement, VertexElementFormat, VertexElementUsage};
pub use vertex::{SkinVertex, VertexPositionNormalTexture};
