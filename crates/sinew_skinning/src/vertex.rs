use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use crate::declaration::{VertexDeclaration, VertexElement, VertexElementFormat, VertexElementUsage};

/// Static skinning input for one vertex.
///
/// Weights are expected to sum to roughly one; this is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkinVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub blend_indices: [u8; 4],
    pub blend_weights: Vec4,
}

impl SkinVertex {
    /// Vertex fully bound to a single bone.
    #[must_use]
    pub fn rigid(position: Vec3, normal: Vec3, bone: u8) -> Self {
        Self {
            position,
            normal,
            blend_indices: [bone, 0, 0, 0],
            blend_weights: Vec4::X,
        }
    }
}

/// Skinned output vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct VertexPositionNormalTexture {
    pub position: Vec3,
    pub normal: Vec3,
    pub texture_coordinate: Vec2,
}

impl VertexPositionNormalTexture {
    pub const STRIDE: usize = std::mem::size_of::<Self>();

    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, texture_coordinate: Vec2) -> Self {
        Self {
            position,
            normal,
            texture_coordinate,
        }
    }

    #[must_use]
    pub fn declaration() -> VertexDeclaration {
        VertexDeclaration::new(
            Self::STRIDE as u32,
            vec![
                VertexElement::new(0, VertexElementFormat::Vector3, VertexElementUsage::Position, 0),
                VertexElement::new(12, VertexElementFormat::Vector3, VertexElementUsage::Normal, 0),
                VertexElement::new(
                    24,
                    VertexElementFormat::Vector2,
                    VertexElementUsage::TextureCoordinate,
                    0,
                ),
            ],
        )
    }
}
