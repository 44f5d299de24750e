use glam::Vec2;
use sinew_core::{Result, SinewError};

use crate::declaration::VertexDeclaration;
use crate::vertex::SkinVertex;

/// Source data for one CPU-skinned vertex buffer.
///
/// This is what the asset builder produces and what the vertex buffer asset
/// stores: the layout the vertices were authored with, the static skinning
/// input, the texture coordinates that pass through unchanged, and whether
/// the GPU buffer should be created write-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedVertexData {
    pub declaration: VertexDeclaration,
    pub vertices: Vec<SkinVertex>,
    pub texture_coordinates: Vec<Vec2>,
    pub is_write_only: bool,
}

impl SkinnedVertexData {
    /// Pairs skinning input with texture coordinates.
    ///
    /// Fails when the two arrays have different lengths or the declaration
    /// contains an element the skinner cannot consume.
    pub fn new(
        declaration: VertexDeclaration,
        vertices: Vec<SkinVertex>,
        texture_coordinates: Vec<Vec2>,
        is_write_only: bool,
    ) -> Result<Self> {
        if vertices.len() != texture_coordinates.len() {
            return Err(SinewError::InvalidContent(format!(
                "{} skin vertices but {} texture coordinates",
                vertices.len(),
                texture_coordinates.len()
            )));
        }
        for element in declaration.elements() {
            element.check_skinnable()?;
        }
        Ok(Self {
            declaration,
            vertices,
            texture_coordinates,
            is_write_only,
        })
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}
