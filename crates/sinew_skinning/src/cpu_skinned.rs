//! CPU Skinned Vertex Buffer
//!
//! Linear blend skinning on the CPU, published into a GPU vertex buffer.
//!
//! # Overview
//!
//! Each vertex carries four bone indices and four weights. Per update, the
//! skinner blends the four skin transforms into one affine matrix
//! (`Σ weight_k * skin[index_k]`), moves the static position by it and
//! rotates the static normal by its linear part. Texture coordinates are
//! copied once at construction.
//!
//! # Buffer discipline
//!
//! The GPU buffer is declared write-only and every update pushes only the
//! updated vertex range with [`SetDataOptions::NoOverwrite`]. Each mesh
//! instance must own its own output buffer; use
//! [`CpuSkinnedVertexBuffer::duplicate`] to share the static input between
//! instances.
//!
//! # Ordering
//!
//! Call [`CpuSkinnedVertexBuffer::update_vertices`] after the animation
//! player's update for the frame and before the draw that reads the buffer.

use std::sync::Arc;

use glam::{Affine3A, Vec2, Vec4};
use sinew_core::{Result, SinewError};

use crate::buffer::{GpuVertexBuffer, SetDataOptions};
use crate::data::SkinnedVertexData;
use crate::vertex::{SkinVertex, VertexPositionNormalTexture};

#[derive(Debug)]
pub struct CpuSkinnedVertexBuffer<B> {
    source: Arc<[SkinVertex]>,
    output: Vec<VertexPositionNormalTexture>,
    /// Highest blend index used by any vertex, `None` for an empty buffer.
    max_bone_index: Option<usize>,
    buffer: B,
}

impl<B: GpuVertexBuffer> CpuSkinnedVertexBuffer<B> {
    /// Creates the skinner and uploads the unskinned vertices.
    ///
    /// `buffer` must hold at least one [`VertexPositionNormalTexture`] per
    /// source vertex.
    pub fn new(data: &SkinnedVertexData, buffer: B) -> Result<Self> {
        if data.vertices.len() != data.texture_coordinates.len() {
            return Err(SinewError::InvalidContent(format!(
                "{} skin vertices but {} texture coordinates",
                data.vertices.len(),
                data.texture_coordinates.len()
            )));
        }
        let output = data
            .vertices
            .iter()
            .zip(&data.texture_coordinates)
            .map(|(v, &uv)| VertexPositionNormalTexture::new(v.position, v.normal, uv))
            .collect();
        Self::from_parts(Arc::from(data.vertices.as_slice()), output, buffer)
    }

    /// Creates the skinner from shared skin input and texture coordinates.
    pub fn with_shared_input(
        source: Arc<[SkinVertex]>,
        texture_coordinates: &[Vec2],
        buffer: B,
    ) -> Result<Self> {
        if source.len() != texture_coordinates.len() {
            return Err(SinewError::InvalidContent(format!(
                "{} skin vertices but {} texture coordinates",
                source.len(),
                texture_coordinates.len()
            )));
        }
        let output = source
            .iter()
            .zip(texture_coordinates)
            .map(|(v, &uv)| VertexPositionNormalTexture::new(v.position, v.normal, uv))
            .collect();
        Self::from_parts(source, output, buffer)
    }

    fn from_parts(
        source: Arc<[SkinVertex]>,
        output: Vec<VertexPositionNormalTexture>,
        mut buffer: B,
    ) -> Result<Self> {
        let max_bone_index = source
            .iter()
            .flat_map(|v| v.blend_indices)
            .max()
            .map(usize::from);

        buffer.set_data(0, bytemuck::cast_slice(&output), SetDataOptions::None)?;
        log::debug!(
            "Created CPU skinned buffer: {} vertices, max bone index {max_bone_index:?}",
            output.len()
        );

        Ok(Self {
            source,
            output,
            max_bone_index,
            buffer,
        })
    }

    /// Creates another instance over the same skin input, writing into
    /// `buffer`. The current skinned vertices are copied and uploaded.
    pub fn duplicate<B2: GpuVertexBuffer>(&self, buffer: B2) -> Result<CpuSkinnedVertexBuffer<B2>> {
        CpuSkinnedVertexBuffer::from_parts(Arc::clone(&self.source), self.output.clone(), buffer)
    }

    /// Skins `count` vertices starting at `start` and uploads that range.
    ///
    /// Vertices outside the range are left untouched, both in the CPU copy
    /// and in the GPU buffer.
    pub fn update_vertices(
        &mut self,
        skin_transforms: &[Affine3A],
        start: usize,
        count: usize,
    ) -> Result<()> {
        let len = self.output.len();
        let end = start
            .checked_add(count)
            .filter(|&end| end <= len)
            .ok_or(SinewError::VertexRangeOutOfBounds {
                start,
                end: start.saturating_add(count),
                len,
            })?;

        if let Some(max) = self.max_bone_index
            && max >= skin_transforms.len()
        {
            return Err(SinewError::NotEnoughBoneTransforms {
                required: max,
                provided: skin_transforms.len(),
            });
        }

        if count == 0 {
            return Ok(());
        }

        for (src, dst) in self.source[start..end]
            .iter()
            .zip(&mut self.output[start..end])
        {
            let m = blend_transforms(skin_transforms, src.blend_indices, src.blend_weights);
            dst.position = m.transform_point3(src.position);
            dst.normal = m.transform_vector3(src.normal);
        }

        log::trace!("Skinned vertices {start}..{end}");
        let offset = start * VertexPositionNormalTexture::STRIDE;
        self.buffer.set_data(
            offset,
            bytemuck::cast_slice(&self.output[start..end]),
            SetDataOptions::NoOverwrite,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.output.len()
    }

    /// CPU copy of the skinned vertices.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[VertexPositionNormalTexture] {
        &self.output
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &Arc<[SkinVertex]> {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn max_bone_index(&self) -> Option<usize> {
        self.max_bone_index
    }

    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }
}

/// Weighted sum of four skin transforms.
///
/// The result is not re-orthonormalized.
///
/// # Panics
///
/// Panics if any of `indices` is not a valid index into `skin`.
/// [`CpuSkinnedVertexBuffer::update_vertices`] checks this before blending.
#[inline]
#[must_use]
pub fn blend_transforms(skin: &[Affine3A], indices: [u8; 4], weights: Vec4) -> Affine3A {
    let m0 = &skin[usize::from(indices[0])];
    let m1 = &skin[usize::from(indices[1])];
    let m2 = &skin[usize::from(indices[2])];
    let m3 = &skin[usize::from(indices[3])];

    Affine3A {
        matrix3: m0.matrix3 * weights.x
            + m1.matrix3 * weights.y
            + m2.matrix3 * weights.z
            + m3.matrix3 * weights.w,
        translation: m0.translation * weights.x
            + m1.translation * weights.y
            + m2.translation * weights.z
            + m3.translation * weights.w,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BufferUsage, HostVertexBuffer};
    use crate::declaration::VertexDeclaration;
    use glam::Vec3;

    fn data(vertices: Vec<SkinVertex>) -> SkinnedVertexData {
        let uvs = vec![Vec2::new(0.25, 0.75); vertices.len()];
        SkinnedVertexData::new(VertexDeclaration::skinned(), vertices, uvs, true).unwrap()
    }

    fn host(n: usize) -> HostVertexBuffer {
        HostVertexBuffer::new(n * VertexPositionNormalTexture::STRIDE, BufferUsage::WriteOnly, None)
    }

    #[test]
    fn blend_of_equal_weights_averages_translations() {
        let skin = [
            Affine3A::from_translation(Vec3::X),
            Affine3A::from_translation(Vec3::Y),
        ];
        let m = blend_transforms(&skin, [0, 1, 0, 0], Vec4::new(0.5, 0.5, 0.0, 0.0));
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    #[should_panic]
    fn blend_with_out_of_range_index_panics() {
        let _ = blend_transforms(&[Affine3A::IDENTITY], [0, 1, 0, 0], Vec4::X);
    }

    #[test]
    fn mismatched_texture_coordinates_are_rejected() {
        let mut mismatched = data(vec![SkinVertex::default(); 3]);
        mismatched.texture_coordinates.pop();
        let err = CpuSkinnedVertexBuffer::new(&mismatched, host(3)).unwrap_err();
        assert!(matches!(err, SinewError::InvalidContent(_)));
    }

    #[test]
    fn too_few_transforms_are_rejected_before_skinning() {
        let mut skinner = CpuSkinnedVertexBuffer::new(
            &data(vec![SkinVertex::rigid(Vec3::ZERO, Vec3::Z, 3)]),
            host(1),
        )
        .unwrap();
        let err = skinner
            .update_vertices(&[Affine3A::IDENTITY; 3], 0, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            SinewError::NotEnoughBoneTransforms {
                required: 3,
                provided: 3
            }
        ));
    }

    #[test]
    fn range_past_end_is_rejected() {
        let mut skinner =
            CpuSkinnedVertexBuffer::new(&data(vec![SkinVertex::default(); 4]), host(4)).unwrap();
        let err = skinner
            .update_vertices(&[Affine3A::IDENTITY], 2, 3)
            .unwrap_err();
        assert!(matches!(
            err,
            SinewError::VertexRangeOutOfBounds {
                start: 2,
                end: 5,
                len: 4
            }
        ));
    }

    #[test]
    fn upload_covers_only_the_updated_range() {
        let mut skinner =
            CpuSkinnedVertexBuffer::new(&data(vec![SkinVertex::default(); 8]), host(8)).unwrap();
        skinner
            .update_vertices(&[Affine3A::IDENTITY], 2, 3)
            .unwrap();
        let stride = VertexPositionNormalTexture::STRIDE;
        assert_eq!(
            skinner.buffer().last_write(),
            Some(&(2 * stride..5 * stride, SetDataOptions::NoOverwrite))
        );
    }

    #[test]
    fn texture_coordinates_pass_through() {
        let mut skinner = CpuSkinnedVertexBuffer::new(
            &data(vec![SkinVertex::rigid(Vec3::ONE, Vec3::Y, 0)]),
            host(1),
        )
        .unwrap();
        skinner
            .update_vertices(&[Affine3A::from_translation(Vec3::Z)], 0, 1)
            .unwrap();
        let v = skinner.vertices()[0];
        assert_eq!(v.texture_coordinate, Vec2::new(0.25, 0.75));
        assert!((v.position - Vec3::new(1.0, 1.0, 2.0)).length() < 1e-6);
        assert!((v.normal - Vec3::Y).length() < 1e-6);
    }
}
