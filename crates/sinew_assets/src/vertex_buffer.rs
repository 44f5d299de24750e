//! Skinning vertex buffer asset.
//!
//! Sequential layout:
//!
//! 1. declaration: `stride (u32)`, `element count (u32)`, then per element
//!    `offset (u32)`, `format (i32)`, `usage (i32)`, `usage index (u32)`
//! 2. `vertex count (u32)`
//! 3. per vertex, one field per declared element in declaration order:
//!    position and normal as 3 floats, texture coordinate as 2 floats,
//!    blend weights as 4 floats, blend indices as 4 bytes
//! 4. `is_write_only (bool)`

use std::io::{Read, Write};

use glam::Vec2;
use sinew_core::{ContentReader, ContentWriter, MAX_PREALLOCATED_ITEMS, Result, SinewError};
use sinew_skinning::{
    BufferUsage, CpuSkinnedVertexBuffer, GpuVertexBuffer, SkinVertex, SkinnedVertexData,
    VertexDeclaration, VertexElement, VertexElementUsage, VertexPositionNormalTexture,
};

pub fn read_declaration<R: Read>(reader: &mut ContentReader<R>) -> Result<VertexDeclaration> {
    let stride = reader.read_u32()?;
    let count = reader.read_u32()?;
    let mut elements = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_ITEMS));
    for _ in 0..count {
        let offset = reader.read_u32()?;
        let format = reader.read_i32()?;
        let usage = reader.read_i32()?;
        let usage_index = reader.read_u32()?;
        let element = VertexElement::from_raw(offset, format, usage, usage_index)?;
        element.check_skinnable()?;
        elements.push(element);
    }
    Ok(VertexDeclaration::new(stride, elements))
}

pub fn write_declaration<W: Write>(
    writer: &mut ContentWriter<W>,
    declaration: &VertexDeclaration,
) -> Result<()> {
    writer.write_u32(declaration.stride())?;
    writer.write_u32(u32_count(declaration.elements().len())?)?;
    for element in declaration.elements() {
        writer.write_u32(element.offset)?;
        writer.write_i32(element.format as i32)?;
        writer.write_i32(element.usage as i32)?;
        writer.write_u32(element.usage_index)?;
    }
    Ok(())
}

fn u32_count(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| SinewError::InvalidContent(format!("count too large: {count}")))
}

/// Reads skinning input and texture coordinates.
///
/// A declaration without a texture coordinate element yields zero texture
/// coordinates. A declaration without a position element is rejected.
pub fn read_skinned_vertex_data<R: Read>(
    reader: &mut ContentReader<R>,
) -> Result<SkinnedVertexData> {
    let declaration = read_declaration(reader)?;
    if !declaration.has_usage(VertexElementUsage::Position) {
        return Err(SinewError::InvalidContent(
            "vertex declaration has no position element".to_string(),
        ));
    }
    let count = reader.read_u32()? as usize;

    let mut vertices = Vec::with_capacity(count.min(MAX_PREALLOCATED_ITEMS));
    let mut texture_coordinates = Vec::with_capacity(count.min(MAX_PREALLOCATED_ITEMS));
    for _ in 0..count {
        let mut vertex = SkinVertex::default();
        let mut uv = Vec2::ZERO;
        for element in declaration.elements() {
            match element.usage {
                VertexElementUsage::Position => vertex.position = reader.read_vec3()?,
                VertexElementUsage::Normal => vertex.normal = reader.read_vec3()?,
                VertexElementUsage::TextureCoordinate => uv = reader.read_vec2()?,
                VertexElementUsage::BlendWeight => vertex.blend_weights = reader.read_vec4()?,
                VertexElementUsage::BlendIndices => {
                    for index in &mut vertex.blend_indices {
                        *index = reader.read_u8()?;
                    }
                }
                VertexElementUsage::Color
                | VertexElementUsage::Binormal
                | VertexElementUsage::Tangent => {
                    return Err(SinewError::UnsupportedVertexElement {
                        usage: element.usage as i32,
                        format: element.format as i32,
                    });
                }
            }
        }
        vertices.push(vertex);
        texture_coordinates.push(uv);
    }

    let is_write_only = reader.read_bool()?;
    log::debug!("Read skinned vertex buffer: {count} vertices, write-only: {is_write_only}");
    SkinnedVertexData::new(declaration, vertices, texture_coordinates, is_write_only)
}

pub fn write_skinned_vertex_data<W: Write>(
    writer: &mut ContentWriter<W>,
    data: &SkinnedVertexData,
) -> Result<()> {
    if data.vertices.len() != data.texture_coordinates.len() {
        return Err(SinewError::InvalidContent(format!(
            "{} skin vertices but {} texture coordinates",
            data.vertices.len(),
            data.texture_coordinates.len()
        )));
    }

    write_declaration(writer, &data.declaration)?;
    writer.write_u32(u32_count(data.vertex_count())?)?;
    for (vertex, uv) in data.vertices.iter().zip(&data.texture_coordinates) {
        for element in data.declaration.elements() {
            element.check_skinnable()?;
            match element.usage {
                VertexElementUsage::Position => writer.write_vec3(vertex.position)?,
                VertexElementUsage::Normal => writer.write_vec3(vertex.normal)?,
                VertexElementUsage::TextureCoordinate => writer.write_vec2(*uv)?,
                VertexElementUsage::BlendWeight => writer.write_vec4(vertex.blend_weights)?,
                VertexElementUsage::BlendIndices => {
                    for index in vertex.blend_indices {
                        writer.write_u8(index)?;
                    }
                }
                VertexElementUsage::Color
                | VertexElementUsage::Binormal
                | VertexElementUsage::Tangent => {}
            }
        }
    }
    writer.write_bool(data.is_write_only)
}

/// Reads a vertex buffer asset and builds a ready-to-skin buffer from it.
///
/// `make_buffer` receives the size in bytes of the skinned output and the
/// usage requested by the asset.
pub fn read_cpu_skinned_vertex_buffer<R, B, F>(
    reader: &mut ContentReader<R>,
    make_buffer: F,
) -> Result<CpuSkinnedVertexBuffer<B>>
where
    R: Read,
    B: GpuVertexBuffer,
    F: FnOnce(usize, BufferUsage) -> B,
{
    let data = read_skinned_vertex_data(reader)?;
    let buffer = make_buffer(
        data.vertex_count() * VertexPositionNormalTexture::STRIDE,
        BufferUsage::from_write_only(data.is_write_only),
    );
    CpuSkinnedVertexBuffer::new(&data, buffer)
}

/// Decodes skinning vertex data from an in-memory asset.
pub fn load_skinned_vertex_data(bytes: &[u8]) -> Result<SkinnedVertexData> {
    read_skinned_vertex_data(&mut ContentReader::new(bytes))
}

/// Encodes skinning vertex data into a new buffer.
pub fn save_skinned_vertex_data(data: &SkinnedVertexData) -> Result<Vec<u8>> {
    let mut writer = ContentWriter::new(Vec::new());
    write_skinned_vertex_data(&mut writer, data)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use sinew_skinning::{HostVertexBuffer, VertexElementFormat};

    fn data() -> SkinnedVertexData {
        let vertices = vec![
            SkinVertex {
                position: Vec3::new(1.0, 2.0, 3.0),
                normal: Vec3::Y,
                blend_indices: [0, 1, 0, 0],
                blend_weights: Vec4::new(0.75, 0.25, 0.0, 0.0),
            },
            SkinVertex::rigid(Vec3::X, Vec3::Z, 1),
        ];
        let uvs = vec![Vec2::new(0.0, 1.0), Vec2::new(0.5, 0.5)];
        SkinnedVertexData::new(VertexDeclaration::skinned(), vertices, uvs, true).unwrap()
    }

    #[test]
    fn vertex_data_survives_a_save_load_cycle() {
        let original = data();
        let bytes = save_skinned_vertex_data(&original).unwrap();
        // declaration (8 + 5 * 16), count, 2 * 52 bytes of fields, flag
        assert_eq!(bytes.len(), 88 + 4 + 2 * 52 + 1);
        assert_eq!(load_skinned_vertex_data(&bytes).unwrap(), original);
    }

    #[test]
    fn missing_texture_coordinates_read_as_zero() {
        let declaration = VertexDeclaration::packed(&[
            (VertexElementFormat::Vector3, VertexElementUsage::Position),
            (VertexElementFormat::Vector3, VertexElementUsage::Normal),
            (VertexElementFormat::Byte4, VertexElementUsage::BlendIndices),
            (VertexElementFormat::Vector4, VertexElementUsage::BlendWeight),
        ]);
        let source = SkinnedVertexData {
            declaration,
            ..data()
        };
        let loaded = load_skinned_vertex_data(&save_skinned_vertex_data(&source).unwrap()).unwrap();
        assert_eq!(loaded.vertices, source.vertices);
        assert_eq!(loaded.texture_coordinates, vec![Vec2::ZERO; 2]);
    }

    #[test]
    fn unsupported_usage_is_rejected() {
        let mut w = ContentWriter::new(Vec::new());
        w.write_u32(16).unwrap();
        w.write_u32(1).unwrap();
        w.write_u32(0).unwrap();
        w.write_i32(VertexElementFormat::Color as i32).unwrap();
        w.write_i32(VertexElementUsage::Color as i32).unwrap();
        w.write_u32(0).unwrap();
        w.write_u32(0).unwrap();
        w.write_bool(false).unwrap();

        assert!(matches!(
            load_skinned_vertex_data(&w.into_inner()),
            Err(SinewError::UnsupportedVertexElement { usage: 1, format: 4 })
        ));
    }

    #[test]
    fn unknown_discriminant_is_rejected() {
        let mut w = ContentWriter::new(Vec::new());
        w.write_u32(4).unwrap();
        w.write_u32(1).unwrap();
        w.write_u32(0).unwrap();
        w.write_i32(0).unwrap();
        w.write_i32(42).unwrap();
        w.write_u32(0).unwrap();

        assert!(matches!(
            load_skinned_vertex_data(&w.into_inner()),
            Err(SinewError::UnsupportedVertexElement { usage: 42, format: 0 })
        ));
    }

    #[test]
    fn huge_vertex_count_is_a_short_read() {
        let mut w = ContentWriter::new(Vec::new());
        write_declaration(&mut w, &VertexDeclaration::skinned()).unwrap();
        w.write_u32(u32::MAX).unwrap();
        w.write_vec3(Vec3::ONE).unwrap();

        assert!(matches!(
            load_skinned_vertex_data(&w.into_inner()),
            Err(SinewError::IoError(_))
        ));
    }

    #[test]
    fn declaration_without_position_is_rejected() {
        let mut w = ContentWriter::new(Vec::new());
        w.write_u32(0).unwrap();
        w.write_u32(0).unwrap();
        w.write_u32(u32::MAX).unwrap();

        assert!(matches!(
            load_skinned_vertex_data(&w.into_inner()),
            Err(SinewError::InvalidContent(_))
        ));
    }

    #[test]
    fn reader_builds_a_buffer_with_the_requested_usage() {
        let bytes = save_skinned_vertex_data(&data()).unwrap();
        let skinned = read_cpu_skinned_vertex_buffer(
            &mut ContentReader::new(bytes.as_slice()),
            |size, usage| HostVertexBuffer::new(size, usage, Some("hero")),
        )
        .unwrap();

        assert_eq!(skinned.vertex_count(), 2);
        assert_eq!(skinned.buffer().usage(), BufferUsage::WriteOnly);
        assert_eq!(skinned.buffer().size_bytes(), 2 * VertexPositionNormalTexture::STRIDE);
        assert_eq!(skinned.vertices()[1].texture_coordinate, Vec2::new(0.5, 0.5));
    }
}
