//! Binary content reader / writer.
//!
//! Little-endian primitives, 7-bit-encoded length-prefixed UTF-8 strings and
//! the two matrix encodings used by the asset formats:
//!
//! - **full matrix**: 16 floats, `M11..M44` (row-vector layout), which is
//!   exactly glam's column-major `Mat4` order;
//! - **affine matrix**: the 3×3 block and the translation row
//!   (`M11..M13, M21..M23, M31..M33, M41..M43`), i.e. `Affine3A` columns.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Affine3A, Mat4, Vec2, Vec3, Vec4};

use crate::errors::{Result, SinewError};
use crate::time::TimeSpan;

/// Upper bound on capacity reserved from a count read off the stream.
///
/// Decoders reserve at most this many items up front and grow as items
/// arrive.
pub const MAX_PREALLOCATED_ITEMS: usize = 1024;

/// Sequential reader over an asset stream.
pub struct ContentReader<R> {
    inner: R,
}

impl<R: Read> ContentReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.inner.read_i64::<LittleEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.inner.read_f32::<LittleEndian>()?)
    }

    /// Reads an `i32` element count, rejecting negative values.
    pub fn read_count(&mut self, what: &str) -> Result<usize> {
        let count = self.read_i32()?;
        usize::try_from(count)
            .map_err(|_| SinewError::InvalidContent(format!("negative {what} count: {count}")))
    }

    pub fn read_time_span(&mut self) -> Result<TimeSpan> {
        Ok(TimeSpan::from_ticks(self.read_i64()?))
    }

    pub fn read_7bit_encoded_int(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(SinewError::InvalidContent(
            "malformed 7-bit encoded integer".to_string(),
        ))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_7bit_encoded_int()? as usize;
        let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOCATED_ITEMS));
        self.inner
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() != len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(String::from_utf8(bytes)?)
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec4(&mut self) -> Result<Vec4> {
        Ok(Vec4::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// Reads a full 16-float matrix as an affine transform.
    ///
    /// The projective row is dropped; asset matrices are affine by contract.
    pub fn read_matrix(&mut self) -> Result<Affine3A> {
        let mut cols = [0.0f32; 16];
        for value in &mut cols {
            *value = self.read_f32()?;
        }
        Ok(Affine3A::from_mat4(Mat4::from_cols_array(&cols)))
    }

    /// Reads the 12-float affine encoding.
    pub fn read_affine(&mut self) -> Result<Affine3A> {
        let mut cols = [0.0f32; 12];
        for value in &mut cols {
            *value = self.read_f32()?;
        }
        Ok(Affine3A::from_cols_array(&cols))
    }
}

/// Sequential writer producing the layout [`ContentReader`] consumes.
pub struct ContentWriter<W> {
    inner: W,
}

impl<W: Write> ContentWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.inner.write_u8(value)?)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.inner.write_i32::<LittleEndian>(value)?)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        Ok(self.inner.write_i64::<LittleEndian>(value)?)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        Ok(self.inner.write_f32::<LittleEndian>(value)?)
    }

    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = i32::try_from(count)
            .map_err(|_| SinewError::InvalidContent(format!("count too large: {count}")))?;
        self.write_i32(count)
    }

    pub fn write_time_span(&mut self, value: TimeSpan) -> Result<()> {
        self.write_i64(value.ticks())
    }

    pub fn write_7bit_encoded_int(&mut self, mut value: u32) -> Result<()> {
        while value >= 0x80 {
            self.write_u8((value as u8) | 0x80)?;
            value >>= 7;
        }
        self.write_u8(value as u8)
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let len = u32::try_from(value.len())
            .map_err(|_| SinewError::InvalidContent("string too long".to_string()))?;
        self.write_7bit_encoded_int(len)?;
        Ok(self.inner.write_all(value.as_bytes())?)
    }

    pub fn write_vec2(&mut self, value: Vec2) -> Result<()> {
        self.write_floats(&value.to_array())
    }

    pub fn write_vec3(&mut self, value: Vec3) -> Result<()> {
        self.write_floats(&value.to_array())
    }

    pub fn write_vec4(&mut self, value: Vec4) -> Result<()> {
        self.write_floats(&value.to_array())
    }

    pub fn write_matrix(&mut self, value: &Affine3A) -> Result<()> {
        self.write_floats(&Mat4::from(*value).to_cols_array())
    }

    pub fn write_affine(&mut self, value: &Affine3A) -> Result<()> {
        self.write_floats(&value.to_cols_array())
    }

    fn write_floats(&mut self, values: &[f32]) -> Result<()> {
        for &value in values {
            self.write_f32(value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_bit_length_prefix_spans_multiple_bytes() {
        let mut writer = ContentWriter::new(Vec::new());
        writer.write_7bit_encoded_int(300).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes, vec![0xAC, 0x02]);

        let mut reader = ContentReader::new(bytes.as_slice());
        assert_eq!(reader.read_7bit_encoded_int().unwrap(), 300);
    }

    #[test]
    fn string_round_trip() {
        let mut writer = ContentWriter::new(Vec::new());
        writer.write_string("Bip01 L Thigh").unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes[0] as usize, "Bip01 L Thigh".len());

        let mut reader = ContentReader::new(bytes.as_slice());
        assert_eq!(reader.read_string().unwrap(), "Bip01 L Thigh");
    }

    #[test]
    fn affine_encoding_is_rotation_block_then_translation() {
        let m = Affine3A::from_translation(Vec3::new(7.0, 8.0, 9.0));
        let mut writer = ContentWriter::new(Vec::new());
        writer.write_affine(&m).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 12 * 4);

        let mut reader = ContentReader::new(bytes.as_slice());
        let floats: Vec<f32> = (0..12).map(|_| reader.read_f32().unwrap()).collect();
        assert_eq!(&floats[..9], &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&floats[9..], &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn negative_count_is_rejected() {
        let mut writer = ContentWriter::new(Vec::new());
        writer.write_i32(-1).unwrap();
        let bytes = writer.into_inner();
        let mut reader = ContentReader::new(bytes.as_slice());
        assert!(matches!(
            reader.read_count("clip"),
            Err(SinewError::InvalidContent(_))
        ));
    }

    #[test]
    fn oversized_string_length_is_a_short_read() {
        let mut writer = ContentWriter::new(Vec::new());
        writer.write_7bit_encoded_int(u32::MAX).unwrap();
        writer.write_u8(b'a').unwrap();
        let bytes = writer.into_inner();

        let mut reader = ContentReader::new(bytes.as_slice());
        assert!(matches!(reader.read_string(), Err(SinewError::IoError(_))));
    }

    #[test]
    fn truncated_stream_reports_io_error() {
        let bytes = [0u8; 2];
        let mut reader = ContentReader::new(&bytes[..]);
        assert!(matches!(reader.read_i32(), Err(SinewError::IoError(_))));
    }
}
