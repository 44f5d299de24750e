//! GPU-visible vertex buffers.
//!
//! The skinner only needs to push a byte range into a buffer the GPU reads
//! from. [`GpuVertexBuffer`] is that seam: [`HostVertexBuffer`] keeps the
//! bytes in memory (headless hosts, tests), and with the `wgpu` feature
//! [`WgpuVertexBuffer`] uploads through a `wgpu::Queue`.

use sinew_core::{Result, SinewError};

/// Hint passed with every buffer write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetDataOptions {
    #[default]
    None,
    /// The previous contents may be thrown away.
    Discard,
    /// The caller guarantees no pending GPU read overlaps the written range.
    NoOverwrite,
}

/// CPU access declared for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    #[default]
    None,
    /// The CPU never reads the buffer back.
    WriteOnly,
}

impl BufferUsage {
    #[must_use]
    pub fn from_write_only(is_write_only: bool) -> Self {
        if is_write_only {
            Self::WriteOnly
        } else {
            Self::None
        }
    }
}

/// A vertex buffer the CPU writes and the GPU reads.
pub trait GpuVertexBuffer {
    /// Size of the buffer in bytes.
    fn size_bytes(&self) -> usize;

    fn usage(&self) -> BufferUsage;

    /// Writes `data` starting at `offset_bytes`.
    ///
    /// Implementations must reject writes that reach past the end of the
    /// buffer.
    fn set_data(&mut self, offset_bytes: usize, data: &[u8], options: SetDataOptions) -> Result<()>;
}

fn check_write(offset: usize, len: usize, size: usize) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(SinewError::BufferWriteOutOfBounds { offset, len, size }),
    }
}

/// In-memory vertex buffer.
///
/// Every accepted write bumps [`HostVertexBuffer::version`] so a host can
/// tell when the contents need to be re-uploaded.
#[derive(Debug, Clone)]
pub struct HostVertexBuffer {
    label: String,
    usage: BufferUsage,
    data: Vec<u8>,
    version: u64,
    last_write: Option<(std::ops::Range<usize>, SetDataOptions)>,
}

impl HostVertexBuffer {
    #[must_use]
    pub fn new(size_bytes: usize, usage: BufferUsage, label: Option<&str>) -> Self {
        Self {
            label: label.unwrap_or("VertexBuffer").to_string(),
            usage,
            data: vec![0; size_bytes],
            version: 0,
            last_write: None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Byte range and options of the most recent write.
    #[must_use]
    pub fn last_write(&self) -> Option<&(std::ops::Range<usize>, SetDataOptions)> {
        self.last_write.as_ref()
    }
}

impl GpuVertexBuffer for HostVertexBuffer {
    fn size_bytes(&self) -> usize {
        self.data.len()
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn set_data(&mut self, offset_bytes: usize, data: &[u8], options: SetDataOptions) -> Result<()> {
        check_write(offset_bytes, data.len(), self.data.len())?;
        let range = offset_bytes..offset_bytes + data.len();
        self.data[range.clone()].copy_from_slice(data);
        self.version += 1;
        self.last_write = Some((range, options));
        Ok(())
    }
}

#[cfg(feature = "wgpu")]
pub use self::wgpu_buffer::WgpuVertexBuffer;

#[cfg(feature = "wgpu")]
mod wgpu_buffer {
    use super::{BufferUsage, GpuVertexBuffer, SetDataOptions, check_write};
    use sinew_core::Result;

    /// Vertex buffer backed by a `wgpu::Buffer`.
    ///
    /// Writes go through `Queue::write_buffer`, which stages the data and
    /// never stalls on in-flight GPU reads, so every [`SetDataOptions`]
    /// behaves like `NoOverwrite`.
    #[derive(Debug)]
    pub struct WgpuVertexBuffer {
        buffer: wgpu::Buffer,
        queue: wgpu::Queue,
        usage: BufferUsage,
    }

    impl WgpuVertexBuffer {
        #[must_use]
        pub fn new(
            device: &wgpu::Device,
            queue: wgpu::Queue,
            size_bytes: u64,
            usage: BufferUsage,
            label: Option<&str>,
        ) -> Self {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label,
                size: size_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            Self {
                buffer,
                queue,
                usage,
            }
        }

        #[must_use]
        pub fn buffer(&self) -> &wgpu::Buffer {
            &self.buffer
        }
    }

    impl GpuVertexBuffer for WgpuVertexBuffer {
        fn size_bytes(&self) -> usize {
            self.buffer.size() as usize
        }

        fn usage(&self) -> BufferUsage {
            self.usage
        }

        fn set_data(
            &mut self,
            offset_bytes: usize,
            data: &[u8],
            _options: SetDataOptions,
        ) -> Result<()> {
            check_write(offset_bytes, data.len(), self.size_bytes())?;
            self.queue
                .write_buffer(&self.buffer, offset_bytes as u64, data);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_buffer_records_writes() {
        let mut buffer = HostVertexBuffer::new(8, BufferUsage::WriteOnly, Some("test"));
        buffer
            .set_data(4, &[1, 2, 3, 4], SetDataOptions::NoOverwrite)
            .unwrap();
        assert_eq!(buffer.data(), &[0, 0, 0, 0, 1, 2, 3, 4]);
        assert_eq!(buffer.version(), 1);
        assert_eq!(
            buffer.last_write(),
            Some(&(4..8, SetDataOptions::NoOverwrite))
        );
    }

    #[test]
    fn host_buffer_rejects_overflow() {
        let mut buffer = HostVertexBuffer::new(4, BufferUsage::None, None);
        let err = buffer
            .set_data(2, &[0; 4], SetDataOptions::None)
            .unwrap_err();
        assert!(matches!(
            err,
            SinewError::BufferWriteOutOfBounds {
                offset: 2,
                len: 4,
                size: 4
            }
        ));
        assert_eq!(buffer.version(), 0);
    }
}
