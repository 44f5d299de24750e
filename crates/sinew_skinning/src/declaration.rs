//! Vertex layout descriptors.
//!
//! Discriminants match the values stored in serialized vertex buffers.

use sinew_core::{Result, SinewError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum VertexElementFormat {
    Single = 0,
    Vector2 = 1,
    Vector3 = 2,
    Vector4 = 3,
    Color = 4,
    Byte4 = 5,
}

impl VertexElementFormat {
    /// Size of one element in bytes.
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Single | Self::Color | Self::Byte4 => 4,
            Self::Vector2 => 8,
            Self::Vector3 => 12,
            Self::Vector4 => 16,
        }
    }

    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::Single,
            1 => Self::Vector2,
            2 => Self::Vector3,
            3 => Self::Vector4,
            4 => Self::Color,
            5 => Self::Byte4,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum VertexElementUsage {
    Position = 0,
    Color = 1,
    TextureCoordinate = 2,
    Normal = 3,
    Binormal = 4,
    Tangent = 5,
    BlendIndices = 6,
    BlendWeight = 7,
}

impl VertexElementUsage {
    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::Position,
            1 => Self::Color,
            2 => Self::TextureCoordinate,
            3 => Self::Normal,
            4 => Self::Binormal,
            5 => Self::Tangent,
            6 => Self::BlendIndices,
            7 => Self::BlendWeight,
            _ => return None,
        })
    }

    /// The only format the skinning path accepts for this usage, if any.
    #[must_use]
    pub const fn skinning_format(self) -> Option<VertexElementFormat> {
        match self {
            Self::Position | Self::Normal => Some(VertexElementFormat::Vector3),
            Self::TextureCoordinate => Some(VertexElementFormat::Vector2),
            Self::BlendWeight => Some(VertexElementFormat::Vector4),
            Self::BlendIndices => Some(VertexElementFormat::Byte4),
            Self::Color | Self::Binormal | Self::Tangent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexElement {
    pub offset: u32,
    pub format: VertexElementFormat,
    pub usage: VertexElementUsage,
    pub usage_index: u32,
}

impl VertexElement {
    #[must_use]
    pub const fn new(
        offset: u32,
        format: VertexElementFormat,
        usage: VertexElementUsage,
        usage_index: u32,
    ) -> Self {
        Self {
            offset,
            format,
            usage,
            usage_index,
        }
    }

    /// Decodes raw discriminants, rejecting unknown values.
    pub fn from_raw(offset: u32, format: i32, usage: i32, usage_index: u32) -> Result<Self> {
        match (
            VertexElementFormat::from_raw(format),
            VertexElementUsage::from_raw(usage),
        ) {
            (Some(format), Some(usage)) => Ok(Self::new(offset, format, usage, usage_index)),
            _ => Err(SinewError::UnsupportedVertexElement { usage, format }),
        }
    }

    /// Fails unless this element is one the CPU skinning path can consume.
    pub fn check_skinnable(&self) -> Result<()> {
        if self.usage.skinning_format() == Some(self.format) {
            Ok(())
        } else {
            Err(SinewError::UnsupportedVertexElement {
                usage: self.usage as i32,
                format: self.format as i32,
            })
        }
    }
}

/// Ordered list of vertex elements plus the vertex stride.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexDeclaration {
    stride: u32,
    elements: Vec<VertexElement>,
}

impl VertexDeclaration {
    #[must_use]
    pub fn new(stride: u32, elements: Vec<VertexElement>) -> Self {
        Self { stride, elements }
    }

    /// Builds a tightly packed declaration, assigning offsets in order.
    #[must_use]
    pub fn packed(layout: &[(VertexElementFormat, VertexElementUsage)]) -> Self {
        let mut offset = 0;
        let elements = layout
            .iter()
            .map(|&(format, usage)| {
                let element = VertexElement::new(offset, format, usage, 0);
                offset += format.size();
                element
            })
            .collect();
        Self {
            stride: offset,
            elements,
        }
    }

    /// Standard layout of a CPU-skinned source vertex.
    #[must_use]
    pub fn skinned() -> Self {
        Self::packed(&[
            (VertexElementFormat::Vector3, VertexElementUsage::Position),
            (VertexElementFormat::Vector3, VertexElementUsage::Normal),
            (VertexElementFormat::Vector2, VertexElementUsage::TextureCoordinate),
            (VertexElementFormat::Byte4, VertexElementUsage::BlendIndices),
            (VertexElementFormat::Vector4, VertexElementUsage::BlendWeight),
        ])
    }

    #[inline]
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    #[must_use]
    pub fn has_usage(&self, usage: VertexElementUsage) -> bool {
        self.elements.iter().any(|e| e.usage == usage)
    }
}
