//! Error Types
//!
//! This module defines the error type shared by every Sinew crate.
//!
//! # Overview
//!
//! The main error type [`SinewError`] covers all failure modes including:
//! - Fatal asset build errors (missing skeleton, too many bones, broken clips)
//! - Runtime programming errors (unknown clip, negative time, empty clip set)
//! - Skinning range errors
//! - Binary asset decoding errors
//!
//! Non-fatal build conditions (a mesh without skin data, a channel for an
//! unknown bone, ...) are not errors; they are reported through the `log`
//! facade and the offending item is skipped.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, SinewError>`.
//!
//! ```rust,ignore
//! use sinew_core::errors::{SinewError, Result};
//!
//! fn build_asset() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Sinew animation pipeline.
///
/// Each variant provides specific context about what went wrong.
#[derive(Error, Debug)]
pub enum SinewError {
    // ========================================================================
    // Asset Build Errors
    // ========================================================================
    /// The authored scene contains no bone at all.
    #[error("Input skeleton not found")]
    SkeletonNotFound,

    /// Two distinct skeleton roots were found in the authored scene.
    #[error("Multiple skeletons found: '{first}' and '{second}'")]
    MultipleSkeletons {
        /// Name of the first skeleton root encountered
        first: String,
        /// Name of the conflicting skeleton root
        second: String,
    },

    /// The flattened skeleton is larger than the configured maximum.
    #[error("Skeleton has {count} bones, but the maximum supported is {max}")]
    TooManyBones {
        /// Number of bones after flattening
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// A clip ended up without any keyframe.
    #[error("Animation '{clip}' has no keyframes")]
    ClipHasNoKeyframes {
        /// Clip name
        clip: String,
    },

    /// A clip has a zero or negative duration.
    #[error("Animation '{clip}' has a non-positive duration ({ticks} ticks)")]
    ClipDurationNotPositive {
        /// Clip name
        clip: String,
        /// Duration in ticks
        ticks: i64,
    },

    // ========================================================================
    // Playback Errors
    // ========================================================================
    /// `set_clip` was called with a name the animation set does not contain.
    #[error("Unknown animation clip: {0}")]
    UnknownClip(String),

    /// A player was constructed from an animation set without clips.
    #[error("Cannot play a skeleton without any animation clip")]
    NoClips,

    /// The resulting playback time was negative.
    #[error("Animation time out of range: {0}")]
    NegativeTime(f32),

    // ========================================================================
    // Skinning Errors
    // ========================================================================
    /// A vertex range reaches past the end of the vertex buffer.
    #[error("Vertex range {start}..{end} is outside of a buffer with {len} vertices")]
    VertexRangeOutOfBounds {
        /// First vertex of the range
        start: usize,
        /// One past the last vertex of the range
        end: usize,
        /// Number of vertices in the buffer
        len: usize,
    },

    /// The skinning matrix array does not cover every referenced bone.
    #[error("Vertices reference bone {required}, but only {provided} bone transforms were given")]
    NotEnoughBoneTransforms {
        /// Highest bone index referenced by the vertices
        required: usize,
        /// Length of the supplied transform array
        provided: usize,
    },

    /// A buffer write reaches past the end of the destination buffer.
    #[error("Write of {len} bytes at offset {offset} overflows a {size}-byte buffer")]
    BufferWriteOutOfBounds {
        /// Byte offset of the write
        offset: usize,
        /// Number of bytes written
        len: usize,
        /// Size of the destination buffer in bytes
        size: usize,
    },

    // ========================================================================
    // Decoding Errors
    // ========================================================================
    /// Structurally invalid binary content.
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// A vertex declaration uses an element this pipeline cannot skin.
    #[error("Unsupported vertex element: usage {usage}, format {format}")]
    UnsupportedVertexElement {
        /// Raw usage discriminant
        usage: i32,
        /// Raw format discriminant
        format: i32,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// Read or write failure of the underlying stream.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// String payload was not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

/// Alias for `Result<T, SinewError>`.
pub type Result<T> = std::result::Result<T, SinewError>;
