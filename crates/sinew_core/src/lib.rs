//! Sinew Core
//!
//! Foundational types shared by every Sinew crate:
//!
//! - [`errors`]: the [`SinewError`] enum and the crate-wide [`Result`] alias
//! - [`time`]: tick-based [`TimeSpan`] used for keyframe times and durations
//! - [`transform`]: decompose / blend / recompose helpers for affine transforms
//! - [`io`]: little-endian [`ContentReader`] / [`ContentWriter`] for binary assets

pub mod errors;
pub mod io;
pub mod time;
pub mod transform;

pub use errors::{Result, SinewError};
pub use io::{ContentReader, ContentWriter, MAX_PREALLOCATED_ITEMS};
pub use time::{TICKS_PER_SECOND, TimeSpan};
pub use transform::{Decomposed, interpolate_decomposed, normal_matrix};
