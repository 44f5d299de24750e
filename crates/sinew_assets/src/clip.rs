//! Clip blob: `duration (i64 ticks)`, `keyframe count (i32)`, then per
//! keyframe `bone (i32)`, `time (i64 ticks)` and a 12-float affine transform.

use std::io::{Read, Write};

use sinew_animation::{AnimationClip, Keyframe};
use sinew_core::{ContentReader, ContentWriter, MAX_PREALLOCATED_ITEMS, Result, SinewError};

/// Reads one clip blob. The clip name is not part of the blob.
///
/// Bone indices are only checked for sign here; the range check against the
/// skeleton happens when the clip joins an [`AnimationSet`](sinew_animation::AnimationSet).
pub fn read_clip<R: Read>(reader: &mut ContentReader<R>, name: &str) -> Result<AnimationClip> {
    let duration = reader.read_time_span()?;
    let count = reader.read_count("keyframe")?;

    let mut keyframes = Vec::with_capacity(count.min(MAX_PREALLOCATED_ITEMS));
    for _ in 0..count {
        let bone = reader.read_i32()?;
        let bone = usize::try_from(bone).map_err(|_| {
            SinewError::InvalidContent(format!("clip '{name}' has keyframe for bone {bone}"))
        })?;
        let time = reader.read_time_span()?;
        let transform = reader.read_affine()?;
        keyframes.push(Keyframe::new(bone, time, transform));
    }

    AnimationClip::new(name, duration, keyframes)
}

pub fn write_clip<W: Write>(writer: &mut ContentWriter<W>, clip: &AnimationClip) -> Result<()> {
    writer.write_time_span(clip.duration())?;
    writer.write_count(clip.keyframes().len())?;
    for keyframe in clip.keyframes() {
        writer.write_count(keyframe.bone)?;
        writer.write_time_span(keyframe.time)?;
        writer.write_affine(&keyframe.transform)?;
    }
    Ok(())
}
