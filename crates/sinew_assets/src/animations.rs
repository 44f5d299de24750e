//! Animation set asset.
//!
//! Sequential layout:
//!
//! 1. `clip count (i32)`, then per clip its name (string) and clip blob
//!    (see [`crate::clip`])
//! 2. `bind pose count (i32)` + 16-float matrices
//! 3. `inverse bind pose count (i32)` + 16-float matrices
//! 4. `hierarchy count (i32)` + parent indices (`i32`, `-1` for the root)
//! 5. `bone name count (i32)` + names (empty string for an unnamed bone)
//!
//! Decoding validates the result through [`Skeleton::new`] and
//! [`AnimationSet::new`], so a decoded set upholds the same invariants as a
//! built one.

use std::io::{Read, Write};

use glam::Affine3A;
use sinew_animation::{AnimationSet, Skeleton};
use sinew_core::{ContentReader, ContentWriter, MAX_PREALLOCATED_ITEMS, Result, SinewError};

use crate::clip::{read_clip, write_clip};

pub fn read_animation_set<R: Read>(reader: &mut ContentReader<R>) -> Result<AnimationSet> {
    let clip_count = reader.read_count("clip")?;
    let mut clips = Vec::with_capacity(clip_count.min(MAX_PREALLOCATED_ITEMS));
    for _ in 0..clip_count {
        let name = reader.read_string()?;
        clips.push(read_clip(reader, &name)?);
    }

    let bind_pose = read_matrices(reader, "bind pose")?;
    let inverse_bind_pose = read_matrices(reader, "inverse bind pose")?;

    let hierarchy_count = reader.read_count("hierarchy")?;
    let mut parents = Vec::with_capacity(hierarchy_count.min(MAX_PREALLOCATED_ITEMS));
    for bone in 0..hierarchy_count {
        let parent = match reader.read_i32()? {
            -1 => None,
            p => Some(usize::try_from(p).map_err(|_| {
                SinewError::InvalidContent(format!("bone {bone} has parent index {p}"))
            })?),
        };
        parents.push(parent);
    }

    let name_count = reader.read_count("bone name")?;
    let mut bone_names = Vec::with_capacity(name_count.min(MAX_PREALLOCATED_ITEMS));
    for _ in 0..name_count {
        let name = reader.read_string()?;
        bone_names.push((!name.is_empty()).then_some(name));
    }

    let skeleton = Skeleton::new(bind_pose, inverse_bind_pose, parents, bone_names)?;
    log::debug!(
        "Read animation set: {} bones, {} clips",
        skeleton.bone_count(),
        clips.len()
    );
    AnimationSet::new(skeleton, clips)
}

fn read_matrices<R: Read>(
    reader: &mut ContentReader<R>,
    what: &str,
) -> Result<Vec<Affine3A>> {
    let count = reader.read_count(what)?;
    let mut matrices = Vec::with_capacity(count.min(MAX_PREALLOCATED_ITEMS));
    for _ in 0..count {
        matrices.push(reader.read_matrix()?);
    }
    Ok(matrices)
}

pub fn write_animation_set<W: Write>(
    writer: &mut ContentWriter<W>,
    set: &AnimationSet,
) -> Result<()> {
    writer.write_count(set.clip_count())?;
    for (name, clip) in set.clips() {
        writer.write_string(name)?;
        write_clip(writer, clip)?;
    }

    let skeleton = set.skeleton();
    for matrices in [skeleton.bind_pose(), skeleton.inverse_bind_pose()] {
        writer.write_count(matrices.len())?;
        for matrix in matrices {
            writer.write_matrix(matrix)?;
        }
    }

    writer.write_count(skeleton.parents().len())?;
    for parent in skeleton.parents() {
        match parent {
            Some(p) => writer.write_count(*p)?,
            None => writer.write_i32(-1)?,
        }
    }

    writer.write_count(skeleton.bone_names().len())?;
    for name in skeleton.bone_names() {
        writer.write_string(name.as_deref().unwrap_or_default())?;
    }
    Ok(())
}

/// Decodes an animation set from an in-memory asset.
pub fn load_animation_set(bytes: &[u8]) -> Result<AnimationSet> {
    read_animation_set(&mut ContentReader::new(bytes))
}

/// Encodes an animation set into a new buffer.
pub fn save_animation_set(set: &AnimationSet) -> Result<Vec<u8>> {
    let mut writer = ContentWriter::new(Vec::new());
    write_animation_set(&mut writer, set)?;
    Ok(writer.into_inner())
}
