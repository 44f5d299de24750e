//! Uniform keyframe generation.
//!
//! Playback holds each keyframe until the next one, so sparse keys look
//! choppy. Resampling fills every gap wider than `1 / frequency` with
//! interpolated keys, one bone at a time. Authored keyframes are never
//! moved or removed.

use sinew_animation::{Keyframe, sort_keyframes};
use sinew_core::{TimeSpan, interpolate_decomposed};

/// Inserts interpolated keyframes so that no two consecutive keys of the
/// same bone are more than `1 / frequency` seconds apart.
///
/// The result is sorted by `(time, bone)`. A frequency of `0` returns the
/// input unchanged.
#[must_use]
pub fn resample_keyframes(keyframes: Vec<Keyframe>, frequency: u32) -> Vec<Keyframe> {
    if frequency == 0 || keyframes.is_empty() {
        return keyframes;
    }

    let key_span = TimeSpan::from_secs_f64(1.0 / f64::from(frequency));
    if !key_span.is_positive() {
        log::warn!("Keyframe frequency {frequency} is too high to resample, keeping authored keyframes");
        return keyframes;
    }

    let original_count = keyframes.len();
    let bone_count = keyframes.iter().map(|k| k.bone).max().map_or(0, |b| b + 1);

    let mut per_bone: Vec<Vec<Keyframe>> = vec![Vec::new(); bone_count];
    for keyframe in keyframes {
        per_bone[keyframe.bone].push(keyframe);
    }

    let mut merged = Vec::with_capacity(original_count);
    for frames in &mut per_bone {
        fill_gaps(frames, key_span);
        merged.append(frames);
    }
    sort_keyframes(&mut merged);

    log::debug!(
        "Resampled at {frequency} Hz: {original_count} -> {} keyframes",
        merged.len()
    );
    merged
}

/// Walks consecutive pairs, inserting a key `key_span` after the earlier
/// one whenever the pair is further apart than `key_span`. Inserted keys
/// take part in the following comparisons, so gaps are filled step by step.
fn fill_gaps(frames: &mut Vec<Keyframe>, key_span: TimeSpan) {
    let mut i = 0;
    while i + 1 < frames.len() {
        let a = frames[i];
        let b = frames[i + 1];
        let diff = b.time - a.time;
        if diff > key_span {
            let amount = (key_span.as_secs_f64() / diff.as_secs_f64()) as f32;
            let transform = interpolate_decomposed(&a.transform, &b.transform, amount);
            frames.insert(i + 1, Keyframe::new(a.bone, a.time + key_span, transform));
        }
        i += 1;
    }
}
