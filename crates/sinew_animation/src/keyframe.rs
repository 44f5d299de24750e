use glam::Affine3A;
use sinew_core::TimeSpan;

/// A single bone's local (parent-relative) transform at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub bone: usize,
    pub time: TimeSpan,
    pub transform: Affine3A,
}

impl Keyframe {
    #[must_use]
    pub fn new(bone: usize, time: TimeSpan, transform: Affine3A) -> Self {
        Self {
            bone,
            time,
            transform,
        }
    }
}

/// Stable sort by `(time, bone)`.
///
/// Keyframes sharing both time and bone keep their relative order.
pub fn sort_keyframes(keyframes: &mut [Keyframe]) {
    keyframes.sort_by(|a, b| a.time.cmp(&b.time).then(a.bone.cmp(&b.bone)));
}

/// Returns `true` if the slice is ordered by `(time, bone)`.
#[must_use]
pub fn is_sorted(keyframes: &[Keyframe]) -> bool {
    keyframes
        .windows(2)
        .all(|w| (w[0].time, w[0].bone) <= (w[1].time, w[1].bone))
}
