//! Transform helpers shared by the asset builder and the runtime.
//!
//! All matrices follow glam's column-vector convention: a point is
//! transformed as `m * p`, and `a * b` applies `b` first, then `a`.

use glam::{Affine3A, Mat3A, Quat, Vec3};

/// Decomposed affine transform (scale, rotation, translation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposed {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Decomposed {
    #[must_use]
    pub fn from_affine(transform: &Affine3A) -> Self {
        let (scale, rotation, translation) = transform.to_scale_rotation_translation();
        Self {
            scale,
            rotation,
            translation,
        }
    }

    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Component-wise blend: linear for scale and translation, normalized
    /// linear (shortest path) for rotation.
    #[must_use]
    pub fn lerp(&self, end: &Self, amount: f32) -> Self {
        Self {
            scale: self.scale.lerp(end.scale, amount),
            rotation: self.rotation.lerp(end.rotation, amount),
            translation: self.translation.lerp(end.translation, amount),
        }
    }
}

/// Interpolates two transforms through their decomposed form and recomposes
/// the result.
///
/// Shear present in either input is lost by the decomposition.
#[must_use]
pub fn interpolate_decomposed(start: &Affine3A, end: &Affine3A, amount: f32) -> Affine3A {
    Decomposed::from_affine(start)
        .lerp(&Decomposed::from_affine(end), amount)
        .to_affine()
}

/// Returns the matrix used to transform normals under `transform`
/// (inverse transpose of the linear part).
#[must_use]
pub fn normal_matrix(transform: &Affine3A) -> Mat3A {
    transform.matrix3.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_endpoints_reproduce_inputs() {
        let a = Affine3A::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let b = Affine3A::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_z(1.0),
            Vec3::new(-1.0, 0.0, 4.0),
        );

        assert!(interpolate_decomposed(&a, &b, 0.0).abs_diff_eq(a, 1e-5));
        assert!(interpolate_decomposed(&a, &b, 1.0).abs_diff_eq(b, 1e-5));
    }

    #[test]
    fn interpolate_translation_midpoint() {
        let a = Affine3A::IDENTITY;
        let b = Affine3A::from_translation(Vec3::new(0.0, 4.0, 0.0));
        let mid = interpolate_decomposed(&a, &b, 0.25);
        assert!((mid.translation.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normal_matrix_of_uniform_scale_keeps_direction() {
        let m = Affine3A::from_scale(Vec3::splat(3.0));
        let n = normal_matrix(&m) * glam::Vec3A::Y;
        assert!((n.normalize() - glam::Vec3A::Y).length() < 1e-6);
    }
}
