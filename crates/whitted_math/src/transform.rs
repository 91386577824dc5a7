// Transform utilities for Mat4
//
// Extends glam::Mat4 with the normal mapping the tracer needs.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3()
// (w=0, translation ignored) and inverse()

use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// The matrix that maps object-space normals to world space for this
    /// object-to-world matrix: transpose of the inverse of the linear part.
    fn normal_matrix(&self) -> Mat3;

    /// Map an object-space normal through this object-to-world matrix and
    /// renormalize. Returns `Vec3::ZERO` for degenerate input.
    fn transform_normal(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.inverse()).transpose()
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        safe_normalize(self.normal_matrix() * normal)
    }
}

/// Normalize, returning `Vec3::ZERO` instead of NaN for zero-length or
/// non-finite input.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(Vec3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point3_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let point = Vec3::new(1.0, 2.0, 3.0);
        let transformed = mat.transform_point3(point);

        assert_eq!(transformed, Vec3::new(11.0, 22.0, 33.0));
    }

    #[test]
    fn test_transform_vector3_no_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let vector = Vec3::new(1.0, 0.0, 0.0);
        let transformed = mat.transform_vector3(vector);

        // Translation should NOT affect vectors (w=0)
        assert_eq!(transformed, vector);
    }

    #[test]
    fn test_transform_vector3_rotation() {
        use std::f32::consts::PI;

        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let transformed = mat.transform_vector3(Vec3::X);

        assert!((transformed - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_normal_under_non_uniform_scale() {
        // Squash a 45 degree surface along x: the normal must tilt towards x,
        // which a plain vector transform would get wrong.
        let mat = Mat4::from_scale(Vec3::new(0.5, 1.0, 1.0));
        let n = Vec3::new(1.0, 1.0, 0.0).normalize();
        let world = mat.transform_normal(n);

        let expected = Vec3::new(2.0, 1.0, 0.0).normalize();
        assert!((world - expected).length() < 1e-5);
        assert!((world.length() - 1.0).abs() < 1e-5);

        // The tangent of the surface stays perpendicular after mapping.
        let tangent = mat.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(world.dot(tangent).abs() < 1e-5);
    }

    #[test]
    fn test_safe_normalize_zero() {
        assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(safe_normalize(Vec3::new(0.0, 3.0, 0.0)), Vec3::Y);
    }

    #[test]
    fn test_mat4_rotation_inverse() {
        use std::f32::consts::PI;

        let mat = Mat4::from_rotation_y(PI / 4.0); // 45 degrees
        let inv = mat.inverse();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = inv.transform_point3(mat.transform_point3(point));

        assert!((back - point).length() < 0.001);
    }
}
