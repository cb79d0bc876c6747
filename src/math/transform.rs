use glam::{Mat3, Mat4, Vec3, Vec4};

/// A 4x4 homogeneous rigid transform.
///
/// The upper-left 3x3 block is the orientation and the first three rows of the
/// last column hold the translation. Orientation is never re-orthonormalized;
/// callers keep it orthonormal.
pub type Transform = Mat4;

pub trait RigidTransform {
    fn from_rotation_translation_block(rotation: Mat3, translation: Vec3) -> Self;
    fn rotation_block(&self) -> Mat3;
    fn translation_block(&self) -> Vec3;
    fn with_translation(&self, translation: Vec3) -> Self;
    fn rigid_inverse(&self) -> Self;
    fn apply_point(&self, point: Vec3) -> Vec3;
    fn apply_direction(&self, direction: Vec3) -> Vec3;
    fn up(&self) -> Vec3;
    fn side(&self) -> Vec3;
    fn forward(&self) -> Vec3;
}

impl RigidTransform for Mat4 {
    fn from_rotation_translation_block(rotation: Mat3, translation: Vec3) -> Self {
        Mat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            translation.extend(1.0),
        )
    }

    fn rotation_block(&self) -> Mat3 {
        Mat3::from_mat4(*self)
    }

    fn translation_block(&self) -> Vec3 {
        self.w_axis.truncate()
    }

    fn with_translation(&self, translation: Vec3) -> Self {
        let mut out = *self;
        out.w_axis = translation.extend(1.0);
        out
    }

    /// Inverse assuming an orthonormal rotation block: `[Rᵀ | -Rᵀp]`.
    fn rigid_inverse(&self) -> Self {
        let rotation_t = self.rotation_block().transpose();
        let translation = -(rotation_t * self.translation_block());
        Self::from_rotation_translation_block(rotation_t, translation)
    }

    fn apply_point(&self, point: Vec3) -> Vec3 {
        self.rotation_block() * point + self.translation_block()
    }

    fn apply_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation_block() * direction
    }

    fn up(&self) -> Vec3 {
        self.y_axis.truncate()
    }

    fn side(&self) -> Vec3 {
        self.x_axis.truncate()
    }

    fn forward(&self) -> Vec3 {
        self.z_axis.truncate()
    }
}

pub fn translation(offset: Vec3) -> Transform {
    Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::Z, offset.extend(1.0))
}

/// Cross-product matrix `ŵ` such that `ŵ v = w × v`.
pub fn skew(w: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, w.z, -w.y),
        Vec3::new(-w.z, 0.0, w.x),
        Vec3::new(w.y, -w.x, 0.0),
    )
}

/// Rodrigues' formula `I + ŵ sinθ + ŵ²(1 - cosθ)`. The axis is used as given.
pub fn axis_angle_rotation(axis: Vec3, angle: f32) -> Mat3 {
    let w_hat = skew(axis);
    Mat3::IDENTITY + w_hat * angle.sin() + (w_hat * w_hat) * (1.0 - angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn skew_matches_cross_product() {
        let w = Vec3::new(0.3, -1.2, 2.0);
        let v = Vec3::new(-0.7, 0.4, 1.1);
        let expected = w.cross(v);
        let got = skew(w) * v;
        assert_abs_diff_eq!(got.x, expected.x, epsilon = 1e-6);
        assert_abs_diff_eq!(got.y, expected.y, epsilon = 1e-6);
        assert_abs_diff_eq!(got.z, expected.z, epsilon = 1e-6);
    }

    #[test]
    fn rodrigues_quarter_turn_about_y() {
        let r = axis_angle_rotation(Vec3::Y, FRAC_PI_2);
        let z_rotated = r * Vec3::Z;
        assert_abs_diff_eq!(z_rotated.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(z_rotated.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn rigid_inverse_composes_to_identity() {
        let rotation = axis_angle_rotation(Vec3::new(0.0, 0.0, 1.0), 0.8);
        let t = Mat4::from_rotation_translation_block(rotation, Vec3::new(1.0, -2.0, 0.5));
        let product = t * t.rigid_inverse();
        for (a, b) in product.to_cols_array().iter().zip(Mat4::IDENTITY.to_cols_array()) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn blocks_round_trip() {
        let rotation = axis_angle_rotation(Vec3::X, 0.3);
        let p = Vec3::new(4.0, 5.0, 6.0);
        let t = Mat4::from_rotation_translation_block(rotation, p);
        assert_eq!(t.translation_block(), p);
        assert_eq!(t.rotation_block(), rotation);
        assert_eq!(t.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(translation(p).apply_point(Vec3::ONE), p + Vec3::ONE);
    }
}
