use glam::{Mat3, Vec3};

use super::transform::axis_angle_rotation;

/// Axis ordering for a three-angle rotation. `Xyx` means rotate about X,
/// then the new Y, then the new X: `R = Rx(a) · Ry(b) · Rx(c)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EulerOrder {
    Xyx,
    Xyz,
    Xzx,
    Xzy,
    Yxy,
    Yxz,
    Yzx,
    Yzy,
    Zxy,
    Zxz,
    Zyx,
    Zyz,
}

impl EulerOrder {
    pub const ALL: [EulerOrder; 12] = [
        EulerOrder::Xyx,
        EulerOrder::Xyz,
        EulerOrder::Xzx,
        EulerOrder::Xzy,
        EulerOrder::Yxy,
        EulerOrder::Yxz,
        EulerOrder::Yzx,
        EulerOrder::Yzy,
        EulerOrder::Zxy,
        EulerOrder::Zxz,
        EulerOrder::Zyx,
        EulerOrder::Zyz,
    ];

    pub fn axes(self) -> [Vec3; 3] {
        use EulerOrder::*;
        match self {
            Xyx => [Vec3::X, Vec3::Y, Vec3::X],
            Xyz => [Vec3::X, Vec3::Y, Vec3::Z],
            Xzx => [Vec3::X, Vec3::Z, Vec3::X],
            Xzy => [Vec3::X, Vec3::Z, Vec3::Y],
            Yxy => [Vec3::Y, Vec3::X, Vec3::Y],
            Yxz => [Vec3::Y, Vec3::X, Vec3::Z],
            Yzx => [Vec3::Y, Vec3::Z, Vec3::X],
            Yzy => [Vec3::Y, Vec3::Z, Vec3::Y],
            Zxy => [Vec3::Z, Vec3::X, Vec3::Y],
            Zxz => [Vec3::Z, Vec3::X, Vec3::Z],
            Zyx => [Vec3::Z, Vec3::Y, Vec3::X],
            Zyz => [Vec3::Z, Vec3::Y, Vec3::Z],
        }
    }

    pub fn tag(self) -> &'static str {
        use EulerOrder::*;
        match self {
            Xyx => "XYX",
            Xyz => "XYZ",
            Xzx => "XZX",
            Xzy => "XZY",
            Yxy => "YXY",
            Yxz => "YXZ",
            Yzx => "YZX",
            Yzy => "YZY",
            Zxy => "ZXY",
            Zxz => "ZXZ",
            Zyx => "ZYX",
            Zyz => "ZYZ",
        }
    }

    pub fn rotation(self, angles: [f32; 3]) -> Mat3 {
        let [a, b, c] = self.axes();
        axis_angle_rotation(a, angles[0])
            * axis_angle_rotation(b, angles[1])
            * axis_angle_rotation(c, angles[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_angles_are_identity_for_every_order() {
        for order in EulerOrder::ALL {
            let r = order.rotation([0.0; 3]);
            for (a, b) in r.to_cols_array().iter().zip(Mat3::IDENTITY.to_cols_array()) {
                assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn xyz_matches_glam_euler() {
        let angles = [0.4, -0.9, 1.3];
        let ours = EulerOrder::Xyz.rotation(angles);
        let glams = Mat3::from_euler(glam::EulerRot::XYZ, angles[0], angles[1], angles[2]);
        for (a, b) in ours.to_cols_array().iter().zip(glams.to_cols_array()) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn proper_euler_single_axis_sums_angles() {
        // with the middle angle zero, XYX collapses to one rotation about X
        let r = EulerOrder::Xyx.rotation([0.25, 0.0, 0.5]);
        let expected = axis_angle_rotation(Vec3::X, 0.75);
        for (a, b) in r.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn tags_are_unique() {
        let mut tags: Vec<_> = EulerOrder::ALL.iter().map(|o| o.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 12);
    }
}
