use glam::{Mat4, Vec3};
use std::fmt::Debug;

use super::connector::{rooted, Connector};
use crate::error::{KinematicsError, KinematicsResult};
use crate::math::{axis_angle_rotation, translation, EulerOrder, RigidTransform};

/// The closed-form local transform of one joint variant with `N` degrees of
/// freedom.
pub trait JointModel<const N: usize>: Send + Sync + Debug + Clone + 'static {
    fn local_transform(&self, state: &[f32; N]) -> Mat4;
}

#[derive(Debug, Clone)]
pub struct Joint<M, const N: usize>
where
    M: JointModel<N>,
{
    model: M,
    state: [f32; N],
    local: Mat4,
    end: Mat4,
    root: Option<Mat4>,
}

impl<M, const N: usize> Joint<M, N>
where
    M: JointModel<N>,
{
    pub fn from_model(model: M) -> Self {
        let state = [0.0; N];
        let local = model.local_transform(&state);
        Self {
            model,
            state,
            local,
            end: local,
            root: None,
        }
    }

    pub fn with_root(mut self, root: Mat4) -> Self {
        self.set_root_transform(Some(root));
        self.refresh();
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn apply(&mut self, state: [f32; N]) {
        self.state = state;
        self.local = self.model.local_transform(&state);
        self.end = rooted(self.root, self.local);
    }

    fn check(state: &[f32]) -> KinematicsResult<[f32; N]> {
        <[f32; N]>::try_from(state).map_err(|_| KinematicsError::StateLength {
            expected: N,
            got: state.len(),
        })
    }
}

impl<M, const N: usize> Connector for Joint<M, N>
where
    M: JointModel<N>,
{
    fn dof(&self) -> usize {
        N
    }

    fn state(&self) -> &[f32] {
        &self.state
    }

    fn compute_transform(&self, state: &[f32]) -> KinematicsResult<Mat4> {
        Ok(self.model.local_transform(&Self::check(state)?))
    }

    fn set_state(&mut self, state: &[f32]) -> KinematicsResult<()> {
        let state = Self::check(state)?;
        self.apply(state);
        Ok(())
    }

    fn end_transform(&self) -> Mat4 {
        self.end
    }

    fn constraint_transform(&self) -> Mat4 {
        self.local
    }

    fn root_transform(&self) -> Option<Mat4> {
        self.root
    }

    fn set_root_transform(&mut self, root: Option<Mat4>) {
        self.root = root;
    }

    fn refresh(&mut self) {
        self.apply(self.state);
    }

    fn clone_box(&self) -> Box<dyn Connector> {
        Box::new(self.clone())
    }
}

/// Constant offset, no degrees of freedom.
#[derive(Debug, Clone, Copy)]
pub struct Offset {
    pub offset: Mat4,
}

impl JointModel<0> for Offset {
    fn local_transform(&self, _state: &[f32; 0]) -> Mat4 {
        self.offset
    }
}

/// Translation along a fixed direction scaled by the single state entry.
#[derive(Debug, Clone, Copy)]
pub struct Prismatic {
    pub direction: Vec3,
}

impl JointModel<1> for Prismatic {
    fn local_transform(&self, state: &[f32; 1]) -> Mat4 {
        translation(self.direction * state[0])
    }
}

/// Rotation about a fixed axis by the single state entry, via Rodrigues.
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    pub axis: Vec3,
}

impl JointModel<1> for Rotation {
    fn local_transform(&self, state: &[f32; 1]) -> Mat4 {
        Mat4::from_rotation_translation_block(axis_angle_rotation(self.axis, state[0]), Vec3::ZERO)
    }
}

/// Three Euler angles under a fixed axis ordering.
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub order: EulerOrder,
}

impl JointModel<3> for Ball {
    fn local_transform(&self, state: &[f32; 3]) -> Mat4 {
        Mat4::from_rotation_translation_block(self.order.rotation(*state), Vec3::ZERO)
    }
}

/// Free translation.
#[derive(Debug, Clone, Copy)]
pub struct Cartesian;

impl JointModel<3> for Cartesian {
    fn local_transform(&self, state: &[f32; 3]) -> Mat4 {
        translation(Vec3::from_array(*state))
    }
}

pub type OffsetJoint = Joint<Offset, 0>;
pub type PrismaticJoint = Joint<Prismatic, 1>;
pub type RotationJoint = Joint<Rotation, 1>;
pub type BallJoint = Joint<Ball, 3>;
pub type CartesianJoint = Joint<Cartesian, 3>;

impl Joint<Offset, 0> {
    pub fn new(offset: Mat4) -> Self {
        Self::from_model(Offset { offset })
    }

    pub fn translation(offset: Vec3) -> Self {
        Self::new(translation(offset))
    }

    /// Offset from a parent point to a child point, both in the same frame.
    pub fn between(child: Vec3, parent: Vec3) -> Self {
        Self::translation(child - parent)
    }

    /// Clamps `child` to `root`: the offset is `root⁻¹ · child`, and the joint
    /// starts rooted at `root` so its end transform equals `child`.
    pub fn relative(root: Mat4, child: Mat4) -> Self {
        Self::new(root.rigid_inverse() * child).with_root(root)
    }
}

impl Joint<Prismatic, 1> {
    pub fn new(direction: Vec3) -> Self {
        Self::from_model(Prismatic { direction })
    }
}

impl Joint<Rotation, 1> {
    pub fn new(axis: Vec3) -> Self {
        Self::from_model(Rotation { axis })
    }
}

impl Joint<Ball, 3> {
    pub fn new(order: EulerOrder) -> Self {
        Self::from_model(Ball { order })
    }

    pub fn order(&self) -> EulerOrder {
        self.model().order
    }
}

impl Joint<Cartesian, 3> {
    pub fn new() -> Self {
        Self::from_model(Cartesian)
    }
}

impl Default for Joint<Cartesian, 3> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Mat3;
    use std::f32::consts::PI;

    fn rotation_only(m: Mat3) -> Mat4 {
        Mat4::from_rotation_translation_block(m, Vec3::ZERO)
    }

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array()) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-5);
        }
    }

    #[test]
    fn rotation_about_z_at_zero_is_identity() {
        let joint = RotationJoint::new(Vec3::Z);
        assert_mat_eq(joint.compute_transform(&[0.0]).unwrap(), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_about_z_at_pi_flips_x_and_y() {
        let joint = RotationJoint::new(Vec3::Z);
        let t = joint.compute_transform(&[PI]).unwrap();
        assert_abs_diff_eq!(t.x_axis.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(t.y_axis.y, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(t.z_axis.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn prismatic_scales_direction() {
        let mut joint = PrismaticJoint::new(Vec3::new(0.0, 2.0, 0.0));
        joint.set_state(&[1.5]).unwrap();
        assert_eq!(joint.end_transform().translation_block(), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn cartesian_translates_freely() {
        let mut joint = CartesianJoint::new();
        joint.set_state(&[1.0, -2.0, 3.0]).unwrap();
        assert_eq!(joint.state(), &[1.0, -2.0, 3.0]);
        assert_eq!(joint.constraint_transform().translation_block(), Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn ball_joint_uses_its_order() {
        let mut joint = BallJoint::new(EulerOrder::Zyx);
        joint.set_state(&[0.2, 0.4, -0.6]).unwrap();
        let expected = rotation_only(EulerOrder::Zyx.rotation([0.2, 0.4, -0.6]));
        assert_mat_eq(joint.constraint_transform(), expected);
    }

    #[test]
    fn wrong_state_length_is_rejected() {
        let mut joint = BallJoint::new(EulerOrder::Xyz);
        let err = joint.set_state(&[0.0]).unwrap_err();
        assert_eq!(err, KinematicsError::StateLength { expected: 3, got: 1 });
        assert_eq!(joint.state(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn end_transform_is_stale_until_refresh() {
        let mut joint = OffsetJoint::translation(Vec3::X);
        joint.set_root_transform(Some(translation(Vec3::Y)));
        assert_eq!(joint.end_transform().translation_block(), Vec3::X);
        joint.refresh();
        assert_eq!(joint.end_transform().translation_block(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn relative_offset_reproduces_child_pose() {
        let root = Mat4::from_rotation_translation_block(
            axis_angle_rotation(Vec3::Y, 0.7),
            Vec3::new(2.0, 0.0, -1.0),
        );
        let child = translation(Vec3::new(3.0, 1.0, 4.0));
        let joint = OffsetJoint::relative(root, child);
        assert_mat_eq(joint.end_transform(), child);
    }
}
