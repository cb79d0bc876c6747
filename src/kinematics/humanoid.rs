//! The humanoid character rig.
//!
//! Offsets are measured on the character model with the origin at the navel,
//! in model units.

use glam::{Mat4, Vec3};

use super::chain::ConnectorChain;
use super::joint::{BallJoint, OffsetJoint, RotationJoint};
use super::skeleton::{NodeId, PlacementId, Skeleton};
use crate::error::KinematicsResult;
use crate::math::EulerOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn mirror(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

const NAVEL: Vec3 = Vec3::new(0.0, 0.15, 0.0);
const SHOULDER: Vec3 = Vec3::new(0.1607, 0.5952, 0.0);
const ELBOW: Vec3 = Vec3::new(0.48123, 0.5879, 0.0);
const WRIST: Vec3 = Vec3::new(0.77558, 0.60311, 0.0);
const HIP: Vec3 = Vec3::new(0.0904, 0.1037, 0.0);
const KNEE: Vec3 = Vec3::new(0.0862, -0.4319, 0.0);
const ANKLE: Vec3 = Vec3::new(0.0596, -0.9047, 0.0);
const NECK: Vec3 = Vec3::new(0.0, 0.6866, 0.0);
const HEAD: Vec3 = Vec3::new(0.0, 0.8766, 0.0);

/// Links of a limb chain: offset, ball, offset, rotation, offset, ball.
const LIMB_BALL_A: usize = 1;
const LIMB_HINGE: usize = 3;
const LIMB_BALL_B: usize = 5;
const HEAD_NECK: usize = 1;
const HEAD_TILT: usize = 3;

fn mirrored(p: Vec3, side: Side) -> Vec3 {
    Vec3::new(p.x * side.mirror(), p.y, p.z)
}

fn limb(
    side: Side,
    root: Vec3,
    joints: [Vec3; 3],
    orders: [EulerOrder; 2],
    hinge_axis: Vec3,
) -> ConnectorChain {
    let [a, b, c] = joints.map(|p| mirrored(p, side));
    ConnectorChain::builder()
        .link(OffsetJoint::between(a, root))
        .link(BallJoint::new(orders[0]))
        .link(OffsetJoint::between(b, a))
        .link(RotationJoint::new(hinge_axis))
        .link(OffsetJoint::between(c, b))
        .link(BallJoint::new(orders[1]))
        .build()
}

/// Flattened layout: waist 0, chest 1..4, arm L 4..11, arm R 11..18,
/// leg L 18..25, leg R 25..32, head 32..36.
#[derive(Debug, Clone)]
pub struct Humanoid {
    skeleton: Skeleton,
    position: PlacementId,
    waist: NodeId,
    chest: NodeId,
    arms: [NodeId; 2],
    legs: [NodeId; 2],
    head: NodeId,
}

impl Humanoid {
    pub const DOF: usize = 36;

    pub fn new(position: Mat4) -> KinematicsResult<Self> {
        let mut skeleton = Skeleton::new();
        let position_slot = skeleton.add_placement(position);

        let origin = skeleton.attach(OffsetJoint::translation(NAVEL), Some(position_slot))?;
        let origin_end = skeleton.end_slot(origin)?;
        let waist = skeleton.attach(RotationJoint::new(Vec3::Y), Some(origin_end))?;
        let chest = skeleton.attach(BallJoint::new(EulerOrder::Yxy), Some(origin_end))?;
        let waist_end = skeleton.end_slot(waist)?;
        let chest_end = skeleton.end_slot(chest)?;

        let arm = |skeleton: &mut Skeleton, side| {
            skeleton.attach(
                limb(
                    side,
                    NAVEL,
                    [SHOULDER, ELBOW, WRIST],
                    [EulerOrder::Xyx, EulerOrder::Zyx],
                    Vec3::Y,
                ),
                Some(chest_end),
            )
        };
        let arm_l = arm(&mut skeleton, Side::Left)?;
        let arm_r = arm(&mut skeleton, Side::Right)?;

        let leg = |skeleton: &mut Skeleton, side| {
            skeleton.attach(
                limb(
                    side,
                    NAVEL,
                    [HIP, KNEE, ANKLE],
                    [EulerOrder::Yxy, EulerOrder::Zxy],
                    Vec3::X,
                ),
                Some(waist_end),
            )
        };
        let leg_l = leg(&mut skeleton, Side::Left)?;
        let leg_r = leg(&mut skeleton, Side::Right)?;

        let head_chain = ConnectorChain::builder()
            .link(OffsetJoint::between(NECK, NAVEL))
            .link(BallJoint::new(EulerOrder::Yxy))
            .link(OffsetJoint::between(HEAD, NECK))
            .link(RotationJoint::new(Vec3::X))
            .build();
        let head = skeleton.attach(head_chain, Some(chest_end))?;

        Ok(Self {
            skeleton,
            position: position_slot,
            waist,
            chest,
            arms: [arm_l, arm_r],
            legs: [leg_l, leg_r],
            head,
        })
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Mutable access for per-node moves such as [`Skeleton::bounded_move`].
    /// Attaching further nodes is allowed; the rig's own nodes stay valid.
    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn arm_node(&self, side: Side) -> NodeId {
        self.arms[side as usize]
    }

    pub fn leg_node(&self, side: Side) -> NodeId {
        self.legs[side as usize]
    }

    pub fn head_node(&self) -> NodeId {
        self.head
    }

    pub fn state(&self) -> Vec<f32> {
        self.skeleton.state()
    }

    pub fn set_state(&mut self, state: &[f32]) -> KinematicsResult<()> {
        self.skeleton.set_state_all(state)
    }

    /// Moves the whole rig. Joint transforms update on the next refresh.
    pub fn set_position(&mut self, position: Mat4) -> KinematicsResult<()> {
        self.skeleton.set_placement(self.position, position)
    }

    pub fn position(&self) -> KinematicsResult<Mat4> {
        self.skeleton.placement(self.position)
    }

    pub fn refresh(&mut self) {
        self.skeleton.refresh();
    }

    pub fn waist(&self) -> KinematicsResult<Mat4> {
        self.skeleton.end_transform(self.waist)
    }

    pub fn chest(&self) -> KinematicsResult<Mat4> {
        self.skeleton.end_transform(self.chest)
    }

    pub fn shoulder(&self, side: Side) -> KinematicsResult<Mat4> {
        self.link_end(self.arms[side as usize], LIMB_BALL_A)
    }

    pub fn elbow(&self, side: Side) -> KinematicsResult<Mat4> {
        self.link_end(self.arms[side as usize], LIMB_HINGE)
    }

    pub fn wrist(&self, side: Side) -> KinematicsResult<Mat4> {
        self.link_end(self.arms[side as usize], LIMB_BALL_B)
    }

    pub fn hip(&self, side: Side) -> KinematicsResult<Mat4> {
        self.link_end(self.legs[side as usize], LIMB_BALL_A)
    }

    pub fn knee(&self, side: Side) -> KinematicsResult<Mat4> {
        self.link_end(self.legs[side as usize], LIMB_HINGE)
    }

    pub fn ankle(&self, side: Side) -> KinematicsResult<Mat4> {
        self.link_end(self.legs[side as usize], LIMB_BALL_B)
    }

    pub fn neck(&self) -> KinematicsResult<Mat4> {
        self.link_end(self.head, HEAD_NECK)
    }

    pub fn head(&self) -> KinematicsResult<Mat4> {
        self.link_end(self.head, HEAD_TILT)
    }

    fn link_end(&self, node: NodeId, link: usize) -> KinematicsResult<Mat4> {
        let connector = self.skeleton.connector(node)?;
        Ok(connector
            .link(link)
            .map(|l| l.end_transform())
            .unwrap_or_else(|| connector.end_transform()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{translation, RigidTransform};
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rig_has_thirty_six_dof() {
        let rig = Humanoid::new(Mat4::IDENTITY).unwrap();
        assert_eq!(rig.skeleton().dof(), Humanoid::DOF);
        assert_eq!(rig.state().len(), Humanoid::DOF);
    }

    #[test]
    fn rest_pose_matches_model_points() {
        let rig = Humanoid::new(translation(Vec3::new(0.0, 1.0, 0.0))).unwrap();
        let wrist = rig.wrist(Side::Left).unwrap().translation_block();
        assert_abs_diff_eq!(wrist.x, -0.77558, epsilon = 1e-5);
        assert_abs_diff_eq!(wrist.y, 1.60311, epsilon = 1e-5);
        let ankle = rig.ankle(Side::Right).unwrap().translation_block();
        assert_abs_diff_eq!(ankle.x, 0.0596, epsilon = 1e-5);
        assert_abs_diff_eq!(ankle.y, 1.0 - 0.9047, epsilon = 1e-5);
        let head = rig.head().unwrap().translation_block();
        assert_abs_diff_eq!(head.y, 1.8766, epsilon = 1e-5);
    }

    #[test]
    fn state_slots_follow_declared_order() {
        let mut rig = Humanoid::new(Mat4::IDENTITY).unwrap();
        let mut state = vec![0.0; Humanoid::DOF];
        state[0] = 0.3; // waist
        state[7] = 0.5; // left elbow hinge
        state[35] = -0.2; // head tilt
        rig.set_state(&state).unwrap();
        assert_eq!(rig.state(), state);

        let elbow = rig.skeleton().connector(rig.arms[0]).unwrap().link(LIMB_HINGE).unwrap();
        assert_eq!(elbow.state(), &[0.5]);
    }

    #[test]
    fn turning_the_waist_swings_the_legs() {
        let mut rig = Humanoid::new(Mat4::IDENTITY).unwrap();
        let mut state = vec![0.0; Humanoid::DOF];
        state[0] = FRAC_PI_2;
        rig.set_state(&state).unwrap();
        // the hip offset (x = -0.0904) now points along +Z
        let hip = rig.hip(Side::Left).unwrap().translation_block();
        assert_abs_diff_eq!(hip.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hip.z, 0.0904, epsilon = 1e-5);
    }

    #[test]
    fn moving_the_rig_requires_refresh() {
        let mut rig = Humanoid::new(Mat4::IDENTITY).unwrap();
        let before = rig.chest().unwrap();
        rig.set_position(translation(Vec3::X)).unwrap();
        assert_eq!(rig.chest().unwrap(), before);
        rig.refresh();
        assert_abs_diff_eq!(rig.chest().unwrap().translation_block().x, 1.0, epsilon = 1e-6);
    }
}
