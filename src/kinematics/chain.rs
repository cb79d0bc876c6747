use glam::Mat4;
use std::ops::Range;

use super::connector::{rooted, Connector};
use crate::error::{KinematicsError, KinematicsResult};

/// An ordered composition of connectors behaving as one connector.
///
/// The flattened state follows link declaration order. On `set_state` each
/// link is rooted at the previous link's end transform, in index order, so
/// links must never be updated out of order. The chain's root is forwarded
/// to the first link only.
#[derive(Debug, Clone)]
pub struct ConnectorChain {
    links: Vec<Box<dyn Connector>>,
    slots: Vec<Range<usize>>,
    state: Vec<f32>,
    local: Mat4,
    end: Mat4,
    root: Option<Mat4>,
}

impl ConnectorChain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    pub fn links(&self) -> &[Box<dyn Connector>] {
        &self.links
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Range of the flattened state vector owned by link `index`.
    pub fn slot_range(&self, index: usize) -> Option<Range<usize>> {
        self.slots.get(index).cloned()
    }

    fn apply(&mut self, state: &[f32]) -> KinematicsResult<()> {
        let mut upstream = self.root;
        let mut local = Mat4::IDENTITY;
        for (link, slot) in self.links.iter_mut().zip(&self.slots) {
            link.set_root_transform(upstream);
            link.set_state(&state[slot.clone()])?;
            upstream = Some(link.end_transform());
            local *= link.constraint_transform();
        }
        self.state.copy_from_slice(state);
        self.local = local;
        self.end = rooted(self.root, local);
        Ok(())
    }

    fn check(&self, state: &[f32]) -> KinematicsResult<()> {
        if state.len() != self.state.len() {
            return Err(KinematicsError::StateLength {
                expected: self.state.len(),
                got: state.len(),
            });
        }
        Ok(())
    }
}

impl Connector for ConnectorChain {
    fn dof(&self) -> usize {
        self.state.len()
    }

    fn state(&self) -> &[f32] {
        &self.state
    }

    fn compute_transform(&self, state: &[f32]) -> KinematicsResult<Mat4> {
        self.check(state)?;
        self.links
            .iter()
            .zip(&self.slots)
            .try_fold(Mat4::IDENTITY, |acc, (link, slot)| {
                Ok(acc * link.compute_transform(&state[slot.clone()])?)
            })
    }

    fn set_state(&mut self, state: &[f32]) -> KinematicsResult<()> {
        self.check(state)?;
        self.apply(state)
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
        if let Some(first) = self.links.first_mut() {
            first.set_root_transform(root);
        }
    }

    fn refresh(&mut self) {
        let state = self.state.clone();
        // lengths were validated when the state was stored
        if let Err(err) = self.apply(&state) {
            log::error!("chain refresh rejected its own state: {err}");
        }
    }

    fn link(&self, index: usize) -> Option<&dyn Connector> {
        self.links.get(index).map(|l| l.as_ref())
    }

    fn clone_box(&self) -> Box<dyn Connector> {
        Box::new(self.clone())
    }
}

pub struct ChainBuilder {
    links: Vec<Box<dyn Connector>>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    pub fn link<C: Connector + 'static>(mut self, connector: C) -> Self {
        self.links.push(Box::new(connector));
        self
    }

    pub fn boxed_link(mut self, connector: Box<dyn Connector>) -> Self {
        self.links.push(connector);
        self
    }

    /// Lays out the state slots and computes the initial transforms from the
    /// links' current states.
    pub fn build(self) -> ConnectorChain {
        let mut slots = Vec::with_capacity(self.links.len());
        let mut state = Vec::new();
        for link in &self.links {
            let start = state.len();
            state.extend_from_slice(link.state());
            slots.push(start..state.len());
        }

        let mut chain = ConnectorChain {
            links: self.links,
            slots,
            state,
            local: Mat4::IDENTITY,
            end: Mat4::IDENTITY,
            root: None,
        };
        chain.refresh();
        chain
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::joint::{BallJoint, OffsetJoint, PrismaticJoint, RotationJoint};
    use crate::math::{translation, EulerOrder, RigidTransform};
    use approx::assert_abs_diff_eq;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array()) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-5);
        }
    }

    fn limb() -> ConnectorChain {
        ConnectorChain::builder()
            .link(OffsetJoint::translation(Vec3::new(0.1, 0.6, 0.0)))
            .link(BallJoint::new(EulerOrder::Xyx))
            .link(OffsetJoint::translation(Vec3::new(0.3, 0.0, 0.0)))
            .link(RotationJoint::new(Vec3::Y))
            .link(OffsetJoint::translation(Vec3::new(0.3, 0.0, 0.0)))
            .link(BallJoint::new(EulerOrder::Zyx))
            .build()
    }

    #[test]
    fn dof_is_sum_of_links() {
        let chain = limb();
        assert_eq!(chain.dof(), 7);
        assert_eq!(chain.slot_range(0), Some(0..0));
        assert_eq!(chain.slot_range(1), Some(0..3));
        assert_eq!(chain.slot_range(3), Some(3..4));
        assert_eq!(chain.slot_range(5), Some(4..7));
    }

    #[test]
    fn state_round_trips() {
        let mut chain = limb();
        let state = [0.1, -0.2, 0.3, 0.9, -0.4, 0.5, 0.6];
        chain.set_state(&state).unwrap();
        assert_eq!(chain.state(), &state);
        assert_eq!(chain.links()[3].state(), &[0.9]);
    }

    #[test]
    fn end_transform_is_product_of_locals_under_root() {
        let mut chain = limb();
        let root = translation(Vec3::new(0.0, 1.0, 2.0));
        chain.set_root_transform(Some(root));
        let state = [0.1, -0.2, 0.3, 0.9, -0.4, 0.5, 0.6];
        chain.set_state(&state).unwrap();

        let product = chain
            .links()
            .iter()
            .fold(Mat4::IDENTITY, |acc, l| acc * l.constraint_transform());
        assert_mat_eq(chain.end_transform(), root * product);
        assert_mat_eq(chain.constraint_transform(), product);
        assert_mat_eq(chain.compute_transform(&state).unwrap(), product);
        assert_mat_eq(chain.links()[5].end_transform(), chain.end_transform());
    }

    #[test]
    fn links_cascade_end_transforms() {
        let mut chain = limb();
        chain.set_state(&[0.0, 0.0, 0.0, FRAC_PI_2, 0.0, 0.0, 0.0]).unwrap();
        let elbow = chain.link(3).unwrap().end_transform();
        let wrist_offset = chain.link(4).unwrap().end_transform();
        assert_mat_eq(wrist_offset, elbow * translation(Vec3::new(0.3, 0.0, 0.0)));
        // the elbow turns about Y, so the forearm now points along -Z
        assert_abs_diff_eq!(wrist_offset.translation_block().z, -0.3, epsilon = 1e-5);
    }

    #[test]
    fn nested_chains_compose() {
        let inner = ConnectorChain::builder()
            .link(PrismaticJoint::new(Vec3::X))
            .link(PrismaticJoint::new(Vec3::Y))
            .build();
        let mut outer = ConnectorChain::builder()
            .link(OffsetJoint::translation(Vec3::Z))
            .link(inner)
            .build();
        outer.set_state(&[2.0, 3.0]).unwrap();
        assert_eq!(outer.end_transform().translation_block(), Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn wrong_length_leaves_state_untouched() {
        let mut chain = limb();
        assert!(chain.set_state(&[1.0; 3]).is_err());
        assert_eq!(chain.state(), &[0.0; 7]);
    }
}
