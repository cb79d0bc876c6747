use glam::Mat4;

use super::connector::Connector;
use crate::constraint::{bounded_move, BoundedMove, MotionConstraint};
use crate::error::{KinematicsError, KinematicsResult};

/// Index of a transform slot owned by a [`Skeleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementId(usize);

/// Index of a connector node owned by a [`Skeleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl PlacementId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct SkeletonNode {
    connector: Box<dyn Connector>,
    parent: Option<PlacementId>,
    slot: PlacementId,
}

/// Arena that owns every placement of a kinematic tree.
///
/// Connectors never own their root: each node names a parent slot and
/// publishes its end transform to its own slot. A node can only name slots
/// that already exist, so attachment order is always root-to-leaf and
/// [`Skeleton::refresh`] walks nodes in that order.
///
/// Updating one node does not touch its descendants. Their cached end
/// transforms stay stale until they are set or refreshed.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    placements: Vec<Mat4>,
    nodes: Vec<SkeletonNode>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an externally driven transform (an object's world pose).
    pub fn add_placement(&mut self, transform: Mat4) -> PlacementId {
        self.placements.push(transform);
        PlacementId(self.placements.len() - 1)
    }

    pub fn placement(&self, id: PlacementId) -> KinematicsResult<Mat4> {
        self.placements
            .get(id.0)
            .copied()
            .ok_or(KinematicsError::UnknownPlacement(id.0))
    }

    /// Overwrites a placement without propagating to dependent nodes.
    pub fn set_placement(&mut self, id: PlacementId, transform: Mat4) -> KinematicsResult<()> {
        let slot = self
            .placements
            .get_mut(id.0)
            .ok_or(KinematicsError::UnknownPlacement(id.0))?;
        *slot = transform;
        Ok(())
    }

    pub fn attach<C: Connector + 'static>(
        &mut self,
        connector: C,
        parent: Option<PlacementId>,
    ) -> KinematicsResult<NodeId> {
        self.attach_boxed(Box::new(connector), parent)
    }

    pub fn attach_boxed(
        &mut self,
        mut connector: Box<dyn Connector>,
        parent: Option<PlacementId>,
    ) -> KinematicsResult<NodeId> {
        let root = match parent {
            Some(id) => Some(self.placement(id)?),
            None => None,
        };
        connector.set_root_transform(root);
        connector.refresh();
        let slot = self.add_placement(connector.end_transform());
        self.nodes.push(SkeletonNode {
            connector,
            parent,
            slot,
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connector(&self, node: NodeId) -> KinematicsResult<&dyn Connector> {
        self.node(node).map(|n| n.connector.as_ref())
    }

    /// The slot a node publishes its end transform to, for use as a parent.
    pub fn end_slot(&self, node: NodeId) -> KinematicsResult<PlacementId> {
        self.node(node).map(|n| n.slot)
    }

    pub fn end_transform(&self, node: NodeId) -> KinematicsResult<Mat4> {
        self.node(node).map(|n| n.connector.end_transform())
    }

    pub fn dof(&self) -> usize {
        self.nodes.iter().map(|n| n.connector.dof()).sum()
    }

    pub fn set_state(&mut self, node: NodeId, state: &[f32]) -> KinematicsResult<()> {
        self.with_rooted_node(node, |connector| connector.set_state(state))
    }

    /// Moves `node` toward `target` without breaking any of `constraints`.
    pub fn bounded_move(
        &mut self,
        node: NodeId,
        target: &[f32],
        constraints: &[&dyn MotionConstraint],
        max_iterations: u32,
    ) -> KinematicsResult<BoundedMove> {
        self.with_rooted_node(node, |connector| {
            bounded_move(connector, target, constraints, max_iterations)
        })
    }

    /// Recomputes every node from its current state, root to leaf.
    pub fn refresh(&mut self) {
        for index in 0..self.nodes.len() {
            let root = self.nodes[index].parent.map(|p| self.placements[p.0]);
            let node = &mut self.nodes[index];
            node.connector.set_root_transform(root);
            node.connector.refresh();
            self.placements[node.slot.0] = node.connector.end_transform();
        }
    }

    /// Concatenated states of all nodes in attachment order.
    pub fn state(&self) -> Vec<f32> {
        self.nodes
            .iter()
            .flat_map(|n| n.connector.state().iter().copied())
            .collect()
    }

    /// Splits `state` across all nodes in attachment order, root to leaf.
    pub fn set_state_all(&mut self, state: &[f32]) -> KinematicsResult<()> {
        let expected = self.dof();
        if state.len() != expected {
            return Err(KinematicsError::StateLength {
                expected,
                got: state.len(),
            });
        }
        let mut start = 0;
        for index in 0..self.nodes.len() {
            let end = start + self.nodes[index].connector.dof();
            self.set_state(NodeId(index), &state[start..end])?;
            start = end;
        }
        Ok(())
    }

    fn node(&self, node: NodeId) -> KinematicsResult<&SkeletonNode> {
        self.nodes
            .get(node.0)
            .ok_or(KinematicsError::UnknownNode(node.0))
    }

    fn with_rooted_node<T>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut dyn Connector) -> KinematicsResult<T>,
    ) -> KinematicsResult<T> {
        let parent = self.node(node)?.parent;
        let root = parent.map(|p| self.placements[p.0]);
        let entry = &mut self.nodes[node.0];
        entry.connector.set_root_transform(root);
        let out = f(entry.connector.as_mut())?;
        self.placements[entry.slot.0] = entry.connector.end_transform();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::joint::{OffsetJoint, RotationJoint};
    use crate::math::{translation, RigidTransform};
    use approx::assert_abs_diff_eq;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn two_link() -> (Skeleton, PlacementId, NodeId, NodeId) {
        let mut skeleton = Skeleton::new();
        let base = skeleton.add_placement(Mat4::IDENTITY);
        let shoulder = skeleton
            .attach(RotationJoint::new(Vec3::Y), Some(base))
            .unwrap();
        let shoulder_end = skeleton.end_slot(shoulder).unwrap();
        let hand = skeleton
            .attach(OffsetJoint::translation(Vec3::Z), Some(shoulder_end))
            .unwrap();
        (skeleton, base, shoulder, hand)
    }

    #[test]
    fn child_is_stale_until_refreshed() {
        let (mut skeleton, _, shoulder, hand) = two_link();
        skeleton.set_state(shoulder, &[FRAC_PI_2]).unwrap();
        assert_eq!(
            skeleton.end_transform(hand).unwrap().translation_block(),
            Vec3::Z
        );

        skeleton.refresh();
        let p = skeleton.end_transform(hand).unwrap().translation_block();
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn placement_change_needs_refresh() {
        let (mut skeleton, base, _, hand) = two_link();
        skeleton
            .set_placement(base, translation(Vec3::new(5.0, 0.0, 0.0)))
            .unwrap();
        assert_eq!(
            skeleton.end_transform(hand).unwrap().translation_block(),
            Vec3::Z
        );
        skeleton.refresh();
        assert_eq!(
            skeleton.end_transform(hand).unwrap().translation_block(),
            Vec3::new(5.0, 0.0, 1.0)
        );
    }

    #[test]
    fn flattened_state_round_trips() {
        let (mut skeleton, _, _, _) = two_link();
        assert_eq!(skeleton.dof(), 1);
        skeleton.set_state_all(&[0.4]).unwrap();
        assert_eq!(skeleton.state(), vec![0.4]);
        assert!(skeleton.set_state_all(&[0.4, 0.1]).is_err());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (skeleton, _, _, _) = two_link();
        assert_eq!(
            skeleton.placement(PlacementId(99)).unwrap_err(),
            KinematicsError::UnknownPlacement(99)
        );
        assert!(skeleton.connector(NodeId(7)).is_err());
    }
}
