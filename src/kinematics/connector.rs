use glam::Mat4;
use std::fmt::Debug;

use crate::error::KinematicsResult;

/// A node that turns a fixed-size state vector into a rigid transform.
///
/// The end transform (`root · local`) is cached and recomputed only by
/// [`Connector::set_state`] and [`Connector::refresh`]. Changing the root with
/// [`Connector::set_root_transform`] leaves the cache stale until one of those
/// is called, so a kinematic tree must be updated root-to-leaf.
pub trait Connector: Send + Sync + Debug {
    fn dof(&self) -> usize;

    fn state(&self) -> &[f32];

    /// Pure state → local transform. Does not touch the cache.
    fn compute_transform(&self, state: &[f32]) -> KinematicsResult<Mat4>;

    /// Stores `state` and recomputes the local and end transforms. No
    /// constraint is consulted; any state of the right length is accepted.
    fn set_state(&mut self, state: &[f32]) -> KinematicsResult<()>;

    fn end_transform(&self) -> Mat4;

    /// The local (unrooted) transform for the current state.
    fn constraint_transform(&self) -> Mat4;

    fn root_transform(&self) -> Option<Mat4>;

    fn set_root_transform(&mut self, root: Option<Mat4>);

    /// Re-applies the current state against the current root.
    fn refresh(&mut self);

    /// Child connector at `index` for composite connectors.
    fn link(&self, _index: usize) -> Option<&dyn Connector> {
        None
    }

    fn clone_box(&self) -> Box<dyn Connector>;
}

impl Clone for Box<dyn Connector> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub(crate) fn rooted(root: Option<Mat4>, local: Mat4) -> Mat4 {
    match root {
        Some(root) => root * local,
        None => local,
    }
}
