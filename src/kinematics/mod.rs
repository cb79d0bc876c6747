//! Forward kinematics module
//!
//! Connectors turn state vectors into rigid transforms; chains compose them
//! and the skeleton arena owns the placements they are rooted at.

pub mod chain;
pub mod connector;
pub mod humanoid;
pub mod joint;
pub mod skeleton;

pub use chain::{ChainBuilder, ConnectorChain};
pub use connector::Connector;
pub use humanoid::{Humanoid, Side};
pub use joint::{
    Ball, BallJoint, Cartesian, CartesianJoint, Joint, JointModel, Offset, OffsetJoint, Prismatic,
    PrismaticJoint, Rotation, RotationJoint,
};
pub use skeleton::{NodeId, PlacementId, Skeleton};
