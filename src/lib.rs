//! # puppet-motion
//!
//! Articulated motion for 3D characters that must stay out of walls, floors
//! and each other.
//!
//! ## Features
//! - Forward kinematics from composable joints (offset, prismatic, rotation,
//!   ball, Cartesian) and chains with a flattened state vector
//! - Arena-owned kinematic trees and a ready-made 36-DoF humanoid rig
//! - Boundary surfaces and regions, mesh edge skeletons, pairwise collision
//! - Halving solvers that clamp joint moves and translations to constraints
//! - A layered height field for floor, ceiling and room queries
//!
//! ## Example
//! ```rust,ignore
//! use puppet_motion::kinematics::{Connector, ConnectorChain, OffsetJoint, RotationJoint};
//! use puppet_motion::math::RigidTransform;
//! use glam::Vec3;
//!
//! let mut arm = ConnectorChain::builder()
//!     .link(RotationJoint::new(Vec3::Y))
//!     .link(OffsetJoint::translation(Vec3::Z))
//!     .build();
//!
//! arm.set_state(&[std::f32::consts::FRAC_PI_2])?;
//! let hand = arm.end_transform().translation_block(); // ≈ (1, 0, 0)
//! ```

pub mod collision;
pub mod constraint;
pub mod error;
pub mod kinematics;
pub mod math;
pub mod surface;
pub mod time;
pub mod zmap;

pub use collision::{
    CollisionEvent, CollisionInfo, CollisionPair, CollisionTracker, PairwiseCollision,
};
pub use constraint::{
    bounded_move, translate_constrained, BoundaryConstraint, BoundedMove, MotionConstraint,
    NoCollideConstraint,
};
pub use error::{CollisionError, KinematicsError, SurfaceError, ZmapError};
pub use kinematics::{Connector, ConnectorChain, Humanoid, Skeleton};
pub use math::{RigidTransform, Transform};
pub use surface::{MeshSurface, Region, Surface};
pub use time::FrameClock;
pub use zmap::{NavigationConfig, Zmap};
