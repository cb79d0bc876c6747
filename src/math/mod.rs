//! Math utilities module
//!
//! Rigid 4x4 transform helpers over glam matrices, Rodrigues rotation and
//! Euler axis orderings.

mod euler;
mod transform;

pub use euler::EulerOrder;
pub use transform::{axis_angle_rotation, skew, translation, RigidTransform, Transform};

// Re-export commonly used glam types
pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
