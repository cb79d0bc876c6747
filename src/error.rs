//! Error types for kinematics, surfaces, height fields and pair dispatch.
//!
//! Per-frame queries never return these: lookups fall back to sentinels and
//! crossing tests answer with booleans. Errors cover construction-time
//! contract violations and pair combinations that cannot be evaluated.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KinematicsError {
    /// A state slice did not match the connector's degrees of freedom.
    #[error("state vector has {got} entries, connector expects {expected}")]
    StateLength { expected: usize, got: usize },

    #[error("no connector node with id {0}")]
    UnknownNode(usize),

    #[error("no placement with id {0}")]
    UnknownPlacement(usize),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("face references vertex {index} but the model has {vertex_count} vertices")]
    FaceIndexOutOfRange { index: u32, vertex_count: usize },

    /// A flat buffer whose length is not a multiple of its element stride.
    #[error("{name} buffer of length {len} is not a multiple of {stride}")]
    RaggedBuffer {
        name: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("ellipsoid semi-axes {semi_axes:?} must be finite and positive")]
    DegenerateEllipsoid { semi_axes: [f32; 3] },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZmapError {
    #[error("height feed of {len} bytes is not made of 4-byte samples")]
    MisalignedFeed { len: usize },

    #[error("height feed holds {got} samples, grid has {expected} cells")]
    FeedSize { expected: usize, got: usize },

    #[error("grid resolution {x}x{y} must be non-zero")]
    InvalidResolution { x: usize, y: usize },

    #[error("grid extent {width}x{depth} must be finite and positive")]
    InvalidExtent { width: f32, depth: f32 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollisionError {
    /// The pair (or the direction of the test) has no implementation.
    #[error("collision between {primary} (primary) and {secondary} (secondary) is not implemented")]
    Unsupported {
        primary: &'static str,
        secondary: &'static str,
    },
}

pub type KinematicsResult<T> = Result<T, KinematicsError>;
pub type SurfaceResult<T> = Result<T, SurfaceError>;
pub type ZmapResult<T> = Result<T, ZmapError>;
pub type CollisionResult<T> = Result<T, CollisionError>;
