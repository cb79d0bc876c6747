use glam::Vec3;

use super::region::{region_crossing, Region, Surface};
use crate::error::{SurfaceError, SurfaceResult};

/// Everything on the negative side of a plane: `normal · p <= offset`.
#[derive(Debug, Clone, Copy)]
pub struct HalfSpace {
    pub normal: Vec3,
    pub offset: f32,
}

impl HalfSpace {
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self { normal, offset }
    }

    /// Solid ground: everything at or below `height` on the Y axis.
    pub fn below(height: f32) -> Self {
        Self::new(Vec3::Y, height)
    }
}

impl Surface for HalfSpace {
    fn crosses_surface(&self, first: Vec3, second: Vec3) -> bool {
        region_crossing(self, first, second)
    }

    fn kind(&self) -> &'static str {
        "half-space"
    }
}

impl Region for HalfSpace {
    fn inside_region(&self, point: Vec3) -> bool {
        self.normal.dot(point) <= self.offset
    }
}

/// Axis-aligned ellipsoid centered on its placement origin.
#[derive(Debug, Clone, Copy)]
pub struct Ellipsoid {
    semi_axes: Vec3,
    inv_sq: Vec3,
}

impl Ellipsoid {
    /// Every semi-axis must be finite and positive.
    pub fn new(semi_axes: Vec3) -> SurfaceResult<Self> {
        if !semi_axes.is_finite() || semi_axes.min_element() <= 0.0 {
            return Err(SurfaceError::DegenerateEllipsoid {
                semi_axes: semi_axes.to_array(),
            });
        }
        Ok(Self {
            semi_axes,
            inv_sq: (semi_axes * semi_axes).recip(),
        })
    }

    pub fn sphere(radius: f32) -> SurfaceResult<Self> {
        Self::new(Vec3::splat(radius))
    }

    pub fn semi_axes(&self) -> Vec3 {
        self.semi_axes
    }
}

impl Surface for Ellipsoid {
    fn crosses_surface(&self, first: Vec3, second: Vec3) -> bool {
        region_crossing(self, first, second)
    }

    fn kind(&self) -> &'static str {
        "ellipsoid"
    }
}

impl Region for Ellipsoid {
    fn inside_region(&self, point: Vec3) -> bool {
        (point * point).dot(self.inv_sq) <= 1.0
    }
}
