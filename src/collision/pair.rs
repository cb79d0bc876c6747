use glam::{Mat4, Vec3};

use super::info::CollisionInfo;
use crate::error::{CollisionError, CollisionResult};
use crate::math::RigidTransform;
use crate::surface::{Ellipsoid, MeshSurface, Surface};

/// Contact test between a fixed primary body and a moving secondary body,
/// each at its own placement.
pub trait PairwiseCollision {
    fn check_collision(&self, primary: &Mat4, secondary: &Mat4) -> CollisionResult<bool>;

    /// Also tests the path each secondary vertex took from its `last` pose.
    /// Only vertex paths are swept, so a thin primary can still slip between
    /// the vertices of a coarse secondary.
    fn check_swept_collision(
        &self,
        primary: &Mat4,
        secondary: &Mat4,
        last: &Mat4,
    ) -> CollisionResult<bool>;

    /// Per-edge test filling `info`; returns the aggregate flag.
    fn full_collision(
        &self,
        primary: &Mat4,
        secondary: &Mat4,
        info: &mut CollisionInfo,
    ) -> CollisionResult<bool>;
}

/// Borrowed pair of hitboxes; which tests exist depends on the two types.
pub struct CollisionPair<'a, P: ?Sized, S: ?Sized> {
    primary: &'a P,
    secondary: &'a S,
}

impl<'a, P: ?Sized, S: ?Sized> CollisionPair<'a, P, S> {
    pub fn new(primary: &'a P, secondary: &'a S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &'a P {
        self.primary
    }

    pub fn secondary(&self) -> &'a S {
        self.secondary
    }
}

impl<P: ?Sized, S: ?Sized> Clone for CollisionPair<'_, P, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ?Sized, S: ?Sized> Copy for CollisionPair<'_, P, S> {}

impl<P: Surface + ?Sized, S: ?Sized> std::fmt::Debug for CollisionPair<'_, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionPair")
            .field("primary", &self.primary.kind())
            .finish_non_exhaustive()
    }
}

/// Secondary mesh relative to the primary's frame.
fn relative(primary: &Mat4, secondary: &Mat4) -> Mat4 {
    primary.rigid_inverse() * *secondary
}

impl<P: Surface + ?Sized> CollisionPair<'_, P, MeshSurface> {
    fn ensure_boundary(&self) -> CollisionResult<()> {
        if self.primary.is_boundary() {
            Ok(())
        } else {
            Err(CollisionError::Unsupported {
                primary: self.primary.kind(),
                secondary: self.secondary.kind(),
            })
        }
    }

    fn placed_edges(&self, pose: Mat4) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.secondary
            .edge_points()
            .map(move |(a, b)| (pose.apply_point(a), pose.apply_point(b)))
    }
}

impl<P: Surface + ?Sized> PairwiseCollision for CollisionPair<'_, P, MeshSurface> {
    fn check_collision(&self, primary: &Mat4, secondary: &Mat4) -> CollisionResult<bool> {
        self.ensure_boundary()?;
        let pose = relative(primary, secondary);
        Ok(self
            .placed_edges(pose)
            .any(|(a, b)| self.primary.crosses_surface(a, b)))
    }

    fn check_swept_collision(
        &self,
        primary: &Mat4,
        secondary: &Mat4,
        last: &Mat4,
    ) -> CollisionResult<bool> {
        if self.check_collision(primary, secondary)? {
            return Ok(true);
        }
        let now = relative(primary, secondary);
        let before = relative(primary, last);
        Ok(self.secondary.verts().iter().any(|&v| {
            self.primary
                .crosses_surface(now.apply_point(v), before.apply_point(v))
        }))
    }

    fn full_collision(
        &self,
        primary: &Mat4,
        secondary: &Mat4,
        info: &mut CollisionInfo,
    ) -> CollisionResult<bool> {
        self.ensure_boundary()?;
        let pose = relative(primary, secondary);
        info.begin(self.secondary.edge_count());
        for (i, (a, b)) in self.placed_edges(pose).enumerate() {
            info.record(i, self.primary.crossing_location(a, b));
        }
        Ok(info.is_colliding())
    }
}

impl CollisionPair<'_, Ellipsoid, Ellipsoid> {
    fn unsupported() -> CollisionError {
        CollisionError::Unsupported {
            primary: "ellipsoid",
            secondary: "ellipsoid",
        }
    }
}

impl PairwiseCollision for CollisionPair<'_, Ellipsoid, Ellipsoid> {
    fn check_collision(&self, _primary: &Mat4, _secondary: &Mat4) -> CollisionResult<bool> {
        Err(Self::unsupported())
    }

    fn check_swept_collision(
        &self,
        _primary: &Mat4,
        _secondary: &Mat4,
        _last: &Mat4,
    ) -> CollisionResult<bool> {
        Err(Self::unsupported())
    }

    fn full_collision(
        &self,
        _primary: &Mat4,
        _secondary: &Mat4,
        _info: &mut CollisionInfo,
    ) -> CollisionResult<bool> {
        Err(Self::unsupported())
    }
}
