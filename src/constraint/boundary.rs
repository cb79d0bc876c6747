use glam::{Mat4, Vec3};
use std::fmt::Debug;

use super::bisect::{halving_search, Bisection};
use crate::math::RigidTransform;
use crate::surface::Surface;

/// Default candidate budget of [`BoundaryConstraint::limit_translate`].
pub const DEFAULT_TRANSLATE_ITERATIONS: u32 = 5;

/// A rule a placement change must not break.
pub trait MotionConstraint: Debug {
    fn breaks_constraint(&self, old: &Mat4, new: &Mat4) -> bool;

    /// Largest admissible part of `delta` from `current`, sliding along
    /// `normal` and `binormal` when the straight path is cut short.
    fn best_translate(&self, current: &Mat4, delta: Vec3, normal: Vec3, binormal: Vec3) -> Vec3;
}

/// Result of [`BoundaryConstraint::limit_translate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateLimit {
    pub displacement: Vec3,
    pub fraction: f32,
    pub iterations: u32,
    pub blocked: bool,
}

impl TranslateLimit {
    pub(crate) fn from_search(delta: Vec3, search: Bisection) -> Self {
        Self {
            displacement: delta * search.fraction,
            fraction: search.fraction,
            iterations: search.iterations,
            blocked: search.blocked,
        }
    }
}

/// Keeps motion on one side of a placed surface.
///
/// Both the surface and its placement are borrowed from their owner. With no
/// surface the constraint never blocks; with no placement the surface sits at
/// the world origin.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryConstraint<'a> {
    boundary: Option<&'a dyn Surface>,
    placement: Option<&'a Mat4>,
    iterations: u32,
}

impl Default for BoundaryConstraint<'_> {
    fn default() -> Self {
        Self {
            boundary: None,
            placement: None,
            iterations: DEFAULT_TRANSLATE_ITERATIONS,
        }
    }
}

impl<'a> BoundaryConstraint<'a> {
    pub fn new(boundary: &'a dyn Surface) -> Self {
        Self {
            boundary: Some(boundary),
            ..Default::default()
        }
    }

    pub fn placed(boundary: &'a dyn Surface, placement: &'a Mat4) -> Self {
        Self::new(boundary).with_placement(placement)
    }

    /// A constraint with no boundary; every move passes.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_placement(mut self, placement: &'a Mat4) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn boundary(&self) -> Option<&'a dyn Surface> {
        self.boundary
    }

    pub fn placement(&self) -> Option<&'a Mat4> {
        self.placement
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn to_local(&self, point: Vec3) -> Vec3 {
        match self.placement {
            Some(placement) => placement.rigid_inverse().apply_point(point),
            None => point,
        }
    }

    /// Whether the world-space segment `first → second` crosses the boundary.
    pub fn crosses(&self, first: Vec3, second: Vec3) -> bool {
        self.boundary.is_some_and(|boundary| {
            boundary.crosses_surface(self.to_local(first), self.to_local(second))
        })
    }

    /// Largest clear prefix of `delta` from `start`, found by halving.
    pub fn limit_translate(&self, start: Vec3, delta: Vec3) -> TranslateLimit {
        let search = halving_search(self.iterations, |f| self.crosses(start, start + delta * f));
        TranslateLimit::from_search(delta, search)
    }

    pub fn slide_translate(&self, current: Vec3, delta: Vec3, normal: Vec3, binormal: Vec3) -> Vec3 {
        slide(current, delta, normal, binormal, |start, step| {
            self.limit_translate(start, step)
        })
    }
}

/// Forward progress plus slides along both axes, each slide worth the
/// blocked share of the request in both directions.
///
/// Opposite slides cancel when both are free, so a head-on wall yields only
/// the forward part. The sum approximates sliding contact; it is not a solve.
pub(crate) fn slide(
    current: Vec3,
    delta: Vec3,
    normal: Vec3,
    binormal: Vec3,
    limit: impl Fn(Vec3, Vec3) -> TranslateLimit,
) -> Vec3 {
    let forward = limit(current, delta);
    if !forward.blocked {
        return forward.displacement;
    }
    let next = current + forward.displacement;
    let remaining = (1.0 - forward.fraction) * delta.length();
    [normal, -normal, binormal, -binormal]
        .into_iter()
        .map(|axis| limit(next, axis * remaining).displacement)
        .fold(forward.displacement, |sum, step| sum + step)
}

impl MotionConstraint for BoundaryConstraint<'_> {
    fn breaks_constraint(&self, old: &Mat4, new: &Mat4) -> bool {
        self.crosses(old.translation_block(), new.translation_block())
    }

    fn best_translate(&self, current: &Mat4, delta: Vec3, normal: Vec3, binormal: Vec3) -> Vec3 {
        self.slide_translate(current.translation_block(), delta, normal, binormal)
    }
}
