use glam::{Mat4, Vec3};
use std::fmt::Debug;

use super::bisect::halving_search;
use super::boundary::{slide, MotionConstraint, TranslateLimit, DEFAULT_TRANSLATE_ITERATIONS};
use crate::collision::PairwiseCollision;
use crate::math::RigidTransform;

/// Keeps a moving hitbox out of contact with a fixed one.
///
/// The pair's secondary body is the one being moved; its new placement is
/// tested together with the path its vertices sweep from the old one. A
/// pair that cannot be evaluated counts as blocked.
#[derive(Debug)]
pub struct NoCollideConstraint<'a, C: ?Sized> {
    pair: &'a C,
    primary: &'a Mat4,
    iterations: u32,
}

impl<'a, C: PairwiseCollision + Debug + ?Sized> NoCollideConstraint<'a, C> {
    pub fn new(pair: &'a C, primary: &'a Mat4) -> Self {
        Self {
            pair,
            primary,
            iterations: DEFAULT_TRANSLATE_ITERATIONS,
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    fn collides(&self, old: &Mat4, new: &Mat4) -> bool {
        self.pair
            .check_swept_collision(self.primary, new, old)
            .unwrap_or_else(|err| {
                log::warn!("{err}; treating move as blocked");
                true
            })
    }

    pub fn limit_translate(&self, current: &Mat4, start: Vec3, delta: Vec3) -> TranslateLimit {
        let from = current.with_translation(start);
        let search = halving_search(self.iterations, |f| {
            self.collides(&from, &current.with_translation(start + delta * f))
        });
        TranslateLimit::from_search(delta, search)
    }
}

impl<C: PairwiseCollision + Debug + ?Sized> MotionConstraint for NoCollideConstraint<'_, C> {
    fn breaks_constraint(&self, old: &Mat4, new: &Mat4) -> bool {
        self.collides(old, new)
    }

    fn best_translate(&self, current: &Mat4, delta: Vec3, normal: Vec3, binormal: Vec3) -> Vec3 {
        slide(current.translation_block(), delta, normal, binormal, |start, step| {
            self.limit_translate(current, start, step)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionPair;
    use crate::math::translation;
    use crate::surface::{Ellipsoid, HalfSpace, MeshSurface, TriangleMesh};

    #[test]
    fn box_cannot_sink_into_ground() {
        let ground = HalfSpace::below(0.0);
        let cube = MeshSurface::from_model(&TriangleMesh::cuboid(Vec3::splat(0.5))).unwrap();
        let pair = CollisionPair::new(&ground, &cube);
        let ground_at = Mat4::IDENTITY;
        let constraint = NoCollideConstraint::new(&pair, &ground_at);

        let resting = translation(Vec3::new(0.0, 1.0, 0.0));
        assert!(!constraint.breaks_constraint(&resting, &translation(Vec3::new(2.0, 1.0, 0.0))));
        assert!(constraint.breaks_constraint(&resting, &translation(Vec3::new(0.0, 0.2, 0.0))));

        let out = constraint.best_translate(&resting, Vec3::new(0.0, -1.0, 0.0), Vec3::Z, Vec3::X);
        // bottom face starts at y = 0.5
        assert!(out.y <= 0.0 && out.y > -0.5);
    }

    #[test]
    fn unsupported_pair_blocks() {
        let e = Ellipsoid::sphere(1.0).unwrap();
        let pair = CollisionPair::new(&e, &e);
        let at = Mat4::IDENTITY;
        let constraint = NoCollideConstraint::new(&pair, &at);
        assert!(constraint.breaks_constraint(&Mat4::IDENTITY, &translation(Vec3::X)));
    }
}
