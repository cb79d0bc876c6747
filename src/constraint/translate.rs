use glam::{Mat4, Vec3};

use super::boundary::MotionConstraint;
use crate::math::RigidTransform;

/// Slide axes for a blocked move: perpendicular to the move and to the
/// placement's up column, or the forward and side columns when the move is
/// vertical.
pub fn slide_axes(position: &Mat4, delta: Vec3) -> (Vec3, Vec3) {
    let normal = delta.cross(position.up());
    if normal.length_squared() <= f32::EPSILON * delta.length_squared() {
        return (position.forward(), position.side());
    }
    let binormal = delta.cross(normal);
    (normal.normalize(), binormal.normalize())
}

/// Admissible part of `delta` for a placement under `constraints`.
///
/// Constraints are visited in order; each one that the current delta breaks
/// replaces it with its best translation, which later constraints check in
/// turn.
pub fn translate_constrained(
    position: &Mat4,
    delta: Vec3,
    constraints: &[&dyn MotionConstraint],
) -> Vec3 {
    let origin = position.translation_block();
    constraints.iter().fold(delta, |delta, constraint| {
        let target = position.with_translation(origin + delta);
        if constraint.breaks_constraint(position, &target) {
            let (normal, binormal) = slide_axes(position, delta);
            constraint.best_translate(position, delta, normal, binormal)
        } else {
            delta
        }
    })
}
