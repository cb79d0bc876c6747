use glam::Mat4;

use super::bisect::halving_search;
use super::boundary::MotionConstraint;
use crate::error::{KinematicsError, KinematicsResult};
use crate::kinematics::connector::rooted;
use crate::kinematics::Connector;

/// Default halving budget of [`bounded_move`].
pub const DEFAULT_MOVE_ITERATIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedMove {
    /// Share of the way from the old state to the target that was applied.
    pub fraction: f32,
    pub iterations: u32,
    /// The target itself broke a constraint.
    pub blocked: bool,
}

/// Moves `connector` toward `target` as far as `constraints` allow.
///
/// The whole target is tried first. If any constraint rejects it, up to
/// `max_iterations` halved steps follow; each accepted step becomes the new
/// reference pose the next one is checked against. Running out of
/// iterations is not an error: the connector keeps the last accepted state,
/// which may be the one it started from.
pub fn bounded_move<C: Connector + ?Sized>(
    connector: &mut C,
    target: &[f32],
    constraints: &[&dyn MotionConstraint],
    max_iterations: u32,
) -> KinematicsResult<BoundedMove> {
    if target.len() != connector.dof() {
        return Err(KinematicsError::StateLength {
            expected: connector.dof(),
            got: target.len(),
        });
    }

    let start = connector.state().to_vec();
    let root = connector.root_transform();
    let interpolate = |f: f32| -> Vec<f32> {
        start
            .iter()
            .zip(target)
            .map(|(s, t)| s + (t - s) * f)
            .collect()
    };

    let mut reference: Mat4 = rooted(root, connector.constraint_transform());
    let mut failure = None;
    let search = halving_search(max_iterations + 1, |f| {
        let candidate = match connector.compute_transform(&interpolate(f)) {
            Ok(local) => rooted(root, local),
            Err(err) => {
                failure = failure.take().or(Some(err));
                return true;
            }
        };
        let breaks = constraints
            .iter()
            .any(|c| c.breaks_constraint(&reference, &candidate));
        if !breaks {
            reference = candidate;
        }
        breaks
    });
    if let Some(err) = failure {
        return Err(err);
    }

    if search.fraction > 0.0 {
        connector.set_state(&interpolate(search.fraction))?;
    }
    if search.blocked {
        log::debug!(
            "bounded move stopped at {:.3} of target after {} candidates",
            search.fraction,
            search.iterations
        );
    }
    Ok(BoundedMove {
        fraction: search.fraction,
        iterations: search.iterations,
        blocked: search.blocked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::BoundaryConstraint;
    use crate::kinematics::{ConnectorChain, OffsetJoint, RotationJoint};
    use crate::math::RigidTransform;
    use crate::surface::HalfSpace;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    /// Hand one unit out along Z, swinging about Y toward +X.
    fn arm() -> ConnectorChain {
        ConnectorChain::builder()
            .link(RotationJoint::new(Vec3::Y))
            .link(OffsetJoint::translation(Vec3::Z))
            .build()
    }

    #[test]
    fn unconstrained_move_reaches_target() {
        let mut arm = arm();
        let out = bounded_move(&mut arm, &[FRAC_PI_2], &[], DEFAULT_MOVE_ITERATIONS).unwrap();
        assert_eq!(out.fraction, 1.0);
        assert!(!out.blocked);
        assert_eq!(arm.state(), &[FRAC_PI_2]);
    }

    #[test]
    fn wall_stops_the_swing() {
        // hand may not pass x = 0.5, reached at a sixth of a turn
        let wall = HalfSpace::new(Vec3::X, 0.5);
        let constraint = BoundaryConstraint::new(&wall);
        let mut arm = arm();
        let out = bounded_move(&mut arm, &[FRAC_PI_2], &[&constraint], 5).unwrap();
        assert!(out.blocked);
        assert_eq!(out.fraction, 0.3125);
        assert_abs_diff_eq!(arm.state()[0], 0.3125 * FRAC_PI_2, epsilon = 1e-6);
        assert!(arm.end_transform().translation_block().x < 0.5);
    }

    #[test]
    fn larger_budget_never_moves_less() {
        let wall = HalfSpace::new(Vec3::X, 0.5);
        let constraint = BoundaryConstraint::new(&wall);
        let mut last = 0.0;
        for n in 0..10 {
            let mut arm = arm();
            let f = bounded_move(&mut arm, &[FRAC_PI_2], &[&constraint], n)
                .unwrap()
                .fraction;
            assert!(f >= last);
            last = f;
        }
    }

    #[test]
    fn fully_blocked_move_keeps_state() {
        let wall = HalfSpace::new(Vec3::X, 0.0);
        let constraint = BoundaryConstraint::new(&wall);
        let mut arm = arm();
        // any positive swing crosses x = 0 immediately
        let out = bounded_move(&mut arm, &[FRAC_PI_2], &[&constraint], 0).unwrap();
        assert_eq!(out.fraction, 0.0);
        assert_eq!(arm.state(), &[0.0]);
    }

    #[test]
    fn wrong_target_length_is_an_error() {
        let mut arm = arm();
        assert!(bounded_move(&mut arm, &[0.1, 0.2], &[], 5).is_err());
    }
}
