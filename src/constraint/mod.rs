//! Motion constraints and the halving solvers that enforce them.
//!
//! A constraint rejects a placement change; the solvers shrink a requested
//! move (a translation or a joint state change) until every constraint
//! accepts it, within a fixed iteration budget.

mod bisect;
mod boundary;
mod bounded_move;
mod no_collide;
mod translate;

pub use bisect::{halving_search, Bisection};
pub use boundary::{
    BoundaryConstraint, MotionConstraint, TranslateLimit, DEFAULT_TRANSLATE_ITERATIONS,
};
pub use bounded_move::{bounded_move, BoundedMove, DEFAULT_MOVE_ITERATIONS};
pub use no_collide::NoCollideConstraint;
pub use translate::{slide_axes, translate_constrained};
