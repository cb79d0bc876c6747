/// Outcome of a halving search over the fraction of a requested step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Accepted fraction of the step, in `[0, 1]`.
    pub fraction: f32,
    /// Candidates tested.
    pub iterations: u32,
    /// The full step was not accepted.
    pub blocked: bool,
}

impl Bisection {
    fn clear() -> Self {
        Self {
            fraction: 1.0,
            iterations: 1,
            blocked: false,
        }
    }
}

/// Finds the largest prefix of a step that `blocked` lets through.
///
/// The first candidate is the whole step. After that each candidate adds
/// half of the previous increment to the accepted fraction, so the result is
/// built bit by bit: `1/2 + 1/4 + ...` for the bits that pass. Candidates
/// that are blocked are skipped, not retried. At most `iterations`
/// candidates are tested; the error is below `1/2^(iterations-1)` of the step
/// for boundaries the segment crosses once.
///
/// Extra iterations only append bits, so the accepted fraction never
/// shrinks as the budget grows.
pub fn halving_search(iterations: u32, mut blocked: impl FnMut(f32) -> bool) -> Bisection {
    if iterations == 0 {
        return Bisection {
            fraction: 0.0,
            iterations: 0,
            blocked: true,
        };
    }
    if !blocked(1.0) {
        return Bisection::clear();
    }

    let mut fraction = 0.0;
    let mut increment = 0.5;
    for _ in 1..iterations {
        if !blocked(fraction + increment) {
            fraction += increment;
        }
        increment *= 0.5;
    }
    if fraction == 0.0 {
        log::debug!("halving search exhausted {iterations} iterations without progress");
    }
    Bisection {
        fraction,
        iterations,
        blocked: true,
    }
}
