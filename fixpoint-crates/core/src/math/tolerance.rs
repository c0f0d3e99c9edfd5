//! The numeric tolerance policy of the engine.
//!
//! All comparisons between bounds are absolute with tolerance [`EPSILON`]. A bound moves only if
//! it moves by more than [`EPSILON`]; a new lower bound that overshoots the upper bound by at most
//! [`EPSILON`] is clamped onto it instead of emptying the domain. Values of magnitude at least
//! [`INFINITE_BOUND`] are treated as infinite.

/// Absolute tolerance used for every bound comparison.
pub const EPSILON: f64 = 1e-6;

/// Any bound at least this large in magnitude is considered infinite.
pub const INFINITE_BOUND: f64 = 1e20;

pub fn is_infinite(value: f64) -> bool {
    value.abs() >= INFINITE_BOUND
}

/// Maps large magnitudes onto the IEEE infinities so that infinity checks are exact afterwards.
pub fn normalise_bound(value: f64) -> f64 {
    if value >= INFINITE_BOUND {
        f64::INFINITY
    } else if value <= -INFINITE_BOUND {
        f64::NEG_INFINITY
    } else {
        value
    }
}

pub fn is_equal(lhs: f64, rhs: f64) -> bool {
    lhs == rhs || (lhs - rhs).abs() <= EPSILON
}

/// Whether `lhs` is larger than `rhs` by more than the tolerance.
pub fn is_greater(lhs: f64, rhs: f64) -> bool {
    lhs - rhs > EPSILON
}

/// Whether `lhs` is smaller than `rhs` by more than the tolerance.
pub fn is_less(lhs: f64, rhs: f64) -> bool {
    rhs - lhs > EPSILON
}

/// Rounds a candidate upper bound of an integral variable.
pub fn floor_eps(value: f64) -> f64 {
    (value + EPSILON).floor()
}

/// Rounds a candidate lower bound of an integral variable.
pub fn ceil_eps(value: f64) -> f64 {
    (value - EPSILON).ceil()
}

pub fn is_integral(value: f64) -> bool {
    is_equal(value, value.round())
}
