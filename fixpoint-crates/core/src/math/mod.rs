//! Floating point helpers shared by the domains and the propagators.
mod compensated_sum;
pub mod tolerance;

pub(crate) use compensated_sum::*;
