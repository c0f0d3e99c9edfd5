//! The constraint kinds the engine can propagate.
//!
//! Every propagator comes with an `Args` struct implementing
//! [`PropagatorConstructor`](crate::propagation::PropagatorConstructor); the
//! [`PropagatorFactory`](crate::factory::PropagatorFactory) maps constraint descriptions onto
//! them.
mod cardinality;
mod knapsack;
mod lexicographic;
mod linear;
mod logic;
mod variable_bound;

pub use cardinality::*;
pub use knapsack::*;
pub use lexicographic::*;
pub use linear::*;
pub use logic::*;
pub use variable_bound::*;
