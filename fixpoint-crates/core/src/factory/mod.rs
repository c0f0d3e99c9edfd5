//! Building engines from declarative constraint descriptions.
//!
//! The [`PropagatorFactory`] maps each [`ConstraintDescription`] onto one of the closed set of
//! [`ConstraintKind`]s, either the one requested by the description or the first kind, in order
//! of priority, that accepts the row. The [`EngineBuilder`] ties variables, descriptions and the
//! root propagation together.
mod builder;
mod constraint_description;
mod constraint_kind;
mod factory_options;
mod propagator_factory;

pub use builder::*;
pub use constraint_description::*;
pub use constraint_kind::*;
pub use factory_options::*;
pub use propagator_factory::*;
