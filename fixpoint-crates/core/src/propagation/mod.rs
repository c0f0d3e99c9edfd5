//! The contract between the engine and the propagators.
//!
//! A [`Propagator`] is created from a [`PropagatorConstructor`], which validates the constraint
//! and registers the advisors of the propagator through the [`PropagatorConstructorContext`].
//! During propagation the propagator receives a [`PropagationContext`], which gives read access
//! to the domains via [`ReadDomains`] and records every tightening on the trail.
pub(crate) mod constructor;
pub(crate) mod contexts;
pub(crate) mod local_id;
pub(crate) mod propagator;
pub(crate) mod propagator_id;
pub(crate) mod propagator_var_id;
pub(crate) mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::Domains;
pub use contexts::PropagationContext;
pub use contexts::ReadDomains;
pub use local_id::LocalId;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_var_id::PropagatorVarId;
pub use store::PropagatorHandle;
pub(crate) use store::PropagatorStore;
