use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use dyn_clone::clone_trait_object;
use dyn_clone::DynClone;

use super::PropagationContext;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::engine::PropagationEngine;
use crate::factory::ConstraintKind;
#[cfg(doc)]
use crate::propagation::PropagatorConstructor;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;

// Allows typed handles to retrieve the concrete propagator from a `Box<dyn Propagator>`.
impl_downcast!(Propagator);

// Allows the engine to be cloned, e.g. to evaluate candidates on independent copies.
clone_trait_object!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution of its
/// constraint, or reports that no solution exists under the current domains.
///
/// Propagators only hold the ids of the variables in their scope and the immutable data of their
/// constraint; all mutable state lives in the domains. The variables and domain events a
/// propagator reacts to are declared once, when it is created through a
/// [`PropagatorConstructor`] using [`PropagatorConstructorContext::register`].
pub trait Propagator: Downcast + DynClone {
    /// Return the name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// The constraint kind this propagator implements.
    fn kind(&self) -> ConstraintKind;

    /// Tightens domains using [`PropagationContext`], or reports an inconsistency.
    ///
    /// An `Ok` result after at least one tightening corresponds to a "tightened" outcome, an `Ok`
    /// result without tightenings to "fixpoint". The [`PropagationEngine`] distinguishes the two
    /// by looking at the trail.
    ///
    /// Implementations must be monotone (they only shrink domains) and must not tighten anything
    /// when called again without an intervening domain change. They are not required to reach a
    /// fixpoint of their own constraint in a single call; the engine calls them again whenever one
    /// of their own tightenings triggers one of their advisors.
    fn propagate(&self, context: PropagationContext) -> PropagationStatus;
}
