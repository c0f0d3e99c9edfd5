use log::trace;

use crate::engine::Assignments;
use crate::engine::Domain;
use crate::engine::EmptyDomain;
use crate::engine::EventSink;
use crate::engine::VariableId;
use crate::engine::VariableType;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::PropagatorId;

pub(crate) mod private {
    use crate::engine::Assignments;

    pub trait HasAssignments {
        fn assignments(&self) -> &Assignments;
    }
}

/// Read access to the current domains. Implemented by every context handed to propagators and by
/// the [`Domains`] view returned by the engine.
pub trait ReadDomains: private::HasAssignments {
    fn contains_variable(&self, variable: VariableId) -> bool {
        self.assignments().contains(variable)
    }

    fn domain(&self, variable: VariableId) -> &Domain {
        self.assignments().domain(variable)
    }

    fn lower_bound(&self, variable: VariableId) -> f64 {
        self.assignments().get_lower_bound(variable)
    }

    fn upper_bound(&self, variable: VariableId) -> f64 {
        self.assignments().get_upper_bound(variable)
    }

    fn is_fixed(&self, variable: VariableId) -> bool {
        self.assignments().is_fixed(variable)
    }

    /// The value of `variable` if it is fixed.
    fn fixed_value(&self, variable: VariableId) -> Option<f64> {
        self.is_fixed(variable).then(|| self.lower_bound(variable))
    }

    fn variable_type(&self, variable: VariableId) -> VariableType {
        self.assignments().variable_type(variable)
    }

    fn is_binary(&self, variable: VariableId) -> bool {
        self.variable_type(variable) == VariableType::Binary
    }
}

impl<T: private::HasAssignments> ReadDomains for T {}

/// A read-only view of all domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    assignments: &'a Assignments,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        Domains { assignments }
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> {
        self.assignments.variables()
    }

    /// The current bounds of every variable, in variable order.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.variables()
            .map(|variable| {
                (
                    self.assignments.get_lower_bound(variable),
                    self.assignments.get_upper_bound(variable),
                )
            })
            .collect()
    }
}

impl private::HasAssignments for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

/// Handed to [`Propagator::propagate`]: reads domains and tightens them on behalf of one
/// propagator.
///
/// Every successful tightening is recorded on the trail with the propagator as its cause, and the
/// resulting events are collected so that the engine can notify the advisors afterwards.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    assignments: &'a mut Assignments,
    event_sink: &'a mut EventSink,
    propagator_id: PropagatorId,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        event_sink: &'a mut EventSink,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagationContext {
            assignments,
            event_sink,
            propagator_id,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Raises the lower bound of `variable` to `bound`. Returns whether the domain changed.
    pub fn tighten_lower_bound(
        &mut self,
        variable: VariableId,
        bound: f64,
    ) -> Result<bool, EmptyDomain> {
        self.tighten(variable, bound, f64::INFINITY)
    }

    /// Lowers the upper bound of `variable` to `bound`. Returns whether the domain changed.
    pub fn tighten_upper_bound(
        &mut self,
        variable: VariableId,
        bound: f64,
    ) -> Result<bool, EmptyDomain> {
        self.tighten(variable, f64::NEG_INFINITY, bound)
    }

    /// Fixes `variable` to `value`. Returns whether the domain changed.
    pub fn fix(&mut self, variable: VariableId, value: f64) -> Result<bool, EmptyDomain> {
        self.tighten(variable, value, value)
    }

    fn tighten(
        &mut self,
        variable: VariableId,
        lower: f64,
        upper: f64,
    ) -> Result<bool, EmptyDomain> {
        let events =
            self.assignments
                .tighten(variable, lower, upper, Some(self.propagator_id))?;
        if events.is_empty() {
            return Ok(false);
        }

        trace!(
            "{} tightened {variable} to [{}, {}]",
            self.propagator_id,
            self.assignments.get_lower_bound(variable),
            self.assignments.get_upper_bound(variable),
        );
        self.event_sink.events_occurred(events, variable);

        Ok(true)
    }
}

impl private::HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
