//! Helpers for setting up propagator scenarios in unit tests.
use super::Conflict;
use super::DecisionBound;
use super::Domain;
use super::PropagationEngine;
use super::VariableId;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorId;
use crate::propagation::ReadDomains;

#[derive(Debug, Default)]
pub(crate) struct TestEngine {
    pub(crate) engine: PropagationEngine,
}

impl TestEngine {
    pub(crate) fn new_binary(&mut self) -> VariableId {
        self.engine.new_variable(Domain::binary())
    }

    pub(crate) fn new_integer(&mut self, lower: f64, upper: f64) -> VariableId {
        self.engine
            .new_variable(Domain::integer(lower, upper).expect("valid integer domain"))
    }

    pub(crate) fn new_continuous(&mut self, lower: f64, upper: f64) -> VariableId {
        self.engine
            .new_variable(Domain::continuous(lower, upper).expect("valid continuous domain"))
    }

    /// Adds the propagator and propagates to a fixpoint.
    pub(crate) fn new_propagator<Constructor: PropagatorConstructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorId, Conflict> {
        let handle = self
            .engine
            .add_propagator(constructor)
            .expect("valid constraint description");
        self.engine.propagate()?;
        Ok(handle.untyped())
    }

    pub(crate) fn propagate(&mut self) -> Result<(), Conflict> {
        self.engine.propagate()
    }

    pub(crate) fn fix(&mut self, variable: VariableId, value: f64) -> Result<(), Conflict> {
        self.engine.apply_decision(variable, DecisionBound::Fix(value))
    }

    pub(crate) fn set_lower_bound(
        &mut self,
        variable: VariableId,
        value: f64,
    ) -> Result<(), Conflict> {
        self.engine
            .apply_decision(variable, DecisionBound::LowerBound(value))
    }

    pub(crate) fn set_upper_bound(
        &mut self,
        variable: VariableId,
        value: f64,
    ) -> Result<(), Conflict> {
        self.engine
            .apply_decision(variable, DecisionBound::UpperBound(value))
    }

    pub(crate) fn lower_bound(&self, variable: VariableId) -> f64 {
        self.engine.current_domains().lower_bound(variable)
    }

    pub(crate) fn upper_bound(&self, variable: VariableId) -> f64 {
        self.engine.current_domains().upper_bound(variable)
    }

    pub(crate) fn assert_bounds(&self, variable: VariableId, lower: f64, upper: f64) {
        let actual_lower = self.lower_bound(variable);
        let actual_upper = self.upper_bound(variable);
        let close =
            |actual: f64, expected: f64| actual == expected || (actual - expected).abs() <= 1e-9;
        assert!(
            close(actual_lower, lower) && close(actual_upper, upper),
            "expected {variable} in [{lower}, {upper}] \
             but it is in [{actual_lower}, {actual_upper}]"
        );
    }
}
