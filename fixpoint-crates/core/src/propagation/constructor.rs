use super::contexts::private::HasAssignments;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use crate::basic_types::InvalidConstraintDescription;
use crate::engine::Assignments;
use crate::engine::DomainEvents;
use crate::engine::VariableId;
use crate::engine::Advisor;
use crate::factory::ConstraintKind;
#[cfg(doc)]
use crate::propagation::ReadDomains;

/// A propagator constructor validates a constraint and creates the propagator for it.
///
/// The constructor declares on which events the propagator should be enqueued; these advisor
/// registrations are fixed from then on.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator + Clone;

    /// Create the propagator instance from `Self`.
    fn create(
        self,
        context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, InvalidConstraintDescription>;
}

/// Handed to a [`PropagatorConstructor`]. Provides read access to the domains through
/// [`ReadDomains`] and registers advisors for the propagator under construction.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    assignments: &'a Assignments,
    /// Registrations are only installed once the propagator has been created successfully.
    registrations: &'a mut Vec<Advisor>,
    propagator_id: PropagatorId,
    constraint_name: &'a str,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        assignments: &'a Assignments,
        registrations: &'a mut Vec<Advisor>,
        propagator_id: PropagatorId,
        constraint_name: &'a str,
    ) -> Self {
        PropagatorConstructorContext {
            assignments,
            registrations,
            propagator_id,
            constraint_name,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    pub fn constraint_name(&self) -> &str {
        self.constraint_name
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of `variable`.
    ///
    /// The [`LocalId`] identifies the variable within the propagator, most often its position in
    /// the scope of the constraint.
    pub fn register(&mut self, variable: VariableId, events: DomainEvents, local_id: LocalId) {
        self.registrations.push(Advisor {
            variable,
            propagator: self.propagator_id,
            local_id,
            trigger: events,
        });
    }

    pub fn require_known_variables(
        &self,
        variables: &[VariableId],
    ) -> Result<(), InvalidConstraintDescription> {
        match variables
            .iter()
            .find(|variable| !self.assignments.contains(**variable))
        {
            Some(&variable) => Err(InvalidConstraintDescription::UnknownVariable {
                name: self.constraint_name.to_owned(),
                variable,
            }),
            None => Ok(()),
        }
    }

    pub fn require_non_empty(
        &self,
        variables: &[VariableId],
    ) -> Result<(), InvalidConstraintDescription> {
        if variables.is_empty() {
            return Err(InvalidConstraintDescription::EmptyScope {
                name: self.constraint_name.to_owned(),
            });
        }
        Ok(())
    }

    pub fn require_same_length(
        &self,
        variables: &[VariableId],
        coefficients: &[f64],
    ) -> Result<(), InvalidConstraintDescription> {
        if variables.len() != coefficients.len() {
            return Err(InvalidConstraintDescription::LengthMismatch {
                name: self.constraint_name.to_owned(),
                variables: variables.len(),
                coefficients: coefficients.len(),
            });
        }
        Ok(())
    }

    pub fn require_finite_coefficients(
        &self,
        coefficients: &[f64],
    ) -> Result<(), InvalidConstraintDescription> {
        match coefficients
            .iter()
            .position(|coefficient| !coefficient.is_finite())
        {
            Some(position) => Err(InvalidConstraintDescription::NonFiniteCoefficient {
                name: self.constraint_name.to_owned(),
                position,
                coefficient: coefficients[position],
            }),
            None => Ok(()),
        }
    }

    pub fn require_ordered_sides(
        &self,
        lhs: f64,
        rhs: f64,
    ) -> Result<(), InvalidConstraintDescription> {
        if lhs.is_nan() || rhs.is_nan() || lhs > rhs {
            return Err(InvalidConstraintDescription::CrossingSides {
                name: self.constraint_name.to_owned(),
                lhs,
                rhs,
            });
        }
        Ok(())
    }

    /// The error for a description that `kind` cannot handle.
    pub fn unsupported(
        &self,
        kind: ConstraintKind,
        reason: &'static str,
    ) -> InvalidConstraintDescription {
        InvalidConstraintDescription::Unsupported {
            name: self.constraint_name.to_owned(),
            kind,
            reason,
        }
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
