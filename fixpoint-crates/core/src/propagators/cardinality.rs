use crate::basic_types::InvalidConstraintDescription;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::DomainEvents;
use crate::engine::VariableId;
use crate::factory::ConstraintKind;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`CardinalityPropagator`].
#[derive(Clone, Debug)]
pub struct CardinalityPropagatorArgs {
    pub variables: Box<[VariableId]>,
    pub min_count: u32,
    pub max_count: u32,
}

impl PropagatorConstructor for CardinalityPropagatorArgs {
    type PropagatorImpl = CardinalityPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, InvalidConstraintDescription> {
        context.require_non_empty(&self.variables)?;
        context.require_known_variables(&self.variables)?;
        context.require_ordered_sides(self.min_count as f64, self.max_count as f64)?;
        if self
            .variables
            .iter()
            .any(|&variable| !context.is_binary(variable))
        {
            return Err(context.unsupported(
                ConstraintKind::Cardinality,
                "every variable must be binary",
            ));
        }

        for (index, &variable) in self.variables.iter().enumerate() {
            context.register(variable, DomainEvents::FIXED, LocalId::from(index as u32));
        }

        Ok(CardinalityPropagator {
            variables: self.variables,
            min_count: self.min_count,
            max_count: self.max_count,
        })
    }
}

/// Propagator for `min_count <= sum x_i <= max_count` over binary variables.
///
/// Once as many variables are fixed to one as allowed, the free ones are fixed to zero; once only
/// as many can still be one as required, the free ones are fixed to one.
#[derive(Clone, Debug)]
pub struct CardinalityPropagator {
    variables: Box<[VariableId]>,
    min_count: u32,
    max_count: u32,
}

impl Propagator for CardinalityPropagator {
    fn name(&self) -> &str {
        "Cardinality"
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Cardinality
    }

    fn propagate(&self, mut context: PropagationContext) -> PropagationStatus {
        let num_ones = self
            .variables
            .iter()
            .filter(|&&variable| context.lower_bound(variable) > 0.5)
            .count() as u32;
        let num_possible = self
            .variables
            .iter()
            .filter(|&&variable| context.upper_bound(variable) > 0.5)
            .count() as u32;

        if num_ones > self.max_count || num_possible < self.min_count {
            return Err(PropagatorConflict::default().into());
        }

        let value = if num_ones == self.max_count {
            0.0
        } else if num_possible == self.min_count {
            1.0
        } else {
            return Ok(());
        };

        for &variable in self.variables.iter() {
            if !context.is_fixed(variable) {
                let _ = context.fix(variable, value)?;
            }
        }

        Ok(())
    }
}
