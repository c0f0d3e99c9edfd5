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

/// How the consequent depends on the antecedent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicRelation {
    /// `antecedent -> consequent`, i.e. `antecedent - consequent <= 0`.
    Implication,
    /// `antecedent <-> consequent`, i.e. `antecedent - consequent = 0`.
    Equivalence,
}

/// The [`PropagatorConstructor`] for the [`LogicPropagator`].
#[derive(Clone, Debug)]
pub struct LogicPropagatorArgs {
    pub antecedent: VariableId,
    pub consequent: VariableId,
    pub relation: LogicRelation,
}

impl PropagatorConstructor for LogicPropagatorArgs {
    type PropagatorImpl = LogicPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, InvalidConstraintDescription> {
        let LogicPropagatorArgs {
            antecedent,
            consequent,
            relation,
        } = self;

        context.require_known_variables(&[antecedent, consequent])?;
        if !context.is_binary(antecedent) || !context.is_binary(consequent) {
            return Err(context.unsupported(ConstraintKind::Logic, "both variables must be binary"));
        }
        if antecedent == consequent {
            return Err(context.unsupported(ConstraintKind::Logic, "the two variables must differ"));
        }

        let (antecedent_events, consequent_events) = match relation {
            LogicRelation::Implication => (DomainEvents::LOWER_BOUND, DomainEvents::UPPER_BOUND),
            LogicRelation::Equivalence => (DomainEvents::FIXED, DomainEvents::FIXED),
        };
        context.register(antecedent, antecedent_events, LocalId::from(0));
        context.register(consequent, consequent_events, LocalId::from(1));

        Ok(LogicPropagator {
            antecedent,
            consequent,
            relation,
        })
    }
}

/// Propagator for an implication or equivalence between two binary variables.
#[derive(Clone, Debug)]
pub struct LogicPropagator {
    antecedent: VariableId,
    consequent: VariableId,
    relation: LogicRelation,
}

impl LogicPropagator {
    pub fn relation(&self) -> LogicRelation {
        self.relation
    }
}

impl Propagator for LogicPropagator {
    fn name(&self) -> &str {
        match self.relation {
            LogicRelation::Implication => "Implication",
            LogicRelation::Equivalence => "Equivalence",
        }
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Logic
    }

    fn propagate(&self, mut context: PropagationContext) -> PropagationStatus {
        let antecedent = context.fixed_value(self.antecedent);
        let consequent = context.fixed_value(self.consequent);

        match self.relation {
            LogicRelation::Implication => {
                if antecedent.is_some_and(|value| value > 0.5) {
                    let _ = context.fix(self.consequent, 1.0)?;
                } else if consequent.is_some_and(|value| value < 0.5) {
                    let _ = context.fix(self.antecedent, 0.0)?;
                }
            }
            LogicRelation::Equivalence => match (antecedent, consequent) {
                (Some(a), Some(c)) if a != c => {
                    return Err(PropagatorConflict::on_variable(self.consequent).into());
                }
                (Some(a), None) => {
                    let _ = context.fix(self.consequent, a)?;
                }
                (None, Some(c)) => {
                    let _ = context.fix(self.antecedent, c)?;
                }
                _ => {}
            },
        }

        Ok(())
    }
}
