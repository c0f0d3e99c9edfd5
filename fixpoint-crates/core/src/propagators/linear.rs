use crate::basic_types::InvalidConstraintDescription;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::DomainEvents;
use crate::engine::VariableId;
use crate::factory::ConstraintKind;
use crate::math::tolerance::is_greater;
use crate::math::tolerance::is_less;
use crate::math::tolerance::normalise_bound;
use crate::math::Activity;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`LinearPropagator`].
#[derive(Clone, Debug)]
pub struct LinearPropagatorArgs {
    pub variables: Box<[VariableId]>,
    pub coefficients: Box<[f64]>,
    pub lhs: f64,
    pub rhs: f64,
}

impl PropagatorConstructor for LinearPropagatorArgs {
    type PropagatorImpl = LinearPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, InvalidConstraintDescription> {
        let LinearPropagatorArgs {
            variables,
            coefficients,
            lhs,
            rhs,
        } = self;

        context.require_non_empty(&variables)?;
        context.require_same_length(&variables, &coefficients)?;
        context.require_known_variables(&variables)?;
        context.require_finite_coefficients(&coefficients)?;
        context.require_ordered_sides(lhs, rhs)?;

        let lhs = normalise_bound(lhs);
        let rhs = normalise_bound(rhs);

        let terms: Box<[Term]> = variables
            .iter()
            .zip(coefficients.iter())
            .filter(|(_, coefficient)| **coefficient != 0.0)
            .map(|(&variable, &coefficient)| Term {
                variable,
                coefficient,
            })
            .collect();

        for (index, term) in terms.iter().enumerate() {
            // The upper side is pushed by the minimal contribution of each term, the lower side
            // by the maximal one.
            let mut events = DomainEvents::NONE;
            if rhs.is_finite() {
                events = events.union(if term.coefficient > 0.0 {
                    DomainEvents::LOWER_BOUND
                } else {
                    DomainEvents::UPPER_BOUND
                });
            }
            if lhs.is_finite() {
                events = events.union(if term.coefficient > 0.0 {
                    DomainEvents::UPPER_BOUND
                } else {
                    DomainEvents::LOWER_BOUND
                });
            }
            context.register(term.variable, events, LocalId::from(index as u32));
        }

        Ok(LinearPropagator { terms, lhs, rhs })
    }
}

#[derive(Clone, Copy, Debug)]
struct Term {
    variable: VariableId,
    coefficient: f64,
}

impl Term {
    /// The smallest and largest value of `a * x` under the current domain.
    fn contribution(&self, context: &PropagationContext) -> (f64, f64) {
        let at_lower = self.coefficient * context.lower_bound(self.variable);
        let at_upper = self.coefficient * context.upper_bound(self.variable);
        if self.coefficient > 0.0 {
            (at_lower, at_upper)
        } else {
            (at_upper, at_lower)
        }
    }

    /// Enforces `a * x <= bound`.
    fn enforce_at_most(&self, context: &mut PropagationContext, bound: f64) -> PropagationStatus {
        let value = bound / self.coefficient;
        let _ = if self.coefficient > 0.0 {
            context.tighten_upper_bound(self.variable, value)?
        } else {
            context.tighten_lower_bound(self.variable, value)?
        };
        Ok(())
    }

    /// Enforces `a * x >= bound`.
    fn enforce_at_least(&self, context: &mut PropagationContext, bound: f64) -> PropagationStatus {
        let value = bound / self.coefficient;
        let _ = if self.coefficient > 0.0 {
            context.tighten_lower_bound(self.variable, value)?
        } else {
            context.tighten_upper_bound(self.variable, value)?
        };
        Ok(())
    }
}

/// Propagator for `lhs <= sum a_i x_i <= rhs`.
///
/// The activity bounds are computed with interval arithmetic; infinite contributions are counted
/// rather than summed. If the smallest activity has exactly one infinite contribution only that
/// term can be bounded from the upper side, and symmetrically for the lower side.
#[derive(Clone, Debug)]
pub struct LinearPropagator {
    terms: Box<[Term]>,
    lhs: f64,
    rhs: f64,
}

impl LinearPropagator {
    pub fn lhs(&self) -> f64 {
        self.lhs
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }
}

impl Propagator for LinearPropagator {
    fn name(&self) -> &str {
        "Linear"
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Linear
    }

    fn propagate(&self, mut context: PropagationContext) -> PropagationStatus {
        let mut min_activity = Activity::default();
        let mut max_activity = Activity::default();
        let mut max_range = 0.0_f64;
        let contributions = self
            .terms
            .iter()
            .map(|term| {
                let (smallest, largest) = term.contribution(&context);
                min_activity.add(smallest);
                max_activity.add(largest);
                max_range = max_range.max(largest - smallest);
                (smallest, largest)
            })
            .collect::<Vec<_>>();

        if self.rhs.is_finite()
            && min_activity.is_finite()
            && is_greater(min_activity.finite_value(), self.rhs)
        {
            return Err(PropagatorConflict::default().into());
        }
        if self.lhs.is_finite()
            && max_activity.is_finite()
            && is_less(max_activity.finite_value(), self.lhs)
        {
            return Err(PropagatorConflict::default().into());
        }

        // With every range finite both activities are finite; if no single term can move past
        // either side there is nothing to deduce.
        if max_range.is_finite() {
            let slack = self.rhs - min_activity.finite_value();
            let surplus = max_activity.finite_value() - self.lhs;
            if max_range <= slack.min(surplus) {
                return Ok(());
            }
        }

        if self.rhs.is_finite() {
            match min_activity.num_infinite() {
                0 => {
                    let slack = self.rhs - min_activity.finite_value();
                    for (term, &(smallest, _)) in self.terms.iter().zip(&contributions) {
                        term.enforce_at_most(&mut context, slack + smallest)?;
                    }
                }
                1 => {
                    let slack = self.rhs - min_activity.finite_value();
                    if let Some((term, _)) = self
                        .terms
                        .iter()
                        .zip(&contributions)
                        .find(|(_, (smallest, _))| smallest.is_infinite())
                    {
                        term.enforce_at_most(&mut context, slack)?;
                    }
                }
                _ => {}
            }
        }

        if self.lhs.is_finite() {
            match max_activity.num_infinite() {
                0 => {
                    let surplus = max_activity.finite_value() - self.lhs;
                    for (term, &(_, largest)) in self.terms.iter().zip(&contributions) {
                        term.enforce_at_least(&mut context, largest - surplus)?;
                    }
                }
                1 => {
                    let surplus = max_activity.finite_value() - self.lhs;
                    if let Some((term, _)) = self
                        .terms
                        .iter()
                        .zip(&contributions)
                        .find(|(_, (_, largest))| largest.is_infinite())
                    {
                        term.enforce_at_least(&mut context, -surplus)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;
    use crate::engine::Conflict;

    fn row(
        variables: &[VariableId],
        coefficients: &[f64],
        lhs: f64,
        rhs: f64,
    ) -> LinearPropagatorArgs {
        LinearPropagatorArgs {
            variables: variables.into(),
            coefficients: coefficients.into(),
            lhs,
            rhs,
        }
    }

    #[test]
    fn bounds_are_propagated_from_the_upper_side() {
        let mut engine = TestEngine::default();
        let x = engine.new_integer(1.0, 5.0);
        let y = engine.new_integer(0.0, 10.0);

        // x + 2y <= 9
        let _ = engine
            .new_propagator(row(&[x, y], &[1.0, 2.0], f64::NEG_INFINITY, 9.0))
            .expect("no empty domain");

        engine.assert_bounds(x, 1.0, 5.0);
        engine.assert_bounds(y, 0.0, 4.0);
    }

    #[test]
    fn negative_coefficients_raise_lower_bounds() {
        let mut engine = TestEngine::default();
        let x = engine.new_continuous(0.0, 10.0);
        let y = engine.new_continuous(0.0, 10.0);

        // x - y >= 2.5
        let _ = engine
            .new_propagator(row(&[x, y], &[1.0, -1.0], 2.5, f64::INFINITY))
            .expect("no empty domain");

        engine.assert_bounds(x, 2.5, 10.0);
        engine.assert_bounds(y, 0.0, 7.5);
    }

    #[test]
    fn equality_fixes_the_last_free_variable() {
        let mut engine = TestEngine::default();
        let x = engine.new_integer(0.0, 10.0);
        let y = engine.new_integer(0.0, 10.0);
        let z = engine.new_integer(0.0, 10.0);
        let _ = engine
            .new_propagator(row(&[x, y, z], &[1.0, 1.0, 1.0], 12.0, 12.0))
            .expect("no empty domain");

        engine.fix(x, 3.0).expect("no empty domain");
        engine.fix(y, 4.0).expect("no empty domain");

        engine.assert_bounds(z, 5.0, 5.0);
    }

    #[test]
    fn single_infinite_contribution_bounds_that_variable() {
        let mut engine = TestEngine::default();
        let x = engine.new_continuous(f64::NEG_INFINITY, f64::INFINITY);
        let y = engine.new_continuous(1.0, 4.0);

        // 2x + y <= 9 with x unbounded below
        let _ = engine
            .new_propagator(row(&[x, y], &[2.0, 1.0], f64::NEG_INFINITY, 9.0))
            .expect("no empty domain");

        engine.assert_bounds(x, f64::NEG_INFINITY, 4.0);
        engine.assert_bounds(y, 1.0, 4.0);
    }

    #[test]
    fn two_infinite_contributions_deduce_nothing() {
        let mut engine = TestEngine::default();
        let x = engine.new_continuous(f64::NEG_INFINITY, 0.0);
        let y = engine.new_continuous(f64::NEG_INFINITY, 0.0);
        let z = engine.new_continuous(0.0, 1.0);

        let _ = engine
            .new_propagator(row(&[x, y, z], &[1.0, 1.0, 1.0], f64::NEG_INFINITY, -5.0))
            .expect("no empty domain");

        engine.assert_bounds(z, 0.0, 1.0);
    }

    #[test]
    fn fixed_sum_above_rhs_is_a_propagator_conflict() {
        let mut engine = TestEngine::default();
        let x = engine.new_binary();
        let y = engine.new_binary();
        let handle = engine
            .engine
            .add_propagator(row(&[x, y], &[1.0, 1.0], f64::NEG_INFINITY, 1.0))
            .expect("valid row");

        let _ = engine.engine.tighten(x, 1.0, 1.0).expect("x can be 1");
        let _ = engine.engine.tighten(y, 1.0, 1.0).expect("y can be 1");
        let result = engine.propagate();

        assert_eq!(
            result,
            Err(Conflict::Propagator {
                propagator: handle.untyped(),
                variable: None
            })
        );
    }

    #[test]
    fn rows_with_mismatched_lengths_are_rejected() {
        let mut engine = TestEngine::default();
        let x = engine.new_binary();

        let result = engine
            .engine
            .add_propagator(row(&[x], &[1.0, 2.0], 0.0, 1.0));

        assert!(matches!(
            result,
            Err(InvalidConstraintDescription::LengthMismatch { .. })
        ));
        assert_eq!(engine.engine.num_propagators(), 0);
    }
}
