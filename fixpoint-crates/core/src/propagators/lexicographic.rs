use crate::basic_types::InvalidConstraintDescription;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvents;
use crate::engine::VariableId;
use crate::factory::ConstraintKind;
use crate::math::tolerance::is_equal;
use crate::math::tolerance::is_greater;
use crate::math::tolerance::is_less;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`LexicographicPropagator`].
#[derive(Clone, Debug)]
pub struct LexicographicPropagatorArgs {
    pub x: Box<[VariableId]>,
    pub y: Box<[VariableId]>,
}

impl PropagatorConstructor for LexicographicPropagatorArgs {
    type PropagatorImpl = LexicographicPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, InvalidConstraintDescription> {
        context.require_non_empty(&self.x)?;
        context.require_known_variables(&self.x)?;
        context.require_known_variables(&self.y)?;
        if self.x.len() != self.y.len() {
            return Err(context.unsupported(
                ConstraintKind::Lexicographic,
                "both sequences must have the same length",
            ));
        }

        let num_positions = self.x.len() as u32;
        for (index, &variable) in self.x.iter().enumerate() {
            context.register(variable, DomainEvents::BOUNDS, LocalId::from(index as u32));
        }
        for (index, &variable) in self.y.iter().enumerate() {
            context.register(
                variable,
                DomainEvents::BOUNDS,
                LocalId::from(num_positions + index as u32),
            );
        }

        Ok(LexicographicPropagator {
            x: self.x,
            y: self.y,
        })
    }
}

/// Propagator for `x <=_lex y`.
///
/// Walks the positions from the left. As long as the prefix is fixed to equal values, the
/// current position must satisfy `x_i <= y_i`; it becomes strict when the remaining suffix can no
/// longer be lexicographically smaller or equal.
#[derive(Clone, Debug)]
pub struct LexicographicPropagator {
    x: Box<[VariableId]>,
    y: Box<[VariableId]>,
}

impl LexicographicPropagator {
    /// Whether `x[start..] <=_lex y[start..]` still has a solution, judged on the bounds alone.
    fn suffix_may_be_leq(&self, context: &PropagationContext, start: usize) -> bool {
        for (&x, &y) in self.x[start..].iter().zip(&self.y[start..]) {
            let smallest_x = context.lower_bound(x);
            let largest_y = context.upper_bound(y);
            if is_less(smallest_x, largest_y) {
                return true;
            }
            if is_greater(smallest_x, largest_y) {
                return false;
            }
        }
        true
    }
}

impl Propagator for LexicographicPropagator {
    fn name(&self) -> &str {
        "Lexicographic"
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Lexicographic
    }

    fn propagate(&self, mut context: PropagationContext) -> PropagationStatus {
        for (position, (&x, &y)) in self.x.iter().zip(self.y.iter()).enumerate() {
            let _ = context.tighten_upper_bound(x, context.upper_bound(y))?;
            let _ = context.tighten_lower_bound(y, context.lower_bound(x))?;

            if let (Some(x_value), Some(y_value)) = (context.fixed_value(x), context.fixed_value(y))
            {
                if is_equal(x_value, y_value) {
                    continue;
                }
            }

            let integral = context.variable_type(x).is_integral()
                && context.variable_type(y).is_integral();
            if integral && !self.suffix_may_be_leq(&context, position + 1) {
                let _ = context.tighten_upper_bound(x, context.upper_bound(y) - 1.0)?;
                let _ = context.tighten_lower_bound(y, context.lower_bound(x) + 1.0)?;
            }

            return Ok(());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    fn lex(engine: &mut TestEngine, x: &[VariableId], y: &[VariableId]) {
        let _ = engine
            .new_propagator(LexicographicPropagatorArgs {
                x: x.into(),
                y: y.into(),
            })
            .expect("no empty domain");
    }

    #[test]
    fn violated_first_position_is_a_conflict() {
        let mut engine = TestEngine::default();
        let x = [engine.new_binary(), engine.new_binary()];
        let y = [engine.new_binary(), engine.new_binary()];
        lex(&mut engine, &x, &y);

        engine.fix(x[0], 1.0).expect("no conflict yet");
        let result = engine.fix(y[0], 0.0);

        assert!(result.is_err());
    }

    #[test]
    fn first_position_is_ordered() {
        let mut engine = TestEngine::default();
        let x = [engine.new_integer(0.0, 5.0), engine.new_integer(0.0, 5.0)];
        let y = [engine.new_integer(1.0, 3.0), engine.new_integer(0.0, 5.0)];
        lex(&mut engine, &x, &y);

        engine.assert_bounds(x[0], 0.0, 3.0);
        engine.assert_bounds(y[0], 1.0, 3.0);
        engine.assert_bounds(x[1], 0.0, 5.0);
    }

    #[test]
    fn equal_prefix_cascades_to_the_next_position() {
        let mut engine = TestEngine::default();
        let x = [engine.new_binary(), engine.new_binary()];
        let y = [engine.new_binary(), engine.new_binary()];
        lex(&mut engine, &x, &y);

        engine.fix(x[0], 1.0).expect("no conflict");
        engine.assert_bounds(y[0], 1.0, 1.0);

        engine.fix(y[1], 0.0).expect("no conflict");
        engine.assert_bounds(x[1], 0.0, 0.0);
    }

    #[test]
    fn greater_suffix_makes_the_position_strict() {
        let mut engine = TestEngine::default();
        let x = [engine.new_integer(0.0, 2.0), engine.new_integer(0.0, 2.0)];
        let y = [engine.new_integer(0.0, 2.0), engine.new_integer(0.0, 2.0)];
        lex(&mut engine, &x, &y);

        engine.fix(x[1], 2.0).expect("no conflict");
        engine.fix(y[1], 1.0).expect("no conflict");

        engine.assert_bounds(x[0], 0.0, 1.0);
        engine.assert_bounds(y[0], 1.0, 2.0);
    }

    #[test]
    fn sequences_of_different_length_are_rejected() {
        let mut engine = TestEngine::default();
        let x = [engine.new_binary(), engine.new_binary()];
        let y = [engine.new_binary()];

        let result = engine.engine.add_propagator(LexicographicPropagatorArgs {
            x: x.as_slice().into(),
            y: y.as_slice().into(),
        });

        assert!(result.is_err());
    }
}
