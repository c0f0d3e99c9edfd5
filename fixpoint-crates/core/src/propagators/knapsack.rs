use crate::basic_types::InvalidConstraintDescription;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::DomainEvents;
use crate::engine::VariableId;
use crate::factory::ConstraintKind;
use crate::math::tolerance::is_greater;
use crate::math::tolerance::is_less;
use crate::math::tolerance::normalise_bound;
use crate::math::CompensatedSum;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`KnapsackPropagator`].
///
/// Describes `demand <= sum w_i x_i <= capacity` with non-negative weights over variables with a
/// non-negative lower bound and a finite upper bound. Either side may be infinite.
#[derive(Clone, Debug)]
pub struct KnapsackPropagatorArgs {
    pub variables: Box<[VariableId]>,
    pub weights: Box<[f64]>,
    pub demand: f64,
    pub capacity: f64,
}

impl PropagatorConstructor for KnapsackPropagatorArgs {
    type PropagatorImpl = KnapsackPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, InvalidConstraintDescription> {
        let KnapsackPropagatorArgs {
            variables,
            weights,
            demand,
            capacity,
        } = self;

        context.require_non_empty(&variables)?;
        context.require_same_length(&variables, &weights)?;
        context.require_known_variables(&variables)?;
        context.require_finite_coefficients(&weights)?;
        context.require_ordered_sides(demand, capacity)?;

        if weights.iter().any(|&weight| weight < 0.0) {
            return Err(context.unsupported(
                ConstraintKind::Knapsack,
                "weights must be non-negative",
            ));
        }
        if variables.iter().any(|&variable| {
            context.lower_bound(variable) < 0.0 || !context.upper_bound(variable).is_finite()
        }) {
            return Err(context.unsupported(
                ConstraintKind::Knapsack,
                "variables must be non-negative and bounded",
            ));
        }

        let demand = normalise_bound(demand);
        let capacity = normalise_bound(capacity);

        let mut events = DomainEvents::NONE;
        if capacity.is_finite() {
            events = events.union(DomainEvents::LOWER_BOUND);
        }
        if demand.is_finite() {
            events = events.union(DomainEvents::UPPER_BOUND);
        }
        for (index, &variable) in variables.iter().enumerate() {
            context.register(variable, events, LocalId::from(index as u32));
        }

        Ok(KnapsackPropagator {
            variables,
            weights,
            demand,
            capacity,
        })
    }
}

/// Propagator for a knapsack row `demand <= sum w_i x_i <= capacity`.
///
/// Since every term is non-negative and bounded, the load ranges over
/// `[sum w_i lb_i, sum w_i ub_i]`; an item can take at most the slack left by the minimal load,
/// and must cover whatever the maximal load without it falls short of the demand.
#[derive(Clone, Debug)]
pub struct KnapsackPropagator {
    variables: Box<[VariableId]>,
    weights: Box<[f64]>,
    demand: f64,
    capacity: f64,
}

impl Propagator for KnapsackPropagator {
    fn name(&self) -> &str {
        "Knapsack"
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Knapsack
    }

    fn propagate(&self, mut context: PropagationContext) -> PropagationStatus {
        let mut min_load = CompensatedSum::default();
        let mut max_load = CompensatedSum::default();
        for (&variable, &weight) in self.variables.iter().zip(self.weights.iter()) {
            min_load.add(weight * context.lower_bound(variable));
            max_load.add(weight * context.upper_bound(variable));
        }
        let min_load = min_load.value();
        let max_load = max_load.value();

        if is_greater(min_load, self.capacity) || is_less(max_load, self.demand) {
            return Err(PropagatorConflict::default().into());
        }

        let slack = self.capacity - min_load;
        let surplus = max_load - self.demand;

        for (&variable, &weight) in self.variables.iter().zip(self.weights.iter()) {
            if weight == 0.0 {
                continue;
            }

            let lower = context.lower_bound(variable);
            let upper = context.upper_bound(variable);

            if weight * (upper - lower) > slack {
                let _ = context.tighten_upper_bound(variable, lower + slack / weight)?;
            }
            if weight * (upper - lower) > surplus {
                let _ = context.tighten_lower_bound(variable, upper - surplus / weight)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn packing_one_item_excludes_the_others() {
        let mut engine = TestEngine::default();
        let items = (0..3).map(|_| engine.new_binary()).collect::<Vec<_>>();
        let _ = engine
            .new_propagator(KnapsackPropagatorArgs {
                variables: items.clone().into(),
                weights: vec![3.0, 3.0, 3.0].into(),
                demand: f64::NEG_INFINITY,
                capacity: 5.0,
            })
            .expect("no empty domain");

        engine.fix(items[0], 1.0).expect("no conflict");

        engine.assert_bounds(items[0], 1.0, 1.0);
        engine.assert_bounds(items[1], 0.0, 0.0);
        engine.assert_bounds(items[2], 0.0, 0.0);
    }

    #[test]
    fn integer_items_are_bounded_by_the_capacity() {
        let mut engine = TestEngine::default();
        let x = engine.new_integer(0.0, 10.0);
        let y = engine.new_integer(1.0, 10.0);
        let _ = engine
            .new_propagator(KnapsackPropagatorArgs {
                variables: vec![x, y].into(),
                weights: vec![2.0, 3.0].into(),
                demand: f64::NEG_INFINITY,
                capacity: 12.0,
            })
            .expect("no empty domain");

        // 2x <= 12 - 3 and 3y <= 12
        engine.assert_bounds(x, 0.0, 4.0);
        engine.assert_bounds(y, 1.0, 4.0);
    }

    #[test]
    fn demand_forces_items_in() {
        let mut engine = TestEngine::default();
        let items = (0..3).map(|_| engine.new_binary()).collect::<Vec<_>>();
        let _ = engine
            .new_propagator(KnapsackPropagatorArgs {
                variables: items.clone().into(),
                weights: vec![4.0, 2.0, 1.0].into(),
                demand: 5.0,
                capacity: f64::INFINITY,
            })
            .expect("no empty domain");

        engine.assert_bounds(items[0], 1.0, 1.0);
        engine.assert_bounds(items[1], 0.0, 1.0);
        engine.assert_bounds(items[2], 0.0, 1.0);

        engine.fix(items[2], 0.0).expect("no conflict");
        engine.assert_bounds(items[1], 1.0, 1.0);
    }

    #[test]
    fn overloaded_knapsack_is_a_conflict() {
        let mut engine = TestEngine::default();
        let items = (0..2).map(|_| engine.new_binary()).collect::<Vec<_>>();
        let _ = engine
            .engine
            .add_propagator(KnapsackPropagatorArgs {
                variables: items.clone().into(),
                weights: vec![3.0, 3.0].into(),
                demand: f64::NEG_INFINITY,
                capacity: 5.0,
            })
            .expect("valid description");

        let _ = engine.engine.tighten(items[0], 1.0, 1.0).expect("can be 1");
        let _ = engine.engine.tighten(items[1], 1.0, 1.0).expect("can be 1");

        assert!(engine.propagate().is_err());
    }

    #[test]
    fn negative_weights_are_rejected() {
        let mut engine = TestEngine::default();
        let x = engine.new_binary();

        let result = engine.engine.add_propagator(KnapsackPropagatorArgs {
            variables: vec![x].into(),
            weights: vec![-1.0].into(),
            demand: f64::NEG_INFINITY,
            capacity: 1.0,
        });

        assert!(matches!(
            result,
            Err(InvalidConstraintDescription::Unsupported { .. })
        ));
    }
}
