use crate::basic_types::InvalidConstraintDescription;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvents;
use crate::engine::VariableId;
use crate::factory::ConstraintKind;
use crate::math::tolerance::normalise_bound;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`VariableBoundPropagator`].
#[derive(Clone, Debug)]
pub struct VariableBoundPropagatorArgs {
    pub x: VariableId,
    pub y: VariableId,
    pub coefficient: f64,
    pub lhs: f64,
    pub rhs: f64,
}

impl PropagatorConstructor for VariableBoundPropagatorArgs {
    type PropagatorImpl = VariableBoundPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, InvalidConstraintDescription> {
        let VariableBoundPropagatorArgs {
            x,
            y,
            coefficient,
            lhs,
            rhs,
        } = self;

        context.require_known_variables(&[x, y])?;
        context.require_finite_coefficients(&[coefficient])?;
        context.require_ordered_sides(lhs, rhs)?;
        if x == y {
            return Err(context.unsupported(
                ConstraintKind::VariableBound,
                "the two variables must differ",
            ));
        }

        let lhs = normalise_bound(lhs);
        let rhs = normalise_bound(rhs);

        // The upper side is pushed by the lower bound of x and the smallest value of c * y.
        let mut x_events = DomainEvents::NONE;
        let mut y_events = DomainEvents::NONE;
        if rhs.is_finite() {
            x_events = x_events.union(DomainEvents::LOWER_BOUND);
            y_events = y_events.union(if coefficient > 0.0 {
                DomainEvents::LOWER_BOUND
            } else {
                DomainEvents::UPPER_BOUND
            });
        }
        if lhs.is_finite() {
            x_events = x_events.union(DomainEvents::UPPER_BOUND);
            y_events = y_events.union(if coefficient > 0.0 {
                DomainEvents::UPPER_BOUND
            } else {
                DomainEvents::LOWER_BOUND
            });
        }
        if coefficient == 0.0 {
            y_events = DomainEvents::NONE;
        }

        context.register(x, x_events, LocalId::from(0));
        context.register(y, y_events, LocalId::from(1));

        Ok(VariableBoundPropagator {
            x,
            y,
            coefficient,
            lhs,
            rhs,
        })
    }
}

/// Propagator for `lhs <= x + c * y <= rhs`, tightening both variables.
///
/// With `c = -1` and `rhs = 0` this copies bounds along `x <= y`: the upper bound of `y` becomes
/// an upper bound of `x` and the lower bound of `x` a lower bound of `y`.
#[derive(Clone, Debug)]
pub struct VariableBoundPropagator {
    x: VariableId,
    y: VariableId,
    coefficient: f64,
    lhs: f64,
    rhs: f64,
}

impl VariableBoundPropagator {
    /// The smallest and largest value of `c * y`.
    fn scaled_range(&self, context: &PropagationContext) -> (f64, f64) {
        if self.coefficient == 0.0 {
            return (0.0, 0.0);
        }

        let at_lower = self.coefficient * context.lower_bound(self.y);
        let at_upper = self.coefficient * context.upper_bound(self.y);
        if self.coefficient > 0.0 {
            (at_lower, at_upper)
        } else {
            (at_upper, at_lower)
        }
    }

    fn tighten_y(
        &self,
        context: &mut PropagationContext,
        scaled_lower: f64,
        scaled_upper: f64,
    ) -> PropagationStatus {
        let c = self.coefficient;
        if scaled_upper.is_finite() {
            let bound = scaled_upper / c;
            if c > 0.0 {
                let _ = context.tighten_upper_bound(self.y, bound)?;
            } else {
                let _ = context.tighten_lower_bound(self.y, bound)?;
            }
        }
        if scaled_lower.is_finite() {
            let bound = scaled_lower / c;
            if c > 0.0 {
                let _ = context.tighten_lower_bound(self.y, bound)?;
            } else {
                let _ = context.tighten_upper_bound(self.y, bound)?;
            }
        }
        Ok(())
    }
}

impl Propagator for VariableBoundPropagator {
    fn name(&self) -> &str {
        "VariableBound"
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::VariableBound
    }

    fn propagate(&self, mut context: PropagationContext) -> PropagationStatus {
        let (min_scaled, max_scaled) = self.scaled_range(&context);

        if self.rhs.is_finite() && min_scaled.is_finite() {
            let _ = context.tighten_upper_bound(self.x, self.rhs - min_scaled)?;
        }
        if self.lhs.is_finite() && max_scaled.is_finite() {
            let _ = context.tighten_lower_bound(self.x, self.lhs - max_scaled)?;
        }

        if self.coefficient == 0.0 {
            return Ok(());
        }

        // c * y <= rhs - x.lb and c * y >= lhs - x.ub
        let scaled_upper = self.rhs - context.lower_bound(self.x);
        let scaled_lower = self.lhs - context.upper_bound(self.x);
        self.tighten_y(&mut context, scaled_lower, scaled_upper)
    }
}
