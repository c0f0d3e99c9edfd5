use super::VariableType;
use crate::basic_types::InvalidDomain;
use crate::math::tolerance::ceil_eps;
use crate::math::tolerance::floor_eps;
use crate::math::tolerance::is_integral;
use crate::math::tolerance::normalise_bound;
use crate::math::tolerance::EPSILON;

/// The values a single variable may still take.
///
/// Bounds are stored as `f64` for every variable type; integral variables keep integral bounds.
/// A discrete variable with holes carries a sorted set of admissible values which never changes;
/// its bounds always coincide with admissible values. The invariant `lower <= upper` holds at all
/// times, an empty domain is never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Domain {
    lower: f64,
    upper: f64,
    fixed: bool,
    variable_type: VariableType,
    admissible_values: Option<Box<[f64]>>,
}

impl Domain {
    pub fn binary() -> Domain {
        Domain::with_bounds(0.0, 1.0, VariableType::Binary, None)
    }

    /// A contiguous integer range; fractional bounds are rounded inwards.
    pub fn integer(lower: f64, upper: f64) -> Result<Domain, InvalidDomain> {
        check_bounds(lower, upper)?;

        let lower = ceil_eps(normalise_bound(lower));
        let upper = floor_eps(normalise_bound(upper));
        if lower > upper {
            return Err(InvalidDomain::CrossingBounds { lower, upper });
        }

        Ok(Domain::with_bounds(lower, upper, VariableType::Integer, None))
    }

    pub fn continuous(lower: f64, upper: f64) -> Result<Domain, InvalidDomain> {
        check_bounds(lower, upper)?;

        Ok(Domain::with_bounds(
            normalise_bound(lower),
            normalise_bound(upper),
            VariableType::Continuous,
            None,
        ))
    }

    /// A discrete domain consisting of exactly the given integral values.
    pub fn sparse(values: impl IntoIterator<Item = f64>) -> Result<Domain, InvalidDomain> {
        let mut values = values.into_iter().collect::<Vec<_>>();
        if values.iter().any(|value| value.is_nan()) {
            return Err(InvalidDomain::NotANumber);
        }
        if let Some(&value) = values.iter().find(|value| !is_integral(**value)) {
            return Err(InvalidDomain::NonIntegralValue { value });
        }

        values.iter_mut().for_each(|value| *value = value.round());
        values.sort_by(f64::total_cmp);
        values.dedup();

        let (Some(&lower), Some(&upper)) = (values.first(), values.last()) else {
            return Err(InvalidDomain::NoAdmissibleValues);
        };

        Ok(Domain::with_bounds(
            lower,
            upper,
            VariableType::Integer,
            Some(values.into_boxed_slice()),
        ))
    }

    /// Creates a domain of the given type, with the same rules as the dedicated constructors.
    pub fn of_type(
        variable_type: VariableType,
        lower: f64,
        upper: f64,
    ) -> Result<Domain, InvalidDomain> {
        match variable_type {
            VariableType::Binary => {
                check_bounds(lower, upper)?;
                let (lower, upper) = (ceil_eps(lower), floor_eps(upper));
                if lower < 0.0 || upper > 1.0 || lower > upper {
                    return Err(InvalidDomain::NonBinaryBounds { lower, upper });
                }
                Ok(Domain::with_bounds(lower, upper, VariableType::Binary, None))
            }
            VariableType::Integer => Domain::integer(lower, upper),
            VariableType::Continuous => Domain::continuous(lower, upper),
        }
    }

    fn with_bounds(
        lower: f64,
        upper: f64,
        variable_type: VariableType,
        admissible_values: Option<Box<[f64]>>,
    ) -> Domain {
        Domain {
            lower,
            upper,
            fixed: upper - lower <= EPSILON,
            variable_type,
            admissible_values,
        }
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn variable_type(&self) -> VariableType {
        self.variable_type
    }

    /// Whether the range `[lower, upper]` has holes.
    pub fn is_contiguous(&self) -> bool {
        self.admissible_values.is_none()
    }

    pub fn admissible_values(&self) -> Option<&[f64]> {
        self.admissible_values.as_deref()
    }

    pub fn contains(&self, value: f64) -> bool {
        if value < self.lower - EPSILON || value > self.upper + EPSILON {
            return false;
        }

        match &self.admissible_values {
            Some(values) => values.iter().any(|admissible| (admissible - value).abs() <= EPSILON),
            None => !self.variable_type.is_integral() || is_integral(value),
        }
    }

    /// The smallest value of the domain type which is at least `candidate`, or `None` if there is
    /// no admissible value at or above it.
    pub(crate) fn round_lower_bound(&self, candidate: f64) -> Option<f64> {
        if !self.variable_type.is_integral() {
            return Some(candidate);
        }

        let candidate = ceil_eps(candidate);
        match &self.admissible_values {
            Some(values) => {
                let position = values.partition_point(|value| *value < candidate);
                values.get(position).copied()
            }
            None => Some(candidate),
        }
    }

    /// The largest value of the domain type which is at most `candidate`, or `None` if there is no
    /// admissible value at or below it.
    pub(crate) fn round_upper_bound(&self, candidate: f64) -> Option<f64> {
        if !self.variable_type.is_integral() {
            return Some(candidate);
        }

        let candidate = floor_eps(candidate);
        match &self.admissible_values {
            Some(values) => {
                let position = values.partition_point(|value| *value <= candidate);
                position.checked_sub(1).map(|position| values[position])
            }
            None => Some(candidate),
        }
    }

    pub(crate) fn set_bounds(&mut self, lower: f64, upper: f64) {
        self.lower = lower;
        self.upper = upper;
        self.fixed = upper - lower <= EPSILON;
    }

    pub(crate) fn restore(&mut self, lower: f64, upper: f64, fixed: bool) {
        self.lower = lower;
        self.upper = upper;
        self.fixed = fixed;
    }
}

fn check_bounds(lower: f64, upper: f64) -> Result<(), InvalidDomain> {
    if lower.is_nan() || upper.is_nan() {
        return Err(InvalidDomain::NotANumber);
    }
    if lower > upper {
        return Err(InvalidDomain::CrossingBounds { lower, upper });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bounds_are_rounded_inwards() {
        let domain = Domain::integer(0.5, 3.7).expect("non-empty range");

        assert_eq!(domain.lower_bound(), 1.0);
        assert_eq!(domain.upper_bound(), 3.0);
        assert!(!domain.is_fixed());
    }

    #[test]
    fn integer_range_without_integers_is_rejected() {
        assert!(matches!(
            Domain::integer(0.2, 0.8),
            Err(InvalidDomain::CrossingBounds { .. })
        ));
    }

    #[test]
    fn huge_continuous_bounds_are_infinite() {
        let domain = Domain::continuous(-1e30, 1e20).expect("valid bounds");

        assert_eq!(domain.lower_bound(), f64::NEG_INFINITY);
        assert_eq!(domain.upper_bound(), f64::INFINITY);
    }

    #[test]
    fn sparse_domain_rounds_to_admissible_values() {
        let domain = Domain::sparse([7.0, 1.0, 4.0, 4.0]).expect("non-empty set");

        assert_eq!(domain.admissible_values(), Some(&[1.0, 4.0, 7.0][..]));
        assert_eq!(domain.round_lower_bound(2.0), Some(4.0));
        assert_eq!(domain.round_upper_bound(6.5), Some(4.0));
        assert_eq!(domain.round_lower_bound(7.5), None);
        assert_eq!(domain.round_upper_bound(0.5), None);
        assert!(domain.contains(4.0));
        assert!(!domain.contains(5.0));
    }

    #[test]
    fn empty_sparse_domain_is_rejected() {
        assert_eq!(
            Domain::sparse(std::iter::empty()),
            Err(InvalidDomain::NoAdmissibleValues)
        );
    }

    #[test]
    fn binary_domain_must_stay_within_zero_and_one() {
        assert!(Domain::of_type(VariableType::Binary, 0.0, 2.0).is_err());

        let fixed = Domain::of_type(VariableType::Binary, 1.0, 1.0).expect("valid binary");
        assert!(fixed.is_fixed());
    }
}
