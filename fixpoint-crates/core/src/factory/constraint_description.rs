use crate::engine::VariableId;
use crate::factory::ConstraintKind;

/// A declarative constraint `lhs <= sum coefficients[i] * variables[i] <= rhs`.
///
/// Either side may be infinite. A lexicographic ordering `x <=_lex y` is described by
/// `variables = x ++ y` without coefficients, see [`ConstraintDescription::lexicographic`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintDescription {
    pub name: String,
    /// The kind to build. `None` lets the factory classify the row.
    pub kind: Option<ConstraintKind>,
    pub variables: Vec<VariableId>,
    pub coefficients: Vec<f64>,
    pub lhs: f64,
    pub rhs: f64,
}

impl ConstraintDescription {
    /// A linear row which the factory classifies.
    pub fn row(
        name: impl Into<String>,
        variables: impl Into<Vec<VariableId>>,
        coefficients: impl Into<Vec<f64>>,
        lhs: f64,
        rhs: f64,
    ) -> Self {
        ConstraintDescription {
            name: name.into(),
            kind: None,
            variables: variables.into(),
            coefficients: coefficients.into(),
            lhs,
            rhs,
        }
    }

    /// `sum coefficients[i] * variables[i] <= rhs`
    pub fn less_than_or_equals(
        name: impl Into<String>,
        variables: impl Into<Vec<VariableId>>,
        coefficients: impl Into<Vec<f64>>,
        rhs: f64,
    ) -> Self {
        Self::row(name, variables, coefficients, f64::NEG_INFINITY, rhs)
    }

    /// `sum coefficients[i] * variables[i] >= lhs`
    pub fn greater_than_or_equals(
        name: impl Into<String>,
        variables: impl Into<Vec<VariableId>>,
        coefficients: impl Into<Vec<f64>>,
        lhs: f64,
    ) -> Self {
        Self::row(name, variables, coefficients, lhs, f64::INFINITY)
    }

    /// `sum coefficients[i] * variables[i] = value`
    pub fn equals(
        name: impl Into<String>,
        variables: impl Into<Vec<VariableId>>,
        coefficients: impl Into<Vec<f64>>,
        value: f64,
    ) -> Self {
        Self::row(name, variables, coefficients, value, value)
    }

    /// `x <=_lex y`
    pub fn lexicographic(name: impl Into<String>, x: &[VariableId], y: &[VariableId]) -> Self {
        ConstraintDescription {
            name: name.into(),
            kind: Some(ConstraintKind::Lexicographic),
            variables: x.iter().chain(y).copied().collect(),
            coefficients: Vec::new(),
            lhs: f64::NEG_INFINITY,
            rhs: f64::INFINITY,
        }
    }

    /// Requests that the row is built as `kind` instead of being classified.
    pub fn with_kind(mut self, kind: ConstraintKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The terms with a non-zero coefficient.
    pub fn non_zero_terms(&self) -> impl Iterator<Item = (VariableId, f64)> + '_ {
        self.variables
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
            .filter(|(_, coefficient)| *coefficient != 0.0)
    }

    /// `max |a| / min |a|` over the non-zero coefficients, or `None` if there are none.
    pub fn dynamism(&self) -> Option<f64> {
        let (smallest, largest) = self.non_zero_terms().fold(
            (f64::INFINITY, 0.0_f64),
            |(smallest, largest), (_, coefficient)| {
                (smallest.min(coefficient.abs()), largest.max(coefficient.abs()))
            },
        );
        (largest > 0.0).then(|| largest / smallest)
    }
}
