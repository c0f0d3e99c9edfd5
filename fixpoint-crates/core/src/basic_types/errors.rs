use thiserror::Error;

#[cfg(doc)]
use crate::engine::PropagationEngine;
use crate::engine::VariableId;
use crate::factory::ConstraintKind;

/// Errors raised when a declarative constraint cannot be turned into a propagator. These are
/// fatal: they abort the construction of the [`PropagationEngine`] before any search starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidConstraintDescription {
    #[error("constraint '{name}' refers to unknown variable {variable}")]
    UnknownVariable { name: String, variable: VariableId },
    #[error("constraint '{name}' has {variables} variables but {coefficients} coefficients")]
    LengthMismatch {
        name: String,
        variables: usize,
        coefficients: usize,
    },
    #[error("constraint '{name}' has no variables")]
    EmptyScope { name: String },
    #[error("constraint '{name}' has non-finite coefficient {coefficient} at position {position}")]
    NonFiniteCoefficient {
        name: String,
        position: usize,
        coefficient: f64,
    },
    #[error("constraint '{name}' has crossing sides {lhs} > {rhs}")]
    CrossingSides { name: String, lhs: f64, rhs: f64 },
    #[error("constraint '{name}' cannot be handled as {kind}: {reason}")]
    Unsupported {
        name: String,
        kind: ConstraintKind,
        reason: &'static str,
    },
    #[error("no enabled constraint kind accepts constraint '{name}'")]
    Unclassified { name: String },
}

/// Errors raised when creating a variable with a malformed domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidDomain {
    #[error("lower bound {lower} exceeds upper bound {upper}")]
    CrossingBounds { lower: f64, upper: f64 },
    #[error("domain bounds must not be NaN")]
    NotANumber,
    #[error("admissible value {value} is not integral")]
    NonIntegralValue { value: f64 },
    #[error("the admissible value set is empty")]
    NoAdmissibleValues,
    #[error("the bounds [{lower}, {upper}] of a binary variable must lie within [0, 1]")]
    NonBinaryBounds { lower: f64, upper: f64 },
}

/// Rollback was requested to a position which is not part of the recorded history. This is
/// misuse by the caller: the mark was taken before a rollback that already discarded it, or it
/// lies before the root of the trail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot roll back to trail position {requested} (trail length {trail_len}, root {root})")]
pub struct TrailUnderflow {
    pub requested: usize,
    pub trail_len: usize,
    pub root: usize,
}

/// Any error that can occur while setting up an engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixpointError {
    #[error(transparent)]
    InvalidConstraintDescription(#[from] InvalidConstraintDescription),
    #[error(transparent)]
    InvalidDomain(#[from] InvalidDomain),
    #[error(transparent)]
    TrailUnderflow(#[from] TrailUnderflow),
    #[error("variable name '{name}' is used twice")]
    DuplicateVariableName { name: String },
}
