use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// A variable as seen from inside one propagator.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) struct PropagatorVarId {
    pub(crate) propagator: PropagatorId,
    pub(crate) variable: LocalId,
}
