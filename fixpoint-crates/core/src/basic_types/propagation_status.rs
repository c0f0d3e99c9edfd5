use crate::engine::EmptyDomain;
use crate::engine::VariableId;

/// The result of invoking a propagator. Whether the call tightened anything is observed by the
/// engine through the changes recorded on the trail; the propagator only reports whether it found
/// the current domains inconsistent.
pub type PropagationStatus = Result<(), Inconsistency>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// A tightening emptied the domain of a variable.
    EmptyDomain(EmptyDomain),
    /// The propagator detected infeasibility without emptying a domain itself.
    Conflict(PropagatorConflict),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(empty_domain: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain(empty_domain)
    }
}

impl From<PropagatorConflict> for Inconsistency {
    fn from(conflict: PropagatorConflict) -> Self {
        Inconsistency::Conflict(conflict)
    }
}

/// Infeasibility detected by the logic of a propagator, e.g. a row whose minimal activity already
/// exceeds its right-hand side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PropagatorConflict {
    /// The variable most directly involved, if the propagator can single one out.
    pub variable: Option<VariableId>,
}

impl PropagatorConflict {
    pub fn on_variable(variable: VariableId) -> Self {
        PropagatorConflict {
            variable: Some(variable),
        }
    }
}
