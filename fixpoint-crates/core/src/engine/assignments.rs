use enumset::EnumSet;

use super::Domain;
use super::DomainEvent;
use super::VariableId;
use super::VariableType;
use crate::basic_types::Trail;
use crate::basic_types::TrailUnderflow;
use crate::containers::KeyedVec;
use crate::fixpoint_assert_advanced;
use crate::fixpoint_assert_simple;
use crate::math::tolerance::is_greater;
use crate::math::tolerance::is_less;
use crate::math::tolerance::EPSILON;
use crate::propagation::PropagatorId;

/// The domains of all variables together with the trail of changes made to them.
///
/// Domains are only ever modified through [`Assignments::tighten`], which records the previous
/// state of the domain on the trail first, so every change can be undone.
#[derive(Clone, Debug, Default)]
pub(crate) struct Assignments {
    domains: KeyedVec<VariableId, Domain>,
    trail: Trail<DomainTrailEntry>,
}

/// A single recorded domain change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainTrailEntry {
    pub variable: VariableId,
    pub previous_lower: f64,
    pub previous_upper: f64,
    pub previous_fixed: bool,
    /// The propagator which made the change, or `None` for decisions.
    pub cause: Option<PropagatorId>,
}

/// A tightening would have emptied the domain of `variable`. The tightening is not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain {
    pub variable: VariableId,
}

impl Assignments {
    pub(crate) fn grow(&mut self, domain: Domain) -> VariableId {
        self.domains.push(domain)
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn contains(&self, variable: VariableId) -> bool {
        self.domains.contains_key(&variable)
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = VariableId> {
        self.domains.keys()
    }

    pub(crate) fn domain(&self, variable: VariableId) -> &Domain {
        &self.domains[variable]
    }

    pub(crate) fn get_lower_bound(&self, variable: VariableId) -> f64 {
        self.domains[variable].lower_bound()
    }

    pub(crate) fn get_upper_bound(&self, variable: VariableId) -> f64 {
        self.domains[variable].upper_bound()
    }

    pub(crate) fn is_fixed(&self, variable: VariableId) -> bool {
        self.domains[variable].is_fixed()
    }

    pub(crate) fn variable_type(&self, variable: VariableId) -> VariableType {
        self.domains[variable].variable_type()
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn trail_entries(&self) -> &[DomainTrailEntry] {
        &self.trail
    }

    /// Intersects the domain of `variable` with `[new_lower_bound, new_upper_bound]`.
    ///
    /// Bounds which are not stronger than the current ones by more than the tolerance are
    /// ignored. Returns the events caused by the change, which is empty if nothing changed. If the
    /// intersection is empty the domain is left untouched and [`EmptyDomain`] is returned.
    pub(crate) fn tighten(
        &mut self,
        variable: VariableId,
        new_lower_bound: f64,
        new_upper_bound: f64,
        cause: Option<PropagatorId>,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let domain = &self.domains[variable];
        let old_lower = domain.lower_bound();
        let old_upper = domain.upper_bound();
        let old_fixed = domain.is_fixed();
        let empty = EmptyDomain { variable };

        let mut lower = old_lower;
        if is_greater(new_lower_bound, old_lower) {
            lower = domain
                .round_lower_bound(new_lower_bound)
                .ok_or(empty)?
                .max(old_lower);
        }

        let mut upper = old_upper;
        if is_less(new_upper_bound, old_upper) {
            upper = domain
                .round_upper_bound(new_upper_bound)
                .ok_or(empty)?
                .min(old_upper);
        }

        if lower > upper {
            if lower - upper > EPSILON {
                return Err(empty);
            }

            // Overshoot within tolerance: collapse onto the bound that did not move.
            if lower != old_lower {
                lower = upper;
            } else {
                upper = lower;
            }
        }

        let mut events = EnumSet::new();
        if lower > old_lower {
            let _ = events.insert(DomainEvent::LowerBound);
        }
        if upper < old_upper {
            let _ = events.insert(DomainEvent::UpperBound);
        }
        if events.is_empty() {
            return Ok(events);
        }

        self.trail.push(DomainTrailEntry {
            variable,
            previous_lower: old_lower,
            previous_upper: old_upper,
            previous_fixed: old_fixed,
            cause,
        });

        let domain = &mut self.domains[variable];
        domain.set_bounds(lower, upper);
        if domain.is_fixed() && !old_fixed {
            let _ = events.insert(DomainEvent::Fixed);
        }

        fixpoint_assert_simple!(domain.lower_bound() <= domain.upper_bound());

        Ok(events)
    }

    /// Undoes every change recorded at or after trail position `position`, most recent first.
    /// Returns the number of undone changes.
    pub(crate) fn undo_to(&mut self, position: usize) -> Result<usize, TrailUnderflow> {
        let domains = &mut self.domains;
        let undone = self
            .trail
            .undo_to(position)?
            .map(|entry| {
                domains[entry.variable].restore(
                    entry.previous_lower,
                    entry.previous_upper,
                    entry.previous_fixed,
                );
            })
            .count();

        fixpoint_assert_advanced!(self
            .domains
            .iter()
            .all(|domain| domain.lower_bound() <= domain.upper_bound()));

        Ok(undone)
    }
}
