use enumset::EnumSet;

use super::DomainEvent;
use super::DomainEvents;
use super::VariableId;
use crate::containers::KeyedVec;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorVarId;

/// A registration of a propagator for changes to one variable.
///
/// Advisors perform no filtering themselves: when a change matches their trigger, the owning
/// propagator is enqueued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Advisor {
    pub variable: VariableId,
    pub propagator: PropagatorId,
    /// The position of the variable within the propagator.
    pub local_id: LocalId,
    pub trigger: DomainEvents,
}

impl Advisor {
    pub fn matches(&self, events: EnumSet<DomainEvent>) -> bool {
        !(self.trigger.events() & events).is_empty()
    }

    pub(crate) fn propagator_var(&self) -> PropagatorVarId {
        PropagatorVarId {
            propagator: self.propagator,
            variable: self.local_id,
        }
    }
}

/// The notification table: for every variable, the advisors registered on it in registration
/// order.
#[derive(Default, Clone, Debug)]
pub(crate) struct WatchList {
    advisors: KeyedVec<VariableId, Vec<Advisor>>,
}

impl WatchList {
    pub(crate) fn grow(&mut self) {
        let _ = self.advisors.push(Vec::new());
    }

    /// Installs `advisor`. Registering the same local variable of a propagator twice widens the
    /// existing trigger.
    pub(crate) fn watch(&mut self, advisor: Advisor) {
        if advisor.trigger.is_empty() {
            return;
        }

        let advisors = &mut self.advisors[advisor.variable];
        if let Some(existing) = advisors
            .iter_mut()
            .find(|existing| existing.propagator_var() == advisor.propagator_var())
        {
            existing.trigger = existing.trigger.union(advisor.trigger);
            return;
        }

        advisors.push(advisor);
    }

    pub(crate) fn advisors_of(&self, variable: VariableId) -> &[Advisor] {
        &self.advisors[variable]
    }

    /// The advisors on `variable` whose trigger matches `events`.
    pub(crate) fn matching(
        &self,
        variable: VariableId,
        events: EnumSet<DomainEvent>,
    ) -> impl Iterator<Item = &Advisor> + '_ {
        self.advisors[variable]
            .iter()
            .filter(move |advisor| advisor.matches(events))
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;

    fn advisor(propagator: u32, local: u32, trigger: DomainEvents) -> Advisor {
        Advisor {
            variable: VariableId::new(0),
            propagator: PropagatorId(propagator),
            local_id: LocalId::from(local),
            trigger,
        }
    }

    #[test]
    fn only_advisors_with_matching_trigger_fire() {
        let mut watch_list = WatchList::default();
        watch_list.grow();
        let variable = VariableId::new(0);

        watch_list.watch(advisor(0, 0, DomainEvents::LOWER_BOUND));
        watch_list.watch(advisor(1, 3, DomainEvents::UPPER_BOUND));
        watch_list.watch(advisor(2, 1, DomainEvents::FIXED));

        let fired = watch_list
            .matching(variable, enum_set!(DomainEvent::UpperBound))
            .map(|advisor| advisor.propagator)
            .collect::<Vec<_>>();

        assert_eq!(fired, vec![PropagatorId(1)]);
    }

    #[test]
    fn repeated_registration_widens_the_trigger() {
        let mut watch_list = WatchList::default();
        watch_list.grow();
        let variable = VariableId::new(0);

        watch_list.watch(advisor(0, 0, DomainEvents::LOWER_BOUND));
        watch_list.watch(advisor(0, 0, DomainEvents::UPPER_BOUND));

        let advisors = watch_list.advisors_of(variable);
        assert_eq!(advisors.len(), 1);
        assert_eq!(advisors[0].trigger, DomainEvents::BOUNDS);
    }
}
