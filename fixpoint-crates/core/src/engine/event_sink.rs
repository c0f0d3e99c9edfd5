use enumset::EnumSet;

use super::DomainEvent;
use super::VariableId;
use crate::containers::KeyedVec;

/// Collects the domain events produced while a decision is applied or a propagator runs. Draining
/// the sink hands every (variable, events) pair to the watch list exactly once, regardless of how
/// often the variable changed in between.
#[derive(Default, Clone, Debug)]
pub(crate) struct EventSink {
    present: KeyedVec<VariableId, EnumSet<DomainEvent>>,
    changed: Vec<VariableId>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn events_occurred(&mut self, events: EnumSet<DomainEvent>, variable: VariableId) {
        if events.is_empty() {
            return;
        }

        let present = &mut self.present[variable];
        if present.is_empty() {
            self.changed.push(variable);
        }
        present.insert_all(events);
    }

    /// Variables are given in the order in which they first changed.
    pub(crate) fn drain(
        &mut self,
    ) -> impl Iterator<Item = (VariableId, EnumSet<DomainEvent>)> + '_ {
        self.changed.drain(..).map(|variable| {
            let events = std::mem::take(&mut self.present[variable]);
            (variable, events)
        })
    }

    pub(crate) fn clear(&mut self) {
        let _ = self.drain().count();
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;

    #[test]
    fn the_default_sink_is_empty() {
        let mut sink = EventSink::default();

        assert_eq!(sink.drain().count(), 0);
    }

    #[test]
    fn repeated_changes_to_one_variable_are_merged() {
        let mut sink = EventSink::default();
        sink.grow();
        sink.grow();

        sink.events_occurred(enum_set!(DomainEvent::UpperBound), VariableId::new(1));
        sink.events_occurred(enum_set!(DomainEvent::LowerBound), VariableId::new(0));
        sink.events_occurred(
            enum_set!(DomainEvent::LowerBound | DomainEvent::Fixed),
            VariableId::new(1),
        );

        let drained = sink.drain().collect::<Vec<_>>();
        assert_eq!(
            drained,
            vec![
                (VariableId::new(1), EnumSet::all()),
                (VariableId::new(0), enum_set!(DomainEvent::LowerBound)),
            ]
        );
        assert_eq!(sink.drain().count(), 0);
    }
}
