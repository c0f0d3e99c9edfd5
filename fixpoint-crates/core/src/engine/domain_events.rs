use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// A kind of change to the domain of a variable.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// The lower bound increased.
    LowerBound,
    /// The upper bound decreased.
    UpperBound,
    /// The variable became fixed.
    Fixed,
}

/// The trigger condition of an advisor: the set of [`DomainEvent`]s after which the owning
/// propagator wants to be re-examined.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Lower bound tightenings.
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::LowerBound));
    /// Upper bound tightenings.
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::UpperBound));
    /// Both kinds of bound tightenings.
    pub const BOUNDS: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound));
    /// The variable becoming fixed.
    pub const FIXED: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Fixed));
    /// Any change to the domain.
    pub const ANY: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Fixed
    ));
    pub const NONE: DomainEvents = DomainEvents::new(EnumSet::empty());

    pub(crate) const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, event: DomainEvent) -> bool {
        self.events.contains(event)
    }

    pub fn union(self, other: DomainEvents) -> DomainEvents {
        DomainEvents::new(self.events | other.events)
    }
}

impl From<DomainEvent> for DomainEvents {
    fn from(event: DomainEvent) -> Self {
        DomainEvents::new(EnumSet::only(event))
    }
}
