//! The domain store and the fixpoint engine.
mod assignments;
mod domain;
mod domain_events;
mod engine_options;
mod engine_statistics;
mod event_sink;
mod propagation_engine;
mod propagator_queue;
#[cfg(test)]
pub(crate) mod test_engine;
mod variables;
mod watch_list;

pub(crate) use assignments::Assignments;
pub use assignments::DomainTrailEntry;
pub use assignments::EmptyDomain;
pub use domain::Domain;
pub use domain_events::DomainEvent;
pub use domain_events::DomainEvents;
pub use engine_options::EngineOptions;
pub use engine_statistics::EngineStatistics;
pub use engine_statistics::KindStatistics;
pub(crate) use event_sink::EventSink;
pub use propagation_engine::Checkpoint;
pub use propagation_engine::Conflict;
pub use propagation_engine::DecisionBound;
pub use propagation_engine::EngineStatus;
pub use propagation_engine::PropagationEngine;
pub use propagation_engine::PropagatorOutcome;
pub(crate) use propagator_queue::PropagatorQueue;
pub use variables::VariableId;
pub use variables::VariableType;
pub use watch_list::Advisor;
pub(crate) use watch_list::WatchList;
