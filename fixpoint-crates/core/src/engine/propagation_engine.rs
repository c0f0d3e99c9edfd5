use enum_map::EnumMap;
use log::debug;
use log::trace;
use log::warn;

use super::Advisor;
use super::Assignments;
use super::Domain;
use super::DomainEvent;
use super::DomainTrailEntry;
use super::EmptyDomain;
use super::EngineOptions;
use super::EngineStatistics;
use super::EventSink;
use super::KindStatistics;
use super::PropagatorQueue;
use super::VariableId;
use super::VariableType;
use super::WatchList;
use crate::basic_types::Inconsistency;
use crate::basic_types::InvalidConstraintDescription;
use crate::basic_types::TrailUnderflow;
use crate::containers::KeyedVec;
use crate::factory::ConstraintKind;
use crate::fixpoint_assert_eq_simple;
use crate::fixpoint_assert_simple;
use crate::math::tolerance::is_equal;
use crate::propagation::Domains;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorStore;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// Where the engine is in its fixpoint computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    /// Waiting for the caller.
    Idle,
    /// Draining the dirty queue.
    Propagating,
    /// The last propagation ended with an empty queue.
    Fixpoint,
    /// The last propagation was stopped by a conflict; the caller is expected to roll back.
    Conflict,
    /// The last propagation used up its call budget and dropped the remaining queue. The domains
    /// are sound but not necessarily at a fixpoint.
    BudgetExhausted,
}

/// An infeasibility detected while applying a decision or propagating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conflict {
    /// A tightening would have emptied the domain of `variable`. `propagator` is `None` if the
    /// tightening was an external decision.
    EmptyDomain {
        variable: VariableId,
        propagator: Option<PropagatorId>,
    },
    /// A propagator found its constraint violated by the current domains.
    Propagator {
        propagator: PropagatorId,
        variable: Option<VariableId>,
    },
}

impl Conflict {
    /// The propagator that reported the conflict, if it was not caused by a decision.
    pub fn propagator(&self) -> Option<PropagatorId> {
        match self {
            Conflict::EmptyDomain { propagator, .. } => *propagator,
            Conflict::Propagator { propagator, .. } => Some(*propagator),
        }
    }

    /// The variable involved in the conflict, if known.
    pub fn variable(&self) -> Option<VariableId> {
        match self {
            Conflict::EmptyDomain { variable, .. } => Some(*variable),
            Conflict::Propagator { variable, .. } => *variable,
        }
    }
}

/// A position on the trail, obtained from [`PropagationEngine::checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checkpoint {
    trail_position: usize,
}

impl Checkpoint {
    pub fn trail_position(self) -> usize {
        self.trail_position
    }
}

/// The bound an external decision imposes on a variable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecisionBound {
    LowerBound(f64),
    UpperBound(f64),
    /// Fix the variable. Binary variables are fixed to 0 if the value is within the tolerance of
    /// 0 and to 1 otherwise; integer variables are fixed to the nearest integer. A value outside
    /// the current domain is a conflict.
    Fix(f64),
}

/// What a single propagator call achieved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagatorOutcome {
    Tightened { num_changes: usize },
    Fixpoint,
}

/// The domain propagation engine.
///
/// Owns the domains of all variables, the propagators with their advisor registrations, the
/// trail of domain changes and the dirty-propagator queue. External decisions tighten domains,
/// matching advisors enqueue their propagators, and the queue is drained in FIFO order until it is
/// empty (fixpoint) or a propagator reports a conflict. Every change is recorded on the trail so
/// that [`PropagationEngine::rollback_to`] can undo it exactly.
///
/// The engine is single-threaded; independent evaluations should each use their own (cloned)
/// engine.
#[derive(Clone, Debug)]
pub struct PropagationEngine {
    assignments: Assignments,
    propagators: PropagatorStore,
    constraint_names: KeyedVec<PropagatorId, String>,
    watch_list: WatchList,
    event_sink: EventSink,
    queue: PropagatorQueue,
    status: EngineStatus,
    root: Checkpoint,
    last_conflict: Option<Conflict>,
    last_fixed: Vec<VariableId>,
    /// Non-fixing changes to each continuous variable in the current fixpoint run.
    continuous_notifications: KeyedVec<VariableId, u32>,
    counted_variables: Vec<VariableId>,
    options: EngineOptions,
    statistics: EngineStatistics,
    kind_statistics: EnumMap<ConstraintKind, KindStatistics>,
}

impl Default for PropagationEngine {
    fn default() -> Self {
        PropagationEngine::new(EngineOptions::default())
    }
}

impl PropagationEngine {
    pub fn new(options: EngineOptions) -> PropagationEngine {
        PropagationEngine {
            assignments: Assignments::default(),
            propagators: PropagatorStore::default(),
            constraint_names: KeyedVec::default(),
            watch_list: WatchList::default(),
            event_sink: EventSink::default(),
            queue: PropagatorQueue::default(),
            status: EngineStatus::Idle,
            root: Checkpoint { trail_position: 0 },
            last_conflict: None,
            last_fixed: Vec::new(),
            continuous_notifications: KeyedVec::default(),
            counted_variables: Vec::new(),
            options,
            statistics: EngineStatistics::default(),
            kind_statistics: EnumMap::default(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Adds a variable with the given domain.
    pub fn new_variable(&mut self, domain: Domain) -> VariableId {
        let variable = self.assignments.grow(domain);
        self.event_sink.grow();
        self.watch_list.grow();
        let _ = self.continuous_notifications.push(0);

        variable
    }

    /// Adds a propagator, named after its id.
    pub fn add_propagator<Constructor: PropagatorConstructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, InvalidConstraintDescription>
    where
        Constructor::PropagatorImpl: 'static,
    {
        let name = format!("c{}", self.propagators.num_propagators());
        self.add_named_propagator(name, constructor)
    }

    /// Creates the propagator from `constructor`, installs its advisors and enqueues it, so that
    /// the next propagation runs it at least once.
    ///
    /// If the constructor rejects the constraint, the engine is left unchanged.
    pub fn add_named_propagator<Constructor: PropagatorConstructor>(
        &mut self,
        name: impl Into<String>,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, InvalidConstraintDescription>
    where
        Constructor::PropagatorImpl: 'static,
    {
        let name = name.into();
        let mut registrations = Vec::new();

        let slot = self.propagators.new_propagator();
        let propagator_id = slot.key();
        let context = PropagatorConstructorContext::new(
            &self.assignments,
            &mut registrations,
            propagator_id,
            &name,
        );
        let propagator = constructor.create(context)?;
        let kind = propagator.kind();
        let _ = slot.populate(Box::new(propagator));

        for advisor in registrations {
            self.watch_list.watch(advisor);
        }

        trace!("added {kind} propagator '{name}' as {propagator_id}");
        let _ = self.constraint_names.push(name);
        self.kind_statistics[kind].num_created += 1;
        let _ = self.queue.enqueue_propagator(propagator_id);

        Ok(PropagatorHandle::new(propagator_id))
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }

    pub fn propagator_ids(&self) -> impl Iterator<Item = PropagatorId> + '_ {
        self.propagators.ids()
    }

    pub fn propagator(&self, propagator_id: PropagatorId) -> &dyn Propagator {
        &self.propagators[propagator_id]
    }

    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    pub fn constraint_name(&self, propagator_id: PropagatorId) -> &str {
        &self.constraint_names[propagator_id]
    }

    /// The advisors registered on `variable`.
    pub fn advisors(&self, variable: VariableId) -> &[Advisor] {
        self.watch_list.advisors_of(variable)
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// A read-only view of the current domains.
    pub fn current_domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments)
    }

    /// The recorded domain changes, oldest first.
    pub fn trail(&self) -> &[DomainTrailEntry] {
        self.assignments.trail_entries()
    }

    /// The conflict which ended the last propagation, until the next rollback.
    pub fn last_conflict(&self) -> Option<Conflict> {
        self.last_conflict
    }

    /// The integral variables which propagation fixed during the last decision or propagation
    /// call, in the order in which they became fixed.
    pub fn last_fixed(&self) -> &[VariableId] {
        &self.last_fixed
    }

    pub fn statistics(&self) -> &EngineStatistics {
        &self.statistics
    }

    pub fn kind_statistics(&self, kind: ConstraintKind) -> &KindStatistics {
        &self.kind_statistics[kind]
    }

    /// The current trail position. Rolling back to it undoes every change made afterwards.
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.leave_terminal_state();
        Checkpoint {
            trail_position: self.assignments.num_trail_entries(),
        }
    }

    /// The checkpoint [`PropagationEngine::reset`] returns to.
    pub fn root(&self) -> Checkpoint {
        self.root
    }

    /// Makes the current state the one [`PropagationEngine::reset`] returns to. Changes recorded
    /// so far can no longer be rolled back.
    pub fn commit_root(&mut self) {
        fixpoint_assert_simple!(
            self.queue.is_empty(),
            "the root is committed after propagation"
        );
        self.root = Checkpoint {
            trail_position: self.assignments.num_trail_entries(),
        };
    }

    /// Undoes every domain change made since `checkpoint` was taken, most recent first, and
    /// returns to [`EngineStatus::Idle`].
    pub fn rollback_to(&mut self, checkpoint: Checkpoint) -> Result<(), TrailUnderflow> {
        let trail_len = self.assignments.num_trail_entries();
        if checkpoint < self.root || checkpoint.trail_position > trail_len {
            return Err(TrailUnderflow {
                requested: checkpoint.trail_position,
                trail_len,
                root: self.root.trail_position,
            });
        }

        let undone = self
            .assignments
            .undo_to(checkpoint.trail_position)
            .map_err(|underflow| TrailUnderflow {
                root: self.root.trail_position,
                ..underflow
            })?;
        fixpoint_assert_eq_simple!(
            self.assignments.num_trail_entries(),
            checkpoint.trail_position
        );
        debug!(
            "rolled back {undone} domain changes to trail position {}",
            checkpoint.trail_position
        );

        self.queue.clear();
        self.event_sink.clear();
        self.last_conflict = None;
        self.last_fixed.clear();
        self.status = EngineStatus::Idle;
        self.statistics.num_rollbacks += 1;

        Ok(())
    }

    /// Returns to the root state, from any state.
    pub fn reset(&mut self) {
        let result = self.rollback_to(self.root);
        fixpoint_assert_simple!(result.is_ok(), "the root is always on the trail");
        self.reset_continuous_notifications();
    }

    /// Intersects the domain of `variable` with `[new_lower, new_upper]` without propagating.
    ///
    /// Returns the advisors whose trigger matched the change; their propagators are enqueued and
    /// run by the next [`PropagationEngine::propagate`]. An empty intersection is reported as a
    /// [`Conflict`] and leaves the domain untouched.
    pub fn tighten(
        &mut self,
        variable: VariableId,
        new_lower: f64,
        new_upper: f64,
    ) -> Result<Vec<Advisor>, Conflict> {
        self.leave_terminal_state();
        self.statistics.num_decisions += 1;

        let events = match self
            .assignments
            .tighten(variable, new_lower, new_upper, None)
        {
            Ok(events) => events,
            Err(EmptyDomain { variable }) => {
                return Err(self.enter_conflict(Conflict::EmptyDomain {
                    variable,
                    propagator: None,
                }));
            }
        };

        let advisors = self
            .watch_list
            .matching(variable, events)
            .copied()
            .collect::<Vec<_>>();
        for advisor in &advisors {
            let _ = self.queue.enqueue_propagator(advisor.propagator);
        }

        Ok(advisors)
    }

    /// Applies an external decision and propagates to a fixpoint.
    pub fn apply_decision(
        &mut self,
        variable: VariableId,
        bound: DecisionBound,
    ) -> Result<(), Conflict> {
        self.last_fixed.clear();

        let (lower, upper) = match bound {
            DecisionBound::LowerBound(value) => (value, f64::INFINITY),
            DecisionBound::UpperBound(value) => (f64::NEG_INFINITY, value),
            DecisionBound::Fix(value) => {
                let value = self.fixing_value(variable, value);
                (value, value)
            }
        };
        trace!("decision {variable} in [{lower}, {upper}]");

        let _ = self.tighten(variable, lower, upper)?;
        self.propagate_to_fixpoint()
    }

    /// Drains the dirty queue until it is empty, a conflict is found, or the call budget of
    /// [`EngineOptions::max_propagator_calls`] is used up.
    pub fn propagate(&mut self) -> Result<(), Conflict> {
        self.last_fixed.clear();
        self.leave_terminal_state();
        self.propagate_to_fixpoint()
    }

    /// Runs a single propagator regardless of the queue, and enqueues the propagators affected by
    /// its changes.
    pub fn propagate_one(
        &mut self,
        propagator_id: PropagatorId,
    ) -> Result<PropagatorOutcome, Conflict> {
        let trail_position = self.assignments.num_trail_entries();
        let kind = self.propagators[propagator_id].kind();
        self.statistics.num_propagator_calls += 1;
        self.kind_statistics[kind].num_calls += 1;

        let context =
            PropagationContext::new(&mut self.assignments, &mut self.event_sink, propagator_id);
        let status = self.propagators[propagator_id].propagate(context);

        let num_changes = self.assignments.num_trail_entries() - trail_position;
        self.statistics.num_domain_reductions += num_changes as u64;
        self.kind_statistics[kind].num_domain_reductions += num_changes as u64;

        if let Err(inconsistency) = status {
            let conflict = match inconsistency {
                Inconsistency::EmptyDomain(EmptyDomain { variable }) => Conflict::EmptyDomain {
                    variable,
                    propagator: Some(propagator_id),
                },
                Inconsistency::Conflict(conflict) => Conflict::Propagator {
                    propagator: propagator_id,
                    variable: conflict.variable,
                },
            };
            return Err(self.enter_conflict(conflict));
        }

        self.notify_advisors();

        if num_changes == 0 {
            Ok(PropagatorOutcome::Fixpoint)
        } else {
            Ok(PropagatorOutcome::Tightened { num_changes })
        }
    }

    /// Logs the engine statistics and the statistics of every constraint kind in use.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        self.statistics.log(StatisticLogger::new("engine"));
        for (kind, statistics) in self.kind_statistics.iter() {
            if statistics.num_created > 0 {
                statistics.log(StatisticLogger::new(kind.name()));
            }
        }
    }

    fn propagate_to_fixpoint(&mut self) -> Result<(), Conflict> {
        self.status = EngineStatus::Propagating;
        self.reset_continuous_notifications();

        let mut num_calls = 0;
        while let Some(propagator_id) = self.queue.pop() {
            if self
                .options
                .max_propagator_calls
                .is_some_and(|budget| num_calls >= budget)
            {
                self.exhaust_budget(num_calls);
                return Ok(());
            }

            num_calls += 1;
            let _ = self.propagate_one(propagator_id)?;
        }

        self.status = EngineStatus::Fixpoint;
        Ok(())
    }

    fn exhaust_budget(&mut self, num_calls: u64) {
        debug!(
            "stopped propagation after {num_calls} propagator calls with {} propagators queued",
            self.queue.len() + 1
        );
        self.queue.clear();
        self.event_sink.clear();
        self.status = EngineStatus::BudgetExhausted;
        self.statistics.num_exhausted_budgets += 1;
    }

    /// Hands the events collected during the last propagator call to the advisors.
    fn notify_advisors(&mut self) {
        let PropagationEngine {
            assignments,
            watch_list,
            event_sink,
            queue,
            last_fixed,
            continuous_notifications,
            counted_variables,
            options,
            statistics,
            ..
        } = self;

        for (variable, events) in event_sink.drain() {
            let variable_type = assignments.variable_type(variable);
            let fixed = events.contains(DomainEvent::Fixed);

            if fixed && variable_type.is_integral() {
                last_fixed.push(variable);
            }

            if !fixed && variable_type == VariableType::Continuous {
                if let Some(cap) = options.max_continuous_notifications {
                    let count = &mut continuous_notifications[variable];
                    if *count >= cap {
                        statistics.num_suppressed_notifications += 1;
                        continue;
                    }
                    if *count == 0 {
                        counted_variables.push(variable);
                    }
                    *count += 1;
                }
            }

            for advisor in watch_list.matching(variable, events) {
                let _ = queue.enqueue_propagator(advisor.propagator);
            }
        }
    }

    fn reset_continuous_notifications(&mut self) {
        for variable in self.counted_variables.drain(..) {
            self.continuous_notifications[variable] = 0;
        }
    }

    fn enter_conflict(&mut self, conflict: Conflict) -> Conflict {
        debug!("conflict: {conflict:?}");
        self.queue.clear();
        self.event_sink.clear();
        self.status = EngineStatus::Conflict;
        self.last_conflict = Some(conflict);
        self.statistics.num_conflicts += 1;
        conflict
    }

    fn leave_terminal_state(&mut self) {
        if matches!(
            self.status,
            EngineStatus::Fixpoint | EngineStatus::Conflict | EngineStatus::BudgetExhausted
        ) {
            self.status = EngineStatus::Idle;
        }
    }

    /// The value a fixing decision actually imposes on `variable`.
    fn fixing_value(&self, variable: VariableId, value: f64) -> f64 {
        match self.assignments.variable_type(variable) {
            VariableType::Binary if is_equal(value, 0.0) => 0.0,
            VariableType::Binary => {
                if !is_equal(value, 1.0) {
                    warn!("binary {variable} is fixed to 1 for decision value {value}");
                }
                1.0
            }
            VariableType::Integer => value.round(),
            VariableType::Continuous => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DomainEvents;
    use crate::propagation::ReadDomains;
    use crate::propagators::LinearPropagatorArgs;
    use crate::propagators::LogicPropagatorArgs;
    use crate::propagators::LogicRelation;

    fn chain_of_implications(engine: &mut PropagationEngine, length: usize) -> Vec<VariableId> {
        let variables = (0..length)
            .map(|_| engine.new_variable(Domain::binary()))
            .collect::<Vec<_>>();
        for pair in variables.windows(2) {
            let _ = engine
                .add_propagator(LogicPropagatorArgs {
                    antecedent: pair[0],
                    consequent: pair[1],
                    relation: LogicRelation::Implication,
                })
                .expect("valid description");
        }
        engine.propagate().expect("feasible");
        variables
    }

    fn bounds(engine: &PropagationEngine) -> Vec<(f64, f64)> {
        engine.current_domains().bounds()
    }

    #[test]
    fn decisions_propagate_through_chains() {
        let mut engine = PropagationEngine::default();
        let variables = chain_of_implications(&mut engine, 4);

        engine
            .apply_decision(variables[0], DecisionBound::Fix(1.0))
            .expect("no conflict");

        assert_eq!(engine.status(), EngineStatus::Fixpoint);
        assert!(variables
            .iter()
            .all(|&variable| engine.current_domains().fixed_value(variable) == Some(1.0)));
        assert_eq!(engine.last_fixed(), &variables[1..]);
    }

    #[test]
    fn rollback_restores_the_checkpoint() {
        let mut engine = PropagationEngine::default();
        let variables = chain_of_implications(&mut engine, 3);
        let before = bounds(&engine);

        let checkpoint = engine.checkpoint();
        engine
            .apply_decision(variables[0], DecisionBound::LowerBound(1.0))
            .expect("no conflict");
        assert_ne!(bounds(&engine), before);

        engine.rollback_to(checkpoint).expect("valid checkpoint");

        assert_eq!(bounds(&engine), before);
        assert_eq!(engine.trail().len(), checkpoint.trail_position());
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert!(engine.last_fixed().is_empty());
    }

    #[test]
    fn rollback_past_the_trail_is_an_underflow() {
        let mut engine = PropagationEngine::default();
        let variables = chain_of_implications(&mut engine, 2);
        let _ = engine
            .apply_decision(variables[0], DecisionBound::Fix(1.0))
            .expect("no conflict");
        let late = engine.checkpoint();
        engine.reset();

        assert_eq!(
            engine.rollback_to(late),
            Err(TrailUnderflow {
                requested: 2,
                trail_len: 0,
                root: 0
            })
        );
    }

    #[test]
    fn rollback_below_the_root_is_an_underflow() {
        let mut engine = PropagationEngine::default();
        let variables = chain_of_implications(&mut engine, 2);
        let start = engine.checkpoint();
        let _ = engine
            .apply_decision(variables[0], DecisionBound::Fix(1.0))
            .expect("no conflict");
        engine.commit_root();

        assert!(engine.rollback_to(start).is_err());

        engine.reset();
        assert_eq!(engine.current_domains().fixed_value(variables[1]), Some(1.0));
    }

    #[test]
    fn tighten_returns_the_matching_advisors_without_propagating() {
        let mut engine = PropagationEngine::default();
        let variables = chain_of_implications(&mut engine, 2);

        let advisors = engine
            .tighten(variables[0], 1.0, 1.0)
            .expect("no empty domain");

        assert_eq!(advisors.len(), 1);
        assert_eq!(advisors[0].trigger, DomainEvents::LOWER_BOUND);
        assert!(!engine.current_domains().is_fixed(variables[1]));

        engine.propagate().expect("no conflict");
        assert!(engine.current_domains().is_fixed(variables[1]));
    }

    #[test]
    fn conflicts_name_the_culprit_and_discard_the_queue() {
        let mut engine = PropagationEngine::default();
        let variables = chain_of_implications(&mut engine, 3);
        let _ = engine
            .tighten(variables[2], 0.0, 0.0)
            .expect("no empty domain");
        let _ = engine
            .tighten(variables[0], 1.0, 1.0)
            .expect("no empty domain");

        let conflict = engine.propagate().expect_err("the chain is violated");

        assert_eq!(engine.status(), EngineStatus::Conflict);
        assert_eq!(engine.last_conflict(), Some(conflict));
        assert!(conflict.propagator().is_some());
        assert!(conflict.variable().is_some());
        assert_eq!(engine.statistics().num_conflicts, 1);
    }

    #[test]
    fn fixing_values_are_mapped_onto_the_variable_type() {
        let mut engine = PropagationEngine::default();
        let x = engine.new_variable(Domain::integer(0.0, 4.0).expect("valid"));
        let b = engine.new_variable(Domain::binary());

        engine
            .apply_decision(x, DecisionBound::Fix(2.7))
            .expect("3 lies in the domain");
        engine
            .apply_decision(b, DecisionBound::Fix(0.3))
            .expect("non-zero binary value is 1");

        assert_eq!(engine.current_domains().fixed_value(x), Some(3.0));
        assert_eq!(engine.current_domains().fixed_value(b), Some(1.0));
    }

    #[test]
    fn fixing_outside_the_domain_is_a_conflict() {
        let mut engine = PropagationEngine::default();
        let x = engine.new_variable(Domain::integer(0.0, 4.0).expect("valid"));

        let result = engine.apply_decision(x, DecisionBound::Fix(6.7));

        assert_eq!(
            result,
            Err(Conflict::EmptyDomain {
                variable: x,
                propagator: None
            })
        );
        assert_eq!(engine.status(), EngineStatus::Conflict);
        assert_eq!(engine.current_domains().upper_bound(x), 4.0);
    }

    #[test]
    fn fixing_against_a_propagated_value_is_a_conflict() {
        let mut engine = PropagationEngine::default();
        let x = engine.new_variable(Domain::binary());
        let y = engine.new_variable(Domain::binary());
        let _ = engine
            .add_propagator(LinearPropagatorArgs {
                variables: vec![x, y].into(),
                coefficients: vec![1.0, 1.0].into(),
                lhs: f64::NEG_INFINITY,
                rhs: 1.0,
            })
            .expect("valid description");

        engine
            .apply_decision(x, DecisionBound::Fix(1.0))
            .expect("y can be 0");
        let result = engine.apply_decision(y, DecisionBound::Fix(1.0));

        assert!(result.is_err());
        assert_eq!(engine.last_conflict(), result.err());
    }

    #[test]
    fn propagate_one_reports_fixpoint_after_propagation() {
        let mut engine = PropagationEngine::default();
        let x = engine.new_variable(Domain::integer(0.0, 10.0).expect("valid"));
        let y = engine.new_variable(Domain::integer(0.0, 10.0).expect("valid"));
        let handle = engine
            .add_propagator(LinearPropagatorArgs {
                variables: vec![x, y].into(),
                coefficients: vec![1.0, 1.0].into(),
                lhs: f64::NEG_INFINITY,
                rhs: 6.0,
            })
            .expect("valid description");

        let _ = engine.tighten(x, 2.0, 10.0).expect("no empty domain");
        assert_eq!(
            engine.propagate_one(handle.untyped()),
            Ok(PropagatorOutcome::Tightened { num_changes: 2 })
        );
        assert_eq!(
            engine.propagate_one(handle.untyped()),
            Ok(PropagatorOutcome::Fixpoint)
        );
    }

    #[test]
    fn continuous_notifications_are_capped() {
        let mut engine = PropagationEngine::new(EngineOptions {
            max_continuous_notifications: Some(3),
            ..EngineOptions::default()
        });
        let x = engine.new_variable(Domain::continuous(0.0, 100.0).expect("valid"));
        let y = engine.new_variable(Domain::continuous(0.0, 100.0).expect("valid"));

        // x <= 0.5 y and y <= 0.5 x + 1 shrink towards 0 without ever meeting.
        let _ = engine
            .add_propagator(LinearPropagatorArgs {
                variables: vec![x, y].into(),
                coefficients: vec![1.0, -0.5].into(),
                lhs: f64::NEG_INFINITY,
                rhs: 0.0,
            })
            .expect("valid description");
        let _ = engine
            .add_propagator(LinearPropagatorArgs {
                variables: vec![y, x].into(),
                coefficients: vec![1.0, -0.5].into(),
                lhs: f64::NEG_INFINITY,
                rhs: 1.0,
            })
            .expect("valid description");

        engine.propagate().expect("feasible");

        assert!(engine.statistics().num_suppressed_notifications > 0);
        assert!(engine.statistics().num_propagator_calls < 20);
    }

    #[test]
    fn continuous_fixpoints_do_not_depend_on_the_constraint_order() {
        let build = |reversed: bool| {
            let mut engine = PropagationEngine::default();
            let x = engine.new_variable(Domain::continuous(0.0, 100.0).expect("valid"));
            let y = engine.new_variable(Domain::continuous(0.0, 100.0).expect("valid"));
            let mut rows = vec![
                LinearPropagatorArgs {
                    variables: vec![x, y].into(),
                    coefficients: vec![1.0, -0.5].into(),
                    lhs: f64::NEG_INFINITY,
                    rhs: 0.0,
                },
                LinearPropagatorArgs {
                    variables: vec![y, x].into(),
                    coefficients: vec![1.0, -0.5].into(),
                    lhs: f64::NEG_INFINITY,
                    rhs: 1.0,
                },
            ];
            if reversed {
                rows.reverse();
            }
            for row in rows {
                let _ = engine.add_propagator(row).expect("valid description");
            }
            engine.propagate().expect("feasible");
            bounds(&engine)
        };

        let forward = build(false);
        let backward = build(true);

        assert_eq!(forward.len(), backward.len());
        for (&(forward_lower, forward_upper), &(backward_lower, backward_upper)) in
            forward.iter().zip(&backward)
        {
            assert!((forward_lower - backward_lower).abs() <= 1e-5);
            assert!((forward_upper - backward_upper).abs() <= 1e-5);
        }
        // The limits are x <= 2/3 and y <= 4/3.
        assert!((forward[0].1 - 2.0 / 3.0).abs() <= 1e-5);
        assert!((forward[1].1 - 4.0 / 3.0).abs() <= 1e-5);
    }

    fn mutually_increasing_pair(engine: &mut PropagationEngine) -> (VariableId, VariableId) {
        let x = engine.new_variable(Domain::integer(0.0, 1e6).expect("valid"));
        let y = engine.new_variable(Domain::integer(0.0, 1e6).expect("valid"));

        // x <= y - 1 and y <= x - 1 push both bounds by one per call until one domain is empty.
        for (first, second) in [(x, y), (y, x)] {
            let _ = engine
                .add_propagator(LinearPropagatorArgs {
                    variables: vec![first, second].into(),
                    coefficients: vec![1.0, -1.0].into(),
                    lhs: f64::NEG_INFINITY,
                    rhs: -1.0,
                })
                .expect("valid description");
        }
        (x, y)
    }

    #[test]
    fn call_budget_ends_long_runs() {
        let options = EngineOptions {
            max_propagator_calls: Some(100),
            ..EngineOptions::default()
        };
        let mut engine = PropagationEngine::new(options);
        let _ = mutually_increasing_pair(&mut engine);

        assert_eq!(engine.propagate(), Ok(()));

        assert_eq!(engine.status(), EngineStatus::BudgetExhausted);
        assert_eq!(engine.statistics().num_propagator_calls, 100);
        assert_eq!(engine.statistics().num_exhausted_budgets, 1);
        assert!(engine.last_conflict().is_none());
    }

    #[test]
    fn exhausted_budgets_end_in_the_same_state() {
        let options = EngineOptions {
            max_propagator_calls: Some(57),
            ..EngineOptions::default()
        };
        let mut first = PropagationEngine::new(options);
        let mut second = PropagationEngine::new(options);
        let _ = mutually_increasing_pair(&mut first);
        let _ = mutually_increasing_pair(&mut second);

        first.propagate().expect("within budget no conflict is found");
        second.propagate().expect("within budget no conflict is found");

        assert_eq!(bounds(&first), bounds(&second));
        assert!(bounds(&first).iter().all(|&(lower, _)| lower > 0.0));
    }

    #[test]
    fn engine_continues_after_an_exhausted_budget() {
        let options = EngineOptions {
            max_propagator_calls: Some(10),
            ..EngineOptions::default()
        };
        let mut engine = PropagationEngine::new(options);
        let (x, _) = mutually_increasing_pair(&mut engine);
        let checkpoint = engine.checkpoint();
        engine.propagate().expect("within budget no conflict is found");

        engine.rollback_to(checkpoint).expect("on the trail");
        assert_eq!(engine.status(), EngineStatus::Idle);

        // The queue was dropped, so only the decision's advisors run again.
        engine
            .apply_decision(x, DecisionBound::UpperBound(5e5))
            .expect("within budget no conflict is found");
        assert_eq!(engine.status(), EngineStatus::BudgetExhausted);
        assert_eq!(engine.statistics().num_exhausted_budgets, 2);
    }

    #[test]
    fn default_options_have_no_limits() {
        let mut engine = PropagationEngine::default();
        let x = engine.new_variable(Domain::integer(0.0, 300.0).expect("valid"));
        let y = engine.new_variable(Domain::integer(0.0, 300.0).expect("valid"));
        for (first, second) in [(x, y), (y, x)] {
            let _ = engine
                .add_propagator(LinearPropagatorArgs {
                    variables: vec![first, second].into(),
                    coefficients: vec![1.0, -1.0].into(),
                    lhs: f64::NEG_INFINITY,
                    rhs: -1.0,
                })
                .expect("valid description");
        }

        assert!(engine.propagate().is_err());
        assert_eq!(engine.status(), EngineStatus::Conflict);
        assert!(engine.statistics().num_propagator_calls > 100);
        assert_eq!(engine.statistics().num_exhausted_budgets, 0);
    }

    #[test]
    fn failing_constructors_leave_no_advisors_behind() {
        let mut engine = PropagationEngine::default();
        let x = engine.new_variable(Domain::binary());

        let result = engine.add_propagator(LogicPropagatorArgs {
            antecedent: x,
            consequent: x,
            relation: LogicRelation::Implication,
        });

        assert!(result.is_err());
        assert!(engine.advisors(x).is_empty());
        assert_eq!(engine.num_propagators(), 0);
    }
}
