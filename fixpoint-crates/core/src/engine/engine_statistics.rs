use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of one [`PropagationEngine`](super::PropagationEngine).
    EngineStatistics {
        /// External decisions and tightenings applied.
        num_decisions: u64,
        num_propagator_calls: u64,
        /// Domain changes made by propagators.
        num_domain_reductions: u64,
        num_conflicts: u64,
        num_rollbacks: u64,
        /// Changes to continuous variables which did not notify their advisors.
        num_suppressed_notifications: u64,
        /// Fixpoint runs stopped by the propagator call budget.
        num_exhausted_budgets: u64,
});

create_statistics_struct!(
    /// Counters of all propagators of one constraint kind.
    KindStatistics {
        num_created: u64,
        num_calls: u64,
        num_domain_reductions: u64,
});
