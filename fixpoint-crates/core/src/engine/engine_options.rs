/// Options of the [`PropagationEngine`](super::PropagationEngine).
///
/// Both limits are off by default. With either of them set, the domains a run ends with may depend
/// on the order in which propagators were enqueued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Within one fixpoint run, a continuous variable re-triggers its advisors for at most this
    /// many bound changes that do not fix it. Later changes are applied but do not enqueue any
    /// propagator. `None` disables the cap.
    pub max_continuous_notifications: Option<u32>,
    /// The number of propagator calls one fixpoint run may make. A run which uses up the budget
    /// drops the remaining queue and ends in
    /// [`EngineStatus::BudgetExhausted`](super::EngineStatus::BudgetExhausted). `None` lets every
    /// run continue until the queue is empty.
    pub max_propagator_calls: Option<u64>,
}
