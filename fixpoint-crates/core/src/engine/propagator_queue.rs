use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::fixpoint_assert_moderate;
use crate::propagation::PropagatorId;

/// The dirty-propagator queue.
///
/// Propagators are processed in the order in which they became dirty. A propagator that is
/// enqueued again before it was popped keeps its original position.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropagatorQueue {
    queue: VecDeque<PropagatorId>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the propagator was newly enqueued.
    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId) -> bool {
        if self.is_propagator_enqueued(propagator_id) {
            return false;
        }

        self.is_enqueued.accomodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.queue.push_back(propagator_id);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let propagator_id = self.queue.pop_front()?;
        fixpoint_assert_moderate!(self.is_enqueued[propagator_id]);
        self.is_enqueued[propagator_id] = false;

        Some(propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        for propagator_id in self.queue.drain(..) {
            self.is_enqueued[propagator_id] = false;
        }
    }

    fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued.contains_key(&propagator_id) && self.is_enqueued[propagator_id]
    }
}
