use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use super::TrailUnderflow;

/// An append-only stack of undo records.
///
/// Positions on the trail are used as checkpoints: undoing to a position pops every entry above it
/// in reverse chronological order.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    trail: Vec<T>,
}

// Implemented by hand to avoid imposing `Default` on `T`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }

    /// Removes every entry at or above `position`, most recent first.
    ///
    /// The entries must be consumed for the undo to be complete; the trail is truncated once the
    /// returned iterator is dropped.
    pub(crate) fn undo_to(&mut self, position: usize) -> Result<Rev<Drain<'_, T>>, TrailUnderflow> {
        if position > self.trail.len() {
            return Err(TrailUnderflow {
                requested: position,
                trail_len: self.trail.len(),
                root: 0,
            });
        }

        Ok(self.trail.drain(position..).rev())
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}
