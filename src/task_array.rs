//! Fixed-size atomic task buffer shared by the idempotent variants and
//! [`crate::deque::ws_nc_mult`].
//!
//! A `TaskArray`'s length never changes over its own lifetime; growth is
//! handled one level up by constructing a new, larger `TaskArray` and
//! swapping it in under an [`arc_swap::ArcSwap`] (see `deque::grow_buffer`).
//! That swap is what gives concurrent thieves the "observe the old array or
//! the new one, never a half-copied one" guarantee.

use std::sync::atomic::{AtomicI32, Ordering};

/// Cell has never held a real task, or has been logically vacated.
pub const BOTTOM: i32 = -2;
/// Reserved; unused on any operation path.
pub const TOP: i32 = -3;
/// Out-of-band "no task available" result.
pub const EMPTY: i32 = -1;
/// Returned by [`TaskArray::get`] for a position beyond the array's length.
pub const BAD_INDEX: i32 = -4;
/// Returned by [`TaskArray::with_capacity`] callers that pass a zero size
/// where a positive one is required; kept as a named sentinel for parity
/// with the source's `error_code` enum even though the constructors here
/// tolerate a zero-length array directly.
pub const BAD_SIZE: i32 = -5;

pub type Task = i32;

/// Fixed-capacity buffer of atomic task slots with deep-copy and
/// steal-the-buffer move semantics.
pub struct TaskArray {
    slots: Box<[AtomicI32]>,
}

impl TaskArray {
    /// Builds an array of `capacity` cells, each initialized to `BOTTOM`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::filled(capacity, BOTTOM)
    }

    /// Builds an array of `capacity` cells, each initialized to `fill`.
    pub fn filled(capacity: usize, fill: Task) -> Self {
        let slots = (0..capacity).map(|_| AtomicI32::new(fill)).collect();
        TaskArray { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Acquire-load of the cell at `position`, or [`BAD_INDEX`] if out of
    /// range.
    pub fn get(&self, position: usize) -> Task {
        match self.slots.get(position) {
            Some(cell) => cell.load(Ordering::Acquire),
            None => BAD_INDEX,
        }
    }

    /// Relaxed load, for callers that have already synchronized via a
    /// separate index publish (the common case inside a deque's hot path).
    pub fn get_relaxed(&self, position: usize) -> Task {
        match self.slots.get(position) {
            Some(cell) => cell.load(Ordering::Relaxed),
            None => BAD_INDEX,
        }
    }

    pub fn set(&self, position: usize, value: Task) {
        if let Some(cell) = self.slots.get(position) {
            cell.store(value, Ordering::Release);
        }
    }

    pub fn set_relaxed(&self, position: usize, value: Task) {
        if let Some(cell) = self.slots.get(position) {
            cell.store(value, Ordering::Relaxed);
        }
    }

    /// Deep copy: every cell is acquire-loaded from `self` and stored into a
    /// freshly allocated array of the same length.
    pub fn deep_copy(&self) -> TaskArray {
        let slots = self
            .slots
            .iter()
            .map(|cell| AtomicI32::new(cell.load(Ordering::Acquire)))
            .collect();
        TaskArray { slots }
    }

    /// Builds a new array of `new_capacity` cells: the first `self.len()`
    /// cells are acquire-loaded copies of `self`, the rest are `BOTTOM`.
    /// Used by every variant's grow path.
    pub fn grown(&self, new_capacity: usize) -> TaskArray {
        debug_assert!(new_capacity >= self.len());
        let mut slots = Vec::with_capacity(new_capacity);
        for cell in self.slots.iter() {
            slots.push(AtomicI32::new(cell.load(Ordering::Acquire)));
        }
        for _ in self.len()..new_capacity {
            slots.push(AtomicI32::new(BOTTOM));
        }
        TaskArray {
            slots: slots.into_boxed_slice(),
        }
    }

    /// Swaps in an empty array, handing back the previous contents. Rust's
    /// ownership model already gives move semantics for free on a plain
    /// assignment; this exists for callers that only hold `&mut self`
    /// through a shared-reference boundary (e.g. behind a lock) and need
    /// the C++-style "steal buffer pointer, zero the donor" step spelled
    /// out explicitly.
    pub fn replace_with_empty(&mut self) -> TaskArray {
        std::mem::replace(self, TaskArray::with_capacity(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_array_is_filled_with_bottom() {
        let a = TaskArray::with_capacity(4);
        for i in 0..4 {
            assert_eq!(a.get(i), BOTTOM);
        }
    }

    #[test]
    fn get_out_of_range_is_bad_index() {
        let a = TaskArray::with_capacity(2);
        assert_eq!(a.get(2), BAD_INDEX);
        assert_eq!(a.get(100), BAD_INDEX);
    }

    #[test]
    fn set_then_get_round_trips() {
        let a = TaskArray::with_capacity(4);
        a.set(1, 42);
        assert_eq!(a.get(1), 42);
        assert_eq!(a.get(0), BOTTOM);
    }

    #[test]
    fn deep_copy_is_independent() {
        let a = TaskArray::with_capacity(2);
        a.set(0, 7);
        let b = a.deep_copy();
        a.set(0, 9);
        assert_eq!(b.get(0), 7);
        assert_eq!(a.get(0), 9);
    }

    #[test]
    fn grown_preserves_prefix_and_pads_with_bottom() {
        let a = TaskArray::with_capacity(2);
        a.set(0, 1);
        a.set(1, 2);
        let grown = a.grown(4);
        assert_eq!(grown.len(), 4);
        assert_eq!(grown.get(0), 1);
        assert_eq!(grown.get(1), 2);
        assert_eq!(grown.get(2), BOTTOM);
        assert_eq!(grown.get(3), BOTTOM);
    }

    #[test]
    fn replace_with_empty_zeroes_the_donor() {
        let mut a = TaskArray::with_capacity(3);
        a.set(0, 5);
        let donor = a.replace_with_empty();
        assert_eq!(donor.len(), 3);
        assert_eq!(donor.get(0), 5);
        assert_eq!(a.len(), 0);
    }
}
