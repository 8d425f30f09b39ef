//! Idempotent Deque: both ends are addressable, but the owner only ever
//! takes from the tail. The anchor packs `(head, size, tag)` into one
//! 64-bit word (24/24/16 bits), per the packed-atomic-word design note —
//! the source keeps two implementations of this type, one that heap
//! allocates a fresh triplet on every operation with commented-out
//! hazard-pointer reclamation, and one (`idempotentDeque2`) that already
//! uses the packed-word layout; only the packed-word design is implemented
//! here.

use std::sync::atomic::{fence, AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::deque::{ring_index, AlgorithmType, Deque};
use crate::task_array::{Task, TaskArray, EMPTY};

const HEAD_BITS: u32 = 24;
const SIZE_BITS: u32 = 24;
const TAG_BITS: u32 = 16;
const SIZE_MASK: u64 = (1 << SIZE_BITS) - 1;
const TAG_MASK: u64 = (1 << TAG_BITS) - 1;
const HEAD_MASK: u64 = (1 << HEAD_BITS) - 1;

#[inline]
fn pack(head: u32, size: u32, tag: u32) -> u64 {
    ((head as u64 & HEAD_MASK) << (SIZE_BITS + TAG_BITS))
        | ((size as u64 & SIZE_MASK) << TAG_BITS)
        | (tag as u64 & TAG_MASK)
}

#[inline]
fn unpack(anchor: u64) -> (u32, u32, u32) {
    let head = (anchor >> (SIZE_BITS + TAG_BITS)) & HEAD_MASK;
    let size = (anchor >> TAG_BITS) & SIZE_MASK;
    let tag = anchor & TAG_MASK;
    (head as u32, size as u32, tag as u32)
}

pub struct IdempotentDeque {
    anchor: AtomicU64,
    tasks: ArcSwap<TaskArray>,
}

impl IdempotentDeque {
    pub fn new(initial_capacity: usize) -> Self {
        IdempotentDeque {
            anchor: AtomicU64::new(pack(0, 0, 0)),
            tasks: ArcSwap::from_pointee(TaskArray::with_capacity(initial_capacity.max(1))),
        }
    }

    /// `TaskArray::grown` copies slot-for-slot, which is wrong here: the
    /// live tasks occupy the wrapped range `[head, head+size)` of the ring,
    /// not a prefix starting at 0. A slot-for-slot copy leaves the new,
    /// larger array's logical `[head, head+size)` window pointing at
    /// whatever (likely `BOTTOM`) landed in those same raw slots, corrupting
    /// the deque as soon as `head > 0`. Instead remap each live task by its
    /// logical offset from `head`, matching `idempotentDeque::expand`.
    fn grow(&self) {
        let (head, size, _tag) = unpack(self.anchor.load(Ordering::Relaxed));
        let old = self.tasks.load();
        let new_capacity = old.len() * 2;
        let new_tasks = TaskArray::with_capacity(new_capacity);
        for i in 0..size as i64 {
            let old_idx = ring_index(head as i64 + i, old.len());
            let new_idx = ring_index(head as i64 + i, new_capacity);
            new_tasks.set_relaxed(new_idx, old.get_relaxed(old_idx));
        }
        self.tasks.store(Arc::new(new_tasks));
    }
}

impl Deque for IdempotentDeque {
    fn is_empty(&self) -> bool {
        let (_, size, _) = unpack(self.anchor.load(Ordering::Acquire));
        size == 0
    }

    fn put(&self, task: Task) -> bool {
        loop {
            let (head, size, tag) = unpack(self.anchor.load(Ordering::Relaxed));
            let tasks = self.tasks.load();
            if size as usize >= tasks.len() {
                drop(tasks);
                self.grow();
                continue;
            }
            let idx = ring_index((head + size) as i64, tasks.len());
            tasks.set_relaxed(idx, task);
            fence(Ordering::Release);
            self.anchor
                .store(pack(head, size + 1, tag.wrapping_add(1)), Ordering::Release);
            return true;
        }
    }

    fn take(&self) -> Task {
        let (head, size, tag) = unpack(self.anchor.load(Ordering::Relaxed));
        if size == 0 {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let idx = ring_index((head + size - 1) as i64, tasks.len());
        let task = tasks.get_relaxed(idx);
        self.anchor.store(pack(head, size - 1, tag), Ordering::Relaxed);
        task
    }

    fn steal(&self) -> Task {
        let (head, size, tag) = unpack(self.anchor.load(Ordering::Acquire));
        if size == 0 {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let idx = ring_index(head as i64, tasks.len());
        let task = tasks.get(idx);
        let new_head = ring_index((head + 1) as i64, tasks.len()) as u32;
        match self.anchor.compare_exchange(
            pack(head, size, tag),
            pack(new_head, size - 1, tag),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => task,
            Err(_) => EMPTY,
        }
    }

    fn capacity(&self) -> usize {
        self.tasks.load().len()
    }

    fn algorithm(&self) -> AlgorithmType {
        AlgorithmType::IdempotentDeque
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn take_returns_lifo_order() {
        let d = IdempotentDeque::new(16);
        for i in 0..10 {
            d.put(i);
        }
        let got: Vec<Task> = (0..10).map(|_| d.take()).collect();
        assert_eq!(got, (0..10).rev().collect::<Vec<_>>());
        assert_eq!(d.take(), EMPTY);
    }

    #[test]
    fn steal_returns_fifo_order_from_the_head() {
        let d = IdempotentDeque::new(16);
        for i in 0..10 {
            d.put(i);
        }
        let got: Vec<Task> = (0..10).map(|_| d.steal()).collect();
        assert_eq!(got, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn capacity_doubles_as_needed() {
        let d = IdempotentDeque::new(10);
        for i in 0..30 {
            d.put(i);
        }
        assert_eq!(d.capacity(), 40);
    }

    #[test]
    fn grow_preserves_tasks_when_head_has_wrapped() {
        let d = IdempotentDeque::new(4);
        for i in 0..4 {
            d.put(i);
        }
        // Advance head past 0 before the buffer ever grows, so the live
        // window wraps around the end of the ring.
        assert_eq!(d.steal(), 0);
        assert_eq!(d.steal(), 1);
        d.put(4);
        d.put(5);
        // head == 2, size == 4: growth must now occur with head > 0.
        d.put(6);
        assert!(d.capacity() > 4);
        let got: Vec<Task> = (0..5).map(|_| d.take()).collect();
        assert_eq!(got, vec![6, 5, 4, 3, 2]);
    }

    #[test]
    fn pack_unpack_round_trips() {
        let (h, s, t) = (12345, 6789, 42);
        let packed = pack(h, s, t);
        assert_eq!(unpack(packed), (h, s, t));
    }

    #[test]
    fn concurrent_steal_returns_a_superset_with_no_element_missing() {
        let d = Arc::new(IdempotentDeque::new(4));
        const N: i32 = 2000;
        for i in 0..N {
            d.put(i);
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let d = Arc::clone(&d);
                thread::spawn(move || {
                    let mut local = Vec::new();
                    while !d.is_empty() {
                        let t = d.steal();
                        if t != EMPTY {
                            local.push(t);
                        }
                    }
                    local
                })
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for h in handles {
            for t in h.join().unwrap() {
                seen.insert(t);
            }
        }
        for i in 0..N {
            assert!(seen.contains(&i));
        }
    }
}
