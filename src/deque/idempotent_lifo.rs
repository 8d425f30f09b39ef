//! Idempotent LIFO: a single packed `(top, tag)` atomic word stands in for
//! the anchor so thieves observe a consistent snapshot with one load,
//! instead of the source's `atomic_ref<pair>` over two adjacent ints.
//! `tag` increments on every successful `put` and defeats ABA on the
//! anchor's CAS.

use std::sync::atomic::{fence, AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::deque::{AlgorithmType, Deque};
use crate::task_array::{Task, TaskArray, EMPTY};

#[inline]
fn pack(top: u32, tag: u32) -> u64 {
    ((top as u64) << 32) | tag as u64
}

#[inline]
fn unpack(anchor: u64) -> (u32, u32) {
    ((anchor >> 32) as u32, anchor as u32)
}

pub struct IdempotentLifo {
    anchor: AtomicU64,
    tasks: ArcSwap<TaskArray>,
}

impl IdempotentLifo {
    pub fn new(initial_capacity: usize) -> Self {
        IdempotentLifo {
            anchor: AtomicU64::new(pack(0, 0)),
            tasks: ArcSwap::from_pointee(TaskArray::with_capacity(initial_capacity.max(1))),
        }
    }

    fn grow(&self) {
        let old = self.tasks.load();
        let grown = old.grown(old.len() * 2);
        self.tasks.store(Arc::new(grown));
    }
}

impl Deque for IdempotentLifo {
    fn is_empty(&self) -> bool {
        let (top, _) = unpack(self.anchor.load(Ordering::Acquire));
        top == 0
    }

    fn put(&self, task: Task) -> bool {
        loop {
            let (top, tag) = unpack(self.anchor.load(Ordering::Relaxed));
            let tasks = self.tasks.load();
            if top as usize >= tasks.len() {
                drop(tasks);
                self.grow();
                continue;
            }
            tasks.set_relaxed(top as usize, task);
            fence(Ordering::Release);
            self.anchor
                .store(pack(top + 1, tag.wrapping_add(1)), Ordering::Release);
            return true;
        }
    }

    fn take(&self) -> Task {
        let (top, tag) = unpack(self.anchor.load(Ordering::Relaxed));
        if top == 0 {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let task = tasks.get_relaxed((top - 1) as usize);
        self.anchor.store(pack(top - 1, tag), Ordering::Relaxed);
        task
    }

    fn steal(&self) -> Task {
        let (top, tag) = unpack(self.anchor.load(Ordering::Acquire));
        if top == 0 {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let task = tasks.get_relaxed((top - 1) as usize);
        fence(Ordering::Acquire);
        match self.anchor.compare_exchange(
            pack(top, tag),
            pack(top - 1, tag),
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
        AlgorithmType::IdempotentLifo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn take_returns_lifo_order() {
        let d = IdempotentLifo::new(16);
        for i in 0..10 {
            d.put(i);
        }
        let got: Vec<Task> = (0..10).map(|_| d.take()).collect();
        assert_eq!(got, (0..10).rev().collect::<Vec<_>>());
        assert_eq!(d.take(), EMPTY);
    }

    #[test]
    fn capacity_doubles_as_needed() {
        let d = IdempotentLifo::new(10);
        for i in 0..30 {
            d.put(i);
        }
        assert_eq!(d.capacity(), 40);
    }

    #[test]
    fn tag_increments_on_every_put() {
        let d = IdempotentLifo::new(4);
        d.put(1);
        let (_, tag1) = unpack(d.anchor.load(Ordering::Relaxed));
        d.put(2);
        let (_, tag2) = unpack(d.anchor.load(Ordering::Relaxed));
        assert_eq!(tag2, tag1 + 1);
    }

    #[test]
    fn concurrent_steal_returns_a_superset_with_no_element_missing() {
        let d = Arc::new(IdempotentLifo::new(4));
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
