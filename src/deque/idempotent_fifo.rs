//! Idempotent FIFO: owner and thieves both consume from the head, in FIFO
//! order. `put`/`take` are owner-only and run without CAS; `steal` makes a
//! single CAS attempt on `head` and gives up on the first loss rather than
//! retrying, since a returned duplicate is tolerated by the contract and
//! the driver's `visited` exchange absorbs it.

use std::sync::atomic::{fence, AtomicI64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::deque::{AlgorithmType, Deque};
use crate::task_array::{Task, TaskArray, EMPTY};

pub struct IdempotentFifo {
    head: AtomicI64,
    tail: AtomicI64,
    tasks: ArcSwap<TaskArray>,
}

impl IdempotentFifo {
    pub fn new(initial_capacity: usize) -> Self {
        IdempotentFifo {
            head: AtomicI64::new(0),
            tail: AtomicI64::new(0),
            tasks: ArcSwap::from_pointee(TaskArray::with_capacity(initial_capacity.max(1))),
        }
    }

    fn grow(&self) {
        let old = self.tasks.load();
        let grown = old.grown(old.len() * 2);
        self.tasks.store(Arc::new(grown));
    }
}

impl Deque for IdempotentFifo {
    fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) >= self.tail.load(Ordering::Acquire)
    }

    fn put(&self, task: Task) -> bool {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let tasks = self.tasks.load();
            if tail as usize >= tasks.len() {
                drop(tasks);
                self.grow();
                continue;
            }
            tasks.set_relaxed(tail as usize, task);
            fence(Ordering::Release);
            self.tail.store(tail + 1, Ordering::Release);
            return true;
        }
    }

    fn take(&self) -> Task {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        if head >= tail {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let task = tasks.get_relaxed(head as usize);
        self.head.store(head + 1, Ordering::Relaxed);
        task
    }

    fn steal(&self) -> Task {
        let head = self.head.load(Ordering::Acquire);
        fence(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head >= tail {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let task = tasks.get(head as usize);
        if self
            .head
            .compare_exchange(head, head + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            task
        } else {
            EMPTY
        }
    }

    fn capacity(&self) -> usize {
        self.tasks.load().len()
    }

    fn algorithm(&self) -> AlgorithmType {
        AlgorithmType::IdempotentFifo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn take_returns_fifo_order() {
        let d = IdempotentFifo::new(16);
        for i in 0..10 {
            d.put(i);
        }
        let got: Vec<Task> = (0..10).map(|_| d.take()).collect();
        assert_eq!(got, (0..10).collect::<Vec<_>>());
        assert_eq!(d.take(), EMPTY);
    }

    #[test]
    fn steal_returns_fifo_order() {
        let d = IdempotentFifo::new(16);
        for i in 0..10 {
            d.put(i);
        }
        let got: Vec<Task> = (0..10).map(|_| d.steal()).collect();
        assert_eq!(got, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn capacity_doubles_as_needed() {
        let d = IdempotentFifo::new(10);
        for i in 0..30 {
            d.put(i);
        }
        assert_eq!(d.capacity(), 40);
    }

    #[test]
    fn concurrent_steal_returns_a_superset_with_no_element_missing() {
        let d = Arc::new(IdempotentFifo::new(4));
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
            assert!(seen.contains(&i), "task {i} missing from the returned set");
        }
    }
}
