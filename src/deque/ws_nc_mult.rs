//! WsNcMult: the "multiplicity" variant. `Head` is an optimistically
//! published index; every registered thief also keeps a private
//! `head[label]` that only ever advances forward. Because several thieves
//! can observe the same `Head` and race to the same cell, a task may be
//! handed to more than one agent by design — multiplicity, not a bug.
//!
//! `put` pre-zeros the two cells ahead of `tail` to `BOTTOM` before
//! advancing `tail`, so a thief that observes the bumped `tail` before the
//! owner's write to that cell completes still reads a well-defined
//! sentinel rather than stale data.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::deque::{AlgorithmType, LabelledDeque};
use crate::task_array::{Task, TaskArray, BOTTOM, EMPTY};

pub struct WsNcMult {
    head_pub: AtomicI64,
    head_priv: Vec<AtomicI64>,
    tail: AtomicI64,
    tasks: ArcSwap<TaskArray>,
}

impl WsNcMult {
    pub fn new(initial_capacity: usize, worker_count: usize) -> Self {
        WsNcMult {
            head_pub: AtomicI64::new(0),
            head_priv: (0..worker_count.max(1)).map(|_| AtomicI64::new(0)).collect(),
            tail: AtomicI64::new(-1),
            tasks: ArcSwap::from_pointee(TaskArray::with_capacity(initial_capacity.max(4))),
        }
    }

    fn grow(&self) {
        let old = self.tasks.load();
        let grown = old.grown(old.len() * 2);
        self.tasks.store(Arc::new(grown));
    }

    fn effective_head(&self, label: usize) -> i64 {
        self.head_priv[label]
            .load(Ordering::Relaxed)
            .max(self.head_pub.load(Ordering::Acquire))
    }

    fn publish(&self, label: usize, new_head: i64) {
        self.head_priv[label].store(new_head, Ordering::Relaxed);
        self.head_pub.store(new_head, Ordering::Release);
    }
}

impl LabelledDeque for WsNcMult {
    fn is_empty(&self, label: usize) -> bool {
        self.effective_head(label) > self.tail.load(Ordering::Acquire)
    }

    fn put(&self, task: Task, _label: usize) -> bool {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let tasks = self.tasks.load();
            let cap = tasks.len() as i64;
            if tail >= cap - 1 {
                drop(tasks);
                self.grow();
                continue;
            }
            if tail <= cap - 3 {
                tasks.set((tail + 1) as usize, BOTTOM);
                tasks.set((tail + 2) as usize, BOTTOM);
            }
            let new_tail = tail + 1;
            self.tail.store(new_tail, Ordering::Release);
            tasks.set(new_tail as usize, task);
            return true;
        }
    }

    fn take(&self, label: usize) -> Task {
        let head = self.effective_head(label);
        let tail = self.tail.load(Ordering::Acquire);
        if head > tail {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let task = tasks.get(head as usize);
        self.publish(label, head + 1);
        task
    }

    fn steal(&self, label: usize) -> Task {
        let head = self.effective_head(label);
        let tail = self.tail.load(Ordering::Acquire);
        if head > tail {
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let task = tasks.get(head as usize);
        if task == BOTTOM {
            return EMPTY;
        }
        self.publish(label, head + 1);
        task
    }

    fn capacity(&self) -> usize {
        self.tasks.load().len()
    }

    fn algorithm(&self) -> AlgorithmType {
        AlgorithmType::WsNcMult
    }
}
