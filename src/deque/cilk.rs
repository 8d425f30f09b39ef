//! Cilk-THE ("Task, Head, Exception" in the informal literature shorthand):
//! same index layout as Chase-Lev, but races near empty are resolved with a
//! mutex instead of a CAS loop.

use std::sync::atomic::{fence, AtomicI64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::deque::{ring_index, AlgorithmType, Deque};
use crate::task_array::{Task, EMPTY};

pub struct Cilk {
    head: AtomicI64,
    tail: AtomicI64,
    tasks: ArcSwap<Vec<AtomicI64>>,
    mtx: Mutex<()>,
}

impl Cilk {
    pub fn new(initial_capacity: usize) -> Self {
        let capacity = initial_capacity.max(1);
        let tasks = (0..capacity).map(|_| AtomicI64::new(0)).collect::<Vec<_>>();
        Cilk {
            head: AtomicI64::new(0),
            tail: AtomicI64::new(0),
            tasks: ArcSwap::from_pointee(tasks),
            mtx: Mutex::new(()),
        }
    }

    /// See `ChaseLev::grow`: `head`/`tail` index the ring via `ring_index`,
    /// so cells must be remapped by logical offset rather than copied
    /// slot-for-slot, or the live window corrupts as soon as `head > 0`.
    fn grow(&self) {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        let old = self.tasks.load();
        let new_capacity = old.len() * 2;
        let new_tasks: Vec<AtomicI64> = (0..new_capacity).map(|_| AtomicI64::new(0)).collect();
        for i in head..tail {
            let old_idx = ring_index(i, old.len());
            let new_idx = ring_index(i, new_capacity);
            new_tasks[new_idx].store(old[old_idx].load(Ordering::Relaxed), Ordering::Relaxed);
        }
        self.tasks.store(std::sync::Arc::new(new_tasks));
    }
}

impl Deque for Cilk {
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
            let idx = ring_index(tail, tasks.len());
            tasks[idx].store(task as i64, Ordering::Relaxed);
            fence(Ordering::Release);
            self.tail.store(tail + 1, Ordering::Relaxed);
            return true;
        }
    }

    fn take(&self) -> Task {
        let tail = self.tail.load(Ordering::Relaxed) - 1;
        self.tail.store(tail, Ordering::Relaxed);
        fence(Ordering::SeqCst);
        let head = self.head.load(Ordering::Relaxed);

        // Mirrors the source exactly: the fast path covers tail >= head
        // (including the tie), the lock only resolves a lost race, and the
        // lock branch falls through to the same final read regardless of
        // whether it restored T.
        if tail >= head {
            let tasks = self.tasks.load();
            let idx = ring_index(tail, tasks.len());
            return tasks[idx].load(Ordering::Relaxed) as Task;
        }

        let _guard = self.mtx.lock();
        if self.head.load(Ordering::Relaxed) >= tail + 1 {
            self.tail.store(tail + 1, Ordering::Relaxed);
            return EMPTY;
        }
        let tasks = self.tasks.load();
        let idx = ring_index(tail, tasks.len());
        tasks[idx].load(Ordering::Relaxed) as Task
    }

    fn steal(&self) -> Task {
        let _guard = self.mtx.lock();
        let head = self.head.load(Ordering::Relaxed);
        self.head.store(head + 1, Ordering::Relaxed);
        fence(Ordering::SeqCst);
        let tail = self.tail.load(Ordering::Relaxed);
        if head + 1 <= tail {
            let tasks = self.tasks.load();
            let idx = ring_index(head, tasks.len());
            tasks[idx].load(Ordering::Relaxed) as Task
        } else {
            self.head.store(head, Ordering::Relaxed);
            EMPTY
        }
    }

    fn capacity(&self) -> usize {
        self.tasks.load().len()
    }

    fn algorithm(&self) -> AlgorithmType {
        AlgorithmType::Cilk
    }
}
