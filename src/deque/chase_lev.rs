//! The classic Chase-Lev work-stealing deque: owner pops/pushes LIFO at the
//! tail, thieves steal FIFO from the head.
//!
//! Adapted from the lock-based `WSDeque` the reference crate's
//! `worksteal.rs` sketched (a `Vec<Mutex<Option<Task>>>` guarded per slot);
//! this version replaces the per-slot mutex with the real Chase-Lev atomic
//! protocol, since the task type here is a plain `i32` that fits an atomic
//! cell directly and the algorithm's published correctness depends on
//! exact fence placement, not locking.

use std::sync::atomic::{fence, AtomicI64, Ordering};

use arc_swap::ArcSwap;

use crate::deque::{ring_index, AlgorithmType, Deque};
use crate::task_array::{Task, EMPTY};

pub struct ChaseLev {
    head: AtomicI64,
    tail: AtomicI64,
    tasks: ArcSwap<Vec<AtomicI64>>,
}

impl ChaseLev {
    pub fn new(initial_capacity: usize) -> Self {
        let capacity = initial_capacity.max(1);
        let tasks = (0..capacity).map(|_| AtomicI64::new(0)).collect::<Vec<_>>();
        ChaseLev {
            head: AtomicI64::new(0),
            tail: AtomicI64::new(0),
            tasks: ArcSwap::from_pointee(tasks),
        }
    }

    /// Doubles the buffer: builds a brand-new `Vec`, copies the live cells
    /// under a relaxed/acquire load, then publishes it with one atomic
    /// `store`. The old `Arc` stays alive for as long as any in-flight
    /// thief still holds a clone of it; nothing is ever freed early. This
    /// is the never-free discipline the source's `delete[] tmp` does not
    /// honor (see DESIGN.md).
    ///
    /// `head`/`tail` index the ring via `ring_index`, so the live window
    /// `[head, tail)` generally wraps the end of the old buffer. Cells must
    /// be remapped by logical offset, not copied slot-for-slot: a raw copy
    /// leaves the new buffer's `[head, tail)` window (computed mod the new,
    /// larger capacity) pointing at whatever landed in those same raw
    /// offsets, not at the tasks that were actually there.
    fn grow(&self) {
        let head = self.head.load(Ordering::Acquire);
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

impl Deque for ChaseLev {
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
            fence(Ordering::SeqCst);
            self.tail.store(tail + 1, Ordering::Release);
            return true;
        }
    }

    fn take(&self) -> Task {
        let tail = self.tail.load(Ordering::Relaxed) - 1;
        self.tail.store(tail, Ordering::Relaxed);
        fence(Ordering::SeqCst);
        let head = self.head.load(Ordering::Relaxed);

        if tail > head {
            let tasks = self.tasks.load();
            let idx = ring_index(tail, tasks.len());
            return tasks[idx].load(Ordering::Relaxed) as Task;
        }
        if tail < head {
            self.tail.store(head, Ordering::Relaxed);
            return EMPTY;
        }
        // tail == head: a single remaining task, racing a thief.
        self.tail.store(head + 1, Ordering::Relaxed);
        let result = if self
            .head
            .compare_exchange(head, head + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let tasks = self.tasks.load();
            let idx = ring_index(tail, tasks.len());
            tasks[idx].load(Ordering::Relaxed) as Task
        } else {
            EMPTY
        };
        result
    }

    fn steal(&self) -> Task {
        loop {
            let head = self.head.load(Ordering::Acquire);
            fence(Ordering::SeqCst);
            let tail = self.tail.load(Ordering::Acquire);
            if head >= tail {
                return EMPTY;
            }
            let tasks = self.tasks.load();
            let idx = ring_index(head, tasks.len());
            let task = tasks[idx].load(Ordering::Acquire);
            if self
                .head
                .compare_exchange(head, head + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return task as Task;
            }
        }
    }

    fn capacity(&self) -> usize {
        self.tasks.load().len()
    }

    fn algorithm(&self) -> AlgorithmType {
        AlgorithmType::ChaseLev
    }
}
