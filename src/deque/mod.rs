//! The seven work-stealing deque variants behind one polymorphic contract.
//!
//! Two traits split the contract along the labelled/unlabelled axis instead
//! of one trait with stub overrides that return a sentinel for the
//! unsupported shape: [`Deque`] for ChaseLev, Cilk-THE and the three
//! idempotent variants, [`LabelledDeque`] for WsNcMult and BoundedWsNcMult.
//! [`DequeHandle`] is the tagged union [`factory::build`] returns.

pub mod bounded_ws_nc_mult;
pub mod chase_lev;
pub mod cilk;
pub mod factory;
pub mod idempotent_deque;
pub mod idempotent_fifo;
pub mod idempotent_lifo;
pub mod ws_nc_mult;

use crate::error::{Result, WsError};
use crate::task_array::Task;
use serde::{Deserialize, Serialize};

/// Identifies one of the seven algorithms, used by the factory and
/// round-tripped through the JSON result records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmType {
    #[serde(rename = "CHASE_LEV")]
    ChaseLev,
    #[serde(rename = "CILK")]
    Cilk,
    #[serde(rename = "IDEMPOTENT_FIFO")]
    IdempotentFifo,
    #[serde(rename = "IDEMPOTENT_LIFO")]
    IdempotentLifo,
    #[serde(rename = "IDEMPOTENT_DEQUE")]
    IdempotentDeque,
    #[serde(rename = "WS_NC_MULT")]
    WsNcMult,
    #[serde(rename = "B_WS_NC_MULT")]
    BoundedWsNcMult,
}

impl AlgorithmType {
    pub const ALL: [AlgorithmType; 7] = [
        AlgorithmType::ChaseLev,
        AlgorithmType::Cilk,
        AlgorithmType::IdempotentFifo,
        AlgorithmType::IdempotentLifo,
        AlgorithmType::IdempotentDeque,
        AlgorithmType::WsNcMult,
        AlgorithmType::BoundedWsNcMult,
    ];

    /// True for the two variants the factory hands back as
    /// [`DequeHandle::Labelled`]. Named after the original's `isEspecial`;
    /// the driver no longer needs to call this directly (it matches on the
    /// `DequeHandle` shape instead) but it stays useful for reporting and
    /// tests that want to assert the factory's own classification.
    pub fn is_labelled(self) -> bool {
        matches!(self, AlgorithmType::WsNcMult | AlgorithmType::BoundedWsNcMult)
    }
}

/// Contract for the five unlabelled variants: ChaseLev, Cilk-THE,
/// IdempotentFIFO, IdempotentLIFO, IdempotentDeque.
pub trait Deque: Send + Sync {
    fn is_empty(&self) -> bool;
    /// Always accepted; grows the backing buffer if full. Returns `true`
    /// once the task has been published.
    fn put(&self, task: Task) -> bool;
    /// Owner-only. Returns the task or [`crate::task_array::EMPTY`].
    fn take(&self) -> Task;
    /// Thief-only. Returns the task or [`crate::task_array::EMPTY`].
    fn steal(&self) -> Task;
    fn capacity(&self) -> usize;
    fn algorithm(&self) -> AlgorithmType;
}

/// Contract for the two labelled (multiplicity) variants: WsNcMult,
/// BoundedWsNcMult. `label` identifies the calling worker and must be
/// `< worker_count` as configured at construction.
pub trait LabelledDeque: Send + Sync {
    fn is_empty(&self, label: usize) -> bool;
    fn put(&self, task: Task, label: usize) -> bool;
    fn take(&self, label: usize) -> Task;
    fn steal(&self, label: usize) -> Task;
    fn capacity(&self) -> usize;
    fn algorithm(&self) -> AlgorithmType;
}

/// The factory's return type: a tagged union over the two contract shapes,
/// so a caller that built the wrong assumption about an algorithm's shape
/// gets a reported error from [`DequeHandle::as_labelled`] /
/// [`DequeHandle::as_unlabelled`] rather than silent `-1` stub leakage.
pub enum DequeHandle {
    Unlabelled(Box<dyn Deque>),
    Labelled(Box<dyn LabelledDeque>),
}

impl DequeHandle {
    pub fn algorithm(&self) -> AlgorithmType {
        match self {
            DequeHandle::Unlabelled(d) => d.algorithm(),
            DequeHandle::Labelled(d) => d.algorithm(),
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            DequeHandle::Unlabelled(d) => d.capacity(),
            DequeHandle::Labelled(d) => d.capacity(),
        }
    }

    pub fn as_unlabelled(&self) -> Result<&dyn Deque> {
        match self {
            DequeHandle::Unlabelled(d) => Ok(d.as_ref()),
            DequeHandle::Labelled(_) => Err(WsError::UnsupportedOperation("unlabelled")),
        }
    }

    pub fn as_labelled(&self) -> Result<&dyn LabelledDeque> {
        match self {
            DequeHandle::Labelled(d) => Ok(d.as_ref()),
            DequeHandle::Unlabelled(_) => Err(WsError::UnsupportedOperation("labelled")),
        }
    }
}

/// Euclidean index into a ring buffer of length `len`. Plain `%` on a
/// negative `i64` cast to `usize` would wrap to a huge offset; every deque
/// here routes ring-buffer indexing through this helper instead of raw `%`.
pub(crate) fn ring_index(i: i64, len: usize) -> usize {
    i.rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_index_handles_negative_offsets() {
        assert_eq!(ring_index(-1, 4), 3);
        assert_eq!(ring_index(0, 4), 0);
        assert_eq!(ring_index(5, 4), 1);
    }

    #[test]
    fn is_labelled_matches_the_two_multiplicity_variants() {
        assert!(AlgorithmType::WsNcMult.is_labelled());
        assert!(AlgorithmType::BoundedWsNcMult.is_labelled());
        assert!(!AlgorithmType::ChaseLev.is_labelled());
    }
}
