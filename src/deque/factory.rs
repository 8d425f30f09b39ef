//! Turns an algorithm tag and a capacity hint into a [`DequeHandle`].
//! `worker_count` only matters for the two labelled variants, where it
//! sizes the per-thief `head[label]` table; unlabelled variants ignore it.

use crate::deque::bounded_ws_nc_mult::BoundedWsNcMult;
use crate::deque::chase_lev::ChaseLev;
use crate::deque::cilk::Cilk;
use crate::deque::idempotent_deque::IdempotentDeque;
use crate::deque::idempotent_fifo::IdempotentFifo;
use crate::deque::idempotent_lifo::IdempotentLifo;
use crate::deque::ws_nc_mult::WsNcMult;
use crate::deque::{AlgorithmType, DequeHandle};

pub fn build(algorithm: AlgorithmType, capacity: usize, worker_count: usize) -> DequeHandle {
    match algorithm {
        AlgorithmType::ChaseLev => DequeHandle::Unlabelled(Box::new(ChaseLev::new(capacity))),
        AlgorithmType::Cilk => DequeHandle::Unlabelled(Box::new(Cilk::new(capacity))),
        AlgorithmType::IdempotentFifo => {
            DequeHandle::Unlabelled(Box::new(IdempotentFifo::new(capacity)))
        }
        AlgorithmType::IdempotentLifo => {
            DequeHandle::Unlabelled(Box::new(IdempotentLifo::new(capacity)))
        }
        AlgorithmType::IdempotentDeque => {
            DequeHandle::Unlabelled(Box::new(IdempotentDeque::new(capacity)))
        }
        AlgorithmType::WsNcMult => {
            DequeHandle::Labelled(Box::new(WsNcMult::new(capacity, worker_count)))
        }
        AlgorithmType::BoundedWsNcMult => {
            DequeHandle::Labelled(Box::new(BoundedWsNcMult::new(capacity, worker_count)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_algorithm_builds_the_expected_shape() {
        for alg in AlgorithmType::ALL {
            let handle = build(alg, 16, 4);
            assert_eq!(handle.algorithm(), alg);
            if alg.is_labelled() {
                assert!(handle.as_labelled().is_ok());
                assert!(handle.as_unlabelled().is_err());
            } else {
                assert!(handle.as_unlabelled().is_ok());
                assert!(handle.as_labelled().is_err());
            }
        }
    }
}
