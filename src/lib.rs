//! # wsdeque - work-stealing deques and a parallel spanning-tree driver
//!
//! This crate provides seven work-stealing task-deque algorithms behind one
//! polymorphic contract, plus a multi-threaded spanning-tree driver that
//! exercises them against torus-mesh graphs. It implements:
//!
//! - **Deques**: Chase-Lev, Cilk-THE, three idempotent variants, and two
//!   multiplicity (`WsNcMult`/`BoundedWsNcMult`) variants, each behind
//!   [`deque::Deque`] or [`deque::LabelledDeque`].
//! - **Graphs**: torus-mesh topology builders (2D/3D, full and
//!   probabilistic), BFS cycle/tree classification, and seed selection.
//! - **Driver**: a scoped-thread spanning-tree traversal that seeds one
//!   worker per root and lets idle workers steal from random peers.
//!
//! ## Design philosophy
//!
//! A deque's correctness lives entirely in its atomic ordering; the
//! traversal loop that exercises it should not have to know which
//! algorithm it's holding beyond the labelled/unlabelled shape distinction
//! captured by [`deque::DequeHandle`].
//!
//! ## Example
//!
//! ```rust
//! use wsdeque::deque::{factory, AlgorithmType};
//!
//! let handle = factory::build(AlgorithmType::ChaseLev, 16, 1);
//! let d = handle.as_unlabelled().unwrap();
//! d.put(42);
//! assert_eq!(d.take(), 42);
//! ```

pub mod affinity;
pub mod deque;
pub mod driver;
pub mod error;
pub mod graph;
pub mod params;
pub mod report;
pub mod task_array;

pub use deque::{AlgorithmType, Deque, DequeHandle, LabelledDeque};
pub use driver::{experiment, experiment_complete, spanning_tree};
pub use error::{Result, WsError};
pub use graph::{Graph, GraphCycleType, GraphType};
pub use params::{ExperimentResult, Params, ResultsFile, StepSpanningType};
pub use report::Report;
