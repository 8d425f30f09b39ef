//! Error types for the deque library and driver.
//!
//! Deque operations never abort the process (see the error handling design):
//! a bad `TaskArray` index returns a sentinel rather than panicking, and a
//! thread-affinity failure is logged and otherwise ignored. The two variants
//! below are the only failures that are ever surfaced to a caller as a
//! `Result`, and both are reachable only through opt-in entry points — the
//! default `put`/`take`/`steal` paths are infallible.

use thiserror::Error;

/// Errors surfaced by the deque library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WsError {
    /// Calling the labelled overload on an unlabelled variant, or vice versa,
    /// through [`crate::deque::DequeHandle::as_labelled`] /
    /// [`crate::deque::DequeHandle::as_unlabelled`].
    #[error("operation requires a {0} deque, but this handle holds the other shape")]
    UnsupportedOperation(&'static str),

    /// Raised only by a non-growing deque constructed with growth disabled;
    /// the default growable constructors never return this.
    #[error("capacity exceeded and growth is disabled for this deque")]
    CapacityOverflow,
}

pub type Result<T> = std::result::Result<T, WsError>;
