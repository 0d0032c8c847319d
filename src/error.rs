//! Crate-scoped error handling.
//!
//! Each layer keeps its own precise error type; this module wraps them in a
//! single [`Error`] for the public resolution APIs.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type exposed to users of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Arity mismatch between a projected row and a boundary
    #[error("Tuple error: {0}")]
    Tuple(#[from] crate::tuple::TupleError),

    /// Invalid range boundaries
    #[error("Range error: {0}")]
    Range(#[from] crate::range::RangeError),

    /// Invalid shard spec
    #[error("Spec error: {0}")]
    Spec(#[from] crate::spec::SpecError),

    /// No shard owns the row
    #[error("Resolve error: {0}")]
    Resolve(#[from] crate::resolve::ResolveError),

    /// Invalid partition set
    #[error("Partition set error: {0}")]
    PartitionSet(#[from] crate::resolve::PartitionSetError),
}
