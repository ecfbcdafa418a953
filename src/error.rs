//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty keys are rejected on every write path
    #[error("Key cannot be empty")]
    EmptyKey,

    /// Key exceeds the maximum allowed length
    #[error("Key length {len} exceeds maximum of {max} bytes")]
    KeyTooLong { len: usize, max: usize },
}

// == Fetch Error Enum ==
/// Error type for cache-aside operations.
///
/// A producer failure is carried unchanged so the caller sees its own error
/// type; nothing is cached when the producer fails.
#[derive(Error, Debug)]
pub enum FetchError<E> {
    /// The cache rejected the operation before the producer ran
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The producer failed
    #[error("Producer failed: {0}")]
    Producer(E),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
