//! # Selection Error Types
//!
//! All errors that can occur during weighted or constrained selection.

use thiserror::Error;

/// Errors that can occur during selection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// A weighted table was queried with no entries.
    #[error("weighted table is empty")]
    EmptyTable,

    /// The entries of a weighted table sum to zero (or a non-finite value).
    #[error("weighted table has no positive total weight")]
    ZeroTotalWeight,
}

/// Result type for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;
