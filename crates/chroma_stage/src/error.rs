//! # Stage Error Types
//!
//! Configuration-shape errors surfaced by the streaming engine. None of
//! these halt the tick loop: a failed spawn is reported, skipped for the
//! tick and retried on the next one.

use thiserror::Error;

use crate::segment::{CatalogId, TemplateId};

/// Errors that can occur while streaming the stage.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    /// A spawn catalog has no entries or no positive total weight.
    #[error("spawn catalog {0:?} has no viable entries")]
    EmptyCatalog(CatalogId),

    /// A catalog id is not registered in the stage library.
    #[error("unknown spawn catalog {0:?}")]
    UnknownCatalog(CatalogId),

    /// A template id is not registered in the stage library.
    #[error("unknown segment template {0:?}")]
    UnknownTemplate(TemplateId),
}

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;
