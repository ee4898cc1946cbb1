//! Query index error types.

use thiserror::Error;

/// Errors surfaced by the query index.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueryIndexError {
    /// Two distinct acknowledgements reference the same response.
    #[error("multiple acknowledgements of the same response")]
    MultipleAckOfResponse,

    /// A different acknowledgement is already first for this sequence
    /// number.
    #[error("multiple acknowledgements of the same request sequence number")]
    MultipleAckOfSeqNo,

    /// A conflicting block already claims this query.
    #[error("query signed by another block")]
    QuerySignedByAnotherBlock,

    /// The operation targeted a height below the expiry barrier.
    #[error("query expired")]
    QueryExpired,

    /// The acknowledgement hash is unknown at the targeted height.
    #[error("query not cached")]
    QueryNotCached,

    /// An internal invariant was violated. The index is no longer
    /// trustworthy; callers should log and refuse further traffic.
    #[error("corrupted query index")]
    CorruptedIndex,
}
