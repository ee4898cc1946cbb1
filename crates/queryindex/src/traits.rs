//! Contracts for the opaque values tracked by the index.

use std::fmt::Debug;

use alloy_primitives::B256;

/// A verified, signed response header to a client query.
///
/// Implementations are expected to be cheap handles; the index clones the
/// response whenever an acknowledgement rebinds it.
pub trait ResponseHeader: Clone + Debug + Send + Sync + 'static {
    /// Stable, collision-resistant content hash of the header.
    fn header_hash(&self) -> B256;

    /// Sequence number of the request this response answers.
    fn request_seq_no(&self) -> u64;
}

/// A verified, signed client acknowledgement of a response.
pub trait AckHeader: Clone + Debug + Send + Sync + 'static {
    /// The response type this acknowledgement embeds.
    type Response: ResponseHeader;

    /// Stable, collision-resistant content hash of the header.
    fn header_hash(&self) -> B256;

    /// Hash of the response header being acknowledged.
    ///
    /// Always equals `self.signed_response().header_hash()`.
    fn response_header_hash(&self) -> B256;

    /// Sequence number of the underlying request.
    ///
    /// Always equals `self.signed_response().request_seq_no()`.
    fn request_seq_no(&self) -> u64;

    /// The acknowledged response.
    fn signed_response(&self) -> &Self::Response;
}

/// Borrowed view of a block that packages acknowledged queries.
pub trait BlockQueries {
    /// Hash of the block.
    fn block_hash(&self) -> B256;

    /// Header hashes of the acknowledgements packaged in the block.
    fn queries(&self) -> &[B256];
}
