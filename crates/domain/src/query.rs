//! Signed query response and acknowledgement headers.

use alloy_primitives::{Address, B256, keccak256};
use chainql_queryindex::{AckHeader, ResponseHeader};

/// A verified response header served for a client query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedResponse {
    /// Hash of the request being answered.
    pub request_hash: B256,
    /// Sequence number assigned to the request by the client.
    pub request_seq_no: u64,
    /// Worker node that served the response.
    pub responder: Address,
    hash: B256,
}

impl SignedResponse {
    /// Creates a response header and seals its content hash.
    pub fn new(request_hash: B256, request_seq_no: u64, responder: Address) -> Self {
        let mut buf = Vec::with_capacity(32 + 8 + 20);
        buf.extend_from_slice(request_hash.as_slice());
        buf.extend_from_slice(&request_seq_no.to_be_bytes());
        buf.extend_from_slice(responder.as_slice());
        let hash = keccak256(&buf);
        Self { request_hash, request_seq_no, responder, hash }
    }
}

impl ResponseHeader for SignedResponse {
    fn header_hash(&self) -> B256 {
        self.hash
    }

    fn request_seq_no(&self) -> u64 {
        self.request_seq_no
    }
}

/// A verified client acknowledgement of a response.
///
/// The acknowledgement embeds the response it covers, so the pair can never
/// drift apart: `response_header_hash()` is by construction the hash of
/// `signed_response()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAck {
    /// The response being acknowledged.
    pub response: SignedResponse,
    /// Client that issued the acknowledgement.
    pub client: Address,
    hash: B256,
}

impl SignedAck {
    /// Creates an acknowledgement of `response` and seals its content hash.
    pub fn new(response: SignedResponse, client: Address) -> Self {
        let mut buf = Vec::with_capacity(32 + 20);
        buf.extend_from_slice(response.header_hash().as_slice());
        buf.extend_from_slice(client.as_slice());
        let hash = keccak256(&buf);
        Self { response, client, hash }
    }
}

impl AckHeader for SignedAck {
    type Response = SignedResponse;

    fn header_hash(&self) -> B256 {
        self.hash
    }

    fn response_header_hash(&self) -> B256 {
        self.response.header_hash()
    }

    fn request_seq_no(&self) -> u64 {
        self.response.request_seq_no
    }

    fn signed_response(&self) -> &SignedResponse {
        &self.response
    }
}
