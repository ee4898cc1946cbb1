//! Account transactions staged for block inclusion.

use alloy_primitives::{Address, B256, Bytes, keccak256};
use chainql_txpool::PoolTransaction;

/// A nonce-ordered account transaction.
///
/// The content hash is sealed at construction over the sender, nonce, and
/// payload, so it stays stable for the value's lifetime. Pool snapshots
/// share transactions by handle; wrap values in `Arc` before staging them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Account the transaction spends from.
    pub sender: Address,
    /// Per-account sequence number.
    pub nonce: u64,
    /// Opaque transaction payload.
    pub payload: Bytes,
    hash: B256,
}

impl Transaction {
    /// Creates a transaction and seals its content hash.
    pub fn new(sender: Address, nonce: u64, payload: Bytes) -> Self {
        let mut buf = Vec::with_capacity(20 + 8 + payload.len());
        buf.extend_from_slice(sender.as_slice());
        buf.extend_from_slice(&nonce.to_be_bytes());
        buf.extend_from_slice(&payload);
        let hash = keccak256(&buf);
        Self { sender, nonce, payload, hash }
    }
}

impl PoolTransaction for Transaction {
    fn address(&self) -> Address {
        self.sender
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn hash(&self) -> B256 {
        self.hash
    }
}
