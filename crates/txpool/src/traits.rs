//! Pool transaction trait.

use std::{fmt::Debug, sync::Arc};

use alloy_primitives::{Address, B256};

/// Capabilities the pool requires from a transaction value.
///
/// Values are immutable after construction. Implementations are expected to
/// be cheap handles such as `Arc`; a pool snapshot clones every queued
/// transaction.
pub trait PoolTransaction: Clone + Debug + Send + Sync + 'static {
    /// Account the transaction spends from.
    fn address(&self) -> Address;

    /// Per-account monotonic transaction counter.
    fn nonce(&self) -> u64;

    /// Content hash identifying the transaction.
    fn hash(&self) -> B256;
}

impl<T: PoolTransaction> PoolTransaction for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn nonce(&self) -> u64 {
        (**self).nonce()
    }

    fn hash(&self) -> B256 {
        (**self).hash()
    }
}
