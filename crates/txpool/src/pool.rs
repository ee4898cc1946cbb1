//! Transaction pool implementation.

use std::collections::HashMap;

use alloy_primitives::Address;
use tracing::{debug, trace};

use crate::{entries::AccountEntries, error::TxPoolError, traits::PoolTransaction};

/// A per-account, nonce-ordered staging area for pending transactions.
///
/// Not synchronized: owned by the block producer task or guarded by the
/// caller's lock. Concurrent readers take a [`snapshot`](Self::snapshot)
/// under that lock and read it lock-free.
#[derive(Debug)]
pub struct TxPool<T> {
    by_account: HashMap<Address, AccountEntries<T>>,
}

impl<T: PoolTransaction> TxPool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self { by_account: HashMap::new() }
    }

    /// Stages a transaction for its account.
    ///
    /// `base_nonce` anchors the entry list for a new account and is ignored
    /// otherwise. Out-of-order transactions are rejected and leave the pool
    /// unchanged.
    pub fn add(&mut self, tx: T, base_nonce: u64) -> Result<(), TxPoolError> {
        let address = tx.address();
        let expected =
            self.by_account.get(&address).map_or(base_nonce, AccountEntries::next_nonce);
        let got = tx.nonce();
        if got < expected {
            debug!(%address, got, expected, "rejecting transaction below expected nonce");
            return Err(TxPoolError::NonceTooLow { got, expected });
        }
        if got > expected {
            debug!(%address, got, expected, "rejecting transaction past expected nonce");
            return Err(TxPoolError::NonceGap { got, expected });
        }
        self.by_account
            .entry(address)
            .or_insert_with(|| AccountEntries::new(address, base_nonce))
            .append(tx);
        Ok(())
    }

    /// Returns true iff a transaction with `tx`'s account, nonce, and hash
    /// is currently staged.
    pub fn has(&self, tx: &T) -> bool {
        let Some(entries) = self.by_account.get(&tx.address()) else {
            return false;
        };
        match entries.get(tx.nonce()) {
            Some(queued) => queued.hash() == tx.hash(),
            None => {
                trace!(address = %tx.address(), nonce = tx.nonce(), "nonce outside queue window");
                false
            }
        }
    }

    /// Confirms the head transaction of `tx`'s account.
    ///
    /// Pops the head and moves the base nonce forward iff `tx` matches it;
    /// returns false and leaves the pool unchanged otherwise. The entry
    /// list is retained even when this empties it.
    pub fn advance(&mut self, tx: &T) -> bool {
        let Some(entries) = self.by_account.get_mut(&tx.address()) else {
            return false;
        };
        if tx.nonce() != entries.base_nonce() {
            return false;
        }
        match entries.get(tx.nonce()) {
            Some(head) if head.hash() == tx.hash() => {}
            _ => return false,
        }
        entries.pop_front();
        debug!(address = %tx.address(), nonce = tx.nonce(), "confirmed transaction");
        true
    }

    /// Returns a pool whose entry lists are half-copies of the originals.
    ///
    /// The snapshot shares transaction handles with the source but has
    /// independent queue storage; mutating either side leaves the other
    /// untouched.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        Self {
            by_account: self
                .by_account
                .iter()
                .map(|(address, entries)| (*address, entries.half_copy()))
                .collect(),
        }
    }

    /// Entry list for the given account, if the pool tracks it.
    pub fn entries(&self, address: &Address) -> Option<&AccountEntries<T>> {
        self.by_account.get(address)
    }

    /// Next expected nonce for the given account, if the pool tracks it.
    pub fn next_nonce(&self, address: &Address) -> Option<u64> {
        self.by_account.get(address).map(AccountEntries::next_nonce)
    }

    /// Total number of staged transactions across all accounts.
    pub fn len(&self) -> usize {
        self.by_account.values().map(AccountEntries::len).sum()
    }

    /// Returns true if no transactions are staged.
    pub fn is_empty(&self) -> bool {
        self.by_account.values().all(AccountEntries::is_empty)
    }

    /// Number of tracked accounts, including fully advanced ones.
    pub fn account_count(&self) -> usize {
        self.by_account.len()
    }
}

impl<T: PoolTransaction> Default for TxPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
