//! Per-account entry list anchored at a base nonce.

use alloy_primitives::Address;

use crate::traits::PoolTransaction;

/// Ordered pending transactions for a single account.
///
/// Element `i` of the queue carries nonce `base_nonce + i`. A fully
/// advanced list keeps its empty queue and carries the base nonce forward.
#[derive(Debug, Clone)]
pub struct AccountEntries<T> {
    address: Address,
    base_nonce: u64,
    queue: Vec<T>,
}

impl<T: PoolTransaction> AccountEntries<T> {
    /// Creates an empty entry list anchored at the given base nonce.
    pub const fn new(address: Address, base_nonce: u64) -> Self {
        Self { address, base_nonce, queue: Vec::new() }
    }

    /// Account these entries belong to.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Nonce of the queue head position, whether or not a transaction is
    /// queued at it.
    pub const fn base_nonce(&self) -> u64 {
        self.base_nonce
    }

    /// The next nonce this account is expected to use.
    pub fn next_nonce(&self) -> u64 {
        self.base_nonce + self.queue.len() as u64
    }

    /// Transaction queued at the given nonce, if any.
    pub fn get(&self, nonce: u64) -> Option<&T> {
        let offset = nonce.checked_sub(self.base_nonce)?;
        self.queue.get(usize::try_from(offset).ok()?)
    }

    /// Appends a transaction. The caller guarantees `tx.nonce()` equals
    /// [`next_nonce`](Self::next_nonce).
    pub(crate) fn append(&mut self, tx: T) {
        self.queue.push(tx);
    }

    /// Pops the queue head and moves the base nonce forward.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.queue.is_empty() {
            return None;
        }
        let head = self.queue.remove(0);
        self.base_nonce += 1;
        Some(head)
    }

    /// Number of queued transactions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no transactions are queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Iterates over the queued transactions in nonce order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter()
    }

    /// Returns an independent copy whose queue shares the original's
    /// transaction handles.
    #[must_use]
    pub fn half_copy(&self) -> Self {
        Self { address: self.address, base_nonce: self.base_nonce, queue: self.queue.clone() }
    }
}
