//! Transaction pool error types.

use thiserror::Error;

/// Errors that can occur during transaction pool operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TxPoolError {
    /// The transaction nonce is below the account's next expected nonce.
    #[error("nonce too low: got {got}, expected {expected}")]
    NonceTooLow {
        /// Provided nonce.
        got: u64,
        /// Next nonce the account is expected to use.
        expected: u64,
    },

    /// The transaction nonce skips ahead of the account's next expected
    /// nonce.
    #[error("nonce gap: got {got}, expected {expected}")]
    NonceGap {
        /// Provided nonce.
        got: u64,
        /// Next nonce the account is expected to use.
        expected: u64,
    },
}
