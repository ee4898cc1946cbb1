//! Blocks that package acknowledged queries.

use alloy_primitives::B256;
use chainql_queryindex::BlockQueries;

/// View of a produced block binding acknowledged queries to a block hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBlock {
    hash: B256,
    queries: Vec<B256>,
}

impl QueryBlock {
    /// Creates a block view from its hash and packaged acknowledgement
    /// header hashes.
    pub const fn new(hash: B256, queries: Vec<B256>) -> Self {
        Self { hash, queries }
    }
}

impl BlockQueries for QueryBlock {
    fn block_hash(&self) -> B256 {
        self.hash
    }

    fn queries(&self) -> &[B256] {
        &self.queries
    }
}
