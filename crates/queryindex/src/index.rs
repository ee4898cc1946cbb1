//! Height-bucketed query index with a monotonic expiry barrier.

use std::{collections::HashMap, sync::Arc};

use alloy_primitives::B256;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    Height,
    error::QueryIndexError,
    multi::MultiIndex,
    traits::{AckHeader, BlockQueries},
};

/// Per-height query trackers behind a monotonic expiry barrier.
///
/// Heights are lazily materialized as [`MultiIndex`] buckets. The outer
/// lock guards only the height map and the barrier; bucket operations run
/// on a cloned handle outside it. The write arm is held across
/// [`advance_barrier`](Self::advance_barrier).
#[derive(Debug)]
pub struct QueryIndex<A: AckHeader> {
    inner: RwLock<Buckets<A>>,
}

#[derive(Debug)]
struct Buckets<A: AckHeader> {
    barrier: Height,
    by_height: HashMap<Height, Arc<MultiIndex<A>>>,
}

impl<A: AckHeader> QueryIndex<A> {
    /// Creates an empty index with the barrier before genesis.
    pub fn new() -> Self {
        Self { inner: RwLock::new(Buckets { barrier: 0, by_height: HashMap::new() }) }
    }

    /// The lowest height still retained. Everything below has expired.
    pub fn barrier(&self) -> Height {
        self.inner.read().barrier
    }

    /// Resolves the bucket at `height`, creating it if absent. Every
    /// height-addressed operation goes through here, so no bucket ever
    /// exists below the barrier.
    fn bucket(&self, height: Height) -> Result<Arc<MultiIndex<A>>, QueryIndexError> {
        {
            let inner = self.inner.read();
            if height < inner.barrier {
                return Err(QueryIndexError::QueryExpired);
            }
            if let Some(bucket) = inner.by_height.get(&height) {
                return Ok(bucket.clone());
            }
        }
        let mut inner = self.inner.write();
        // Re-check after reacquiring: the barrier may have passed this
        // height in between.
        if height < inner.barrier {
            return Err(QueryIndexError::QueryExpired);
        }
        Ok(inner.by_height.entry(height).or_default().clone())
    }

    /// Indexes a responded query at the given height.
    pub fn add_response(&self, height: Height, resp: A::Response) -> Result<(), QueryIndexError> {
        self.bucket(height)?.add_response(resp);
        Ok(())
    }

    /// Indexes an acknowledged query at the given height.
    ///
    /// After success, [`get_ack`](Self::get_ack) for the same height and
    /// header hash returns the acknowledgement from any thread.
    pub fn add_ack(&self, height: Height, ack: A) -> Result<(), QueryIndexError> {
        self.bucket(height)?.add_ack(ack)
    }

    /// Records the containing block for every acknowledgement it packages.
    pub fn set_signed_block<B: BlockQueries>(
        &self,
        height: Height,
        block: &B,
    ) -> Result<(), QueryIndexError> {
        let bucket = self.bucket(height)?;
        let block_hash = block.block_hash();
        for ack_hash in block.queries() {
            bucket.set_signed_block(block_hash, *ack_hash);
        }
        Ok(())
    }

    /// Looks up an acknowledgement by header hash at the given height.
    pub fn get_ack(&self, height: Height, ack_hash: &B256) -> Result<A, QueryIndexError> {
        self.bucket(height)?.get_ack(ack_hash).ok_or(QueryIndexError::QueryNotCached)
    }

    /// Validates an acknowledgement claimed by a block at the given height.
    pub fn check_ack_from_block(
        &self,
        height: Height,
        block_hash: B256,
        ack_hash: B256,
    ) -> Result<bool, QueryIndexError> {
        self.bucket(height)?.check_ack_from_block(block_hash, ack_hash)
    }

    /// Pre-creates buckets for every height in `[lo, hi)`.
    pub fn ensure_range(&self, lo: Height, hi: Height) {
        let mut inner = self.inner.write();
        let lo = lo.max(inner.barrier);
        for height in lo..hi {
            inner.by_height.entry(height).or_default();
        }
    }

    /// Reserves and returns the header hashes of every unclaimed first
    /// acknowledgement below `height`.
    ///
    /// A repeat call returns an empty list.
    pub fn mark_and_collect_unsigned_acks(&self, height: Height) -> Vec<B256> {
        let buckets: Vec<_> = {
            let inner = self.inner.read();
            (inner.barrier..height).filter_map(|h| inner.by_height.get(&h).cloned()).collect()
        };
        let mut acks = Vec::new();
        for bucket in buckets {
            bucket.mark_and_collect_unsigned_acks(&mut acks);
        }
        acks
    }

    /// Expires every bucket below `height` and moves the barrier up to it.
    ///
    /// The barrier never regresses; calls at or below it are no-ops.
    pub fn advance_barrier(&self, height: Height) {
        let mut inner = self.inner.write();
        if height <= inner.barrier {
            return;
        }
        for h in inner.barrier..height {
            if let Some(bucket) = inner.by_height.remove(&h) {
                bucket.check_before_expire();
                debug!(height = h, "expired query index bucket");
            }
        }
        inner.barrier = height;
    }
}

impl<A: AckHeader> Default for QueryIndex<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::traits::ResponseHeader;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestResponse {
        hash: B256,
        seq_no: u64,
    }

    impl ResponseHeader for TestResponse {
        fn header_hash(&self) -> B256 {
            self.hash
        }

        fn request_seq_no(&self) -> u64 {
            self.seq_no
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestAck {
        hash: B256,
        response: TestResponse,
    }

    impl AckHeader for TestAck {
        type Response = TestResponse;

        fn header_hash(&self) -> B256 {
            self.hash
        }

        fn response_header_hash(&self) -> B256 {
            self.response.hash
        }

        fn request_seq_no(&self) -> u64 {
            self.response.seq_no
        }

        fn signed_response(&self) -> &TestResponse {
            &self.response
        }
    }

    struct TestBlock {
        hash: B256,
        queries: Vec<B256>,
    }

    impl BlockQueries for TestBlock {
        fn block_hash(&self) -> B256 {
            self.hash
        }

        fn queries(&self) -> &[B256] {
            &self.queries
        }
    }

    fn random_b256() -> B256 {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        B256::from(bytes)
    }

    fn ack(seq_no: u64) -> TestAck {
        TestAck { hash: random_b256(), response: TestResponse { hash: random_b256(), seq_no } }
    }

    #[test]
    fn add_ack_then_get_ack() {
        let index = QueryIndex::new();
        let a = ack(1);
        index.add_ack(4, a.clone()).unwrap();

        assert_eq!(index.get_ack(4, &a.hash).unwrap().hash, a.hash);
        assert_eq!(index.get_ack(4, &random_b256()), Err(QueryIndexError::QueryNotCached));
        assert_eq!(index.get_ack(5, &a.hash), Err(QueryIndexError::QueryNotCached));
    }

    #[test]
    fn barrier_expires_lower_heights() {
        let index = QueryIndex::new();
        let acks: Vec<_> = (1..5).map(|h| (h, ack(h as u64))).collect();
        for (h, a) in &acks {
            index.add_ack(*h, a.clone()).unwrap();
        }

        index.advance_barrier(3);
        assert_eq!(index.barrier(), 3);

        let (h2, a2) = &acks[1];
        assert_eq!(*h2, 2);
        assert_eq!(index.get_ack(*h2, &a2.hash), Err(QueryIndexError::QueryExpired));

        let (h3, a3) = &acks[2];
        assert_eq!(index.get_ack(*h3, &a3.hash).unwrap().hash, a3.hash);

        // Expired heights reject writes as well; they must never come back.
        assert_eq!(index.add_ack(2, ack(9)), Err(QueryIndexError::QueryExpired));
        assert_eq!(
            index.check_ack_from_block(2, random_b256(), a2.hash),
            Err(QueryIndexError::QueryExpired)
        );
    }

    #[test]
    fn advance_barrier_is_monotonic_and_idempotent() {
        let index: QueryIndex<TestAck> = QueryIndex::new();
        index.advance_barrier(3);
        index.advance_barrier(3);
        assert_eq!(index.barrier(), 3);

        index.advance_barrier(1);
        assert_eq!(index.barrier(), 3);
    }

    #[test]
    fn mark_and_collect_spans_heights_below_target() {
        let index = QueryIndex::new();
        let a1 = ack(1);
        let a2 = ack(2);
        let a3 = ack(3);
        index.add_ack(1, a1.clone()).unwrap();
        index.add_ack(2, a2.clone()).unwrap();
        index.add_ack(5, a3.clone()).unwrap();

        let mut collected = index.mark_and_collect_unsigned_acks(5);
        collected.sort();
        let mut expected = vec![a1.hash, a2.hash];
        expected.sort();
        assert_eq!(collected, expected);

        // Idempotent: everything below 5 is now reserved.
        assert!(index.mark_and_collect_unsigned_acks(5).is_empty());

        // The height-5 ack is still claimable by a later block.
        assert_eq!(index.mark_and_collect_unsigned_acks(6), vec![a3.hash]);
    }

    #[test]
    fn set_signed_block_binds_packaged_acks() {
        let index = QueryIndex::new();
        let a1 = ack(1);
        let a2 = ack(2);
        index.add_ack(10, a1.clone()).unwrap();
        index.add_ack(10, a2.clone()).unwrap();

        let block = TestBlock { hash: random_b256(), queries: vec![a1.hash, a2.hash] };
        index.set_signed_block(10, &block).unwrap();

        assert_eq!(index.check_ack_from_block(10, block.hash, a1.hash), Ok(true));
        assert_eq!(
            index.check_ack_from_block(10, random_b256(), a2.hash),
            Err(QueryIndexError::QuerySignedByAnotherBlock)
        );
    }

    #[test]
    fn ensure_range_respects_the_barrier() {
        let index: QueryIndex<TestAck> = QueryIndex::new();
        index.advance_barrier(4);
        index.ensure_range(2, 6);

        let inner = index.inner.read();
        assert!(!inner.by_height.contains_key(&2));
        assert!(!inner.by_height.contains_key(&3));
        assert!(inner.by_height.contains_key(&4));
        assert!(inner.by_height.contains_key(&5));
    }

    #[test]
    fn operations_at_distinct_heights_are_independent() {
        let index = QueryIndex::new();
        let a = ack(1);
        index.add_ack(3, a.clone()).unwrap();

        // Same sequence number at another height is a fresh query.
        let b = ack(1);
        index.add_ack(4, b.clone()).unwrap();

        assert_eq!(index.get_ack(3, &a.hash).unwrap().hash, a.hash);
        assert_eq!(index.get_ack(4, &b.hash).unwrap().hash, b.hash);
    }
}
