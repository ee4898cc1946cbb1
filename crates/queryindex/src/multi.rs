//! Triple-keyed index of query trackers at a single height.

use std::collections::HashMap;

use alloy_primitives::B256;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    error::QueryIndexError,
    tracker::{BlockSlot, QueryTracker, RequestTracker, TrackerId},
    traits::{AckHeader, ResponseHeader},
};

/// Index of every query tracked at one chain height.
///
/// Trackers live in an arena shared by the response-hash, ack-hash, and
/// sequence-number maps. One mutex serializes every operation for its
/// whole duration.
#[derive(Debug)]
pub struct MultiIndex<A: AckHeader> {
    inner: Mutex<Inner<A>>,
}

#[derive(Debug)]
struct Inner<A: AckHeader> {
    arena: Vec<RequestTracker<A>>,
    by_resp: HashMap<B256, TrackerId>,
    by_ack: HashMap<B256, TrackerId>,
    by_seq: HashMap<u64, QueryTracker>,
}

impl<A: AckHeader> MultiIndex<A> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                arena: Vec::new(),
                by_resp: HashMap::new(),
                by_ack: HashMap::new(),
                by_seq: HashMap::new(),
            }),
        }
    }

    /// Indexes a responded query.
    ///
    /// A response already indexed under the same header hash is overwritten
    /// in place to allow key rotation.
    pub fn add_response(&self, resp: A::Response) {
        let inner = &mut *self.inner.lock();
        let resp_hash = resp.header_hash();
        if let Some(&id) = inner.by_resp.get(&resp_hash) {
            inner.arena[id.0].response = resp;
            return;
        }
        let seq_no = resp.request_seq_no();
        let id = TrackerId(inner.arena.len());
        inner.arena.push(RequestTracker::from_response(resp));
        inner.by_resp.insert(resp_hash, id);
        inner.by_seq.entry(seq_no).or_default().trackers.push(id);
    }

    /// Indexes an acknowledged query.
    ///
    /// The acknowledgement is indexed under its own header hash even when
    /// it loses a conflict, so it stays findable. The first acknowledgement
    /// for a sequence number becomes the canonical one.
    pub fn add_ack(&self, ack: A) -> Result<(), QueryIndexError> {
        let inner = &mut *self.inner.lock();
        let ack_hash = ack.header_hash();
        let resp_hash = ack.response_header_hash();
        let seq_no = ack.request_seq_no();

        let id = match inner.by_resp.get(&resp_hash).copied() {
            Some(id) => {
                // Index by ack hash first so the tracker stays findable even
                // when an earlier acknowledgement already won.
                inner.by_ack.insert(ack_hash, id);
                if inner.arena[id.0].update_ack(ack)? {
                    inner.by_seq.entry(seq_no).or_default().trackers.push(id);
                }
                id
            }
            None => {
                let id = TrackerId(inner.arena.len());
                inner.arena.push(RequestTracker::from_ack(ack));
                inner.by_resp.insert(resp_hash, id);
                inner.by_ack.insert(ack_hash, id);
                inner.by_seq.entry(seq_no).or_default().trackers.push(id);
                id
            }
        };

        let query = inner.by_seq.entry(seq_no).or_default();
        match query.first_ack {
            None => {
                query.first_ack = Some(id);
                Ok(())
            }
            Some(first) => {
                let Some(first_ack) = inner.arena[first.0].ack.as_ref() else {
                    return Err(QueryIndexError::CorruptedIndex);
                };
                if first_ack.header_hash() == ack_hash {
                    Ok(())
                } else {
                    Err(QueryIndexError::MultipleAckOfSeqNo)
                }
            }
        }
    }

    /// Records the block that packaged an acknowledgement. Unknown hashes
    /// are ignored.
    pub fn set_signed_block(&self, block_hash: B256, ack_hash: B256) {
        let inner = &mut *self.inner.lock();
        if let Some(&id) = inner.by_ack.get(&ack_hash) {
            inner.arena[id.0].slot = BlockSlot::Signed(block_hash);
        }
    }

    /// The acknowledgement indexed under the given header hash, if any.
    pub fn get_ack(&self, ack_hash: &B256) -> Option<A> {
        let inner = self.inner.lock();
        let id = inner.by_ack.get(ack_hash)?;
        inner.arena[id.0].ack.clone()
    }

    /// Reserves every unclaimed first acknowledgement and appends its
    /// header hash to `out`.
    ///
    /// Reserved slots are skipped, so a claim happens at most once.
    pub fn mark_and_collect_unsigned_acks(&self, out: &mut Vec<B256>) {
        let inner = &mut *self.inner.lock();
        for query in inner.by_seq.values() {
            let Some(first) = query.first_ack else {
                continue;
            };
            let tracker = &mut inner.arena[first.0];
            if tracker.slot != BlockSlot::Unsigned {
                continue;
            }
            if let Some(ack) = &tracker.ack {
                tracker.slot = BlockSlot::Reserved;
                out.push(ack.header_hash());
            }
        }
    }

    /// Validates an acknowledgement claimed by the block `block_hash`.
    ///
    /// Returns false when the acknowledgement is unknown here. A query
    /// already bound to a different block, or reserved by a local producer,
    /// is a conflict. When the local first acknowledgement differs but was
    /// never packaged, the claimed one is promoted in its place.
    pub fn check_ack_from_block(
        &self,
        block_hash: B256,
        ack_hash: B256,
    ) -> Result<bool, QueryIndexError> {
        let inner = &mut *self.inner.lock();
        let Some(&id) = inner.by_ack.get(&ack_hash) else {
            return Ok(false);
        };

        let tracker = &inner.arena[id.0];
        match tracker.slot {
            BlockSlot::Unsigned => {}
            BlockSlot::Reserved => return Err(QueryIndexError::QuerySignedByAnotherBlock),
            BlockSlot::Signed(existing) if existing != block_hash => {
                return Err(QueryIndexError::QuerySignedByAnotherBlock);
            }
            BlockSlot::Signed(_) => {}
        }

        let Some(ack) = tracker.ack.as_ref() else {
            return Err(QueryIndexError::CorruptedIndex);
        };
        let seq_no = ack.request_seq_no();
        if inner.by_resp.get(&tracker.response.header_hash()) != Some(&id) {
            return Err(QueryIndexError::CorruptedIndex);
        }
        let Some(query) = inner.by_seq.get_mut(&seq_no) else {
            return Err(QueryIndexError::CorruptedIndex);
        };
        let Some(first) = query.first_ack else {
            return Err(QueryIndexError::CorruptedIndex);
        };

        if first != id {
            if inner.arena[first.0].slot.is_signed() {
                return Err(QueryIndexError::QuerySignedByAnotherBlock);
            }
            // The local first acknowledgement was never packaged, so the one
            // this block carries wins.
            trace!(seq_no, "promoting first acknowledgement");
            query.first_ack = Some(id);
        }

        Ok(true)
    }

    /// Scans the index right before expiry and reports unacknowledged and
    /// never-packaged queries.
    pub fn check_before_expire(&self) {
        let inner = &*self.inner.lock();
        for (&seq_no, query) in &inner.by_seq {
            match query.first_ack {
                None => {
                    debug!(seq_no, "query expired without acknowledgement");
                }
                Some(first) => {
                    if !inner.arena[first.0].slot.is_signed() {
                        warn!(seq_no, "acknowledged query expired without block inclusion");
                    }
                }
            }
            let competing = query.trackers.len();
            if competing > 1 {
                trace!(seq_no, competing, "query had competing trackers");
            }
        }
    }

    /// Number of request trackers held by the index.
    pub fn len(&self) -> usize {
        self.inner.lock().arena.len()
    }

    /// Returns true if nothing is tracked at this height.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().arena.is_empty()
    }
}

impl<A: AckHeader> Default for MultiIndex<A> {
    fn default() -> Self {
        Self::new()
    }
}
