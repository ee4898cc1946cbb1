//! Per-request and per-query tracking records.

use alloy_primitives::B256;

use crate::{error::QueryIndexError, traits::AckHeader};

/// Handle to a [`RequestTracker`] slot in a `MultiIndex` arena.
///
/// Handle equality is record identity within the issuing index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrackerId(pub(crate) usize);

/// Block assignment state of an acknowledged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum BlockSlot {
    /// No block has claimed the query.
    #[default]
    Unsigned,
    /// A producer reserved the query for a block it is assembling.
    Reserved,
    /// The query is packaged in the block with this hash.
    Signed(B256),
}

impl BlockSlot {
    /// Returns true iff a concrete block hash is recorded.
    pub(crate) const fn is_signed(&self) -> bool {
        matches!(self, Self::Signed(_))
    }
}

/// Tracks one request's response, acknowledgement, and containing block.
#[derive(Debug, Clone)]
pub(crate) struct RequestTracker<A: AckHeader> {
    /// The signed response served for this request.
    pub(crate) response: A::Response,
    /// The client acknowledgement of the response, once received.
    pub(crate) ack: Option<A>,
    /// Which block, if any, has claimed this query.
    pub(crate) slot: BlockSlot,
}

impl<A: AckHeader> RequestTracker<A> {
    pub(crate) fn from_response(response: A::Response) -> Self {
        Self { response, ack: None, slot: BlockSlot::Unsigned }
    }

    pub(crate) fn from_ack(ack: A) -> Self {
        Self { response: ack.signed_response().clone(), ack: Some(ack), slot: BlockSlot::Unsigned }
    }

    /// Records a verified acknowledgement, rebinding `response` to the copy
    /// the first acknowledgement embeds.
    ///
    /// Returns true iff the acknowledgement was newly recorded.
    pub(crate) fn update_ack(&mut self, ack: A) -> Result<bool, QueryIndexError> {
        match &self.ack {
            None => {
                self.response = ack.signed_response().clone();
                self.ack = Some(ack);
                Ok(true)
            }
            Some(existing) if existing.header_hash() == ack.header_hash() => Ok(false),
            Some(_) => Err(QueryIndexError::MultipleAckOfResponse),
        }
    }
}

/// Tracks all competing request trackers for one request sequence number.
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryTracker {
    /// The acknowledgement currently considered canonical for the query.
    pub(crate) first_ack: Option<TrackerId>,
    /// Every tracker sharing this sequence number.
    pub(crate) trackers: Vec<TrackerId>,
}
