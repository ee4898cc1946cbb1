//! Multi-key query tracking for the chainql block pipeline.
#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chainql/chainql/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// Chain height. Zero doubles as the before-genesis barrier sentinel.
pub type Height = i32;

mod error;
pub use error::QueryIndexError;

mod index;
pub use index::QueryIndex;

mod multi;
pub use multi::MultiIndex;

mod tracker;

mod traits;
pub use traits::{AckHeader, BlockQueries, ResponseHeader};
