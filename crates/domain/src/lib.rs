//! Core domain types for the chainql indexing cores.
#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chainql/chainql/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod block;
pub use block::QueryBlock;

mod query;
pub use query::{SignedAck, SignedResponse};

mod tx;
pub use tx::Transaction;
