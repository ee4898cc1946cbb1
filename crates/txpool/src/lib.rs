//! Nonce-ordered transaction staging for chainql block producers.
#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chainql/chainql/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod entries;
pub use entries::AccountEntries;

mod error;
pub use error::TxPoolError;

mod pool;
pub use pool::TxPool;

mod traits;
pub use traits::PoolTransaction;
