//! Training sample persistence for Cursive
//!
//! Local-first: every write lands in the in-memory cache immediately and is
//! queued for remote sync; reads prefer the remote copy when it answers
//! within a bounded timeout and fall back to the cache silently otherwise.
//! Remote trouble is never a user-visible error.

mod remote;
mod store;

pub use remote::{MemoryRemote, RemoteSampleStore};
pub use store::SampleStore;

use thiserror::Error;

/// Remote sync failure. Logged and absorbed; queued writes stay queued for
/// retry and reads fall back to the local cache.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote store unreachable: {0}")]
    Unreachable(String),

    #[error("remote request timed out")]
    Timeout,
}
