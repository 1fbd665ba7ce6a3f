//! Ticket page retrieval
//!
//! [`SnapshotSource`] is the seam between the scheduler and the network:
//! production uses [`fetcher::TicketFetcher`], tests plug in scripted
//! sources. [`fetch_with_retry`] wraps any source with the single retry the
//! check cycle relies on.

pub mod fetcher;
pub mod headers;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;
use crate::utils::retry::{with_retry, RetryConfig};

pub use fetcher::TicketFetcher;

/// Something that can produce a fresh availability snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch and extract the current snapshot; never partial
    async fn fetch(&self) -> Result<Snapshot>;

    /// Page the snapshot comes from, shown in status messages
    fn source_url(&self) -> &str;
}

/// Fetch once, and on failure once more after `retry.delay`
///
/// The second failure is returned unmodified.
pub async fn fetch_with_retry<S>(source: &S, retry: &RetryConfig) -> Result<Snapshot>
where
    S: SnapshotSource + ?Sized,
{
    with_retry(retry, || source.fetch()).await
}
