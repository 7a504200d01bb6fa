// ── Snapshot source ──

use std::future::Future;

use tracing::debug;

use stockwatch_api::InventoryClient;

use crate::error::CoreError;
use crate::model::Snapshot;

/// Outcome of one fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Snapshot),
    /// The endpoint answered, but with a non-success status or no body.
    Empty,
    /// Transport failure, or a document without an `updated` token.
    Failed(CoreError),
}

/// Supplies the current availability snapshot on demand.
pub trait SnapshotSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send;
}

impl SnapshotSource for InventoryClient {
    async fn fetch(&self) -> FetchOutcome {
        match InventoryClient::fetch(self).await {
            Ok(Some(doc)) => match Snapshot::try_from(doc) {
                Ok(snapshot) => FetchOutcome::Fetched(snapshot),
                Err(e) => FetchOutcome::Failed(CoreError::Decode {
                    message: e.to_string(),
                }),
            },
            Ok(None) => {
                debug!(url = %self.url(), "inventory endpoint returned no data");
                FetchOutcome::Empty
            }
            Err(e) => FetchOutcome::Failed(e.into()),
        }
    }
}
