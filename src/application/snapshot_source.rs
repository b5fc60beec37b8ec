// Source trait for the router's monitor endpoint
use crate::domain::snapshot::Snapshot;
use async_trait::async_trait;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch and decode the current chart snapshot. `Ok(None)` means the
    /// transport answered but without a usable snapshot (non-success status
    /// or unparsable body); the caller keeps its previous state and stays on
    /// cadence.
    async fn fetch_snapshot(&self) -> anyhow::Result<Option<Snapshot>>;

    /// Fetch the rendered status-table fragment.
    async fn fetch_table(&self) -> anyhow::Result<Option<String>>;

    /// Ask the router to re-establish the link.
    async fn connect(&self) -> anyhow::Result<()>;

    /// Ask the router to drop the link.
    async fn disconnect(&self) -> anyhow::Result<()>;
}
