// Connection control - disconnect/reconnect with a temporary cadence
// override for fast state-change feedback
use crate::application::snapshot_source::SnapshotSource;
use crate::infrastructure::config::MonitorSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Clone)]
pub struct ConnectionService {
    source: Arc<dyn SnapshotSource>,
    cadence: watch::Sender<Duration>,
    normal: Duration,
    fast: Duration,
    reconnect_delay: Duration,
    grace: Duration,
}

impl ConnectionService {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        settings: &MonitorSettings,
    ) -> (Self, watch::Receiver<Duration>) {
        let normal = Duration::from_millis(settings.table_refresh_ms);
        let (cadence, receiver) = watch::channel(normal);
        let service = Self {
            source,
            cadence,
            normal,
            fast: Duration::from_millis(settings.fast_refresh_ms),
            reconnect_delay: Duration::from_millis(settings.reconnect_delay_ms),
            grace: Duration::from_millis(settings.cadence_grace_ms),
        };
        (service, receiver)
    }

    /// Re-establish the link and restore the normal table cadence.
    pub async fn connect(&self) -> anyhow::Result<()> {
        self.source.connect().await?;
        let _ = self.cadence.send(self.normal);
        Ok(())
    }

    /// Drop the link. The table cadence switches to the fast interval for
    /// quick feedback, a reconnect fires after a short delay, and the
    /// normal cadence comes back after the grace period. Both timers run
    /// even if the router rejects the disconnect action, so the cadence
    /// never stays stuck on the fast interval. Plain timer replacement,
    /// no backoff.
    pub async fn disconnect(&self) -> anyhow::Result<()> {
        let _ = self.cadence.send(self.fast);

        let service = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(service.reconnect_delay).await;
            if let Err(e) = service.connect().await {
                tracing::error!("automatic reconnect failed: {e:#}");
            }
        });

        let service = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(service.grace).await;
            let _ = service.cadence.send(service.normal);
        });

        self.source.disconnect().await
    }
}
