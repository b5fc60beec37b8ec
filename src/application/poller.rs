// Polling loops - timer-driven, each reschedules only after its previous
// request completed, so a loop never overlaps itself
use crate::application::chart_engine::ChartEngine;
use crate::application::snapshot_source::SnapshotSource;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Re-fetch the chart snapshot on the cadence carried by the latest
/// snapshot itself. Transport failures skip the cycle and keep the
/// previous state; only a snapshot that violates the priority-class
/// configuration ends the loop, and the caller treats that as fatal.
pub async fn run_sample_loop(
    source: Arc<dyn SnapshotSource>,
    engine: Arc<RwLock<ChartEngine>>,
) -> anyhow::Result<()> {
    loop {
        let interval = Duration::from_millis(engine.read().await.sample_interval_ms());
        tokio::time::sleep(interval).await;
        match source.fetch_snapshot().await {
            Ok(Some(snapshot)) => {
                engine
                    .write()
                    .await
                    .ingest(snapshot)
                    .context("snapshot violates the priority-class configuration")?;
            }
            Ok(None) => {
                tracing::debug!("no usable snapshot this cycle, keeping previous state");
            }
            Err(e) => {
                tracing::warn!("snapshot poll failed: {e:#}");
            }
        }
    }
}

/// Refresh the status-table fragment on an independent cadence. The cadence
/// arrives through a watch channel so a connect/disconnect can replace the
/// timer mid-sleep.
pub async fn run_table_loop(
    source: Arc<dyn SnapshotSource>,
    table: Arc<RwLock<String>>,
    mut cadence: watch::Receiver<Duration>,
) {
    loop {
        let interval = *cadence.borrow();
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = cadence.changed() => {
                if changed.is_err() {
                    return;
                }
                // timer replaced: restart the sleep with the new cadence
                continue;
            }
        }
        match source.fetch_table().await {
            Ok(Some(fragment)) => *table.write().await = fragment,
            Ok(None) => tracing::debug!("table refresh returned no update"),
            Err(e) => tracing::warn!("table refresh failed: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::priority::PriorityClass;
    use crate::domain::snapshot::{QueueName, QueueSeries, Snapshot};
    use crate::infrastructure::config::ChartConfig;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn config() -> ChartConfig {
        ChartConfig {
            max_draw_width: 450,
            draw_height: 110,
            tick_count: 4,
            min_label_gap: 15,
            priority_classes: vec![PriorityClass {
                name: "default".to_string(),
                queues: vec![QueueName::Default],
                color: "#b4e2fe".to_string(),
            }],
            downstream_colors: vec!["#f2cc97".to_string(), "#deb871".to_string()],
        }
    }

    fn snapshot(with_default_queue: bool) -> Snapshot {
        let mut queues = HashMap::new();
        if with_default_queue {
            queues.insert(
                QueueName::Default,
                QueueSeries { enabled: true, bps: vec![8_000, 4_000] },
            );
        }
        Snapshot {
            num_samples: 2,
            sample_interval_ms: 1,
            upstream: 333_000,
            downstream: 5_743_000,
            queues,
            ds_bps: vec![600_000, 500_000],
            mc_bps: vec![0, 0],
        }
    }

    /// A router that stops reporting a queue a priority class depends on.
    struct QueueDroppingSource;

    #[async_trait]
    impl SnapshotSource for QueueDroppingSource {
        async fn fetch_snapshot(&self) -> anyhow::Result<Option<Snapshot>> {
            Ok(Some(snapshot(false)))
        }

        async fn fetch_table(&self) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        async fn connect(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn disconnect(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sample_loop_surfaces_dropped_queue_as_error() {
        let engine = Arc::new(RwLock::new(ChartEngine::new(config(), snapshot(true)).unwrap()));
        let err = run_sample_loop(Arc::new(QueueDroppingSource), engine)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("priority-class"));
    }
}
