// HTTP snapshot source - polls the router's monitor endpoint
use crate::application::snapshot_source::SnapshotSource;
use crate::domain::snapshot::Snapshot;
use crate::infrastructure::convert::{convert_snapshot, RawSnapshot};
use anyhow::{Context, Result};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    endpoint: String,
    session_id: String,
    client: reqwest::Client,
}

impl HttpSnapshotSource {
    pub fn new(endpoint: String, session_id: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            session_id,
            client: reqwest::Client::new(),
        }
    }

    fn action_url(&self, action: &str) -> String {
        format!(
            "{}?sid={}&useajax=1&action={}",
            self.endpoint,
            urlencoding::encode(&self.session_id),
            action
        )
    }

    async fn get(&self, action: &str) -> Result<reqwest::Response> {
        self.client
            .get(self.action_url(action))
            .send()
            .await
            .with_context(|| format!("request for action '{action}' failed"))
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Option<Snapshot>> {
        let response = self.get("get_graphic").await?;
        if !response.status().is_success() {
            tracing::warn!("snapshot fetch returned status {}", response.status());
            return Ok(None);
        }
        match response.json::<RawSnapshot>().await {
            Ok(raw) => Ok(Some(convert_snapshot(&raw))),
            Err(e) => {
                tracing::warn!("snapshot body not parseable: {e}");
                Ok(None)
            }
        }
    }

    async fn fetch_table(&self) -> Result<Option<String>> {
        let response = self.get("get_table").await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.text().await.context("reading table body")?))
    }

    async fn connect(&self) -> Result<()> {
        let response = self.get("connect").await?;
        if !response.status().is_success() {
            anyhow::bail!("connect failed with status {}", response.status());
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let response = self.get("disconnect").await?;
        if !response.status().is_success() {
            anyhow::bail!("disconnect failed with status {}", response.status());
        }
        Ok(())
    }
}
