// Service configuration loaded from config/*.toml
use crate::domain::priority::PriorityClass;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub monitor: MonitorSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorSettings {
    /// Base URL of the router's monitor endpoint.
    pub endpoint: String,
    pub session_id: String,
    #[serde(default = "default_table_refresh_ms")]
    pub table_refresh_ms: u64,
    /// Temporary cadence while a disconnect/reconnect is in flight.
    #[serde(default = "default_fast_refresh_ms")]
    pub fast_refresh_ms: u64,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Grace period after which the normal table cadence is restored.
    #[serde(default = "default_cadence_grace_ms")]
    pub cadence_grace_ms: u64,
}

fn default_table_refresh_ms() -> u64 {
    30_000
}

fn default_fast_refresh_ms() -> u64 {
    2_000
}

fn default_reconnect_delay_ms() -> u64 {
    6_000
}

fn default_cadence_grace_ms() -> u64 {
    60_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    #[serde(default = "default_max_draw_width")]
    pub max_draw_width: u32,
    #[serde(default = "default_draw_height")]
    pub draw_height: u32,
    #[serde(default = "default_tick_count")]
    pub tick_count: u32,
    /// Minimum pixel gap between the top gridline and the axis maximum.
    #[serde(default = "default_min_label_gap")]
    pub min_label_gap: u32,
    /// Upstream tiers, most privileged first.
    #[serde(default)]
    pub priority_classes: Vec<PriorityClass>,
    /// Colors for the two downstream series (aggregate, multicast).
    #[serde(default)]
    pub downstream_colors: Vec<String>,
}

impl ChartConfig {
    /// Class display colors in class order, for the renderer.
    pub fn class_colors(&self) -> Vec<String> {
        self.priority_classes.iter().map(|c| c.color.clone()).collect()
    }
}

fn default_max_draw_width() -> u32 {
    450
}

fn default_draw_height() -> u32 {
    110
}

fn default_tick_count() -> u32 {
    4
}

fn default_min_label_gap() -> u32 {
    15
}

pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_chart_config() -> anyhow::Result<ChartConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/chart"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::QueueName;

    #[test]
    fn test_chart_config_parses_queue_names() {
        let cfg: ChartConfig = toml::from_str(
            r##"
            downstream_colors = ["#f2cc97", "#deb871"]

            [[priority_classes]]
            name = "realtime"
            queues = ["realtime", "hrealtime"]
            color = "#4d6a9b"

            [[priority_classes]]
            name = "low"
            queues = ["low"]
            color = "#6fa6d6"
            "##,
        )
        .unwrap();

        assert_eq!(cfg.max_draw_width, 450);
        assert_eq!(cfg.draw_height, 110);
        assert_eq!(cfg.tick_count, 4);
        assert_eq!(cfg.min_label_gap, 15);
        assert_eq!(cfg.priority_classes.len(), 2);
        assert_eq!(
            cfg.priority_classes[0].queues,
            vec![QueueName::Realtime, QueueName::Hrealtime]
        );
    }

    #[test]
    fn test_unknown_queue_name_is_rejected() {
        let result: Result<ChartConfig, _> = toml::from_str(
            r##"
            [[priority_classes]]
            name = "bogus"
            queues = ["not_a_queue"]
            color = "#000000"
            "##,
        );
        assert!(result.is_err());
    }
}
