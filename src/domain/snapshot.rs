// Snapshot domain model - one polled measurement set, fully typed
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The router's traffic queues form a closed set fixed by its QoS
/// configuration; names here match the wire/config tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueName {
    Realtime,
    Hrealtime,
    Hprio,
    Important,
    Default,
    Low,
    Ifacectl,
}

impl QueueName {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueName::Realtime => "realtime",
            QueueName::Hrealtime => "hrealtime",
            QueueName::Hprio => "hprio",
            QueueName::Important => "important",
            QueueName::Default => "default",
            QueueName::Low => "low",
            QueueName::Ifacectl => "ifacectl",
        }
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Upstream,
    Downstream,
}

/// One queue's per-sample byte rates, already converted to bits/sec.
#[derive(Debug, Clone)]
pub struct QueueSeries {
    pub enabled: bool,
    pub bps: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Number of historical sample points carried per series (>= 1).
    pub num_samples: usize,
    /// Milliseconds between two adjacent samples.
    pub sample_interval_ms: u64,
    /// Axis ceiling per direction, bits/sec (see capacity policies in
    /// `infrastructure::convert`).
    pub upstream: u64,
    pub downstream: u64,
    pub queues: HashMap<QueueName, QueueSeries>,
    /// Aggregate downstream series, bits/sec. Index 0 is the newest sample.
    pub ds_bps: Vec<u64>,
    /// Aggregate multicast series, bits/sec.
    pub mc_bps: Vec<u64>,
}

impl Snapshot {
    pub fn capacity(&self, direction: &Direction) -> u64 {
        match direction {
            Direction::Upstream => self.upstream,
            Direction::Downstream => self.downstream,
        }
    }
}
