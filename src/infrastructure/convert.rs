// Sample conversion - the single boundary where the router's string-typed
// wire fields become typed numbers and booleans
use crate::domain::snapshot::{QueueName, QueueSeries, Snapshot};
use serde::Deserialize;
use std::collections::HashMap;

// Fallback link rates (bits/sec) for capacity-negotiated technologies whose
// negotiated-rate field parses to 0.
const UMTS_FALLBACK_UPSTREAM: u64 = 384_000;
const UMTS_FALLBACK_DOWNSTREAM: u64 = 3_600_000;
const ATA_FALLBACK_UPSTREAM: u64 = 2_000_000;
const ATA_FALLBACK_DOWNSTREAM: u64 = 30_000_000;

const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 5;

/// A per-queue wire record. Only records carrying an `enabled` field are
/// queues; anything else on the wire is a scalar and ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQueue {
    #[serde(default)]
    pub enabled: Option<String>,
    #[serde(default, rename = "currentBps")]
    pub current_bps: String,
}

/// The snapshot exactly as the router transport encodes it: every scalar a
/// string, every queue an optional record keyed by its wire name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSnapshot {
    pub upstream: String,
    pub downstream: String,
    #[serde(rename = "maxUS")]
    pub max_us: String,
    #[serde(rename = "maxDS")]
    pub max_ds: String,
    #[serde(rename = "numSamples")]
    pub num_samples: String,
    #[serde(rename = "sampleInterval")]
    pub sample_interval: String,
    #[serde(rename = "dsCurrentBps")]
    pub ds_current_bps: String,
    #[serde(rename = "mcCurrentBps")]
    pub mc_current_bps: String,
    pub umts: String,
    pub ata: String,
    pub shapedrate_in_gui: String,
    pub shapedrate_us: String,
    pub shapedrate_ds: String,
    pub realtime: Option<RawQueue>,
    pub hrealtime: Option<RawQueue>,
    pub hprio: Option<RawQueue>,
    pub important: Option<RawQueue>,
    #[serde(rename = "default")]
    pub default_queue: Option<RawQueue>,
    pub low: Option<RawQueue>,
    pub ifacectl: Option<RawQueue>,
}

impl RawSnapshot {
    fn queue_records(&self) -> [(QueueName, Option<&RawQueue>); 7] {
        [
            (QueueName::Realtime, self.realtime.as_ref()),
            (QueueName::Hrealtime, self.hrealtime.as_ref()),
            (QueueName::Hprio, self.hprio.as_ref()),
            (QueueName::Important, self.important.as_ref()),
            (QueueName::Default, self.default_queue.as_ref()),
            (QueueName::Low, self.low.as_ref()),
            (QueueName::Ifacectl, self.ifacectl.as_ref()),
        ]
    }
}

/// Lenient integer parse: malformed or empty input coerces to 0.
fn parse_num(field: &str) -> u64 {
    field.trim().parse().unwrap_or(0)
}

/// Split a comma-separated byte-rate list and convert each entry to
/// bits/sec. Unparsable entries coerce to 0.
pub fn bps_to_int_array(raw: &str) -> Vec<u64> {
    raw.split(',').map(|entry| parse_num(entry) * 8).collect()
}

/// Capacity per direction from three mutually exclusive policies:
/// 1. shaped-rate override configured in the GUI,
/// 2. capacity-negotiated link technology (UMTS/ATA) with a 10% headroom
///    over the negotiated rate and technology-specific fallbacks,
/// 3. the raw advertised rates.
fn derive_capacities(raw: &RawSnapshot) -> (u64, u64) {
    let advertised_up = parse_num(&raw.upstream);
    let advertised_down = parse_num(&raw.downstream);

    if raw.shapedrate_in_gui == "1" {
        return (
            advertised_up.min(1000 * parse_num(&raw.shapedrate_us)),
            advertised_down.min(1000 * parse_num(&raw.shapedrate_ds)),
        );
    }

    if raw.umts == "1" || raw.ata == "1" {
        let (fallback_up, fallback_down) = if raw.ata == "1" {
            (ATA_FALLBACK_UPSTREAM, ATA_FALLBACK_DOWNSTREAM)
        } else {
            (UMTS_FALLBACK_UPSTREAM, UMTS_FALLBACK_DOWNSTREAM)
        };
        let negotiated_up = match 8 * parse_num(&raw.max_us) {
            0 => fallback_up,
            rate => rate,
        };
        let negotiated_down = match 8 * parse_num(&raw.max_ds) {
            0 => fallback_down,
            rate => rate,
        };
        return (
            10_000u64.max(11 * negotiated_up / 10),
            10_000u64.max(11 * negotiated_down / 10),
        );
    }

    (advertised_up, advertised_down)
}

/// Decode a wire snapshot into the typed domain model. This never fails:
/// data-shape problems degrade to zeros and empty series; only the
/// transport layer can reject a snapshot outright.
pub fn convert_snapshot(raw: &RawSnapshot) -> Snapshot {
    let (upstream, downstream) = derive_capacities(raw);

    let mut queues = HashMap::new();
    for (name, record) in raw.queue_records() {
        if let Some(record) = record {
            // a record without an `enabled` field is not a queue
            if let Some(enabled) = &record.enabled {
                queues.insert(
                    name,
                    QueueSeries {
                        enabled: enabled == "1",
                        bps: bps_to_int_array(&record.current_bps),
                    },
                );
            }
        }
    }

    let interval_secs = match parse_num(&raw.sample_interval) {
        0 => DEFAULT_SAMPLE_INTERVAL_SECS,
        secs => secs,
    };

    Snapshot {
        num_samples: parse_num(&raw.num_samples).max(1) as usize,
        sample_interval_ms: 1000 * interval_secs,
        upstream,
        downstream,
        queues,
        ds_bps: bps_to_int_array(&raw.ds_current_bps),
        mc_bps: bps_to_int_array(&raw.mc_current_bps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bps_to_int_array() {
        assert_eq!(bps_to_int_array("0,0,10048,0"), vec![0, 0, 80384, 0]);
        assert_eq!(bps_to_int_array(""), vec![0]);
        assert_eq!(bps_to_int_array("x,,5"), vec![0, 0, 40]);
    }

    #[test]
    fn test_bps_reparse_consistency() {
        let first = bps_to_int_array("1770,2003,2416,2607");
        let bytes: Vec<String> = first.iter().map(|v| (v / 8).to_string()).collect();
        assert_eq!(bps_to_int_array(&bytes.join(",")), first);
    }

    #[test]
    fn test_defaults_for_malformed_scalars() {
        let snap = convert_snapshot(&RawSnapshot::default());
        assert_eq!(snap.num_samples, 1);
        assert_eq!(snap.sample_interval_ms, 5000);
        assert_eq!(snap.upstream, 0);
        assert_eq!(snap.downstream, 0);
        assert!(snap.queues.is_empty());

        let snap = convert_snapshot(&RawSnapshot {
            num_samples: "20".to_string(),
            sample_interval: "7".to_string(),
            ..RawSnapshot::default()
        });
        assert_eq!(snap.num_samples, 20);
        assert_eq!(snap.sample_interval_ms, 7000);
    }

    #[test]
    fn test_capacity_policy_raw_passthrough() {
        // no shaped-rate flag, no technology flags: advertised rates pass
        // through untouched, maxUS plays no role
        let snap = convert_snapshot(&RawSnapshot {
            upstream: "39771".to_string(),
            downstream: "5743000".to_string(),
            max_us: "99999".to_string(),
            ..RawSnapshot::default()
        });
        assert_eq!(snap.upstream, 39771);
        assert_eq!(snap.downstream, 5743000);
    }

    #[test]
    fn test_capacity_policy_shaped_rate() {
        let snap = convert_snapshot(&RawSnapshot {
            upstream: "333000".to_string(),
            downstream: "5743000".to_string(),
            shapedrate_in_gui: "1".to_string(),
            shapedrate_us: "100".to_string(),
            shapedrate_ds: "9999".to_string(),
            ..RawSnapshot::default()
        });
        assert_eq!(snap.upstream, 100_000);
        assert_eq!(snap.downstream, 5_743_000);
    }

    #[test]
    fn test_shaped_rate_takes_precedence_over_technology() {
        let snap = convert_snapshot(&RawSnapshot {
            upstream: "333000".to_string(),
            shapedrate_in_gui: "1".to_string(),
            shapedrate_us: "100".to_string(),
            umts: "1".to_string(),
            ..RawSnapshot::default()
        });
        assert_eq!(snap.upstream, 100_000);
    }

    #[test]
    fn test_capacity_policy_negotiated_rate() {
        let snap = convert_snapshot(&RawSnapshot {
            umts: "1".to_string(),
            max_us: "39771".to_string(),
            max_ds: "501316".to_string(),
            ..RawSnapshot::default()
        });
        // 10% headroom over 8x the negotiated byte rate
        assert_eq!(snap.upstream, 11 * (8 * 39771) / 10);
        assert_eq!(snap.downstream, 11 * (8 * 501316) / 10);
    }

    #[test]
    fn test_negotiated_rate_fallbacks() {
        let umts = convert_snapshot(&RawSnapshot {
            umts: "1".to_string(),
            ..RawSnapshot::default()
        });
        assert_eq!(umts.upstream, 11 * 384_000 / 10);
        assert_eq!(umts.downstream, 11 * 3_600_000 / 10);

        let ata = convert_snapshot(&RawSnapshot {
            ata: "1".to_string(),
            ..RawSnapshot::default()
        });
        assert_eq!(ata.upstream, 11 * 2_000_000 / 10);
        assert_eq!(ata.downstream, 11 * 30_000_000 / 10);
    }

    #[test]
    fn test_queue_detection_requires_enabled_field() {
        let snap = convert_snapshot(&RawSnapshot {
            realtime: Some(RawQueue {
                enabled: Some("1".to_string()),
                current_bps: "0,0,10048,0".to_string(),
            }),
            low: Some(RawQueue {
                enabled: Some("0".to_string()),
                current_bps: "0".to_string(),
            }),
            important: Some(RawQueue {
                enabled: None,
                current_bps: "5,5".to_string(),
            }),
            ..RawSnapshot::default()
        });
        let realtime = &snap.queues[&QueueName::Realtime];
        assert!(realtime.enabled);
        assert_eq!(realtime.bps, vec![0, 0, 80384, 0]);
        assert!(!snap.queues[&QueueName::Low].enabled);
        // no `enabled` field: not a queue at all
        assert!(!snap.queues.contains_key(&QueueName::Important));
    }

    #[test]
    fn test_wire_shape_decodes_from_json() {
        let raw: RawSnapshot = serde_json::from_str(
            r#"{
                "maxUS": "39771",
                "upstream": "333000",
                "numSamples": "4",
                "sampleInterval": "5",
                "downstream": "5743000",
                "shapedrate_in_gui": "0",
                "umts": "0",
                "ata": "0",
                "dsCurrentBps": "75344,73161,84619,135764",
                "mcCurrentBps": "0,0,0,0",
                "important": {"enabled": "1", "currentBps": "1770,2003,2416,2607"},
                "default": {"enabled": "1", "currentBps": "3211,2448,2660,3593"}
            }"#,
        )
        .unwrap();
        let snap = convert_snapshot(&raw);
        assert_eq!(snap.num_samples, 4);
        assert_eq!(snap.upstream, 333000);
        assert_eq!(snap.ds_bps[0], 75344 * 8);
        assert_eq!(snap.queues.len(), 2);
        assert_eq!(snap.queues[&QueueName::Default].bps[3], 3593 * 8);
    }
}
