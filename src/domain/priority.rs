// Priority-class aggregation for the upstream chart
use crate::domain::snapshot::{QueueName, Snapshot};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("priority class '{class}' references queue '{queue}' missing from the snapshot")]
    MissingQueue { class: String, queue: QueueName },
}

/// A named traffic tier. Classes are ordered most-privileged first; member
/// queues must exist in every snapshot (checked by `validate_classes`).
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityClass {
    pub name: String,
    pub queues: Vec<QueueName>,
    pub color: String,
}

/// Configuration-consistency invariant: every queue a class references must
/// be present in the snapshot. Violations are fatal, not per-sample noise.
pub fn validate_classes(classes: &[PriorityClass], snapshot: &Snapshot) -> Result<(), SnapshotError> {
    for class in classes {
        for queue in &class.queues {
            if !snapshot.queues.contains_key(queue) {
                return Err(SnapshotError::MissingQueue {
                    class: class.name.clone(),
                    queue: *queue,
                });
            }
        }
    }
    Ok(())
}

/// Per-class cumulative totals at sample index `idx`.
///
/// Each class first sums its member queues, then a right-to-left fold adds
/// every class into the next more privileged one. The stacked render draws
/// each class as "this tier plus everything above it", so the most
/// privileged bar subsumes all traffic and the overlap math in
/// `domain::chart` produces correct regions.
pub fn class_totals(
    classes: &[PriorityClass],
    snapshot: &Snapshot,
    idx: usize,
) -> Result<Vec<u64>, SnapshotError> {
    let mut totals = Vec::with_capacity(classes.len());
    for class in classes {
        let mut sum = 0u64;
        for queue in &class.queues {
            let series = snapshot.queues.get(queue).ok_or_else(|| SnapshotError::MissingQueue {
                class: class.name.clone(),
                queue: *queue,
            })?;
            sum += series.bps.get(idx).copied().unwrap_or(0);
        }
        totals.push(sum);
    }
    for k in (1..totals.len()).rev() {
        totals[k - 1] += totals[k];
    }
    Ok(totals)
}

/// The downstream chart is not priority-classified: always exactly two raw
/// series, aggregate downstream first, multicast second.
pub fn downstream_values(snapshot: &Snapshot, idx: usize) -> Vec<u64> {
    vec![
        snapshot.ds_bps.get(idx).copied().unwrap_or(0),
        snapshot.mc_bps.get(idx).copied().unwrap_or(0),
    ]
}
