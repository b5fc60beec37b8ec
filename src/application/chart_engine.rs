// Chart engine - owns the snapshot, axis scales, and sliding windows
use crate::domain::axis::{AxisScale, TickMark};
use crate::domain::chart::{project, ChartWindow, Column, DrawGeometry};
use crate::domain::priority::{class_totals, downstream_values, validate_classes, SnapshotError};
use crate::domain::snapshot::{Direction, Snapshot};
use crate::infrastructure::config::ChartConfig;
use serde::Serialize;

/// Everything the renderer needs for one redraw of both charts.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFrame {
    pub draw_width: u32,
    pub column_width: u32,
    pub draw_height: u32,
    pub sample_interval_ms: u64,
    pub upstream: ChartSurface,
    pub downstream: ChartSurface,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSurface {
    pub max_value: u64,
    pub columns: Vec<Column>,
    pub ticks: Vec<TickMark>,
    pub colors: Vec<String>,
}

#[derive(Debug)]
struct DirectionState {
    direction: Direction,
    window: ChartWindow,
    /// Values displayed by the newest column, the left side of the next one.
    last_values: Vec<u64>,
}

/// The widget's whole mutable state behind two operations: `ingest` folds a
/// freshly polled snapshot into the sliding windows, `frame` derives the
/// render output. Mutation happens only from the polling loop.
#[derive(Debug)]
pub struct ChartEngine {
    config: ChartConfig,
    snapshot: Snapshot,
    geometry: DrawGeometry,
    upstream: DirectionState,
    downstream: DirectionState,
}

impl ChartEngine {
    /// Build the engine from the first polled snapshot, rendering the full
    /// historical series. Fails if a configured priority class references a
    /// queue the snapshot does not carry.
    pub fn new(config: ChartConfig, snapshot: Snapshot) -> Result<Self, SnapshotError> {
        validate_classes(&config.priority_classes, &snapshot)?;
        let mut engine = Self {
            geometry: DrawGeometry::compute(config.max_draw_width, snapshot.num_samples),
            upstream: DirectionState {
                direction: Direction::Upstream,
                window: ChartWindow::new(),
                last_values: class_totals(&config.priority_classes, &snapshot, 0)?,
            },
            downstream: DirectionState {
                direction: Direction::Downstream,
                window: ChartWindow::new(),
                last_values: downstream_values(&snapshot, 0),
            },
            config,
            snapshot,
        };
        engine.rebuild_all()?;
        Ok(engine)
    }

    /// Cadence carried by the latest snapshot; the sample loop sleeps this
    /// long between polls.
    pub fn sample_interval_ms(&self) -> u64 {
        self.snapshot.sample_interval_ms
    }

    /// Fold a new snapshot into the windows.
    ///
    /// While capacity is stable every previously drawn pixel stays valid, so
    /// one column per direction is appended: the transition from the values
    /// last displayed to the new sample. A capacity change invalidates every
    /// projected height, so the windows are rebuilt from the full series.
    pub fn ingest(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let new_up = class_totals(&self.config.priority_classes, &snapshot, 0)?;
        let new_down = downstream_values(&snapshot, 0);

        let capacity_changed = snapshot.upstream != self.snapshot.upstream
            || snapshot.downstream != self.snapshot.downstream;

        if capacity_changed {
            self.snapshot = snapshot;
            self.upstream.last_values = new_up;
            self.downstream.last_values = new_down;
            self.rebuild_all()?;
            return Ok(());
        }

        let max_visible = snapshot.num_samples.saturating_sub(1);
        Self::append_transition(&mut self.upstream, &self.snapshot, &self.config, &new_up, max_visible);
        Self::append_transition(&mut self.downstream, &self.snapshot, &self.config, &new_down, max_visible);
        self.snapshot = snapshot;
        self.upstream.last_values = new_up;
        self.downstream.last_values = new_down;
        Ok(())
    }

    /// Current render output; axis scales are re-derived from the latest
    /// snapshot on every call.
    pub fn frame(&self) -> ChartFrame {
        ChartFrame {
            draw_width: self.geometry.draw_width,
            column_width: self.geometry.column_width,
            draw_height: self.config.draw_height,
            sample_interval_ms: self.snapshot.sample_interval_ms,
            upstream: self.surface(&self.upstream, self.config.class_colors()),
            downstream: self.surface(&self.downstream, self.config.downstream_colors.clone()),
        }
    }

    fn surface(&self, state: &DirectionState, colors: Vec<String>) -> ChartSurface {
        let scale = self.axis_scale(&state.direction);
        ChartSurface {
            max_value: scale.max_value,
            columns: state.window.columns().cloned().collect(),
            ticks: scale.tick_marks(self.config.tick_count, self.config.draw_height),
            colors,
        }
    }

    fn axis_scale(&self, direction: &Direction) -> AxisScale {
        AxisScale::compute(
            self.snapshot.capacity(direction),
            self.config.draw_height,
            self.config.min_label_gap,
        )
    }

    fn direction_values(&self, direction: &Direction, idx: usize) -> Result<Vec<u64>, SnapshotError> {
        match direction {
            Direction::Upstream => class_totals(&self.config.priority_classes, &self.snapshot, idx),
            Direction::Downstream => Ok(downstream_values(&self.snapshot, idx)),
        }
    }

    fn append_transition(
        state: &mut DirectionState,
        snapshot: &Snapshot,
        config: &ChartConfig,
        new_values: &[u64],
        max_visible: usize,
    ) {
        if state.last_values.is_empty() {
            return;
        }
        let capacity = snapshot.capacity(&state.direction);
        let scale = AxisScale::compute(capacity, config.draw_height, config.min_label_gap);
        let left = scale_heights(&state.last_values, capacity, &scale, config.draw_height);
        let right = scale_heights(new_values, capacity, &scale, config.draw_height);
        state.window.push(Column::from_heights(&left, &right), max_visible);
    }

    /// Full redraw: recompute the draw geometry and rebuild every column of
    /// both windows from the historical series, oldest transition first.
    fn rebuild_all(&mut self) -> Result<(), SnapshotError> {
        self.geometry = DrawGeometry::compute(self.config.max_draw_width, self.snapshot.num_samples);
        for direction in [Direction::Upstream, Direction::Downstream] {
            let capacity = self.snapshot.capacity(&direction);
            let scale = self.axis_scale(&direction);
            let heights: Vec<Vec<u32>> = (0..self.snapshot.num_samples)
                .map(|idx| {
                    Ok(scale_heights(
                        &self.direction_values(&direction, idx)?,
                        capacity,
                        &scale,
                        self.config.draw_height,
                    ))
                })
                .collect::<Result<_, SnapshotError>>()?;
            // index 0 is the newest sample: walk from the oldest pair in
            let columns = (1..self.snapshot.num_samples)
                .rev()
                .map(|idx| Column::from_heights(&heights[idx], &heights[idx - 1]))
                .collect();
            match direction {
                Direction::Upstream => self.upstream.window.rebuild(columns),
                Direction::Downstream => self.downstream.window.rebuild(columns),
            }
        }
        Ok(())
    }
}

fn scale_heights(values: &[u64], capacity: u64, scale: &AxisScale, draw_height: u32) -> Vec<u32> {
    values
        .iter()
        .map(|&v| project(v, capacity, scale.max_value, draw_height))
        .collect()
}
