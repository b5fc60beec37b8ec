// Column projection and the sliding chart window
use serde::Serialize;
use std::collections::VecDeque;

/// Project a bits/sec magnitude onto the drawing area.
///
/// The magnitude is clamped to the direction's capacity first: samples can
/// transiently exceed the advertised rate through burst accounting, and the
/// chart must never draw past the axis top.
pub fn project(value: u64, capacity: u64, max_value: u64, draw_height: u32) -> u32 {
    let clamped = value.min(capacity);
    (u64::from(draw_height) * clamped / max_value.max(1)) as u32
}

/// Which side of a cell carries the delta wedge. `Right` means the new
/// value is larger than the previously displayed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSide {
    Left,
    Right,
}

/// One series inside a column: a solid fill up to the smaller of the two
/// displayed values, and a bordered wedge covering the change between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCell {
    pub fill_px: u32,
    pub delta_px: u32,
    pub delta_side: DeltaSide,
}

impl ColumnCell {
    pub fn new(left_px: u32, right_px: u32) -> Self {
        Self {
            fill_px: left_px.min(right_px),
            delta_px: left_px.abs_diff(right_px),
            delta_side: if left_px < right_px { DeltaSide::Right } else { DeltaSide::Left },
        }
    }
}

/// One rendered time slot: the transition between two adjacent samples,
/// one cell per series. Left is the older sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub cells: Vec<ColumnCell>,
}

impl Column {
    pub fn from_heights(left: &[u32], right: &[u32]) -> Self {
        let cells = left
            .iter()
            .zip(right.iter())
            .map(|(&l, &r)| ColumnCell::new(l, r))
            .collect();
        Self { cells }
    }
}

/// Column width and total draw width derived from the sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawGeometry {
    pub draw_width: u32,
    pub column_width: u32,
}

impl DrawGeometry {
    /// Fit `num_samples - 1` integer-width columns into at most
    /// `max_draw_width` pixels, narrowing the total width until no slack
    /// wider than a column remains on the right margin.
    pub fn compute(max_draw_width: u32, num_samples: usize) -> Self {
        let n = num_samples.saturating_sub(1) as u32;
        if n == 0 {
            return Self { draw_width: max_draw_width, column_width: 1 };
        }
        let mut w = max_draw_width;
        let mut c = (w / n).max(1);
        while c > 1 && n * c < w {
            w -= 1;
            c = (w / n).max(1);
        }
        Self { draw_width: w, column_width: c }
    }
}

/// Fixed-capacity sliding window of rendered columns, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ChartWindow {
    columns: VecDeque<Column>,
}

impl ChartWindow {
    pub fn new() -> Self {
        Self { columns: VecDeque::new() }
    }

    /// Append one column, evicting from the front so at most `max_visible`
    /// columns remain. A single-sample snapshot has no transitions to show.
    pub fn push(&mut self, column: Column, max_visible: usize) {
        if max_visible == 0 {
            self.columns.clear();
            return;
        }
        while self.columns.len() >= max_visible {
            self.columns.pop_front();
        }
        self.columns.push_back(column);
    }

    /// Replace the whole window (full redraw after a capacity change).
    pub fn rebuild(&mut self, columns: Vec<Column>) {
        self.columns = columns.into();
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}
