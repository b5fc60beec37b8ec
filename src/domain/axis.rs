// Y-axis scaling - decade-rounded tick derivation and label formatting
use crate::domain::chart::project;
use serde::Serialize;

/// Axis scale for one chart direction, recomputed from the latest snapshot
/// before every redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisScale {
    /// The capacity driving the projector, floored at 1.
    pub max_value: u64,
    /// Largest round tick below `max_value`, a multiple of the chosen decade.
    pub max_tick: u64,
}

impl AxisScale {
    /// Derive the scale from a capacity.
    ///
    /// The decade search starts at 100 kbit and divides by ten until it no
    /// longer exceeds `max_value`; `max_tick` rounds `max_value` down to a
    /// multiple of that decade. The legibility loop then walks `max_tick`
    /// down one decade at a time while its projected gridline sits closer
    /// than `min_label_gap` pixels to the axis top, so the topmost label
    /// never collides with the maximum label.
    pub fn compute(capacity: u64, draw_height: u32, min_label_gap: u32) -> Self {
        let max_value = capacity.max(1);
        if max_value == 1 {
            // no traffic or unset capacity: flat axis, single baseline tick
            return Self { max_value: 1, max_tick: 0 };
        }
        let mut d = 100_000u64;
        while max_value < d {
            d /= 10;
        }
        let mut max_tick = max_value / d * d;
        let top = project(max_value, capacity, max_value, draw_height);
        while max_tick > 0 && top - project(max_tick, capacity, max_value, draw_height) < min_label_gap {
            max_tick -= d;
        }
        Self { max_value, max_tick }
    }

    /// Labeled gridlines, bottom offsets in pixels. The top entry carries
    /// the axis maximum; below it `tick_count` equal steps of
    /// `max_tick / tick_count` plus the zero baseline.
    pub fn tick_marks(&self, tick_count: u32, draw_height: u32) -> Vec<TickMark> {
        if self.max_value <= 1 {
            return vec![TickMark { bottom_px: 0, label: dotted_kilobits(0) }];
        }
        let steps = u64::from(tick_count.max(1));
        let mut marks = Vec::with_capacity(tick_count as usize + 2);
        marks.push(TickMark {
            bottom_px: draw_height,
            label: dotted_kilobits(self.max_value),
        });
        for i in 0..=steps {
            let value = i * self.max_tick / steps;
            marks.push(TickMark {
                bottom_px: (u64::from(draw_height) * value / self.max_value) as u32,
                label: dotted_kilobits(value),
            });
        }
        marks
    }
}

/// One labeled gridline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickMark {
    pub bottom_px: u32,
    pub label: String,
}

/// Format a bits/sec value as kilobits with `.`-separated thousands groups,
/// e.g. 5_743_000 -> "5.743".
pub fn dotted_kilobits(bits: u64) -> String {
    let mut z = bits / 1000;
    let mut groups = Vec::new();
    while z > 999 {
        groups.push(format!("{:03}", z % 1000));
        z /= 1000;
    }
    groups.push(z.to_string());
    groups.reverse();
    groups.join(".")
}
