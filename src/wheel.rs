use crate::entries::EntrySet;
use std::f64::consts::TAU;

/// Fraction of the wheel radius at which slice labels sit.
pub const LABEL_RADIUS: f64 = 0.75;

/// One drawable wedge of the wheel, in a unit-radius frame centered on the
/// origin. Angles are radians from the positive x-axis in a y-down frame
/// (the web-canvas convention; painters flip y for y-up targets), with the
/// wheel rotation already applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub start: f64,
    pub end: f64,
    pub color_index: usize,
    pub label: String,
    /// Label anchor at the arc midpoint, 75% of the way out.
    pub label_at: (f64, f64),
    /// Angle to align the label radially.
    pub label_angle: f64,
}

/// Pure geometry for one frame: entry `i` owns the half-open arc
/// `[i*arc, (i+1)*arc)` in the wheel's own frame, and the whole wheel is
/// turned by `rotation` before placement. The same `(entries, rotation)`
/// pair always yields identical slices, so frames can be compared in tests
/// by boundary angle rather than pixels. An empty pool renders nothing.
pub fn slices(entries: &EntrySet, rotation: f64) -> Vec<Slice> {
    if entries.is_empty() {
        return Vec::new();
    }
    let arc = TAU / entries.len() as f64;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let start = rotation + i as f64 * arc;
            let mid = start + arc / 2.0;
            Slice {
                start,
                end: start + arc,
                color_index: entry.color_index,
                label: entry.name.clone(),
                label_at: (mid.cos() * LABEL_RADIUS, mid.sin() * LABEL_RADIUS),
                label_angle: mid,
            }
        })
        .collect()
}
