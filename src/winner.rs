use crate::entries::{Entry, EntrySet};
use crate::error::{DrawError, Result};
use std::f64::consts::{PI, TAU};

/// The selection pointer sits at the top of the wheel, fixed while the wheel
/// turns underneath it. Wheel angles live in a y-down frame (the web-canvas
/// convention), so "top" is 3π/2 in the wheel's unrotated frame.
pub const POINTER_ANGLE: f64 = 3.0 * PI / 2.0;

/// Maps the final rotation back to the slice under the pointer. The wheel
/// turned by `final_rotation` while the pointer stayed put, so the winning
/// slice is the one whose unrotated angle is `3π/2 - final_rotation`, reduced
/// into [0, 2π). Pure and total for any non-empty pool and any angle, which
/// is what lets a contested draw be replayed.
pub fn resolve(entries: &EntrySet, final_rotation: f64) -> Result<&Entry> {
    if entries.is_empty() {
        return Err(DrawError::ResolveOnEmpty);
    }
    let pointer_angle = (POINTER_ANGLE - final_rotation).rem_euclid(TAU);
    let arc = TAU / entries.len() as f64;
    // rounding can push the quotient to exactly len; clamp back onto the pool
    let index = ((pointer_angle / arc) as usize).min(entries.len() - 1);
    Ok(&entries[index])
}
