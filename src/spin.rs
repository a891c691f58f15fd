use rand::Rng;
use std::f64::consts::TAU;
use std::time::{Duration, Instant};

pub const MIN_DURATION_MS: u64 = 3000;
pub const MAX_DURATION_MS: u64 = 5000;
pub const MIN_EXTRA_REVOLUTIONS: f64 = 5.0;
pub const MAX_EXTRA_REVOLUTIONS: f64 = 10.0;

/// One spin in flight. Created by `start_spin`, read by `advance` once per
/// rendered frame, and dropped when the spin resolves or the wheel is reset.
/// Only one job may be active at a time; the controller enforces that.
#[derive(Clone, Copy, Debug)]
pub struct SpinJob {
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub started_at: Instant,
    pub duration: Duration,
}

/// Picks the spin parameters: duration uniform in [3000, 5000] ms, extra
/// travel uniform in [5, 10] whole revolutions, plus a fractional offset
/// uniform in [0, 2π) so the landing angle is not pinned to revolution
/// boundaries.
pub fn start_spin<R: Rng + ?Sized>(current_rotation: f64, rng: &mut R, now: Instant) -> SpinJob {
    let duration = Duration::from_millis(rng.random_range(MIN_DURATION_MS..=MAX_DURATION_MS));
    let extra = rng.random_range(MIN_EXTRA_REVOLUTIONS..MAX_EXTRA_REVOLUTIONS) * TAU;
    let offset = rng.random_range(0.0..TAU);
    SpinJob {
        start_rotation: current_rotation,
        target_rotation: current_rotation + extra + offset,
        started_at: now,
        duration,
    }
}

/// Synchronous O(1) per-frame step: cubic ease-out between start and target.
/// Once the duration has elapsed the rotation is exactly the target, with no
/// residual drift. Callers must not hand in a `now` earlier than the
/// previous frame's; a `now` before `started_at` clamps to progress 0.
pub fn advance(job: &SpinJob, now: Instant) -> (f64, bool) {
    let elapsed = now.saturating_duration_since(job.started_at);
    let progress = (elapsed.as_secs_f64() / job.duration.as_secs_f64()).min(1.0);
    if progress >= 1.0 {
        return (job.target_rotation, true);
    }
    let eased = 1.0 - (1.0 - progress).powi(3);
    let rotation = job.start_rotation + (job.target_rotation - job.start_rotation) * eased;
    (rotation, false)
}
