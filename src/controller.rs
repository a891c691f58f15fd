use crate::entries::{self, Entry, EntrySet};
use crate::error::{DrawError, Result};
use crate::leaderboard::{self, Leaderboard};
use crate::spin::{self, SpinJob};
use crate::winner;
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info};

/// Lifecycle of a draw. `Idle` covers both "no data" and "day with zero
/// qualifying entries"; the spin action is inert in either case.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Ready,
    Spinning,
    Resolved,
}

/// Owns the wheel state and enforces the draw lifecycle:
/// Idle -> Ready -> Spinning -> Resolved -> Ready (dismiss) or Idle (reload).
/// The entry pool is built once per day selection and never mutated during a
/// spin; rotation is mutated only by `frame` while a job is active.
pub struct DrawController {
    leaderboard: Option<Leaderboard>,
    selected_day: Option<u32>,
    entries: EntrySet,
    rotation: f64,
    phase: Phase,
    job: Option<SpinJob>,
    winner: Option<Entry>,
}

impl Default for DrawController {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawController {
    pub fn new() -> Self {
        DrawController {
            leaderboard: None,
            selected_day: None,
            entries: Vec::new(),
            rotation: 0.0,
            phase: Phase::Idle,
            job: None,
            winner: None,
        }
    }

    /// Loading data always resets the wheel and atomically discards any
    /// in-flight spin job; a frame callback that fires afterwards is a no-op.
    pub fn set_leaderboard(&mut self, leaderboard: Leaderboard) {
        info!(members = leaderboard.members.len(), "leaderboard loaded");
        self.leaderboard = Some(leaderboard);
        self.selected_day = None;
        self.entries.clear();
        self.rotation = 0.0;
        self.phase = Phase::Idle;
        self.job = None;
        self.winner = None;
    }

    /// Rebuilds the entry pool for `day`. A day with no qualifying entries
    /// leaves the controller in `Idle` with an empty pool.
    pub fn select_day<R: Rng + ?Sized>(&mut self, day: u32, rng: &mut R) {
        self.job = None;
        self.winner = None;
        self.rotation = 0.0;
        let Some(leaderboard) = &self.leaderboard else {
            self.entries.clear();
            self.phase = Phase::Idle;
            return;
        };
        self.selected_day = Some(day);
        self.entries = entries::build_entries(leaderboard, day, rng);
        self.phase = if self.entries.is_empty() {
            Phase::Idle
        } else {
            Phase::Ready
        };
        info!(day, entries = self.entries.len(), "entry pool built");
    }

    /// Starts a spin. Accepted only from `Ready`; while `Spinning` the
    /// request is rejected as `SpinAlreadyActive` (for the caller to log,
    /// not to crash on); from `Idle` or `Resolved` it is a quiet no-op.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Instant) -> Result<()> {
        match self.phase {
            Phase::Spinning => Err(DrawError::SpinAlreadyActive),
            Phase::Ready => {
                let job = spin::start_spin(self.rotation, rng, now);
                debug!(
                    target_rotation = job.target_rotation,
                    duration_ms = job.duration.as_millis() as u64,
                    "spin started"
                );
                self.job = Some(job);
                self.phase = Phase::Spinning;
                Ok(())
            }
            Phase::Idle | Phase::Resolved => Ok(()),
        }
    }

    /// Per-frame step, called by the host's frame tick with non-decreasing
    /// times. Returns the winner on the frame that completes the spin. When
    /// no job is active (including a job discarded by a reset racing a stale
    /// callback) this does nothing.
    pub fn frame(&mut self, now: Instant) -> Result<Option<Entry>> {
        let Some(job) = self.job else {
            return Ok(None);
        };
        let (rotation, done) = spin::advance(&job, now);
        self.rotation = rotation;
        if !done {
            return Ok(None);
        }
        self.job = None;
        let winner = winner::resolve(&self.entries, rotation)?.clone();
        info!(winner = %winner.name, rotation, "spin resolved");
        self.winner = Some(winner.clone());
        self.phase = Phase::Resolved;
        Ok(Some(winner))
    }

    /// Dismissing the winner keeps the same pool (draw with replacement), so
    /// a disputed draw can be re-spun without rebuilding the entries.
    pub fn dismiss(&mut self) {
        if self.phase == Phase::Resolved {
            self.winner = None;
            self.phase = Phase::Ready;
        }
    }

    pub fn available_days(&self) -> Vec<u32> {
        self.leaderboard
            .as_ref()
            .map(leaderboard::available_days)
            .unwrap_or_default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn entries(&self) -> &EntrySet {
        &self.entries
    }

    pub fn selected_day(&self) -> Option<u32> {
        self.selected_day
    }

    pub fn winner(&self) -> Option<&Entry> {
        self.winner.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.leaderboard.is_some()
    }
}
