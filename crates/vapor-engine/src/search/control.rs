//! Search control — stop flag and deadline checks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Decides when a search must stop.
///
/// Two limits: the **hard** limit is polled inside the tree (every 2048
/// nodes) and aborts the current depth; the **soft** limit is checked
/// between iterative-deepening depths and stops the driver from starting a
/// depth it cannot finish. The hard limit exceeds the soft limit by a
/// bounded slack, so a depth already started may overshoot the soft budget
/// slightly but never run away.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
}

impl SearchControl {
    /// No time limits: stop only on the external flag (`go infinite`,
    /// depth-limited searches).
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
        }
    }

    /// Timed search; the clock starts immediately.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: Some(soft),
            hard_limit: Some(hard),
        }
    }

    /// Whether the search must abort now.
    ///
    /// The stop flag is honoured on every call; the wall clock is only
    /// consulted every 2048 nodes. When the hard limit fires the flag is
    /// set, so later calls return without reading the clock again.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if nodes & 2047 != 0 {
            return false;
        }
        if let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }
        false
    }

    /// Whether the stop flag is already set (no clock check).
    ///
    /// Once set — externally or by a hard-limit latch — every in-flight
    /// search frame unwinds with a sentinel score.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Whether iterative deepening should refrain from another depth.
    pub fn should_stop_iterating(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        match self.soft_limit {
            Some(soft) => self.elapsed() >= soft,
            None => false,
        }
    }

    /// Whether the next depth is predicted to blow the soft budget.
    ///
    /// Uses the last completed depth's cost scaled by 1.5 as the estimate
    /// for the next one.
    pub fn predicted_overrun(&self, last_depth_cost: Duration) -> bool {
        match self.soft_limit {
            Some(soft) => self.elapsed() + last_depth_cost.mul_f32(1.5) > soft,
            None => false,
        }
    }

    /// Time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The shared stop flag, for the front end's `stop` command.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}
