//! Reveal scheduler.
//!
//! Converts wall-clock time into a number of due reveal ticks. The session's
//! tick function knows nothing about time; this is the only place that does.
//! Frames arrive far less often than the typing interval, so each frame
//! catches up on every tick that came due since the last one.

use std::time::{Duration, Instant};

/// Reveal work owed to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealBudget {
    /// Advance this many characters.
    Steps(u32),
    /// Reveal everything now (zero interval).
    Finish,
}

#[derive(Debug, Clone)]
pub struct RevealClock {
    interval: Duration,
    /// Instant the next tick is counted from; `None` while nothing reveals.
    anchor: Option<Instant>,
}

impl RevealClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            anchor: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    /// Starts counting from `now`. No-op while already running.
    pub fn start(&mut self, now: Instant) {
        if self.anchor.is_none() {
            self.anchor = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.anchor = None;
    }

    /// Returns the work that came due up to `now`, if any.
    ///
    /// Consumed ticks move the anchor forward by whole intervals so the
    /// remainder carries over to the next call.
    pub fn due(&mut self, now: Instant) -> Option<RevealBudget> {
        let anchor = self.anchor?;
        if self.interval.is_zero() {
            return Some(RevealBudget::Finish);
        }

        let elapsed = now.saturating_duration_since(anchor);
        let steps = elapsed.as_nanos() / self.interval.as_nanos();
        if steps == 0 {
            return None;
        }
        let steps = u32::try_from(steps).unwrap_or(u32::MAX);
        self.anchor = Some(
            self.interval
                .checked_mul(steps)
                .and_then(|consumed| anchor.checked_add(consumed))
                .unwrap_or(now),
        );
        Some(RevealBudget::Steps(steps))
    }
}
