use std::time::{Duration, Instant};

/// Single-slot debounce timer.
///
/// Scheduling replaces any pending deadline (the superseded timer never fires) and bumps the
/// request generation, which callers use to recognise stale work.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
    generation: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            generation: 0,
        }
    }

    /// Arm (or re-arm) the timer and return the new generation.
    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.deadline = Some(now + self.delay);
        self.generation
    }

    /// Drop the pending deadline, if any. Also invalidates the current generation.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.generation += 1;
    }

    /// Generation of the latest request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` once the pending deadline has passed. Does not disarm; see [`Debouncer::take`].
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Disarm the timer, returning the generation it was armed for.
    pub fn take(&mut self) -> Option<u64> {
        self.deadline.take().map(|_| self.generation)
    }
}

/// One-shot delay before clearing a busy indicator.
#[derive(Debug, Clone)]
pub struct GraceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl GraceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the countdown; a previous countdown is replaced.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once, when the countdown has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Frame-rate cap for an animation loop. `None` interval means every tick is a frame.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    last: Option<Instant>,
}

impl FramePacer {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn set_interval(&mut self, interval: Option<Duration>) {
        self.interval = interval;
    }

    /// Forget the last frame time so the next tick draws immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Whether a frame should be produced at `now`; records it if so.
    pub fn ready(&mut self, now: Instant) -> bool {
        let due = match (self.interval, self.last) {
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            _ => true,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/timing.rs"]
mod tests;
