//! Minimum-interval throttle with an explicit force override.
//!
//! Used for both the progress event rate and persistence writes. A forced
//! acquisition always succeeds and restarts the window.

#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: u64,
    last: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// True when a call at `now` would be allowed.
    pub fn is_open(&self, now: u64) -> bool {
        match self.last {
            None => true,
            // A clock that stepped backwards reopens the window.
            Some(last) if now < last => true,
            Some(last) => now - last >= self.interval_ms,
        }
    }

    /// Take the slot if the window is open.
    pub fn try_acquire(&mut self, now: u64) -> bool {
        if self.is_open(now) {
            self.last = Some(now);
            true
        } else {
            false
        }
    }

    /// Take the slot unconditionally and restart the window at `now`.
    pub fn force(&mut self, now: u64) {
        self.last = Some(now);
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
