use std::time::{Duration, Instant};

/// Wall clock that turns successive polls into frame deltas.
pub struct Time {
    startup: Instant,
    last_update: Instant,
}

impl Default for Time {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            last_update: now,
        }
    }
}

impl Time {
    /// Time since the previous call (or since creation).
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_update;
        self.last_update = now;
        delta
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.startup.elapsed().as_secs_f32()
    }
}

/// Ticket returned by [`DelayTimer::arm`]; identifies which arming fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerTicket(pub u64);

/// One-shot timer with a single slot.
///
/// Re-arming replaces the pending deadline, so a superseded arming can
/// never fire.
#[derive(Debug)]
pub struct DelayTimer {
    delay: Duration,
    remaining: Option<Duration>,
    next_ticket: u64,
}

impl DelayTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            remaining: None,
            next_ticket: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn arm(&mut self) -> TimerTicket {
        self.next_ticket += 1;
        self.remaining = Some(self.delay);
        TimerTicket(self.next_ticket)
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Advances the clock; returns the ticket of the arming that fired.
    pub fn tick(&mut self, delta: Duration) -> Option<TimerTicket> {
        let remaining = self.remaining?;
        if delta >= remaining {
            self.remaining = None;
            Some(TimerTicket(self.next_ticket))
        } else {
            self.remaining = Some(remaining - delta);
            None
        }
    }
}
