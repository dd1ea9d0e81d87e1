use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Whole-second elapsed counter driven by a one-second periodic tick.
///
/// The tick is armed and disarmed explicitly. Disarming drops the partial
/// second in flight, the same as cancelling an interval and starting a fresh
/// one later. Callers poll with the current instant; nothing runs in the
/// background.
#[derive(Clone, Debug, Default)]
pub struct SessionTimer {
    elapsed_secs: u64,
    next_tick: Option<Instant>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Schedule the first tick one interval from `now`. No-op if already armed.
    pub fn arm(&mut self, now: Instant) {
        if self.next_tick.is_none() {
            self.next_tick = Some(now + TICK_INTERVAL);
        }
    }

    pub fn disarm(&mut self) {
        self.next_tick = None;
    }

    /// Fire every tick due at `now` and return how many fired.
    pub fn poll(&mut self, now: Instant) -> u64 {
        let Some(mut next) = self.next_tick else {
            return 0;
        };
        let mut fired = 0;
        while now >= next {
            fired += 1;
            next += TICK_INTERVAL;
        }
        self.elapsed_secs += fired;
        self.next_tick = Some(next);
        fired
    }
}
