use std::{
    thread::sleep,
    time::{Duration, Instant},
};

/// keeps a frame loop at a fixed rate.
pub struct FramePacer {
    period: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// sleeps until the next frame is due. a late frame restarts the schedule instead of
    /// running the missed frames back to back.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next {
            sleep(self.next - now);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}
