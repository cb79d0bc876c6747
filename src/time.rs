use std::time::{Duration, Instant};

/// Longest step a frame may simulate. Below 100 updates per second the
/// simulation slows down instead of taking larger steps.
pub const MAX_DT: f32 = 0.01;

pub fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(0.0, MAX_DT)
}

/// Wall-clock frame timer.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Marks a frame boundary and returns the clamped step.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        self.dt()
    }

    /// Unclamped time between the last two ticks.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn dt(&self) -> f32 {
        clamp_dt(self.elapsed.as_secs_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_capped() {
        assert_eq!(clamp_dt(0.5), MAX_DT);
        assert_eq!(clamp_dt(0.004), 0.004);
        assert_eq!(clamp_dt(-1.0), 0.0);
    }

    #[test]
    fn tick_measures_between_frames() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        assert_eq!(clock.tick_at(start + Duration::from_millis(5)), 0.005);
        assert_eq!(clock.tick_at(start + Duration::from_millis(505)), MAX_DT);
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
    }
}
