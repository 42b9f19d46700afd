//! Counting animation for the stats numbers
//!
//! A counter runs linearly from `start` to `target` over `duration`. Values
//! are floored, so intermediate frames never overshoot an increasing counter.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAnimation {
    pub start: u64,
    pub target: u64,
    pub duration: Duration,
}

impl CounterAnimation {
    /// Counter running from zero, the way the page animates its stats.
    pub fn new(target: u64, duration: Duration) -> Self {
        Self {
            start: 0,
            target,
            duration,
        }
    }

    /// Fraction of the animation done after `elapsed`, in 0.0..=1.0.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, elapsed: Duration) -> u64 {
        let progress = self.progress(elapsed);
        if progress >= 1.0 {
            return self.target;
        }
        let start = self.start as f64;
        let value = progress * (self.target as f64 - start) + start;
        value.floor().max(0.0) as u64
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    /// Values sampled every `interval`, starting at zero elapsed time and
    /// always ending on `target`.
    pub fn frames(&self, interval: Duration) -> CounterFrames {
        CounterFrames {
            animation: *self,
            interval,
            elapsed: Duration::ZERO,
            done: false,
        }
    }
}

/// Iterator returned by [`CounterAnimation::frames`]
#[derive(Debug, Clone)]
pub struct CounterFrames {
    animation: CounterAnimation,
    interval: Duration,
    elapsed: Duration,
    done: bool,
}

impl Iterator for CounterFrames {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }
        let value = self.animation.value_at(self.elapsed);
        if self.animation.is_finished(self.elapsed) {
            self.done = true;
        } else if self.interval.is_zero() {
            // No sampling interval: jump to the last frame.
            self.elapsed = self.animation.duration;
        } else {
            self.elapsed += self.interval;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_value_at_is_linear_and_floored() {
        let counter = CounterAnimation::new(5_007, ms(1_500));
        assert_eq!(counter.value_at(ms(0)), 0);
        assert_eq!(counter.value_at(ms(750)), 2_503);
        assert_eq!(counter.value_at(ms(1_500)), 5_007);
        assert_eq!(counter.value_at(ms(9_000)), 5_007);
    }

    #[test]
    fn test_counter_can_count_down() {
        let counter = CounterAnimation {
            start: 10,
            target: 0,
            duration: ms(100),
        };
        assert_eq!(counter.value_at(ms(0)), 10);
        assert_eq!(counter.value_at(ms(50)), 5);
        assert_eq!(counter.value_at(ms(100)), 0);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let counter = CounterAnimation::new(42, Duration::ZERO);
        assert!(counter.is_finished(Duration::ZERO));
        assert_eq!(counter.frames(ms(16)).collect::<Vec<_>>(), vec![42]);
    }

    #[test]
    fn test_frames_end_on_target() {
        let counter = CounterAnimation::new(100, ms(1_000));
        let frames: Vec<u64> = counter.frames(ms(300)).collect();
        assert_eq!(frames, vec![0, 30, 60, 90, 100]);
    }

    #[test]
    fn test_frames_with_zero_interval() {
        let counter = CounterAnimation::new(100, ms(1_000));
        let frames: Vec<u64> = counter.frames(Duration::ZERO).collect();
        assert_eq!(frames, vec![0, 100]);
    }

    #[test]
    fn test_frames_never_decrease_when_counting_up() {
        let counter = CounterAnimation::new(89_914, ms(1_500));
        let frames: Vec<u64> = counter.frames(ms(16)).collect();
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(frames.last(), Some(&89_914));
    }
}
