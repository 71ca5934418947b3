//! Monotonic millisecond timekeeping.
//!
//! Every periodic task in the lamp is gated by "has N ms elapsed since the
//! mark". The underlying millisecond counter is 32 bits wide and wraps after
//! ~49.7 days, so all comparisons go through wrapping subtraction
//! (`now - mark`) and never through `now > mark`.

use core::cell::Cell;

use embassy_time::{Duration, Instant};

/// Timestamp captured from a [`Clock`], in wrapping milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerMark(u32);

impl TimerMark {
    /// Create a mark from a raw millisecond counter value
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis)
    }

    /// Raw millisecond counter value
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed between this mark and `now`.
    ///
    /// Correct across counter wraparound as long as the real interval is
    /// shorter than the counter range.
    pub const fn elapsed_at(self, now: TimerMark) -> u32 {
        now.0.wrapping_sub(self.0)
    }

    /// Check if `duration` has elapsed between this mark and `now`
    #[allow(clippy::cast_lossless)]
    pub const fn is_expired_at(self, now: TimerMark, duration: Duration) -> bool {
        self.elapsed_at(now) as u64 >= duration.as_millis()
    }
}

/// Source of monotonic time
pub trait Clock {
    /// Current time as a wrapping millisecond mark
    fn now(&self) -> TimerMark;
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> TimerMark {
        (**self).now()
    }
}

/// Clock backed by the embassy time driver.
///
/// The 64-bit embassy tick counter is truncated to 32 bits, so marks wrap
/// the same way a hardware millisecond counter does.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> TimerMark {
        TimerMark(Instant::now().as_millis() as u32)
    }
}

/// Manually advanced clock for host tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: Cell<u32>,
}

impl ManualClock {
    pub const fn new(start: u32) -> Self {
        Self {
            millis: Cell::new(start),
        }
    }

    /// Move time forward, wrapping at the counter range
    pub fn advance(&self, millis: u32) {
        self.millis.set(self.millis.get().wrapping_add(millis));
    }

    pub fn set(&self, millis: u32) {
        self.millis.set(millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimerMark {
        TimerMark(self.millis.get())
    }
}

/// "Elapsed since mark" checks against a clock
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicTimer<C: Clock> {
    clock: C,
}

impl<C: Clock> MonotonicTimer<C> {
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Capture the current time
    pub fn mark(&self) -> TimerMark {
        self.clock.now()
    }

    /// Check if `duration` has passed since `mark`
    pub fn is_expired(&self, mark: TimerMark, duration: Duration) -> bool {
        mark.is_expired_at(self.clock.now(), duration)
    }

    /// Time passed since `mark`
    pub fn elapsed(&self, mark: TimerMark) -> Duration {
        Duration::from_millis(u64::from(mark.elapsed_at(self.clock.now())))
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Re-arming periodic gate.
///
/// `poll` returns `true` at most once per period and re-arms at the time it
/// fired. Starts armed at mark zero, so the first poll after one period of
/// uptime fires.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    mark: TimerMark,
    period: Duration,
}

impl Interval {
    pub const fn new(period: Duration) -> Self {
        Self {
            mark: TimerMark(0),
            period,
        }
    }

    /// Fire if the period has elapsed, re-arming on fire
    pub fn poll(&mut self, now: TimerMark) -> bool {
        if !self.mark.is_expired_at(now, self.period) {
            return false;
        }
        self.mark = now;
        true
    }

    /// Restart the period from `now`
    pub fn reset(&mut self, now: TimerMark) {
        self.mark = now;
    }

    pub const fn period(&self) -> Duration {
        self.period
    }
}
