mod tests {
    use embassy_time::Duration;
    use lamp_controller::timer::{Interval, ManualClock, MonotonicTimer, TimerMark};

    #[test]
    fn test_is_expired_at_threshold() {
        let clock = ManualClock::new(1_000);
        let timer = MonotonicTimer::new(&clock);
        let mark = timer.mark();

        clock.advance(999);
        assert!(!timer.is_expired(mark, Duration::from_millis(1000)));

        clock.advance(1);
        assert!(timer.is_expired(mark, Duration::from_millis(1000)));
        assert_eq!(timer.elapsed(mark), Duration::from_millis(1000));
    }

    #[test]
    fn test_expiry_across_wraparound() {
        let clock = ManualClock::new(u32::MAX - 10);
        let timer = MonotonicTimer::new(&clock);
        let mark = timer.mark();

        // Counter wraps to 9
        clock.advance(20);
        assert_eq!(timer.mark().as_millis(), 9);
        assert!(timer.is_expired(mark, Duration::from_millis(20)));
        assert!(!timer.is_expired(mark, Duration::from_millis(21)));
        assert_eq!(timer.elapsed(mark), Duration::from_millis(20));
    }

    #[test]
    fn test_wrapped_mark_is_not_spuriously_expired() {
        let mark = TimerMark::from_millis(5);
        let now = TimerMark::from_millis(u32::MAX);
        // Real interval is u32::MAX - 5 ms, far beyond 50 ms
        assert!(mark.is_expired_at(now, Duration::from_millis(50)));

        let mark = TimerMark::from_millis(u32::MAX - 1);
        let now = TimerMark::from_millis(3);
        assert_eq!(mark.elapsed_at(now), 5);
        assert!(!mark.is_expired_at(now, Duration::from_millis(50)));
    }

    #[test]
    fn test_interval_fires_once_per_period() {
        let mut interval = Interval::new(Duration::from_millis(50));

        assert!(!interval.poll(TimerMark::from_millis(49)));
        assert!(interval.poll(TimerMark::from_millis(50)));
        assert!(!interval.poll(TimerMark::from_millis(50)));
        assert!(!interval.poll(TimerMark::from_millis(99)));
        // Re-armed at the firing time, not at the nominal deadline
        assert!(interval.poll(TimerMark::from_millis(120)));
        assert!(!interval.poll(TimerMark::from_millis(169)));
        assert!(interval.poll(TimerMark::from_millis(170)));
    }

    #[test]
    fn test_interval_across_wraparound() {
        let mut interval = Interval::new(Duration::from_millis(30));
        interval.reset(TimerMark::from_millis(u32::MAX - 9));

        assert!(!interval.poll(TimerMark::from_millis(10)));
        assert!(interval.poll(TimerMark::from_millis(20)));
    }
}
