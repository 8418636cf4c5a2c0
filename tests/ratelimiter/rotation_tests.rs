// tests/ratelimiter/rotation_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::test_clock::TestClock;
    use slide_limiter::SlidingWindowLimiter;
    use std::time::Duration;

    fn limiter(clock: &TestClock) -> SlidingWindowLimiter<String, u8, TestClock> {
        SlidingWindowLimiter::with_clock(Duration::from_secs(1), 20, clock.clone()).unwrap()
    }

    #[test]
    fn estimate_returns_to_zero_after_idle_window() {
        let clock = TestClock::new(100.0);
        let limiter = limiter(&clock);
        assert!(limiter.allow_n("client1".to_string(), 20));
        assert!(!limiter.allow("client1".to_string()));

        // almost a full window later only a sliver of the old count remains
        clock.set_time(101.999);
        assert!(limiter.window_value("client1") < 0.1);

        clock.set_time(102.0);
        assert_eq!(limiter.window_value("client1"), 0.0);
        assert!(limiter.allow_n("client1".to_string(), 20));
    }

    #[test]
    fn counts_in_next_window_start_at_full_previous_weight() {
        let clock = TestClock::new(100.5);
        let limiter = limiter(&clock);
        assert!(limiter.allow_n("client1".to_string(), 12));

        clock.set_time(101.0);
        assert_eq!(limiter.window_value("client1"), 12.0);
        assert!(limiter.allow_n("client1".to_string(), 8));
        assert!(!limiter.allow("client1".to_string()));
    }

    #[test]
    fn only_the_last_two_windows_are_kept() {
        let clock = TestClock::new(100.0);
        let limiter = limiter(&clock);

        for i in 0..50 {
            assert!(limiter.allow(format!("client{i}")));
        }
        assert_eq!(limiter.tracked_keys(), 50);

        clock.set_time(101.0);
        for i in 0..10 {
            assert!(limiter.allow(format!("other{i}")));
        }
        assert_eq!(limiter.tracked_keys(), 60);

        // the first batch is two windows old now
        clock.set_time(102.0);
        assert_eq!(limiter.tracked_keys(), 10);
        assert_eq!(limiter.window_value("client0"), 0.0);
        assert_eq!(limiter.window_value("other0"), 1.0);

        clock.set_time(103.0);
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn window_value_rotates_stale_state() {
        let clock = TestClock::new(100.0);
        let limiter = limiter(&clock);
        assert!(limiter.allow_n("client1".to_string(), 20));

        clock.set_time(150.0);
        assert_eq!(limiter.window_value("client1"), 0.0);
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn clock_stepping_back_is_conservative() {
        let clock = TestClock::new(101.0);
        let limiter = limiter(&clock);
        assert!(limiter.allow_n("client1".to_string(), 10));

        clock.set_time(101.5);
        assert!(limiter.allow_n("client1".to_string(), 5));

        // an earlier window than the stored one never forgets counts
        clock.set_time(100.5);
        assert_eq!(limiter.window_value("client1"), 15.0);
        assert!(limiter.allow_n("client1".to_string(), 5));
        assert!(!limiter.allow("client1".to_string()));
    }

    #[test]
    fn windows_align_to_the_epoch() {
        let clock = TestClock::new(100.9);
        let limiter = limiter(&clock);
        assert!(limiter.allow_n("client1".to_string(), 20));

        // 100.9 and 101.1 are only 0.2s apart but fall in different windows
        clock.set_time(101.1);
        let value = limiter.window_value("client1");
        assert!((value - 18.0).abs() < 1e-6, "value = {value}");
        assert!(limiter.allow("client1".to_string()));
    }
}
