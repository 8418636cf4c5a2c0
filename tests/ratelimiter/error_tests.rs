// tests/ratelimiter/error_tests.rs

#[cfg(test)]
mod tests {
    use slide_limiter::{AnyLimiter, DurationError, LimiterError, SlidingWindowLimiter, must};
    use std::error::Error;
    use std::time::Duration;

    #[test]
    fn zero_window_fails() {
        let result = SlidingWindowLimiter::<String, u8>::new(Duration::ZERO, 10);
        match result {
            Err(LimiterError::InvalidWindow) => {} // Expected
            other => panic!("Expected InvalidWindow, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn zero_limit_fails() {
        let result = SlidingWindowLimiter::<String, u8>::new(Duration::from_secs(1), 0);
        match result {
            Err(LimiterError::InvalidLimit) => {} // Expected
            other => panic!("Expected InvalidLimit, got: {:?}", other.map(|_| ())),
        }

        let result = AnyLimiter::<String>::new_smallest(Duration::from_secs(1), 0);
        assert!(matches!(result, Err(LimiterError::InvalidLimit)));
    }

    #[test]
    fn spec_without_slash_fails() {
        let result = AnyLimiter::<String>::from_spec("bad");
        assert!(matches!(result, Err(LimiterError::MissingSeparator)));
    }

    #[test]
    fn malformed_count_wraps_parse_error() {
        let err = AnyLimiter::<String>::from_spec("many/1m").unwrap_err();
        assert!(matches!(err, LimiterError::InvalidCount(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn malformed_duration_wraps_parse_error() {
        let err = AnyLimiter::<String>::from_spec("10/1 minute").unwrap_err();
        match err {
            LimiterError::InvalidDuration(DurationError::UnknownUnit { ref unit, .. }) => {
                assert_eq!(unit, " minute");
            }
            ref other => panic!("Expected InvalidDuration, got: {:?}", other),
        }
        assert!(err.source().is_some());
    }

    #[test]
    fn zero_values_in_spec_fail_validation() {
        assert!(matches!(
            AnyLimiter::<String>::from_spec("0/1m"),
            Err(LimiterError::InvalidLimit)
        ));
        assert!(matches!(
            AnyLimiter::<String>::from_spec("10/0s"),
            Err(LimiterError::InvalidWindow)
        ));
        assert!(matches!(
            AnyLimiter::<String>::from_spec("10/-5s"),
            Err(LimiterError::InvalidWindow)
        ));
    }

    #[test]
    fn error_display_formatting() {
        let err = AnyLimiter::<String>::from_spec("bad").unwrap_err();
        let error_string = format!("{}", err);
        assert!(error_string.contains("<count>/<duration>"));
        assert!(error_string.contains("slash is missing"));

        let err = AnyLimiter::<String>::new_smallest(Duration::ZERO, 1).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("window"));
    }

    #[test]
    #[should_panic(expected = "slash is missing")]
    fn must_panics_with_the_error() {
        let _limiter: AnyLimiter<String> = must("bad".parse());
    }
}
