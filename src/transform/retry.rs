//! Retry decorator
//!
//! Wraps a transformer and retries transient failures with exponential
//! backoff. Credential failures are never retried.

use std::thread::sleep;
use std::time::Duration;

use log::warn;

use crate::errors::{Error, Result, TransformationReason};

use super::capability::Transformer;

pub struct RetryingTransformer<T> {
    inner: T,
    max_retries: u32,
    base_delay: Duration,
}

impl<T: Transformer> RetryingTransformer<T> {
    /// `max_retries` extra attempts are made, waiting `base_delay * 2^n`
    /// before the n-th retry (counted from zero)
    pub fn new(inner: T, max_retries: u32, base_delay: Duration) -> Self {
        RetryingTransformer {
            inner,
            max_retries,
            base_delay,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

fn is_retryable(error: &Error) -> bool {
    matches!(
        error.transformation_reason(),
        Some(
            TransformationReason::Quota
                | TransformationReason::Upstream
                | TransformationReason::MalformedResponse
        )
    )
}

impl<T: Transformer> Transformer for RetryingTransformer<T> {
    fn transform(&self, source_text: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.inner.transform(source_text) {
                Ok(text) => return Ok(text),
                Err(error) if attempt < self.max_retries && is_retryable(&error) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{error}; retrying in {} ms ({}/{})",
                        delay.as_millis(),
                        attempt + 1,
                        self.max_retries
                    );
                    sleep(delay);
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::errors::transformation_error;

    struct Flaky {
        calls: AtomicU32,
        failures: u32,
        reason: TransformationReason,
    }

    impl Transformer for Flaky {
        fn transform(&self, source_text: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(transformation_error(self.reason, "temporary"))
            } else {
                Ok(source_text.to_string())
            }
        }
    }

    fn flaky(failures: u32, reason: TransformationReason) -> Flaky {
        Flaky {
            calls: AtomicU32::new(0),
            failures,
            reason,
        }
    }

    #[test]
    fn test_retries_until_success() {
        let retrying =
            RetryingTransformer::new(flaky(2, TransformationReason::Quota), 3, Duration::ZERO);
        assert_eq!(retrying.transform("ok").unwrap(), "ok");
        assert_eq!(retrying.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_gives_up_after_max_retries() {
        let retrying =
            RetryingTransformer::new(flaky(5, TransformationReason::Upstream), 2, Duration::ZERO);
        let error = retrying.transform("ok").unwrap_err();
        assert_eq!(
            error.transformation_reason(),
            Some(TransformationReason::Upstream)
        );
        assert_eq!(retrying.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_credentials_are_not_retried() {
        let retrying = RetryingTransformer::new(
            flaky(1, TransformationReason::Credentials),
            5,
            Duration::ZERO,
        );
        assert!(retrying.transform("ok").is_err());
        assert_eq!(retrying.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles() {
        let retrying = RetryingTransformer::new(
            flaky(0, TransformationReason::Quota),
            3,
            Duration::from_millis(100),
        );
        assert_eq!(retrying.delay_for(0), Duration::from_millis(100));
        assert_eq!(retrying.delay_for(1), Duration::from_millis(200));
        assert_eq!(retrying.delay_for(3), Duration::from_millis(800));
    }
}
