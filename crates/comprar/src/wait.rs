//! Explicit waits.
//!
//! Every UI synchronization point in the suite goes through [`poll_until`]:
//! a polling loop that re-evaluates an async predicate until it reports
//! true or the deadline passes. The storefront re-renders asynchronously
//! (React), so reading the DOM once is never enough.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::result::{ComprarError, ComprarResult};

/// Default deadline for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Options for wait operations
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a `Duration`
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Poll an async predicate until it reports true or the deadline passes.
///
/// Predicate errors are swallowed while time remains: a stale element or a
/// mid-render DOM read is indistinguishable from "not ready yet". The last
/// error only surfaces in the timeout message.
///
/// Returns how long the condition took to become true.
pub async fn poll_until<F, Fut>(
    waited_for: &str,
    options: WaitOptions,
    mut predicate: F,
) -> ComprarResult<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ComprarResult<bool>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let mut last_err: Option<ComprarError> = None;

    loop {
        match predicate().await {
            Ok(true) => {
                tracing::trace!(waited_for, elapsed_ms = %start.elapsed().as_millis(), "condition met");
                return Ok(start.elapsed());
            }
            Ok(false) => {}
            Err(err) => last_err = Some(err),
        }
        if start.elapsed() >= timeout {
            break;
        }
        tokio::time::sleep(options.poll_interval()).await;
    }

    let waited_for = match last_err {
        Some(err) => format!("{waited_for} (last error: {err})"),
        None => waited_for.to_string(),
    };
    Err(ComprarError::timeout(options.timeout_ms, waited_for))
}

/// Convenience wrapper with only a timeout override
pub async fn wait_until<F, Fut>(waited_for: &str, timeout_ms: u64, predicate: F) -> ComprarResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ComprarResult<bool>>,
{
    let options = WaitOptions::new().with_timeout(timeout_ms);
    poll_until(waited_for, options, predicate).await?;
    Ok(())
}

/// Sleep for a fixed duration (discouraged - prefer a condition)
pub async fn pause(duration_ms: u64) {
    tokio::time::sleep(Duration::from_millis(duration_ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_chained() {
            let opts = WaitOptions::new().with_timeout(22_000).with_poll_interval(50);
            assert_eq!(opts.timeout_ms, 22_000);
            assert_eq!(opts.poll_interval_ms, 50);
            assert_eq!(opts.timeout(), Duration::from_secs(22));
            assert_eq!(opts.poll_interval(), Duration::from_millis(50));
        }
    }

    mod poll_until_tests {
        use super::*;

        #[tokio::test]
        async fn test_immediate_success() {
            let result = poll_until("always true", WaitOptions::default(), || async { Ok(true) }).await;
            assert!(result.is_ok());
        }

        #[tokio::test]
        async fn test_timeout_carries_description() {
            let options = WaitOptions::new().with_timeout(100).with_poll_interval(10);
            let result = poll_until("badge == 4", options, || async { Ok(false) }).await;
            match result {
                Err(ComprarError::Timeout { ms, waited_for }) => {
                    assert_eq!(ms, 100);
                    assert_eq!(waited_for, "badge == 4");
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_condition_becomes_true() {
            let calls = Arc::new(AtomicU32::new(0));
            let calls_clone = calls.clone();
            let options = WaitOptions::new().with_timeout(1000).with_poll_interval(10);
            let result = poll_until("third poll", options, move || {
                let calls = calls_clone.clone();
                async move { Ok(calls.fetch_add(1, Ordering::SeqCst) >= 2) }
            })
            .await;
            assert!(result.is_ok());
            assert!(calls.load(Ordering::SeqCst) >= 3);
        }

        #[tokio::test]
        async fn test_predicate_errors_surface_in_timeout() {
            let options = WaitOptions::new().with_timeout(80).with_poll_interval(10);
            let result = poll_until("error prone", options, || async {
                Err(ComprarError::Eval {
                    message: "node detached".to_string(),
                })
            })
            .await;
            match result {
                Err(ComprarError::Timeout { waited_for, .. }) => {
                    assert!(waited_for.contains("node detached"));
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }
    }

    mod wait_until_tests {
        use super::*;

        #[tokio::test]
        async fn test_success() {
            assert!(wait_until("true", 100, || async { Ok(true) }).await.is_ok());
        }

        #[tokio::test]
        async fn test_timeout() {
            assert!(wait_until("false", 50, || async { Ok(false) }).await.is_err());
        }
    }
}
