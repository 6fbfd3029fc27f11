//! Shared outbound-HTTP plumbing reused by the engine's LLM client.
//!
//! Kept deliberately small: a client builder with sane timeouts and a
//! bounded-retry helper for transient failures.

use std::time::Duration;

/// Default per-request timeout for outbound HTTP calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a `reqwest::Client` with a bounded timeout. Centralized so every
/// outbound caller gets the same connect/read behavior without repeating it.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Retry an async operation up to `attempts` times with linear backoff,
/// returning the first success or the last error.
pub async fn retry_with_backoff<F, Fut, T, E>(attempts: u32, base_delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut last_err = None;
    for attempt in 0..attempts.max(1) {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                last_err = Some(err);
                if attempt + 1 < attempts {
                    tokio::time::sleep(base_delay * (attempt + 1)).await;
                }
            }
        }
    }
    Err(last_err.expect("attempts >= 1 guarantees at least one iteration"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry_with_backoff(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n < 2 { Err("transient") } else { Ok(n) } }
        })
        .await;
        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn retry_gives_up_after_exhausting_attempts() {
        let result: Result<u32, &str> =
            retry_with_backoff(2, Duration::from_millis(1), || async { Err("down") }).await;
        assert_eq!(result, Err("down"));
    }
}
