//! Bounded pool for outbound calls.
//!
//! Every call to an external provider goes through an [`UpstreamPool`], which caps
//! how many calls are in flight at once and gives each call a deadline. Request
//! tasks wait on the pool, never the accept loop.

use crate::config::ServerSettings;
use crate::error::{Result, ScriptwrightError};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// Concurrency limit and deadline shared by all upstream calls.
#[derive(Clone, Debug)]
pub struct UpstreamPool {
    permits: Arc<Semaphore>,
    size: usize,
    timeout: Duration,
}

impl UpstreamPool {
    /// Create a pool with `size` slots (at least one) and a per-call timeout.
    pub fn new(size: usize, timeout: Duration) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
            timeout,
        }
    }

    /// Create a pool from server settings.
    pub fn from_settings(settings: &ServerSettings) -> Self {
        Self::new(
            settings.max_concurrent_upstream,
            Duration::from_secs(settings.upstream_timeout_secs),
        )
    }

    /// Number of calls allowed in flight.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Calls that could start right now without waiting.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run one upstream call inside the pool.
    ///
    /// Waiting for a slot does not count against the timeout.
    pub async fn run<F, T>(&self, label: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ScriptwrightError::Upstream("upstream pool is closed".to_string()))?;

        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, call).await.map_err(|_| {
            ScriptwrightError::Upstream(format!(
                "{} timed out after {}s",
                label,
                self.timeout.as_secs()
            ))
        })?;

        debug!(
            call = label,
            latency_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "upstream call finished"
        );
        result
    }
}

impl Default for UpstreamPool {
    fn default() -> Self {
        Self::from_settings(&ServerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_run_returns_call_result() {
        let pool = UpstreamPool::new(2, Duration::from_secs(5));
        let value = pool.run("ok", async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_upstream_failure() {
        let pool = UpstreamPool::new(1, Duration::from_millis(20));
        let result: Result<()> = pool
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        match result {
            Err(ScriptwrightError::Upstream(msg)) => assert!(msg.contains("slow timed out")),
            other => panic!("expected upstream timeout, got {:?}", other),
        }
        // The slot is released after a timeout
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_concurrency_is_capped() {
        let pool = UpstreamPool::new(2, Duration::from_secs(5));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let calls = (0..6).map(|_| {
            let pool = pool.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                pool.run("capped", async {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
                .await
            }
        });

        for result in futures::future::join_all(calls).await {
            result.unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let pool = UpstreamPool::new(0, Duration::from_secs(1));
        assert_eq!(pool.size(), 1);
    }

    #[tokio::test]
    async fn test_call_errors_pass_through() {
        let pool = UpstreamPool::default();
        let result: Result<()> = pool
            .run("failing", async {
                Err(ScriptwrightError::Transcript("disabled".to_string()))
            })
            .await;
        assert!(matches!(result, Err(ScriptwrightError::Transcript(_))));
        assert_eq!(pool.available(), pool.size());
    }
}
