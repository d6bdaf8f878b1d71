//! Bounded polling for asynchronously rendered content.
//!
//! Client-rendered pages fill in their components after DOMContentLoaded, so a
//! single query right after navigation reports false negatives. A probe asks the
//! same question a fixed number of times with a fixed pause in between.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;
use uihealth_config::ProbeConfig;
use uihealth_protocols::ProbeResult;

/// Retry budget for one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Total number of check invocations, including the first one.
    pub max_attempts: u32,
    /// Pause between two invocations.
    pub interval: Duration,
}

impl ProbePolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.interval_ms))
    }

    /// A single immediate check, no retries.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(300))
    }
}

/// Run `check` until it returns `true` or the attempts are exhausted.
///
/// The first invocation happens immediately. There is no pause after the last
/// attempt. An error from `check` ends the probe and is returned as-is.
pub async fn probe<F, Fut, E>(policy: &ProbePolicy, mut check: F) -> Result<ProbeResult, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let started = Instant::now();
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        if check().await? {
            return Ok(ProbeResult {
                satisfied: true,
                attempts_used: attempt,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }

        trace!("Probe attempt {}/{} not satisfied", attempt, max_attempts);
        if attempt < max_attempts {
            sleep(policy.interval).await;
        }
    }

    Ok(ProbeResult {
        satisfied: false,
        attempts_used: max_attempts,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}
