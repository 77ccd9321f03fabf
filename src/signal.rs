// Fail-open plumbing shared by the two detector boundaries.
//
// Detectors are remote services that time out, rate limit, return HTML error
// pages and occasionally hallucinate JSON. None of that is allowed to fail a
// moderation request. Each boundary wraps its call in `bounded()` and turns
// the outcome into a tagged signal whose degraded variant is the neutral
// default (score 0.0, no phrases).

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Why a detector contributed nothing to a moderation result.
#[derive(Debug, Clone, PartialEq)]
pub enum Degraded {
    /// No backend configured (usually a missing API key).
    Unconfigured,
    /// The call did not finish within the configured timeout.
    TimedOut(Duration),
    /// Transport error, bad status, or a payload we couldn't use.
    Failed(String),
}

impl fmt::Display for Degraded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degraded::Unconfigured => f.write_str("not configured"),
            Degraded::TimedOut(after) => write!(f, "timed out after {}s", after.as_secs_f64()),
            Degraded::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Run a detector call with a timeout, folding every failure into `Degraded`.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, Degraded>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(Degraded::Failed(format!("{e:#}"))),
        Err(_) => Err(Degraded::TimedOut(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_value_through() {
        let out = bounded(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn test_bounded_maps_error() {
        let out: Result<u8, _> = bounded(Duration::from_secs(1), async {
            Err(anyhow::anyhow!("boom"))
        })
        .await;
        assert_eq!(out, Err(Degraded::Failed("boom".to_string())));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let limit = Duration::from_millis(20);
        let out: Result<u8, _> = bounded(limit, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        })
        .await;
        assert_eq!(out, Err(Degraded::TimedOut(limit)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Degraded::Unconfigured.to_string(), "not configured");
        assert_eq!(
            Degraded::TimedOut(Duration::from_secs(60)).to_string(),
            "timed out after 60s"
        );
    }
}
